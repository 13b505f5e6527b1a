//! Container engine seam used to build and look up server images

use std::collections::BTreeMap;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

use crate::container::error::ImageError;

/// Everything the engine needs to build one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Build context directory
    pub context: PathBuf,
    pub dockerfile: PathBuf,
    pub tag: String,
    pub build_args: BTreeMap<String, String>,
}

/// Reference to an image known to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub id: String,
    pub tag: String,
}

/// Trait for building and inspecting container images
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ImageBackend: Send + Sync {
    /// Builds an image and returns a handle to it
    async fn build(&self, request: &BuildRequest) -> Result<ImageHandle, ImageError>;

    /// Looks up an existing image by tag
    async fn get(&self, tag: &str) -> Result<ImageHandle, ImageError>;
}
