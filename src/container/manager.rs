//! Building server images from the archives in the root directory

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::bedrock::local::latest_local_version;
use crate::config::{DEFAULT_DOCKERFILE, DEFAULT_REPOSITORY, DOWNLOADS_DIR};
use crate::container::backend::{BuildRequest, ImageBackend, ImageHandle};
use crate::container::error::ImageError;

/// Build argument carrying the server version
pub const VERSION_BUILD_ARG: &str = "BEDROCK_SERVER_VER";

/// Build argument carrying the archive directory, relative to the build context
pub const ARCHIVE_DIR_BUILD_ARG: &str = "BEDROCK_SERVER_DIR";

/// Creates and looks up images tagged `{repository}:{version}`
pub struct ImageManager {
    root_dir: PathBuf,
    dockerfile: String,
    bds_zip_dir: String,
    repository: String,
    backend: Arc<dyn ImageBackend>,
}

impl ImageManager {
    pub fn new(root_dir: impl Into<PathBuf>, backend: Arc<dyn ImageBackend>) -> Self {
        Self {
            root_dir: root_dir.into(),
            dockerfile: DEFAULT_DOCKERFILE.to_string(),
            bds_zip_dir: DOWNLOADS_DIR.to_string(),
            repository: DEFAULT_REPOSITORY.to_string(),
            backend,
        }
    }

    /// Uses `dockerfile` (relative to the root directory) as build descriptor
    pub fn with_dockerfile(mut self, dockerfile: &str) -> Self {
        self.dockerfile = dockerfile.to_string();
        self
    }

    pub fn with_repository(mut self, repository: &str) -> Self {
        self.repository = repository.to_string();
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn dockerfile_path(&self) -> PathBuf {
        self.root_dir.join(&self.dockerfile)
    }

    pub fn image_tag(&self, version: &str) -> String {
        format!("{}:{}", self.repository, version)
    }

    /// Build the server image for `version`
    ///
    /// Without a version the newest archive in the downloads directory is used.
    /// `extra_build_args` are applied last and may override the built-in ones.
    pub async fn build_image(
        &self,
        version: Option<&str>,
        extra_build_args: &BTreeMap<String, String>,
    ) -> Result<ImageHandle, ImageError> {
        let version = self.version_or_latest_local(version)?;

        let mut build_args = BTreeMap::from([
            (VERSION_BUILD_ARG.to_string(), version.clone()),
            (ARCHIVE_DIR_BUILD_ARG.to_string(), self.bds_zip_dir.clone()),
        ]);
        build_args.extend(extra_build_args.clone());

        let request = BuildRequest {
            context: self.root_dir.clone(),
            dockerfile: self.dockerfile_path(),
            tag: self.image_tag(&version),
            build_args,
        };

        let handle = self.backend.build(&request).await?;
        info!("Built image {} ({})", handle.tag, handle.id);
        Ok(handle)
    }

    /// Look up the image for `version`, defaulting to the newest local archive
    pub async fn get_image(&self, version: Option<&str>) -> Result<ImageHandle, ImageError> {
        let version = self.version_or_latest_local(version)?;
        self.backend.get(&self.image_tag(&version)).await
    }

    fn version_or_latest_local(&self, version: Option<&str>) -> Result<String, ImageError> {
        if let Some(version) = version {
            return Ok(version.to_string());
        }

        let dir = self.root_dir.join(&self.bds_zip_dir);
        latest_local_version(&dir)?.ok_or(ImageError::NoLocalArchive { dir })
    }
}
