//! Container images for the Bedrock Dedicated Server
//!
//! - [`manager`]: Derives tags and build arguments from the root directory layout
//! - [`backend`]: Trait for the container engine and its request/handle types
//! - [`docker`]: Engine implementation on top of the docker/podman CLI
//! - [`error`]: Error type for image operations

pub mod backend;
pub mod docker;
pub mod error;
pub mod manager;
