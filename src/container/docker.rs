//! [`ImageBackend`] that drives the docker (or podman) command line

use std::ffi::OsString;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_ENGINE;
use crate::container::backend::{BuildRequest, ImageBackend, ImageHandle};
use crate::container::error::ImageError;

pub struct DockerCli {
    program: String,
}

impl DockerCli {
    /// Creates a backend invoking `program` (e.g. "docker" or "podman")
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// Arguments of the `build` invocation for `request`
    fn build_command_args(request: &BuildRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "build".into(),
            "--file".into(),
            request.dockerfile.clone().into(),
            "--tag".into(),
            request.tag.clone().into(),
        ];
        for (key, value) in &request.build_args {
            args.push("--build-arg".into());
            args.push(format!("{key}={value}").into());
        }
        args.push(request.context.clone().into());
        args
    }

    async fn run(&self, args: &[OsString]) -> Result<std::process::Output, ImageError> {
        debug!("Running {} {:?}", self.program, args);
        Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|source| ImageError::Spawn {
                program: self.program.clone(),
                source,
            })
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE)
    }
}

#[async_trait::async_trait]
impl ImageBackend for DockerCli {
    async fn build(&self, request: &BuildRequest) -> Result<ImageHandle, ImageError> {
        info!(
            "Building image {} from {}",
            request.tag,
            request.dockerfile.display()
        );

        let output = self.run(&Self::build_command_args(request)).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("Image build for {} failed: {}", request.tag, stderr);
            return Err(ImageError::BuildFailed {
                tag: request.tag.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        self.get(&request.tag).await
    }

    async fn get(&self, tag: &str) -> Result<ImageHandle, ImageError> {
        let args: Vec<OsString> = ["image", "inspect", "--format", "{{.Id}}", tag]
            .into_iter()
            .map(OsString::from)
            .collect();

        let output = self.run(&args).await?;
        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || id.is_empty() {
            return Err(ImageError::NotFound {
                tag: tag.to_string(),
            });
        }

        Ok(ImageHandle {
            id,
            tag: tag.to_string(),
        })
    }
}
