use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("No Bedrock server archive found in {}", dir.display())]
    NoLocalArchive { dir: PathBuf },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Building image {tag} failed ({status}): {stderr}")]
    BuildFailed {
        tag: String,
        status: String,
        stderr: String,
    },

    #[error("Image not found: {tag}")]
    NotFound { tag: String },

    #[error("Failed to list server archives: {0}")]
    Io(#[from] std::io::Error),
}
