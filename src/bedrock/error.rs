use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No download link matching {pattern:?} found on {url}")]
    NoMatch { url: String, pattern: String },

    #[error("Invalid download link pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(
        "You have to agree to the Minecraft End User License Agreement and Privacy Policy \
         before downloading the Bedrock Dedicated Server"
    )]
    ConsentRequired,

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
