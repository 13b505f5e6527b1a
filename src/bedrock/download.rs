//! Idempotent download of the latest server archive into the root directory

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::bedrock::error::DownloadError;
use crate::bedrock::http::HttpClient;
use crate::bedrock::resolver::{DownloadTarget, VersionResolver};
use crate::config::DOWNLOADS_DIR;

/// Local copy of the latest server archive
///
/// The file at [`DownloadCache::local_path`] is the only cache signal. Its content
/// is never checked and older archives are left in place.
pub struct DownloadCache {
    root_dir: PathBuf,
    resolver: VersionResolver,
    http: Arc<dyn HttpClient>,
}

impl DownloadCache {
    pub fn new(
        root_dir: impl Into<PathBuf>,
        target: DownloadTarget,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            resolver: VersionResolver::new(target, Arc::clone(&http)),
            http,
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn resolver(&mut self) -> &mut VersionResolver {
        &mut self.resolver
    }

    /// Directory holding the archives, or its name when `relative` is set
    pub fn download_dir(&self, relative: bool) -> PathBuf {
        if relative {
            PathBuf::from(DOWNLOADS_DIR)
        } else {
            self.root_dir.join(DOWNLOADS_DIR)
        }
    }

    /// `{root}/downloads/{archive file name}`
    pub async fn local_path(&mut self) -> Result<PathBuf, DownloadError> {
        let filename = self.resolver.filename().await?;
        Ok(self.root_dir.join(DOWNLOADS_DIR).join(filename))
    }

    /// Whether the latest archive is already stored as a regular file
    pub async fn exists(&mut self) -> Result<bool, DownloadError> {
        let path = self.local_path().await?;
        Ok(tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false))
    }

    /// Download `url` and write the whole body to `path`
    ///
    /// An existing file is overwritten. The write is not atomic, a failure
    /// part way through can leave a truncated file behind.
    pub async fn fetch_and_store(&self, url: &str, path: &Path) -> Result<(), DownloadError> {
        info!("Downloading {} to {}", url, path.display());

        let response = self.http.get(url).await?.error_for_status(url)?;

        tokio::fs::write(path, &response.body)
            .await
            .map_err(|source| DownloadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Saved {} bytes to {}", response.body.len(), path.display());
        Ok(())
    }

    /// Download the latest archive unless it is already present
    ///
    /// Consent to the Minecraft EULA and Privacy Policy is only required when a
    /// download actually happens. Returns the archive path.
    pub async fn ensure_latest(&mut self, consent_granted: bool) -> Result<PathBuf, DownloadError> {
        let path = self.local_path().await?;

        if self.exists().await? {
            debug!("{} already exists, skipping download", path.display());
            return Ok(path);
        }

        if !consent_granted {
            return Err(DownloadError::ConsentRequired);
        }

        let url = self.resolver.zip_url().await?.to_string();
        self.fetch_and_store(&url, &path).await?;
        Ok(path)
    }
}
