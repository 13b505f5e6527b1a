//! Discovery of the current server archive from the download page

use std::sync::Arc;

use regex::Regex;
use tracing::info;

use crate::bedrock::error::ResolveError;
use crate::bedrock::http::HttpClient;

/// Page to scrape and the link pattern to look for
///
/// The pattern's first capture group is the version.
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    pub page_url: String,
    pub url_pattern: Regex,
}

impl DownloadTarget {
    pub fn new(page_url: &str, url_pattern: &str) -> Result<Self, ResolveError> {
        Ok(Self {
            page_url: page_url.to_string(),
            url_pattern: Regex::new(url_pattern)?,
        })
    }
}

/// Archive URL and version taken from a single page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub zip_url: String,
    pub version: String,
}

impl ResolvedVersion {
    /// Last path segment of the archive URL
    pub fn filename(&self) -> &str {
        let path = self
            .zip_url
            .split(['?', '#'])
            .next()
            .unwrap_or(&self.zip_url);
        path.rsplit('/').next().unwrap_or(path)
    }
}

/// Resolves the current archive URL once per instance
///
/// A failed resolution is not remembered; the next call fetches the page again.
/// A new resolver has to be created to observe a newer upstream release.
pub struct VersionResolver {
    target: DownloadTarget,
    http: Arc<dyn HttpClient>,
    resolved: Option<ResolvedVersion>,
}

impl VersionResolver {
    pub fn new(target: DownloadTarget, http: Arc<dyn HttpClient>) -> Self {
        Self {
            target,
            http,
            resolved: None,
        }
    }

    pub fn target(&self) -> &DownloadTarget {
        &self.target
    }

    /// Returns the cached resolution, fetching the page on first use
    pub async fn resolve(&mut self) -> Result<&ResolvedVersion, ResolveError> {
        let resolved = match self.resolved.take() {
            Some(resolved) => resolved,
            None => {
                let resolved = self.fetch().await?;
                info!(
                    "Latest Bedrock server is {} ({})",
                    resolved.version, resolved.zip_url
                );
                resolved
            }
        };

        let resolved: &ResolvedVersion = self.resolved.insert(resolved);
        Ok(resolved)
    }

    /// Full URL of the archive
    pub async fn zip_url(&mut self) -> Result<&str, ResolveError> {
        Ok(&self.resolve().await?.zip_url)
    }

    /// Version embedded in the archive URL (e.g. "1.16.201.02")
    pub async fn version(&mut self) -> Result<&str, ResolveError> {
        Ok(&self.resolve().await?.version)
    }

    /// Archive file name (e.g. "bedrock-server-1.16.201.02.zip")
    pub async fn filename(&mut self) -> Result<&str, ResolveError> {
        Ok(self.resolve().await?.filename())
    }

    async fn fetch(&self) -> Result<ResolvedVersion, ResolveError> {
        let url = &self.target.page_url;
        let pattern = &self.target.url_pattern;

        info!("Fetching download page {}", url);
        let response = self.http.get(url).await?.error_for_status(url)?;
        let body = response.text();

        let captures = pattern
            .captures(&body)
            .ok_or_else(|| ResolveError::NoMatch {
                url: url.clone(),
                pattern: pattern.as_str().to_string(),
            })?;

        let zip_url = captures[0].to_string();
        // A pattern without a capture group yields the whole match as version
        let version = captures
            .get(1)
            .map_or_else(|| zip_url.clone(), |m| m.as_str().to_string());

        Ok(ResolvedVersion { zip_url, version })
    }
}
