//! Fake download page and archive host backed by mockito

use std::path::Path;
use std::sync::Arc;

use mcbdsc::bedrock::download::DownloadCache;
use mcbdsc::bedrock::http::ReqwestClient;
use mcbdsc::bedrock::resolver::DownloadTarget;
use mockito::{Mock, ServerGuard};

pub const PAGE_PATH: &str = "/en-us/download/server/bedrock/";
pub const ARCHIVE_BODY: &[u8] = b"PK\x03\x04 fake bedrock server";

pub struct DownloadSite {
    pub server: ServerGuard,
}

impl DownloadSite {
    pub async fn start() -> Self {
        Self {
            server: mockito::Server::new_async().await,
        }
    }

    pub fn page_url(&self) -> String {
        format!("{}{}", self.server.url(), PAGE_PATH)
    }

    pub fn archive_path(version: &str) -> String {
        format!("/bin-linux/bedrock-server-{version}.zip")
    }

    pub fn archive_url(&self, version: &str) -> String {
        format!("{}{}", self.server.url(), Self::archive_path(version))
    }

    /// Download link pattern pointing at this server
    pub fn target(&self) -> DownloadTarget {
        let pattern = format!(
            r"{}/bin-linux/bedrock-server-([0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)\.zip",
            regex::escape(&self.server.url())
        );
        DownloadTarget::new(&self.page_url(), &pattern).unwrap()
    }

    /// Serves a page linking `version`, expected to be fetched `hits` times
    pub async fn mock_page(&mut self, version: &str, hits: usize) -> Mock {
        let body = format!(
            r#"<html><body><a href="{}" class="btn downloadlink" data-platform="serverBedrockLinux">Download</a></body></html>"#,
            self.archive_url(version)
        );
        self.server
            .mock("GET", PAGE_PATH)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Serves the archive of `version`, expected to be fetched `hits` times
    pub async fn mock_archive(&mut self, version: &str, hits: usize) -> Mock {
        self.server
            .mock("GET", Self::archive_path(version).as_str())
            .with_status(200)
            .with_header("content-type", "application/zip")
            .with_body(ARCHIVE_BODY)
            .expect(hits)
            .create_async()
            .await
    }

    pub fn cache(&self, root_dir: &Path) -> DownloadCache {
        DownloadCache::new(root_dir, self.target(), Arc::new(ReqwestClient::default()))
    }
}
