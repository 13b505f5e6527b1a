use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

// =============================================================================
// Download-related constants
// =============================================================================

/// Page that links the current Bedrock Dedicated Server build
pub const DEFAULT_PAGE_URL: &str = "https://www.minecraft.net/en-us/download/server/bedrock/";

/// File name of a server archive; group 1 captures the version
pub const BDS_ZIP_FILE_PATTERN: &str = r"bedrock-server-([0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)\.zip";

/// Download link searched for in the page body
pub const DEFAULT_ZIP_URL_PATTERN: &str = concat!(
    r"https://minecraft\.azureedge\.net/bin-linux/",
    r"bedrock-server-([0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)\.zip"
);

/// Timeout for HTTP requests in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("mcbdsc/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Layout of the root directory
// =============================================================================

/// Subdirectory of the root directory holding downloaded archives
pub const DOWNLOADS_DIR: &str = "downloads";

/// Settings file looked up in the root directory
pub const CONFIG_FILE_NAME: &str = "mcbdsc.json";

/// Image repository, tags are `{repository}:{version}`
pub const DEFAULT_REPOSITORY: &str = "bedrock";

/// Build descriptor file name inside the root directory
pub const DEFAULT_DOCKERFILE: &str = "Dockerfile";

/// Container engine program used for image builds
pub const DEFAULT_ENGINE: &str = "docker";

/// Tool settings, read from `mcbdsc.json`
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub download: DownloadSettings,
    pub image: ImageSettings,
}

/// Where and how the server archive is discovered
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DownloadSettings {
    pub page_url: String,
    pub zip_url_pattern: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            zip_url_pattern: DEFAULT_ZIP_URL_PATTERN.to_string(),
            timeout_ms: FETCH_TIMEOUT_MS,
        }
    }
}

/// Container image build settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageSettings {
    pub repository: String,
    pub dockerfile: String,
    pub engine: String,
    /// Extra build arguments, applied after the built-in ones
    pub build_args: BTreeMap<String, String>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            dockerfile: DEFAULT_DOCKERFILE.to_string(),
            engine: DEFAULT_ENGINE.to_string(),
            build_args: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        serde_json::from_str(&content)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }
}

/// Returns the default root directory for the current OS.
pub fn default_root_dir() -> PathBuf {
    root_dir_for_os(std::env::consts::OS)
}

/// Returns the settings file path inside `root_dir`.
pub fn config_path(root_dir: &Path) -> PathBuf {
    root_dir.join(CONFIG_FILE_NAME)
}

fn root_dir_for_os(os: &str) -> PathBuf {
    match os {
        "windows" => PathBuf::from(r"c:\mcbdsc"),
        _ => PathBuf::from("/var/lib/mcbdsc"),
    }
}
