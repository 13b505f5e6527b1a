//! Command line surface: `install`, `download`, `build` and `versions`

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::bedrock::download::DownloadCache;
use crate::bedrock::http::ReqwestClient;
use crate::bedrock::local::local_versions;
use crate::bedrock::resolver::DownloadTarget;
use crate::config::{DEFAULT_DOCKERFILE, DOWNLOADS_DIR, Settings, config_path, default_root_dir};
use crate::container::backend::ImageHandle;
use crate::container::docker::DockerCli;
use crate::container::manager::ImageManager;
use crate::logging::LogConfig;

/// Build descriptor written by `install`
const DEFAULT_DOCKERFILE_CONTENT: &str = include_str!("../assets/Dockerfile");

#[derive(Debug, Parser)]
#[command(name = "mcbdsc")]
#[command(
    version,
    about = "This project provides very easy setup and management for Minecraft Bedrock Dedicated Server."
)]
pub struct Cli {
    /// Show verbose messages
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            debug: self.debug,
            file: self.log_file.clone(),
            json: self.log_json,
        }
    }
}

/// Arguments shared by every subcommand
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// This directory is used for container management and storage of download files
    #[arg(short, long, env = "MCBDSC_ROOT_DIR", default_value_os_t = default_root_dir())]
    pub root_dir: PathBuf,

    /// You have to agree to the MEULA and Privacy Policy to download the Bedrock Server.
    /// If you specify this argument, you agree to them.
    #[arg(long = "i-agree-to-meula-and-pp")]
    pub agree_to_meula_and_pp: bool,

    /// Settings file (defaults to mcbdsc.json in the root directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl CommonArgs {
    pub fn settings(&self) -> Result<Settings> {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| config_path(&self.root_dir));
        Settings::load(&path)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the root and downloads directories and a default Dockerfile
    Install(CommonArgs),
    /// Download the latest Bedrock server archive unless it is already present
    Download(CommonArgs),
    /// Build the server container image
    Build {
        #[command(flatten)]
        common: CommonArgs,

        /// Server version to build (defaults to the latest published version)
        #[arg(short = 'V', long)]
        bedrock_version: Option<String>,
    },
    /// List the server versions downloaded to the root directory
    Versions {
        #[command(flatten)]
        common: CommonArgs,

        /// Newest first
        #[arg(long)]
        reverse: bool,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Install(common) => {
            for path in install(&common.root_dir)? {
                println!("{}", path.display());
            }
        }
        Command::Download(common) => {
            let path = download(&common).await?;
            println!("{}", path.display());
        }
        Command::Build {
            common,
            bedrock_version,
        } => {
            let handle = build(&common, bedrock_version).await?;
            println!("{} {}", handle.tag, handle.id);
        }
        Command::Versions { common, reverse } => {
            let dir = common.root_dir.join(DOWNLOADS_DIR);
            let versions = local_versions(&dir, true, reverse)
                .with_context(|| format!("failed to list {}", dir.display()))?;
            for version in versions {
                println!("{version}");
            }
        }
    }
    Ok(())
}

/// Prepare `root_dir` for use, returning the paths that were created
pub fn install(root_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();

    for dir in [root_dir.to_path_buf(), root_dir.join(DOWNLOADS_DIR)] {
        if mkdir_if_needed(&dir)? {
            created.push(dir);
        }
    }

    let dockerfile = root_dir.join(DEFAULT_DOCKERFILE);
    if !dockerfile.exists() {
        info!("Writing default {}", dockerfile.display());
        std::fs::write(&dockerfile, DEFAULT_DOCKERFILE_CONTENT)
            .with_context(|| format!("failed to write {}", dockerfile.display()))?;
        created.push(dockerfile);
    }

    Ok(created)
}

/// Create `dir` unless it already exists. Returns whether it was created.
fn mkdir_if_needed(dir: &Path) -> Result<bool> {
    if dir.exists() {
        return Ok(false);
    }
    info!("Create a directory: {}", dir.display());
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    Ok(true)
}

fn download_cache(common: &CommonArgs, settings: &Settings) -> Result<DownloadCache> {
    let http = ReqwestClient::new(Duration::from_millis(settings.download.timeout_ms))
        .context("failed to create HTTP client")?;
    let target = DownloadTarget::new(
        &settings.download.page_url,
        &settings.download.zip_url_pattern,
    )?;
    Ok(DownloadCache::new(&common.root_dir, target, Arc::new(http)))
}

async fn download(common: &CommonArgs) -> Result<PathBuf> {
    let settings = common.settings()?;
    let mut cache = download_cache(common, &settings)?;

    let path = cache
        .ensure_latest(common.agree_to_meula_and_pp)
        .await
        .context("failed to download the Bedrock server")?;
    Ok(path)
}

async fn build(common: &CommonArgs, bedrock_version: Option<String>) -> Result<ImageHandle> {
    let settings = common.settings()?;

    let version = match bedrock_version {
        Some(version) => version,
        None => {
            let mut cache = download_cache(common, &settings)?;
            if !cache.exists().await? {
                warn!(
                    "The latest server archive is not in {}, run `mcbdsc download` first",
                    cache.download_dir(false).display()
                );
            }
            cache.resolver().version().await?.to_string()
        }
    };

    let backend = Arc::new(DockerCli::new(&settings.image.engine));
    let manager = ImageManager::new(&common.root_dir, backend)
        .with_dockerfile(&settings.image.dockerfile)
        .with_repository(&settings.image.repository);

    let handle = manager
        .build_image(Some(&version), &settings.image.build_args)
        .await
        .with_context(|| format!("failed to build image for {version}"))?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_build_with_common_args() {
        let cli = Cli::try_parse_from([
            "mcbdsc",
            "-d",
            "build",
            "--root-dir",
            "/srv/mcbdsc",
            "--i-agree-to-meula-and-pp",
            "-V",
            "1.16.201.02",
        ])
        .unwrap();

        assert!(cli.debug);
        match cli.command {
            Command::Build {
                common,
                bedrock_version,
            } => {
                assert_eq!(common.root_dir, PathBuf::from("/srv/mcbdsc"));
                assert!(common.agree_to_meula_and_pp);
                assert_eq!(bedrock_version.as_deref(), Some("1.16.201.02"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_download_without_consent() {
        let cli = Cli::try_parse_from(["mcbdsc", "download", "-r", "/tmp/root"]).unwrap();

        match cli.command {
            Command::Download(common) => {
                assert_eq!(common.root_dir, PathBuf::from("/tmp/root"));
                assert!(!common.agree_to_meula_and_pp);
                assert_eq!(common.config, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn settings_are_read_from_root_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            config_path(temp_dir.path()),
            r#"{ "image": { "engine": "podman" } }"#,
        )
        .unwrap();
        let common = CommonArgs {
            root_dir: temp_dir.path().to_path_buf(),
            agree_to_meula_and_pp: false,
            config: None,
        };

        let settings = common.settings().unwrap();

        assert_eq!(settings.image.engine, "podman");
    }

    #[test]
    fn install_creates_layout_and_dockerfile() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("mcbdsc");

        let created = install(&root).unwrap();

        assert_eq!(
            created,
            vec![
                root.clone(),
                root.join(DOWNLOADS_DIR),
                root.join(DEFAULT_DOCKERFILE)
            ]
        );
        assert!(root.join(DOWNLOADS_DIR).is_dir());
        let dockerfile = std::fs::read_to_string(root.join(DEFAULT_DOCKERFILE)).unwrap();
        assert!(dockerfile.contains("BEDROCK_SERVER_VER"));
        assert!(dockerfile.contains("BEDROCK_SERVER_DIR"));
    }

    #[test]
    fn install_keeps_existing_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join(DEFAULT_DOCKERFILE), "FROM scratch\n").unwrap();

        let created = install(root).unwrap();

        assert_eq!(created, vec![root.join(DOWNLOADS_DIR)]);
        assert_eq!(
            std::fs::read_to_string(root.join(DEFAULT_DOCKERFILE)).unwrap(),
            "FROM scratch\n"
        );
        assert!(install(root).unwrap().is_empty());
    }
}
