//! Inventory of server archives already present in the downloads directory

use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::bedrock::version::sort_versions;
use crate::config::BDS_ZIP_FILE_PATTERN;

static BDS_ZIP_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{BDS_ZIP_FILE_PATTERN}$")).expect("archive file pattern is valid")
});

/// Version of a server archive file name, if the whole name is one
pub fn version_from_filename(filename: &str) -> Option<&str> {
    BDS_ZIP_FILE_RE
        .captures(filename)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Versions of the archives stored in `download_dir`
///
/// Only regular files whose name is exactly `bedrock-server-<version>.zip`
/// are counted. A missing directory has no versions. Without `sort` the
/// order is whatever the filesystem returns.
pub fn local_versions(download_dir: &Path, sort: bool, reverse: bool) -> io::Result<Vec<String>> {
    let entries = match std::fs::read_dir(download_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist yet", download_dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if let Some(version) = name.to_str().and_then(version_from_filename) {
            versions.push(version.to_string());
        }
    }

    if sort {
        sort_versions(&mut versions, reverse);
    }
    Ok(versions)
}

/// Newest archive version stored in `download_dir`
pub fn latest_local_version(download_dir: &Path) -> io::Result<Option<String>> {
    Ok(local_versions(download_dir, true, false)?.pop())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn create_empty_files(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"").unwrap();
        }
    }

    #[rstest]
    #[case("bedrock-server-1.16.201.02.zip", Some("1.16.201.02"))]
    #[case("bedrock-server-1.2.3.4.zip", Some("1.2.3.4"))]
    #[case("bedrock-server-1.2.3.zip", None)]
    #[case("bedrock-server-1.2.3.4.zip.part", None)]
    #[case("old-bedrock-server-1.2.3.4.zip", None)]
    #[case("Dockerfile", None)]
    fn version_from_filename_requires_full_match(
        #[case] filename: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(version_from_filename(filename), expected);
    }

    #[test]
    fn local_versions_returns_sorted_archive_versions() {
        let temp_dir = TempDir::new().unwrap();
        create_empty_files(
            temp_dir.path(),
            &[
                "bedrock-server-1.2.3.4.zip",
                "bedrock-server-1.1.1.1.zip",
                "bedrock-server-4.3.2.1.zip",
                "bedrock-server-1.10.3.4.zip",
                "bedrock-server-1.10.3.05.zip",
                "notes.txt",
            ],
        );
        std::fs::create_dir(temp_dir.path().join("bedrock-server-9.9.9.9.zip")).unwrap();

        let ascending = local_versions(temp_dir.path(), true, false).unwrap();
        let descending = local_versions(temp_dir.path(), true, true).unwrap();

        assert_eq!(
            ascending,
            vec!["1.1.1.1", "1.2.3.4", "1.10.3.4", "1.10.3.05", "4.3.2.1"]
        );
        assert_eq!(
            descending,
            vec!["4.3.2.1", "1.10.3.05", "1.10.3.4", "1.2.3.4", "1.1.1.1"]
        );
    }

    #[test]
    fn local_versions_unsorted_contains_every_archive() {
        let temp_dir = TempDir::new().unwrap();
        create_empty_files(
            temp_dir.path(),
            &["bedrock-server-1.2.3.4.zip", "bedrock-server-1.1.1.1.zip"],
        );

        let mut versions = local_versions(temp_dir.path(), false, false).unwrap();
        versions.sort();

        assert_eq!(versions, vec!["1.1.1.1", "1.2.3.4"]);
    }

    #[test]
    fn local_versions_is_empty_for_missing_directory() {
        let temp_dir = TempDir::new().unwrap();

        let versions = local_versions(&temp_dir.path().join("downloads"), true, false).unwrap();

        assert!(versions.is_empty());
    }

    #[test]
    fn latest_local_version_picks_numerically_highest() {
        let temp_dir = TempDir::new().unwrap();
        create_empty_files(
            temp_dir.path(),
            &["bedrock-server-1.9.0.0.zip", "bedrock-server-1.10.0.0.zip"],
        );

        let latest = latest_local_version(temp_dir.path()).unwrap();

        assert_eq!(latest, Some("1.10.0.0".to_string()));
    }

    #[test]
    fn latest_local_version_is_none_without_archives() {
        let temp_dir = TempDir::new().unwrap();

        assert_eq!(latest_local_version(temp_dir.path()).unwrap(), None);
    }
}
