use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid server version: {0:?}")]
pub struct ParseVersionError(pub String);

/// Dotted numeric server version such as "1.16.201.02"
///
/// Components compare as integers, left to right, so "1.10.3.4" is newer
/// than "1.2.3.4". Leading zeros are insignificant ("05" == "5").
#[derive(Debug, Clone)]
pub struct BdsVersion {
    components: Vec<u64>,
    original: String,
}

impl BdsVersion {
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl FromStr for BdsVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                part.parse::<u64>().ok()
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ParseVersionError(s.to_string()))?;

        Ok(Self {
            components,
            original: s.to_string(),
        })
    }
}

impl fmt::Display for BdsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for BdsVersion {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for BdsVersion {}

impl Ord for BdsVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

impl PartialOrd for BdsVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two version strings numerically
///
/// Strings that are not dotted numbers order before every valid version.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = a.parse::<BdsVersion>().ok();
    let b = b.parse::<BdsVersion>().ok();
    a.cmp(&b)
}

/// Sort versions in place, ascending unless `reverse` is set
pub fn sort_versions(versions: &mut [String], reverse: bool) {
    versions.sort_by(|a, b| {
        let ordering = compare_versions(a, b);
        if reverse { ordering.reverse() } else { ordering }
    });
}
