//! Analysis index: which versions exist for which platform
//!
//! The index file has historically listed versions either as bare strings or
//! as `{"version": ..., "sha1": ...}` objects, and platforms either wrapped in
//! `{"versions": [...]}` or mapped straight to the list. All shapes are folded
//! into one canonical [`AnalysisIndex`] at load time.

use crate::version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One version entry for a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version identifier, e.g. `1.9.3`
    pub version: String,
    /// Content hash of the analyzed release, when recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersionEntry {
    Bare(String),
    Detailed {
        version: String,
        #[serde(default)]
        sha1: Option<String>,
    },
}

impl From<RawVersionEntry> for VersionInfo {
    fn from(raw: RawVersionEntry) -> Self {
        match raw {
            RawVersionEntry::Bare(version) => Self {
                version,
                sha1: None,
            },
            RawVersionEntry::Detailed { version, sha1 } => Self { version, sha1 },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPlatformEntry {
    Wrapped { versions: Vec<RawVersionEntry> },
    List(Vec<RawVersionEntry>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIndex {
    Wrapped {
        platforms: BTreeMap<String, RawPlatformEntry>,
    },
    Flat(BTreeMap<String, RawPlatformEntry>),
}

/// Platform name → versions, each list sorted ascending
///
/// # Examples
///
/// ```
/// use size_analyzer::index::AnalysisIndex;
///
/// let json = r#"{"platforms": {
///     "arm64-android": {"versions": [{"version": "1.9.1", "sha1": "abc"}, "1.9.0"]}
/// }}"#;
/// let index = AnalysisIndex::from_json(json).unwrap();
/// let versions: Vec<_> = index.version_names("arm64-android").unwrap();
/// assert_eq!(versions, vec!["1.9.0", "1.9.1"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisIndex {
    platforms: BTreeMap<String, Vec<VersionInfo>>,
}

impl AnalysisIndex {
    /// Parse an index document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawIndex = serde_json::from_str(json)?;
        let platforms = match raw {
            RawIndex::Wrapped { platforms } | RawIndex::Flat(platforms) => platforms,
        };

        let platforms = platforms
            .into_iter()
            .map(|(name, entry)| {
                let raw_versions = match entry {
                    RawPlatformEntry::Wrapped { versions } | RawPlatformEntry::List(versions) => {
                        versions
                    }
                };
                let mut versions: Vec<VersionInfo> =
                    raw_versions.into_iter().map(VersionInfo::from).collect();
                versions.sort_by(|a, b| version::compare_versions(&a.version, &b.version));
                (name, versions)
            })
            .collect();

        Ok(Self { platforms })
    }

    /// Build an index directly from version lists
    pub fn from_platforms<I, P, V>(platforms: I) -> Self
    where
        I: IntoIterator<Item = (P, Vec<V>)>,
        P: Into<String>,
        V: Into<String>,
    {
        let platforms = platforms
            .into_iter()
            .map(|(name, versions)| {
                let mut versions: Vec<VersionInfo> = versions
                    .into_iter()
                    .map(|v| VersionInfo {
                        version: v.into(),
                        sha1: None,
                    })
                    .collect();
                versions.sort_by(|a, b| version::compare_versions(&a.version, &b.version));
                (name.into(), versions)
            })
            .collect();
        Self { platforms }
    }

    /// Platform names, sorted
    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.platforms.keys().map(String::as_str)
    }

    /// Versions for a platform, ascending
    pub fn versions(&self, platform: &str) -> Option<&[VersionInfo]> {
        self.platforms.get(platform).map(Vec::as_slice)
    }

    /// Version identifiers for a platform, ascending
    pub fn version_names(&self, platform: &str) -> Option<Vec<&str>> {
        self.versions(platform)
            .map(|versions| versions.iter().map(|v| v.version.as_str()).collect())
    }

    /// Whether the platform lists exactly `version`
    ///
    /// Identifiers are matched as written (ignoring surrounding whitespace);
    /// snapshots are stored under that exact name.
    pub fn contains(&self, platform: &str, version: &str) -> bool {
        let wanted = version.trim();
        self.versions(platform)
            .is_some_and(|versions| versions.iter().any(|v| v.version.trim() == wanted))
    }

    /// The `count` most recent versions for a platform, ascending
    pub fn recent(&self, platform: &str, count: usize) -> Vec<String> {
        self.version_names(platform)
            .map(|names| version::most_recent(&names, count))
            .unwrap_or_default()
    }

    /// Versions between `from` and `to` inclusive, ascending
    pub fn versions_between(&self, platform: &str, from: &str, to: &str) -> Vec<String> {
        self.version_names(platform)
            .map(|names| version::versions_between(&names, from, to))
            .unwrap_or_default()
    }
}
