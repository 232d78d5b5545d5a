//! Version ordering
//!
//! Versions are dot-separated numeric components of possibly unequal length
//! (`1.2.166`, `1.10`). The shorter side is padded with zeros, so `1.2` and
//! `1.2.0` sort together. Release-feed suffixes order pre-releases first:
//! `1.9.0-alpha` < `1.9.0-beta` < `1.9.0`.
//!
//! Ordering only. Whether two identifiers name the same snapshot is a plain
//! string match, see [`crate::index::AnalysisIndex::contains`].

use std::cmp::Ordering;
use std::fmt;

/// Release stage parsed from a `-suffix`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum ReleaseStage {
    /// `-alpha`
    Alpha,
    /// `-beta`
    Beta,
    /// No suffix, or a suffix we do not rank
    Stable,
}

/// A parsed, comparable version identifier
///
/// # Examples
///
/// ```
/// use size_analyzer::version::Version;
///
/// assert!(Version::parse("1.2.166") < Version::parse("1.10.0"));
/// assert_eq!(Version::parse("1.2.0"), Version::parse("1.2"));
/// assert!(Version::parse("2.0") > Version::parse("1.9.9"));
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    components: Vec<u64>,
    stage: ReleaseStage,
}

impl Version {
    /// Parse a version string; non-numeric components count as 0
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (base, suffix) = match trimmed.split_once('-') {
            Some((base, suffix)) => (base, Some(suffix)),
            None => (trimmed, None),
        };

        let components = base.split('.').map(leading_number).collect();
        let stage = match suffix.map(str::to_ascii_lowercase).as_deref() {
            Some("alpha") => ReleaseStage::Alpha,
            Some("beta") => ReleaseStage::Beta,
            _ => ReleaseStage::Stable,
        };

        Self {
            raw: raw.to_string(),
            components,
            stage,
        }
    }
}

fn leading_number(component: &str) -> u64 {
    let component = component.trim();
    let end = component
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(component.len());
    component[..end].parse().unwrap_or(0)
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        self.stage.cmp(&other.stage)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compare two version strings
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    Version::parse(a).cmp(&Version::parse(b))
}

/// Sort version strings ascending (stable for equal versions)
pub fn sort_versions<S: AsRef<str>>(versions: &mut [S]) {
    versions.sort_by(|a, b| compare_versions(a.as_ref(), b.as_ref()));
}

/// Every version between `from` and `to` inclusive, ascending
///
/// The bounds may be given in either order and need not be present in
/// `versions` themselves.
///
/// # Examples
///
/// ```
/// use size_analyzer::version::versions_between;
///
/// let all = ["1.9.2", "1.9.0", "1.10.0", "1.9.1", "1.8.0"];
/// assert_eq!(
///     versions_between(&all, "1.10.0", "1.9.1"),
///     vec!["1.9.1", "1.9.2", "1.10.0"]
/// );
/// ```
pub fn versions_between<S: AsRef<str>>(versions: &[S], from: &str, to: &str) -> Vec<String> {
    let (mut low, mut high) = (Version::parse(from), Version::parse(to));
    if low > high {
        std::mem::swap(&mut low, &mut high);
    }

    let mut selected: Vec<String> = versions
        .iter()
        .map(AsRef::as_ref)
        .filter(|v| {
            let v = Version::parse(v);
            v >= low && v <= high
        })
        .map(str::to_string)
        .collect();
    sort_versions(&mut selected);
    selected
}

/// The `count` most recent versions, ascending
pub fn most_recent<S: AsRef<str>>(versions: &[S], count: usize) -> Vec<String> {
    let mut sorted: Vec<String> = versions.iter().map(|v| v.as_ref().to_string()).collect();
    sort_versions(&mut sorted);
    let skip = sorted.len().saturating_sub(count);
    sorted.split_off(skip)
}
