//! Where snapshots and the analysis index come from
//!
//! A [`SnapshotSource`] hands back raw text. Parsing and caching happen in
//! [`crate::cache::SnapshotCache`]; the source only fetches.

use crate::config::{DEFAULT_DATA_DIR, DEFAULT_INDEX_FILE};
use crate::error::SizeAnalyzerError;
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::Result;
use log::debug;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provides raw CSV snapshots and the raw analysis index
pub trait SnapshotSource {
    /// Raw CSV text for one platform and version
    fn load_snapshot(&self, platform: &str, version: &str) -> Result<String>;

    /// Raw JSON text of the analysis index
    fn load_index(&self) -> Result<String>;
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for &S {
    fn load_snapshot(&self, platform: &str, version: &str) -> Result<String> {
        (**self).load_snapshot(platform, version)
    }

    fn load_index(&self) -> Result<String> {
        (**self).load_index()
    }
}

/// Reads `<data-dir>/<platform>/<version>.csv` and `<data-dir>/<index-file>`
#[derive(Debug, Clone)]
pub struct FsSnapshotSource<FS: FileSystem = RealFileSystem> {
    data_dir: PathBuf,
    index_file: String,
    fs: FS,
}

impl FsSnapshotSource<RealFileSystem> {
    /// Source over the real filesystem
    pub fn new(data_dir: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self::with_fs(data_dir, index_file, RealFileSystem)
    }
}

impl Default for FsSnapshotSource<RealFileSystem> {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR, DEFAULT_INDEX_FILE)
    }
}

impl<FS: FileSystem> FsSnapshotSource<FS> {
    /// Source over a custom filesystem implementation
    pub fn with_fs(data_dir: impl Into<PathBuf>, index_file: impl Into<String>, fs: FS) -> Self {
        Self {
            data_dir: data_dir.into(),
            index_file: index_file.into(),
            fs,
        }
    }

    /// Root directory of the snapshots
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the CSV for a platform and version
    pub fn snapshot_path(&self, platform: &str, version: &str) -> PathBuf {
        self.data_dir
            .join(platform)
            .join(format!("{}.csv", version))
    }

    /// Path of the analysis index
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_file)
    }
}

// Platform and version names become path segments.
fn is_plain_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

impl<FS: FileSystem> SnapshotSource for FsSnapshotSource<FS> {
    fn load_snapshot(&self, platform: &str, version: &str) -> Result<String> {
        if !is_plain_segment(platform) || !is_plain_segment(version) {
            return Err(SizeAnalyzerError::SnapshotUnavailable {
                platform: platform.to_string(),
                version: version.to_string(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "platform and version must not contain path separators",
                ),
            }
            .into());
        }

        let path = self.snapshot_path(platform, version);
        debug!("Reading snapshot {}", path.display());
        self.fs.read_to_string(&path).map_err(|source| {
            SizeAnalyzerError::SnapshotUnavailable {
                platform: platform.to_string(),
                version: version.to_string(),
                source,
            }
            .into()
        })
    }

    fn load_index(&self) -> Result<String> {
        let path = self.index_path();
        debug!("Reading analysis index {}", path.display());
        self.fs
            .read_to_string(&path)
            .map_err(|source| SizeAnalyzerError::IndexUnavailable { path, source }.into())
    }
}

/// In-memory source, for embedding and tests
#[derive(Debug, Default)]
pub struct MemorySnapshotSource {
    index: Option<String>,
    snapshots: HashMap<(String, String), String>,
    loads: AtomicUsize,
}

impl MemorySnapshotSource {
    /// Empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw index JSON
    pub fn with_index(mut self, json: impl Into<String>) -> Self {
        self.index = Some(json.into());
        self
    }

    /// Add a raw CSV snapshot
    pub fn with_snapshot(
        mut self,
        platform: impl Into<String>,
        version: impl Into<String>,
        csv: impl Into<String>,
    ) -> Self {
        self.snapshots
            .insert((platform.into(), version.into()), csv.into());
        self
    }

    /// Number of snapshot loads served so far, successful or not
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl SnapshotSource for MemorySnapshotSource {
    fn load_snapshot(&self, platform: &str, version: &str) -> Result<String> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.snapshots
            .get(&(platform.to_string(), version.to_string()))
            .cloned()
            .ok_or_else(|| {
                SizeAnalyzerError::SnapshotUnavailable {
                    platform: platform.to_string(),
                    version: version.to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no such snapshot"),
                }
                .into()
            })
    }

    fn load_index(&self) -> Result<String> {
        self.index.clone().ok_or_else(|| {
            SizeAnalyzerError::IndexUnavailable {
                path: PathBuf::from("<memory>"),
                source: io::Error::new(io::ErrorKind::NotFound, "no index configured"),
            }
            .into()
        })
    }
}
