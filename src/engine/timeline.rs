//! Per-file size history across a version range

use super::size_map::parse_size;
use crate::snapshot::{normalize_path, CsvTable};
use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Size of one file in one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Version identifier
    pub version: String,
    /// Metric value, 0 when the file or snapshot is missing
    pub size: u64,
    /// Whether the file was found in that version's snapshot
    pub exists: bool,
}

impl TimelinePoint {
    fn missing(version: &str) -> Self {
        Self {
            version: version.to_string(),
            size: 0,
            exists: false,
        }
    }
}

/// Look up a file's metric in a snapshot
///
/// Returns `None` when no row's normalized identity matches `file_key`.
/// A matching row without the metric column reports size 0.
pub fn lookup_size(table: &CsvTable, file_key: &str, metric: &str) -> Option<u64> {
    let identity = table.identity_column()?;
    let target = normalize_path(file_key);

    table
        .records()
        .filter(|record| {
            record
                .get(identity)
                .is_some_and(|path| normalize_path(path) == target)
        })
        .last()
        .map(|record| record.get(metric).map_or(0, parse_size))
}

/// Build the size history of one file
///
/// `versions` must already be in ascending order. `load` returns the snapshot
/// for a version; a failed load or a missing file yields a point with
/// `exists: false` instead of failing the whole timeline.
///
/// # Examples
///
/// ```
/// use size_analyzer::engine::build_timeline;
/// use size_analyzer::snapshot::CsvTable;
/// use std::sync::Arc;
///
/// let versions = vec!["1.0".to_string(), "1.1".to_string()];
/// let points = build_timeline("lib/a.o", &versions, "vmsize", |version| {
///     match version {
///         "1.0" => Ok(Arc::new(CsvTable::parse("compileunits,vmsize\nlib/a.o,10\n"))),
///         _ => anyhow::bail!("no data"),
///     }
/// });
/// assert_eq!(points[0].size, 10);
/// assert!(!points[1].exists);
/// ```
pub fn build_timeline<F>(
    file_key: &str,
    versions: &[String],
    metric: &str,
    mut load: F,
) -> Vec<TimelinePoint>
where
    F: FnMut(&str) -> Result<Arc<CsvTable>>,
{
    versions
        .iter()
        .map(|version| match load(version) {
            Ok(table) => match lookup_size(&table, file_key, metric) {
                Some(size) => TimelinePoint {
                    version: version.clone(),
                    size,
                    exists: true,
                },
                None => {
                    debug!("{} not present in {}", file_key, version);
                    TimelinePoint::missing(version)
                }
            },
            Err(e) => {
                warn!("Snapshot for {} unavailable: {:#}", version, e);
                TimelinePoint::missing(version)
            }
        })
        .collect()
}
