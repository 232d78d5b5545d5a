//! Per-file size records and insertion-ordered size maps

use super::moves::MoveInfo;
use crate::snapshot::{normalize_path, CsvTable};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One file's metrics in one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeRecord {
    /// Normalized identity
    pub file_key: String,
    /// Path as written in the snapshot
    pub original_path: String,
    /// Metric name → value
    pub metric_values: BTreeMap<String, u64>,
}

impl SizeRecord {
    /// Build records for every row of a table
    ///
    /// `identity` overrides the detected identity column. Rows without an
    /// identity value are skipped.
    pub fn from_table(table: &CsvTable, identity: Option<&str>) -> Vec<Self> {
        let Some(identity) = identity.or_else(|| table.identity_column()) else {
            return Vec::new();
        };

        table
            .records()
            .filter_map(|record| {
                let original_path = record.get(identity)?;
                let metric_values = record
                    .iter()
                    .filter(|(column, _)| *column != identity)
                    .map(|(column, value)| (column.to_string(), parse_size(value)))
                    .collect();
                Some(Self {
                    file_key: normalize_path(original_path),
                    original_path: original_path.to_string(),
                    metric_values,
                })
            })
            .collect()
    }

    /// Value for a metric, 0 when absent
    pub fn metric(&self, name: &str) -> u64 {
        self.metric_values.get(name).copied().unwrap_or(0)
    }
}

/// Parse a metric cell; missing or non-numeric values become 0
///
/// Fractional values are truncated.
pub fn parse_size(raw: &str) -> u64 {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return value;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value as u64,
        _ => 0,
    }
}

/// Size of one file for one metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeEntry {
    /// Metric value
    pub size: u64,
    /// Path as written in the snapshot
    pub original_path: String,
    /// Set when the entry is the merged result of a detected move
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_info: Option<MoveInfo>,
}

impl SizeEntry {
    /// Plain entry with no move information
    pub fn new(size: u64, original_path: impl Into<String>) -> Self {
        Self {
            size,
            original_path: original_path.into(),
            move_info: None,
        }
    }
}

/// File key → [`SizeEntry`], iterated in first-insertion order
///
/// Re-inserting an existing key replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeMap {
    order: Vec<String>,
    entries: HashMap<String, SizeEntry>,
}

impl SizeMap {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Project records onto one metric
    pub fn from_records(records: &[SizeRecord], metric: &str) -> Self {
        let mut map = Self::new();
        for record in records {
            map.insert(
                record.file_key.clone(),
                SizeEntry::new(record.metric(metric), record.original_path.clone()),
            );
        }
        map
    }

    /// Build directly from `(path, size)` pairs, normalizing each path
    pub fn from_sizes<I, P>(sizes: I) -> Self
    where
        I: IntoIterator<Item = (P, u64)>,
        P: AsRef<str>,
    {
        let mut map = Self::new();
        for (path, size) in sizes {
            let path = path.as_ref();
            map.insert(normalize_path(path), SizeEntry::new(size, path));
        }
        map
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entry for a key
    pub fn get(&self, key: &str) -> Option<&SizeEntry> {
        self.entries.get(key)
    }

    /// Insert or replace; new keys go to the end
    pub fn insert(&mut self, key: String, entry: SizeEntry) {
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, entry);
    }

    /// Remove a key, preserving the order of the rest
    pub fn remove(&mut self, key: &str) -> Option<SizeEntry> {
        let entry = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(entry)
    }

    /// Keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// (key, entry) pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SizeEntry)> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(k).map(|e| (k.as_str(), e)))
    }
}
