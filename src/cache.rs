//! Parsed snapshot cache
//!
//! Keyed by (platform, version). Entries are never replaced once inserted;
//! the cache only grows until [`SnapshotCache::clear`] is called. The lock
//! is held across a load, so concurrent misses for any key wait for the
//! in-flight load instead of fetching twice.

use crate::snapshot::CsvTable;
use anyhow::Result;
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type CacheKey = (String, String);

/// Append-only cache of parsed snapshots
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: Mutex<HashMap<CacheKey, Arc<CsvTable>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that triggered a load
    pub misses: u64,
    /// Snapshots currently held
    pub entries: usize,
}

impl SnapshotCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot or load, parse and insert it
    ///
    /// A failed load is returned to the caller and leaves the cache unchanged,
    /// so the next lookup retries.
    ///
    /// # Examples
    ///
    /// ```
    /// use size_analyzer::cache::SnapshotCache;
    ///
    /// let cache = SnapshotCache::new();
    /// let first = cache.get_or_load("linux", "1.0", || Ok("filename,size\na,1\n".to_string()))?;
    /// let second = cache.get_or_load("linux", "1.0", || anyhow::bail!("not called"))?;
    /// assert_eq!(first.len(), second.len());
    /// assert_eq!(cache.stats().hits, 1);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn get_or_load<F>(&self, platform: &str, version: &str, load: F) -> Result<Arc<CsvTable>>
    where
        F: FnOnce() -> Result<String>,
    {
        let key = (platform.to_string(), version.to_string());
        let mut entries = self.entries.lock();

        if let Some(table) = entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Cache hit for {} {}", platform, version);
            return Ok(Arc::clone(table));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Cache miss for {} {}", platform, version);

        let table = Arc::new(CsvTable::parse(&load()?));
        entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Whether a snapshot is cached
    pub fn contains(&self, platform: &str, version: &str) -> bool {
        self.entries
            .lock()
            .contains_key(&(platform.to_string(), version.to_string()))
    }

    /// Number of cached snapshots
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every cached snapshot; counters are kept
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        debug!("Clearing {} cached snapshots", entries.len());
        entries.clear();
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
