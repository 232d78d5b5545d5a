//! Application context tying sources, cache, index and settings together
//!
//! [`AnalyzerContext`] is the one place that performs I/O. Each operation
//! loads what it needs through the [`SnapshotCache`] and hands parsed
//! snapshots to the pure engine.

use crate::cache::SnapshotCache;
use crate::config::{ConfigFile, SizeBudget, DEFAULT_RECENT_VERSIONS};
use crate::engine::{
    build_timeline, BudgetChecker, BudgetResult, Comparison, ComparisonSummary, MetricComparator,
    MoveDetector, TimelinePoint, DEFAULT_MOVE_TOLERANCE,
};
use crate::error::SizeAnalyzerError;
use crate::index::AnalysisIndex;
use crate::request::ComparisonRequest;
use crate::snapshot::CsvTable;
use crate::source::{FsSnapshotSource, SnapshotSource};
use anyhow::{Context, Result};
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;

/// Effective analysis settings after config and flag overrides
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Classification threshold in bytes
    pub threshold: u64,
    /// Preferred metric
    pub metric: Option<String>,
    /// Move detection tolerance
    pub move_tolerance: f64,
    /// Size of the default version range
    pub recent_versions: usize,
    /// Budget limits
    pub budget: SizeBudget,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            threshold: 0,
            metric: None,
            move_tolerance: DEFAULT_MOVE_TOLERANCE,
            recent_versions: DEFAULT_RECENT_VERSIONS,
            budget: SizeBudget::default(),
        }
    }
}

impl From<&ConfigFile> for AnalysisSettings {
    fn from(config: &ConfigFile) -> Self {
        Self {
            threshold: config.threshold,
            metric: config.metric.clone(),
            move_tolerance: config.move_tolerance,
            recent_versions: config.recent_versions,
            budget: config.budget.clone().unwrap_or_default(),
        }
    }
}

/// Owns the snapshot source, cache and lazily loaded index
pub struct AnalyzerContext<S: SnapshotSource> {
    source: S,
    settings: AnalysisSettings,
    cache: SnapshotCache,
    index: Mutex<Option<Arc<AnalysisIndex>>>,
    platform: Mutex<Option<String>>,
}

impl AnalyzerContext<FsSnapshotSource> {
    /// Context reading from the data directory named in `config`
    pub fn from_config(config: &ConfigFile) -> Self {
        Self::new(
            FsSnapshotSource::new(&config.data_dir, &config.index_file),
            AnalysisSettings::from(config),
        )
    }
}

impl<S: SnapshotSource> AnalyzerContext<S> {
    /// Create a context
    pub fn new(source: S, settings: AnalysisSettings) -> Self {
        Self {
            source,
            settings,
            cache: SnapshotCache::new(),
            index: Mutex::new(None),
            platform: Mutex::new(None),
        }
    }

    /// Effective settings
    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Snapshot cache, for diagnostics
    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// The analysis index, loaded on first use
    ///
    /// A failed load is not remembered.
    pub fn index(&self) -> Result<Arc<AnalysisIndex>> {
        let mut slot = self.index.lock();
        if let Some(index) = slot.as_ref() {
            return Ok(Arc::clone(index));
        }

        let raw = self.source.load_index()?;
        let index = AnalysisIndex::from_json(&raw).map_err(|e| {
            SizeAnalyzerError::InvalidIndex {
                reason: e.to_string(),
            }
        })?;
        info!(
            "Loaded analysis index with {} platform(s)",
            index.platforms().count()
        );

        let index = Arc::new(index);
        *slot = Some(Arc::clone(&index));
        Ok(index)
    }

    /// The index if one exists; a malformed index is still an error
    pub fn try_index(&self) -> Result<Option<Arc<AnalysisIndex>>> {
        match self.index() {
            Ok(index) => Ok(Some(index)),
            Err(e)
                if matches!(
                    e.downcast_ref::<SizeAnalyzerError>(),
                    Some(SizeAnalyzerError::IndexUnavailable { .. })
                ) =>
            {
                debug!("Proceeding without analysis index: {:#}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Platform whose snapshots are currently cached
    pub fn current_platform(&self) -> Option<String> {
        self.platform.lock().clone()
    }

    /// Make `platform` current, clearing the cache when it changes
    ///
    /// Returns whether the platform changed.
    pub fn switch_platform(&self, platform: &str) -> bool {
        let mut current = self.platform.lock();
        if current.as_deref() == Some(platform) {
            return false;
        }
        if current.is_some() {
            info!("Switching platform to {}", platform);
            self.cache.clear();
        }
        *current = Some(platform.to_string());
        true
    }

    /// Parsed snapshot for a platform and version
    pub fn snapshot(&self, platform: &str, version: &str) -> Result<Arc<CsvTable>> {
        self.switch_platform(platform);
        self.cache.get_or_load(platform, version, || {
            self.source.load_snapshot(platform, version)
        })
    }

    /// Metric columns of one snapshot
    pub fn metrics(&self, platform: &str, version: &str) -> Result<Vec<String>> {
        Ok(self.snapshot(platform, version)?.metric_columns())
    }

    /// Versions for a platform, ascending
    pub fn versions(&self, platform: &str) -> Result<Vec<String>> {
        let index = self.index()?;
        let names = index
            .version_names(platform)
            .ok_or_else(|| unknown_platform(&index, platform))?;
        Ok(names.into_iter().map(str::to_string).collect())
    }

    /// The configured number of most recent versions
    pub fn recent_versions(&self, platform: &str) -> Result<Vec<String>> {
        let index = self.index()?;
        if index.versions(platform).is_none() {
            return Err(unknown_platform(&index, platform).into());
        }
        Ok(index.recent(platform, self.settings.recent_versions))
    }

    /// The two most recent versions, oldest first
    pub fn default_pair(&self, platform: &str) -> Result<Option<(String, String)>> {
        let index = self.index()?;
        if index.versions(platform).is_none() {
            return Err(unknown_platform(&index, platform).into());
        }
        let mut recent = index.recent(platform, 2).into_iter();
        Ok(match (recent.next(), recent.next()) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        })
    }

    fn comparator(&self) -> MetricComparator {
        MetricComparator::new(MoveDetector::new(self.settings.move_tolerance))
    }

    fn load_pair(&self, request: &ComparisonRequest) -> Result<(Arc<CsvTable>, Arc<CsvTable>)> {
        let index = self.try_index()?;
        request.validate(index.as_deref())?;

        let before = self
            .snapshot(&request.platform, &request.from)
            .with_context(|| format!("Failed to load baseline {}", request.from))?;
        let after = self
            .snapshot(&request.platform, &request.to)
            .with_context(|| format!("Failed to load {}", request.to))?;
        Ok((before, after))
    }

    /// Pick the metric to compare
    ///
    /// Order: `requested`, then the configured metric, then the first metric
    /// column of `before` (or `after` when `before` has none).
    pub fn resolve_metric(
        &self,
        before: &CsvTable,
        after: &CsvTable,
        requested: Option<&str>,
    ) -> Result<String, SizeAnalyzerError> {
        let mut available = before.metric_columns();
        for metric in after.metric_columns() {
            if !available.contains(&metric) {
                available.push(metric);
            }
        }

        let chosen = requested
            .or(self.settings.metric.as_deref())
            .map(str::to_string)
            .or_else(|| available.first().cloned());

        match chosen {
            Some(metric) if available.contains(&metric) => Ok(metric),
            chosen => Err(SizeAnalyzerError::UnknownMetric {
                metric: chosen.unwrap_or_default(),
                available,
            }),
        }
    }

    /// Compare two versions on one metric
    pub fn compare(&self, request: &ComparisonRequest, metric: Option<&str>) -> Result<Comparison> {
        let (before, after) = self.load_pair(request)?;
        let metric = self.resolve_metric(&before, &after, metric)?;
        info!(
            "Comparing {} {} -> {} on {}",
            request.platform, request.from, request.to, metric
        );
        Ok(self.comparator().compare_tables(&before, &after, &metric, None))
    }

    /// Compare two versions on every metric column
    pub fn compare_all(&self, request: &ComparisonRequest) -> Result<Vec<Comparison>> {
        let (before, after) = self.load_pair(request)?;
        Ok(self.comparator().compare_all_metrics(&before, &after, None))
    }

    /// Summary of a comparison under the configured threshold
    pub fn summary(
        &self,
        request: &ComparisonRequest,
        metric: Option<&str>,
    ) -> Result<ComparisonSummary> {
        Ok(self.compare(request, metric)?.summary(self.settings.threshold))
    }

    /// Check a comparison against the configured budget
    pub fn check_budget(&self, comparison: &Comparison) -> BudgetResult {
        BudgetChecker::new(self.settings.budget.clone()).check(comparison)
    }

    /// Size history of one file between two versions
    pub fn timeline(
        &self,
        platform: &str,
        file_key: &str,
        from: &str,
        to: &str,
        metric: &str,
    ) -> Result<Vec<TimelinePoint>> {
        self.timeline_with_progress(platform, file_key, from, to, metric, |_| {})
    }

    /// Same as [`Self::timeline`], calling `progress` before each version loads
    pub fn timeline_with_progress<P>(
        &self,
        platform: &str,
        file_key: &str,
        from: &str,
        to: &str,
        metric: &str,
        mut progress: P,
    ) -> Result<Vec<TimelinePoint>>
    where
        P: FnMut(&str),
    {
        let versions = self.timeline_versions(platform, from, to)?;
        debug!(
            "Timeline for {} over {} version(s)",
            file_key,
            versions.len()
        );

        Ok(build_timeline(file_key, &versions, metric, |version| {
            progress(version);
            self.snapshot(platform, version)
        }))
    }

    /// Known versions between `from` and `to`, inclusive and ascending
    ///
    /// Both ends must be listed in the index.
    pub fn timeline_versions(&self, platform: &str, from: &str, to: &str) -> Result<Vec<String>> {
        let index = self.index()?;
        if index.versions(platform).is_none() {
            return Err(unknown_platform(&index, platform).into());
        }
        for version in [from, to] {
            if !index.contains(platform, version) {
                return Err(SizeAnalyzerError::UnknownVersion {
                    platform: platform.to_string(),
                    version: version.to_string(),
                }
                .into());
            }
        }
        Ok(index.versions_between(platform, from, to))
    }
}

fn unknown_platform(index: &AnalysisIndex, platform: &str) -> SizeAnalyzerError {
    SizeAnalyzerError::UnknownPlatform {
        platform: platform.to_string(),
        available: index.platforms().map(str::to_string).collect(),
    }
}
