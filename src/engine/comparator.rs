//! Per-metric comparison of two snapshots
//!
//! Comparison is split in two layers. [`Comparison`] holds threshold-free
//! diffs (sizes, difference, percent change) computed once per version pair
//! and metric. [`Comparison::entries`] projects those diffs through a
//! threshold into classified [`ComparisonEntry`] records, so changing the
//! threshold never re-runs move detection or re-parses snapshots.

use super::moves::{MoveDetector, MoveInfo, MoveMatch};
use super::size_map::{SizeMap, SizeRecord};
use super::summary::ComparisonSummary;
use crate::snapshot::CsvTable;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Classification of a file's size change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// |difference| within threshold
    Unchanged,
    /// Grew by more than the threshold
    Increased,
    /// Shrank by more than the threshold
    Decreased,
}

impl ChangeType {
    /// Classify a byte difference against a threshold
    ///
    /// # Examples
    ///
    /// ```
    /// use size_analyzer::engine::ChangeType;
    ///
    /// assert_eq!(ChangeType::classify(10, 10), ChangeType::Unchanged);
    /// assert_eq!(ChangeType::classify(11, 10), ChangeType::Increased);
    /// assert_eq!(ChangeType::classify(-11, 10), ChangeType::Decreased);
    /// ```
    pub fn classify(difference: i64, threshold: u64) -> Self {
        if difference.unsigned_abs() <= threshold {
            Self::Unchanged
        } else if difference > 0 {
            Self::Increased
        } else {
            Self::Decreased
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Increased => "increased",
            Self::Decreased => "decreased",
        }
    }
}

/// Threshold-independent diff for one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDiff {
    /// Normalized identity (the new path for moved files)
    pub file_key: String,
    /// Size in the before snapshot, 0 when absent
    pub size1: u64,
    /// Size in the after snapshot, 0 when absent
    pub size2: u64,
    /// `size2 - size1`
    pub difference: i64,
    /// Relative change; 100 for new files, 0 when both sides are 0
    pub percent_change: f64,
    /// Present in the before snapshot (after move merging)
    pub in_before: bool,
    /// Present in the after snapshot (after move merging)
    pub in_after: bool,
    /// Set for merged move pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_info: Option<MoveInfo>,
}

impl FileDiff {
    fn new(file_key: &str, before: &SizeMap, after: &SizeMap) -> Self {
        let old = before.get(file_key);
        let new = after.get(file_key);
        let size1 = old.map_or(0, |e| e.size);
        let size2 = new.map_or(0, |e| e.size);
        let difference = size_difference(size1, size2);

        Self {
            file_key: file_key.to_string(),
            size1,
            size2,
            difference,
            percent_change: percent_change(size1, size2),
            in_before: old.is_some(),
            in_after: new.is_some(),
            move_info: new
                .and_then(|e| e.move_info.clone())
                .or_else(|| old.and_then(|e| e.move_info.clone())),
        }
    }

    /// Classification under a threshold
    pub fn classify(&self, threshold: u64) -> ChangeType {
        ChangeType::classify(self.difference, threshold)
    }

    /// Only present in the after snapshot
    pub fn is_added(&self) -> bool {
        self.in_after && !self.in_before
    }

    /// Only present in the before snapshot
    pub fn is_removed(&self) -> bool {
        self.in_before && !self.in_after
    }

    /// Merged from a detected move
    pub fn is_moved(&self) -> bool {
        self.move_info.is_some()
    }
}

/// Signed `size2 - size1`, saturating at the `i64` bounds
pub fn size_difference(size1: u64, size2: u64) -> i64 {
    let difference = i128::from(size2) - i128::from(size1);
    i64::try_from(difference).unwrap_or(if difference < 0 { i64::MIN } else { i64::MAX })
}

/// Percent change from `size1` to `size2`
pub fn percent_change(size1: u64, size2: u64) -> f64 {
    if size1 > 0 {
        (size2 as f64 - size1 as f64) / size1 as f64 * 100.0
    } else if size2 > 0 {
        100.0
    } else {
        0.0
    }
}

/// Classified comparison record for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// Normalized identity
    pub file_key: String,
    /// Size before
    pub size1: u64,
    /// Size after
    pub size2: u64,
    /// `size2 - size1`
    pub difference: i64,
    /// Relative change in percent
    pub percent_change: f64,
    /// Classification under the requested threshold
    pub change_type: ChangeType,
    /// Metric column this entry was computed from
    pub metric_type: String,
    /// Move details for merged entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_info: Option<MoveInfo>,
}

impl ComparisonEntry {
    /// Name to show: the move description, or the file key
    pub fn display_name(&self) -> &str {
        self.move_info
            .as_ref()
            .map_or(self.file_key.as_str(), |m| m.display_name.as_str())
    }
}

/// Diffs for one metric across one version pair
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    metric: String,
    diffs: Vec<FileDiff>,
    moves: Vec<MoveMatch>,
}

impl Comparison {
    /// Metric name
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Diffs sorted by descending |difference|
    pub fn diffs(&self) -> &[FileDiff] {
        &self.diffs
    }

    /// Moves detected while reconciling
    pub fn moves(&self) -> &[MoveMatch] {
        &self.moves
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    /// True when neither snapshot had files
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Classify every diff under `threshold`
    pub fn entries(&self, threshold: u64) -> Vec<ComparisonEntry> {
        self.diffs
            .iter()
            .map(|diff| ComparisonEntry {
                file_key: diff.file_key.clone(),
                size1: diff.size1,
                size2: diff.size2,
                difference: diff.difference,
                percent_change: diff.percent_change,
                change_type: diff.classify(threshold),
                metric_type: self.metric.clone(),
                move_info: diff.move_info.clone(),
            })
            .collect()
    }

    /// Aggregate counts and extrema under `threshold`
    pub fn summary(&self, threshold: u64) -> ComparisonSummary {
        ComparisonSummary::from_diffs(&self.diffs, threshold)
    }
}

/// Builds [`Comparison`]s from snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricComparator {
    detector: MoveDetector,
}

impl MetricComparator {
    /// Create a comparator using the given move detector
    pub fn new(detector: MoveDetector) -> Self {
        Self { detector }
    }

    /// Compare two size maps for one metric
    pub fn compare_maps(&self, before: SizeMap, after: SizeMap, metric: &str) -> Comparison {
        let outcome = self.detector.detect(before, after);
        let (before, after) = (&outcome.before, &outcome.after);

        let mut diffs: Vec<FileDiff> = before
            .keys()
            .chain(after.keys().filter(|k| !before.contains_key(k)))
            .map(|key| FileDiff::new(key, before, after))
            .collect();
        diffs.sort_by(|a, b| b.difference.unsigned_abs().cmp(&a.difference.unsigned_abs()));

        debug!(
            "Compared {} files on '{}' ({} moves)",
            diffs.len(),
            metric,
            outcome.moves.len()
        );

        Comparison {
            metric: metric.to_string(),
            diffs,
            moves: outcome.moves,
        }
    }

    /// Compare two parsed size records for one metric
    pub fn compare_records(
        &self,
        before: &[SizeRecord],
        after: &[SizeRecord],
        metric: &str,
    ) -> Comparison {
        self.compare_maps(
            SizeMap::from_records(before, metric),
            SizeMap::from_records(after, metric),
            metric,
        )
    }

    /// Compare two snapshots for one metric
    ///
    /// `identity` overrides identity-column detection for both tables.
    pub fn compare_tables(
        &self,
        before: &CsvTable,
        after: &CsvTable,
        metric: &str,
        identity: Option<&str>,
    ) -> Comparison {
        self.compare_records(
            &SizeRecord::from_table(before, identity),
            &SizeRecord::from_table(after, identity),
            metric,
        )
    }

    /// Compare and classify in one step
    ///
    /// # Examples
    ///
    /// ```
    /// use size_analyzer::engine::{ChangeType, MetricComparator};
    /// use size_analyzer::snapshot::CsvTable;
    ///
    /// let before = CsvTable::parse("filename,size\na.cpp,100\n");
    /// let after = CsvTable::parse("filename,size\na.cpp,150\n");
    ///
    /// let entries = MetricComparator::default().compare(&before, &after, "size", 10, None);
    /// assert_eq!(entries.len(), 1);
    /// assert_eq!(entries[0].difference, 50);
    /// assert_eq!(entries[0].change_type, ChangeType::Increased);
    /// ```
    pub fn compare(
        &self,
        before: &CsvTable,
        after: &CsvTable,
        metric: &str,
        threshold: u64,
        identity: Option<&str>,
    ) -> Vec<ComparisonEntry> {
        self.compare_tables(before, after, metric, identity)
            .entries(threshold)
    }

    /// Compare every metric column found in either snapshot
    ///
    /// Metrics are ordered as in the before header, followed by any that only
    /// the after header has.
    pub fn compare_all_metrics(
        &self,
        before: &CsvTable,
        after: &CsvTable,
        identity: Option<&str>,
    ) -> Vec<Comparison> {
        let mut metrics = before.metric_columns();
        for metric in after.metric_columns() {
            if !metrics.contains(&metric) {
                metrics.push(metric);
            }
        }

        let before_records = SizeRecord::from_table(before, identity);
        let after_records = SizeRecord::from_table(after, identity);

        metrics
            .par_iter()
            .map(|metric| self.compare_records(&before_records, &after_records, metric))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn compare_sizes(
        before: &[(&str, u64)],
        after: &[(&str, u64)],
        threshold: u64,
    ) -> Vec<ComparisonEntry> {
        MetricComparator::default()
            .compare_maps(
                SizeMap::from_sizes(before.iter().copied()),
                SizeMap::from_sizes(after.iter().copied()),
                "size",
            )
            .entries(threshold)
    }

    #[test]
    fn test_increase_above_threshold() {
        let entries = compare_sizes(&[("a.cpp", 100)], &[("a.cpp", 150)], 10);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].difference, 50);
        assert_eq!(entries[0].percent_change, 50.0);
        assert_eq!(entries[0].change_type, ChangeType::Increased);
        assert_eq!(entries[0].metric_type, "size");
    }

    #[test]
    fn test_removed_file_is_decrease() {
        let entries = compare_sizes(&[("b.cpp", 200)], &[], 10);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].size1, 200);
        assert_eq!(entries[0].size2, 0);
        assert_eq!(entries[0].difference, -200);
        assert_eq!(entries[0].percent_change, -100.0);
        assert_eq!(entries[0].change_type, ChangeType::Decreased);
    }

    #[test]
    fn test_added_file_has_hundred_percent_change() {
        let entries = compare_sizes(&[], &[("new.cpp", 64)], 0);
        assert_eq!(entries[0].percent_change, 100.0);
        assert_eq!(entries[0].change_type, ChangeType::Increased);

        let zero = compare_sizes(&[], &[("empty.cpp", 0)], 0);
        assert_eq!(zero[0].percent_change, 0.0);
        assert_eq!(zero[0].change_type, ChangeType::Unchanged);
    }

    #[test]
    fn test_moved_file_merges_into_single_entry() {
        let entries = compare_sizes(&[("dir1/x.o", 1000)], &[("dir2/x.o", 1040)], 50);

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.file_key, "dir2/x.o");
        assert_eq!(entry.size1, 1000);
        assert_eq!(entry.size2, 1040);
        assert_eq!(entry.change_type, ChangeType::Unchanged);
        assert!(entry.display_name().contains("moved from dir1 to dir2"));
    }

    #[test]
    fn test_entries_sorted_by_absolute_difference() {
        let entries = compare_sizes(
            &[("a", 100), ("b", 100), ("c", 100)],
            &[("a", 105), ("b", 10), ("c", 150)],
            0,
        );
        let keys: Vec<_> = entries.iter().map(|e| e.file_key.as_str()).collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_threshold_reclassifies_without_recomputing() {
        let comparison = MetricComparator::default().compare_maps(
            SizeMap::from_sizes([("a", 100)]),
            SizeMap::from_sizes([("a", 120)]),
            "size",
        );

        assert_eq!(comparison.entries(10)[0].change_type, ChangeType::Increased);
        assert_eq!(comparison.entries(20)[0].change_type, ChangeType::Unchanged);
        assert_eq!(comparison.diffs()[0].difference, 20);
    }

    #[test]
    fn test_relative_paths_match_across_snapshots() {
        let before = CsvTable::parse("compileunits,vmsize\n../src/a.cpp,10\n");
        let after = CsvTable::parse("compileunits,vmsize\nsrc/a.cpp,30\n");

        let entries = MetricComparator::default().compare(&before, &after, "vmsize", 0, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_key, "src/a.cpp");
        assert_eq!(entries[0].difference, 20);
    }

    #[test]
    fn test_presence_flags() {
        let comparison = MetricComparator::default().compare_maps(
            SizeMap::from_sizes([("gone", 5), ("kept", 5)]),
            SizeMap::from_sizes([("kept", 5), ("new", 5)]),
            "size",
        );
        let by_key = |k: &str| {
            comparison
                .diffs()
                .iter()
                .find(|d| d.file_key == k)
                .unwrap()
                .clone()
        };

        assert!(by_key("gone").is_removed());
        assert!(by_key("new").is_added());
        let kept = by_key("kept");
        assert!(!kept.is_added() && !kept.is_removed() && !kept.is_moved());
    }

    #[test]
    fn test_compare_all_metrics_covers_every_column() {
        let before = CsvTable::parse("compileunits,vmsize,filesize\na.o,10,20\n");
        let after = CsvTable::parse("compileunits,vmsize,filesize,extra\na.o,15,20,7\n");

        let comparisons = MetricComparator::default().compare_all_metrics(&before, &after, None);
        let metrics: Vec<_> = comparisons.iter().map(Comparison::metric).collect();
        assert_eq!(metrics, vec!["vmsize", "filesize", "extra"]);
        assert_eq!(comparisons[0].diffs()[0].difference, 5);
        assert_eq!(comparisons[1].diffs()[0].difference, 0);
        assert_eq!(comparisons[2].diffs()[0].difference, 7);
    }

    #[test]
    fn test_identical_snapshots_report_no_change() {
        let table = CsvTable::parse("filename,compressed\na,1\nb,2\n");
        let entries = MetricComparator::default().compare(&table, &table, "compressed", 0, None);
        assert!(entries
            .iter()
            .all(|e| e.difference == 0 && e.change_type == ChangeType::Unchanged));
    }

    #[test]
    fn test_difference_saturates_for_huge_sizes() {
        let entries = compare_sizes(&[("huge", u64::MAX)], &[("huge", 0)], 0);
        assert_eq!(entries[0].difference, i64::MIN);
        assert_eq!(entries[0].change_type, ChangeType::Decreased);

        let entries = compare_sizes(&[("huge", 0)], &[("huge", u64::MAX)], 0);
        assert_eq!(entries[0].difference, i64::MAX);
        assert_eq!(entries[0].change_type, ChangeType::Increased);

        assert_eq!(size_difference(5, 3), -2);
    }

    fn sizes_strategy() -> impl Strategy<Value = Vec<(String, u64)>> {
        prop::collection::vec(("[a-d]/[p-s]\\.o", 0u64..5000), 0..10)
    }

    proptest! {
        #[test]
        fn prop_unchanged_iff_within_threshold(
            before in sizes_strategy(),
            after in sizes_strategy(),
            threshold in 0u64..500,
        ) {
            let comparison = MetricComparator::default().compare_maps(
                SizeMap::from_sizes(before.iter().map(|(k, v)| (k.as_str(), *v))),
                SizeMap::from_sizes(after.iter().map(|(k, v)| (k.as_str(), *v))),
                "size",
            );
            for entry in comparison.entries(threshold) {
                prop_assert_eq!(
                    entry.change_type == ChangeType::Unchanged,
                    entry.difference.unsigned_abs() <= threshold
                );
                prop_assert_eq!(entry.difference, entry.size2 as i64 - entry.size1 as i64);
            }
        }

        #[test]
        fn prop_every_merged_key_appears_once(
            before in sizes_strategy(),
            after in sizes_strategy(),
        ) {
            let before_map = SizeMap::from_sizes(before.iter().map(|(k, v)| (k.as_str(), *v)));
            let after_map = SizeMap::from_sizes(after.iter().map(|(k, v)| (k.as_str(), *v)));

            let outcome = MoveDetector::default().detect(before_map.clone(), after_map.clone());
            let expected: HashSet<String> = outcome
                .before
                .keys()
                .chain(outcome.after.keys())
                .map(str::to_string)
                .collect();

            let comparison =
                MetricComparator::default().compare_maps(before_map, after_map, "size");
            let keys: Vec<&str> = comparison.diffs().iter().map(|d| d.file_key.as_str()).collect();
            let unique: HashSet<String> = keys.iter().map(|k| k.to_string()).collect();

            prop_assert_eq!(keys.len(), unique.len());
            prop_assert_eq!(unique, expected);
        }

        #[test]
        fn prop_comparison_is_deterministic(
            before in sizes_strategy(),
            after in sizes_strategy(),
        ) {
            let run = || {
                let mut entries = MetricComparator::default()
                    .compare_maps(
                        SizeMap::from_sizes(before.iter().map(|(k, v)| (k.as_str(), *v))),
                        SizeMap::from_sizes(after.iter().map(|(k, v)| (k.as_str(), *v))),
                        "size",
                    )
                    .entries(0);
                entries.sort_by(|a, b| a.file_key.cmp(&b.file_key));
                entries
            };
            prop_assert_eq!(run(), run());
        }
    }
}
