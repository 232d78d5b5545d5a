//! Aggregate statistics over a comparison

use super::comparator::{ChangeType, FileDiff};
use serde::{Deserialize, Serialize};

/// The file with the largest increase or decrease
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeExtreme {
    /// Normalized identity
    pub file_key: String,
    /// Move description or file key
    pub display_name: String,
    /// Signed byte difference
    pub difference: i64,
}

/// Counts and extrema for one comparison under one threshold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Files in the comparison
    pub total_files: usize,
    /// Files within threshold
    pub unchanged: usize,
    /// Files that grew beyond threshold
    pub increased: usize,
    /// Files that shrank beyond threshold
    pub decreased: usize,
    /// Files only in the after snapshot
    pub added: usize,
    /// Files only in the before snapshot
    pub removed: usize,
    /// Files merged from a detected move
    pub moved: usize,
    /// Sum of all differences, regardless of classification
    pub total_size_change: i64,
    /// Largest classified increase
    pub largest_increase: Option<SizeExtreme>,
    /// Largest classified decrease
    pub largest_decrease: Option<SizeExtreme>,
}

struct Row<'a> {
    file_key: &'a str,
    display_name: &'a str,
    difference: i64,
    change_type: ChangeType,
    added: bool,
    removed: bool,
    moved: bool,
}

impl ComparisonSummary {
    /// Reduce threshold-free diffs under `threshold`
    ///
    /// Added and removed counts come from snapshot presence, so a file that
    /// appears with size 0 still counts as added.
    ///
    /// # Examples
    ///
    /// ```
    /// use size_analyzer::engine::{MetricComparator, SizeMap};
    ///
    /// let comparison = MetricComparator::default().compare_maps(
    ///     SizeMap::from_sizes([("a.o", 100), ("b.o", 50)]),
    ///     SizeMap::from_sizes([("a.o", 180), ("b.o", 50)]),
    ///     "vmsize",
    /// );
    /// let summary = comparison.summary(0);
    /// assert_eq!(summary.increased, 1);
    /// assert_eq!(summary.unchanged, 1);
    /// assert_eq!(summary.total_size_change, 80);
    /// ```
    pub fn from_diffs(diffs: &[FileDiff], threshold: u64) -> Self {
        Self::fold(diffs.iter().map(|d| Row {
            file_key: &d.file_key,
            display_name: d
                .move_info
                .as_ref()
                .map_or(d.file_key.as_str(), |m| m.display_name.as_str()),
            difference: d.difference,
            change_type: d.classify(threshold),
            added: d.is_added(),
            removed: d.is_removed(),
            moved: d.is_moved(),
        }))
    }

    fn fold<'a>(rows: impl Iterator<Item = Row<'a>>) -> Self {
        let mut summary = Self::default();
        let mut largest_increase: Option<Row<'a>> = None;
        let mut largest_decrease: Option<Row<'a>> = None;

        for row in rows {
            summary.total_files += 1;
            summary.total_size_change = summary.total_size_change.saturating_add(row.difference);
            summary.added += usize::from(row.added);
            summary.removed += usize::from(row.removed);
            summary.moved += usize::from(row.moved);

            match row.change_type {
                ChangeType::Unchanged => summary.unchanged += 1,
                ChangeType::Increased => {
                    summary.increased += 1;
                    if largest_increase
                        .as_ref()
                        .is_none_or(|best| row.difference > best.difference)
                    {
                        largest_increase = Some(row);
                    }
                }
                ChangeType::Decreased => {
                    summary.decreased += 1;
                    if largest_decrease
                        .as_ref()
                        .is_none_or(|best| row.difference < best.difference)
                    {
                        largest_decrease = Some(row);
                    }
                }
            }
        }

        summary.largest_increase = largest_increase.map(Row::into_extreme);
        summary.largest_decrease = largest_decrease.map(Row::into_extreme);
        summary
    }

    /// Whether any file changed beyond the threshold
    pub fn has_changes(&self) -> bool {
        self.increased + self.decreased > 0
    }
}

impl Row<'_> {
    fn into_extreme(self) -> SizeExtreme {
        SizeExtreme {
            file_key: self.file_key.to_string(),
            display_name: self.display_name.to_string(),
            difference: self.difference,
        }
    }
}
