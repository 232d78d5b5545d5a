//! Comparison and reconciliation engine
//!
//! Data flow: snapshot → [`SizeRecord`]s → per-metric [`SizeMap`]s →
//! [`MoveDetector`] → [`MetricComparator`] → [`Comparison`] →
//! [`ComparisonEntry`] / [`ComparisonSummary`]. [`build_timeline`] works
//! independently, one snapshot per version.
//!
//! Everything here is synchronous and pure once snapshots are in memory.

mod budget;
mod comparator;
mod moves;
mod size_map;
mod summary;
mod timeline;

pub use budget::{BudgetChecker, BudgetResult, BudgetViolation, ViolationKind};
pub use comparator::{
    percent_change, size_difference, ChangeType, Comparison, ComparisonEntry, FileDiff,
    MetricComparator,
};
pub use moves::{MoveDetector, MoveInfo, MoveMatch, MoveOutcome, DEFAULT_MOVE_TOLERANCE};
pub use size_map::{parse_size, SizeEntry, SizeMap, SizeRecord};
pub use summary::{ComparisonSummary, SizeExtreme};
pub use timeline::{build_timeline, lookup_size, TimelinePoint};
