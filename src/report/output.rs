//! JSON output for scripting and CI

use crate::engine::{
    BudgetResult, Comparison, ComparisonEntry, ComparisonSummary, MoveMatch, TimelinePoint,
};
use crate::request::ComparisonRequest;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One metric's comparison, ready for serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Platform name
    pub platform: String,
    /// Baseline version
    pub from: String,
    /// Compared version
    pub to: String,
    /// Metric column
    pub metric: String,
    /// Threshold used for classification
    pub threshold: u64,
    /// Aggregate counts and extrema
    pub summary: ComparisonSummary,
    /// Detected moves
    pub moves: Vec<MoveMatch>,
    /// Per-file entries, largest change first
    pub entries: Vec<ComparisonEntry>,
    /// Budget check, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetResult>,
}

impl ComparisonReport {
    /// Project a comparison under `threshold`
    pub fn new(request: &ComparisonRequest, comparison: &Comparison, threshold: u64) -> Self {
        let entries = comparison.entries(threshold);
        Self {
            platform: request.platform.clone(),
            from: request.from.clone(),
            to: request.to.clone(),
            metric: comparison.metric().to_string(),
            threshold,
            summary: comparison.summary(threshold),
            moves: comparison.moves().to_vec(),
            entries,
            budget: None,
        }
    }

    /// Attach a budget result
    pub fn with_budget(mut self, budget: BudgetResult) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Keep only entries that changed beyond the threshold
    pub fn changed_only(mut self) -> Self {
        self.entries
            .retain(|e| e.change_type != crate::engine::ChangeType::Unchanged);
        self
    }
}

/// Size history of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineReport {
    /// Platform name
    pub platform: String,
    /// Requested file key
    pub file: String,
    /// Metric column
    pub metric: String,
    /// One point per version, ascending
    pub points: Vec<TimelinePoint>,
}

/// Versions known for a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionsReport {
    /// Platform name
    pub platform: String,
    /// Versions, ascending
    pub versions: Vec<String>,
}

/// Serialize any report as pretty JSON
pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}
