//! Size budget enforcement over a comparison
//!
//! Two limits, both optional:
//! - Per-file increase: no single file may grow by more than N bytes
//! - Total increase: the summed size change may not exceed N bytes

use super::comparator::Comparison;
use crate::config::SizeBudget;
use crate::error::SizeAnalyzerError;
use crate::fmt::{format_bytes, format_delta, icon, CHECKMARK, CROSSMARK};
use console::style;
use serde::{Deserialize, Serialize};

/// Which limit was exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A single file grew past `max-increase-bytes`
    FileIncrease,
    /// The total change exceeded `max-total-increase-bytes`
    TotalIncrease,
}

/// One exceeded limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetViolation {
    /// Limit kind
    pub kind: ViolationKind,
    /// File key, or `"total"`
    pub subject: String,
    /// Observed increase in bytes
    pub actual: i64,
    /// Configured limit in bytes
    pub limit: u64,
}

/// Outcome of a budget check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetResult {
    /// Metric the check ran against
    pub metric: String,
    /// Every exceeded limit
    pub violations: Vec<BudgetViolation>,
}

impl BudgetResult {
    /// True when no limit was exceeded
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Convert a failed check into an error
    pub fn into_result(self) -> Result<(), SizeAnalyzerError> {
        if self.passed() {
            return Ok(());
        }
        let worst = self
            .violations
            .iter()
            .map(|v| v.actual)
            .max()
            .unwrap_or_default();
        Err(SizeAnalyzerError::BudgetExceeded {
            metric: self.metric,
            violations: self.violations.len(),
            worst_increase: worst,
        })
    }

    /// Render the result for the console
    pub fn render(&self) -> String {
        if self.passed() {
            return format!(
                "\n{} Size budget check passed ({})\n",
                icon(CHECKMARK),
                self.metric
            );
        }

        let mut out = format!(
            "\n{} Size budget exceeded ({}): {} violation(s)\n",
            icon(CROSSMARK),
            self.metric,
            self.violations.len()
        );
        for violation in &self.violations {
            let label = match violation.kind {
                ViolationKind::FileIncrease => "file",
                ViolationKind::TotalIncrease => "total",
            };
            out.push_str(&format!(
                "   {} {}: {} (limit {})\n",
                style(label).dim(),
                violation.subject,
                style(format_delta(violation.actual)).red(),
                format_bytes(violation.limit)
            ));
        }
        out
    }
}

/// Checks comparisons against a [`SizeBudget`]
pub struct BudgetChecker {
    budget: SizeBudget,
}

impl BudgetChecker {
    /// Create a checker
    pub fn new(budget: SizeBudget) -> Self {
        Self { budget }
    }

    /// Check one comparison
    pub fn check(&self, comparison: &Comparison) -> BudgetResult {
        let mut violations = Vec::new();

        if let Some(limit) = self.budget.max_increase_bytes {
            violations.extend(
                comparison
                    .diffs()
                    .iter()
                    .filter(|d| d.difference > 0 && d.difference.unsigned_abs() > limit)
                    .map(|d| BudgetViolation {
                        kind: ViolationKind::FileIncrease,
                        subject: d.file_key.clone(),
                        actual: d.difference,
                        limit,
                    }),
            );
        }

        if let Some(limit) = self.budget.max_total_increase_bytes {
            let total = comparison
                .diffs()
                .iter()
                .fold(0i64, |sum, d| sum.saturating_add(d.difference));
            if total > 0 && total.unsigned_abs() > limit {
                violations.push(BudgetViolation {
                    kind: ViolationKind::TotalIncrease,
                    subject: "total".to_string(),
                    actual: total,
                    limit,
                });
            }
        }

        BudgetResult {
            metric: comparison.metric().to_string(),
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MetricComparator, SizeMap};
    use proptest::prelude::*;

    fn comparison(before: &[(&str, u64)], after: &[(&str, u64)]) -> Comparison {
        MetricComparator::default().compare_maps(
            SizeMap::from_sizes(before.iter().copied()),
            SizeMap::from_sizes(after.iter().copied()),
            "vmsize",
        )
    }

    #[test]
    fn test_no_budget_always_passes() {
        let c = comparison(&[("a", 1)], &[("a", 1_000_000)]);
        let result = BudgetChecker::new(SizeBudget::default()).check(&c);
        assert!(result.passed());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn test_file_increase_limit_is_exclusive() {
        let c = comparison(&[("a", 100), ("b", 100)], &[("a", 200), ("b", 201)]);
        let checker = BudgetChecker::new(SizeBudget {
            max_increase_bytes: Some(100),
            max_total_increase_bytes: None,
        });

        let result = checker.check(&c);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].subject, "b");
        assert_eq!(result.violations[0].kind, ViolationKind::FileIncrease);
    }

    #[test]
    fn test_total_limit_nets_out_decreases() {
        let c = comparison(&[("a", 100), ("b", 500)], &[("a", 400), ("b", 300)]);
        let checker = BudgetChecker::new(SizeBudget {
            max_increase_bytes: None,
            max_total_increase_bytes: Some(50),
        });

        let result = checker.check(&c);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].actual, 100);

        let err = result.into_result().expect_err("should fail");
        assert!(matches!(
            err,
            SizeAnalyzerError::BudgetExceeded {
                violations: 1,
                worst_increase: 100,
                ..
            }
        ));
    }

    proptest! {
        #[test]
        fn prop_shrinking_builds_never_violate(
            sizes in prop::collection::vec((1u64..10_000, 0u64..10_000), 1..10),
            limit in 0u64..100,
        ) {
            let before: Vec<(String, u64)> = sizes
                .iter()
                .enumerate()
                .map(|(i, (a, _))| (format!("f{}", i), *a))
                .collect();
            let after: Vec<(String, u64)> = sizes
                .iter()
                .enumerate()
                .map(|(i, (a, b))| (format!("f{}", i), (*a).min(*b)))
                .collect();
            let c = MetricComparator::default().compare_maps(
                SizeMap::from_sizes(before.iter().map(|(k, v)| (k.as_str(), *v))),
                SizeMap::from_sizes(after.iter().map(|(k, v)| (k.as_str(), *v))),
                "vmsize",
            );
            let checker = BudgetChecker::new(SizeBudget {
                max_increase_bytes: Some(limit),
                max_total_increase_bytes: Some(limit),
            });
            prop_assert!(checker.check(&c).passed());
        }
    }
}
