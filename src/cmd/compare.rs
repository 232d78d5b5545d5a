//! Compare command implementation
//!
//! Handles `size-analyzer compare`, which diffs two versions of one
//! platform and optionally enforces the configured size budget.

use anyhow::{Context, Result};
use log::info;

use super::resolve_platform;
use crate::config::ConfigFile;
use crate::context::AnalyzerContext;
use crate::report::{render_comparison, render_metric_overview, to_json, ComparisonReport};
use crate::request::ComparisonRequest;
use crate::source::SnapshotSource;

/// Options for `size-analyzer compare`
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Platform; optional when the index lists exactly one
    pub platform: Option<String>,
    /// Baseline version; defaults to the second most recent
    pub from: Option<String>,
    /// Compared version; defaults to the most recent
    pub to: Option<String>,
    /// `platform=&from=&to=` query, overriding the three fields above
    pub query: Option<String>,
    /// Metric column
    pub metric: Option<String>,
    /// Threshold override in bytes
    pub threshold: Option<u64>,
    /// Compare every metric column
    pub all_metrics: bool,
    /// Fail when the size budget is exceeded
    pub check: bool,
    /// Emit JSON instead of a table
    pub json: bool,
    /// Maximum table rows
    pub limit: usize,
    /// Include unchanged files in the table
    pub show_unchanged: bool,
}

/// Compare two versions and print the result
///
/// # Examples
///
/// ```no_run
/// use size_analyzer::cmd::{cmd_compare, CompareOptions};
/// use size_analyzer::config::ConfigFile;
///
/// let options = CompareOptions {
///     platform: Some("arm64-android".to_string()),
///     limit: 20,
///     ..CompareOptions::default()
/// };
/// cmd_compare(&ConfigFile::default(), &options)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - Either snapshot cannot be loaded
/// - The versions are identical or unknown to the index
/// - `--check` is set and the budget is exceeded
pub fn cmd_compare(config: &ConfigFile, options: &CompareOptions) -> Result<()> {
    let ctx = AnalyzerContext::from_config(config);
    let output = compare_impl(&ctx, options)?;
    print!("{}", output.text);
    output.budget_result
}

pub(crate) struct CompareOutput {
    pub text: String,
    pub budget_result: Result<()>,
}

/// Build the request from the query string, flags and index defaults
pub(crate) fn build_request<S: SnapshotSource>(
    ctx: &AnalyzerContext<S>,
    options: &CompareOptions,
) -> Result<ComparisonRequest> {
    if let Some(query) = &options.query {
        return Ok(ComparisonRequest::from_query_string(query)?);
    }

    let platform = resolve_platform(ctx, options.platform.as_deref())?;
    let (from, to) = match (&options.from, &options.to) {
        (Some(from), Some(to)) => (from.clone(), to.clone()),
        (from, to) => {
            let (default_from, default_to) = ctx
                .default_pair(&platform)?
                .with_context(|| format!("{} needs at least two versions to compare", platform))?;
            match (from, to) {
                (Some(from), None) => (from.clone(), default_to),
                (None, Some(to)) => (default_from, to.clone()),
                _ => (default_from, default_to),
            }
        }
    };
    Ok(ComparisonRequest::new(platform, from, to))
}

pub(crate) fn compare_impl<S: SnapshotSource>(
    ctx: &AnalyzerContext<S>,
    options: &CompareOptions,
) -> Result<CompareOutput> {
    let request = build_request(ctx, options)?;
    let threshold = options.threshold.unwrap_or(ctx.settings().threshold);
    info!("Request: {}", request.to_query_string());

    let comparisons = if options.all_metrics {
        ctx.compare_all(&request)?
    } else {
        vec![ctx.compare(&request, options.metric.as_deref())?]
    };

    let mut budget_result = Ok(());
    let mut reports = Vec::with_capacity(comparisons.len());
    for comparison in &comparisons {
        let mut report = ComparisonReport::new(&request, comparison, threshold);
        if options.check {
            let result = ctx.check_budget(comparison);
            if budget_result.is_ok() {
                budget_result = result.clone().into_result().map_err(anyhow::Error::from);
            }
            report = report.with_budget(result);
        }
        reports.push(report);
    }

    let text = if options.json {
        let json = match reports.as_slice() {
            [single] => to_json(single)?,
            many => to_json(&many)?,
        };
        format!("{}\n", json)
    } else {
        let mut text = String::new();
        if reports.len() > 1 {
            text.push_str(&render_metric_overview(&reports)?);
        }
        for report in &reports {
            text.push_str(&render_comparison(report, options.limit, options.show_unchanged)?);
            if let Some(budget) = &report.budget {
                text.push_str(&budget.render());
            }
        }
        text
    };

    Ok(CompareOutput {
        text,
        budget_result,
    })
}
