//! Metrics command implementation
//!
//! Lists the identity column and metric columns of one snapshot.

use anyhow::{Context, Result};

use super::resolve_platform;
use crate::config::ConfigFile;
use crate::context::AnalyzerContext;
use crate::source::SnapshotSource;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct MetricsReport {
    platform: String,
    version: String,
    identity_column: Option<String>,
    metrics: Vec<String>,
    rows: usize,
}

/// Show the columns of a snapshot, defaulting to the latest version
pub fn cmd_metrics(
    config: &ConfigFile,
    platform: Option<&str>,
    version: Option<&str>,
    json: bool,
) -> Result<()> {
    let ctx = AnalyzerContext::from_config(config);
    print!("{}", metrics_impl(&ctx, platform, version, json)?);
    Ok(())
}

pub(crate) fn metrics_impl<S: SnapshotSource>(
    ctx: &AnalyzerContext<S>,
    platform: Option<&str>,
    version: Option<&str>,
    json: bool,
) -> Result<String> {
    let platform = resolve_platform(ctx, platform)?;
    let version = match version {
        Some(v) => v.to_string(),
        None => ctx
            .versions(&platform)?
            .pop()
            .with_context(|| format!("{} has no versions", platform))?,
    };

    let table = ctx.snapshot(&platform, &version)?;
    let report = MetricsReport {
        identity_column: table.identity_column().map(str::to_string),
        metrics: table.metric_columns(),
        rows: table.len(),
        platform,
        version,
    };

    if json {
        return Ok(format!("{}\n", crate::report::to_json(&report)?));
    }
    Ok(format!(
        "{} {} ({} rows)\n  identity: {}\n  metrics:  {}\n",
        report.platform,
        report.version,
        report.rows,
        report.identity_column.as_deref().unwrap_or("-"),
        report.metrics.join(", ")
    ))
}
