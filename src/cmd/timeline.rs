//! Timeline command implementation
//!
//! Handles `size-analyzer timeline <FILE>`, tracking one file's size over
//! every known version in a range.

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use super::resolve_platform;
use crate::config::ConfigFile;
use crate::context::AnalyzerContext;
use crate::report::{render_timeline, to_json, TimelineReport};
use crate::source::SnapshotSource;

/// Options for `size-analyzer timeline`
#[derive(Debug, Clone, Default)]
pub struct TimelineOptions {
    /// File or compile unit to track
    pub file: String,
    /// Platform; optional when the index lists exactly one
    pub platform: Option<String>,
    /// First version; defaults to the start of the recent range
    pub from: Option<String>,
    /// Last version; defaults to the latest
    pub to: Option<String>,
    /// Metric column
    pub metric: Option<String>,
    /// Emit JSON instead of a chart
    pub json: bool,
}

/// Print a file's size history
pub fn cmd_timeline(config: &ConfigFile, options: &TimelineOptions) -> Result<()> {
    let ctx = AnalyzerContext::from_config(config);
    let progress = if options.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    let text = timeline_impl(&ctx, options, &progress)?;
    print!("{}", text);
    Ok(())
}

pub(crate) fn timeline_impl<S: SnapshotSource>(
    ctx: &AnalyzerContext<S>,
    options: &TimelineOptions,
    progress: &ProgressBar,
) -> Result<String> {
    let platform = resolve_platform(ctx, options.platform.as_deref())?;

    let recent = ctx.recent_versions(&platform)?;
    let from = match &options.from {
        Some(from) => from.clone(),
        None => recent
            .first()
            .cloned()
            .with_context(|| format!("{} has no versions", platform))?,
    };
    let to = match &options.to {
        Some(to) => to.clone(),
        None => recent
            .last()
            .cloned()
            .with_context(|| format!("{} has no versions", platform))?,
    };

    let versions = ctx.timeline_versions(&platform, &from, &to)?;
    let metric = match options
        .metric
        .clone()
        .or_else(|| ctx.settings().metric.clone())
    {
        Some(metric) => metric,
        None => first_metric(ctx, &platform, &versions)?,
    };

    progress.set_length(versions.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .context("Invalid progress bar template")?,
    );

    let points =
        ctx.timeline_with_progress(&platform, &options.file, &from, &to, &metric, |version| {
            progress.set_message(version.to_string());
            progress.inc(1);
        })?;
    progress.finish_and_clear();

    if options.json {
        let report = TimelineReport {
            platform,
            file: options.file.clone(),
            metric,
            points,
        };
        Ok(format!("{}\n", to_json(&report)?))
    } else {
        Ok(render_timeline(&options.file, &metric, &points)?)
    }
}

/// First metric column of the earliest snapshot in `versions` that loads
fn first_metric<S: SnapshotSource>(
    ctx: &AnalyzerContext<S>,
    platform: &str,
    versions: &[String],
) -> Result<String> {
    let mut last_error = None;
    for version in versions {
        match ctx.metrics(platform, version) {
            Ok(metrics) => {
                return metrics
                    .into_iter()
                    .next()
                    .with_context(|| format!("Snapshot {} has no metric columns", version));
            }
            Err(e) => {
                debug!("No metric columns from {} {}: {:#}", platform, version, e);
                last_error = Some(e);
            }
        }
    }
    match last_error {
        Some(e) => Err(e.context(format!("No snapshot of {} in range could be read", platform))),
        None => bail!("No versions of {} in range", platform),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AnalysisSettings;
    use crate::source::MemorySnapshotSource;

    fn source() -> MemorySnapshotSource {
        MemorySnapshotSource::new()
            .with_index(r#"{"osx": ["1.0", "1.1", "1.2", "1.3"]}"#)
            .with_snapshot("osx", "1.0", "filename,compressed,uncompressed\nlib/a,10,20\n")
            .with_snapshot("osx", "1.2", "filename,compressed,uncompressed\nlib/a,12,25\n")
            .with_snapshot("osx", "1.3", "filename,compressed,uncompressed\nlib/b,1,1\n")
    }

    #[test]
    fn test_timeline_json_over_explicit_range() {
        let source = source();
        let ctx = AnalyzerContext::new(&source, AnalysisSettings::default());
        let options = TimelineOptions {
            file: "lib/a".to_string(),
            from: Some("1.0".to_string()),
            to: Some("1.2".to_string()),
            metric: Some("uncompressed".to_string()),
            json: true,
            ..TimelineOptions::default()
        };

        let text = timeline_impl(&ctx, &options, &ProgressBar::hidden()).unwrap();
        let report: TimelineReport = serde_json::from_str(&text).unwrap();
        assert_eq!(report.platform, "osx");
        let sizes: Vec<_> = report.points.iter().map(|p| (p.size, p.exists)).collect();
        assert_eq!(sizes, vec![(20, true), (0, false), (25, true)]);
    }

    #[test]
    fn test_timeline_defaults_to_recent_range_and_first_metric() {
        let source = source();
        let ctx = AnalyzerContext::new(&source, AnalysisSettings::default());
        let options = TimelineOptions {
            file: "lib/a".to_string(),
            json: true,
            ..TimelineOptions::default()
        };

        let text = timeline_impl(&ctx, &options, &ProgressBar::hidden()).unwrap();
        let report: TimelineReport = serde_json::from_str(&text).unwrap();
        assert_eq!(report.metric, "compressed");
        assert_eq!(report.points.len(), 4);
        assert!(!report.points[3].exists);
    }

    #[test]
    fn test_timeline_metric_from_earliest_readable_snapshot() {
        let source = MemorySnapshotSource::new()
            .with_index(r#"{"osx": ["1.0", "1.1", "1.2"]}"#)
            .with_snapshot("osx", "1.0", "filename,vmsize\nlib/a,10\n")
            .with_snapshot("osx", "1.1", "filename,vmsize\nlib/a,14\n");
        let ctx = AnalyzerContext::new(&source, AnalysisSettings::default());
        let options = TimelineOptions {
            file: "lib/a".to_string(),
            json: true,
            ..TimelineOptions::default()
        };

        let text = timeline_impl(&ctx, &options, &ProgressBar::hidden()).unwrap();
        let report: TimelineReport = serde_json::from_str(&text).unwrap();
        assert_eq!(report.metric, "vmsize");
        let sizes: Vec<_> = report.points.iter().map(|p| (p.size, p.exists)).collect();
        assert_eq!(sizes, vec![(10, true), (14, true), (0, false)]);
    }

    #[test]
    fn test_timeline_without_any_readable_snapshot_fails() {
        let source = MemorySnapshotSource::new().with_index(r#"{"osx": ["1.0", "1.1"]}"#);
        let ctx = AnalyzerContext::new(&source, AnalysisSettings::default());
        let options = TimelineOptions {
            file: "lib/a".to_string(),
            json: true,
            ..TimelineOptions::default()
        };

        let err = timeline_impl(&ctx, &options, &ProgressBar::hidden()).unwrap_err();
        assert!(err.to_string().contains("No snapshot of osx in range"));
        assert_eq!(crate::error::ErrorFormatter::exit_code(&err), 66);
    }

    #[test]
    fn test_timeline_unknown_platform() {
        let source = source();
        let ctx = AnalyzerContext::new(&source, AnalysisSettings::default());
        let options = TimelineOptions {
            file: "lib/a".to_string(),
            platform: Some("linux".to_string()),
            ..TimelineOptions::default()
        };
        assert!(timeline_impl(&ctx, &options, &ProgressBar::hidden()).is_err());
    }
}
