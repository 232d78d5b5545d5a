//! Console tables for comparisons, summaries and timelines

use super::output::ComparisonReport;
use crate::engine::{size_difference, ChangeType, ComparisonSummary, TimelinePoint};
use crate::fmt::{
    format_bytes, format_delta, format_percent, icon, truncate_path, CHART, GROWTH, MOVED,
    SHRINK, TIMELINE,
};
use console::style;
use std::fmt::{self, Write as _};

const WIDTH: usize = 96;
const NAME_WIDTH: usize = 48;

/// Render a comparison table
///
/// At most `limit` rows are shown; unchanged files are skipped unless
/// `show_unchanged` is set.
pub fn render_comparison(
    report: &ComparisonReport,
    limit: usize,
    show_unchanged: bool,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "\n{} {} {} {} {} ({}, threshold {})",
        icon(CHART),
        style("Size comparison").bold(),
        report.from,
        style("->").dim(),
        report.to,
        report.metric,
        format_bytes(report.threshold)
    )?;
    writeln!(out, "{}", "=".repeat(WIDTH))?;
    writeln!(
        out,
        "   {:<w$} {:>12} {:>12} {:>12} {:>8}",
        "File",
        "Before",
        "After",
        "Change",
        "%",
        w = NAME_WIDTH
    )?;
    writeln!(out, "{}", "-".repeat(WIDTH))?;

    let rows: Vec<_> = report
        .entries
        .iter()
        .filter(|e| show_unchanged || e.change_type != ChangeType::Unchanged)
        .collect();

    if rows.is_empty() {
        writeln!(out, "   {}", style("No files changed beyond the threshold").dim())?;
    }

    for entry in rows.iter().take(limit) {
        let marker = if entry.move_info.is_some() {
            icon(MOVED)
        } else {
            match entry.change_type {
                ChangeType::Increased => icon(GROWTH),
                ChangeType::Decreased => icon(SHRINK),
                ChangeType::Unchanged => " ",
            }
        };
        let delta = format_delta(entry.difference);
        let delta = match entry.change_type {
            ChangeType::Increased => style(delta).red(),
            ChangeType::Decreased => style(delta).green(),
            ChangeType::Unchanged => style(delta).dim(),
        };

        writeln!(
            out,
            "{:<2} {:<w$} {:>12} {:>12} {:>12} {:>8}",
            marker,
            truncate_path(entry.display_name(), NAME_WIDTH),
            format_bytes(entry.size1),
            format_bytes(entry.size2),
            delta,
            format_percent(entry.percent_change),
            w = NAME_WIDTH
        )?;
    }

    if rows.len() > limit {
        writeln!(
            out,
            "   {}",
            style(format!("... {} more (use --limit)", rows.len() - limit)).dim()
        )?;
    }
    writeln!(out, "{}", "=".repeat(WIDTH))?;
    out.push_str(&render_summary(&report.summary)?);
    Ok(out)
}

/// Render summary counts and extrema
pub fn render_summary(summary: &ComparisonSummary) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "Files: {}  increased: {}  decreased: {}  unchanged: {}",
        summary.total_files,
        style(summary.increased).red(),
        style(summary.decreased).green(),
        summary.unchanged
    )?;
    writeln!(
        out,
        "Added: {}  removed: {}  moved: {}",
        summary.added, summary.removed, summary.moved
    )?;
    writeln!(out, "Total change: {}", style(format_delta(summary.total_size_change)).bold())?;
    if let Some(inc) = &summary.largest_increase {
        writeln!(out, "Largest increase: {} ({})", inc.display_name, format_delta(inc.difference))?;
    }
    if let Some(dec) = &summary.largest_decrease {
        writeln!(out, "Largest decrease: {} ({})", dec.display_name, format_delta(dec.difference))?;
    }
    Ok(out)
}

/// Render one summary line per metric
pub fn render_metric_overview(reports: &[ComparisonReport]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "\n{} {}", icon(CHART), style("All metrics").bold())?;
    writeln!(out, "{}", "=".repeat(WIDTH))?;
    writeln!(
        out,
        "{:<24} {:>10} {:>10} {:>10} {:>8} {:>14}",
        "Metric", "Increased", "Decreased", "Unchanged", "Moved", "Total change"
    )?;
    writeln!(out, "{}", "-".repeat(WIDTH))?;
    for report in reports {
        let s = &report.summary;
        writeln!(
            out,
            "{:<24} {:>10} {:>10} {:>10} {:>8} {:>14}",
            truncate_path(&report.metric, 24),
            s.increased,
            s.decreased,
            s.unchanged,
            s.moved,
            format_delta(s.total_size_change)
        )?;
    }
    writeln!(out, "{}", "=".repeat(WIDTH))?;
    Ok(out)
}

/// Render a timeline with a proportional bar per version
pub fn render_timeline(
    file: &str,
    metric: &str,
    points: &[TimelinePoint],
) -> Result<String, fmt::Error> {
    const BAR_WIDTH: u64 = 40;

    let mut out = String::new();
    writeln!(out, "\n{} {} {} ({})", icon(TIMELINE), style("Timeline").bold(), file, metric)?;
    writeln!(out, "{}", "=".repeat(WIDTH))?;

    let max = points.iter().map(|p| p.size).max().unwrap_or(0);
    for point in points {
        if !point.exists {
            writeln!(out, "{:<16} {:>12}  {}", point.version, "-", style("not present").dim())?;
            continue;
        }
        let filled = if max == 0 {
            0
        } else {
            (point.size.saturating_mul(BAR_WIDTH) / max) as usize
        };
        writeln!(
            out,
            "{:<16} {:>12}  {}",
            point.version,
            format_bytes(point.size),
            style("█".repeat(filled)).cyan()
        )?;
    }

    let present: Vec<_> = points.iter().filter(|p| p.exists).collect();
    if let (Some(first), Some(last)) = (present.first(), present.last()) {
        writeln!(out, "{}", "-".repeat(WIDTH))?;
        writeln!(
            out,
            "{} -> {}: {}",
            first.version,
            last.version,
            format_delta(size_difference(first.size, last.size))
        )?;
    }
    Ok(out)
}

/// Render a version list, most recent marked
pub fn render_versions(platform: &str, versions: &[String]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{} ({} versions)", style(platform).bold(), versions.len())?;
    for (i, version) in versions.iter().enumerate() {
        let latest = if i + 1 == versions.len() {
            style(" (latest)").dim().to_string()
        } else {
            String::new()
        };
        writeln!(out, "  {}{}", version, latest)?;
    }
    Ok(out)
}
