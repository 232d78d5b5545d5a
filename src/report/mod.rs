//! Text and JSON presentation of engine results

pub mod display;
pub mod output;

pub use display::{
    render_comparison, render_metric_overview, render_summary, render_timeline, render_versions,
};
pub use output::{to_json, ComparisonReport, TimelineReport, VersionsReport};
