#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! size-analyzer library
//!
//! Compares per-file size snapshots of build artifacts across versions and
//! platforms. The engine aligns files by normalized path, detects moves by
//! basename and similar size, and classifies each change against a
//! threshold. Everything the CLI does is available programmatically.
//!
//! # Basic Example
//!
//! Comparing two snapshots directly:
//!
//! ```
//! use size_analyzer::engine::{ChangeType, MetricComparator};
//! use size_analyzer::snapshot::CsvTable;
//!
//! let before = CsvTable::parse("compileunits,vmsize,filesize\nsrc/a.cpp,100,80\ndir1/x.o,1000,900\n");
//! let after = CsvTable::parse("compileunits,vmsize,filesize\n../src/a.cpp,150,80\ndir2/x.o,1040,910\n");
//!
//! let comparison = MetricComparator::default().compare_tables(&before, &after, "vmsize", None);
//! let entries = comparison.entries(10);
//!
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[0].change_type, ChangeType::Increased);
//! assert!(entries[1].display_name().contains("moved from dir1 to dir2"));
//!
//! // Changing the threshold reclassifies without recomparing
//! let summary = comparison.summary(100);
//! assert_eq!(summary.unchanged, 2);
//! ```
//!
//! # Advanced Example: Application Context
//!
//! Loading snapshots through a source and cache:
//!
//! ```
//! use size_analyzer::context::{AnalysisSettings, AnalyzerContext};
//! use size_analyzer::request::ComparisonRequest;
//! use size_analyzer::source::MemorySnapshotSource;
//!
//! let source = MemorySnapshotSource::new()
//!     .with_index(r#"{"platforms": {"linux": {"versions": ["1.0", "1.1"]}}}"#)
//!     .with_snapshot("linux", "1.0", "filename,compressed\na.txt,10\n")
//!     .with_snapshot("linux", "1.1", "filename,compressed\na.txt,15\n");
//! let ctx = AnalyzerContext::new(source, AnalysisSettings::default());
//!
//! let request = ComparisonRequest::from_query_string("platform=linux&from=1.0&to=1.1")?;
//! let summary = ctx.summary(&request, None)?;
//! assert_eq!(summary.total_size_change, 5);
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Parsed snapshot cache
pub mod cache;
/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file loading
pub mod config;
/// Application context owning source, cache and index
pub mod context;
/// Comparison, move detection, summary and timeline engine
pub mod engine;
/// Error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Analysis index of platforms and versions
pub mod index;
/// Filesystem abstraction
pub mod infra;
/// Console and JSON presentation
pub mod report;
/// Comparison requests and query strings
pub mod request;
/// CSV snapshot parsing and path normalization
pub mod snapshot;
/// Snapshot and index sources
pub mod source;
/// Version ordering
pub mod version;
