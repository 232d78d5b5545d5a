//! Error types with contextual suggestions
//!
//! Errors carry enough context to tell the user what to do next:
//! - Actionable messages
//! - Suggested fixes
//! - Pointers into the README
//! - sysexits-style exit codes for CI
//!
//! Only data-fetch problems are fatal. Malformed rows and non-numeric
//! values never reach this module; the parser drops or coerces them.
//!
//! # Examples
//!
//! ```
//! use size_analyzer::error::SizeAnalyzerError;
//!
//! let err = SizeAnalyzerError::SameVersion {
//!     version: "1.9.0".to_string(),
//! };
//! assert_eq!(err.exit_code(), 64);
//! assert!(err.suggestion().is_some());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the user
#[derive(Error, Debug)]
pub enum SizeAnalyzerError {
    /// Snapshot for a platform/version could not be loaded
    #[error("Snapshot unavailable for {platform} {version}")]
    SnapshotUnavailable {
        /// Platform name
        platform: String,
        /// Version identifier
        version: String,
        #[source]
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Analysis index file could not be read
    #[error("Analysis index not found: {path}")]
    IndexUnavailable {
        /// Path that was tried
        path: PathBuf,
        #[source]
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Analysis index is not valid JSON of a known shape
    #[error("Invalid analysis index: {reason}")]
    InvalidIndex {
        /// Parser message
        reason: String,
    },

    /// Platform not present in the index
    #[error("Unknown platform: '{platform}'")]
    UnknownPlatform {
        /// Requested platform
        platform: String,
        /// Platforms the index knows
        available: Vec<String>,
    },

    /// Version not present for the platform
    #[error("Unknown version '{version}' for platform '{platform}'")]
    UnknownVersion {
        /// Platform name
        platform: String,
        /// Requested version
        version: String,
    },

    /// Metric column not present in the snapshots
    #[error("Unknown metric: '{metric}'")]
    UnknownMetric {
        /// Requested metric
        metric: String,
        /// Metric columns found
        available: Vec<String>,
    },

    /// Before and after versions are identical
    #[error("Cannot compare version {version} with itself")]
    SameVersion {
        /// The repeated version
        version: String,
    },

    /// Query string could not be turned into a request
    #[error("Invalid request '{query}': {reason}")]
    InvalidRequest {
        /// Raw query
        query: String,
        /// What was wrong
        reason: String,
    },

    /// Configuration file holds out-of-range values
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong
        reason: String,
    },

    /// Size budget exceeded
    #[error("Size budget exceeded for {metric}: {violations} violation(s), worst +{worst_increase} bytes")]
    BudgetExceeded {
        /// Metric the budget was checked against
        metric: String,
        /// Number of exceeded limits
        violations: usize,
        /// Largest offending increase in bytes
        worst_increase: i64,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl SizeAnalyzerError {
    /// Actionable suggestion for resolving this error
    ///
    /// # Examples
    ///
    /// ```
    /// use size_analyzer::error::SizeAnalyzerError;
    ///
    /// let err = SizeAnalyzerError::UnknownMetric {
    ///     metric: "size".to_string(),
    ///     available: vec!["vmsize".to_string(), "filesize".to_string()],
    /// };
    /// assert!(err.suggestion().unwrap().contains("vmsize, filesize"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::SnapshotUnavailable {
                platform, version, ..
            } => Some(format!(
                "Expected a CSV at <data-dir>/{}/{}.csv. Check --data-dir or run 'size-analyzer versions --platform {}'",
                platform, version, platform
            )),
            Self::IndexUnavailable { path, .. } => Some(format!(
                "Create {} or point 'index-file' in .size-analyzer.toml at an existing index",
                path.display()
            )),
            Self::InvalidIndex { .. } => Some(
                "Expected {\"platforms\": {\"<name>\": {\"versions\": [...]}}}".to_string(),
            ),
            Self::UnknownPlatform { available, .. } => {
                if available.is_empty() {
                    Some("The analysis index lists no platforms".to_string())
                } else {
                    Some(format!("Available platforms: {}", available.join(", ")))
                }
            }
            Self::UnknownVersion { platform, .. } => Some(format!(
                "Run 'size-analyzer versions --platform {}' to list known versions",
                platform
            )),
            Self::UnknownMetric { available, .. } => {
                Some(format!("Available metrics: {}", available.join(", ")))
            }
            Self::SameVersion { .. } => {
                Some("Pick two different versions for --from and --to".to_string())
            }
            Self::InvalidRequest { .. } => {
                Some("Expected a query like 'platform=linux&from=1.0&to=1.1'".to_string())
            }
            Self::InvalidConfig { .. } => {
                Some("Fix the value in .size-analyzer.toml or remove the key to use the default".to_string())
            }
            Self::BudgetExceeded { .. } => Some(
                "Inspect the largest increases with 'size-analyzer compare' or raise the limits in the [budget] table".to_string(),
            ),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// README section covering this error
    pub fn docs_url(&self) -> Option<&str> {
        match self {
            Self::SnapshotUnavailable { .. } | Self::IndexUnavailable { .. } => {
                Some("README.md#data-layout")
            }
            Self::InvalidIndex { .. } => Some("README.md#analysis-index"),
            Self::InvalidConfig { .. } => Some("README.md#configuration"),
            Self::BudgetExceeded { .. } => Some("README.md#size-budgets"),
            _ => None,
        }
    }

    /// Exit code following sysexits.h conventions
    ///
    /// # Examples
    ///
    /// ```
    /// use size_analyzer::error::SizeAnalyzerError;
    ///
    /// let err = SizeAnalyzerError::BudgetExceeded {
    ///     metric: "vmsize".to_string(),
    ///     violations: 2,
    ///     worst_increase: 4096,
    /// };
    /// assert_eq!(err.exit_code(), 1);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SnapshotUnavailable { .. } => 66, // EX_NOINPUT
            Self::IndexUnavailable { .. } => 66,    // EX_NOINPUT
            Self::InvalidIndex { .. } => 65,        // EX_DATAERR
            Self::UnknownPlatform { .. } => 64,     // EX_USAGE
            Self::UnknownVersion { .. } => 64,
            Self::UnknownMetric { .. } => 64,
            Self::SameVersion { .. } => 64,
            Self::InvalidRequest { .. } => 64,
            Self::InvalidConfig { .. } => 78, // EX_CONFIG
            Self::BudgetExceeded { .. } => 1, // CI should fail
            Self::Io { .. } => 74,            // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with its cause chain, suggestion and docs pointer
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = format!("{} {}\n", style("error:").red().bold(), error);

        for (depth, cause) in error.chain().skip(1).enumerate() {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(depth + 1),
                style("caused by:").yellow(),
                cause
            ));
        }

        if let Some(sa_error) = Self::find(error) {
            if let Some(suggestion) = sa_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
            if let Some(docs) = sa_error.docs_url() {
                output.push_str(&format!("{} {}\n", style("docs:").blue(), docs));
            }
        }

        output
    }

    /// Exit code for an error, 1 when it carries no typed cause
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        Self::find(error).map_or(1, SizeAnalyzerError::exit_code)
    }

    // Typed errors are often wrapped in `.context(...)`, so search the chain.
    fn find(error: &anyhow::Error) -> Option<&SizeAnalyzerError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<SizeAnalyzerError>())
    }
}
