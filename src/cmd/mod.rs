//! Command handlers for the size-analyzer CLI
//!
//! Each submodule handles one subcommand. Handlers build an
//! [`AnalyzerContext`] from the loaded configuration and print either a
//! console table or JSON.

pub mod compare;
pub mod completions;
pub mod metrics;
pub mod timeline;
pub mod versions;

pub use compare::{cmd_compare, CompareOptions};
pub use completions::cmd_completions;
pub use metrics::cmd_metrics;
pub use timeline::{cmd_timeline, TimelineOptions};
pub use versions::cmd_versions;

use crate::config::{ConfigFile, ConfigLoader};
use crate::context::AnalyzerContext;
use crate::source::SnapshotSource;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Load `.size-analyzer.toml` from the working directory and apply the
/// `--data-dir` override
pub fn load_config(data_dir: Option<&Path>) -> Result<ConfigFile> {
    load_config_from(Path::new("."), data_dir)
}

/// Same as [`load_config`] for an explicit project root
pub fn load_config_from(root: &Path, data_dir: Option<&Path>) -> Result<ConfigFile> {
    let mut config = ConfigLoader::load(root)?;
    if let Some(dir) = data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    Ok(config)
}

/// Use the given platform, or the only platform in the index
pub(crate) fn resolve_platform<S: SnapshotSource>(
    ctx: &AnalyzerContext<S>,
    platform: Option<&str>,
) -> Result<String> {
    if let Some(platform) = platform {
        return Ok(platform.to_string());
    }

    let index = ctx.index()?;
    let platforms: Vec<&str> = index.platforms().collect();
    match platforms.as_slice() {
        [only] => Ok(only.to_string()),
        [] => anyhow::bail!("The analysis index lists no platforms"),
        many => anyhow::bail!(
            "Several platforms available ({}); choose one with --platform",
            many.join(", ")
        ),
    }
}
