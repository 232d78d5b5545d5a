//! Configuration for size-analyzer
//!
//! Settings come from an optional `.size-analyzer.toml` in the working
//! directory. Command-line flags override individual values.

pub mod file;
pub mod loader;

pub use file::{
    ConfigFile, SizeBudget, CONFIG_FILE_NAME, DEFAULT_DATA_DIR, DEFAULT_INDEX_FILE,
    DEFAULT_RECENT_VERSIONS,
};
pub use loader::ConfigLoader;
