//! Common test utilities and helpers
//!
//! Shared functionality for integration tests:
//! - Fixture data directories with an index and CSV snapshots
//! - Assertion helpers for JSON reports
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::fixtures;
//!
//! let data = fixtures::DataDir::standard().unwrap();
//! let mut cmd = common::get_bin();
//! cmd.current_dir(data.root()).arg("versions");
//! ```

pub mod assertions;
pub mod fixtures;

use assert_cmd::Command;

/// The size-analyzer binary, with logging and emoji disabled
#[allow(dead_code)]
pub fn get_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_size-analyzer"));
    cmd.env_remove("RUST_LOG").env("NO_EMOJI", "1");
    cmd
}
