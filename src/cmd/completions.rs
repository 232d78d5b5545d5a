//! Completions command implementation
//!
//! Handles `size-analyzer completions <SHELL>`, which writes a shell
//! completion script to stdout.

use clap::{Arg, ArgAction, Command};
use clap_complete::{generate, Shell};
use std::io::Write;

const BIN_NAME: &str = "size-analyzer";

fn platform_arg() -> Arg {
    Arg::new("platform")
        .long("platform")
        .short('p')
        .help("Platform name from the analysis index")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output as JSON")
        .action(ArgAction::SetTrue)
}

// Cli lives in main.rs, so the command tree is rebuilt here.
fn command() -> Command {
    Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build artifact size evolution analyzer")
        .arg(
            Arg::new("no-emoji")
                .long("no-emoji")
                .help("Disable emoji output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Directory holding the index and snapshots")
                .global(true),
        )
        .subcommand(
            Command::new("compare")
                .about("Compare two versions of a platform")
                .arg(platform_arg())
                .arg(Arg::new("from").long("from"))
                .arg(Arg::new("to").long("to"))
                .arg(Arg::new("query").long("query"))
                .arg(Arg::new("metric").long("metric").short('m'))
                .arg(Arg::new("threshold").long("threshold").short('t'))
                .arg(Arg::new("limit").long("limit").short('n'))
                .arg(Arg::new("all-metrics").long("all-metrics").action(ArgAction::SetTrue))
                .arg(Arg::new("show-unchanged").long("show-unchanged").action(ArgAction::SetTrue))
                .arg(Arg::new("check").long("check").action(ArgAction::SetTrue))
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("timeline")
                .about("Show one file's size across versions")
                .arg(Arg::new("file").required(true))
                .arg(platform_arg())
                .arg(Arg::new("from").long("from"))
                .arg(Arg::new("to").long("to"))
                .arg(Arg::new("metric").long("metric").short('m'))
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("versions")
                .about("List known versions")
                .arg(platform_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("metrics")
                .about("List the metric columns of a snapshot")
                .arg(platform_arg())
                .arg(Arg::new("release").value_name("VERSION"))
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(Arg::new("shell").required(true)),
        )
}

/// Write the completion script for `shell` to `out`
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

/// Generate shell completion scripts
///
/// # Examples
///
/// ```bash
/// # Bash
/// size-analyzer completions bash > /etc/bash_completion.d/size-analyzer
///
/// # Zsh
/// size-analyzer completions zsh > ~/.zfunc/_size-analyzer
/// ```
pub fn cmd_completions(shell: Shell) {
    write_completions(shell, &mut std::io::stdout());
}
