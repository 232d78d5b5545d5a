use clap::{Parser, Subcommand};
use clap_complete::Shell;
use size_analyzer::cmd::{self, CompareOptions, TimelineOptions};
use std::path::PathBuf;
use std::process;

/// Build artifact size evolution analyzer
///
/// size-analyzer compares per-file size snapshots (one CSV per platform and
/// version) to show what grew, what shrank and what moved between releases.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    no_emoji: bool,

    /// Directory holding the analysis index and <platform>/<version>.csv files
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two versions of a platform
    Compare {
        /// Platform name (optional when the index has only one)
        #[arg(short, long)]
        platform: Option<String>,

        /// Baseline version (defaults to the second most recent)
        #[arg(long)]
        from: Option<String>,

        /// Version to compare (defaults to the most recent)
        #[arg(long)]
        to: Option<String>,

        /// Query string such as 'platform=linux&from=1.0&to=1.1'
        #[arg(long, conflicts_with_all = ["platform", "from", "to"])]
        query: Option<String>,

        /// Metric column (defaults to the config value or the first column)
        #[arg(short, long, conflicts_with = "all_metrics")]
        metric: Option<String>,

        /// Minimum absolute change in bytes counted as a change
        #[arg(short, long)]
        threshold: Option<u64>,

        /// Compare every metric column
        #[arg(long)]
        all_metrics: bool,

        /// Check the size budget from .size-analyzer.toml (fail if exceeded)
        #[arg(long)]
        check: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Maximum number of rows in the table
        #[arg(short = 'n', long, default_value_t = 25)]
        limit: usize,

        /// Include unchanged files in the table
        #[arg(long)]
        show_unchanged: bool,
    },

    /// Show one file's size across versions
    Timeline {
        /// File or compile unit path
        #[arg(value_name = "FILE")]
        file: String,

        /// Platform name (optional when the index has only one)
        #[arg(short, long)]
        platform: Option<String>,

        /// First version (defaults to the start of the recent range)
        #[arg(long)]
        from: Option<String>,

        /// Last version (defaults to the latest)
        #[arg(long)]
        to: Option<String>,

        /// Metric column
        #[arg(short, long)]
        metric: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List known versions
    Versions {
        /// Only this platform
        #[arg(short, long)]
        platform: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the identity and metric columns of a snapshot
    Metrics {
        /// Platform name (optional when the index has only one)
        #[arg(short, long)]
        platform: Option<String>,

        /// Version (defaults to the latest)
        #[arg(value_name = "VERSION")]
        release: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        println!("size-analyzer v{}", env!("CARGO_PKG_VERSION"));
        println!("Build artifact size evolution analyzer\n");
        println!("Usage: size-analyzer <COMMAND>\n");
        println!("Commands:");
        println!("  compare      Compare two versions of a platform");
        println!("  timeline     Show one file's size across versions");
        println!("  versions     List known versions");
        println!("  metrics      List the metric columns of a snapshot");
        println!("  completions  Generate shell completions");
        println!("\nRun 'size-analyzer <COMMAND> --help' for more information on a command.");
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        cmd::cmd_completions(shell);
        return Ok(());
    }

    let config = cmd::load_config(cli.data_dir.as_deref())?;

    match command {
        Commands::Compare {
            platform,
            from,
            to,
            query,
            metric,
            threshold,
            all_metrics,
            check,
            json,
            limit,
            show_unchanged,
        } => cmd::cmd_compare(
            &config,
            &CompareOptions {
                platform,
                from,
                to,
                query,
                metric,
                threshold,
                all_metrics,
                check,
                json,
                limit,
                show_unchanged,
            },
        ),
        Commands::Timeline {
            file,
            platform,
            from,
            to,
            metric,
            json,
        } => cmd::cmd_timeline(
            &config,
            &TimelineOptions {
                file,
                platform,
                from,
                to,
                metric,
                json,
            },
        ),
        Commands::Versions { platform, json } => {
            cmd::cmd_versions(&config, platform.as_deref(), json)
        }
        Commands::Metrics {
            platform,
            release,
            json,
        } => cmd::cmd_metrics(&config, platform.as_deref(), release.as_deref(), json),
        Commands::Completions { .. } => Ok(()),
    }
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    if let Err(e) = run(cli) {
        use size_analyzer::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        process::exit(ErrorFormatter::exit_code(&e));
    }
}
