//! labelmatch - inter-annotator agreement for annotated HTML
//!
//! ```bash
//! # Label-level matching between two or more annotated copies
//! labelmatch match annotator_a.html annotator_b.html --min-overlap 0.6
//!
//! # Category-set overview only
//! labelmatch overview annotator_*.html -o overview.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use labelmatch::{AppConfig, analyze_files, overview_files};

/// Inter-annotator agreement for annotated HTML files
#[derive(Parser)]
#[command(name = "labelmatch")]
#[command(author, version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter used when RUST_LOG is unset (e.g. "info", "matcher=debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Match labels across documents by token overlap
    #[command(visible_alias = "m")]
    Match(MatchArgs),

    /// Compare the category sets each annotator used
    #[command(visible_alias = "o")]
    Overview(OverviewArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// Annotated HTML files (2 or more)
    #[arg(required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

#[derive(Args)]
struct MatchArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Minimum overlap ratio for a label match (0.0 - 1.0)
    #[arg(long)]
    min_overlap: Option<f64>,

    /// Match documents in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(Args)]
struct OverviewArgs {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = serde_json::json!({ "error": format!("{err:#}") });
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Match(args) => {
            let mut config = load_config(&args.common)?;
            if let Some(min_overlap) = args.min_overlap {
                config.matcher.min_overlap = min_overlap;
            }
            if args.parallel {
                config.matcher.parallel = true;
            }
            config
                .validate()
                .context("invalid command-line options")?;

            let report = analyze_files(&args.common.files, &config)?;
            emit(&report, &args.common, &config)
        }
        Commands::Overview(args) => {
            let config = load_config(&args.common)?;
            let overview = overview_files(&args.common.files, &config)?;
            emit(&overview, &args.common, &config)
        }
    }
}

fn load_config(args: &CommonArgs) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if args.compact {
        config.output.pretty = false;
    }
    Ok(config)
}

fn emit<T: Serialize>(value: &T, args: &CommonArgs, config: &AppConfig) -> Result<()> {
    let json = if config.output.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match &args.output {
        Some(path) => {
            write_output(path, &json)?;
            println!("Results written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn write_output(path: &Path, json: &str) -> Result<()> {
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
