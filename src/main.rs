//! parfind - parallel filename search
//!
//! Entry point for the CLI application.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use parfind::{CancelToken, Outcome, SearchResult};
use tracing_subscriber::EnvFilter;

#[cfg(windows)]
const DEFAULT_ROOT: &str = "C:\\";
#[cfg(not(windows))]
const DEFAULT_ROOT: &str = "/";

/// Find files by name across a directory tree, in parallel
#[derive(Parser, Debug)]
#[command(
    name = "parfind",
    version,
    about = "Find files by name across a directory tree, in parallel",
    after_help = "EXAMPLES:\n    \
        parfind report            # report.* anywhere under /\n    \
        parfind notes.md -r ~/src # exactly notes.md\n    \
        parfind notes.md -a       # notes with any extension"
)]
struct CliArgs {
    /// Filename to search for. Without an extension every extension matches.
    #[arg(value_name = "NAME")]
    name: String,

    /// Match any extension, even if NAME has one
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Directory to search from
    #[arg(short = 'r', long, default_value = DEFAULT_ROOT, value_name = "PATH")]
    root: PathBuf,

    /// Number of worker threads
    #[arg(short = 'w', long, default_value_t = default_workers(), value_name = "NUM")]
    workers: usize,

    /// Work units to split the tree into (default: 2 per worker)
    #[arg(long, value_name = "NUM")]
    units: Option<usize>,

    /// Give up after this many seconds and report what was found
    #[arg(long, default_value_t = parfind::DEFAULT_TIMEOUT.as_secs(), value_name = "SECS")]
    timeout: u64,

    /// Case-insensitive name comparison
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Verbose logging to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    setup_logging(args.verbose);

    let token = CancelToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, stopping search...");
        handler_token.cancel();
    })
    .context("Failed to set signal handler")?;

    let mut builder = parfind::search()
        .root(&args.root)
        .name(&args.name)
        .match_all_extensions(args.all)
        .case_insensitive(args.ignore_case)
        .threads(args.workers)
        .timeout(Duration::from_secs(args.timeout))
        .cancel_token(token);
    if let Some(units) = args.units {
        builder = builder.target_units(units);
    }

    let result = builder
        .run()
        .with_context(|| format!("Search for {:?} under {} failed", args.name, args.root.display()))?;

    print_report(&args.name, &result);
    Ok(())
}

fn print_report(name: &str, result: &SearchResult) {
    for m in &result.matches {
        println!("{}  {}", m.directory.display(), m.filename);
    }

    println!("Found {} file(s) matching {:?}", result.matches.len(), name);
    println!("Search took {:.3}s", result.elapsed_secs());

    match result.outcome {
        Outcome::Complete => {}
        Outcome::Interrupted { incomplete } => {
            println!("Search stopped early (interrupted, {incomplete} unit(s) unfinished)");
        }
        Outcome::TimedOut { incomplete } => {
            println!(
                "Search incomplete (timed out, {incomplete} unit(s) unfinished); the count is a lower bound"
            );
        }
    }
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("parfind=debug,warn")
    } else {
        EnvFilter::new("parfind=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
