//! # tagloc
//!
//! A CLI tool that charts how a codebase's composition evolved across a list
//! of git tags.
//!
//! ## Overview
//!
//! tagloc is built on top of tagloclib. For every checkpoint it totals lines
//! per category (application code, IaC, database, CI/CD, documentation,
//! scripts, config, other), prints a summary table and writes a stacked-bar
//! chart to `docs/repo_evolution.png`.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze the built-in milestone tags in the current repository
//! tagloc
//!
//! # Pick checkpoints explicitly
//! tagloc --checkpoint v1.0=First --checkpoint v2.0=Second
//!
//! # Print the raw report as JSON
//! tagloc --json
//!
//! # Plain table without terminal styling
//! tagloc --format text
//! ```
//!
//! Missing tags, unreadable files, a missing repository and a missing chart
//! capability are all reported and skipped; the exit status stays zero.

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tagloclib::output::DEFAULT_OUTPUT;
use tagloclib::{
    analyze_checkpoints, default_checkpoints, render_chart, ChartOptions, Checkpoint, Classifier,
    EvolutionTable, GitHistory, History, MemoryHistory,
};
use tracing::warn;

use crate::render::OutputMode;
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("tagloc")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Chart per-category line counts across git tags")
        .arg(
            Arg::new("repo")
                .short('C')
                .long("repo")
                .value_parser(value_parser!(PathBuf))
                .default_value(".")
                .help("Path inside the repository to analyze"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_OUTPUT)
                .help("Where to write the chart (PNG)"),
        )
        .arg(
            Arg::new("checkpoint")
                .long("checkpoint")
                .value_name("TAG[=LABEL]")
                .action(ArgAction::Append)
                .value_parser(|s: &str| s.parse::<Checkpoint>())
                .help("Checkpoint to analyze, in order (replaces the built-in milestones)"),
        )
        .arg(
            Arg::new("font")
                .long("font")
                .value_parser(value_parser!(PathBuf))
                .help("TrueType font for the chart (defaults to a system font)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["auto", "term", "text", "term-debug", "json"])
                .default_value("auto")
                .help("Output format for the report"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .conflicts_with("format")
                .help("Print the report as JSON (same as --format json)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Show skipped files and other debug diagnostics"),
        )
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Checkpoints from the command line, or the built-in milestones.
fn extract_checkpoints(matches: &ArgMatches) -> Vec<Checkpoint> {
    match matches.get_many::<Checkpoint>("checkpoint") {
        Some(values) => values.cloned().collect(),
        None => default_checkpoints(),
    }
}

/// Open the repository; without one every checkpoint comes out empty.
fn open_history(repo: &Path) -> Box<dyn History> {
    match GitHistory::discover(repo) {
        Ok(history) => Box::new(history),
        Err(e) => {
            warn!("{}; every checkpoint will be empty", e);
            Box::new(MemoryHistory::new())
        }
    }
}

/// Output mode from `--format`, with `--json` as a shorthand.
fn extract_output_mode(matches: &ArgMatches) -> OutputMode {
    if matches.get_flag("json") {
        return OutputMode::Json;
    }
    matches
        .get_one::<String>("format")
        .map(|s| match s.as_str() {
            "json" => OutputMode::Json,
            "text" => OutputMode::Text,
            "term-debug" => OutputMode::TermDebug,
            "term" => OutputMode::Term,
            _ => OutputMode::Auto,
        })
        .unwrap_or(OutputMode::Auto)
}

fn chart_options(matches: &ArgMatches) -> ChartOptions {
    let mut options = ChartOptions::new();
    if let Some(output) = matches.get_one::<PathBuf>("output") {
        options = options.output(output);
    }
    if let Some(font) = matches.get_one::<PathBuf>("font") {
        options = options.font(font);
    }
    options
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let repo = matches
        .get_one::<PathBuf>("repo")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let checkpoints = extract_checkpoints(matches);

    let history = open_history(&repo);
    let report = analyze_checkpoints(history.as_ref(), &Classifier::default(), &checkpoints);

    let output_mode = extract_output_mode(matches);
    if output_mode.is_structured() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let table = EvolutionTable::from_report(&report);
        match render::render_table(&table, output_mode) {
            Ok(rendered) => print!("{}", rendered),
            Err(e) => warn!("could not render table: {}", e),
        }
    }

    render::print_outcome(&render_chart(&report, &chart_options(matches)), output_mode);
    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("verbose"));

    // Degraded runs still exit cleanly.
    if let Err(e) = run(&matches) {
        eprintln!("Error: {e}");
    }
    ExitCode::SUCCESS
}
