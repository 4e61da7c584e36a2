//! CLI entry point for the crossword generator.
//!
//! Usage:
//!   crossword-generator <structure.txt> <words.txt> [output.txt] [options]
//!
//! Options:
//!   --timeout <seconds>   Maximum search time (default: unbounded)
//!   --max-steps <n>       Maximum tentative assignments (default: unbounded)
//!   --json                Print a JSON report instead of the grid
//!   -v, --verbose         Increase log verbosity (repeatable)

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, LevelFilter};
use serde::Serialize;

use crossword_generator::{
    load_words, Crossword, CrosswordCreator, Placement, SolveStatus, SolverConfig, SolverResult,
};

#[derive(Parser)]
#[command(name = "crossword-generator")]
#[command(about = "Fill a crossword structure with words from a word list")]
#[command(version)]
struct Cli {
    /// Structure file: `_` marks an open cell, anything else is blocked
    #[arg(value_name = "STRUCTURE")]
    structure: PathBuf,

    /// Word list, one word per line
    #[arg(value_name = "WORDS")]
    words: PathBuf,

    /// Also write the filled grid to this file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Maximum search time in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of tentative assignments
    #[arg(long)]
    max_steps: Option<usize>,

    /// Print a JSON report
    #[arg(long)]
    json: bool,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// JSON report of a solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    status: &'static str,
    search_exhausted: bool,
    steps: usize,
    backtracks: usize,
    time_elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    placements: Option<Vec<Placement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grid: Option<Vec<String>>,
}

fn configure_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .init();
}

fn format_result(result: &SolverResult, crossword: &Crossword) -> SolveOutput {
    SolveOutput {
        solved: result.is_solved(),
        status: match result.status {
            SolveStatus::Solved => "solved",
            SolveStatus::Unsatisfiable => "unsatisfiable",
            SolveStatus::Interrupted => "interrupted",
        },
        search_exhausted: result.search_exhausted,
        steps: result.steps,
        backtracks: result.backtracks,
        time_elapsed_ms: result.time_elapsed_ms,
        placements: result.assignment.as_ref().map(|a| a.placements()),
        grid: result.assignment.as_ref().map(|a| a.render_rows(crossword)),
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let crossword = Crossword::from_file(&cli.structure)
        .with_context(|| format!("loading structure {}", cli.structure.display()))?;
    let vocabulary = load_words(&cli.words)
        .with_context(|| format!("loading words {}", cli.words.display()))?;

    let config = SolverConfig {
        timeout: cli.timeout.map(Duration::from_secs),
        max_steps: cli.max_steps,
    };

    let mut creator = CrosswordCreator::new(&crossword, &vocabulary);
    let result = creator.solve_with_config(&config);

    if cli.json {
        let output = format_result(&result, &crossword);
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    let Some(assignment) = &result.assignment else {
        if !cli.json {
            match result.status {
                SolveStatus::Interrupted => println!("No solution found within the search budget."),
                _ => println!("No solution."),
            }
        }
        return Ok(false);
    };

    let rendered = assignment.render(&crossword);
    if !cli.json {
        print!("{}", rendered);
    }
    if let Some(path) = &cli.output {
        fs::write(path, &rendered)
            .with_context(|| format!("writing output {}", path.display()))?;
    }
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    configure_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
