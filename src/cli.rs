//! Command-line interface for solscan.

use clap::Parser;
use colored::*;
use std::path::PathBuf;

use crate::catalog::{Catalog, Category};
use crate::config::{self, RunConfig};
use crate::{compile, install, report, scope};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Static analyzer for Solidity sources.
///
/// Resolves a scope of `.sol` files, builds a syntax tree for each, runs
/// the issue catalog against every file, and writes a categorized markdown
/// report.
#[derive(Parser)]
#[command(name = "solscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Scope descriptor: a directory, a file whose text contains paths, or
    /// an inline list of paths
    pub scope: String,

    /// Where to write the report
    #[arg(short, long, default_value = "report.md")]
    pub output: PathBuf,

    /// Project root that scope paths are resolved against
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Path to a YAML run configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: markdown or json
    #[arg(short, long, default_value = "markdown")]
    pub format: String,

    /// Install project dependencies (npm/yarn/forge) before scanning
    #[arg(long)]
    pub install_deps: bool,

    /// Include the list of analyzed files in the report
    #[arg(short, long)]
    pub verbose: bool,

    /// Exit non-zero when this category (or a more severe one) has findings
    #[arg(long, value_name = "CODE")]
    pub fail_on: Option<String>,
}

/// Run a full scan.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    if cli.format != "markdown" && cli.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'markdown' or 'json'",
            cli.format
        );
        return Ok(EXIT_ERROR);
    }

    // Load and validate configuration before touching any file.
    let run_config = match &cli.config {
        Some(path) => match RunConfig::parse_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error parsing config: {}", e);
                return Ok(EXIT_ERROR);
            }
        },
        None => RunConfig::default(),
    };
    if let Err(e) = config::validate(&run_config) {
        eprintln!("Error: invalid config: {}", e);
        return Ok(EXIT_ERROR);
    }

    let categories = run_config.category_order()?;

    let fail_on = match &cli.fail_on {
        Some(code) => match Category::parse(code) {
            Some(category) if categories.contains(&category) => Some(category),
            Some(_) => {
                eprintln!("Error: --fail-on category {:?} is not in the report", code);
                return Ok(EXIT_ERROR);
            }
            None => {
                eprintln!("Error: unknown --fail-on category {:?}", code);
                return Ok(EXIT_ERROR);
            }
        },
        None => None,
    };

    // Catalog validation is fatal before any file is processed.
    let catalog = Catalog::load(&run_config)?;

    let paths = scope::resolve(&cli.scope, &cli.root, &run_config)?;
    println!(
        "{} {} file(s) in scope",
        "Scope:".dimmed(),
        paths.len().to_string().bold()
    );

    if cli.install_deps {
        install::install_dependencies(&cli.root)?;
    }

    // Every file needs a tree before analysis starts; no partial results.
    let files = compile::compile(&cli.root, &paths)?;

    let results = report::build(&categories, &files, &catalog);
    let rendered = match cli.format.as_str() {
        "json" => report::render_json(&results, &files)?,
        _ => report::render(&results, &files, cli.verbose),
    };

    std::fs::write(&cli.output, rendered)?;
    println!(
        "{} {}",
        "Report written to".green(),
        cli.output.display().to_string().bold()
    );

    // CI gate: findings at or above the requested category fail the run.
    if let Some(gate) = fail_on {
        let gate_index = categories.iter().position(|&c| c == gate).unwrap_or(0);
        let tripped = results[..=gate_index]
            .iter()
            .any(|result| result.issues.iter().any(|issue| issue.count > 0));
        if tripped {
            eprintln!(
                "{}",
                format!("Findings at or above category {}", gate.code()).red()
            );
            return Ok(EXIT_FAILED);
        }
    }

    Ok(EXIT_SUCCESS)
}
