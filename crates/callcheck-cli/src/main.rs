//! callcheck - function-call conformance checks from the command line.
//!
//! The `callcheck` command evaluates one scenario row: it reads the
//! function descriptions, the expected-call specification, and the model
//! output's metadata from files, runs the conformance validator, and
//! prints the scored outcome.
//!
//! ## Commands
//!
//! - `check`: validate one scenario row's tool calls

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, Level};

use callcheck_core::{
    evaluate, explain, init_tracing, write_verdict_json, VerdictArtifact,
};

#[derive(Parser)]
#[command(name = "callcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Function-call conformance validation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one scenario row's tool calls against its expectation
    Check {
        /// Path to the function-description payload (JSON or text)
        #[arg(short, long)]
        functions: PathBuf,

        /// Path to the expected-call specification (JSON or text)
        #[arg(short, long)]
        expected: PathBuf,

        /// Path to the model-output metadata carrying tool_calls (JSON)
        #[arg(short, long)]
        metadata: PathBuf,

        /// Optional path to write the verdict artifact (pretty JSON)
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Check {
            functions,
            expected,
            metadata,
            report,
        } => run_check_command(&functions, &expected, &metadata, report.as_deref()),
    }
}

fn run_check_command(
    functions: &std::path::Path,
    expected: &std::path::Path,
    metadata: &std::path::Path,
    report: Option<&std::path::Path>,
) -> Result<()> {
    let descriptions = std::fs::read_to_string(functions)
        .with_context(|| format!("read function descriptions {:?}", functions))?;
    let expectation = std::fs::read_to_string(expected)
        .with_context(|| format!("read expected calls {:?}", expected))?;
    let metadata_raw = std::fs::read_to_string(metadata)
        .with_context(|| format!("read metadata {:?}", metadata))?;
    let metadata_value: Value =
        serde_json::from_str(&metadata_raw).with_context(|| format!("parse {:?}", metadata))?;

    let verdict = evaluate(&descriptions, &expectation, &metadata_value)
        .context("evaluate scenario row")?;

    info!(
        event = "check.evaluated",
        valid = verdict.valid(),
        code = verdict.code().unwrap_or("ok"),
    );

    let artifact = VerdictArtifact::from_verdict(&verdict);
    if let Some(path) = report {
        write_verdict_json(path, &artifact)?;
        info!(event = "check.report_written", path = %path.display());
    }

    println!("{}", explain(&verdict));
    if !verdict.valid() {
        std::process::exit(1);
    }
    Ok(())
}
