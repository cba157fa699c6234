//! Ghostscan CLI
//!
//! Scans documents for human-invisible text and prompt-injection phrasing
//! before their contents are handed to an LLM.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shared_types::{DocumentStatus, ScanResponse};
use visibility_engine::{EngineConfig, SanitizeStrategy, VisibilityEngine};

mod report;

#[derive(Parser, Debug)]
#[command(name = "ghostscan")]
#[command(version, about = "Detect human-invisible text in documents before LLM processing")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Engine configuration TOML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show detailed output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a document for hidden text and prompt-injection risk
    Scan {
        /// Document to analyze
        document: PathBuf,

        /// Emit the JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Rebuild a document's text with hidden spans removed or flagged
    Clean {
        /// Document to clean
        document: PathBuf,

        /// Write cleaned text to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sanitization strategy: strip, flag, or preserve
        #[arg(long, default_value = "strip")]
        strategy: String,
    },
}

const EXIT_SAFE: u8 = 1;
const EXIT_SUSPICIOUS: u8 = 2;
const EXIT_ERROR: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let engine = VisibilityEngine::with_config(config);

    match cli.command {
        Command::Scan { document, json } => scan(&engine, &document, json, cli.verbose),
        Command::Clean {
            document,
            output,
            strategy,
        } => clean(&engine, &document, output.as_deref(), &strategy, cli.verbose),
    }
}

fn scan(engine: &VisibilityEngine, document: &Path, json: bool, verbose: bool) -> anyhow::Result<u8> {
    let extraction = extract_core::extract_spans(document)?;
    tracing::debug!(spans = extraction.spans.len(), "extraction complete");
    if verbose {
        eprintln!("Extracted {} text spans", extraction.spans.len());
    }

    let analysis = engine.analyze(&extraction.spans, &extraction.pages);
    let response = ScanResponse::from_assessment(&analysis.assessment);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", report::render_text_report(&response, verbose));
    }

    Ok(exit_code_for(response.status))
}

fn clean(
    engine: &VisibilityEngine,
    document: &Path,
    output: Option<&Path>,
    strategy: &str,
    verbose: bool,
) -> anyhow::Result<u8> {
    let strategy: SanitizeStrategy = strategy.parse().map_err(anyhow::Error::msg)?;

    let extraction = extract_core::extract_spans(document)?;
    let (analysis, sanitized) = engine.sanitize(&extraction.spans, &extraction.pages, strategy);

    eprintln!(
        "Removed {} and flagged {} of {} spans (risk: {})",
        sanitized.removed_count,
        sanitized.flagged_count,
        sanitized.original_span_count,
        analysis.assessment.level
    );
    if verbose {
        for sample in &sanitized.removed_text_sample {
            eprintln!("  removed: '{sample}'");
        }
    }

    match output {
        Some(path) => {
            std::fs::write(path, &sanitized.safe_text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote cleaned text to {}", path.display());
        }
        None => println!("{}", sanitized.safe_text),
    }

    Ok(0)
}

fn exit_code_for(status: DocumentStatus) -> u8 {
    match status {
        DocumentStatus::Safe => EXIT_SAFE,
        DocumentStatus::Suspicious => EXIT_SUSPICIOUS,
    }
}
