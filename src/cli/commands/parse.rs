//! Parse command implementation
//!
//! Parses every input, prints a per-file summary with structural diagnostics
//! and optionally writes each schema as a JSON document.

use super::shared::{FileOutcome, RunSummary, discover_inputs, parse_batch};
use crate::cli::args::{GlobalArgs, ParseArgs};
use crate::config::Config;
use crate::parser::{LogFormat, LogParser, ParseResult, ParseStats};
use crate::schema::Schema;
use crate::validation::ValidationReport;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// JSON document written per parsed file
#[derive(Debug, Serialize)]
pub struct ParseReport<'a> {
    pub source: String,
    pub format: LogFormat,
    pub parsed_at: String,
    pub schema: &'a Schema,
    pub stats: &'a ParseStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<&'a ValidationReport>,
}

impl<'a> ParseReport<'a> {
    pub fn new(source: &Path, format: LogFormat, result: &'a ParseResult) -> Self {
        Self {
            source: source.display().to_string(),
            format,
            parsed_at: chrono::Utc::now().to_rfc3339(),
            schema: &result.data,
            stats: &result.stats,
            validation: result.validation.as_ref(),
        }
    }
}

pub async fn run_parse(args: ParseArgs, global: &GlobalArgs, config: Config) -> Result<RunSummary> {
    let start_time = Instant::now();

    let files = discover_inputs(&args.inputs, args.format)?;
    if files.is_empty() {
        anyhow::bail!("No {} input files found", args.format);
    }

    if let Some(dir) = &args.json_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create JSON directory {}", dir.display()))?;
    }

    let fail_fast = args.fail_fast || config.processing.fail_fast;
    let workers = config.processing.workers;
    let parser = LogParser::new(args.format).with_config(config);
    let outcomes = parse_batch(files, parser, workers, fail_fast, global.show_progress()).await;

    let mut summary = RunSummary {
        files_processed: outcomes.len(),
        ..Default::default()
    };

    for outcome in &outcomes {
        if !report_outcome(outcome, global.quiet) {
            summary.files_failed += 1;
        }
        if let (Some(dir), Ok(result)) = (&args.json_dir, &outcome.result) {
            write_json(dir, &outcome.path, args.format, result)?;
        }
    }

    summary.processing_time = start_time.elapsed();
    if !global.quiet {
        print_summary("Parsed", &summary);
    }
    Ok(summary)
}

/// Print one file's result; returns false when the file failed
fn report_outcome(outcome: &FileOutcome, quiet: bool) -> bool {
    let name = outcome.path.display();

    let result = match &outcome.result {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{} {}: {}", "✗".bright_red(), name, e);
            return false;
        }
    };

    let clean = result.stats.is_clean();
    if !quiet {
        let mark = if clean { "✓".bright_green() } else { "!".bright_yellow() };
        println!(
            "{} {}: {} attributes from {} lines ({} blocks, {} failed)",
            mark,
            name,
            result.data.len(),
            result.stats.lines_read,
            result.stats.blocks_committed,
            result.stats.blocks_failed
        );
        for diagnostic in &result.stats.diagnostics {
            println!("    {}", diagnostic.to_string().yellow());
        }
        if let Some(report) = &result.validation {
            for diagnostic in &report.diagnostics {
                println!("    {}", diagnostic.to_string().bright_magenta());
            }
        }
    }
    clean
}

fn write_json(dir: &Path, source: &Path, format: LogFormat, result: &ParseResult) -> Result<()> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let target = dir.join(format!("{stem}.json"));

    let report = ParseReport::new(source, format, result);
    let text = serde_json::to_string_pretty(&report)?;
    std::fs::write(&target, text)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    debug!("Wrote JSON report {}", target.display());
    Ok(())
}

/// Print the closing line shared by batch commands
pub fn print_summary(verb: &str, summary: &RunSummary) {
    let duration = indicatif::HumanDuration(summary.processing_time);
    let line = format!(
        "{} {} files in {} ({} failed)",
        verb, summary.files_processed, duration, summary.files_failed
    );
    if summary.files_failed == 0 {
        println!("\n{}", line.bright_green());
    } else {
        println!("\n{}", line.bright_yellow());
    }
    info!("{}", line);
}
