//! Convert command implementation

use super::shared::RunSummary;
use crate::cli::args::{ConvertArgs, GlobalArgs};
use crate::config::Config;
use crate::parser::LogParser;
use crate::writer::writer_for;
use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;
use tracing::{info, warn};

pub async fn run_convert(
    args: ConvertArgs,
    global: &GlobalArgs,
    config: Config,
) -> Result<RunSummary> {
    let start_time = Instant::now();
    args.validate()?;

    let output = args.output_path();
    info!(
        "Converting {} ({}) to {} ({})",
        args.input.display(),
        args.from,
        output.display(),
        args.to
    );

    let writer = writer_for(args.to, &config.writer);
    let parser = LogParser::new(args.from).with_config(config);

    let input = args.input.clone();
    let result = tokio::task::spawn_blocking(move || parser.parse_file(&input))
        .await
        .context("Parse task failed")?
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    for diagnostic in &result.stats.diagnostics {
        warn!("{}", diagnostic);
    }
    if let Some(report) = &result.validation {
        for diagnostic in &report.diagnostics {
            warn!("Validation: {}", diagnostic);
        }
    }

    writer
        .write_file(&result.data, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if !global.quiet {
        println!(
            "{} {} -> {}",
            "✓".bright_green(),
            args.input.display(),
            output.display()
        );
    }

    Ok(RunSummary {
        files_processed: 1,
        files_failed: usize::from(!result.stats.is_clean()),
        processing_time: start_time.elapsed(),
    })
}
