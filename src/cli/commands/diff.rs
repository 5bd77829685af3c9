//! Diff command implementation
//!
//! Both files pass through the Molden reformatter and the canonical texts
//! are compared line by line. Any differing line fails the run.

use super::shared::RunSummary;
use crate::cli::args::{DiffArgs, GlobalArgs};
use crate::config::Config;
use crate::writer::{DiffLine, MoldenReformatter, structural_diff};
use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;
use tracing::info;

pub async fn run_diff(args: DiffArgs, global: &GlobalArgs, mut config: Config) -> Result<RunSummary> {
    let start_time = Instant::now();

    if let Some(digits) = args.digits {
        config.reformat.significant_digits = digits;
        config
            .validate()
            .map_err(|message| anyhow::anyhow!("Invalid --digits: {message}"))?;
    }

    let produced = tokio::fs::read_to_string(&args.produced)
        .await
        .with_context(|| format!("Failed to read {}", args.produced.display()))?;
    let reference = tokio::fs::read_to_string(&args.reference)
        .await
        .with_context(|| format!("Failed to read {}", args.reference.display()))?;

    let reformatter = MoldenReformatter::new(config.reformat);
    let diff = structural_diff(
        &reformatter.reformat(&produced),
        &reformatter.reformat(&reference),
    );
    info!("{} differing lines", diff.len());

    if !global.quiet || !diff.is_empty() {
        for line in &diff {
            match line {
                DiffLine::Removed(_) => println!("{}", line.to_string().red()),
                DiffLine::Added(_) => println!("{}", line.to_string().green()),
            }
        }
    }

    if diff.is_empty() && !global.quiet {
        println!("{}", "Files are structurally identical".bright_green());
    }

    Ok(RunSummary {
        files_processed: 2,
        files_failed: usize::from(!diff.is_empty()),
        processing_time: start_time.elapsed(),
    })
}
