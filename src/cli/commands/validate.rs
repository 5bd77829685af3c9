//! Validate command implementation
//!
//! A file passes when it parsed without structural failures, the validation
//! report is empty and every `--require`d attribute is present.

use super::parse::print_summary;
use super::shared::{FileOutcome, RunSummary, discover_inputs, parse_batch};
use crate::cli::args::{GlobalArgs, ValidateArgs};
use crate::config::Config;
use crate::parser::LogParser;
use crate::schema::Attribute;
use crate::validation::require_for;
use anyhow::Result;
use colored::*;
use std::time::Instant;

pub async fn run_validate(
    args: ValidateArgs,
    global: &GlobalArgs,
    mut config: Config,
) -> Result<RunSummary> {
    let start_time = Instant::now();

    let files = discover_inputs(&args.inputs, args.format)?;
    if files.is_empty() {
        anyhow::bail!("No {} input files found", args.format);
    }

    config.parser.validate_after_parse = true;
    if args.check_hessian {
        config.validation.check_hessian_frequencies = true;
    }

    let required: Vec<Attribute> = args
        .require
        .map(|list| list.attributes)
        .unwrap_or_default();

    let fail_fast = args.fail_fast || config.processing.fail_fast;
    let workers = config.processing.workers;
    let parser = LogParser::new(args.format).with_config(config);
    let outcomes = parse_batch(files, parser, workers, fail_fast, global.show_progress()).await;

    let mut summary = RunSummary {
        files_processed: outcomes.len(),
        ..Default::default()
    };

    for outcome in &outcomes {
        let problems = file_problems(outcome, &required);
        if problems.is_empty() {
            if !global.quiet {
                println!("{} {}", "✓".bright_green(), outcome.path.display());
            }
        } else {
            summary.files_failed += 1;
            eprintln!("{} {}", "✗".bright_red(), outcome.path.display());
            for problem in problems {
                eprintln!("    {}", problem.yellow());
            }
        }
    }

    summary.processing_time = start_time.elapsed();
    if !global.quiet {
        print_summary("Validated", &summary);
    }
    Ok(summary)
}

/// Everything wrong with one file, in reading order
fn file_problems(outcome: &FileOutcome, required: &[Attribute]) -> Vec<String> {
    let result = match &outcome.result {
        Ok(result) => result,
        Err(e) => return vec![e.to_string()],
    };

    let mut problems: Vec<String> = result
        .stats
        .diagnostics
        .iter()
        .map(ToString::to_string)
        .collect();

    if let Some(report) = &result.validation {
        problems.extend(report.diagnostics.iter().map(ToString::to_string));
    }

    if let Err(e) = require_for("validate", &result.data, required) {
        problems.push(e.to_string());
    }

    problems
}
