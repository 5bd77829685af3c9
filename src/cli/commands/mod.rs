//! Command implementations for the qclog CLI
//!
//! Each subcommand lives in its own module:
//! - `parse`: batch extraction with optional JSON output
//! - `validate`: batch extraction plus invariant and completeness checks
//! - `convert`: one file to another format
//! - `diff`: Molden round-trip comparison

pub mod convert;
pub mod diff;
pub mod parse;
pub mod shared;
pub mod validate;

pub use shared::RunSummary;

use crate::cli::args::{Args, Commands};
use anyhow::Result;
use tracing::debug;

/// Main command runner
pub async fn run(args: Args) -> Result<RunSummary> {
    let Some(command) = args.command else {
        anyhow::bail!("No command given");
    };

    shared::setup_logging(&args.global);
    debug!("Command line arguments: {:?}", command);

    args.global.validate()?;
    let config = shared::load_configuration(&args.global)?;
    debug!("Loaded configuration: {:?}", config);

    match command {
        Commands::Parse(parse_args) => parse::run_parse(parse_args, &args.global, config).await,
        Commands::Validate(validate_args) => {
            validate::run_validate(validate_args, &args.global, config).await
        }
        Commands::Convert(convert_args) => {
            convert::run_convert(convert_args, &args.global, config).await
        }
        Commands::Diff(diff_args) => diff::run_diff(diff_args, &args.global, config).await,
    }
}
