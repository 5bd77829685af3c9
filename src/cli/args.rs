//! Command-line argument definitions for qclog
//!
//! This module defines the CLI interface using the clap derive API. Global
//! flags (verbosity, config file, worker count) apply to every subcommand.

use crate::parser::LogFormat;
use crate::schema::Attribute;
use crate::{QcError, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the quantum-chemistry log normalizer
#[derive(Debug, Clone, Parser)]
#[command(
    name = "qclog",
    version,
    about = "Normalize quantum-chemistry output and write it back as Molden or XYZ",
    long_about = "Reads Molden and XYZ files into one typed schema with canonical units \
                  (Ångström, eV) and labels, validates the result, converts between formats \
                  and checks Molden round trips with a structural diff."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags shared by every subcommand
#[derive(Debug, Clone, ClapArgs)]
pub struct GlobalArgs {
    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress output except errors"
    )]
    pub quiet: bool,

    /// TOML configuration file; unspecified keys keep their defaults
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Number of files parsed concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        global = true,
        help = "Number of parallel workers (defaults to the CPU count)"
    )]
    pub workers: Option<usize>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse files and report what was extracted
    Parse(ParseArgs),
    /// Parse files and check schema invariants
    Validate(ValidateArgs),
    /// Convert one file to another format
    Convert(ConvertArgs),
    /// Compare two Molden files after canonical reformatting
    Diff(DiffArgs),
}

/// Arguments for the parse command
#[derive(Debug, Clone, ClapArgs)]
pub struct ParseArgs {
    /// Files, directories (searched recursively) or glob patterns
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Input format
    #[arg(short = 'f', long = "format", value_enum, default_value = "molden")]
    pub format: LogFormat,

    /// Write each parsed schema as JSON into this directory
    #[arg(long = "json-dir", value_name = "DIR")]
    pub json_dir: Option<PathBuf>,

    /// Stop at the first file that fails
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,
}

/// Arguments for the validate command
#[derive(Debug, Clone, ClapArgs)]
pub struct ValidateArgs {
    /// Files, directories (searched recursively) or glob patterns
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Input format
    #[arg(short = 'f', long = "format", value_enum, default_value = "molden")]
    pub format: LogFormat,

    /// Attributes that must be present (comma-separated)
    #[arg(long = "require", value_name = "LIST")]
    pub require: Option<AttributeList>,

    /// Diagonalize hessians and compare with the stored frequencies
    #[arg(long = "check-hessian")]
    pub check_hessian: bool,

    /// Stop at the first file that fails
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,
}

/// Arguments for the convert command
#[derive(Debug, Clone, ClapArgs)]
pub struct ConvertArgs {
    /// Input file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input format
    #[arg(long = "from", value_enum, default_value = "molden")]
    pub from: LogFormat,

    /// Output format
    #[arg(long = "to", value_enum, default_value = "molden")]
    pub to: LogFormat,

    /// Output file; defaults to the input name with the output extension
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(long = "force")]
    pub force: bool,
}

/// Arguments for the diff command
#[derive(Debug, Clone, ClapArgs)]
pub struct DiffArgs {
    /// Molden file under test
    #[arg(value_name = "PRODUCED")]
    pub produced: PathBuf,

    /// Reference Molden file
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,

    /// Significant digits compared for floating-point values
    #[arg(long = "digits", value_name = "N")]
    pub digits: Option<usize>,
}

/// Wrapper for parsing comma-separated attribute lists
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeList {
    pub attributes: Vec<Attribute>,
}

impl FromStr for AttributeList {
    type Err = QcError;

    fn from_str(s: &str) -> Result<Self> {
        let attributes = s
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Attribute::from_str)
            .collect::<Result<Vec<_>>>()?;

        if attributes.is_empty() {
            return Err(QcError::configuration("Attribute list cannot be empty"));
        }

        Ok(AttributeList { attributes })
    }
}

impl GlobalArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Validate the global arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(QcError::configuration(
                "Number of workers must be greater than 0",
            ));
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(QcError::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }
}

impl ConvertArgs {
    /// Output path, derived from the input when not given
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.input.with_extension(self.to.extension()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let output = self.output_path();
        if output == self.input {
            return Err(QcError::configuration(format!(
                "Output would overwrite the input file: {}",
                output.display()
            )));
        }
        if output.exists() && !self.force {
            return Err(QcError::configuration(format!(
                "Output file exists (use --force to overwrite): {}",
                output.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        let args = Args::parse_from(["qclog", "-vv", "parse", "a.molden", "dir/", "--json-dir", "out"]);
        assert_eq!(args.global.get_log_level(), "debug");

        match args.command {
            Some(Commands::Parse(parse)) => {
                assert_eq!(parse.inputs, vec!["a.molden", "dir/"]);
                assert_eq!(parse.format, LogFormat::Molden);
                assert_eq!(parse.json_dir, Some(PathBuf::from("out")));
            }
            other => panic!("expected parse command, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_command_with_requirements() {
        let args = Args::parse_from([
            "qclog",
            "validate",
            "--format",
            "xyz",
            "--require",
            "atomic_numbers, atom_coordinates",
            "traj.xyz",
        ]);

        match args.command {
            Some(Commands::Validate(validate)) => {
                assert_eq!(validate.format, LogFormat::Xyz);
                assert_eq!(
                    validate.require.unwrap().attributes,
                    vec![Attribute::AtomicNumbers, Attribute::AtomCoordinates]
                );
            }
            other => panic!("expected validate command, got {other:?}"),
        }
    }

    #[test]
    fn test_attribute_list_rejects_unknown_names() {
        assert!("atomic_numbers,colour".parse::<AttributeList>().is_err());
        assert!(" , ".parse::<AttributeList>().is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["qclog", "-q", "-v", "diff", "a", "b"]).is_err());

        let args = Args::parse_from(["qclog", "diff", "a.molden", "b.molden", "-q"]);
        assert_eq!(args.global.get_log_level(), "error");
        assert!(!args.global.show_progress());
    }

    #[test]
    fn test_convert_output_path() {
        let args = Args::parse_from(["qclog", "convert", "run/water.molden", "--to", "xyz"]);
        let Some(Commands::Convert(convert)) = args.command else {
            panic!("expected convert command");
        };
        assert_eq!(convert.output_path(), PathBuf::from("run/water.xyz"));

        let same = ConvertArgs {
            output: Some(PathBuf::from("run/water.molden")),
            ..convert
        };
        assert!(same.validate().is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let args = Args::parse_from(["qclog", "-j", "0", "parse", "x.molden"]);
        assert!(args.global.validate().is_err());
    }
}
