//! qclog Library
//!
//! A Rust library for normalizing quantum-chemistry program output into one
//! typed data model and writing it back out in exchange formats.
//!
//! This library provides tools for:
//! - Parsing Molden and XYZ files line by line with per-block recovery
//! - Canonicalizing units (bohr/Å, hartree/eV) and labels (shells, symmetries)
//! - Validating the populated schema against its shape invariants
//! - Writing Molden and XYZ documents from a schema
//! - Round-trip verification through a canonical reformatter and line diff
//!
//! ```no_run
//! use qclog::{LogFormat, LogParser, MoldenWriter, FormatWriter};
//!
//! let result = LogParser::new(LogFormat::Molden).parse_file("water.molden".as_ref())?;
//! let text = MoldenWriter::default().generate_repr(&result.data)?;
//! # Ok::<(), qclog::QcError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod schema;
pub mod validation;
pub mod writer;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::Config;
pub use error::{QcError, Result};
pub use parser::{LogFormat, LogParser, ParseDiagnostic, ParseResult, ParseStats};
pub use schema::{Attribute, AttributeValue, Schema};
pub use validation::{Diagnostic, ValidationReport, Validator};
pub use writer::{
    DiffLine, FormatWriter, MoldenReformatter, MoldenWriter, XyzWriter, structural_diff,
    writer_for,
};
