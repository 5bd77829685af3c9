//! Error handling for extraction, schema access and writer operations.
//!
//! Provides error types with enough context to tell apart the four failure
//! classes of the crate: structural parse failures inside one block,
//! shape violations (reported by validation, never raised), missing
//! attributes demanded by a consumer, and access to unset attributes.

use crate::schema::{Attribute, ValueKind};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Structural parse failure in {section} block at line {line}: {reason}")]
    StructuralParse {
        section: String,
        line: usize,
        reason: String,
    },

    #[error("Attribute '{attribute}' is not set")]
    UnsetAttribute { attribute: Attribute },

    #[error("Attribute '{attribute}' holds {expected} values, got {found}")]
    AttributeKindMismatch {
        attribute: Attribute,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Attribute '{attribute}' is not cumulative and cannot be appended to")]
    NotCumulative { attribute: Attribute },

    #[error("Cannot write {format} output, missing attributes: {}", format_attributes(.missing))]
    MissingAttributes {
        format: String,
        missing: Vec<Attribute>,
    },

    #[error("Inconsistent data in '{attribute}': {reason}")]
    InconsistentData { attribute: Attribute, reason: String },

    #[error("Invalid number '{token}': {reason}")]
    InvalidNumber { token: String, reason: String },

    #[error("Unrecognized shell label: {label}")]
    InvalidLabel { label: String },

    #[error("Unknown attribute name: {name}")]
    UnknownAttribute { name: String },

    #[error("Unknown format: {name}")]
    UnknownFormat { name: String },

    #[error("Unit conversion error: {message}")]
    Unit { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Configuration file could not be parsed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Text formatting failed: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl QcError {
    /// Create a structural parse error for a block
    pub fn structural(section: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        Self::StructuralParse {
            section: section.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Create an invalid number error
    pub fn invalid_number(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNumber {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Create an inconsistent data error
    pub fn inconsistent(attribute: Attribute, reason: impl Into<String>) -> Self {
        Self::InconsistentData {
            attribute,
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Attributes named by a missing-attribute error, empty for every other kind
    pub fn missing_attributes(&self) -> &[Attribute] {
        match self {
            Self::MissingAttributes { missing, .. } => missing,
            _ => &[],
        }
    }
}

fn format_attributes(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(|a| a.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, QcError>;
