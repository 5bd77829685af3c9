//! Parse statistics and result structures
//!
//! A parse never aborts on a malformed block. Failures are recorded here as
//! [`ParseDiagnostic`]s next to the populated schema so callers can decide
//! how strict to be.

use super::engine::Section;
use crate::error::QcError;
use crate::schema::Schema;
use crate::validation::ValidationReport;
use serde::Serialize;
use std::fmt;

/// Parsing result with the populated schema and statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Schema populated from the input; ownership passes to the caller
    pub data: Schema,

    /// Parsing statistics and structural diagnostics
    pub stats: ParseStats,

    /// Validation report, present when validation ran after parsing
    pub validation: Option<ValidationReport>,
}

/// One structural parse failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseDiagnostic {
    /// Block in which the failure occurred
    pub section: Section,

    /// Line at which the failure was detected (1-based, informational)
    pub line: usize,

    pub message: String,
}

impl ParseDiagnostic {
    /// Convert into the structured error used by callers that want to fail hard
    pub fn to_error(&self) -> QcError {
        QcError::structural(self.section.name(), self.line, self.message.clone())
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] line {}: {}", self.section.name(), self.line, self.message)
    }
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseStats {
    /// Total number of logical lines fed to the engine
    pub lines_read: usize,

    /// Number of blocks committed to the schema
    pub blocks_committed: usize,

    /// Number of blocks abandoned because of structural failures
    pub blocks_failed: usize,

    /// Structural failures in encounter order
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every recognized block was committed
    pub fn is_clean(&self) -> bool {
        self.blocks_failed == 0
    }

    /// Structural failures as errors
    pub fn errors(&self) -> Vec<QcError> {
        self.diagnostics.iter().map(ParseDiagnostic::to_error).collect()
    }
}
