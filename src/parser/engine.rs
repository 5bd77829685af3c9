//! Shared extraction engine machinery
//!
//! Every format-specific extractor is a line-driven state machine behind the
//! [`Extractor`] trait. Block handlers accumulate into local buffers and hand
//! finished values to [`EngineCore::commit`], which is the only place the
//! schema is written during a parse.

use super::stats::{ParseDiagnostic, ParseResult, ParseStats};
use crate::schema::{Attribute, AttributeValue, Schema, SetOutcome};
use serde::Serialize;
use tracing::{debug, warn};

/// Block kinds recognized by the engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Title,
    Atoms,
    Gto,
    AngularFlags,
    Mo,
    Freq,
    FrCoord,
    FrNormCoord,
    Int,
    GeoConv,
    XyzFrame,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Section::Title => "Title",
            Section::Atoms => "Atoms",
            Section::Gto => "GTO",
            Section::AngularFlags => "angular flags",
            Section::Mo => "MO",
            Section::Freq => "FREQ",
            Section::FrCoord => "FR-COORD",
            Section::FrNormCoord => "FR-NORM-COORD",
            Section::Int => "INT",
            Section::GeoConv => "GEOCONV",
            Section::XyzFrame => "XYZ frame",
        }
    }
}

/// Engine state reported after each fed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No block is open; the next line is checked for a marker
    AwaitingMarker,
    /// A block is open and consumed the line
    Reading(Section),
    /// A block finished and its values were committed
    BlockComplete(Section),
    /// A block was abandoned because its grammar was violated
    BlockFailed(Section),
}

/// Line-driven extractor for one input format
pub trait Extractor {
    /// Consume one logical line (without its line terminator)
    fn feed(&mut self, line: &str) -> EngineState;

    /// Signal end of input, commit or fail any open block and hand over the schema
    fn finish(self) -> ParseResult;
}

/// Per-parse bookkeeping shared by all extractors
#[derive(Debug, Default)]
pub(crate) struct EngineCore {
    pub schema: Schema,
    pub stats: ParseStats,
}

impl EngineCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a line; returns its 1-based number
    pub fn next_line(&mut self) -> usize {
        self.stats.lines_read += 1;
        self.stats.lines_read
    }

    pub fn line(&self) -> usize {
        self.stats.lines_read
    }

    /// Write every value of a completed block to the schema
    pub fn commit(&mut self, section: Section, values: Vec<(Attribute, AttributeValue)>) {
        for (attribute, value) in values {
            match self.schema.set(attribute, value) {
                Ok(SetOutcome::Ignored) => {
                    debug!(
                        "{} block repeated {}, keeping the first value",
                        section.name(),
                        attribute
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    self.record_failure(section, e.to_string());
                    return;
                }
            }
        }
        self.stats.blocks_committed += 1;
        debug!("Committed {} block at line {}", section.name(), self.line());
    }

    /// Record a structural failure for a block that is being abandoned
    pub fn fail(&mut self, section: Section, message: impl Into<String>) {
        let message = message.into();
        warn!(
            "Structural failure in {} block at line {}: {}",
            section.name(),
            self.line(),
            message
        );
        self.record_failure(section, message);
    }

    fn record_failure(&mut self, section: Section, message: String) {
        self.stats.blocks_failed += 1;
        self.stats.diagnostics.push(ParseDiagnostic {
            section,
            line: self.line(),
            message,
        });
    }

    pub fn into_result(self) -> ParseResult {
        ParseResult {
            data: self.schema,
            stats: self.stats,
            validation: None,
        }
    }
}

/// Whitespace-separated tokens of a line
pub(crate) fn tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// True for lines that open a bracketed section (`[GTO]`, `[MO]`, ...)
pub(crate) fn is_section_header(line: &str) -> bool {
    line.trim_start().starts_with('[')
}
