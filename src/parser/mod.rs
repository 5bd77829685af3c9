//! Streaming extraction engines for quantum-chemistry logs
//!
//! Input is consumed one logical line at a time, forward only, and fed to a
//! per-format [`Extractor`]. The set of formats is closed: [`LogFormat`]
//! selects an [`Engine`] variant, and each variant drives its own block state
//! machines.
//!
//! ## Architecture
//!
//! - [`engine`] - extractor trait, engine states and shared commit logic
//! - [`molden`] - Molden format (`[Atoms]`, `[GTO]`, `[MO]`, `[FREQ]`, ...)
//! - [`xyz`] - multi-frame XYZ trajectories
//! - [`stats`] - parse statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use qclog::parser::{LogFormat, LogParser};
//!
//! let text = "[Atoms] Angs\nO 1 8 0.0 0.0 0.0\n";
//! let result = LogParser::new(LogFormat::Molden).parse_str(text);
//! assert_eq!(result.data.atom_count(), Some(1));
//! ```

pub mod engine;
pub mod molden;
pub mod stats;
pub mod xyz;

#[cfg(test)]
pub mod tests;

pub use engine::{EngineState, Extractor, Section};
pub use molden::MoldenExtractor;
pub use stats::{ParseDiagnostic, ParseResult, ParseStats};
pub use xyz::XyzExtractor;

use crate::config::Config;
use crate::error::{QcError, Result};
use crate::validation::Validator;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Molden,
    Xyz,
}

impl LogFormat {
    pub fn name(&self) -> &'static str {
        match self {
            LogFormat::Molden => "molden",
            LogFormat::Xyz => "xyz",
        }
    }

    /// Conventional file extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            LogFormat::Molden => "molden",
            LogFormat::Xyz => "xyz",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogFormat {
    type Err = QcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "molden" => Ok(LogFormat::Molden),
            "xyz" => Ok(LogFormat::Xyz),
            _ => Err(QcError::UnknownFormat {
                name: s.to_string(),
            }),
        }
    }
}

/// Closed registry of extraction engines
#[derive(Debug)]
pub enum Engine {
    Molden(MoldenExtractor),
    Xyz(XyzExtractor),
}

impl Engine {
    /// Fresh engine with empty per-parse state
    pub fn new(format: LogFormat) -> Self {
        match format {
            LogFormat::Molden => Engine::Molden(MoldenExtractor::new()),
            LogFormat::Xyz => Engine::Xyz(XyzExtractor::new()),
        }
    }
}

impl Extractor for Engine {
    fn feed(&mut self, line: &str) -> EngineState {
        match self {
            Engine::Molden(engine) => engine.feed(line),
            Engine::Xyz(engine) => engine.feed(line),
        }
    }

    fn finish(self) -> ParseResult {
        match self {
            Engine::Molden(engine) => engine.finish(),
            Engine::Xyz(engine) => engine.finish(),
        }
    }
}

/// Log parser for one input format
#[derive(Debug, Clone)]
pub struct LogParser {
    format: LogFormat,
    config: Config,
}

impl LogParser {
    /// Create a parser with default configuration
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Parse an in-memory document
    pub fn parse_str(&self, text: &str) -> ParseResult {
        let mut engine = Engine::new(self.format);
        for line in text.lines() {
            feed_normalized(&mut engine, line);
        }
        self.complete(engine)
    }

    /// Parse any buffered reader, normalizing CR-LF and lone CR line endings
    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> Result<ParseResult> {
        let mut engine = Engine::new(self.format);
        let mut buffer = String::new();

        loop {
            buffer.clear();
            if reader.read_line(&mut buffer)? == 0 {
                break;
            }
            let line = buffer.strip_suffix('\n').unwrap_or(&buffer);
            feed_normalized(&mut engine, line);
        }

        Ok(self.complete(engine))
    }

    /// Parse a file from disk
    pub fn parse_file(&self, path: &Path) -> Result<ParseResult> {
        info!("Parsing {} file: {}", self.format, path.display());

        if !path.exists() {
            return Err(QcError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        let result = self.parse_reader(BufReader::new(file))?;

        info!(
            "Parsed {} attributes from {} lines ({} blocks committed, {} failed)",
            result.data.len(),
            result.stats.lines_read,
            result.stats.blocks_committed,
            result.stats.blocks_failed
        );
        Ok(result)
    }

    fn complete(&self, engine: Engine) -> ParseResult {
        let mut result = engine.finish();

        for diagnostic in &result.stats.diagnostics {
            debug!("Parse diagnostic: {}", diagnostic);
        }

        if self.config.parser.validate_after_parse {
            let report = Validator::new(self.config.validation.clone()).validate(&result.data);
            if !report.is_valid() {
                warn!(
                    "Validation found {} problems in parsed data",
                    report.diagnostics.len()
                );
            }
            result.validation = Some(report);
        }
        result
    }
}

/// Feed one physical line, splitting on lone carriage returns
fn feed_normalized(engine: &mut Engine, line: &str) {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.contains('\r') {
        for part in line.split('\r') {
            engine.feed(part);
        }
    } else {
        engine.feed(line);
    }
}

/// Parse an in-memory document with default configuration
pub fn parse_str(format: LogFormat, text: &str) -> ParseResult {
    LogParser::new(format).parse_str(text)
}

/// Parse a file with default configuration
pub fn parse_file(format: LogFormat, path: &Path) -> Result<ParseResult> {
    LogParser::new(format).parse_file(path)
}
