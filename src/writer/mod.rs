//! Writers and round-trip tooling
//!
//! A writer renders a populated schema in one exchange format. Writers are
//! all-or-nothing: completeness is checked with
//! [`require_for`](crate::validation::require_for) before any rendering, and
//! shape inconsistencies found while rendering fail the whole call, so a
//! caller never receives a partial document.
//!
//! Round-trip verification does not compare bytes. Both documents pass
//! through a format-specific reformatter ([`MoldenReformatter`]) and the
//! canonical texts are compared with [`structural_diff`].

pub mod diff;
pub mod molden;
pub mod reformat;
pub mod xyz;

#[cfg(test)]
pub mod tests;

pub use diff::{DiffLine, structural_diff};
pub use molden::MoldenWriter;
pub use reformat::MoldenReformatter;
pub use xyz::XyzWriter;

use crate::config::WriterConfig;
use crate::error::Result;
use crate::parser::LogFormat;
use crate::schema::{Attribute, Schema};
use crate::validation::require_for;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Renders a schema in one output format
pub trait FormatWriter {
    /// Format produced by this writer
    fn format(&self) -> LogFormat;

    /// Attributes that must be set before rendering
    fn required_attributes(&self) -> &'static [Attribute];

    /// Render without the completeness check
    fn render(&self, schema: &Schema) -> Result<String>;

    /// Check completeness, then render the whole document
    fn generate_repr(&self, schema: &Schema) -> Result<String> {
        require_for(self.format().name(), schema, self.required_attributes())?;
        let text = self.render(schema)?;
        debug!(
            "Rendered {} document: {} lines",
            self.format(),
            text.lines().count()
        );
        Ok(text)
    }

    /// Render and write to `path`; nothing is written when rendering fails
    fn write_file(&self, schema: &Schema, path: &Path) -> Result<()> {
        let text = self.generate_repr(schema)?;
        fs::write(path, text)?;
        info!("Wrote {} file: {}", self.format(), path.display());
        Ok(())
    }
}

/// Writer for `format`
pub fn writer_for(format: LogFormat, config: &WriterConfig) -> Box<dyn FormatWriter + Send + Sync> {
    match format {
        LogFormat::Molden => Box::new(MoldenWriter::new(config.clone())),
        LogFormat::Xyz => Box::new(XyzWriter::new(config.clone())),
    }
}
