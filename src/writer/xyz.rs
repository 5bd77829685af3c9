//! XYZ trajectory writer; one frame per geometry snapshot.

use super::FormatWriter;
use crate::config::WriterConfig;
use crate::error::{QcError, Result};
use crate::normalizer::element_symbol;
use crate::parser::LogFormat;
use crate::schema::{Attribute, Schema};
use std::fmt::Write;

const REQUIRED: &[Attribute] = &[Attribute::AtomicNumbers, Attribute::AtomCoordinates];

/// XYZ format writer
#[derive(Debug, Clone, Default)]
pub struct XyzWriter {
    config: WriterConfig,
}

impl XyzWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }
}

impl FormatWriter for XyzWriter {
    fn format(&self) -> LogFormat {
        LogFormat::Xyz
    }

    fn required_attributes(&self) -> &'static [Attribute] {
        REQUIRED
    }

    fn render(&self, schema: &Schema) -> Result<String> {
        let numbers = schema.atomic_numbers().unwrap_or_default();
        let snapshots = schema.atom_coordinates().unwrap_or_default();

        if let Some((index, snapshot)) = snapshots
            .iter()
            .enumerate()
            .find(|(_, snapshot)| snapshot.len() != numbers.len())
        {
            return Err(QcError::inconsistent(
                Attribute::AtomCoordinates,
                format!(
                    "snapshot {} has {} atoms, expected {}",
                    index + 1,
                    snapshot.len(),
                    numbers.len()
                ),
            ));
        }

        let title = schema.title().unwrap_or(&self.config.default_title);
        let precision = self.config.coordinate_precision;
        let mut out = String::new();

        for snapshot in snapshots {
            writeln!(out, "{}", numbers.len())?;
            writeln!(out, "{title}")?;
            for (z, xyz) in numbers.iter().zip(snapshot) {
                writeln!(
                    out,
                    "{:<3} {:>18.p$} {:>18.p$} {:>18.p$}",
                    element_symbol(*z).unwrap_or("X"),
                    xyz[0],
                    xyz[1],
                    xyz[2],
                    p = precision
                )?;
            }
        }
        Ok(out)
    }
}
