//! Molden writer
//!
//! Emits the sections the Molden extractor reads, in a fixed order:
//! `[Molden Format]`, `[Title]`, `[Atoms] Angs`, `[GTO]`, angular flags,
//! `[MO]`, then the vibrational sections and `[GEOCONV]` when present.
//! Energies go back to hartree and displacements back to bohr.

use super::FormatWriter;
use crate::config::WriterConfig;
use crate::error::{QcError, Result};
use crate::normalizer::{element_symbol, units};
use crate::parser::LogFormat;
use crate::schema::{AngularConvention, Attribute, Schema, basis_dimension};
use std::fmt::Write;

const REQUIRED: &[Attribute] = &[
    Attribute::AtomicNumbers,
    Attribute::AtomCoordinates,
    Attribute::BasisShells,
    Attribute::OrbitalEnergies,
    Attribute::OrbitalCoefficients,
];

/// Molden format writer
#[derive(Debug, Clone, Default)]
pub struct MoldenWriter {
    config: WriterConfig,
}

impl MoldenWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    fn write_atoms(&self, out: &mut String, schema: &Schema) -> Result<()> {
        let (numbers, geometry) = atoms_of_record(schema)?;
        let precision = self.config.coordinate_precision;

        writeln!(out, "[Atoms] Angs")?;
        for (index, (z, xyz)) in numbers.iter().zip(geometry).enumerate() {
            writeln!(
                out,
                "{:<4}{:>5}{:>5} {:>20.p$} {:>20.p$} {:>20.p$}",
                element_symbol(*z).unwrap_or("X"),
                index + 1,
                z,
                xyz[0],
                xyz[1],
                xyz[2],
                p = precision
            )?;
        }
        Ok(())
    }

    fn write_basis(&self, out: &mut String, schema: &Schema) -> Result<()> {
        let Some(groups) = schema.basis_shells() else {
            return Ok(());
        };

        writeln!(out, "[GTO]")?;
        for (atom, shells) in groups.iter().enumerate() {
            writeln!(out, "{:>4} 0", atom + 1)?;
            for shell in shells {
                writeln!(
                    out,
                    " {:<4}{:>4} 1.00",
                    shell.label.as_str().to_lowercase(),
                    shell.primitives.len()
                )?;
                for primitive in &shell.primitives {
                    write!(out, "{:>20.10E}", primitive.exponent)?;
                    for coefficient in &primitive.coefficients {
                        write!(out, " {:>20.10E}", coefficient)?;
                    }
                    writeln!(out)?;
                }
            }
            writeln!(out)?;
        }

        if let Some(convention) = schema.angular_convention() {
            for flag in angular_flags(convention) {
                writeln!(out, "{flag}")?;
            }
        }
        Ok(())
    }

    fn write_orbitals(&self, out: &mut String, schema: &Schema) -> Result<()> {
        let (Some(energies), Some(coefficients)) =
            (schema.orbital_energies(), schema.orbital_coefficients())
        else {
            return Ok(());
        };
        let symmetries = schema.orbital_symmetries();
        let occupations = schema.orbital_occupations();

        writeln!(out, "[MO]")?;
        for (channel, (channel_energies, rows)) in energies.iter().zip(coefficients).enumerate() {
            let spin = if channel == 0 { "Alpha" } else { "Beta" };
            for (orbital, (energy, row)) in channel_energies.iter().zip(rows).enumerate() {
                let symmetry = symmetries
                    .and_then(|s| s.get(channel))
                    .and_then(|s| s.get(orbital))
                    .map(String::as_str)
                    .unwrap_or("A");
                let occupation = occupations
                    .and_then(|o| o.get(channel))
                    .and_then(|o| o.get(orbital))
                    .copied()
                    .unwrap_or(0.0);

                writeln!(out, " Sym= {symmetry}")?;
                writeln!(out, " Ene= {:.10}", units::ev_to_hartree(*energy))?;
                writeln!(out, " Spin= {spin}")?;
                writeln!(out, " Occup= {occupation:.6}")?;
                for (index, value) in row.iter().enumerate() {
                    writeln!(out, "{:>6} {:>20.12E}", index + 1, value)?;
                }
            }
        }
        Ok(())
    }

    fn write_vibrations(&self, out: &mut String, schema: &Schema) -> Result<()> {
        let Some(frequencies) = schema.vibrational_frequencies() else {
            return Ok(());
        };
        let precision = self.config.coordinate_precision;

        writeln!(out, "[FREQ]")?;
        for frequency in frequencies {
            writeln!(out, "{frequency:>14.6}")?;
        }

        let (numbers, geometry) = atoms_of_record(schema)?;
        writeln!(out, "[FR-COORD]")?;
        for (z, xyz) in numbers.iter().zip(geometry) {
            writeln!(
                out,
                "{:<4} {:>20.p$} {:>20.p$} {:>20.p$}",
                element_symbol(*z).unwrap_or("X"),
                units::angstrom_to_bohr(xyz[0]),
                units::angstrom_to_bohr(xyz[1]),
                units::angstrom_to_bohr(xyz[2]),
                p = precision
            )?;
        }

        if let Some(modes) = schema.vibrational_displacements() {
            writeln!(out, "[FR-NORM-COORD]")?;
            for (index, mode) in modes.iter().enumerate() {
                writeln!(out, " vibration {:>5}", index + 1)?;
                for xyz in mode {
                    writeln!(
                        out,
                        "{:>20.p$} {:>20.p$} {:>20.p$}",
                        units::angstrom_to_bohr(xyz[0]),
                        units::angstrom_to_bohr(xyz[1]),
                        units::angstrom_to_bohr(xyz[2]),
                        p = precision
                    )?;
                }
            }
        }

        if let Some(intensities) = schema.vibrational_intensities() {
            writeln!(out, "[INT]")?;
            for intensity in intensities {
                writeln!(out, "{intensity:>14.6}")?;
            }
        }
        Ok(())
    }

    fn write_convergence(&self, out: &mut String, schema: &Schema) -> Result<()> {
        let Some(energies) = schema.step_energies() else {
            return Ok(());
        };
        writeln!(out, "[GEOCONV]")?;
        writeln!(out, "energy")?;
        for energy in energies {
            writeln!(out, "{:>20.10}", units::ev_to_hartree(*energy))?;
        }
        Ok(())
    }
}

impl FormatWriter for MoldenWriter {
    fn format(&self) -> LogFormat {
        LogFormat::Molden
    }

    fn required_attributes(&self) -> &'static [Attribute] {
        REQUIRED
    }

    fn render(&self, schema: &Schema) -> Result<String> {
        check_shapes(schema)?;

        let mut out = String::new();
        writeln!(out, "[Molden Format]")?;
        writeln!(out, "[Title]")?;
        writeln!(out, "{}", schema.title().unwrap_or(&self.config.default_title))?;
        self.write_atoms(&mut out, schema)?;
        self.write_basis(&mut out, schema)?;
        self.write_orbitals(&mut out, schema)?;
        self.write_vibrations(&mut out, schema)?;
        self.write_convergence(&mut out, schema)?;
        Ok(out)
    }
}

/// Atomic numbers and the last geometry snapshot, checked against each other
fn atoms_of_record(schema: &Schema) -> Result<(&[u32], &[[f64; 3]])> {
    let numbers = schema
        .atomic_numbers()
        .ok_or(QcError::UnsetAttribute {
            attribute: Attribute::AtomicNumbers,
        })?;
    let geometry = schema
        .last_geometry()
        .ok_or(QcError::UnsetAttribute {
            attribute: Attribute::AtomCoordinates,
        })?;

    if numbers.len() != geometry.len() {
        return Err(QcError::inconsistent(
            Attribute::AtomCoordinates,
            format!(
                "{} atomic numbers but {} atoms in the last snapshot",
                numbers.len(),
                geometry.len()
            ),
        ));
    }
    Ok((numbers, geometry))
}

/// Shape checks that must pass before any text is produced
fn check_shapes(schema: &Schema) -> Result<()> {
    let (numbers, _) = atoms_of_record(schema)?;
    let atoms = numbers.len();

    if let Some(count) = schema.atom_count() {
        if count != atoms {
            return Err(QcError::inconsistent(
                Attribute::AtomCount,
                format!("atom_count is {count} but {atoms} atoms are listed"),
            ));
        }
    }

    if let Some(groups) = schema.basis_shells() {
        if groups.len() != atoms {
            return Err(QcError::inconsistent(
                Attribute::BasisShells,
                format!("{} shell groups for {atoms} atoms", groups.len()),
            ));
        }
    }

    if let (Some(energies), Some(coefficients)) =
        (schema.orbital_energies(), schema.orbital_coefficients())
    {
        if energies.len() != coefficients.len() {
            return Err(QcError::inconsistent(
                Attribute::OrbitalCoefficients,
                format!(
                    "{} energy channels but {} coefficient channels",
                    energies.len(),
                    coefficients.len()
                ),
            ));
        }

        let width = schema.basis_shells().map(|groups| {
            let convention = schema.angular_convention().unwrap_or_default();
            basis_dimension(groups, &convention)
        });

        for (channel, (channel_energies, rows)) in energies.iter().zip(coefficients).enumerate() {
            if channel_energies.len() != rows.len() {
                return Err(QcError::inconsistent(
                    Attribute::OrbitalCoefficients,
                    format!(
                        "channel {} has {} energies but {} coefficient rows",
                        channel + 1,
                        channel_energies.len(),
                        rows.len()
                    ),
                ));
            }
            if let Some(width) = width {
                if let Some(row) = rows.iter().find(|row| row.len() != width) {
                    return Err(QcError::inconsistent(
                        Attribute::OrbitalCoefficients,
                        format!("row of {} coefficients for basis dimension {width}", row.len()),
                    ));
                }
            }
        }
    }

    if let (Some(frequencies), Some(modes)) = (
        schema.vibrational_frequencies(),
        schema.vibrational_displacements(),
    ) {
        if modes.len() != frequencies.len() || modes.iter().any(|mode| mode.len() != atoms) {
            return Err(QcError::inconsistent(
                Attribute::VibrationalDisplacements,
                format!(
                    "{} displacement sets for {} frequencies and {atoms} atoms",
                    modes.len(),
                    frequencies.len()
                ),
            ));
        }
    }

    Ok(())
}

/// Molden flags for a convention; empty when every shell is Cartesian
fn angular_flags(convention: AngularConvention) -> Vec<&'static str> {
    let mut flags = Vec::new();
    match (convention.spherical_d, convention.spherical_f) {
        (true, true) => flags.push("[5D]"),
        (true, false) => flags.push("[5D10F]"),
        (false, true) => flags.push("[7F]"),
        (false, false) => {}
    }
    if convention.spherical_g {
        flags.push("[9G]");
    }
    flags
}
