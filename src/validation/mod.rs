//! Structural validation of a populated schema
//!
//! Validation never raises. Every broken invariant becomes a [`Diagnostic`]
//! naming the attribute, what was expected and what was observed, and the
//! whole set is returned as a [`ValidationReport`]. Checks only run when the
//! attributes they relate are present; absence is the concern of
//! [`require`], which consumers call with the attributes they need.

pub mod hessian;

use crate::config::ValidationConfig;
use crate::constants::MAX_ATOMIC_NUMBER;
use crate::error::{QcError, Result};
use crate::normalizer::canonical_symmetry;
use crate::schema::{AngularConvention, Attribute, Geometry, Schema, basis_dimension};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// One violated invariant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub attribute: Attribute,
    pub expected: String,
    pub observed: String,
}

impl Diagnostic {
    pub fn new(attribute: Attribute, expected: impl Into<String>, observed: impl Into<String>) -> Self {
        Self {
            attribute,
            expected: expected.into(),
            observed: observed.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, observed {}",
            self.attribute, self.expected, self.observed
        )
    }
}

/// Diagnostics collected over one schema
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics raised against one attribute
    pub fn for_attribute(&self, attribute: Attribute) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.attribute == attribute)
    }

    pub fn has_issue(&self, attribute: Attribute) -> bool {
        self.for_attribute(attribute).next().is_some()
    }

    fn push(&mut self, attribute: Attribute, expected: impl Into<String>, observed: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(attribute, expected, observed));
    }
}

/// Fail with [`QcError::MissingAttributes`] naming every absent attribute
pub fn require(schema: &Schema, required: &[Attribute]) -> Result<()> {
    require_for("requested", schema, required)
}

/// [`require`] with the consumer named in the error
pub fn require_for(consumer: &str, schema: &Schema, required: &[Attribute]) -> Result<()> {
    let missing: Vec<Attribute> = required
        .iter()
        .copied()
        .filter(|attribute| !schema.has(*attribute))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(QcError::MissingAttributes {
            format: consumer.to_string(),
            missing,
        })
    }
}

/// Schema invariant checker
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Check every invariant whose attributes are present
    pub fn validate(&self, schema: &Schema) -> ValidationReport {
        let mut report = ValidationReport::default();

        let atoms = self.check_atoms(schema, &mut report);
        self.check_basis(schema, atoms, &mut report);
        self.check_orbitals(schema, &mut report);
        self.check_vibrations(schema, atoms, &mut report);
        self.check_hessian(schema, atoms, &mut report);

        debug!(
            "Validation finished with {} diagnostics",
            report.diagnostics.len()
        );
        report
    }

    /// Atom count, atomic numbers, snapshots and masses; returns the atom count of record
    fn check_atoms(&self, schema: &Schema, report: &mut ValidationReport) -> Option<usize> {
        let numbers = schema.atomic_numbers();
        let count = schema.atom_count().or(numbers.map(<[u32]>::len));

        if let Some(count) = schema.atom_count() {
            if count == 0 {
                report.push(Attribute::AtomCount, "at least 1 atom", "0");
            }
            if let Some(numbers) = numbers {
                if numbers.len() != count {
                    report.push(
                        Attribute::AtomicNumbers,
                        format!("{count} entries (atom_count)"),
                        format!("{} entries", numbers.len()),
                    );
                }
            }
        }

        if let Some(numbers) = numbers {
            for (index, z) in numbers.iter().enumerate() {
                if !(1..=MAX_ATOMIC_NUMBER).contains(z) {
                    report.push(
                        Attribute::AtomicNumbers,
                        format!("atomic number in [1, {MAX_ATOMIC_NUMBER}]"),
                        format!("{z} at atom {}", index + 1),
                    );
                }
            }
        }

        if let (Some(count), Some(snapshots)) = (count, schema.atom_coordinates()) {
            for (index, snapshot) in snapshots.iter().enumerate() {
                if snapshot.len() != count {
                    report.push(
                        Attribute::AtomCoordinates,
                        format!("{count} atoms in every snapshot"),
                        format!("{} atoms in snapshot {}", snapshot.len(), index + 1),
                    );
                }
            }
        }

        if let Some(masses) = schema.atom_masses() {
            if let Some(count) = count {
                if masses.len() != count {
                    report.push(
                        Attribute::AtomMasses,
                        format!("{count} masses"),
                        format!("{} masses", masses.len()),
                    );
                }
            }
            if let Some(bad) = masses.iter().find(|mass| !(mass.is_finite() && **mass > 0.0)) {
                report.push(Attribute::AtomMasses, "positive masses", bad.to_string());
            }
        }

        count
    }

    fn check_basis(&self, schema: &Schema, atoms: Option<usize>, report: &mut ValidationReport) {
        let Some(groups) = schema.basis_shells() else {
            return;
        };

        if let Some(count) = atoms {
            if groups.len() != count {
                report.push(
                    Attribute::BasisShells,
                    format!("one shell group per atom ({count})"),
                    format!("{} groups", groups.len()),
                );
            }
        }

        for (atom, shells) in groups.iter().enumerate() {
            for (index, shell) in shells.iter().enumerate() {
                let location = format!("atom {} shell {} ({})", atom + 1, index + 1, shell.label);

                if shell.primitives.is_empty() {
                    report.push(Attribute::BasisShells, "at least one primitive", format!("none in {location}"));
                }

                let wanted = shell.label.coefficient_count();
                for primitive in &shell.primitives {
                    if !(primitive.exponent.is_finite() && primitive.exponent > 0.0) {
                        report.push(
                            Attribute::BasisShells,
                            "positive exponents",
                            format!("{} in {location}", primitive.exponent),
                        );
                    }
                    if primitive.coefficients.len() != wanted {
                        report.push(
                            Attribute::BasisShells,
                            format!("{wanted} coefficients per primitive"),
                            format!("{} in {location}", primitive.coefficients.len()),
                        );
                    }
                }
            }
        }
    }

    fn check_orbitals(&self, schema: &Schema, report: &mut ValidationReport) {
        let energies = schema.orbital_energies();
        let coefficients = schema.orbital_coefficients();
        let symmetries = schema.orbital_symmetries();
        let occupations = schema.orbital_occupations();

        // Channel count of record comes from the first orbital attribute present
        let channels = energies
            .map(<[Vec<f64>]>::len)
            .or(coefficients.map(<[Vec<Vec<f64>>]>::len))
            .or(symmetries.map(<[Vec<String>]>::len))
            .or(occupations.map(<[Vec<f64>]>::len));
        let Some(channels) = channels else {
            return;
        };

        if !(1..=2).contains(&channels) {
            report.push(
                Attribute::OrbitalEnergies,
                "1 or 2 spin channels",
                format!("{channels} channels"),
            );
        }

        let lengths: Vec<(Attribute, Vec<usize>)> = [
            (Attribute::OrbitalEnergies, energies.map(|e| e.iter().map(Vec::len).collect())),
            (
                Attribute::OrbitalCoefficients,
                coefficients.map(|c| c.iter().map(Vec::len).collect()),
            ),
            (
                Attribute::OrbitalSymmetries,
                symmetries.map(|s| s.iter().map(Vec::len).collect()),
            ),
            (
                Attribute::OrbitalOccupations,
                occupations.map(|o| o.iter().map(Vec::len).collect()),
            ),
        ]
        .into_iter()
        .filter_map(|(attribute, lengths)| lengths.map(|lengths| (attribute, lengths)))
        .collect();

        let reference = &lengths[0].1;
        for (attribute, channel_lengths) in &lengths[1..] {
            if channel_lengths.len() != channels {
                report.push(
                    *attribute,
                    format!("{channels} spin channels"),
                    format!("{} channels", channel_lengths.len()),
                );
                continue;
            }
            for (channel, (expected, observed)) in reference.iter().zip(channel_lengths).enumerate() {
                if expected != observed {
                    report.push(
                        *attribute,
                        format!("{expected} orbitals in channel {}", channel + 1),
                        format!("{observed} orbitals"),
                    );
                }
            }
        }

        if let (Some(coefficients), Some(groups)) = (coefficients, schema.basis_shells()) {
            let convention = schema.angular_convention().unwrap_or_else(AngularConvention::default);
            let width = basis_dimension(groups, &convention);
            for (channel, rows) in coefficients.iter().enumerate() {
                if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
                    report.push(
                        Attribute::OrbitalCoefficients,
                        format!("{width} coefficients per orbital (basis dimension)"),
                        format!("{} in orbital {} of channel {}", row.len(), index + 1, channel + 1),
                    );
                }
            }
        }

        if let Some(symmetries) = symmetries {
            for label in symmetries.iter().flatten() {
                let canonical = canonical_symmetry(label);
                if &canonical != label {
                    report.push(
                        Attribute::OrbitalSymmetries,
                        format!("canonical label '{canonical}'"),
                        format!("'{label}'"),
                    );
                }
            }
        }
    }

    fn check_vibrations(&self, schema: &Schema, atoms: Option<usize>, report: &mut ValidationReport) {
        let Some(frequencies) = schema.vibrational_frequencies() else {
            return;
        };
        let modes = frequencies.len();

        if let Some(count) = atoms {
            let linear = schema
                .last_geometry()
                .map(|geometry| is_linear(geometry, self.config.linear_tolerance))
                .unwrap_or(count <= 2);
            let expected = vibrational_mode_count(count, linear);
            if modes != expected {
                let shape = if linear { "linear" } else { "non-linear" };
                report.push(
                    Attribute::VibrationalFrequencies,
                    format!("{expected} modes for {count} atoms ({shape})"),
                    format!("{modes} modes"),
                );
            }
        }

        if let Some(displacements) = schema.vibrational_displacements() {
            if displacements.len() != modes {
                report.push(
                    Attribute::VibrationalDisplacements,
                    format!("{modes} modes"),
                    format!("{} modes", displacements.len()),
                );
            }
            if let Some(count) = atoms {
                if let Some((index, mode)) = displacements
                    .iter()
                    .enumerate()
                    .find(|(_, mode)| mode.len() != count)
                {
                    report.push(
                        Attribute::VibrationalDisplacements,
                        format!("{count} atoms per mode"),
                        format!("{} in mode {}", mode.len(), index + 1),
                    );
                }
            }
        }

        if let Some(intensities) = schema.vibrational_intensities() {
            if intensities.len() != modes {
                report.push(
                    Attribute::VibrationalIntensities,
                    format!("{modes} intensities"),
                    format!("{}", intensities.len()),
                );
            }
        }
    }

    fn check_hessian(&self, schema: &Schema, atoms: Option<usize>, report: &mut ValidationReport) {
        let Some(matrix) = schema.hessian() else {
            return;
        };

        if let Some(count) = atoms {
            if matrix.dim() != 3 * count {
                report.push(
                    Attribute::Hessian,
                    format!("dimension {} (3N)", 3 * count),
                    format!("dimension {}", matrix.dim()),
                );
                return;
            }
        }

        if let Some((row, col, deviation)) = hessian::max_asymmetry(matrix) {
            if deviation > self.config.symmetry_tolerance {
                report.push(
                    Attribute::Hessian,
                    format!("symmetric within {:e}", self.config.symmetry_tolerance),
                    format!("|H[{row}][{col}] - H[{col}][{row}]| = {deviation:e}"),
                );
                return;
            }
        }

        if self.config.check_hessian_frequencies {
            hessian::check_normal_modes(schema, &self.config, report);
        }
    }
}

/// Number of vibrational modes: 0 for one atom, 3N-5 for linear molecules, 3N-6 otherwise
pub fn vibrational_mode_count(atoms: usize, linear: bool) -> usize {
    match atoms {
        0 | 1 => 0,
        n if linear => 3 * n - 5,
        n => 3 * n - 6,
    }
}

/// True when every atom lies within `tolerance` (Å) of the line through the two most distant atoms
pub fn is_linear(geometry: &Geometry, tolerance: f64) -> bool {
    if geometry.len() <= 2 {
        return true;
    }

    let origin = geometry[0];
    let Some(far) = geometry
        .iter()
        .copied()
        .max_by(|a, b| distance(origin, *a).total_cmp(&distance(origin, *b)))
    else {
        return true;
    };

    let axis = sub(far, origin);
    let length = norm(axis);
    if length <= tolerance {
        // All atoms coincide
        return true;
    }

    geometry.iter().all(|point| {
        let offset = sub(*point, origin);
        norm(cross(offset, axis)) / length <= tolerance
    })
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt()
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    norm(sub(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeValue, Primitive, Shell, ShellLabel, SquareMatrix};

    fn water() -> Schema {
        let mut schema = Schema::new();
        schema.set(Attribute::AtomCount, AttributeValue::Count(3)).unwrap();
        schema
            .set(Attribute::AtomicNumbers, AttributeValue::Integers(vec![8, 1, 1]))
            .unwrap();
        schema
            .set(
                Attribute::AtomCoordinates,
                AttributeValue::Geometries(vec![vec![
                    [0.0, 0.0, 0.117],
                    [0.0, 0.757, -0.467],
                    [0.0, -0.757, -0.467],
                ]]),
            )
            .unwrap();
        schema
    }

    fn s_shell(exponent: f64) -> Shell {
        Shell {
            label: ShellLabel::S,
            primitives: vec![Primitive::new(exponent, 1.0)],
        }
    }

    #[test]
    fn test_consistent_schema_is_valid() {
        let mut schema = water();
        schema
            .set(
                Attribute::VibrationalFrequencies,
                AttributeValue::Reals(vec![1648.0, 3832.0, 3943.0]),
            )
            .unwrap();

        let report = Validator::default().validate(&schema);
        assert!(report.is_valid(), "unexpected diagnostics: {:?}", report.diagnostics);
    }

    #[test]
    fn test_atom_count_mismatch() {
        let mut schema = Schema::new();
        schema.set(Attribute::AtomCount, AttributeValue::Count(2)).unwrap();
        schema
            .set(Attribute::AtomicNumbers, AttributeValue::Integers(vec![8, 1, 1]))
            .unwrap();

        let report = Validator::default().validate(&schema);
        assert!(report.has_issue(Attribute::AtomicNumbers));
    }

    #[test]
    fn test_atomic_number_range() {
        let mut schema = Schema::new();
        schema
            .set(Attribute::AtomicNumbers, AttributeValue::Integers(vec![0, 6, 119]))
            .unwrap();

        let report = Validator::default().validate(&schema);
        assert_eq!(report.for_attribute(Attribute::AtomicNumbers).count(), 2);
    }

    #[test]
    fn test_short_snapshot() {
        let mut schema = water();
        schema
            .append(
                Attribute::AtomCoordinates,
                AttributeValue::Geometries(vec![vec![[0.0; 3], [1.0, 0.0, 0.0]]]),
            )
            .unwrap();

        let report = Validator::default().validate(&schema);
        let diagnostic = report.for_attribute(Attribute::AtomCoordinates).next().unwrap();
        assert!(diagnostic.observed.contains("snapshot 2"));
    }

    #[test]
    fn test_basis_checks() {
        let mut schema = water();
        let bad_sp = Shell {
            label: ShellLabel::SP,
            primitives: vec![Primitive::new(1.0, 0.5)],
        };
        schema
            .set(
                Attribute::BasisShells,
                AttributeValue::Basis(vec![vec![s_shell(-1.0)], vec![bad_sp]]),
            )
            .unwrap();

        let report = Validator::default().validate(&schema);
        let observed: Vec<&str> = report
            .for_attribute(Attribute::BasisShells)
            .map(|d| d.expected.as_str())
            .collect();
        assert!(observed.iter().any(|e| e.contains("one shell group per atom")));
        assert!(observed.contains(&"positive exponents"));
        assert!(observed.contains(&"2 coefficients per primitive"));
    }

    #[test]
    fn test_orbital_channel_mismatch() {
        let mut schema = Schema::new();
        schema
            .set(
                Attribute::OrbitalEnergies,
                AttributeValue::SpinReals(vec![vec![-1.0, 0.5], vec![-0.9]]),
            )
            .unwrap();
        schema
            .set(
                Attribute::OrbitalSymmetries,
                AttributeValue::SpinLabels(vec![vec!["A1".into(), "B2".into()]]),
            )
            .unwrap();
        schema
            .set(
                Attribute::OrbitalCoefficients,
                AttributeValue::SpinMatrices(vec![vec![vec![1.0], vec![0.0]], vec![vec![1.0], vec![0.0]]]),
            )
            .unwrap();

        let report = Validator::default().validate(&schema);
        assert!(report.has_issue(Attribute::OrbitalSymmetries));
        let coefficient_issue = report.for_attribute(Attribute::OrbitalCoefficients).next().unwrap();
        assert_eq!(coefficient_issue.expected, "1 orbitals in channel 2");
    }

    #[test]
    fn test_coefficient_width_and_labels() {
        let mut schema = Schema::new();
        schema
            .set(
                Attribute::BasisShells,
                AttributeValue::Basis(vec![vec![s_shell(1.0), s_shell(0.5)]]),
            )
            .unwrap();
        schema
            .set(
                Attribute::OrbitalCoefficients,
                AttributeValue::SpinMatrices(vec![vec![vec![1.0, 0.0, 0.0]]]),
            )
            .unwrap();
        schema
            .set(
                Attribute::OrbitalSymmetries,
                AttributeValue::SpinLabels(vec![vec!["a1".into()]]),
            )
            .unwrap();

        let report = Validator::default().validate(&schema);
        assert!(report.has_issue(Attribute::OrbitalCoefficients));
        let label = report.for_attribute(Attribute::OrbitalSymmetries).next().unwrap();
        assert_eq!(label.observed, "'a1'");
    }

    #[test]
    fn test_frequency_count() {
        let mut schema = water();
        schema
            .set(Attribute::VibrationalFrequencies, AttributeValue::Reals(vec![1648.0]))
            .unwrap();
        schema
            .set(Attribute::VibrationalIntensities, AttributeValue::Reals(vec![1.0, 2.0]))
            .unwrap();

        let report = Validator::default().validate(&schema);
        let diagnostic = report
            .for_attribute(Attribute::VibrationalFrequencies)
            .next()
            .unwrap();
        assert_eq!(diagnostic.expected, "3 modes for 3 atoms (non-linear)");
        assert!(report.has_issue(Attribute::VibrationalIntensities));
    }

    #[test]
    fn test_linear_molecule_modes() {
        let mut schema = Schema::new();
        schema.set(Attribute::AtomCount, AttributeValue::Count(3)).unwrap();
        schema
            .set(
                Attribute::AtomCoordinates,
                AttributeValue::Geometries(vec![vec![
                    [0.0, 0.0, -1.16],
                    [0.0, 0.0, 0.0],
                    [0.0, 0.0, 1.16],
                ]]),
            )
            .unwrap();
        schema
            .set(
                Attribute::VibrationalFrequencies,
                AttributeValue::Reals(vec![667.0, 667.0, 1333.0, 2349.0]),
            )
            .unwrap();

        assert!(Validator::default().validate(&schema).is_valid());
    }

    #[test]
    fn test_mode_counts_and_linearity() {
        assert_eq!(vibrational_mode_count(1, true), 0);
        assert_eq!(vibrational_mode_count(2, true), 1);
        assert_eq!(vibrational_mode_count(3, false), 3);
        assert_eq!(vibrational_mode_count(4, true), 7);

        assert!(is_linear(&vec![[0.0; 3], [1.0, 1.0, 1.0]], 1e-3));
        assert!(is_linear(&vec![[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0005, 0.0]], 1e-3));
        assert!(!is_linear(&vec![[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.1, 0.0]], 1e-3));
    }

    #[test]
    fn test_hessian_dimension_and_symmetry() {
        let mut schema = Schema::new();
        schema.set(Attribute::AtomCount, AttributeValue::Count(1)).unwrap();
        let mut values = vec![0.0; 9];
        values[1] = 0.5;
        schema
            .set(
                Attribute::Hessian,
                AttributeValue::Matrix(SquareMatrix::from_row_major(3, values).unwrap()),
            )
            .unwrap();
        let report = Validator::default().validate(&schema);
        assert!(report.has_issue(Attribute::Hessian));

        let mut schema = Schema::new();
        schema.set(Attribute::AtomCount, AttributeValue::Count(2)).unwrap();
        schema
            .set(
                Attribute::Hessian,
                AttributeValue::Matrix(SquareMatrix::from_row_major(3, vec![0.0; 9]).unwrap()),
            )
            .unwrap();
        let report = Validator::default().validate(&schema);
        let diagnostic = report.for_attribute(Attribute::Hessian).next().unwrap();
        assert_eq!(diagnostic.expected, "dimension 6 (3N)");
    }

    #[test]
    fn test_masses_per_atom() {
        let mut schema = water();
        schema
            .set(Attribute::AtomMasses, AttributeValue::Reals(vec![15.999, 1.008]))
            .unwrap();
        assert!(Validator::default().validate(&schema).has_issue(Attribute::AtomMasses));
    }

    #[test]
    fn test_require_names_every_missing_attribute() {
        let schema = water();
        assert!(require(&schema, &[Attribute::AtomCount, Attribute::AtomicNumbers]).is_ok());

        let error = require_for(
            "molden",
            &schema,
            &[Attribute::AtomCount, Attribute::BasisShells, Attribute::OrbitalEnergies],
        )
        .unwrap_err();
        assert_eq!(
            error.missing_attributes(),
            &[Attribute::BasisShells, Attribute::OrbitalEnergies]
        );
        assert!(error.to_string().contains("basis_shells, orbital_energies"));
    }
}
