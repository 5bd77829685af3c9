//! Hessian consistency checks
//!
//! The normal-mode check mass-weights the Cartesian hessian (hartree/bohr²,
//! masses in amu), diagonalizes it and converts the eigenvalues to
//! wavenumbers. Eigenvalues come back in ascending order, so the lowest six
//! (five for linear molecules) are the translations and rotations and are
//! dropped. This only holds at a stationary point that is a minimum.

use super::{ValidationReport, is_linear, vibrational_mode_count};
use crate::config::ValidationConfig;
use crate::constants::HESSIAN_EIGENVALUE_TO_WAVENUMBER;
use crate::normalizer::standard_mass;
use crate::schema::{Attribute, Schema, SquareMatrix};
use nalgebra::DMatrix;
use tracing::debug;

/// Largest |H[i][j] - H[j][i]| with its position (i < j), `None` below dimension 2
pub fn max_asymmetry(matrix: &SquareMatrix) -> Option<(usize, usize, f64)> {
    let dim = matrix.dim();
    let mut worst: Option<(usize, usize, f64)> = None;

    for row in 0..dim {
        for col in (row + 1)..dim {
            let (Some(upper), Some(lower)) = (matrix.get(row, col), matrix.get(col, row)) else {
                continue;
            };
            let deviation = (upper - lower).abs();
            if worst.is_none_or(|(_, _, current)| deviation > current) {
                worst = Some((row, col, deviation));
            }
        }
    }

    worst
}

/// Vibrational wavenumbers (cm⁻¹) of a Cartesian hessian
///
/// Imaginary modes are reported as negative wavenumbers. `masses` holds one
/// mass per atom and must match the hessian dimension.
pub fn normal_mode_frequencies(hessian: &SquareMatrix, masses: &[f64], linear: bool) -> Vec<f64> {
    let dim = hessian.dim();
    if dim != 3 * masses.len() {
        return Vec::new();
    }

    let inverse_root: Vec<f64> = masses
        .iter()
        .flat_map(|mass| std::iter::repeat_n(1.0 / mass.sqrt(), 3))
        .collect();

    let weighted = DMatrix::from_fn(dim, dim, |row, col| {
        hessian.get(row, col).unwrap_or(0.0) * inverse_root[row] * inverse_root[col]
    });

    let eigen = weighted.symmetric_eigen();
    let mut eigenvalues: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    eigenvalues.sort_by(f64::total_cmp);

    let drop = dim.saturating_sub(vibrational_mode_count(masses.len(), linear));
    eigenvalues
        .into_iter()
        .skip(drop)
        .map(|value| value.signum() * value.abs().sqrt() * HESSIAN_EIGENVALUE_TO_WAVENUMBER)
        .collect()
}

/// Compare the hessian's normal modes with the stored frequencies
pub(crate) fn check_normal_modes(
    schema: &Schema,
    config: &ValidationConfig,
    report: &mut ValidationReport,
) {
    let (Some(hessian), Some(frequencies)) = (schema.hessian(), schema.vibrational_frequencies())
    else {
        return;
    };

    let Some(masses) = atom_masses(schema) else {
        report.push(
            Attribute::AtomMasses,
            "masses for the normal-mode check",
            "no atom_masses and no standard masses for these elements",
        );
        return;
    };

    let linear = schema
        .last_geometry()
        .map(|geometry| is_linear(geometry, config.linear_tolerance))
        .unwrap_or(masses.len() <= 2);

    let computed = normal_mode_frequencies(hessian, &masses, linear);
    debug!("Normal-mode check computed {} frequencies", computed.len());

    if computed.len() != frequencies.len() {
        report.push(
            Attribute::VibrationalFrequencies,
            format!("{} frequencies from the hessian", computed.len()),
            format!("{}", frequencies.len()),
        );
        return;
    }

    let mut stored = frequencies.to_vec();
    stored.sort_by(f64::total_cmp);

    for (index, (expected, observed)) in computed.iter().zip(&stored).enumerate() {
        if (expected - observed).abs() > config.frequency_tolerance {
            report.push(
                Attribute::VibrationalFrequencies,
                format!(
                    "{expected:.2} cm-1 for mode {} (within {})",
                    index + 1,
                    config.frequency_tolerance
                ),
                format!("{observed:.2} cm-1"),
            );
        }
    }
}

/// Masses of record: `atom_masses` if set, else standard masses for the atomic numbers
fn atom_masses(schema: &Schema) -> Option<Vec<f64>> {
    if let Some(masses) = schema.atom_masses() {
        return Some(masses.to_vec());
    }
    schema
        .atomic_numbers()?
        .iter()
        .map(|z| standard_mass(*z))
        .collect()
}
