//! Attribute vocabulary and value types of the canonical schema.

use crate::error::{QcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One geometry snapshot: (x, y, z) in Ångström, one triple per atom
pub type Geometry = Vec<[f64; 3]>;

/// Closed vocabulary of schema attributes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Title,
    AtomCount,
    AtomicNumbers,
    AtomMasses,
    AtomCoordinates,
    BasisShells,
    AngularConvention,
    OrbitalEnergies,
    OrbitalSymmetries,
    OrbitalOccupations,
    OrbitalCoefficients,
    StepEnergies,
    VibrationalFrequencies,
    VibrationalDisplacements,
    VibrationalIntensities,
    Hessian,
}

impl Attribute {
    /// Every attribute, in vocabulary order
    pub const ALL: [Attribute; 16] = [
        Attribute::Title,
        Attribute::AtomCount,
        Attribute::AtomicNumbers,
        Attribute::AtomMasses,
        Attribute::AtomCoordinates,
        Attribute::BasisShells,
        Attribute::AngularConvention,
        Attribute::OrbitalEnergies,
        Attribute::OrbitalSymmetries,
        Attribute::OrbitalOccupations,
        Attribute::OrbitalCoefficients,
        Attribute::StepEnergies,
        Attribute::VibrationalFrequencies,
        Attribute::VibrationalDisplacements,
        Attribute::VibrationalIntensities,
        Attribute::Hessian,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Title => "title",
            Attribute::AtomCount => "atom_count",
            Attribute::AtomicNumbers => "atomic_numbers",
            Attribute::AtomMasses => "atom_masses",
            Attribute::AtomCoordinates => "atom_coordinates",
            Attribute::BasisShells => "basis_shells",
            Attribute::AngularConvention => "angular_convention",
            Attribute::OrbitalEnergies => "orbital_energies",
            Attribute::OrbitalSymmetries => "orbital_symmetries",
            Attribute::OrbitalOccupations => "orbital_occupations",
            Attribute::OrbitalCoefficients => "orbital_coefficients",
            Attribute::StepEnergies => "step_energies",
            Attribute::VibrationalFrequencies => "vibrational_frequencies",
            Attribute::VibrationalDisplacements => "vibrational_displacements",
            Attribute::VibrationalIntensities => "vibrational_intensities",
            Attribute::Hessian => "hessian",
        }
    }

    /// Kind of value this attribute holds for its whole lifetime
    pub fn kind(&self) -> ValueKind {
        match self {
            Attribute::Title => ValueKind::Text,
            Attribute::AtomCount => ValueKind::Count,
            Attribute::AtomicNumbers => ValueKind::Integers,
            Attribute::AtomMasses
            | Attribute::StepEnergies
            | Attribute::VibrationalFrequencies
            | Attribute::VibrationalIntensities => ValueKind::Reals,
            Attribute::AtomCoordinates => ValueKind::Geometries,
            Attribute::BasisShells => ValueKind::Basis,
            Attribute::AngularConvention => ValueKind::Convention,
            Attribute::OrbitalEnergies | Attribute::OrbitalOccupations => ValueKind::SpinReals,
            Attribute::OrbitalSymmetries => ValueKind::SpinLabels,
            Attribute::OrbitalCoefficients => ValueKind::SpinMatrices,
            Attribute::VibrationalDisplacements => ValueKind::Displacements,
            Attribute::Hessian => ValueKind::Matrix,
        }
    }

    /// Cumulative attributes append on every write instead of keeping the first
    pub fn is_cumulative(&self) -> bool {
        matches!(self, Attribute::AtomCoordinates | Attribute::StepEnergies)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = QcError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Attribute::ALL
            .iter()
            .copied()
            .find(|attribute| attribute.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| QcError::UnknownAttribute {
                name: wanted.to_string(),
            })
    }
}

/// Shape of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Count,
    Integers,
    Reals,
    Geometries,
    Basis,
    Convention,
    SpinReals,
    SpinLabels,
    SpinMatrices,
    Displacements,
    Matrix,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Count => "count",
            ValueKind::Integers => "integer sequence",
            ValueKind::Reals => "real sequence",
            ValueKind::Geometries => "geometry snapshots",
            ValueKind::Basis => "basis shells",
            ValueKind::Convention => "angular convention",
            ValueKind::SpinReals => "per-spin real sequences",
            ValueKind::SpinLabels => "per-spin label sequences",
            ValueKind::SpinMatrices => "per-spin matrices",
            ValueKind::Displacements => "vibrational displacements",
            ValueKind::Matrix => "square matrix",
        };
        f.write_str(name)
    }
}

/// Typed attribute value
///
/// Per-spin values are indexed by spin channel first (alpha, then an
/// optional beta channel).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Count(usize),
    Integers(Vec<u32>),
    Reals(Vec<f64>),
    Geometries(Vec<Geometry>),
    Basis(Vec<Vec<Shell>>),
    Convention(AngularConvention),
    SpinReals(Vec<Vec<f64>>),
    SpinLabels(Vec<Vec<String>>),
    SpinMatrices(Vec<Vec<Vec<f64>>>),
    Displacements(Vec<Vec<[f64; 3]>>),
    Matrix(SquareMatrix),
}

impl AttributeValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeValue::Text(_) => ValueKind::Text,
            AttributeValue::Count(_) => ValueKind::Count,
            AttributeValue::Integers(_) => ValueKind::Integers,
            AttributeValue::Reals(_) => ValueKind::Reals,
            AttributeValue::Geometries(_) => ValueKind::Geometries,
            AttributeValue::Basis(_) => ValueKind::Basis,
            AttributeValue::Convention(_) => ValueKind::Convention,
            AttributeValue::SpinReals(_) => ValueKind::SpinReals,
            AttributeValue::SpinLabels(_) => ValueKind::SpinLabels,
            AttributeValue::SpinMatrices(_) => ValueKind::SpinMatrices,
            AttributeValue::Displacements(_) => ValueKind::Displacements,
            AttributeValue::Matrix(_) => ValueKind::Matrix,
        }
    }

    /// Append the items of `other` to this sequence value
    pub(crate) fn extend(&mut self, attribute: Attribute, other: AttributeValue) -> Result<()> {
        match (self, other) {
            (AttributeValue::Geometries(current), AttributeValue::Geometries(more)) => {
                current.extend(more);
                Ok(())
            }
            (AttributeValue::Reals(current), AttributeValue::Reals(more)) => {
                current.extend(more);
                Ok(())
            }
            (current, other) => Err(QcError::AttributeKindMismatch {
                attribute,
                expected: current.kind(),
                found: other.kind(),
            }),
        }
    }
}

/// Canonical shell labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShellLabel {
    S,
    P,
    D,
    F,
    G,
    H,
    I,
    SP,
}

impl ShellLabel {
    /// Angular momentum quantum number (SP reports the P part)
    pub fn angular_momentum(&self) -> u32 {
        match self {
            ShellLabel::S => 0,
            ShellLabel::P | ShellLabel::SP => 1,
            ShellLabel::D => 2,
            ShellLabel::F => 3,
            ShellLabel::G => 4,
            ShellLabel::H => 5,
            ShellLabel::I => 6,
        }
    }

    /// Number of contraction coefficients each primitive carries
    pub fn coefficient_count(&self) -> usize {
        match self {
            ShellLabel::SP => 2,
            _ => 1,
        }
    }

    /// Number of basis functions this shell contributes
    pub fn function_count(&self, convention: &AngularConvention) -> usize {
        let l = self.angular_momentum() as usize;
        match self {
            ShellLabel::S => 1,
            ShellLabel::P => 3,
            ShellLabel::SP => 4,
            _ if convention.is_spherical(*self) => 2 * l + 1,
            _ => (l + 1) * (l + 2) / 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShellLabel::S => "S",
            ShellLabel::P => "P",
            ShellLabel::D => "D",
            ShellLabel::F => "F",
            ShellLabel::G => "G",
            ShellLabel::H => "H",
            ShellLabel::I => "I",
            ShellLabel::SP => "SP",
        }
    }
}

impl fmt::Display for ShellLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One Gaussian primitive: exponent plus one (two for SP) contraction coefficients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Primitive {
    pub exponent: f64,
    pub coefficients: Vec<f64>,
}

impl Primitive {
    pub fn new(exponent: f64, coefficient: f64) -> Self {
        Self {
            exponent,
            coefficients: vec![coefficient],
        }
    }
}

/// A contracted shell sharing one angular-momentum label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shell {
    pub label: ShellLabel,
    pub primitives: Vec<Primitive>,
}

/// Cartesian or spherical treatment of higher angular momentum shells
///
/// Molden's default is Cartesian for every shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AngularConvention {
    pub spherical_d: bool,
    pub spherical_f: bool,
    pub spherical_g: bool,
}

impl AngularConvention {
    pub fn is_spherical(&self, label: ShellLabel) -> bool {
        match label {
            ShellLabel::D => self.spherical_d,
            ShellLabel::F => self.spherical_f,
            ShellLabel::G | ShellLabel::H | ShellLabel::I => self.spherical_g,
            ShellLabel::S | ShellLabel::P | ShellLabel::SP => false,
        }
    }

    pub fn is_cartesian(&self) -> bool {
        !(self.spherical_d || self.spherical_f || self.spherical_g)
    }
}

/// Spin channel of an orbital set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpinChannel {
    Alpha,
    Beta,
}

impl SpinChannel {
    pub fn index(&self) -> usize {
        match self {
            SpinChannel::Alpha => 0,
            SpinChannel::Beta => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpinChannel::Alpha => "Alpha",
            SpinChannel::Beta => "Beta",
        }
    }
}

/// Dense square matrix stored row-major
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquareMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl SquareMatrix {
    /// Build from row-major values; `values.len()` must be `dim * dim`
    pub fn from_row_major(dim: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != dim * dim {
            return Err(QcError::inconsistent(
                Attribute::Hessian,
                format!("expected {} values for a {dim}x{dim} matrix, got {}", dim * dim, values.len()),
            ));
        }
        Ok(Self { dim, values })
    }

    /// Rebuild a symmetric matrix from its row-wise lower triangle
    pub fn from_lower_triangle(dim: usize, triangle: &[f64]) -> Result<Self> {
        let expected = dim * (dim + 1) / 2;
        if triangle.len() != expected {
            return Err(QcError::inconsistent(
                Attribute::Hessian,
                format!("expected {expected} lower-triangle values for dimension {dim}, got {}", triangle.len()),
            ));
        }

        let mut values = vec![0.0; dim * dim];
        let mut next = triangle.iter();
        for i in 0..dim {
            for j in 0..=i {
                if let Some(&value) = next.next() {
                    values[i * dim + j] = value;
                    values[j * dim + i] = value;
                }
            }
        }
        Ok(Self { dim, values })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.dim && col < self.dim {
            Some(self.values[row * self.dim + col])
        } else {
            None
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
