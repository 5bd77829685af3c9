//! Canonical attribute schema
//!
//! A [`Schema`] is the one record type every extraction engine fills and every
//! writer reads. Attribute names come from the closed [`Attribute`] vocabulary
//! and each attribute has a fixed [`ValueKind`], so a typo or a type change is
//! an error instead of a silent new field.
//!
//! ## Write semantics
//!
//! - [`Schema::set`] keeps the first value written to an attribute. Later
//!   writes are ignored and reported as [`SetOutcome::Ignored`].
//! - Cumulative attributes (geometry snapshots, step energies) append on every
//!   write. [`Schema::append`] is the explicit form and rejects
//!   non-cumulative attributes.
//! - [`Schema::get`] fails with [`QcError::UnsetAttribute`] when nothing was
//!   written; check [`Schema::has`] first for optional data.

pub mod types;

pub use types::{
    AngularConvention, Attribute, AttributeValue, Geometry, Primitive, Shell, ShellLabel,
    SpinChannel, SquareMatrix, ValueKind,
};

use crate::error::{QcError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::debug;

/// Result of a schema write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The attribute was unset and now holds the value
    Stored,
    /// The value was appended to a cumulative attribute
    Appended,
    /// The attribute was already set; the write was dropped
    Ignored,
}

/// Canonical record populated by extraction and read by validation and writers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    values: BTreeMap<Attribute, AttributeValue>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` unless the attribute is already set; cumulative attributes append
    pub fn set(&mut self, attribute: Attribute, value: AttributeValue) -> Result<SetOutcome> {
        check_kind(attribute, &value)?;

        if attribute.is_cumulative() {
            return self.append(attribute, value);
        }

        match self.values.entry(attribute) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(SetOutcome::Stored)
            }
            Entry::Occupied(_) => {
                debug!("Attribute {} already set, keeping first value", attribute);
                Ok(SetOutcome::Ignored)
            }
        }
    }

    /// Append `value` to a cumulative attribute
    pub fn append(&mut self, attribute: Attribute, value: AttributeValue) -> Result<SetOutcome> {
        check_kind(attribute, &value)?;

        if !attribute.is_cumulative() {
            return Err(QcError::NotCumulative { attribute });
        }

        match self.values.entry(attribute) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(SetOutcome::Stored)
            }
            Entry::Occupied(mut slot) => {
                slot.get_mut().extend(attribute, value)?;
                Ok(SetOutcome::Appended)
            }
        }
    }

    pub fn get(&self, attribute: Attribute) -> Result<&AttributeValue> {
        self.values
            .get(&attribute)
            .ok_or(QcError::UnsetAttribute { attribute })
    }

    pub fn has(&self, attribute: Attribute) -> bool {
        self.values.contains_key(&attribute)
    }

    /// Take an attribute out of the record
    pub fn remove(&mut self, attribute: Attribute) -> Option<AttributeValue> {
        self.values.remove(&attribute)
    }

    /// Populated attributes in vocabulary order
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn title(&self) -> Option<&str> {
        match self.values.get(&Attribute::Title) {
            Some(AttributeValue::Text(title)) => Some(title),
            _ => None,
        }
    }

    pub fn atom_count(&self) -> Option<usize> {
        match self.values.get(&Attribute::AtomCount) {
            Some(AttributeValue::Count(count)) => Some(*count),
            _ => None,
        }
    }

    pub fn atomic_numbers(&self) -> Option<&[u32]> {
        match self.values.get(&Attribute::AtomicNumbers) {
            Some(AttributeValue::Integers(numbers)) => Some(numbers),
            _ => None,
        }
    }

    pub fn atom_masses(&self) -> Option<&[f64]> {
        self.reals(Attribute::AtomMasses)
    }

    pub fn atom_coordinates(&self) -> Option<&[Geometry]> {
        match self.values.get(&Attribute::AtomCoordinates) {
            Some(AttributeValue::Geometries(snapshots)) => Some(snapshots),
            _ => None,
        }
    }

    /// Most recent geometry snapshot
    pub fn last_geometry(&self) -> Option<&Geometry> {
        self.atom_coordinates().and_then(|snapshots| snapshots.last())
    }

    pub fn basis_shells(&self) -> Option<&[Vec<Shell>]> {
        match self.values.get(&Attribute::BasisShells) {
            Some(AttributeValue::Basis(groups)) => Some(groups),
            _ => None,
        }
    }

    pub fn angular_convention(&self) -> Option<AngularConvention> {
        match self.values.get(&Attribute::AngularConvention) {
            Some(AttributeValue::Convention(convention)) => Some(*convention),
            _ => None,
        }
    }

    pub fn orbital_energies(&self) -> Option<&[Vec<f64>]> {
        self.spin_reals(Attribute::OrbitalEnergies)
    }

    pub fn orbital_occupations(&self) -> Option<&[Vec<f64>]> {
        self.spin_reals(Attribute::OrbitalOccupations)
    }

    pub fn orbital_symmetries(&self) -> Option<&[Vec<String>]> {
        match self.values.get(&Attribute::OrbitalSymmetries) {
            Some(AttributeValue::SpinLabels(labels)) => Some(labels),
            _ => None,
        }
    }

    pub fn orbital_coefficients(&self) -> Option<&[Vec<Vec<f64>>]> {
        match self.values.get(&Attribute::OrbitalCoefficients) {
            Some(AttributeValue::SpinMatrices(matrices)) => Some(matrices),
            _ => None,
        }
    }

    pub fn step_energies(&self) -> Option<&[f64]> {
        self.reals(Attribute::StepEnergies)
    }

    pub fn vibrational_frequencies(&self) -> Option<&[f64]> {
        self.reals(Attribute::VibrationalFrequencies)
    }

    pub fn vibrational_intensities(&self) -> Option<&[f64]> {
        self.reals(Attribute::VibrationalIntensities)
    }

    pub fn vibrational_displacements(&self) -> Option<&[Vec<[f64; 3]>]> {
        match self.values.get(&Attribute::VibrationalDisplacements) {
            Some(AttributeValue::Displacements(modes)) => Some(modes),
            _ => None,
        }
    }

    pub fn hessian(&self) -> Option<&SquareMatrix> {
        match self.values.get(&Attribute::Hessian) {
            Some(AttributeValue::Matrix(matrix)) => Some(matrix),
            _ => None,
        }
    }

    /// Number of basis functions implied by `basis_shells` and `angular_convention`
    pub fn basis_dimension(&self) -> Option<usize> {
        let convention = self.angular_convention().unwrap_or_default();
        self.basis_shells()
            .map(|groups| basis_dimension(groups, &convention))
    }

    fn reals(&self, attribute: Attribute) -> Option<&[f64]> {
        match self.values.get(&attribute) {
            Some(AttributeValue::Reals(values)) => Some(values),
            _ => None,
        }
    }

    fn spin_reals(&self, attribute: Attribute) -> Option<&[Vec<f64>]> {
        match self.values.get(&attribute) {
            Some(AttributeValue::SpinReals(values)) => Some(values),
            _ => None,
        }
    }
}

/// Count basis functions over per-atom shell groups
pub fn basis_dimension(groups: &[Vec<Shell>], convention: &AngularConvention) -> usize {
    groups
        .iter()
        .flatten()
        .map(|shell| shell.label.function_count(convention))
        .sum()
}

fn check_kind(attribute: Attribute, value: &AttributeValue) -> Result<()> {
    let expected = attribute.kind();
    let found = value.kind();
    if expected != found {
        return Err(QcError::AttributeKindMismatch {
            attribute,
            expected,
            found,
        });
    }
    Ok(())
}
