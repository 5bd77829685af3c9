//! Physical unit conversion with fixed, documented factors.

use crate::constants::{BOHR_TO_ANGSTROM, HARTREE_TO_EV};
use crate::error::{QcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical dimension of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Length,
    Energy,
    Wavenumber,
}

/// Units known to the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Bohr,
    Angstrom,
    Hartree,
    ElectronVolt,
    /// Reciprocal centimetres
    Wavenumber,
}

impl Unit {
    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Bohr | Unit::Angstrom => Dimension::Length,
            Unit::Hartree | Unit::ElectronVolt => Dimension::Energy,
            Unit::Wavenumber => Dimension::Wavenumber,
        }
    }

    /// Size of one unit expressed in the reference unit of its dimension
    /// (Ångström, electron volt, cm^-1)
    fn scale(&self) -> f64 {
        match self {
            Unit::Bohr => BOHR_TO_ANGSTROM,
            Unit::Angstrom => 1.0,
            Unit::Hartree => HARTREE_TO_EV,
            Unit::ElectronVolt => 1.0,
            Unit::Wavenumber => 1.0,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Unit::Bohr => "bohr",
            Unit::Angstrom => "Angstrom",
            Unit::Hartree => "hartree",
            Unit::ElectronVolt => "eV",
            Unit::Wavenumber => "cm-1",
        };
        f.write_str(name)
    }
}

/// Convert `value` between two units of the same dimension
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64> {
    if from.dimension() != to.dimension() {
        return Err(QcError::Unit {
            message: format!("cannot convert {from} to {to}"),
        });
    }
    if from == to {
        return Ok(value);
    }
    Ok(value * from.scale() / to.scale())
}

pub fn bohr_to_angstrom(value: f64) -> f64 {
    value * BOHR_TO_ANGSTROM
}

pub fn angstrom_to_bohr(value: f64) -> f64 {
    value / BOHR_TO_ANGSTROM
}

pub fn hartree_to_ev(value: f64) -> f64 {
    value * HARTREE_TO_EV
}

pub fn ev_to_hartree(value: f64) -> f64 {
    value / HARTREE_TO_EV
}

/// Convert one (x, y, z) triple from bohr to Ångström
pub fn triple_bohr_to_angstrom(xyz: [f64; 3]) -> [f64; 3] {
    xyz.map(bohr_to_angstrom)
}
