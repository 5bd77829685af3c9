//! Unit and label normalization
//!
//! Pure, stateless helpers shared by every extraction engine and writer:
//!
//! - [`units`] - length and energy conversion with fixed CODATA factors
//! - [`labels`] - symmetry and shell label canonicalization
//! - [`numbers`] - numeric token parsing, including Fortran `D` exponents
//! - [`elements`] - element symbol, atomic number and mass tables

pub mod elements;
pub mod labels;
pub mod numbers;
pub mod units;

pub use elements::{atomic_number, element_symbol, standard_mass};
pub use labels::{canonical_shell_label, canonical_symmetry, strip_orbital_index};
pub use numbers::{normalize_exponent_marker, parse_integer, parse_real, parse_reals};
pub use units::{Unit, convert};
