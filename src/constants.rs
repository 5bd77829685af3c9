//! Application constants for qclog
//!
//! This module contains physical conversion factors, the element table,
//! Molden section markers and the default values used throughout the crate.

// =============================================================================
// Physical Conversion Factors
// =============================================================================

/// Ångström per bohr (CODATA 2018)
pub const BOHR_TO_ANGSTROM: f64 = 0.529177210903;

/// Electron volts per hartree (CODATA 2018)
pub const HARTREE_TO_EV: f64 = 27.211386245988;

/// Converts sqrt(hartree / (bohr^2 amu)) to wavenumbers in cm^-1
pub const HESSIAN_EIGENVALUE_TO_WAVENUMBER: f64 = 5140.4872066;

// =============================================================================
// Element Table
// =============================================================================

/// Highest atomic number accepted by the schema
pub const MAX_ATOMIC_NUMBER: u32 = 118;

/// Element symbols indexed by atomic number minus one
pub const ELEMENT_SYMBOLS: [&str; 118] = [
    "H", "He", // Period 1
    "Li", "Be", "B", "C", "N", "O", "F", "Ne", // Period 2
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", // Period 3
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se",
    "Br", "Kr", // Period 4
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te",
    "I", "Xe", // Period 5
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    // Period 6
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No",
    "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
    // Period 7
];

/// Standard atomic weights in amu for Z = 1..36
pub const STANDARD_ATOMIC_MASSES: [f64; 36] = [
    1.008, 4.002602, // Period 1
    6.94, 9.0121831, 10.81, 12.011, 14.007, 15.999, 18.998403163, 20.1797, // Period 2
    22.98976928, 24.305, 26.9815385, 28.085, 30.973761998, 32.06, 35.45, 39.948, // Period 3
    39.0983, 40.078, 44.955908, 47.867, 50.9415, 51.9961, 54.938044, 55.845, 58.933194, 58.6934,
    63.546, 65.38, 69.723, 72.630, 74.921595, 78.971, 79.904, 83.798, // Period 4
];

// =============================================================================
// Molden Section Markers
// =============================================================================

/// Section markers recognized in Molden files (matched case-insensitively)
pub mod molden_markers {
    pub const MOLDEN_FORMAT: &str = "[molden format]";
    pub const TITLE: &str = "[title]";
    pub const ATOMS: &str = "[atoms]";
    pub const GTO: &str = "[gto]";
    pub const MO: &str = "[mo]";
    pub const FREQ: &str = "[freq]";
    pub const FR_COORD: &str = "[fr-coord]";
    pub const FR_NORM_COORD: &str = "[fr-norm-coord]";
    pub const INT: &str = "[int]";
    pub const GEOCONV: &str = "[geoconv]";

    /// Angular convention flags, longest first so `[5d7f]` wins over `[5d]`
    pub const ANGULAR_FLAGS: &[&str] = &["[5d10f]", "[5d7f]", "[5d]", "[7f]", "[9g]"];

    /// Unit keyword following `[Atoms]` for Ångström coordinates
    pub const ANGSTROM_UNIT: &str = "angs";
}

// =============================================================================
// Input Limits
// =============================================================================

/// Largest primitive count accepted on a `[GTO]` shell line
pub const MAX_SHELL_PRIMITIVES: usize = 1_000;

/// Largest basis function index accepted in `[MO]`
pub const MAX_BASIS_FUNCTIONS: usize = 100_000;

/// Largest atom count accepted on an XYZ frame header
pub const MAX_FRAME_ATOMS: usize = 1_000_000;

// =============================================================================
// Defaults
// =============================================================================

/// Default title written when the schema carries none
pub const DEFAULT_TITLE: &str = "Written by qclog";

/// Default number of decimals for coordinates in written documents
pub const DEFAULT_COORDINATE_PRECISION: usize = 10;

/// Default significant digits kept by the Molden reformatter
pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 6;

/// Default absolute tolerance for hessian symmetry
pub const DEFAULT_SYMMETRY_TOLERANCE: f64 = 1e-8;

/// Default tolerance (Å) for deciding that a geometry is linear
pub const DEFAULT_LINEAR_TOLERANCE: f64 = 1e-3;

/// Default tolerance (cm^-1) between listed and hessian-derived frequencies
pub const DEFAULT_FREQUENCY_TOLERANCE: f64 = 0.1;
