//! Element symbol, atomic number and mass lookups.

use crate::constants::{ELEMENT_SYMBOLS, MAX_ATOMIC_NUMBER, STANDARD_ATOMIC_MASSES};

/// Atomic number for an element symbol, matched case-insensitively
pub fn atomic_number(symbol: &str) -> Option<u32> {
    let wanted = symbol.trim();
    ELEMENT_SYMBOLS
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(wanted))
        .map(|index| index as u32 + 1)
}

/// Element symbol for an atomic number in [1, 118]
pub fn element_symbol(atomic_number: u32) -> Option<&'static str> {
    if (1..=MAX_ATOMIC_NUMBER).contains(&atomic_number) {
        Some(ELEMENT_SYMBOLS[atomic_number as usize - 1])
    } else {
        None
    }
}

/// Standard atomic weight in amu, tabulated for Z = 1..36
pub fn standard_mass(atomic_number: u32) -> Option<f64> {
    STANDARD_ATOMIC_MASSES
        .get((atomic_number as usize).checked_sub(1)?)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(atomic_number("O"), Some(8));
        assert_eq!(atomic_number("cl"), Some(17));
        assert_eq!(atomic_number("OG"), Some(118));
        assert_eq!(atomic_number("Xx"), None);
    }

    #[test]
    fn test_number_lookup() {
        assert_eq!(element_symbol(1), Some("H"));
        assert_eq!(element_symbol(26), Some("Fe"));
        assert_eq!(element_symbol(118), Some("Og"));
        assert_eq!(element_symbol(0), None);
        assert_eq!(element_symbol(119), None);
    }

    #[test]
    fn test_standard_masses() {
        assert_eq!(standard_mass(6), Some(12.011));
        assert_eq!(standard_mass(36), Some(83.798));
        assert_eq!(standard_mass(37), None);
        assert_eq!(standard_mass(0), None);
    }
}
