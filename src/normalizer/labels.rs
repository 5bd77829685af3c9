//! Symmetry and shell label canonicalization.

use crate::error::{QcError, Result};
use crate::schema::ShellLabel;

/// Canonical form of an orbital symmetry label
///
/// Doubled primes collapse to `"`, trailing `+`/`-` degeneracy markers are
/// dropped and the leading character is upper-cased. Everything else is kept
/// verbatim, so canonical labels map to themselves.
pub fn canonical_symmetry(label: &str) -> String {
    let collapsed = label.trim().replace("''", "\"");
    let unsigned = collapsed.trim_end_matches(['+', '-']);

    let mut chars = unsigned.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Drop a leading orbital index from a vendor symmetry label (`12a1` -> `a1`)
///
/// Labels that are nothing but digits are returned unchanged.
pub fn strip_orbital_index(label: &str) -> &str {
    let trimmed = label.trim();
    let stripped = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if stripped.is_empty() {
        trimmed
    } else {
        stripped
    }
}

/// Parse a shell label into the canonical set
pub fn canonical_shell_label(label: &str) -> Result<ShellLabel> {
    match label.trim().to_ascii_uppercase().as_str() {
        "S" => Ok(ShellLabel::S),
        "P" => Ok(ShellLabel::P),
        "D" => Ok(ShellLabel::D),
        "F" => Ok(ShellLabel::F),
        "G" => Ok(ShellLabel::G),
        "H" => Ok(ShellLabel::H),
        "I" => Ok(ShellLabel::I),
        "SP" | "L" => Ok(ShellLabel::SP),
        other => Err(QcError::InvalidLabel {
            label: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYMMETRY_TABLE: &[(&str, &str)] = &[
        ("a", "A"),
        ("a1", "A1"),
        ("ag", "Ag"),
        ("a'", "A'"),
        ("a''", "A\""),
        ("a1''", "A1\""),
        ("e1+", "E1"),
        ("e1-", "E1"),
        ("b2u", "B2u"),
        ("sigma+", "Sigma"),
        ("", ""),
    ];

    #[test]
    fn test_symmetry_table() {
        for (input, expected) in SYMMETRY_TABLE {
            assert_eq!(canonical_symmetry(input), *expected, "input {input:?}");
        }
    }

    #[test]
    fn test_symmetry_is_idempotent() {
        for (input, _) in SYMMETRY_TABLE {
            let once = canonical_symmetry(input);
            assert_eq!(canonical_symmetry(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_symmetry_is_total_on_odd_input() {
        assert_eq!(canonical_symmetry("+-"), "");
        assert_eq!(canonical_symmetry("ébc"), "Ébc");
        assert_eq!(canonical_symmetry("  t2g  "), "T2g");
    }

    #[test]
    fn test_strip_orbital_index() {
        assert_eq!(strip_orbital_index("1a1"), "a1");
        assert_eq!(strip_orbital_index("12b2"), "b2");
        assert_eq!(strip_orbital_index("A1"), "A1");
        assert_eq!(strip_orbital_index("42"), "42");
    }

    #[test]
    fn test_shell_labels() {
        assert_eq!(canonical_shell_label("s").unwrap(), ShellLabel::S);
        assert_eq!(canonical_shell_label("sp").unwrap(), ShellLabel::SP);
        assert_eq!(canonical_shell_label(" F ").unwrap(), ShellLabel::F);
        assert!(canonical_shell_label("x").is_err());
    }
}
