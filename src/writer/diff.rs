//! Line-level structural diff
//!
//! A Myers diff over whole lines (`similar`) that reports only the lines
//! that differ. An empty result means the two texts are equivalent. Memory
//! stays linear in the input, so long MO sections are fine.

use similar::{Algorithm, DiffTag, capture_diff_slices_deadline};
use std::fmt;
use std::time::{Duration, Instant};

/// Upper bound on diff time; past it the result is still correct but may not be minimal
const DIFF_DEADLINE: Duration = Duration::from_secs(30);

/// One differing line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Present only in the first text
    Removed(String),
    /// Present only in the second text
    Added(String),
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffLine::Removed(line) => write!(f, "- {line}"),
            DiffLine::Added(line) => write!(f, "+ {line}"),
        }
    }
}

/// Lines of `a` missing from `b` and lines of `b` missing from `a`, in document order
///
/// Within one hunk the removed lines come before the added ones.
pub fn structural_diff(a: &str, b: &str) -> Vec<DiffLine> {
    let left: Vec<&str> = a.lines().collect();
    let right: Vec<&str> = b.lines().collect();

    let ops = capture_diff_slices_deadline(
        Algorithm::Myers,
        &left,
        &right,
        Some(Instant::now() + DIFF_DEADLINE),
    );

    let mut diff = Vec::new();
    let mut added = Vec::new();
    for op in ops {
        let (tag, old, new) = op.as_tag_tuple();
        if tag == DiffTag::Equal {
            diff.append(&mut added);
            continue;
        }
        diff.extend(left[old].iter().map(|line| DiffLine::Removed(line.to_string())));
        added.extend(right[new].iter().map(|line| DiffLine::Added(line.to_string())));
    }
    diff.append(&mut added);
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts() {
        let text = "[atoms] angs\no 1 8\n";
        assert!(structural_diff(text, text).is_empty());
        assert!(structural_diff("", "").is_empty());
    }

    #[test]
    fn test_changed_line() {
        let diff = structural_diff("a\nb\nc", "a\nx\nc");
        assert_eq!(
            diff,
            vec![DiffLine::Removed("b".into()), DiffLine::Added("x".into())]
        );
        assert_eq!(diff[0].to_string(), "- b");
        assert_eq!(diff[1].to_string(), "+ x");
    }

    #[test]
    fn test_insertions_and_deletions() {
        let diff = structural_diff("a\nb\nc\nd", "b\nc\nd\ne");
        assert_eq!(
            diff,
            vec![DiffLine::Removed("a".into()), DiffLine::Added("e".into())]
        );

        let diff = structural_diff("a\nb", "");
        assert_eq!(diff.len(), 2);
        assert!(diff.iter().all(|line| matches!(line, DiffLine::Removed(_))));
    }

    #[test]
    fn test_repeated_lines() {
        let diff = structural_diff("x\nx\nx", "x\nx");
        assert_eq!(diff, vec![DiffLine::Removed("x".into())]);
    }

    #[test]
    fn test_large_documents_differing_at_both_ends() {
        let lines = 50_000;
        let left: Vec<String> = (0..lines).map(|i| format!("{i} 1.00000e0")).collect();
        let mut right = left.clone();
        right[0] = "0 2.00000e0".to_string();
        right[lines - 1] = format!("{} 2.00000e0", lines - 1);

        let diff = structural_diff(&left.join("\n"), &right.join("\n"));
        assert_eq!(
            diff,
            vec![
                DiffLine::Removed("0 1.00000e0".into()),
                DiffLine::Added("0 2.00000e0".into()),
                DiffLine::Removed("49999 1.00000e0".into()),
                DiffLine::Added("49999 2.00000e0".into()),
            ]
        );
    }
}
