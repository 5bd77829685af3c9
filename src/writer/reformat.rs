//! Canonical Molden text for round-trip comparison
//!
//! Two Molden documents that carry the same data can differ in whitespace,
//! number formatting, header case and SP shell packing. The reformatter
//! removes those differences so a plain line diff only reports real
//! disagreements:
//!
//! - whitespace is collapsed to single spaces and blank lines are dropped
//! - section headers and `Key=` tokens are lowercased, `Key=value` is split
//! - floating-point tokens (Fortran `D` exponents included) are rewritten in
//!   scientific notation with a fixed number of significant digits
//! - integer tokens are kept as written
//! - the `[Title]` content is dropped
//! - SP shells are rewritten as an S shell followed by a P shell
//! - `[Atoms]` coordinates given in bohr (`AU` or no unit) are rewritten in Å
//!   under an `[atoms] angs` header
//! - `Sym=` values lose their orbital index and are canonicalized (`1a1` is `A1`)

use crate::config::ReformatConfig;
use crate::constants::molden_markers;
use crate::normalizer::{canonical_symmetry, parse_real, strip_orbital_index, units};
use regex::Regex;
use std::sync::OnceLock;

fn integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?\d+$").expect("integer regex must compile"))
}

fn real_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eEdD][+-]?\d+)?$").expect("real regex must compile")
    })
}

/// Molden canonicalizer
#[derive(Debug, Clone, Default)]
pub struct MoldenReformatter {
    config: ReformatConfig,
}

impl MoldenReformatter {
    pub fn new(config: ReformatConfig) -> Self {
        Self { config }
    }

    /// Canonical form of `text`, one record per line
    pub fn reformat(&self, text: &str) -> String {
        let lines: Vec<Vec<&str>> = text
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|tokens| !tokens.is_empty())
            .collect();

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut section = String::new();
        let mut atoms_in_bohr = false;
        let mut index = 0;

        while index < lines.len() {
            let tokens = &lines[index];
            index += 1;

            if tokens[0].starts_with('[') {
                let header = tokens.join(" ").to_lowercase();
                section = tokens[0].to_lowercase();
                if section == molden_markers::ATOMS && self.config.atoms_in_angstrom {
                    atoms_in_bohr = !header.contains(molden_markers::ANGSTROM_UNIT);
                    out.push(format!(
                        "{} {}",
                        molden_markers::ATOMS,
                        molden_markers::ANGSTROM_UNIT
                    ));
                } else {
                    out.push(header);
                }
                continue;
            }

            if section == molden_markers::TITLE && self.config.skip_title {
                continue;
            }

            if section == molden_markers::ATOMS && atoms_in_bohr && tokens.len() >= 6 {
                out.push(self.atom_line_in_angstrom(tokens));
                continue;
            }

            if section == molden_markers::GTO && is_shell_line(tokens) {
                if self.config.split_sp_shells && tokens[0].eq_ignore_ascii_case("sp") {
                    let count = tokens[1].parse::<usize>().unwrap_or(0);
                    let end = (index + count).min(lines.len());
                    self.split_sp_shell(tokens, &lines[index..end], &mut out);
                    index = end;
                } else {
                    let mut canonical = vec![tokens[0].to_lowercase()];
                    canonical.extend(tokens[1..].iter().map(|token| self.canonical_number(token)));
                    out.push(canonical.join(" "));
                }
                continue;
            }

            out.push(self.canonical_line(tokens));
        }

        let mut text = out.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }

    fn split_sp_shell(&self, header: &[&str], primitives: &[Vec<&str>], out: &mut Vec<String>) {
        let tail: Vec<String> = header[1..]
            .iter()
            .map(|token| self.canonical_number(token))
            .collect();

        for (label, column) in [("s", 1), ("p", 2)] {
            let mut shell_header = vec![label.to_string()];
            shell_header.extend(tail.iter().cloned());
            out.push(shell_header.join(" "));

            for primitive in primitives {
                let mut line = vec![self.canonical_number(primitive[0])];
                if let Some(coefficient) = primitive.get(column) {
                    line.push(self.canonical_number(coefficient));
                }
                out.push(line.join(" "));
            }
        }
    }

    /// `name seq Z x y z` with the bohr coordinates rewritten in Å
    fn atom_line_in_angstrom(&self, tokens: &[&str]) -> String {
        let mut canonical: Vec<String> =
            tokens[..3].iter().map(|token| self.canonical_number(token)).collect();
        for token in &tokens[3..6] {
            match parse_real(token) {
                Ok(bohr) => canonical.push(self.canonical_real(units::bohr_to_angstrom(bohr))),
                Err(_) => canonical.push(self.canonical_number(token)),
            }
        }
        canonical.extend(tokens[6..].iter().map(|token| self.canonical_number(token)));
        canonical.join(" ")
    }

    fn canonical_line(&self, tokens: &[&str]) -> String {
        let mut canonical = Vec::with_capacity(tokens.len());
        // Key of a `Key=` token whose value is the next token
        let mut pending_key: Option<String> = None;

        for token in tokens {
            if let Some(key) = pending_key.take() {
                canonical.push(self.canonical_value(&key, token));
                continue;
            }
            // `Sym=A1` and `Sym= A1` are the same record
            match token.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    let key = key.to_lowercase();
                    canonical.push(format!("{key}="));
                    if value.is_empty() {
                        pending_key = Some(key);
                    } else {
                        canonical.push(self.canonical_value(&key, value));
                    }
                }
                _ => canonical.push(self.canonical_number(token)),
            }
        }
        canonical.join(" ")
    }

    fn canonical_value(&self, key: &str, value: &str) -> String {
        if key == "sym" && self.config.canonical_symmetries {
            canonical_symmetry(strip_orbital_index(value))
        } else {
            self.canonical_number(value)
        }
    }

    /// Scientific notation for reals, integers and text unchanged
    fn canonical_number(&self, token: &str) -> String {
        if integer_re().is_match(token) || !real_re().is_match(token) {
            return token.to_string();
        }
        match parse_real(token) {
            Ok(value) => self.canonical_real(value),
            Err(_) => token.to_string(),
        }
    }

    fn canonical_real(&self, value: f64) -> String {
        let value = if value == 0.0 { 0.0 } else { value };
        let digits = self.config.significant_digits.max(1);
        format!("{:.*e}", digits - 1, value)
    }
}

/// `<label> <primitive count> [scale]` inside `[GTO]`
fn is_shell_line(tokens: &[&str]) -> bool {
    (2..=3).contains(&tokens.len())
        && tokens[0].chars().all(|c| c.is_ascii_alphabetic())
        && integer_re().is_match(tokens[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reformatter() -> MoldenReformatter {
        MoldenReformatter::default()
    }

    #[test]
    fn test_whitespace_and_headers() {
        let text = "[Molden Format]\n\n[Atoms]   Angs\n  O    1   8   0.0   0.0   1.5\n";
        assert_eq!(
            reformatter().reformat(text),
            "[molden format]\n[atoms] angs\nO 1 8 0.00000e0 0.00000e0 1.50000e0\n"
        );
    }

    #[test]
    fn test_number_canonicalization() {
        let r = reformatter();
        assert_eq!(r.canonical_number("0.5484671660D+04"), "5.48467e3");
        assert_eq!(r.canonical_number("5484.67166"), "5.48467e3");
        assert_eq!(r.canonical_number("-0.000"), "0.00000e0");
        assert_eq!(r.canonical_number("12"), "12");
        assert_eq!(r.canonical_number("A1"), "A1");
        assert_eq!(r.canonical_number("1e-3"), "1.00000e-3");
    }

    #[test]
    fn test_significant_digits_give_tolerance() {
        let coarse = MoldenReformatter::new(ReformatConfig {
            significant_digits: 4,
            ..ReformatConfig::default()
        });
        assert_eq!(
            coarse.reformat("[FREQ]\n1648.12\n"),
            coarse.reformat("[FREQ]\n1648.1201\n")
        );
        assert_ne!(
            reformatter().reformat("[FREQ]\n1648.12\n"),
            reformatter().reformat("[FREQ]\n1648.13\n")
        );
    }

    #[test]
    fn test_title_is_skipped() {
        let a = reformatter().reformat("[Title]\nfirst run\n[Atoms] AU\n");
        let b = reformatter().reformat("[TITLE]\n  written elsewhere  \n[ATOMS] AU\n");
        assert_eq!(a, b);
        assert_eq!(a, "[title]\n[atoms] angs\n");
    }

    #[test]
    fn test_key_value_records() {
        let r = reformatter();
        assert_eq!(r.reformat("[MO]\n Sym=A1\n"), r.reformat("[MO]\n sym=  A1\n"));
        assert_eq!(r.reformat("[MO]\nEne= -0.5\n"), "[mo]\nene= -5.00000e-1\n");
    }

    #[test]
    fn test_sp_shell_split() {
        let packed = "[GTO]\n  1 0\n sp   2 1.00\n  3.0  0.1  0.2\n  1.0  0.3  0.4\n\n";
        let split = "[GTO]\n  1 0\n s 2 1.00\n 3.0 0.1\n 1.0 0.3\n p 2 1.00\n 3.0 0.2\n 1.0 0.4\n";

        let r = reformatter();
        assert_eq!(r.reformat(packed), r.reformat(split));
        assert!(r.reformat(packed).contains("\ns 2 1.00000e0\n"));

        let keep = MoldenReformatter::new(ReformatConfig {
            split_sp_shells: false,
            ..ReformatConfig::default()
        });
        assert!(keep.reformat(packed).contains("\nsp 2 1.00000e0\n"));
    }

    #[test]
    fn test_bohr_atoms_match_angstrom_atoms() {
        let r = reformatter();
        let bohr = "[Atoms] AU\nO 1 8 0.0 0.0 2.0\n[GTO]\n";
        let angstrom = "[Atoms] Angs\nO 1 8 0.0 0.0 1.058354421806\n[GTO]\n";
        assert_eq!(r.reformat(bohr), r.reformat(angstrom));
        assert_eq!(
            r.reformat(bohr),
            "[atoms] angs\nO 1 8 0.00000e0 0.00000e0 1.05835e0\n[gto]\n"
        );

        // A header without a unit is bohr as well
        assert_eq!(
            r.reformat("[Atoms]\nO 1 8 0.0 0.0 2.0\n"),
            r.reformat("[Atoms] Angs\nO 1 8 0.0 0.0 1.058354421806\n")
        );

        let keep = MoldenReformatter::new(ReformatConfig {
            atoms_in_angstrom: false,
            ..ReformatConfig::default()
        });
        assert_eq!(
            keep.reformat(bohr),
            "[atoms] au\nO 1 8 0.00000e0 0.00000e0 2.00000e0\n[gto]\n"
        );
    }

    #[test]
    fn test_indexed_symmetries_are_canonical() {
        let r = reformatter();
        assert_eq!(r.reformat("[MO]\n Sym=     1a1\n"), "[mo]\nsym= A1\n");
        assert_eq!(r.reformat("[MO]\n Sym=12b2\n"), r.reformat("[MO]\n Sym= B2\n"));
        assert_eq!(r.reformat("[MO]\n Sym= 3a''\n"), "[mo]\nsym= A\"\n");

        let keep = MoldenReformatter::new(ReformatConfig {
            canonical_symmetries: false,
            ..ReformatConfig::default()
        });
        assert_eq!(keep.reformat("[MO]\n Sym= 1a1\n"), "[mo]\nsym= 1a1\n");
    }
}
