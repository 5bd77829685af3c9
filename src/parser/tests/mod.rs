//! Test utilities for the extraction engines
//!
//! Shared fixtures and helpers used across the Molden and XYZ test modules.

use std::io::Write;
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::parser::{LogFormat, LogParser, ParseResult};


/// Tolerance for comparisons of converted floating-point values
pub const EPSILON: f64 = 1e-9;

/// Parse Molden text without running validation
pub fn parse_molden(text: &str) -> ParseResult {
    LogParser::new(LogFormat::Molden)
        .with_config(Config::default().without_validation())
        .parse_str(text)
}

/// Parse XYZ text without running validation
pub fn parse_xyz(text: &str) -> ParseResult {
    LogParser::new(LogFormat::Xyz)
        .with_config(Config::default().without_validation())
        .parse_str(text)
}

/// Create a temporary file with the given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

/// Two-atom Molden document with a minimal basis and one MO per spin channel
pub fn create_test_molden() -> String {
    r#"[Molden Format]
[Title]
hydrogen molecule
[Atoms] AU
H     1    1         0.0000000000        0.0000000000       -0.7000000000
H     2    1         0.0000000000        0.0000000000        0.7000000000
[GTO]
  1 0
 s    2 1.00
  0.1301070100D+02  0.1968215800D-01
  0.1962257200D+01  0.1379652400D+00

  2 0
 s    2 1.00
  0.1301070100D+02  0.1968215800D-01
  0.1962257200D+01  0.1379652400D+00

[MO]
 Sym=  1sigmag
 Ene= -0.5948
 Spin= Alpha
 Occup= 1.000000
   1       0.5488
   2       0.5488
 Sym= 1sigmag
 Ene= -0.5212
 Spin= Beta
 Occup= 1.000000
   1       0.5488
   2       0.5488
"#
    .to_string()
}

#[test]
fn test_log_format_names() {
    assert_eq!("molden".parse::<LogFormat>().unwrap(), LogFormat::Molden);
    assert_eq!(" XYZ ".parse::<LogFormat>().unwrap(), LogFormat::Xyz);
    assert!("gaussian".parse::<LogFormat>().is_err());
    assert_eq!(LogFormat::Molden.to_string(), "molden");
    assert_eq!(LogFormat::Xyz.extension(), "xyz");
}

#[test]
fn test_parse_file() {
    let file = create_temp_file(&create_test_molden());
    let result = LogParser::new(LogFormat::Molden)
        .parse_file(file.path())
        .unwrap();

    assert_eq!(result.data.atom_count(), Some(2));
    assert!(result.stats.is_clean());
    let report = result.validation.expect("validation runs by default");
    assert!(report.is_valid(), "unexpected diagnostics: {:?}", report.diagnostics);
}

#[test]
fn test_parse_missing_file() {
    let result = LogParser::new(LogFormat::Molden)
        .parse_file(std::path::Path::new("/nonexistent/input.molden"));
    assert!(matches!(
        result,
        Err(crate::error::QcError::FileNotFound { .. })
    ));
}

#[test]
fn test_line_ending_normalization() {
    let unix = create_test_molden();
    let windows = unix.replace('\n', "\r\n");
    let old_mac = unix.replace('\n', "\r");

    let parser = LogParser::new(LogFormat::Molden).with_config(Config::default().without_validation());
    let expected = parser.parse_str(&unix);

    for text in [&windows, &old_mac] {
        let result = parser.parse_reader(text.as_bytes()).unwrap();
        assert_eq!(result.data, expected.data);
        assert_eq!(result.stats.lines_read, expected.stats.lines_read);
    }
}

#[test]
fn test_independent_parses() {
    let text = create_test_molden();
    let first = parse_molden(&text);
    let second = parse_molden(&text);

    assert_eq!(first.data, second.data);
    assert_eq!(second.data.atom_coordinates().map(|s| s.len()), Some(1));
}
