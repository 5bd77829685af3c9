//! Writer and round-trip tests

use crate::config::{Config, ReformatConfig, WriterConfig};
use crate::parser::{LogFormat, LogParser};
use crate::schema::Schema;
use crate::writer::{FormatWriter, MoldenReformatter, structural_diff, writer_for};

mod molden_tests;

/// Water in a minimal basis, laid out the way the Molden writer emits it
pub const WATER_MOLDEN: &str = "[Molden Format]
[Title]
water
[Atoms] Angs
O     1    8         0.0000000000        0.0000000000        0.1177900000
H     2    1         0.0000000000        0.7554500000       -0.4711600000
H     3    1         0.0000000000       -0.7554500000       -0.4711600000
[GTO]
   1 0
 s      1 1.00
  0.1300000000D+03  0.1000000000D+01
 p      1 1.00
  0.5000000000D+01  0.1000000000D+01

   2 0
 s      1 1.00
  0.3425250914D+01  0.1543289673D+00

   3 0
 s      1 1.00
  0.3425250914D+01  0.1543289673D+00

[MO]
 Sym= A1
 Ene= -20.5
 Spin= Alpha
 Occup= 2.0
     1   0.99
     2   0.0
     3   0.0
     4   0.02
     5   0.005
     6   0.005
 Sym= B2
 Ene= 0.25
 Spin= Alpha
 Occup= 0.0
     1   0.0
     2   0.0
     3   0.75
     4   0.0
     5   -0.6
     6   0.6
";

/// Parsed water record, validation off
pub fn water_schema() -> Schema {
    LogParser::new(LogFormat::Molden)
        .with_config(Config::default().without_validation())
        .parse_str(WATER_MOLDEN)
        .data
}

/// Canonical diff between two Molden texts
pub fn molden_diff(a: &str, b: &str) -> Vec<String> {
    let reformatter = MoldenReformatter::new(ReformatConfig::default());
    structural_diff(&reformatter.reformat(a), &reformatter.reformat(b))
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn test_writer_for_each_format() {
    let config = WriterConfig::default();
    for format in [LogFormat::Molden, LogFormat::Xyz] {
        assert_eq!(writer_for(format, &config).format(), format);
    }
}

#[test]
fn test_write_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("water.xyz");

    let writer = writer_for(LogFormat::Xyz, &WriterConfig::default());
    writer.write_file(&water_schema(), &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("3\nwater\n"));
}

#[test]
fn test_failed_write_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.molden");

    let writer = writer_for(LogFormat::Molden, &WriterConfig::default());
    assert!(writer.write_file(&Schema::new(), &path).is_err());
    assert!(!path.exists());
}
