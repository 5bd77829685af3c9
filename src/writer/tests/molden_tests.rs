//! Molden writer tests

use super::{WATER_MOLDEN, molden_diff, water_schema};
use crate::config::{Config, WriterConfig};
use crate::error::QcError;
use crate::parser::{LogFormat, LogParser};
use crate::schema::{AngularConvention, Attribute, AttributeValue};
use crate::writer::{FormatWriter, MoldenWriter};

fn writer() -> MoldenWriter {
    MoldenWriter::new(WriterConfig::default())
}

#[test]
fn test_round_trip_is_structurally_identical() {
    let schema = water_schema();
    let written = writer().generate_repr(&schema).unwrap();

    let diff = molden_diff(WATER_MOLDEN, &written);
    assert!(diff.is_empty(), "unexpected differences:\n{}", diff.join("\n"));
}

#[test]
fn test_written_document_parses_back() {
    let schema = water_schema();
    let written = writer().generate_repr(&schema).unwrap();

    let reparsed = LogParser::new(LogFormat::Molden)
        .with_config(Config::default())
        .parse_str(&written);

    assert!(reparsed.stats.is_clean());
    assert!(reparsed.validation.unwrap().is_valid());
    assert_eq!(reparsed.data.atomic_numbers(), schema.atomic_numbers());
    assert_eq!(reparsed.data.basis_shells(), schema.basis_shells());
    assert_eq!(reparsed.data.orbital_symmetries(), schema.orbital_symmetries());

    let before = schema.orbital_energies().unwrap();
    let after = reparsed.data.orbital_energies().unwrap();
    for (a, b) in before[0].iter().zip(&after[0]) {
        assert!((a - b).abs() < 1e-8);
    }
}

#[test]
fn test_energies_written_in_hartree() {
    let written = writer().generate_repr(&water_schema()).unwrap();
    assert!(written.contains(" Ene= -20.5000000000\n"));
    assert!(written.contains(" Ene= 0.2500000000\n"));
    assert!(written.contains(" Spin= Alpha\n"));
}

#[test]
fn test_missing_coordinates_are_named() {
    let mut schema = water_schema();
    schema.remove(Attribute::AtomCoordinates);

    match writer().generate_repr(&schema) {
        Err(QcError::MissingAttributes { format, missing }) => {
            assert_eq!(format, "molden");
            assert_eq!(missing, vec![Attribute::AtomCoordinates]);
        }
        other => panic!("expected MissingAttributes, got {other:?}"),
    }
}

#[test]
fn test_every_missing_attribute_is_listed() {
    let error = writer()
        .generate_repr(&crate::schema::Schema::new())
        .unwrap_err();
    let message = error.to_string();
    for name in [
        "atomic_numbers",
        "atom_coordinates",
        "basis_shells",
        "orbital_energies",
        "orbital_coefficients",
    ] {
        assert!(message.contains(name), "{message}");
    }
}

#[test]
fn test_coefficient_width_mismatch() {
    let mut schema = water_schema();
    schema.remove(Attribute::OrbitalCoefficients);
    schema
        .set(
            Attribute::OrbitalCoefficients,
            AttributeValue::SpinMatrices(vec![vec![vec![1.0; 5], vec![0.0; 5]]]),
        )
        .unwrap();

    assert!(matches!(
        writer().generate_repr(&schema),
        Err(QcError::InconsistentData {
            attribute: Attribute::OrbitalCoefficients,
            ..
        })
    ));
}

#[test]
fn test_atom_count_mismatch() {
    let mut schema = water_schema();
    schema.remove(Attribute::AtomCount);
    schema
        .set(Attribute::AtomCount, AttributeValue::Count(4))
        .unwrap();

    assert!(matches!(
        writer().generate_repr(&schema),
        Err(QcError::InconsistentData {
            attribute: Attribute::AtomCount,
            ..
        })
    ));
}

#[test]
fn test_angular_flags_follow_basis() {
    let mut schema = water_schema();
    schema
        .set(
            Attribute::AngularConvention,
            AttributeValue::Convention(AngularConvention {
                spherical_d: true,
                spherical_f: true,
                spherical_g: true,
            }),
        )
        .unwrap();

    let written = writer().generate_repr(&schema).unwrap();
    let gto = written.find("[GTO]").unwrap();
    let flag = written.find("[5D]\n[9G]\n").unwrap();
    let mo = written.find("[MO]").unwrap();
    assert!(gto < flag && flag < mo);

    let reparsed = LogParser::new(LogFormat::Molden)
        .with_config(Config::default().without_validation())
        .parse_str(&written);
    assert_eq!(
        reparsed.data.angular_convention(),
        schema.angular_convention()
    );
}

#[test]
fn test_cartesian_basis_has_no_flags() {
    let written = writer().generate_repr(&water_schema()).unwrap();
    for flag in ["[5D]", "[5D10F]", "[7F]", "[9G]"] {
        assert!(!written.contains(flag));
    }
}

#[test]
fn test_vibrations_written_in_bohr() {
    let mut schema = water_schema();
    schema
        .set(
            Attribute::VibrationalFrequencies,
            AttributeValue::Reals(vec![1648.5]),
        )
        .unwrap();
    schema
        .set(
            Attribute::VibrationalIntensities,
            AttributeValue::Reals(vec![72.25]),
        )
        .unwrap();
    schema
        .set(
            Attribute::VibrationalDisplacements,
            AttributeValue::Displacements(vec![vec![
                [0.0, 0.0, 0.0529177210903],
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
            ]]),
        )
        .unwrap();
    schema
        .set(Attribute::StepEnergies, AttributeValue::Reals(vec![-2068.5]))
        .unwrap();

    let written = writer().generate_repr(&schema).unwrap();
    assert!(written.contains("[FREQ]\n   1648.500000\n[FR-COORD]\n"));
    assert!(written.contains("[FR-NORM-COORD]\n vibration     1\n"));
    assert!(written.contains("0.1000000000\n"));
    assert!(written.contains("[INT]\n     72.250000\n"));
    assert!(written.contains("[GEOCONV]\nenergy\n"));

    let reparsed = LogParser::new(LogFormat::Molden)
        .with_config(Config::default().without_validation())
        .parse_str(&written);
    assert!(reparsed.stats.is_clean());
    let modes = reparsed.data.vibrational_displacements().unwrap();
    assert!((modes[0][0][2] - 0.0529177210903).abs() < 1e-9);
    let steps = reparsed.data.step_energies().unwrap();
    assert!((steps[0] + 2068.5).abs() < 1e-6);
}

#[test]
fn test_displacement_shape_mismatch() {
    let mut schema = water_schema();
    schema
        .set(
            Attribute::VibrationalFrequencies,
            AttributeValue::Reals(vec![1648.5, 3800.0]),
        )
        .unwrap();
    schema
        .set(
            Attribute::VibrationalDisplacements,
            AttributeValue::Displacements(vec![vec![[0.0; 3]; 3]]),
        )
        .unwrap();

    let error = writer().generate_repr(&schema).unwrap_err();
    assert!(matches!(
        error,
        QcError::InconsistentData {
            attribute: Attribute::VibrationalDisplacements,
            ..
        }
    ));
}

#[test]
fn test_default_title_when_unset() {
    let mut schema = water_schema();
    schema.remove(Attribute::Title);

    let writer = MoldenWriter::new(WriterConfig {
        default_title: "untitled run".to_string(),
        ..WriterConfig::default()
    });
    let written = writer.generate_repr(&schema).unwrap();
    assert!(written.starts_with("[Molden Format]\n[Title]\nuntitled run\n[Atoms] Angs\n"));
}
