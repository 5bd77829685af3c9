//! Configuration management and validation.
//!
//! Provides configuration structures for parsing, validation tolerances,
//! output formatting, round-trip reformatting and batch processing. Every
//! section has sensible defaults, so a TOML file only needs the keys it
//! changes:
//!
//! ```toml
//! [validation]
//! check_hessian_frequencies = true
//! frequency_tolerance = 0.5
//!
//! [reformat]
//! significant_digits = 5
//! ```

use crate::constants::{
    DEFAULT_COORDINATE_PRECISION, DEFAULT_FREQUENCY_TOLERANCE, DEFAULT_LINEAR_TOLERANCE,
    DEFAULT_SIGNIFICANT_DIGITS, DEFAULT_SYMMETRY_TOLERANCE, DEFAULT_TITLE,
};
use crate::error::{QcError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Parser behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Run the validation layer on every parse result
    pub validate_after_parse: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            validate_after_parse: true,
        }
    }
}

/// Tolerances used by the validation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Largest |H[i][j] - H[j][i]| accepted for a symmetric hessian
    pub symmetry_tolerance: f64,

    /// Largest perpendicular distance (Å) from the molecular axis for a linear molecule
    pub linear_tolerance: f64,

    /// Diagonalize the mass-weighted hessian and compare with the stored frequencies
    pub check_hessian_frequencies: bool,

    /// Largest frequency deviation (cm⁻¹) accepted by the normal-mode check
    pub frequency_tolerance: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            symmetry_tolerance: DEFAULT_SYMMETRY_TOLERANCE,
            linear_tolerance: DEFAULT_LINEAR_TOLERANCE,
            check_hessian_frequencies: false,
            frequency_tolerance: DEFAULT_FREQUENCY_TOLERANCE,
        }
    }
}

/// Output formatting for writers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Decimal places for coordinates and displacements
    pub coordinate_precision: usize,

    /// Title written when the schema carries none
    pub default_title: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            coordinate_precision: DEFAULT_COORDINATE_PRECISION,
            default_title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Canonicalization applied before round-trip diffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReformatConfig {
    /// Significant digits kept for floating-point tokens
    pub significant_digits: usize,

    /// Drop the content of the `[Title]` section
    pub skip_title: bool,

    /// Rewrite SP shells as an S shell followed by a P shell
    pub split_sp_shells: bool,

    /// Rewrite bohr `[Atoms]` coordinates in Ångström
    pub atoms_in_angstrom: bool,

    /// Strip orbital indices from `Sym=` values and canonicalize them
    pub canonical_symmetries: bool,
}

impl Default for ReformatConfig {
    fn default() -> Self {
        Self {
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
            skip_title: true,
            split_sp_shells: true,
            atoms_in_angstrom: true,
            canonical_symmetries: true,
        }
    }
}

/// Batch processing settings for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of files parsed concurrently
    pub workers: usize,

    /// Stop at the first file that fails
    pub fail_fast: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            fail_fast: false,
        }
    }
}

/// Global configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    pub validation: ValidationConfig,
    pub writer: WriterConfig,
    pub reformat: ReformatConfig,
    pub processing: ProcessingConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(QcError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate().map_err(QcError::configuration)?;
        Ok(config)
    }

    /// Set the number of concurrent workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.processing.workers = workers;
        self
    }

    /// Stop batch processing at the first failure
    pub fn with_fail_fast(mut self) -> Self {
        self.processing.fail_fast = true;
        self
    }

    /// Skip validation after parsing
    pub fn without_validation(mut self) -> Self {
        self.parser.validate_after_parse = false;
        self
    }

    /// Enable the hessian normal-mode check with the given tolerance in cm⁻¹
    pub fn with_hessian_frequency_check(mut self, tolerance: f64) -> Self {
        self.validation.check_hessian_frequencies = true;
        self.validation.frequency_tolerance = tolerance;
        self
    }

    /// Set the significant digits kept by the reformatter
    pub fn with_significant_digits(mut self, digits: usize) -> Self {
        self.reformat.significant_digits = digits;
        self
    }

    /// Set the decimal places used for written coordinates
    pub fn with_coordinate_precision(mut self, precision: usize) -> Self {
        self.writer.coordinate_precision = precision;
        self
    }

    /// Validate configuration settings
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.processing.workers == 0 {
            return Err("Worker count must be greater than 0".to_string());
        }

        if !(1..=17).contains(&self.reformat.significant_digits) {
            return Err("Significant digits must be between 1 and 17".to_string());
        }

        if self.writer.coordinate_precision > 17 {
            return Err("Coordinate precision must not exceed 17".to_string());
        }

        let tolerances = [
            ("Symmetry tolerance", self.validation.symmetry_tolerance),
            ("Linear tolerance", self.validation.linear_tolerance),
            ("Frequency tolerance", self.validation.frequency_tolerance),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a non-negative number"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.parser.validate_after_parse);
        assert!(!config.validation.check_hessian_frequencies);
        assert_eq!(config.reformat.significant_digits, 6);
        assert_eq!(config.writer.default_title, DEFAULT_TITLE);
        assert!(config.processing.workers > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_workers(2)
            .with_fail_fast()
            .without_validation()
            .with_hessian_frequency_check(0.5)
            .with_significant_digits(4)
            .with_coordinate_precision(6);

        assert_eq!(config.processing.workers, 2);
        assert!(config.processing.fail_fast);
        assert!(!config.parser.validate_after_parse);
        assert!(config.validation.check_hessian_frequencies);
        assert_eq!(config.validation.frequency_tolerance, 0.5);
        assert_eq!(config.reformat.significant_digits, 4);
        assert_eq!(config.writer.coordinate_precision, 6);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(Config::new().with_workers(0).validate().is_err());
        assert!(Config::new().with_significant_digits(0).validate().is_err());

        let mut config = Config::new();
        config.validation.symmetry_tolerance = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
[validation]
check_hessian_frequencies = true

[reformat]
significant_digits = 5
"#,
        )
        .unwrap();

        assert!(config.validation.check_hessian_frequencies);
        assert_eq!(config.validation.frequency_tolerance, DEFAULT_FREQUENCY_TOLERANCE);
        assert_eq!(config.reformat.significant_digits, 5);
        assert!(config.reformat.split_sp_shells);
    }

    #[test]
    fn test_invalid_toml_values() {
        let result = Config::from_toml("[processing]\nworkers = 0\n");
        assert!(matches!(result, Err(QcError::Configuration { .. })));

        let result = Config::from_toml("[processing]\nworkers = \"many\"\n");
        assert!(matches!(result, Err(QcError::ConfigParse(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[writer]\ncoordinate_precision = 8").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.writer.coordinate_precision, 8);

        let missing = Config::from_file(Path::new("/nonexistent/qclog.toml"));
        assert!(matches!(missing, Err(QcError::FileNotFound { .. })));
    }
}
