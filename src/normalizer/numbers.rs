//! Numeric token parsing for vendor output.

use crate::error::{QcError, Result};

/// Rewrite a Fortran `D` exponent marker to the standard `E` form
///
/// `0.5484671660D+04` becomes `0.5484671660E+04`. Tokens without a `D`
/// marker are returned unchanged.
pub fn normalize_exponent_marker(token: &str) -> String {
    token.replace(['D', 'd'], "E")
}

/// Parse a floating-point token, accepting Fortran exponent markers
pub fn parse_real(token: &str) -> Result<f64> {
    let trimmed = token.trim();
    let normalized = normalize_exponent_marker(trimmed);
    normalized
        .parse::<f64>()
        .map_err(|e| QcError::invalid_number(trimmed, e.to_string()))
}

/// Parse an integer token; integral reals such as `8.0` are accepted and rounded
pub fn parse_integer(token: &str) -> Result<i64> {
    let trimmed = token.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }

    let real = parse_real(trimmed)?;
    if !real.is_finite() || (real - real.round()).abs() >= 1e-6 {
        return Err(QcError::invalid_number(trimmed, "not an integer"));
    }
    // `as` saturates, so reject magnitudes outside the i64 range first
    if real.abs() >= i64::MAX as f64 {
        return Err(QcError::invalid_number(trimmed, "integer out of range"));
    }
    Ok(real.round() as i64)
}

/// Parse every whitespace-separated token of `line` as a real
pub fn parse_reals(line: &str) -> Result<Vec<f64>> {
    line.split_whitespace().map(parse_real).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fortran_exponents() {
        assert_eq!(parse_real("0.5484671660D+04").unwrap(), 5484.671660);
        assert_eq!(parse_real("0.1831074430d-02").unwrap(), 0.001831074430);
        assert_eq!(parse_real("-1.5E+01").unwrap(), -15.0);
        assert_eq!(parse_real(" 2.5 ").unwrap(), 2.5);
    }

    #[test]
    fn test_invalid_real() {
        match parse_real("abc") {
            Err(QcError::InvalidNumber { token, .. }) => assert_eq!(token, "abc"),
            other => panic!("Expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_tokens() {
        assert_eq!(parse_integer("8").unwrap(), 8);
        assert_eq!(parse_integer("8.0").unwrap(), 8);
        assert_eq!(parse_integer("7.9999999").unwrap(), 8);
        assert!(parse_integer("7.5").is_err());
    }

    #[test]
    fn test_integer_out_of_range_is_rejected() {
        assert!(parse_integer("1e19").is_err());
        assert!(parse_integer("-1D+20").is_err());
        assert_eq!(parse_integer("1e6").unwrap(), 1_000_000);
    }

    #[test]
    fn test_parse_reals_line() {
        assert_eq!(
            parse_reals("  1.0D+00   2.0  -3.0e-1").unwrap(),
            vec![1.0, 2.0, -0.3]
        );
        assert!(parse_reals("1.0 x").is_err());
    }
}
