//! Parsing of unit spellings and of quantity strings.
//!
//! Quantity strings are a number followed by an optional unit, with or without
//! whitespace between them:
//!
//! ```text
//! quantity = number ws? unit?
//! number   = any string accepted by f64::from_str
//! unit     = any spelling known to the unit registry
//! ```
//!
//! `"1000 m"`, `"25℃"` and `"-3.5 degC"` are all accepted.

use super::conversion::Unit;
use thiserror::Error;

/// Error type for unit parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Empty unit string.
    #[error("empty unit string")]
    EmptyUnit,
    /// Unknown unit symbol.
    #[error("unknown unit: '{0}'")]
    UnknownUnit(String),
    /// The string does not start with a number.
    #[error("not a number: '{0}'")]
    InvalidNumber(String),
}

/// Splits a quantity string into its magnitude and optional unit.
///
/// # Example
///
/// ```
/// use wxcalc_core::units::{parse_quantity, Unit};
///
/// assert_eq!(parse_quantity("1000 m").unwrap(), (1000.0, Some(Unit::Meter)));
/// assert_eq!(parse_quantity("12.5").unwrap(), (12.5, None));
/// ```
pub fn parse_quantity(input: &str) -> Result<(f64, Option<Unit>), ParseError> {
    let trimmed = input.trim();
    let (magnitude, rest) =
        split_number(trimmed).ok_or_else(|| ParseError::InvalidNumber(trimmed.to_string()))?;
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok((magnitude, None));
    }
    Ok((magnitude, Some(Unit::parse(rest)?)))
}

/// Finds the longest prefix that parses as a float.
fn split_number(input: &str) -> Option<(f64, &str)> {
    (1..=input.len())
        .rev()
        .filter(|&idx| input.is_char_boundary(idx))
        .find_map(|idx| {
            input[..idx]
                .trim_end()
                .parse::<f64>()
                .ok()
                .map(|value| (value, &input[idx..]))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_and_unit() {
        assert_eq!(
            parse_quantity("1000 m").unwrap(),
            (1000.0, Some(Unit::Meter))
        );
        assert_eq!(
            parse_quantity("-3.5 degC").unwrap(),
            (-3.5, Some(Unit::DegreeCelsius))
        );
        assert_eq!(
            parse_quantity("1e3 Pa").unwrap(),
            (1000.0, Some(Unit::Pascal))
        );
    }

    #[test]
    fn test_unit_without_space() {
        assert_eq!(
            parse_quantity("25℃").unwrap(),
            (25.0, Some(Unit::DegreeCelsius))
        );
        assert_eq!(
            parse_quantity("850hPa").unwrap(),
            (850.0, Some(Unit::Hectopascal))
        );
    }

    #[test]
    fn test_bare_number() {
        assert_eq!(parse_quantity(" 42 ").unwrap(), (42.0, None));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_quantity("warm"),
            Err(ParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_quantity("3 furlongs"),
            Err(ParseError::UnknownUnit(_))
        ));
    }
}
