//! Length checks for attribute and field arrays.

use crate::error::{InitError, Result};

/// Checks that named arrays have the lengths their counts imply.
///
/// ```
/// use cleo_init::ShapeValidator;
///
/// let press = vec![1.0; 6];
/// let temp = vec![1.0; 6];
/// ShapeValidator::new(6)
///     .validate([("press", press.len()), ("temp", temp.len())])
///     .unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeValidator {
    expected: usize,
}

impl ShapeValidator {
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self { expected }
    }

    #[must_use]
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Check one array length.
    pub fn check(&self, name: &str, len: usize) -> Result<()> {
        if len == self.expected {
            Ok(())
        } else {
            Err(InitError::shape(name, self.expected, len))
        }
    }

    /// Check every `(name, length)` pair; fails on the first mismatch.
    pub fn validate<'a>(&self, arrays: impl IntoIterator<Item = (&'a str, usize)>) -> Result<()> {
        arrays
            .into_iter()
            .try_for_each(|(name, len)| self.check(name, len))
    }
}

/// Check that every array has `expected` elements.
pub fn validate_shape<'a>(
    arrays: impl IntoIterator<Item = (&'a str, usize)>,
    expected: usize,
) -> Result<()> {
    ShapeValidator::new(expected).validate(arrays)
}

/// Check that all arrays share one length and return it.
///
/// The first array sets the length; an empty input yields 0.
pub fn validate_consistent<'a>(arrays: impl IntoIterator<Item = (&'a str, usize)>) -> Result<usize> {
    let mut arrays = arrays.into_iter();
    let Some((_, first)) = arrays.next() else {
        return Ok(0);
    };
    ShapeValidator::new(first).validate(arrays)?;
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_length_passes() {
        let values = vec![0.0; 12];
        assert!(validate_shape([("press", values.len())], 12).is_ok());
    }

    #[test]
    fn test_short_and_long_fail() {
        for len in [11, 13] {
            let err = validate_shape([("temp", 12), ("qvap", len)], 12).unwrap_err();
            match err {
                InitError::Shape {
                    name,
                    expected,
                    actual,
                } => {
                    assert_eq!(name, "qvap");
                    assert_eq!(expected, 12);
                    assert_eq!(actual, len);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_consistent_lengths() {
        assert_eq!(validate_consistent([("xi", 4), ("radius", 4)]).unwrap(), 4);
        assert_eq!(validate_consistent(std::iter::empty()).unwrap(), 0);
        assert!(validate_consistent([("xi", 4), ("radius", 3)]).is_err());
    }
}
