//! Error types for building initial conditions.

use cleo_binary::BinaryError;
use cleo_config::ConfigError;
use cleo_model::{Axis, ModelError};
use thiserror::Error;

/// Errors raised while generating, dimensionalising, writing or reading
/// initial conditions.
#[derive(Debug, Error)]
pub enum InitError {
    /// An array does not have the length its counts imply.
    #[error("{name} has length {actual}, expected {expected}")]
    Shape {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Axis boundaries do not describe at least one strictly increasing cell.
    #[error("invalid {axis} geometry: {message}")]
    InvalidGeometry { axis: Axis, message: String },

    /// A superdroplet does not belong to the gridbox it is assigned to.
    #[error("gridbox assignment failed: {message}")]
    IndexAssignment { message: String },

    /// A physical input lies outside the range of a fitted formula.
    #[error("{quantity} = {value} is outside the valid range [{min}, {max}]")]
    DomainRange {
        quantity: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Rounding produced superdroplets representing no real droplets.
    #[error("{count} out of {total} superdroplets created with multiplicity = 0")]
    ZeroMultiplicity { count: usize, total: usize },

    /// A file's scale factor disagrees with the one the constants give.
    #[error("{name} has scale factor {found} in file, constants give {expected}")]
    ScaleFactor {
        name: String,
        found: f64,
        expected: f64,
    },

    /// Generator parameters are inconsistent.
    #[error("generator error: {message}")]
    Generator { message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Binary(#[from] BinaryError),
}

/// Result type alias for initial-condition operations.
pub type Result<T> = std::result::Result<T, InitError>;

impl InitError {
    /// Create a Shape error.
    pub fn shape(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::Shape {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// Create an InvalidGeometry error.
    pub fn invalid_geometry(axis: Axis, message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            axis,
            message: message.into(),
        }
    }

    /// Create an IndexAssignment error.
    pub fn index_assignment(message: impl Into<String>) -> Self {
        Self::IndexAssignment {
            message: message.into(),
        }
    }

    /// Create a Generator error.
    pub fn generator(message: impl Into<String>) -> Self {
        Self::Generator {
            message: message.into(),
        }
    }
}

impl From<ModelError> for InitError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidGeometry { axis, message } => Self::InvalidGeometry { axis, message },
            ModelError::GridboxOutOfRange { index, ngridboxes } => Self::index_assignment(format!(
                "gridbox index {index} out of range for {ngridboxes} gridboxes"
            )),
            ModelError::Shape {
                name,
                expected,
                actual,
            } => Self::Shape {
                name,
                expected,
                actual,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InitError::shape("press", 10, 9);
        assert_eq!(err.to_string(), "press has length 9, expected 10");

        let err = InitError::ZeroMultiplicity { count: 2, total: 8 };
        assert_eq!(
            err.to_string(),
            "2 out of 8 superdroplets created with multiplicity = 0"
        );
    }

    #[test]
    fn test_model_error_conversion() {
        let err: InitError = ModelError::GridboxOutOfRange {
            index: 7,
            ngridboxes: 4,
        }
        .into();
        assert!(matches!(err, InitError::IndexAssignment { .. }));

        let err: InitError = ModelError::invalid_geometry(Axis::X, "too few").into();
        assert!(matches!(
            err,
            InitError::InvalidGeometry { axis: Axis::X, .. }
        ));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: InitError = ConfigError::missing_constant("W0").into();
        assert_eq!(err.to_string(), "missing constant: W0");
    }
}
