use thiserror::Error;

use crate::geometry::Axis;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid {axis} axis: {message}")]
    InvalidGeometry { axis: Axis, message: String },

    #[error("gridbox index {index} out of range for {ngridboxes} gridboxes")]
    GridboxOutOfRange { index: usize, ngridboxes: usize },

    #[error("{name}: expected length {expected}, found {actual}")]
    Shape {
        name: String,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    pub fn invalid_geometry(axis: Axis, message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            axis,
            message: message.into(),
        }
    }

    pub fn shape(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::Shape {
            name: name.into(),
            expected,
            actual,
        }
    }
}
