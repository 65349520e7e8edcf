//! Error types for binary file operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::TypeCode;

/// Errors that can occur when reading or writing CLEO binary files.
#[derive(Debug, Error)]
pub enum BinaryError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Preamble could not be parsed.
    #[error("invalid binary file: {message}")]
    Format { message: String },

    /// File length disagrees with the lengths declared in the preamble.
    #[error("file length mismatch: preamble declares {expected} bytes, file has {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Requested array is not present.
    #[error("array not found: {name}")]
    UnknownArray { name: String },

    /// A value cannot be represented exactly under the declared type code.
    #[error("array {name}[{index}] = {value} is not representable as type '{type_code}'")]
    TypeMismatch {
        name: String,
        index: usize,
        value: String,
        type_code: TypeCode,
    },

    /// Array name is empty or contains whitespace or non-printable characters.
    #[error("invalid array name: {name:?}")]
    InvalidArrayName { name: String },

    /// Units label contains whitespace or non-printable characters.
    #[error("invalid units {units:?} for array {name}")]
    InvalidUnits { name: String, units: String },

    /// Duplicate array name.
    #[error("duplicate array name: {name}")]
    DuplicateArray { name: String },

    /// Scale factor is zero, negative or not finite.
    #[error("invalid scale factor {scale_factor} for array {name}")]
    InvalidScaleFactor { name: String, scale_factor: f64 },

    /// I/O error on a file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error on a reader or writer with no path.
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),
}

/// Result type alias for binary file operations.
pub type Result<T> = std::result::Result<T, BinaryError>;

impl BinaryError {
    /// Create a Format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create an UnknownArray error.
    pub fn unknown_array(name: impl Into<String>) -> Self {
        Self::UnknownArray { name: name.into() }
    }

    /// Create a DuplicateArray error.
    pub fn duplicate_array(name: impl Into<String>) -> Self {
        Self::DuplicateArray { name: name.into() }
    }

    /// Create an Io error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach `path` to a stream I/O error.
    #[must_use]
    pub fn at_path(self, path: &Path) -> Self {
        match self {
            Self::Stream(source) => Self::io(path, source),
            other => other,
        }
    }

    /// Create an InvalidArrayName error.
    pub fn invalid_array_name(name: impl Into<String>) -> Self {
        Self::InvalidArrayName { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BinaryError::format("missing CLEOBIN tag");
        assert_eq!(err.to_string(), "invalid binary file: missing CLEOBIN tag");

        let err = BinaryError::LengthMismatch {
            expected: 96,
            actual: 88,
        };
        assert_eq!(
            err.to_string(),
            "file length mismatch: preamble declares 96 bytes, file has 88"
        );

        let err = BinaryError::TypeMismatch {
            name: "xi".into(),
            index: 0,
            value: "1.5".into(),
            type_code: TypeCode::UInt64,
        };
        assert_eq!(
            err.to_string(),
            "array xi[0] = 1.5 is not representable as type 'Q'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: BinaryError = io_err.into();
        assert!(matches!(err, BinaryError::Stream(_)));

        let err = err.at_path(Path::new("share/gbx.dat"));
        assert!(matches!(&err, BinaryError::Io { path, .. } if path == Path::new("share/gbx.dat")));
        assert_eq!(err.to_string(), "I/O error on share/gbx.dat: eof");

        let err = BinaryError::format("bad").at_path(Path::new("x"));
        assert!(matches!(err, BinaryError::Format { .. }));
    }
}
