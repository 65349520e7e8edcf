//! Error types for configuration handling.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    ConfigParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("missing constant: {name}")]
    MissingConstant { name: String },

    #[error("constant {name} must be finite and positive, got {value}")]
    InvalidConstant { name: String, value: f64 },

    #[error("missing configuration key: {key}")]
    MissingKey { key: String },

    #[error("configuration key {key} = {value:?} is not a valid {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a MissingConstant error.
    pub fn missing_constant(name: impl Into<String>) -> Self {
        Self::MissingConstant { name: name.into() }
    }

    /// Create a MissingKey error.
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::parse("config.txt", 7, "expected key = value");
        assert_eq!(err.to_string(), "config.txt:7: expected key = value");

        let err = ConfigError::missing_constant("TIME0");
        assert_eq!(err.to_string(), "missing constant: TIME0");
    }
}
