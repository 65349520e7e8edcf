//! Human-readable setup files.
//!
//! Accepted syntax:
//!
//! ```text
//! # comment
//! COUPLTSTEP = 2            # key = value
//! T_END: 3600               # key: value
//! [domain]                  # section header, persists until the next one
//! nspacedims = 2
//! outputdata:               # indented block header
//!   setup_filename: "setup.txt"
//! ```
//!
//! Keys inside a section are stored both bare and as `section.key`.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// A typed setup value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ConfigValue {
    /// Infer the type of an unquoted value.
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(text) = unquote(raw) {
            return Self::Text(text.to_string());
        }
        if raw.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Self::Float(f);
        }
        Self::Text(raw.to_string())
    }

    /// Numeric value, if this is an integer or float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Non-negative integral value.
    #[must_use]
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Self::Integer(i) => usize::try_from(*i).ok(),
            Self::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= (1_u64 << 53) as f64 => {
                Some(*f as usize)
            }
            _ => None,
        }
    }

    /// Text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Key-value pairs read from a setup file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetupConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl SetupConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Read a setup file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::parse(&text, path)?;
        debug!(path = %path.display(), keys = config.len(), "loaded setup file");
        Ok(config)
    }

    /// Parse setup text. `path` is used only for error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut values = BTreeMap::new();
        let mut section: Option<Section> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let content = strip_comment(raw);
            let trimmed = content.trim();
            if trimmed.is_empty() {
                continue;
            }
            let indent = content.len() - content.trim_start().len();

            if let Some(name) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                let name = name.trim();
                if !is_key(name) {
                    return Err(ConfigError::parse(
                        path,
                        line_no,
                        format!("invalid section name {name:?}"),
                    ));
                }
                section = Some(Section {
                    name: name.to_string(),
                    indent: None,
                });
                continue;
            }

            // Indented blocks end at the first line not indented past the header.
            if let Some(Section {
                indent: Some(header_indent),
                ..
            }) = section
                && indent <= header_indent
            {
                section = None;
            }

            let Some((key, value)) = split_pair(trimmed) else {
                return Err(ConfigError::parse(
                    path,
                    line_no,
                    format!("expected `key = value` or `key: value`, found {trimmed:?}"),
                ));
            };
            if !is_key(key) {
                return Err(ConfigError::parse(
                    path,
                    line_no,
                    format!("invalid key {key:?}"),
                ));
            }

            if value.is_empty() && trimmed.ends_with(':') {
                section = Some(Section {
                    name: key.to_string(),
                    indent: Some(indent),
                });
                continue;
            }

            let value = ConfigValue::infer(value);
            if let Some(section) = &section {
                values.insert(format!("{}.{key}", section.name), value.clone());
            }
            values.insert(key.to_string(), value);
        }

        Ok(Self { values })
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// First value present among `keys`, with the key that matched.
    #[must_use]
    pub fn get_any<'a>(&self, keys: &[&'a str]) -> Option<(&'a str, &ConfigValue)> {
        keys.iter()
            .find_map(|&k| self.values.get(k).map(|v| (k, v)))
    }

    /// Numeric value, failing if missing or not a number.
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        let value = self.get(key).ok_or_else(|| ConfigError::missing_key(key))?;
        value.as_f64().ok_or_else(|| invalid(key, value, "number"))
    }

    /// Non-negative integer value, failing if missing or not a count.
    pub fn get_usize(&self, key: &str) -> Result<usize> {
        let value = self.get(key).ok_or_else(|| ConfigError::missing_key(key))?;
        value.as_usize().ok_or_else(|| invalid(key, value, "count"))
    }

    /// Text value, failing if missing or not text.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        let value = self.get(key).ok_or_else(|| ConfigError::missing_key(key))?;
        value.as_str().ok_or_else(|| invalid(key, value, "string"))
    }

    /// Boolean value, failing if missing or not a boolean.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get(key).ok_or_else(|| ConfigError::missing_key(key))?;
        value.as_bool().ok_or_else(|| invalid(key, value, "boolean"))
    }

    /// Iterate over keys and values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing was read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

struct Section {
    name: String,
    /// Indentation of a `name:` header; `None` for `[name]` headers.
    indent: Option<usize>,
}

pub(crate) fn invalid(key: &str, value: &ConfigValue, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    Some((line[..pos].trim(), line[pos + 1..].trim()))
}

fn is_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn unquote(raw: &str) -> Option<&str> {
    ['"', '\'']
        .into_iter()
        .find_map(|q| raw.strip_prefix(q)?.strip_suffix(q))
}

/// Drop a `#` comment that is not inside quotes.
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '#') => return &line[..i],
            _ => {}
        }
    }
    line
}
