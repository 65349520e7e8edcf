//! Physical and characteristic constants.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// C++ keywords accepted in front of a constant name.
const TYPE_QUALIFIERS: &[&str] = &["const", "constexpr", "static", "inline"];

/// C++ type names whose assignments are read as constants.
const TYPE_NAMES: &[&str] = &[
    "double", "float", "int", "unsigned", "long", "size_t", "uint32_t", "uint64_t", "int32_t",
    "int64_t",
];

/// Named constants (SI units unless the name says otherwise).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constants {
    values: BTreeMap<String, f64>,
}

impl Constants {
    /// Create an empty set of constants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constants of the CLEO model with their derived scales.
    #[must_use]
    pub fn cleo_defaults() -> Self {
        Self::new()
            .with("G", 9.80665)
            .with("RGAS_UNIV", 8.314462618)
            .with("MR_WATER", 0.01801528)
            .with("MR_DRY", 0.028966216)
            .with("LATENT_V", 2_500_930.0)
            .with("CP_DRY", 1004.64)
            .with("CP_V", 1865.01)
            .with("C_L", 4192.664)
            .with("RHO_DRY", 1.177)
            .with("RHO_L", 1000.0)
            .with("RHO_SOL", 2077.0)
            .with("MR_SOL", 0.058443)
            .with("IONIC", 2.0)
            .with("W0", 1.0)
            .with("TIME0", 1000.0)
            .with("R0", 1e-6)
            .with("P0", 100_000.0)
            .with("TEMP0", 273.15)
            .with_derived()
    }

    /// Add or replace a constant.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a constant.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Look up a constant.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Look up a constant, failing with `MissingConstant`.
    pub fn require(&self, name: &str) -> Result<f64> {
        self.get(name)
            .ok_or_else(|| ConfigError::missing_constant(name))
    }

    /// True when the constant is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate over constants in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Number of constants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no constants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Add derived constants whose inputs are present.
    ///
    /// Existing values are never overwritten.
    #[must_use]
    pub fn with_derived(mut self) -> Self {
        self.derive();
        self
    }

    /// Add derived constants whose inputs are present.
    pub fn derive(&mut self) {
        self.derive_from("COORD0", &["TIME0", "W0"], |v| v[0] * v[1]);
        self.derive_from("RGAS_DRY", &["RGAS_UNIV", "MR_DRY"], |v| v[0] / v[1]);
        self.derive_from("RGAS_V", &["RGAS_UNIV", "MR_WATER"], |v| v[0] / v[1]);
        self.derive_from("CP0", &["CP_DRY"], |v| v[0]);
        self.derive_from("Mr_ratio", &["MR_WATER", "MR_DRY"], |v| v[0] / v[1]);
        self.derive_from("RHO0", &["P0", "CP0", "TEMP0"], |v| v[0] / (v[1] * v[2]));
        self.derive_from("MASS0", &["R0", "RHO0"], |v| v[0].powi(3) * v[1]);
        self.derive_from("VOL0", &["COORD0"], |v| v[0].powi(3));
    }

    fn derive_from(&mut self, name: &str, inputs: &[&str], f: impl Fn(&[f64]) -> f64) {
        if self.contains(name) {
            return;
        }
        let values: Option<Vec<f64>> = inputs.iter().map(|i| self.get(i)).collect();
        if let Some(values) = values {
            self.insert(name, f(&values));
        }
    }

    /// Read constants from a C++ header file and add derived constants.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let constants = Self::parse(&text, path)?;
        debug!(
            path = %path.display(),
            count = constants.len(),
            "loaded constants"
        );
        Ok(constants)
    }

    /// Parse constants from C++ header text and add derived constants.
    ///
    /// Lines of the form `[const|constexpr] <type> NAME = VALUE;` with a
    /// numeric literal value are read. Assignments whose value is an
    /// expression are skipped. `path` is used only for error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut constants = Self::new();
        for (index, raw) in text.lines().enumerate() {
            if let Some((name, value)) = parse_assignment(raw, path, index + 1)? {
                constants.insert(name, value);
            }
        }
        constants.derive();
        Ok(constants)
    }
}

/// Parse one header line. Returns `None` for lines that are not typed
/// numeric-literal assignments.
fn parse_assignment(raw: &str, path: &Path, line: usize) -> Result<Option<(String, f64)>> {
    let code = strip_cxx_comment(raw).trim();
    let Some((lhs, rhs)) = code.split_once('=') else {
        return Ok(None);
    };
    let Some((value, _)) = rhs.split_once(';') else {
        return Ok(None);
    };

    let tokens: Vec<&str> = lhs.split_whitespace().collect();
    let Some((name, type_tokens)) = tokens.split_last() else {
        return Ok(None);
    };
    let is_typed = type_tokens.iter().any(|t| TYPE_NAMES.contains(t))
        && type_tokens
            .iter()
            .all(|t| TYPE_NAMES.contains(t) || TYPE_QUALIFIERS.contains(t));
    if !is_typed {
        return Ok(None);
    }
    if !is_identifier(name) {
        return Err(ConfigError::parse(
            path,
            line,
            format!("invalid constant name {name:?}"),
        ));
    }

    Ok(value
        .trim()
        .parse::<f64>()
        .ok()
        .map(|v| ((*name).to_string(), v)))
}

fn strip_cxx_comment(line: &str) -> &str {
    let end = [line.find("//"), line.find("/*")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..end]
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
