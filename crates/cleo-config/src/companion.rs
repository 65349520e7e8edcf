//! Setup file and constants read together.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::Constants;
use crate::error::{ConfigError, Result};
use crate::scale::resolve_scale_factor;
use crate::setup::{ConfigValue, SetupConfig, invalid};

const NGRIDBOXES_KEYS: &[&str] = &["ngbxs", "ngridboxes"];
const NSUPERS_KEYS: &[&str] = &["totnsupers", "nsupers", "maxnsupers"];
const NSPACEDIMS_KEYS: &[&str] = &["nspacedims", "SDnspace"];

/// Counts recovered from a setup file. Absent keys are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulationCounts {
    pub ngridboxes: Option<usize>,
    pub nsuperdroplets: Option<usize>,
    pub ntimesteps: Option<usize>,
    pub nspacedims: Option<usize>,
}

/// A setup file together with the constants it is interpreted against.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanionConfig {
    pub setup: SetupConfig,
    pub constants: Constants,
}

impl CompanionConfig {
    /// Pair an already parsed setup with constants.
    #[must_use]
    pub fn new(setup: SetupConfig, constants: Constants) -> Self {
        Self { setup, constants }
    }

    /// Read the setup file and the constants header.
    pub fn load(setup_path: &Path, constants_path: &Path) -> Result<Self> {
        let setup = SetupConfig::load(setup_path)?;
        let constants = Constants::load(constants_path)?;
        let config = Self::new(setup, constants);
        info!(
            setup = %setup_path.display(),
            constants = %constants_path.display(),
            counts = ?config.counts(),
            "loaded companion configuration"
        );
        Ok(config)
    }

    /// Look up a setup value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.setup.get(key)
    }

    /// Scale factor for `quantity` under these constants.
    pub fn scale_factor(&self, quantity: &str) -> Result<f64> {
        resolve_scale_factor(quantity, &self.constants)
    }

    /// Number of gridboxes (`ngbxs` or `ngridboxes`).
    pub fn ngridboxes(&self) -> Result<usize> {
        self.count(NGRIDBOXES_KEYS)
    }

    /// Number of superdroplets (`totnsupers`, `nsupers` or `maxnsupers`).
    pub fn nsuperdroplets(&self) -> Result<usize> {
        self.count(NSUPERS_KEYS)
    }

    /// Number of spatial dimensions (`nspacedims` or `SDnspace`).
    pub fn nspacedims(&self) -> Result<usize> {
        self.count(NSPACEDIMS_KEYS)
    }

    /// Number of coupling timesteps.
    ///
    /// Taken from `ntimesteps` if present, otherwise
    /// `ceil(T_END / COUPLTSTEP) + 1`.
    pub fn ntimesteps(&self) -> Result<usize> {
        if let Some(value) = self.setup.get("ntimesteps") {
            return value
                .as_usize()
                .ok_or_else(|| invalid("ntimesteps", value, "count"));
        }
        let t_end = self.setup.get_f64("T_END")?;
        let coupltstep = self.setup.get_f64("COUPLTSTEP")?;
        ntimesteps_from(t_end, coupltstep)
    }

    /// All counts, with `None` for those that cannot be determined.
    #[must_use]
    pub fn counts(&self) -> SimulationCounts {
        SimulationCounts {
            ngridboxes: self.ngridboxes().ok(),
            nsuperdroplets: self.nsuperdroplets().ok(),
            ntimesteps: self.ntimesteps().ok(),
            nspacedims: self.nspacedims().ok(),
        }
    }

    fn count(&self, keys: &[&str]) -> Result<usize> {
        let (key, value) = self
            .setup
            .get_any(keys)
            .ok_or_else(|| ConfigError::missing_key(keys.join("|")))?;
        value.as_usize().ok_or_else(|| invalid(key, value, "count"))
    }
}

/// `ceil(t_end / coupltstep) + 1` coupling timesteps.
pub fn ntimesteps_from(t_end: f64, coupltstep: f64) -> Result<usize> {
    if !(coupltstep.is_finite() && coupltstep > 0.0) {
        return Err(ConfigError::InvalidValue {
            key: "COUPLTSTEP".to_string(),
            value: coupltstep.to_string(),
            expected: "positive number",
        });
    }
    if !(t_end.is_finite() && t_end >= 0.0) {
        return Err(ConfigError::InvalidValue {
            key: "T_END".to_string(),
            value: t_end.to_string(),
            expected: "non-negative number",
        });
    }
    Ok((t_end / coupltstep).ceil() as usize + 1)
}
