//! Scale factors for dimensionless quantities.
//!
//! Each quantity has one canonical scale factor. Dividing a physical value
//! by it gives the dimensionless value stored on disk.
//!
//! | Quantity                                                        | Constant |
//! |-----------------------------------------------------------------|----------|
//! | `coord`, `coord1..3`, `zhalf`, `xhalf`, `yhalf`, `gbxbounds`    | `COORD0` |
//! | `radius`                                                        | `R0`     |
//! | `msol`                                                          | `MASS0`  |
//! | `press`                                                         | `P0`     |
//! | `temp`                                                          | `TEMP0`  |
//! | `wvel`, `uvel`, `vvel`                                          | `W0`     |
//! | `time`                                                          | `TIME0`  |
//! | `rho`                                                           | `RHO0`   |
//! | `xi`, `sdgbxindex`, `gbxindex`, `ndims`, `qvap`, `qcond`        | 1        |
//!
//! Any other name is looked up directly as a constant.

use crate::constants::Constants;
use crate::error::{ConfigError, Result};

const DIMENSIONLESS: &[&str] = &["xi", "sdgbxindex", "gbxindex", "ndims", "qvap", "qcond"];

/// Constant scaling `quantity`, or `None` if the quantity is dimensionless
/// or not a known quantity.
#[must_use]
pub fn canonical_constant(quantity: &str) -> Option<&'static str> {
    match quantity {
        "coord" | "coord1" | "coord2" | "coord3" | "zhalf" | "xhalf" | "yhalf" | "gbxbounds" => {
            Some("COORD0")
        }
        "radius" => Some("R0"),
        "msol" => Some("MASS0"),
        "press" => Some("P0"),
        "temp" => Some("TEMP0"),
        "wvel" | "uvel" | "vvel" => Some("W0"),
        "time" => Some("TIME0"),
        "rho" => Some("RHO0"),
        _ => None,
    }
}

/// Units label conventionally attached to `quantity`; empty if dimensionless
/// or unknown.
#[must_use]
pub fn units_for(quantity: &str) -> &'static str {
    match canonical_constant(quantity) {
        Some("COORD0" | "R0") => "m",
        Some("MASS0") => "kg",
        Some("P0") => "Pa",
        Some("TEMP0") => "K",
        Some("W0") => "m/s",
        Some("TIME0") => "s",
        Some("RHO0") => "kg/m^3",
        _ => "",
    }
}

/// Scale factor converting physical values of `quantity` to dimensionless
/// ones.
///
/// Fails with `MissingConstant` when the required constant is absent and
/// with `InvalidConstant` when it is not finite and positive.
pub fn resolve_scale_factor(quantity: &str, constants: &Constants) -> Result<f64> {
    if DIMENSIONLESS.contains(&quantity) {
        return Ok(1.0);
    }
    let name = canonical_constant(quantity).unwrap_or(quantity);
    let value = constants.require(name)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidConstant {
            name: name.to_string(),
            value,
        });
    }
    Ok(value)
}
