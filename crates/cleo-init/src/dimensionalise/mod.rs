//! Conversion of physical inputs into dimensionless named arrays.
//!
//! Each kind of initial-condition file has one [`Dimensionaliser`]:
//!
//! - [`GridboxBoundaries`]: half-coordinates and per-gridbox bounds
//! - [`SuperdropletAttributes`]: superdroplet attribute lists
//! - [`Thermodynamics`]: thermodynamic fields on centres and faces
//!
//! Every build validates its inputs completely before any array is
//! produced, so a returned [`ArraySet`] can be written as is.

mod gridbox;
mod superdrops;
mod thermo;

pub use gridbox::{AxisSpec, GridSpec, GridboxBoundaries};
pub use superdrops::SuperdropletAttributes;
pub(crate) use superdrops::check_assignment;
pub use thermo::{ThermoContext, Thermodynamics};

use cleo_binary::{ArraySet, NamedArray};
use cleo_config::{ConfigError, Constants, resolve_scale_factor, units_for};

use crate::error::Result;

/// Builds the arrays of one initial-condition file from physical inputs.
pub trait Dimensionaliser {
    /// Physical values to convert.
    type Input: ?Sized;
    /// Geometry or counts the input is checked against.
    type Context;

    /// Short name used in log events.
    fn kind(&self) -> &'static str;

    /// Validate `input` against `context` and return dimensionless arrays
    /// scaled by factors resolved from `constants`.
    fn build(
        &self,
        input: &Self::Input,
        context: &Self::Context,
        constants: &Constants,
    ) -> Result<ArraySet>;
}

/// A `d` array for `quantity`, scaled by its canonical factor and labelled
/// with its conventional units.
pub(crate) fn scaled(quantity: &str, physical: &[f64], constants: &Constants) -> Result<NamedArray> {
    let scale_factor = resolve_scale_factor(quantity, constants)?;
    Ok(scaled_by(quantity, physical, scale_factor))
}

pub(crate) fn scaled_by(quantity: &str, physical: &[f64], scale_factor: f64) -> NamedArray {
    NamedArray::from_physical(quantity, physical, scale_factor).with_units(units_for(quantity))
}

/// Coordinate scale `COORD0`, computed as `TIME0 * W0` when not given.
pub fn coord_scale(constants: &Constants) -> Result<f64> {
    if constants.contains("COORD0") {
        return Ok(resolve_scale_factor("coord", constants)?);
    }
    let coord0 = constants.require("TIME0")? * constants.require("W0")?;
    if !coord0.is_finite() || coord0 <= 0.0 {
        return Err(ConfigError::InvalidConstant {
            name: "COORD0".to_string(),
            value: coord0,
        }
        .into());
    }
    Ok(coord0)
}
