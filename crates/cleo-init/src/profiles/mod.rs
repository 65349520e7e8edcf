//! Thermodynamic and wind profile generators.
//!
//! A [`ThermoProfile`] gives pressure, temperature, vapour and condensate
//! on gridbox centres; a [`WindProfile`] gives wind components on gridbox
//! faces. Both describe one snapshot; [`generate_thermodynamics`] repeats it
//! for every coupling step.

mod psychrometrics;
mod thermogen;
mod windsgen;

pub use psychrometrics::{
    Humidity, HumidityProfile, SATURATION_TEMP_RANGE, potential_temperature, relative_humidity,
    relh_to_qvap, saturation_pressure, sratio_to_qvap,
};
pub use thermogen::{
    ConstUniformThermo, HydrostaticAdiabat, HydrostaticLapseRates, MoistLayer, VapourLapse,
};
pub use windsgen::{ConstUniformWinds, DensityProfile, SinusoidalUpdraught, Simple2DFlowField};

use cleo_config::Constants;
use cleo_model::{Axis, DomainGeometry, ThermoVariable, ThermodynamicFieldSet};
use tracing::debug;

use crate::error::Result;
use crate::shape::validate_shape;

/// One snapshot of the cell-centred fields, one value per gridbox.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CentreFields {
    pub press: Vec<f64>,
    pub temp: Vec<f64>,
    pub qvap: Vec<f64>,
    pub qcond: Vec<f64>,
}

/// One snapshot of the wind components, one value per face.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceWinds {
    pub wvel: Option<Vec<f64>>,
    pub uvel: Option<Vec<f64>>,
    pub vvel: Option<Vec<f64>>,
}

impl FaceWinds {
    /// Component normal to `axis`.
    #[must_use]
    pub fn component(&self, axis: Axis) -> Option<&[f64]> {
        match axis {
            Axis::Z => self.wvel.as_deref(),
            Axis::X => self.uvel.as_deref(),
            Axis::Y => self.vvel.as_deref(),
        }
    }
}

/// Cell-centred thermodynamics.
pub trait ThermoProfile {
    fn centre_fields(&self, geometry: &DomainGeometry, constants: &Constants) -> Result<CentreFields>;
}

/// Face-centred winds.
pub trait WindProfile {
    /// Winds for `geometry`; `centres` holds the fields the winds may depend
    /// on.
    fn face_winds(
        &self,
        geometry: &DomainGeometry,
        centres: &CentreFields,
        constants: &Constants,
    ) -> Result<FaceWinds>;
}

/// Evaluate `thermo` and `winds` on `geometry` and repeat the snapshot for
/// `ntimesteps` coupling steps.
pub fn generate_thermodynamics(
    geometry: &DomainGeometry,
    ntimesteps: usize,
    thermo: &dyn ThermoProfile,
    winds: Option<&dyn WindProfile>,
    constants: &Constants,
) -> Result<ThermodynamicFieldSet> {
    let centres = thermo.centre_fields(geometry, constants)?;
    validate_shape(
        [
            ("press", centres.press.len()),
            ("temp", centres.temp.len()),
            ("qvap", centres.qvap.len()),
            ("qcond", centres.qcond.len()),
        ],
        geometry.ngridboxes(),
    )?;
    let faces = match winds {
        Some(w) => w.face_winds(geometry, &centres, constants)?,
        None => FaceWinds::default(),
    };
    for axis in Axis::ALL {
        if let Some(values) = faces.component(axis) {
            validate_shape(
                [(ThermoVariable::wind(axis).as_str(), values.len())],
                geometry.nfaces(axis),
            )?;
        }
    }

    let tile = |values: &[f64]| values.repeat(ntimesteps);
    let mut fields = ThermodynamicFieldSet {
        ntimesteps,
        press: tile(&centres.press),
        temp: tile(&centres.temp),
        qvap: tile(&centres.qvap),
        qcond: tile(&centres.qcond),
        ..Default::default()
    };
    for axis in Axis::ALL {
        if let Some(values) = faces.component(axis) {
            fields.set_field(ThermoVariable::wind(axis), tile(values));
        }
    }
    debug!(
        ngridboxes = geometry.ngridboxes(),
        ntimesteps,
        winds = fields.fields().count() - ThermoVariable::SCALARS.len(),
        "generated thermodynamics"
    );
    Ok(fields)
}
