//! Face-centred wind profiles.

use std::f64::consts::PI;

use cleo_config::Constants;
use cleo_model::{Axis, DomainGeometry};

use super::thermogen::HydrostaticAdiabat;
use super::{CentreFields, FaceWinds, WindProfile};
use crate::error::{InitError, Result};

/// Uniform, constant wind components \[m/s\].
///
/// Components are nested: `uvel` is only used together with `wvel`, and
/// `vvel` only together with `uvel`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConstUniformWinds {
    pub wvel: Option<f64>,
    pub uvel: Option<f64>,
    pub vvel: Option<f64>,
}

impl ConstUniformWinds {
    #[must_use]
    pub fn new(wvel: Option<f64>, uvel: Option<f64>, vvel: Option<f64>) -> Self {
        Self { wvel, uvel, vvel }
    }

    fn winds(&self, geometry: &DomainGeometry) -> FaceWinds {
        let full = |axis: Axis, value: f64| vec![value; geometry.nfaces(axis)];
        let wvel = self.wvel.map(|w| full(Axis::Z, w));
        let uvel = self.uvel.filter(|_| wvel.is_some()).map(|u| full(Axis::X, u));
        let vvel = self.vvel.filter(|_| uvel.is_some()).map(|v| full(Axis::Y, v));
        FaceWinds { wvel, uvel, vvel }
    }
}

impl WindProfile for ConstUniformWinds {
    fn face_winds(
        &self,
        geometry: &DomainGeometry,
        _centres: &CentreFields,
        _constants: &Constants,
    ) -> Result<FaceWinds> {
        Ok(self.winds(geometry))
    }
}

/// Dry air density used to scale the 2-D flow field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DensityProfile {
    /// Uniform density taken from the first gridbox's thermodynamics.
    Uniform,
    /// Density of a hydrostatic adiabat evaluated on the faces.
    Adiabat(HydrostaticAdiabat),
}

/// Divergence-free flow in the (z, x) plane, constant in time, with optional
/// uniform `vvel` (Arabas et al. 2015, sect. 2.1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simple2DFlowField {
    /// Maximum vertical velocity \[m/s\].
    pub wmax: f64,
    /// Wavelength of the modulation along z \[m\].
    pub zlength: f64,
    /// Wavelength of the modulation along x \[m\].
    pub xlength: f64,
    pub vvel: Option<f64>,
    pub density: DensityProfile,
}

impl Simple2DFlowField {
    #[must_use]
    pub fn new(wmax: f64, zlength: f64, xlength: f64) -> Self {
        Self {
            wmax,
            zlength,
            xlength,
            vvel: None,
            density: DensityProfile::Uniform,
        }
    }

    #[must_use]
    pub fn with_vvel(mut self, vvel: f64) -> Self {
        self.vvel = Some(vvel);
        self
    }

    #[must_use]
    pub fn with_density(mut self, density: DensityProfile) -> Self {
        self.density = density;
        self
    }

    fn rhotilda(
        &self,
        heights: &[f64],
        centres: &CentreFields,
        constants: &Constants,
    ) -> Result<Vec<f64>> {
        match &self.density {
            DensityProfile::Uniform => {
                let (Some(&press), Some(&temp), Some(&qvap)) =
                    (centres.press.first(), centres.temp.first(), centres.qvap.first())
                else {
                    return Err(InitError::generator("flow field needs thermodynamics on at least one gridbox"));
                };
                let rgas_dry = constants.require("RGAS_DRY")?;
                let rgas_v = constants.require("RGAS_V")?;
                let rho0 = constants.require("RHO0")?;
                let rho_dry = press / (temp * (rgas_dry + qvap * rgas_v));
                Ok(vec![rho_dry / rho0; heights.len()])
            }
            DensityProfile::Adiabat(adiabat) => adiabat.rhotilda(heights, constants),
        }
    }
}

impl WindProfile for Simple2DFlowField {
    fn face_winds(
        &self,
        geometry: &DomainGeometry,
        centres: &CentreFields,
        constants: &Constants,
    ) -> Result<FaceWinds> {
        let ztilda = self.zlength / PI;
        let xtilda = self.xlength / (2.0 * PI);
        let wamp = 2.0 * self.wmax;

        let zfaces = geometry.face_coords(Axis::Z);
        let rho_z = self.rhotilda(&zfaces.z, centres, constants)?;
        let wvel = zfaces
            .z
            .iter()
            .zip(&zfaces.x)
            .zip(rho_z)
            .map(|((&z, &x), rho)| wamp / rho * (z / ztilda).sin() * (x / xtilda).sin())
            .collect();

        let xfaces = geometry.face_coords(Axis::X);
        let rho_x = self.rhotilda(&xfaces.z, centres, constants)?;
        let uvel = xfaces
            .z
            .iter()
            .zip(&xfaces.x)
            .zip(rho_x)
            .map(|((&z, &x), rho)| {
                wamp / rho * xtilda / ztilda * (z / ztilda).cos() * (x / xtilda).cos()
            })
            .collect();

        let vvel = self.vvel.map(|v| vec![v; geometry.nfaces(Axis::Y)]);
        Ok(FaceWinds {
            wvel: Some(wvel),
            uvel: Some(uvel),
            vvel,
        })
    }
}

/// Vertical wind `wmax * sin(pi z / (2 wlength))`, clipped at zero, over
/// uniform horizontal winds. With `wlength <= 0` the vertical wind is the
/// constant `wmax`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinusoidalUpdraught {
    pub wmax: f64,
    pub uvel: Option<f64>,
    pub vvel: Option<f64>,
    /// Half wavelength of the updraught \[m\].
    pub wlength: f64,
}

impl WindProfile for SinusoidalUpdraught {
    fn face_winds(
        &self,
        geometry: &DomainGeometry,
        _centres: &CentreFields,
        _constants: &Constants,
    ) -> Result<FaceWinds> {
        let mut winds = ConstUniformWinds::new(Some(self.wmax), self.uvel, self.vvel).winds(geometry);
        if self.wlength > 0.0 {
            let wvel = geometry
                .face_coords(Axis::Z)
                .z
                .iter()
                .map(|&z| (self.wmax * (PI * z / (2.0 * self.wlength)).sin()).max(0.0))
                .collect();
            winds.wvel = Some(wvel);
        }
        Ok(winds)
    }
}
