//! Cell-centred thermodynamic profiles.

use cleo_config::Constants;
use cleo_model::DomainGeometry;

use super::psychrometrics::{Humidity, HumidityProfile, sratio_to_qvap};
use super::{CentreFields, ThermoProfile};
use crate::error::{InitError, Result};

/// 1000 hPa, the reference pressure of potential temperature \[Pa\].
const P1000: f64 = 100_000.0;

/// Pressure, temperature and condensate uniform in space and time, with
/// vapour uniform or switching at a cloud base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstUniformThermo {
    /// \[Pa\]
    pub press: f64,
    /// \[K\]
    pub temp: f64,
    pub humidity: HumidityProfile,
    /// \[kg/kg\]
    pub qcond: f64,
}

impl ConstUniformThermo {
    #[must_use]
    pub fn new(press: f64, temp: f64, humidity: Humidity, qcond: f64) -> Self {
        Self {
            press,
            temp,
            humidity: HumidityProfile::uniform(humidity),
            qcond,
        }
    }

    #[must_use]
    pub fn with_humidity_profile(mut self, humidity: HumidityProfile) -> Self {
        self.humidity = humidity;
        self
    }
}

impl ThermoProfile for ConstUniformThermo {
    fn centre_fields(&self, geometry: &DomainGeometry, constants: &Constants) -> Result<CentreFields> {
        let n = geometry.ngridboxes();
        let below = self.humidity.below;
        let above = self.humidity.above;
        let needs_ratio = [below, above]
            .iter()
            .any(|h| !matches!(h, Humidity::Qvap(_)));
        let mr_ratio = if needs_ratio {
            constants.require("Mr_ratio")?
        } else {
            0.0
        };
        let qvap_below = below.to_qvap(self.press, self.temp, mr_ratio)?;
        let qvap_above = above.to_qvap(self.press, self.temp, mr_ratio)?;
        let qvap = geometry
            .centres()
            .z
            .iter()
            .map(|&z| {
                if z < self.humidity.zbase {
                    qvap_below
                } else {
                    qvap_above
                }
            })
            .collect();
        Ok(CentreFields {
            press: vec![self.press; n],
            temp: vec![self.temp; n],
            qvap,
            qcond: vec![self.qcond; n],
        })
    }
}

/// Region `[z1, z2) x [x1, x2)` \[m\] with supersaturation ratio `sratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoistLayer {
    pub z: [f64; 2],
    pub x: [f64; 2],
    pub sratio: f64,
}

impl MoistLayer {
    fn contains(&self, z: f64, x: f64) -> bool {
        self.z[0] <= z && z < self.z[1] && self.x[0] <= x && x < self.x[1]
    }
}

/// Hydrostatic profile following a dry adiabat, corrected for the mass of
/// water vapour near the surface (Arabas et al. 2015, sect. 2.1).
///
/// Needs the constants `G`, `CP_DRY`, `RGAS_DRY`, `RGAS_V` and `Mr_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydrostaticAdiabat {
    /// Pressure at z = 0 \[Pa\].
    pub press_z0: f64,
    /// Dry potential temperature \[K\].
    pub theta: f64,
    pub humidity: HumidityProfile,
    pub qcond: f64,
    pub moist_layer: Option<MoistLayer>,
}

/// Constants of one evaluated adiabat.
#[derive(Debug, Clone, Copy)]
struct AdiabatParams {
    theta: f64,
    gravity: f64,
    rc_dry: f64,
    rconst: f64,
    rgas_dry: f64,
    rgas_v: f64,
    qvap_z0: f64,
    aconst: f64,
    rho_const: f64,
    /// `rho(z=0) ^ (RC_DRY / (1 - RC_DRY))`
    rho_prof_z0: f64,
}

impl AdiabatParams {
    /// Density profile term, linear in height; must stay positive.
    fn rho_profile(&self, z: f64) -> Result<f64> {
        let prof = self.rho_prof_z0 + self.rho_const * z;
        if prof > 0.0 && prof.is_finite() {
            Ok(prof)
        } else {
            Err(InitError::DomainRange {
                quantity: "height",
                value: z,
                min: f64::NEG_INFINITY,
                max: -self.rho_prof_z0 / self.rho_const,
            })
        }
    }

    fn press_temp(&self, z: f64) -> Result<(f64, f64)> {
        let prof = self.rho_profile(z)?;
        let press = self.aconst * prof.powf(1.0 / self.rc_dry);
        let temp_const = (self.aconst / (self.rconst * P1000)).powf(self.rc_dry);
        Ok((press, self.theta * temp_const * prof))
    }

    fn rhotilda(&self, z: f64, rho0: f64) -> Result<f64> {
        let (press, temp) = self.press_temp(z)?;
        let rho_dry = press / ((self.rgas_dry + self.qvap_z0 * self.rgas_v) * temp);
        Ok(rho_dry / rho0)
    }
}

impl HydrostaticAdiabat {
    #[must_use]
    pub fn new(press_z0: f64, theta: f64, humidity: HumidityProfile, qcond: f64) -> Self {
        Self {
            press_z0,
            theta,
            humidity,
            qcond,
            moist_layer: None,
        }
    }

    #[must_use]
    pub fn with_moist_layer(mut self, layer: MoistLayer) -> Self {
        self.moist_layer = Some(layer);
        self
    }

    fn params(&self, constants: &Constants) -> Result<AdiabatParams> {
        let gravity = constants.require("G")?;
        let cp_dry = constants.require("CP_DRY")?;
        let rgas_dry = constants.require("RGAS_DRY")?;
        let rgas_v = constants.require("RGAS_V")?;
        let mr_ratio = constants.require("Mr_ratio")?;

        let qvap_z0 = self
            .humidity
            .below
            .to_qvap(self.press_z0, self.theta, mr_ratio)?;
        let rc_dry = rgas_dry / cp_dry;
        let rconst = 1.0 + qvap_z0 * rgas_v / rgas_dry;

        let temp_z0 = self.theta * (self.press_z0 / (rconst * P1000)).powf(rc_dry);
        let rho_z0 = (1.0 + qvap_z0) / rconst / rgas_dry * self.press_z0 / temp_z0;

        let pow = 1.0 / rc_dry - 1.0;
        let aa = self.theta * rgas_dry / ((1.0 + qvap_z0) * P1000.powf(rc_dry));
        let aconst = rconst * aa.powf(1.0 / (1.0 - rc_dry));
        Ok(AdiabatParams {
            theta: self.theta,
            gravity,
            rc_dry,
            rconst,
            rgas_dry,
            rgas_v,
            qvap_z0,
            aconst,
            rho_const: -gravity * rc_dry / aconst,
            rho_prof_z0: rho_z0.powf(1.0 / pow),
        })
    }

    /// Pressure \[Pa\] and temperature \[K\] at height `z` \[m\].
    pub fn press_temp(&self, z: f64, constants: &Constants) -> Result<(f64, f64)> {
        self.params(constants)?.press_temp(z)
    }

    /// Dry air density at each height, relative to the density scale
    /// `RHO0`.
    pub fn rhotilda(&self, heights: &[f64], constants: &Constants) -> Result<Vec<f64>> {
        let params = self.params(constants)?;
        let rho0 = constants.require("RHO0")?;
        heights.iter().map(|&z| params.rhotilda(z, rho0)).collect()
    }

    /// Acceleration due to gravity used by the profile \[m/s^2\].
    pub fn gravity(&self, constants: &Constants) -> Result<f64> {
        Ok(self.params(constants)?.gravity)
    }
}

impl ThermoProfile for HydrostaticAdiabat {
    fn centre_fields(&self, geometry: &DomainGeometry, constants: &Constants) -> Result<CentreFields> {
        let params = self.params(constants)?;
        let mr_ratio = constants.require("Mr_ratio")?;
        let centres = geometry.centres();
        let n = geometry.ngridboxes();

        let mut fields = CentreFields {
            press: Vec::with_capacity(n),
            temp: Vec::with_capacity(n),
            qvap: Vec::with_capacity(n),
            qcond: vec![self.qcond; n],
        };
        for (&z, &x) in centres.z.iter().zip(&centres.x) {
            let (press, temp) = params.press_temp(z)?;
            let qvap = match self.moist_layer {
                Some(layer) if layer.contains(z, x) => {
                    sratio_to_qvap(layer.sratio, press, temp, mr_ratio)?
                }
                _ => self.humidity.at(z).to_qvap(press, temp, mr_ratio)?,
            };
            fields.press.push(press);
            fields.temp.push(temp);
            fields.qvap.push(qvap);
        }
        Ok(fields)
    }
}

/// Supersaturation ratio of a layer held at saturation.
const SATURATED_SRATIO: f64 = 1.001;

/// How vapour changes with height in one layer of [`HydrostaticLapseRates`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VapourLapse {
    /// `-dqvap/dz` \[g/kg per km\].
    Rate(f64),
    /// Just above saturation at the local pressure and temperature.
    Saturated,
}

/// Hydrostatic profile with constant temperature and vapour lapse rates,
/// one pair below `zbase` and one above.
///
/// Pressure integrates `dp/dz = -g p / (R_dry T)` through the linear
/// temperature of each layer. Needs the constants `G` and `RGAS_DRY`, and
/// `Mr_ratio` for a saturated layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydrostaticLapseRates {
    /// Pressure at z = 0 \[Pa\].
    pub press_z0: f64,
    /// Temperature at z = 0 \[K\].
    pub temp_z0: f64,
    /// Vapour mass mixing ratio at z = 0 \[kg/kg\].
    pub qvap_z0: f64,
    /// \[m\]
    pub zbase: f64,
    /// `-dT/dz` below and above `zbase` \[K/km\].
    pub temp_lapses: [f64; 2],
    pub qvap_lapses: [VapourLapse; 2],
    pub qcond: f64,
}

/// Linear temperature layer starting at `z0`.
#[derive(Debug, Clone, Copy)]
struct LapseLayer {
    z0: f64,
    press0: f64,
    temp0: f64,
    /// \[K/m\]
    lapse: f64,
}

impl LapseLayer {
    fn temp(&self, z: f64) -> Result<f64> {
        let temp = self.temp0 - self.lapse * (z - self.z0);
        if temp > 0.0 && temp.is_finite() {
            Ok(temp)
        } else {
            Err(InitError::DomainRange {
                quantity: "temperature",
                value: temp,
                min: 0.0,
                max: f64::INFINITY,
            })
        }
    }

    /// `integral of dz / T` from the bottom of the layer to `z`.
    fn inverse_temp_integral(&self, z: f64) -> Result<f64> {
        let dz = z - self.z0;
        if self.lapse == 0.0 {
            return Ok(dz / self.temp0);
        }
        let temp = self.temp(z)?;
        Ok(-(temp / self.temp0).ln() / self.lapse)
    }

    fn press(&self, z: f64, g_over_r: f64) -> Result<f64> {
        Ok(self.press0 * (-g_over_r * self.inverse_temp_integral(z)?).exp())
    }
}

impl HydrostaticLapseRates {
    #[must_use]
    pub fn new(press_z0: f64, temp_z0: f64, qvap_z0: f64, zbase: f64) -> Self {
        Self {
            press_z0,
            temp_z0,
            qvap_z0,
            zbase,
            temp_lapses: [0.0; 2],
            qvap_lapses: [VapourLapse::Rate(0.0); 2],
            qcond: 0.0,
        }
    }

    /// Temperature lapse rates below and above `zbase` \[K/km\].
    #[must_use]
    pub fn with_temp_lapses(mut self, temp_lapses: [f64; 2]) -> Self {
        self.temp_lapses = temp_lapses;
        self
    }

    #[must_use]
    pub fn with_qvap_lapses(mut self, qvap_lapses: [VapourLapse; 2]) -> Self {
        self.qvap_lapses = qvap_lapses;
        self
    }

    #[must_use]
    pub fn with_qcond(mut self, qcond: f64) -> Self {
        self.qcond = qcond;
        self
    }

    fn layers(&self, g_over_r: f64) -> Result<[LapseLayer; 2]> {
        let lower = LapseLayer {
            z0: 0.0,
            press0: self.press_z0,
            temp0: self.temp_z0,
            lapse: self.temp_lapses[0] / 1000.0,
        };
        let upper = LapseLayer {
            z0: self.zbase,
            press0: lower.press(self.zbase, g_over_r)?,
            temp0: lower.temp(self.zbase)?,
            lapse: self.temp_lapses[1] / 1000.0,
        };
        Ok([lower, upper])
    }

    fn g_over_r(constants: &Constants) -> Result<f64> {
        Ok(constants.require("G")? / constants.require("RGAS_DRY")?)
    }

    /// Pressure \[Pa\] and temperature \[K\] at height `z` \[m\].
    pub fn press_temp(&self, z: f64, constants: &Constants) -> Result<(f64, f64)> {
        let g_over_r = Self::g_over_r(constants)?;
        let [lower, upper] = self.layers(g_over_r)?;
        let layer = if z < self.zbase { lower } else { upper };
        Ok((layer.press(z, g_over_r)?, layer.temp(z)?))
    }

    fn qvap(&self, z: f64, press: f64, temp: f64, constants: &Constants) -> Result<f64> {
        let (lapse, qvap_start, z_start) = if z < self.zbase {
            (self.qvap_lapses[0], self.qvap_z0, 0.0)
        } else {
            let (press_base, temp_base) = self.press_temp(self.zbase, constants)?;
            let below = self.below_base_qvap(press_base, temp_base, constants)?;
            (self.qvap_lapses[1], below, self.zbase)
        };
        let qvap = match lapse {
            VapourLapse::Rate(rate) => qvap_start - rate / 1e6 * (z - z_start),
            VapourLapse::Saturated => {
                sratio_to_qvap(SATURATED_SRATIO, press, temp, constants.require("Mr_ratio")?)?
            }
        };
        if qvap > 0.0 && qvap.is_finite() {
            Ok(qvap)
        } else {
            Err(InitError::DomainRange {
                quantity: "qvap",
                value: qvap,
                min: 0.0,
                max: f64::INFINITY,
            })
        }
    }

    /// Vapour at `zbase` following the lower layer.
    fn below_base_qvap(&self, press: f64, temp: f64, constants: &Constants) -> Result<f64> {
        match self.qvap_lapses[0] {
            VapourLapse::Rate(rate) => Ok(self.qvap_z0 - rate / 1e6 * self.zbase),
            VapourLapse::Saturated => {
                sratio_to_qvap(SATURATED_SRATIO, press, temp, constants.require("Mr_ratio")?)
            }
        }
    }
}

impl ThermoProfile for HydrostaticLapseRates {
    fn centre_fields(&self, geometry: &DomainGeometry, constants: &Constants) -> Result<CentreFields> {
        let n = geometry.ngridboxes();
        let mut fields = CentreFields {
            press: Vec::with_capacity(n),
            temp: Vec::with_capacity(n),
            qvap: Vec::with_capacity(n),
            qcond: vec![self.qcond; n],
        };
        for &z in &geometry.centres().z {
            let (press, temp) = self.press_temp(z, constants)?;
            fields.qvap.push(self.qvap(z, press, temp, constants)?);
            fields.press.push(press);
            fields.temp.push(temp);
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> DomainGeometry {
        DomainGeometry::new(vec![0.0, 500.0, 1000.0, 1500.0], vec![0.0, 100.0], vec![0.0, 100.0])
            .unwrap()
    }

    #[test]
    fn test_const_uniform_thermo() {
        let thermo = ConstUniformThermo::new(95_000.0, 290.0, Humidity::Qvap(0.012), 1e-4);
        let fields = thermo
            .centre_fields(&column(), &Constants::new())
            .unwrap();
        assert_eq!(fields.press, vec![95_000.0; 3]);
        assert_eq!(fields.qvap, vec![0.012; 3]);
        assert_eq!(fields.qcond, vec![1e-4; 3]);
    }

    #[test]
    fn test_const_thermo_cloud_base() {
        let humidity =
            HumidityProfile::with_cloud_base(Humidity::Relh(95.0), Humidity::Qvap(0.0), 1000.0);
        let thermo = ConstUniformThermo::new(95_000.0, 290.0, Humidity::Qvap(0.0), 0.0)
            .with_humidity_profile(humidity);
        let fields = thermo
            .centre_fields(&column(), &Constants::cleo_defaults())
            .unwrap();
        assert!(fields.qvap[0] > 0.0);
        assert_eq!(fields.qvap[0], fields.qvap[1]);
        assert_eq!(fields.qvap[2], 0.0);
    }

    #[test]
    fn test_relh_needs_molecular_mass_ratio() {
        let thermo = ConstUniformThermo::new(95_000.0, 290.0, Humidity::Relh(50.0), 0.0);
        let err = thermo
            .centre_fields(&column(), &Constants::new())
            .unwrap_err();
        assert!(matches!(err, InitError::Config(_)));
    }

    #[test]
    fn test_dry_adiabat_surface_and_lapse_rate() {
        let constants = Constants::cleo_defaults();
        let adiabat =
            HydrostaticAdiabat::new(P1000, 300.0, HumidityProfile::uniform(Humidity::Qvap(0.0)), 0.0);
        let (press0, temp0) = adiabat.press_temp(0.0, &constants).unwrap();
        assert!((press0 / P1000 - 1.0).abs() < 1e-9);
        assert!((temp0 - 300.0).abs() < 1e-9);

        // dry adiabatic lapse rate g / cp
        let (press1, temp1) = adiabat.press_temp(1000.0, &constants).unwrap();
        let lapse = 9.80665 / 1004.64 * 1000.0;
        assert!((temp0 - temp1 - lapse).abs() < 1e-6);
        assert!(press1 < press0);
    }

    #[test]
    fn test_moist_surface_pressure() {
        let constants = Constants::cleo_defaults();
        let adiabat = HydrostaticAdiabat::new(
            101_500.0,
            289.0,
            HumidityProfile::uniform(Humidity::Sratio(0.9)),
            0.0,
        );
        let (press0, _) = adiabat.press_temp(0.0, &constants).unwrap();
        assert!((press0 / 101_500.0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_adiabat_fields_and_moist_layer() {
        let constants = Constants::cleo_defaults();
        let layer = MoistLayer {
            z: [900.0, 1600.0],
            x: [0.0, 100.0],
            sratio: 1.0,
        };
        let adiabat = HydrostaticAdiabat::new(
            P1000,
            300.0,
            HumidityProfile::uniform(Humidity::Qvap(0.001)),
            0.0,
        )
        .with_moist_layer(layer);
        let fields = adiabat.centre_fields(&column(), &constants).unwrap();
        assert!(fields.press.windows(2).all(|w| w[1] < w[0]));
        assert!(fields.temp.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(fields.qvap[0], 0.001);
        assert!(fields.qvap[2] > 0.001);
    }

    #[test]
    fn test_adiabat_top_is_domain_range() {
        let constants = Constants::cleo_defaults();
        let adiabat =
            HydrostaticAdiabat::new(P1000, 300.0, HumidityProfile::uniform(Humidity::Qvap(0.0)), 0.0);
        let err = adiabat.press_temp(1e6, &constants).unwrap_err();
        assert!(matches!(err, InitError::DomainRange { quantity: "height", .. }));
    }

    #[test]
    fn test_rhotilda_decreases_with_height() {
        let constants = Constants::cleo_defaults();
        let adiabat =
            HydrostaticAdiabat::new(P1000, 300.0, HumidityProfile::uniform(Humidity::Qvap(0.0)), 0.0);
        let rho = adiabat.rhotilda(&[0.0, 1000.0], &constants).unwrap();
        assert!(rho[0] > rho[1]);
        assert!(adiabat.gravity(&constants).unwrap() > 9.8);
    }

    fn lapse_rates() -> HydrostaticLapseRates {
        HydrostaticLapseRates::new(101_500.0, 300.0, 0.015, 800.0)
            .with_temp_lapses([9.8, 6.5])
            .with_qvap_lapses([VapourLapse::Rate(2.0), VapourLapse::Rate(4.0)])
    }

    #[test]
    fn test_lapse_rates_surface_values() {
        let constants = Constants::cleo_defaults();
        let (press, temp) = lapse_rates().press_temp(0.0, &constants).unwrap();
        assert_eq!(press, 101_500.0);
        assert_eq!(temp, 300.0);
    }

    #[test]
    fn test_lapse_rates_isothermal_layer() {
        let constants = Constants::cleo_defaults();
        let g_over_r = constants.require("G").unwrap() / constants.require("RGAS_DRY").unwrap();
        let profile = HydrostaticLapseRates::new(P1000, 280.0, 0.01, 1e4);
        let (press, temp) = profile.press_temp(2000.0, &constants).unwrap();
        assert_eq!(temp, 280.0);
        let expected = P1000 * (-g_over_r * 2000.0 / 280.0).exp();
        assert!((press / expected - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lapse_rates_continuous_across_zbase() {
        let constants = Constants::cleo_defaults();
        let profile = lapse_rates();
        let (press_below, temp_below) = profile.press_temp(800.0 - 1e-6, &constants).unwrap();
        let (press_base, temp_base) = profile.press_temp(800.0, &constants).unwrap();
        assert!((press_below - press_base).abs() < 1e-3);
        assert!((temp_below - temp_base).abs() < 1e-6);
        assert!((temp_base - (300.0 - 9.8 * 0.8)).abs() < 1e-9);

        let (_, temp_above) = profile.press_temp(1800.0, &constants).unwrap();
        assert!((temp_above - (temp_base - 6.5)).abs() < 1e-9);
    }

    #[test]
    fn test_lapse_rates_fields_are_monotonic() {
        let constants = Constants::cleo_defaults();
        let geometry = DomainGeometry::new(
            (0..=20).map(|i| f64::from(i) * 100.0).collect(),
            vec![0.0, 100.0],
            vec![0.0, 100.0],
        )
        .unwrap();
        let fields = lapse_rates().centre_fields(&geometry, &constants).unwrap();
        assert_eq!(fields.press.len(), 20);
        assert!(fields.press.windows(2).all(|w| w[1] < w[0]));
        assert!(fields.temp.windows(2).all(|w| w[1] < w[0]));
        assert!(fields.qvap.windows(2).all(|w| w[1] < w[0]));
        // the vapour lapse rate steepens above the cloud base
        let below = fields.qvap[0] - fields.qvap[1];
        let above = fields.qvap[18] - fields.qvap[19];
        assert!((below - 2e-4).abs() < 1e-12);
        assert!((above - 4e-4).abs() < 1e-12);
    }

    #[test]
    fn test_lapse_rates_saturated_layer() {
        let constants = Constants::cleo_defaults();
        let profile = lapse_rates().with_qvap_lapses([VapourLapse::Rate(2.0), VapourLapse::Saturated]);
        let geometry = DomainGeometry::new(vec![0.0, 1000.0, 2000.0], vec![0.0, 1.0], vec![0.0, 1.0])
            .unwrap();
        let fields = profile.centre_fields(&geometry, &constants).unwrap();
        let mr_ratio = constants.require("Mr_ratio").unwrap();
        let saturated =
            sratio_to_qvap(SATURATED_SRATIO, fields.press[1], fields.temp[1], mr_ratio).unwrap();
        assert_eq!(fields.qvap[1], saturated);
        assert!((fields.qvap[0] - (0.015 - 2e-3 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_lapse_rates_reject_non_positive_values() {
        let constants = Constants::cleo_defaults();
        let profile = lapse_rates().with_temp_lapses([9.8, 100.0]);
        let err = profile.press_temp(5000.0, &constants).unwrap_err();
        assert!(matches!(err, InitError::DomainRange { quantity: "temperature", .. }));

        let geometry =
            DomainGeometry::new(vec![0.0, 20_000.0], vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        let profile = HydrostaticLapseRates::new(P1000, 300.0, 0.001, 1e6)
            .with_qvap_lapses([VapourLapse::Rate(1.0); 2]);
        let err = profile.centre_fields(&geometry, &constants).unwrap_err();
        assert!(matches!(err, InitError::DomainRange { quantity: "qvap", .. }));
    }
}
