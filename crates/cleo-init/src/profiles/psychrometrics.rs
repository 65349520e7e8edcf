//! Moist air relations.
//!
//! Saturation vapour pressure over liquid water follows the Tetens form
//! fitted by Murray (1967), referenced to the triple point of water.

use serde::{Deserialize, Serialize};

use crate::error::{InitError, Result};

const A_CONST: f64 = 17.4146;
const B_CONST: f64 = 33.639;
/// Triple point temperature of water \[K\].
const TREF: f64 = 273.16;
/// Triple point pressure of water \[Pa\].
const PREF: f64 = 611.655;

/// Temperatures \[K\] over which the saturation pressure fit is used.
pub const SATURATION_TEMP_RANGE: [f64; 2] = [173.15, 373.15];

/// Saturation vapour pressure \[Pa\] over liquid water at `temp` \[K\].
///
/// Fails with `DomainRange` outside [`SATURATION_TEMP_RANGE`].
pub fn saturation_pressure(temp: f64) -> Result<f64> {
    let [min, max] = SATURATION_TEMP_RANGE;
    if !(min..=max).contains(&temp) {
        return Err(InitError::DomainRange {
            quantity: "temperature",
            value: temp,
            min,
            max,
        });
    }
    Ok(PREF * (A_CONST * (temp - TREF) / (temp - B_CONST)).exp())
}

/// Vapour mass mixing ratio from relative humidity `relh` \[%\].
pub fn relh_to_qvap(press: f64, temp: f64, relh: f64, mr_ratio: f64) -> Result<f64> {
    let vapour_press = saturation_pressure(temp)? * relh / 100.0;
    Ok(mr_ratio * vapour_press / (press - vapour_press))
}

/// Vapour mass mixing ratio from supersaturation ratio `sratio`
/// (vapour pressure over saturation pressure).
pub fn sratio_to_qvap(sratio: f64, press: f64, temp: f64, mr_ratio: f64) -> Result<f64> {
    let psat = saturation_pressure(temp)?;
    Ok(mr_ratio * sratio / (press / psat - 1.0))
}

/// Relative humidity (as a fraction) and supersaturation of air with
/// vapour mixing ratio `qvap`.
pub fn relative_humidity(press: f64, temp: f64, qvap: f64, mr_ratio: f64) -> Result<(f64, f64)> {
    let vapour_press = qvap * press / (mr_ratio + qvap);
    let psat = saturation_pressure(temp)?;
    let relh = vapour_press / psat;
    let qsat = mr_ratio * psat / (press - vapour_press);
    Ok((relh, qvap / qsat - 1.0))
}

/// Potential temperature \[K\] relative to `press_ref`.
#[must_use]
pub fn potential_temperature(press: f64, temp: f64, press_ref: f64, rgas: f64, cp: f64) -> f64 {
    temp * (press_ref / press).powf(rgas / cp)
}

/// How the water vapour content of air is specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "value", rename_all = "lowercase")]
pub enum Humidity {
    /// Vapour mass mixing ratio \[kg/kg\].
    Qvap(f64),
    /// Relative humidity \[%\].
    Relh(f64),
    /// Supersaturation ratio.
    Sratio(f64),
}

impl Humidity {
    /// Vapour mass mixing ratio at `press` \[Pa\] and `temp` \[K\].
    pub fn to_qvap(self, press: f64, temp: f64, mr_ratio: f64) -> Result<f64> {
        match self {
            Self::Qvap(q) => Ok(q),
            Self::Relh(relh) => relh_to_qvap(press, temp, relh, mr_ratio),
            Self::Sratio(sratio) => sratio_to_qvap(sratio, press, temp, mr_ratio),
        }
    }
}

/// Humidity below and above a cloud base height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityProfile {
    pub below: Humidity,
    pub above: Humidity,
    /// Cloud base height \[m\]; heights at or above it use `above`.
    pub zbase: f64,
}

impl HumidityProfile {
    /// The same humidity everywhere.
    #[must_use]
    pub fn uniform(humidity: Humidity) -> Self {
        Self {
            below: humidity,
            above: humidity,
            zbase: f64::INFINITY,
        }
    }

    #[must_use]
    pub fn with_cloud_base(below: Humidity, above: Humidity, zbase: f64) -> Self {
        Self {
            below,
            above,
            zbase,
        }
    }

    /// Humidity at height `z`.
    #[must_use]
    pub fn at(&self, z: f64) -> Humidity {
        if z < self.zbase { self.below } else { self.above }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MR_RATIO: f64 = 0.01801528 / 0.028966216;

    #[test]
    fn test_saturation_pressure_at_triple_point() {
        let psat = saturation_pressure(TREF).unwrap();
        assert!((psat - PREF).abs() < 1e-9);
        // about 2.34 kPa at 20 C
        let psat = saturation_pressure(293.15).unwrap();
        assert!((psat - 2339.0).abs() < 10.0, "psat = {psat}");
    }

    #[test]
    fn test_saturation_pressure_range() {
        for temp in [100.0, 400.0, f64::NAN] {
            let err = saturation_pressure(temp).unwrap_err();
            assert!(matches!(
                err,
                InitError::DomainRange {
                    quantity: "temperature",
                    ..
                }
            ));
        }
        assert!(saturation_pressure(173.15).is_ok());
        assert!(saturation_pressure(373.15).is_ok());
    }

    #[test]
    fn test_relh_round_trip() {
        let (press, temp) = (90_000.0, 285.0);
        let qvap = relh_to_qvap(press, temp, 80.0, MR_RATIO).unwrap();
        let (relh, supersat) = relative_humidity(press, temp, qvap, MR_RATIO).unwrap();
        assert!((relh - 0.8).abs() < 1e-12);
        assert!(supersat < 0.0);
    }

    #[test]
    fn test_saturated_air() {
        let (press, temp) = (100_000.0, 290.0);
        let from_relh = relh_to_qvap(press, temp, 100.0, MR_RATIO).unwrap();
        let from_sratio = sratio_to_qvap(1.0, press, temp, MR_RATIO).unwrap();
        assert!((from_relh / from_sratio - 1.0).abs() < 1e-12);
        let (_, supersat) = relative_humidity(press, temp, from_relh, MR_RATIO).unwrap();
        assert!(supersat.abs() < 1e-12);
    }

    #[test]
    fn test_humidity_profile() {
        let profile = HumidityProfile::with_cloud_base(Humidity::Qvap(0.01), Humidity::Qvap(0.005), 500.0);
        assert_eq!(profile.at(499.0), Humidity::Qvap(0.01));
        assert_eq!(profile.at(500.0), Humidity::Qvap(0.005));
        let uniform = HumidityProfile::uniform(Humidity::Relh(50.0));
        assert_eq!(uniform.at(1e9), Humidity::Relh(50.0));
    }

    #[test]
    fn test_potential_temperature_at_reference() {
        assert_eq!(potential_temperature(100_000.0, 300.0, 100_000.0, 287.0, 1004.0), 300.0);
    }
}
