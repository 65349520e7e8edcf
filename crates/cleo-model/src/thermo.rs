//! Thermodynamic fields on the gridbox mesh.
//!
//! Every field holds `ntimesteps` consecutive snapshots: element
//! `t * n + c` is location `c` at coupling step `t`, where `n` is the number
//! of gridboxes for scalars or the number of faces along the staggered axis
//! for a wind component.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Axis;

/// A thermodynamic variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermoVariable {
    Press,
    Temp,
    Qvap,
    Qcond,
    Wvel,
    Uvel,
    Vvel,
}

impl ThermoVariable {
    pub const ALL: [ThermoVariable; 7] = [
        Self::Press,
        Self::Temp,
        Self::Qvap,
        Self::Qcond,
        Self::Wvel,
        Self::Uvel,
        Self::Vvel,
    ];

    /// Cell-centred variables, always present.
    pub const SCALARS: [ThermoVariable; 4] = [Self::Press, Self::Temp, Self::Qvap, Self::Qcond];

    /// Face-centred wind components, optional.
    pub const WINDS: [ThermoVariable; 3] = [Self::Wvel, Self::Uvel, Self::Vvel];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Press => "press",
            Self::Temp => "temp",
            Self::Qvap => "qvap",
            Self::Qcond => "qcond",
            Self::Wvel => "wvel",
            Self::Uvel => "uvel",
            Self::Vvel => "vvel",
        }
    }

    /// Axis a wind component is staggered along; `None` for scalars.
    #[must_use]
    pub const fn staggered_axis(self) -> Option<Axis> {
        match self {
            Self::Wvel => Some(Axis::Z),
            Self::Uvel => Some(Axis::X),
            Self::Vvel => Some(Axis::Y),
            _ => None,
        }
    }

    /// Wind component along `axis`.
    #[must_use]
    pub const fn wind(axis: Axis) -> Self {
        match axis {
            Axis::Z => Self::Wvel,
            Axis::X => Self::Uvel,
            Axis::Y => Self::Vvel,
        }
    }
}

impl fmt::Display for ThermoVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected length of `variable` for a mesh of `ndims = [nz, nx, ny]`
/// cells over `ntimesteps` steps.
///
/// Winds get one extra face along their staggered axis.
#[must_use]
pub fn expected_field_len(variable: ThermoVariable, ndims: [usize; 3], ntimesteps: usize) -> usize {
    let mut n = ndims;
    if let Some(axis) = variable.staggered_axis() {
        n[axis.position()] += 1;
    }
    n.iter().product::<usize>() * ntimesteps
}

/// Physical thermodynamic fields \[Pa, K, kg/kg, kg/kg, m/s\].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThermodynamicFieldSet {
    pub ntimesteps: usize,
    pub press: Vec<f64>,
    pub temp: Vec<f64>,
    pub qvap: Vec<f64>,
    pub qcond: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wvel: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uvel: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vvel: Option<Vec<f64>>,
}

impl ThermodynamicFieldSet {
    /// Values of `variable`, or `None` for an absent wind component.
    #[must_use]
    pub fn field(&self, variable: ThermoVariable) -> Option<&[f64]> {
        match variable {
            ThermoVariable::Press => Some(&self.press),
            ThermoVariable::Temp => Some(&self.temp),
            ThermoVariable::Qvap => Some(&self.qvap),
            ThermoVariable::Qcond => Some(&self.qcond),
            ThermoVariable::Wvel => self.wvel.as_deref(),
            ThermoVariable::Uvel => self.uvel.as_deref(),
            ThermoVariable::Vvel => self.vvel.as_deref(),
        }
    }

    /// Replace the values of `variable`.
    pub fn set_field(&mut self, variable: ThermoVariable, values: Vec<f64>) {
        match variable {
            ThermoVariable::Press => self.press = values,
            ThermoVariable::Temp => self.temp = values,
            ThermoVariable::Qvap => self.qvap = values,
            ThermoVariable::Qcond => self.qcond = values,
            ThermoVariable::Wvel => self.wvel = Some(values),
            ThermoVariable::Uvel => self.uvel = Some(values),
            ThermoVariable::Vvel => self.vvel = Some(values),
        }
    }

    /// Present fields in [`ThermoVariable::ALL`] order.
    pub fn fields(&self) -> impl Iterator<Item = (ThermoVariable, &[f64])> {
        ThermoVariable::ALL
            .into_iter()
            .filter_map(|v| self.field(v).map(|f| (v, f)))
    }

    /// Snapshot of `variable` at coupling step `step`, given the number of
    /// locations per snapshot.
    #[must_use]
    pub fn snapshot(&self, variable: ThermoVariable, step: usize, per_step: usize) -> Option<&[f64]> {
        let start = step.checked_mul(per_step)?;
        self.field(variable)?.get(start..start.checked_add(per_step)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_lengths() {
        let ndims = [4, 3, 2];
        assert_eq!(expected_field_len(ThermoVariable::Press, ndims, 5), 24 * 5);
        assert_eq!(expected_field_len(ThermoVariable::Wvel, ndims, 5), 5 * 3 * 2 * 5);
        assert_eq!(expected_field_len(ThermoVariable::Uvel, ndims, 5), 4 * 4 * 2 * 5);
        assert_eq!(expected_field_len(ThermoVariable::Vvel, ndims, 5), 4 * 3 * 3 * 5);
    }

    #[test]
    fn test_fields_skip_absent_winds() {
        let mut set = ThermodynamicFieldSet {
            ntimesteps: 1,
            press: vec![1.0],
            temp: vec![2.0],
            qvap: vec![0.0],
            qcond: vec![0.0],
            ..Default::default()
        };
        set.set_field(ThermoVariable::Wvel, vec![0.5, 0.5]);
        let names: Vec<_> = set.fields().map(|(v, _)| v.as_str()).collect();
        assert_eq!(names, vec!["press", "temp", "qvap", "qcond", "wvel"]);
        assert!(set.field(ThermoVariable::Uvel).is_none());
    }

    #[test]
    fn test_snapshot() {
        let set = ThermodynamicFieldSet {
            ntimesteps: 2,
            press: vec![1.0, 2.0, 3.0, 4.0],
            ..Default::default()
        };
        assert_eq!(set.snapshot(ThermoVariable::Press, 1, 2), Some(&[3.0, 4.0][..]));
        assert_eq!(set.snapshot(ThermoVariable::Press, 2, 2), None);
    }

    #[test]
    fn test_serde_omits_absent_winds() {
        let set = ThermodynamicFieldSet {
            ntimesteps: 1,
            press: vec![1.0],
            temp: vec![273.15],
            qvap: vec![0.01],
            qcond: vec![0.0],
            ..Default::default()
        };
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.get("wvel").is_none());
        let back: ThermodynamicFieldSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }
}
