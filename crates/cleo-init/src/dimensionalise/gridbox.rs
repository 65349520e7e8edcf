//! Gridbox boundaries.

use cleo_binary::{ArraySet, NamedArray};
use cleo_config::Constants;
use cleo_model::{Axis, DomainGeometry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Dimensionaliser, coord_scale, scaled_by};
use crate::error::{InitError, Result};

/// Relative tolerance for treating `(max - min) / delta` as a whole number.
const STEP_TOLERANCE: f64 = 1e-9;

/// Most cells a linear axis may have; gridbox indices are 32-bit.
const MAX_LINEAR_STEPS: f64 = u32::MAX as f64;

/// Boundaries along one axis \[m\].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSpec {
    /// Evenly spaced boundaries from `min` in steps of `delta`, up to the
    /// first boundary at or above `max`.
    Linear { min: f64, max: f64, delta: f64 },
    /// Boundaries given directly.
    Explicit(Vec<f64>),
}

impl AxisSpec {
    #[must_use]
    pub fn linear(min: f64, max: f64, delta: f64) -> Self {
        Self::Linear { min, max, delta }
    }

    /// Half-coordinates along `axis`.
    ///
    /// Bounds are checked for monotonicity when the geometry is built; here
    /// only the step parameters are validated.
    pub fn halfcoords(&self, axis: Axis) -> Result<Vec<f64>> {
        match self {
            Self::Explicit(bounds) => Ok(bounds.clone()),
            &Self::Linear { min, max, delta } => {
                if !(min.is_finite() && max.is_finite() && delta.is_finite()) || delta <= 0.0 {
                    return Err(InitError::invalid_geometry(
                        axis,
                        format!("invalid linear spacing [{min}, {max}, {delta}]"),
                    ));
                }
                let ratio = (max - min) / delta;
                if ratio < 0.0 {
                    return Err(InitError::invalid_geometry(
                        axis,
                        format!("maximum {max} is below minimum {min}"),
                    ));
                }
                let nsteps = if (ratio - ratio.round()).abs() <= STEP_TOLERANCE * ratio.max(1.0) {
                    ratio.round()
                } else {
                    ratio.ceil()
                };
                if nsteps > MAX_LINEAR_STEPS {
                    return Err(InitError::invalid_geometry(
                        axis,
                        format!("linear spacing [{min}, {max}, {delta}] gives {nsteps:e} cells"),
                    ));
                }
                // nsteps is a whole number in 0..=u32::MAX here
                let nsteps = nsteps as usize;
                Ok((0..=nsteps).map(|i| min + i as f64 * delta).collect())
            }
        }
    }
}

/// Boundaries of the domain along z, x and y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub z: AxisSpec,
    pub x: AxisSpec,
    pub y: AxisSpec,
}

impl GridSpec {
    #[must_use]
    pub fn new(z: AxisSpec, x: AxisSpec, y: AxisSpec) -> Self {
        Self { z, x, y }
    }

    /// Build the domain geometry, checking every axis has at least one cell
    /// with strictly increasing bounds.
    pub fn geometry(&self) -> Result<DomainGeometry> {
        let geometry = DomainGeometry::new(
            self.z.halfcoords(Axis::Z)?,
            self.x.halfcoords(Axis::X)?,
            self.y.halfcoords(Axis::Y)?,
        )?;
        Ok(geometry)
    }
}

/// Dimensionaliser for the gridbox boundaries file.
///
/// Produces `ndims` (`Q`), `zhalf`, `xhalf`, `yhalf` (`d`), `gbxindex` (`I`)
/// and `gbxbounds` (`d`, six values per gridbox).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridboxBoundaries {
    coord0: Option<f64>,
}

impl GridboxBoundaries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `coord0` as the coordinate scale instead of the constants.
    #[must_use]
    pub fn with_coord0(mut self, coord0: f64) -> Self {
        self.coord0 = Some(coord0);
        self
    }

    /// Arrays for an already built geometry.
    pub fn arrays(&self, geometry: &DomainGeometry, constants: &Constants) -> Result<ArraySet> {
        let coord0 = match self.coord0 {
            Some(c) => c,
            None => coord_scale(constants)?,
        };
        let ndims = geometry.ndims().map(|n| n as u64).to_vec();
        let ngridboxes = geometry.ngridboxes();
        let gbxindex = u32::try_from(ngridboxes)
            .map(|n| (0..n).collect::<Vec<u32>>())
            .map_err(|_| {
                InitError::index_assignment(format!(
                    "{ngridboxes} gridboxes exceed the 32-bit gridbox index"
                ))
            })?;
        let bounds: Vec<f64> = geometry
            .all_bounds()
            .iter()
            .flat_map(|b| b.to_array())
            .collect();

        let mut arrays = vec![NamedArray::uint64("ndims", ndims)];
        for axis in Axis::ALL {
            arrays.push(scaled_by(
                axis.halfcoord_name(),
                geometry.halfcoords(axis),
                coord0,
            ));
        }
        arrays.push(NamedArray::uint32("gbxindex", gbxindex));
        arrays.push(scaled_by("gbxbounds", &bounds, coord0));
        Ok(ArraySet::from_arrays(arrays)?)
    }
}

impl Dimensionaliser for GridboxBoundaries {
    type Input = GridSpec;
    type Context = ();

    fn kind(&self) -> &'static str {
        "gridbox boundaries"
    }

    fn build(&self, input: &GridSpec, _context: &(), constants: &Constants) -> Result<ArraySet> {
        let geometry = input.geometry()?;
        debug!(
            ndims = ?geometry.ndims(),
            ngridboxes = geometry.ngridboxes(),
            "built gridbox boundaries"
        );
        self.arrays(&geometry, constants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_cell() -> AxisSpec {
        AxisSpec::Explicit(vec![0.0, 1.0])
    }

    #[test]
    fn test_linear_halfcoords() {
        let h = AxisSpec::linear(0.0, 300.0, 100.0)
            .halfcoords(Axis::Z)
            .unwrap();
        assert_eq!(h, vec![0.0, 100.0, 200.0, 300.0]);

        // a partial step still closes the domain
        let h = AxisSpec::linear(0.0, 250.0, 100.0)
            .halfcoords(Axis::Z)
            .unwrap();
        assert_eq!(h, vec![0.0, 100.0, 200.0, 300.0]);

        // floating point noise does not add a boundary
        let h = AxisSpec::linear(0.0, 0.3, 0.1).halfcoords(Axis::X).unwrap();
        assert_eq!(h.len(), 4);
    }

    #[test]
    fn test_linear_rejects_bad_delta() {
        for delta in [0.0, -1.0, f64::NAN] {
            let err = AxisSpec::linear(0.0, 10.0, delta)
                .halfcoords(Axis::Y)
                .unwrap_err();
            assert!(matches!(err, InitError::InvalidGeometry { axis: Axis::Y, .. }));
        }
        assert!(AxisSpec::linear(10.0, 0.0, 1.0).halfcoords(Axis::Z).is_err());
    }

    #[test]
    fn test_linear_rejects_too_many_steps() {
        let err = AxisSpec::linear(0.0, 1e30, 1e-30)
            .halfcoords(Axis::Z)
            .unwrap_err();
        assert!(matches!(err, InitError::InvalidGeometry { axis: Axis::Z, .. }));

        let err = AxisSpec::linear(0.0, 5e9, 1.0).halfcoords(Axis::X).unwrap_err();
        assert!(matches!(err, InitError::InvalidGeometry { axis: Axis::X, .. }));
    }

    #[test]
    fn test_geometry_rejects_single_bound() {
        let grid = GridSpec::new(AxisSpec::Explicit(vec![0.0]), one_cell(), one_cell());
        assert!(matches!(
            grid.geometry().unwrap_err(),
            InitError::InvalidGeometry { axis: Axis::Z, .. }
        ));
    }

    #[test]
    fn test_geometry_rejects_non_monotonic() {
        let grid = GridSpec::new(one_cell(), AxisSpec::Explicit(vec![0.0, 2.0, 1.0]), one_cell());
        assert!(matches!(
            grid.geometry().unwrap_err(),
            InitError::InvalidGeometry { axis: Axis::X, .. }
        ));
    }

    #[test]
    fn test_build_arrays() {
        let grid = GridSpec::new(
            AxisSpec::Explicit(vec![0.0, 100.0, 200.0, 300.0]),
            AxisSpec::Explicit(vec![0.0, 100.0]),
            AxisSpec::Explicit(vec![0.0, 100.0]),
        );
        let arrays = GridboxBoundaries::new()
            .with_coord0(100.0)
            .build(&grid, &(), &Constants::new())
            .unwrap();

        let names: Vec<&str> = arrays.names().collect();
        assert_eq!(
            names,
            ["ndims", "zhalf", "xhalf", "yhalf", "gbxindex", "gbxbounds"]
        );
        let zhalf = arrays.get("zhalf").unwrap();
        assert_eq!(zhalf.values.as_float().unwrap(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(zhalf.units, "m");
        assert_eq!(
            arrays.get("ndims").unwrap().values.as_unsigned().unwrap(),
            &[3, 1, 1]
        );
        assert_eq!(
            arrays.get("gbxindex").unwrap().values.as_unsigned().unwrap(),
            &[0, 1, 2]
        );
        let bounds = arrays.get("gbxbounds").unwrap().values.as_float().unwrap();
        assert_eq!(bounds.len(), 18);
        assert_eq!(&bounds[6..12], &[1.0, 2.0, 0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_build_uses_constants_for_scale() {
        let grid = GridSpec::new(one_cell(), one_cell(), one_cell());
        let constants = Constants::new().with("TIME0", 4.0).with("W0", 0.5);
        let arrays = GridboxBoundaries::new()
            .build(&grid, &(), &constants)
            .unwrap();
        assert_eq!(arrays.get("xhalf").unwrap().scale_factor, 2.0);

        let err = GridboxBoundaries::new()
            .build(&grid, &(), &Constants::new())
            .unwrap_err();
        assert!(matches!(err, InitError::Config(_)));
    }
}
