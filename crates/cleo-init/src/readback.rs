//! Reading initial-condition files back into physical values.

use std::path::Path;

use cleo_binary::{ArraySet, BinaryError, NamedArray, read_binary};
use cleo_config::{Constants, resolve_scale_factor};
use cleo_model::{
    Axis, DomainGeometry, SuperdropletAttributeSet, ThermoVariable, ThermodynamicFieldSet,
};
use tracing::info;

use crate::dimensionalise::{ThermoContext, Thermodynamics, check_assignment};
use crate::error::{InitError, Result};
use crate::files::thermo_variable_path;
use crate::shape::{validate_consistent, validate_shape};

/// Relative tolerance when comparing scale factors.
const SCALE_TOLERANCE: f64 = 1e-12;

/// Relative tolerance when comparing stored gridbox bounds with the ones
/// the half-coordinates give.
const BOUNDS_TOLERANCE: f64 = 1e-9;

const BOUND_NAMES: [&str; 6] = ["zmin", "zmax", "xmin", "xmax", "ymin", "ymax"];

fn physical(arrays: &ArraySet, name: &str) -> Result<Vec<f64>> {
    Ok(arrays.require(name)?.redimensionalised())
}

fn unsigned<'a>(arrays: &'a ArraySet, name: &str) -> Result<&'a [u64]> {
    arrays.require(name)?.values.as_unsigned().ok_or_else(|| {
        BinaryError::format(format!("{name} must hold unsigned integers")).into()
    })
}

/// Check every array's scale factor against the one `constants` give for
/// its name.
pub fn check_scale_factors(arrays: &ArraySet, constants: &Constants) -> Result<()> {
    for array in arrays.iter() {
        let expected = resolve_scale_factor(&array.name, constants)?;
        let found = array.scale_factor;
        if (found - expected).abs() > SCALE_TOLERANCE * expected.abs() {
            return Err(InitError::ScaleFactor {
                name: array.name.clone(),
                found,
                expected,
            });
        }
    }
    Ok(())
}

/// Rebuild the domain geometry from gridbox boundary arrays.
///
/// The half-coordinates define the geometry; `ndims`, `gbxindex` and
/// `gbxbounds` must agree with it.
pub fn gridbox_geometry(arrays: &ArraySet) -> Result<DomainGeometry> {
    let [zhalf, xhalf, yhalf] = Axis::ALL.map(|axis| physical(arrays, axis.halfcoord_name()));
    let geometry = DomainGeometry::new(zhalf?, xhalf?, yhalf?)?;

    let ndims = unsigned(arrays, "ndims")?;
    validate_shape([("ndims", ndims.len())], 3)?;
    for (axis, (&stored, n)) in Axis::ALL.into_iter().zip(ndims.iter().zip(geometry.ndims())) {
        if stored != n as u64 {
            return Err(InitError::invalid_geometry(
                axis,
                format!("ndims gives {stored} cells, half coordinates give {n}"),
            ));
        }
    }

    let ngridboxes = geometry.ngridboxes();
    let gbxindex = unsigned(arrays, "gbxindex")?;
    validate_shape([("gbxindex", gbxindex.len())], ngridboxes)?;
    if let Some((i, &index)) = gbxindex
        .iter()
        .enumerate()
        .find(|&(i, &index)| index != i as u64)
    {
        return Err(InitError::index_assignment(format!(
            "gridbox {i} has index {index}"
        )));
    }
    let stored = physical(arrays, "gbxbounds")?;
    validate_shape([("gbxbounds", stored.len())], 6 * ngridboxes)?;
    let expected = geometry.all_bounds();
    for (i, (found, bounds)) in stored.chunks_exact(6).zip(&expected).enumerate() {
        for (j, (&found, want)) in found.iter().zip(bounds.to_array()).enumerate() {
            if (found - want).abs() > BOUNDS_TOLERANCE * want.abs().max(1.0) {
                return Err(InitError::invalid_geometry(
                    Axis::ALL[j / 2],
                    format!(
                        "gridbox {i} stores {} = {found}, half coordinates give {want}",
                        BOUND_NAMES[j]
                    ),
                ));
            }
        }
    }
    Ok(geometry)
}

/// Read a gridbox boundaries file.
pub fn read_gridbox_boundaries(path: &Path) -> Result<DomainGeometry> {
    let arrays = read_binary(path, None)?;
    let geometry = gridbox_geometry(&arrays)?;
    info!(
        path = %path.display(),
        ndims = ?geometry.ndims(),
        "read gridbox boundaries"
    );
    Ok(geometry)
}

/// Rebuild superdroplet attributes from their arrays.
///
/// Coordinates are optional; the ones present must lead in
/// `coord3, coord1, coord2` order.
pub fn superdroplet_attributes(arrays: &ArraySet) -> Result<SuperdropletAttributeSet> {
    let sdgbxindex = unsigned(arrays, "sdgbxindex")?
        .iter()
        .map(|&i| u32::try_from(i))
        .collect::<std::result::Result<Vec<u32>, _>>()
        .map_err(|_| InitError::index_assignment("sdgbxindex exceeds the 32-bit gridbox index"))?;
    let coord = |axis: Axis| {
        arrays
            .get(axis.coord_name())
            .map(NamedArray::redimensionalised)
            .unwrap_or_default()
    };
    let set = SuperdropletAttributeSet {
        sdgbxindex,
        xi: unsigned(arrays, "xi")?.to_vec(),
        radius: physical(arrays, "radius")?,
        msol: physical(arrays, "msol")?,
        coord3: coord(Axis::Z),
        coord1: coord(Axis::X),
        coord2: coord(Axis::Y),
    };
    validate_consistent(set.lengths())?;
    Ok(set)
}

/// Read an initial superdroplets file.
///
/// With a `geometry`, every droplet is checked against the gridbox it is
/// assigned to.
pub fn read_initial_superdrops(
    path: &Path,
    geometry: Option<&DomainGeometry>,
) -> Result<SuperdropletAttributeSet> {
    let arrays = read_binary(path, None)?;
    let set = superdroplet_attributes(&arrays)?;
    if let Some(geometry) = geometry {
        check_assignment(&set, geometry)?;
    }
    info!(
        path = %path.display(),
        nsupers = set.len(),
        nspacedims = set.nspacedims(),
        "read initial superdroplets"
    );
    Ok(set)
}

/// Read thermodynamics written next to `path`, one file per variable.
///
/// Scalar files must exist; a missing wind file means that component is
/// absent.
pub fn read_thermodynamics(path: &Path, context: &ThermoContext) -> Result<ThermodynamicFieldSet> {
    let mut fields = ThermodynamicFieldSet {
        ntimesteps: context.ntimesteps,
        ..Default::default()
    };
    for variable in ThermoVariable::ALL {
        let file = thermo_variable_path(path, variable);
        if variable.staggered_axis().is_some() && !file.exists() {
            continue;
        }
        let name = variable.as_str();
        let arrays = read_binary(&file, Some(&[name][..]))?;
        fields.set_field(variable, physical(&arrays, name)?);
    }
    Thermodynamics::new().validate(&fields, context)?;
    info!(
        path = %path.display(),
        nfields = fields.fields().count(),
        ntimesteps = context.ntimesteps,
        "read thermodynamics"
    );
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID_BOUNDS: [f64; 12] = [
        0.0, 100.0, 0.0, 10.0, 0.0, 10.0, 100.0, 200.0, 0.0, 10.0, 0.0, 10.0,
    ];

    fn grid_arrays() -> ArraySet {
        ArraySet::from_arrays(vec![
            NamedArray::uint64("ndims", vec![2, 1, 1]),
            NamedArray::from_physical("zhalf", &[0.0, 100.0, 200.0], 1000.0),
            NamedArray::from_physical("xhalf", &[0.0, 10.0], 1000.0),
            NamedArray::from_physical("yhalf", &[0.0, 10.0], 1000.0),
            NamedArray::uint32("gbxindex", vec![0, 1]),
            NamedArray::from_physical("gbxbounds", &GRID_BOUNDS, 1000.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_gridbox_geometry() {
        let geometry = gridbox_geometry(&grid_arrays()).unwrap();
        assert_eq!(geometry.ndims(), [2, 1, 1]);
        assert_eq!(geometry.ngridboxes(), 2);
    }

    #[test]
    fn test_gridbox_geometry_ndims_mismatch() {
        let mut arrays = grid_arrays();
        assert!(arrays.take("ndims").is_some());
        arrays.push(NamedArray::uint64("ndims", vec![3, 1, 1])).unwrap();
        let err = gridbox_geometry(&arrays).unwrap_err();
        assert!(matches!(err, InitError::InvalidGeometry { axis: Axis::Z, .. }));
    }

    #[test]
    fn test_gridbox_geometry_short_bounds() {
        let mut arrays = grid_arrays();
        assert!(arrays.take("gbxbounds").is_some());
        arrays
            .push(NamedArray::from_physical("gbxbounds", &[0.0; 11], 1000.0))
            .unwrap();
        let err = gridbox_geometry(&arrays).unwrap_err();
        assert!(matches!(err, InitError::Shape { expected: 12, actual: 11, .. }));
    }

    #[test]
    fn test_gridbox_geometry_corrupted_bounds() {
        let mut arrays = grid_arrays();
        assert!(arrays.take("gbxbounds").is_some());
        arrays
            .push(NamedArray::from_physical("gbxbounds", &[-9.0e9; 12], 1000.0))
            .unwrap();
        assert!(gridbox_geometry(&arrays).is_err());

        // one wrong x bound in the second gridbox
        let mut bounds = GRID_BOUNDS;
        bounds[9] = 20.0;
        assert!(arrays.take("gbxbounds").is_some());
        arrays
            .push(NamedArray::from_physical("gbxbounds", &bounds, 1000.0))
            .unwrap();
        let err = gridbox_geometry(&arrays).unwrap_err();
        assert!(matches!(err, InitError::InvalidGeometry { axis: Axis::X, .. }), "{err}");
        assert!(err.to_string().contains("gridbox 1 stores xmax"), "{err}");
    }

    #[test]
    fn test_superdroplet_attributes_without_coords() {
        let arrays = ArraySet::from_arrays(vec![
            NamedArray::uint32("sdgbxindex", vec![0, 1]),
            NamedArray::uint64("xi", vec![5, 7]),
            NamedArray::from_physical("radius", &[1e-6, 2e-6], 1e-6),
            NamedArray::float64("msol", vec![0.0, 0.0]),
        ])
        .unwrap();
        let set = superdroplet_attributes(&arrays).unwrap();
        assert_eq!(set.nspacedims(), 0);
        assert_eq!(set.xi, vec![5, 7]);
        assert!((set.radius[1] - 2e-6).abs() < 1e-18);
    }

    #[test]
    fn test_float_index_is_rejected() {
        let arrays = ArraySet::from_arrays(vec![
            NamedArray::float64("sdgbxindex", vec![0.0]),
            NamedArray::uint64("xi", vec![1]),
            NamedArray::float64("radius", vec![1.0]),
            NamedArray::float64("msol", vec![0.0]),
        ])
        .unwrap();
        let err = superdroplet_attributes(&arrays).unwrap_err();
        assert!(matches!(err, InitError::Binary(_)));
    }

    #[test]
    fn test_check_scale_factors() {
        let constants = Constants::cleo_defaults();
        let arrays = ArraySet::from_arrays(vec![
            NamedArray::from_physical("radius", &[1e-6], 1e-6),
            NamedArray::uint64("xi", vec![1]),
        ])
        .unwrap();
        check_scale_factors(&arrays, &constants).unwrap();

        let arrays =
            ArraySet::from_arrays(vec![NamedArray::from_physical("radius", &[1e-6], 1.0)]).unwrap();
        let err = check_scale_factors(&arrays, &constants).unwrap_err();
        assert!(matches!(err, InitError::ScaleFactor { .. }));
    }
}
