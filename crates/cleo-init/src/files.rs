//! Writing initial-condition files.
//!
//! Each writer runs the matching [`Dimensionaliser`] and hands its arrays to
//! the binary writer. Thermodynamics go one variable per file, named
//! `<stem>_<var><ext>` after the given path.

use std::path::{Path, PathBuf};

use cleo_binary::{ArraySet, WriterOptions, write_binary_with_options};
use cleo_config::Constants;
use cleo_model::{Axis, DomainGeometry, SuperdropletAttributeSet, ThermoVariable, ThermodynamicFieldSet};
use tracing::info;

use crate::dimensionalise::{
    Dimensionaliser, GridSpec, GridboxBoundaries, SuperdropletAttributes, ThermoContext,
    Thermodynamics,
};
use crate::error::Result;

/// File holding `variable` for the thermodynamics written at `path`.
///
/// `thermo.dat` becomes `thermo_press.dat`; a path without extension gets
/// only the suffix.
#[must_use]
pub fn thermo_variable_path(path: &Path, variable: ThermoVariable) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}_{variable}");
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

fn gridbox_description(geometry: &DomainGeometry) -> String {
    format!(
        "Variables in this file are ndims in (z,x,y), the z, x and y half coordinates, \
         then the {} gridbox indices followed by the [zmin, zmax, xmin, xmax, ymin, ymax] \
         coordinates for each gridbox's boundaries",
        geometry.ngridboxes()
    )
}

fn superdrops_description(nspacedims: usize) -> String {
    let mut attrs = vec!["sdgbxindex", "xi", "radius", "msol"];
    attrs.extend(Axis::ALL.into_iter().take(nspacedims).map(Axis::coord_name));
    format!("Variables in this file are Superdroplet attributes: [{}]", attrs.join(", "))
}

fn thermo_description(variable: ThermoVariable, context: &ThermoContext) -> String {
    let at = variable
        .staggered_axis()
        .map_or_else(|| "centres".to_string(), |axis| format!("{axis}-faces"));
    let [nz, nx, ny] = context.ndims;
    format!(
        "This file is flattened array of {variable} variable for {} timesteps defined at \
         gridbox {at} for grid with dims: [{nz}, {nx}, {ny}] (ie. file contains {} datapoints)",
        context.ntimesteps,
        context.expected_len(variable)
    )
}

fn emit(path: &Path, arrays: &ArraySet, description: &str, options: WriterOptions) -> Result<()> {
    write_binary_with_options(path, arrays.as_slice(), description, options)?;
    Ok(())
}

/// Write the gridbox boundaries of `grid` to `path` and return its geometry.
pub fn write_gridbox_boundaries(
    path: &Path,
    grid: &GridSpec,
    constants: &Constants,
    options: WriterOptions,
) -> Result<DomainGeometry> {
    let geometry = grid.geometry()?;
    let dimensionaliser = GridboxBoundaries::new();
    let arrays = dimensionaliser.arrays(&geometry, constants)?;
    emit(path, &arrays, &gridbox_description(&geometry), options)?;
    info!(
        path = %path.display(),
        ngridboxes = geometry.ngridboxes(),
        "wrote {}",
        dimensionaliser.kind()
    );
    Ok(geometry)
}

/// Write superdroplet batches to `path`.
///
/// Batches are concatenated in order; every droplet must lie in the
/// gridbox it is assigned to.
pub fn write_initial_superdrops(
    path: &Path,
    batches: &[SuperdropletAttributeSet],
    geometry: &DomainGeometry,
    constants: &Constants,
    options: WriterOptions,
) -> Result<()> {
    let dimensionaliser = SuperdropletAttributes::new();
    let arrays = dimensionaliser.build(batches, geometry, constants)?;
    let nsupers = arrays.get("xi").map_or(0, cleo_binary::NamedArray::len);
    let nspacedims = Axis::ALL
        .into_iter()
        .filter(|axis| arrays.contains(axis.coord_name()))
        .count();
    emit(path, &arrays, &superdrops_description(nspacedims), options)?;
    info!(
        path = %path.display(),
        nsupers,
        nspacedims,
        "wrote {}",
        dimensionaliser.kind()
    );
    Ok(())
}

/// Write each thermodynamic variable to its own file next to `path`.
///
/// Returns the files written, scalars first then the present winds.
pub fn write_thermodynamics(
    path: &Path,
    fields: &ThermodynamicFieldSet,
    geometry: &DomainGeometry,
    constants: &Constants,
    options: WriterOptions,
) -> Result<Vec<PathBuf>> {
    let context = ThermoContext::from_geometry(geometry, fields.ntimesteps);
    let dimensionaliser = Thermodynamics::new();
    let arrays = dimensionaliser.build(fields, &context, constants)?;

    let mut written = Vec::with_capacity(arrays.len());
    for variable in ThermoVariable::ALL {
        let Some(array) = arrays.get(variable.as_str()) else {
            continue;
        };
        let file = thermo_variable_path(path, variable);
        write_binary_with_options(
            &file,
            std::slice::from_ref(array),
            &thermo_description(variable, &context),
            options,
        )?;
        written.push(file);
    }
    info!(
        path = %path.display(),
        nfiles = written.len(),
        ntimesteps = fields.ntimesteps,
        "wrote {}",
        dimensionaliser.kind()
    );
    Ok(written)
}
