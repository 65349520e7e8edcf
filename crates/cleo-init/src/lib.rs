//! Initial conditions for the CLEO superdroplet model.
//!
//! This crate turns physical inputs into the dimensionless binary files
//! CLEO reads at start-up, and reads those files back:
//!
//! - gridbox boundaries ([`write_gridbox_boundaries`], [`read_gridbox_boundaries`])
//! - initial superdroplets ([`write_initial_superdrops`], [`read_initial_superdrops`])
//! - thermodynamic fields, one file per variable ([`write_thermodynamics`],
//!   [`read_thermodynamics`])
//!
//! Inputs come either directly as model types or from the
//! [`generators`] and [`profiles`] modules.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cleo_binary::WriterOptions;
//! use cleo_config::Constants;
//! use cleo_init::{AxisSpec, GridSpec, write_gridbox_boundaries};
//!
//! let constants = Constants::cleo_defaults();
//! let grid = GridSpec::new(
//!     AxisSpec::linear(0.0, 1500.0, 50.0),
//!     AxisSpec::Explicit(vec![0.0, 20.0]),
//!     AxisSpec::Explicit(vec![0.0, 20.0]),
//! );
//! let geometry = write_gridbox_boundaries(
//!     Path::new("dimlessGBxboundaries.dat"),
//!     &grid,
//!     &constants,
//!     WriterOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(geometry.ngridboxes(), 30);
//! ```

pub mod dimensionalise;
mod error;
mod files;
pub mod generators;
pub mod logging;
pub mod profiles;
mod readback;
mod shape;

pub use dimensionalise::{
    AxisSpec, Dimensionaliser, GridSpec, GridboxBoundaries, SuperdropletAttributes, ThermoContext,
    Thermodynamics, coord_scale,
};
pub use error::{InitError, Result};
pub use files::{
    thermo_variable_path, write_gridbox_boundaries, write_initial_superdrops,
    write_thermodynamics,
};
pub use generators::{AttributeGenerator, NsupersPerGridbox, generate_superdroplets};
pub use profiles::{ThermoProfile, WindProfile, generate_thermodynamics};
pub use readback::{
    check_scale_factors, gridbox_geometry, read_gridbox_boundaries, read_initial_superdrops,
    read_thermodynamics, superdroplet_attributes,
};
pub use shape::{ShapeValidator, validate_consistent, validate_shape};
