//! Data models for CLEO initial conditions.
//!
//! All quantities here are physical (SI units). Conversion to and from the
//! dimensionless values stored in binary files happens in `cleo-init`.

pub mod error;
pub mod geometry;
pub mod superdrops;
pub mod thermo;

pub use error::{ModelError, Result};
pub use geometry::{Axis, CoordinateArrays, DomainGeometry, GridboxBounds};
pub use superdrops::{Superdroplet, SuperdropletAttributeSet};
pub use thermo::{ThermoVariable, ThermodynamicFieldSet, expected_field_len};
