//! Constants, scale factors and companion configuration files.
//!
//! - [`Constants`] holds the physical and characteristic constants, parsed
//!   from a C++ header of `constexpr` assignments and completed with the
//!   derived scales (`COORD0`, `RHO0`, `MASS0`, ...).
//! - [`resolve_scale_factor`] maps a quantity name to the factor that turns
//!   physical values into the dimensionless values stored in binary files.
//! - [`SetupConfig`] reads the human-readable `key = value` setup file and
//!   [`CompanionConfig`] pairs it with the constants to recover simulation
//!   counts.

mod companion;
mod constants;
mod error;
mod scale;
mod setup;

pub use companion::{CompanionConfig, SimulationCounts, ntimesteps_from};
pub use constants::Constants;
pub use error::{ConfigError, Result};
pub use scale::{canonical_constant, resolve_scale_factor, units_for};
pub use setup::{ConfigValue, SetupConfig};
