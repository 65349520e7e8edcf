//! Preamble structures.
//!
//! The preamble is ASCII text terminated by a delimiter line:
//!
//! ```text
//! CLEOBIN <narrays> <description_bytes>
//! <name> <type_code> <count> <scale_factor> <units>    (one line per array)
//! <description>
//! END
//! ```
//!
//! Payloads follow immediately after `END\n`, one per array, in the order
//! the descriptor lines appear.

mod descriptor;
mod preamble;

pub use descriptor::{format_descriptor, is_valid_token, parse_descriptor};
pub use preamble::{DELIMITER, DIMENSIONLESS_UNITS, MAGIC, build_preamble, parse_preamble};
