//! Flat binary files of named numeric arrays.
//!
//! This crate reads and writes the binary files exchanged with the CLEO
//! superdroplet model: initial superdroplet attributes, gridbox boundaries
//! and thermodynamic fields. A file carries an ASCII preamble describing
//! every array (name, type code, element count, scale factor, units) and a
//! free-text description, followed by the raw little-endian payloads.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cleo_binary::{NamedArray, read_binary, write_binary};
//!
//! // Dimensionless half coordinates with a 100 m length scale
//! let zhalf = NamedArray::from_physical("zhalf", &[0.0, 100.0, 200.0, 300.0], 100.0)
//!     .with_units("m");
//! write_binary(Path::new("dimlessGBxboundaries.dat"), &[zhalf], "gridbox boundaries").unwrap();
//!
//! let arrays = read_binary(Path::new("dimlessGBxboundaries.dat"), None).unwrap();
//! let zhalf = arrays.require("zhalf").unwrap();
//! assert_eq!(zhalf.redimensionalised(), vec![0.0, 100.0, 200.0, 300.0]);
//! ```
//!
//! # Type codes
//!
//! | Code | Encoding                    |
//! |------|-----------------------------|
//! | `d`  | 8-byte IEEE float           |
//! | `f`  | 4-byte IEEE float           |
//! | `I`  | 4-byte unsigned integer     |
//! | `Q`  | 8-byte unsigned integer     |
//! | `i`  | 4-byte signed integer       |
//! | `q`  | 8-byte signed integer       |

mod error;
pub mod header;
pub mod payload;
mod reader;
mod types;
mod writer;

pub use error::{BinaryError, Result};

pub use types::{
    ArrayDescriptor, ArraySet, ArrayValues, FileMetadata, NamedArray, TypeCode, WriterOptions,
};

pub use reader::{BinaryReader, read_binary, read_metadata};

pub use writer::{BinaryWriter, validate_arrays, write_binary, write_binary_with_options};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
