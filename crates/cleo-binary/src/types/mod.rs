//! Core types for binary file handling.
//!
//! This module provides the data structures for named arrays, their type
//! codes, file-level metadata and writer options.

mod array;
mod metadata;
mod options;
mod set;
mod type_code;

pub use array::{ArrayValues, NamedArray};
pub use metadata::{ArrayDescriptor, FileMetadata};
pub use options::WriterOptions;
pub use set::ArraySet;
pub use type_code::TypeCode;
