//! Binary file writer.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{BinaryError, Result};
use crate::header::{DIMENSIONLESS_UNITS, build_preamble, is_valid_token};
use crate::payload::{check_representable, encode_into};
use crate::types::{FileMetadata, NamedArray, WriterOptions};

/// Binary file writer.
///
/// Writes a preamble followed by the little-endian payload of every array.
pub struct BinaryWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> BinaryWriter<W> {
    /// Create a new writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Validate and write `arrays`, returning the inner writer once flushed.
    ///
    /// Nothing is written if validation fails.
    pub fn write_arrays(mut self, arrays: &[NamedArray], description: &str) -> Result<W> {
        validate_arrays(arrays)?;

        let metadata = FileMetadata {
            arrays: arrays.iter().map(NamedArray::descriptor).collect(),
            description: description.to_string(),
        };
        self.writer.write_all(&build_preamble(&metadata))?;

        let mut payload = Vec::new();
        for array in arrays {
            payload.clear();
            encode_into(array, &mut payload);
            self.writer.write_all(&payload)?;
        }

        self.writer.flush()?;
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

impl BinaryWriter<File> {
    /// Create a binary file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| BinaryError::io(path, e))?;
        Ok(Self::new(file))
    }
}

/// Write `arrays` to a binary file at `path`, syncing it to disk.
///
/// The arrays are validated before the file is created, so a failed
/// validation leaves no file behind.
pub fn write_binary(path: &Path, arrays: &[NamedArray], description: &str) -> Result<()> {
    write_binary_with_options(path, arrays, description, WriterOptions::default())
}

/// Write `arrays` to a binary file at `path` with options.
pub fn write_binary_with_options(
    path: &Path,
    arrays: &[NamedArray],
    description: &str,
    options: WriterOptions,
) -> Result<()> {
    validate_arrays(arrays)?;

    debug!(
        path = %path.display(),
        narrays = arrays.len(),
        "writing binary file"
    );
    let file = BinaryWriter::create(path)?
        .write_arrays(arrays, description)
        .map_err(|e| e.at_path(path))?;
    if options.sync_all {
        file.sync_all().map_err(|e| BinaryError::io(path, e))?;
    }
    Ok(())
}

/// Validate arrays before writing.
///
/// Checks names, units and scale factors, rejects duplicate names, and
/// verifies every value is exactly representable under its type code.
pub fn validate_arrays(arrays: &[NamedArray]) -> Result<()> {
    let mut seen = HashSet::new();
    for array in arrays {
        if !is_valid_token(&array.name) {
            return Err(BinaryError::invalid_array_name(&array.name));
        }
        if !seen.insert(array.name.as_str()) {
            return Err(BinaryError::duplicate_array(&array.name));
        }
        if !array.units.is_empty()
            && (!is_valid_token(&array.units) || array.units == DIMENSIONLESS_UNITS)
        {
            return Err(BinaryError::InvalidUnits {
                name: array.name.clone(),
                units: array.units.clone(),
            });
        }
        if !array.scale_factor.is_finite() || array.scale_factor <= 0.0 {
            return Err(BinaryError::InvalidScaleFactor {
                name: array.name.clone(),
                scale_factor: array.scale_factor,
            });
        }
        check_representable(array)?;
    }
    Ok(())
}
