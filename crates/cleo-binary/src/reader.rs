//! Binary file reader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{BinaryError, Result};
use crate::header::parse_preamble;
use crate::payload::decode;
use crate::types::{ArraySet, FileMetadata, NamedArray};

/// Binary file reader.
///
/// Reads the whole file into memory and parses it.
pub struct BinaryReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> BinaryReader<R> {
    /// Create a new reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Parse only the preamble.
    pub fn read_metadata(mut self) -> Result<FileMetadata> {
        let data = self.read_all_bytes()?;
        let (metadata, _) = parse_preamble(&data)?;
        Ok(metadata)
    }

    /// Read arrays.
    ///
    /// With `expect = None` every array is returned in file order. Otherwise
    /// exactly the named arrays are returned, in the order given; a missing
    /// name fails with `UnknownArray` and a name listed twice with `Format`.
    pub fn read_arrays(mut self, expect: Option<&[&str]>) -> Result<ArraySet> {
        let data = self.read_all_bytes()?;
        parse_arrays(&data, expect)
    }

    fn read_all_bytes(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl BinaryReader<File> {
    /// Open a binary file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BinaryError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                BinaryError::io(path, e)
            }
        })?;
        Ok(Self::new(file))
    }
}

/// Read the preamble of the binary file at `path`.
pub fn read_metadata(path: &Path) -> Result<FileMetadata> {
    BinaryReader::open(path)?
        .read_metadata()
        .map_err(|e| e.at_path(path))
}

/// Read arrays from the binary file at `path`.
///
/// See [`BinaryReader::read_arrays`] for the meaning of `expect`.
pub fn read_binary(path: &Path, expect: Option<&[&str]>) -> Result<ArraySet> {
    debug!(path = %path.display(), "reading binary file");
    BinaryReader::open(path)?
        .read_arrays(expect)
        .map_err(|e| e.at_path(path))
}

fn parse_arrays(data: &[u8], expect: Option<&[&str]>) -> Result<ArraySet> {
    if let Some(names) = expect
        && let Some((i, name)) = names
            .iter()
            .enumerate()
            .find(|&(i, name)| names[..i].contains(name))
    {
        return Err(BinaryError::format(format!(
            "array {name} requested twice (position {i})"
        )));
    }
    let (metadata, payload_start) = parse_preamble(data)?;

    let payload_len = metadata
        .payload_len()
        .ok_or_else(|| BinaryError::format("declared payload size overflows"))?;
    let expected = payload_start
        .checked_add(payload_len)
        .ok_or_else(|| BinaryError::format("declared payload size overflows"))?;
    if data.len() != expected {
        return Err(BinaryError::LengthMismatch {
            expected,
            actual: data.len(),
        });
    }

    let mut set = ArraySet::new();
    let mut offset = payload_start;
    for desc in metadata.arrays {
        let len = desc.count * desc.type_code.width();
        let wanted = expect.is_none_or(|names| names.contains(&desc.name.as_str()));
        if wanted {
            let block = read_block(data, offset, len)?;
            let values = decode(block, desc.type_code, desc.count)?;
            set.push(NamedArray {
                name: desc.name,
                type_code: desc.type_code,
                values,
                scale_factor: desc.scale_factor,
                units: desc.units,
            })?;
        }
        offset += len;
    }

    match expect {
        None => Ok(set),
        Some(names) => {
            let mut ordered = ArraySet::new();
            for name in names {
                let array = set
                    .take(name)
                    .ok_or_else(|| BinaryError::unknown_array(*name))?;
                ordered.push(array)?;
            }
            Ok(ordered)
        }
    }
}

fn read_block(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    data.get(offset..offset + len)
        .ok_or_else(|| BinaryError::format(format!("payload out of bounds at offset {offset}")))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::writer::BinaryWriter;

    fn encoded(arrays: &[NamedArray]) -> Vec<u8> {
        BinaryWriter::new(Vec::new())
            .write_arrays(arrays, "test")
            .unwrap()
    }

    #[test]
    fn test_read_all_in_file_order() {
        let bytes = encoded(&[
            NamedArray::uint64("xi", vec![10, 20]),
            NamedArray::float64("radius", vec![0.5, 0.75]).with_scale_factor(1e-6),
        ]);
        let set = BinaryReader::new(Cursor::new(bytes)).read_arrays(None).unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["xi", "radius"]);
        assert_eq!(set.require("radius").unwrap().scale_factor, 1e-6);
    }

    #[test]
    fn test_read_expected_order() {
        let bytes = encoded(&[
            NamedArray::uint64("xi", vec![10]),
            NamedArray::float64("radius", vec![0.5]),
            NamedArray::float64("msol", vec![0.1]),
        ]);
        let set = BinaryReader::new(Cursor::new(bytes))
            .read_arrays(Some(&["msol", "xi"]))
            .unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["msol", "xi"]);
    }

    #[test]
    fn test_read_repeated_expected_name() {
        let bytes = encoded(&[NamedArray::uint64("xi", vec![10])]);
        let err = BinaryReader::new(Cursor::new(bytes))
            .read_arrays(Some(&["xi", "xi"]))
            .unwrap_err();
        assert!(matches!(&err, BinaryError::Format { message } if message.contains("xi requested twice")), "{err}");
    }

    #[test]
    fn test_read_unknown_array() {
        let bytes = encoded(&[NamedArray::uint64("xi", vec![10])]);
        let err = BinaryReader::new(Cursor::new(bytes))
            .read_arrays(Some(&["coord3"]))
            .unwrap_err();
        assert!(matches!(err, BinaryError::UnknownArray { name } if name == "coord3"));
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = encoded(&[NamedArray::float64("zhalf", vec![0.0, 1.0])]);
        let full = bytes.len();
        bytes.truncate(full - 3);
        let err = BinaryReader::new(Cursor::new(bytes))
            .read_arrays(None)
            .unwrap_err();
        assert!(matches!(
            err,
            BinaryError::LengthMismatch { expected, actual } if expected == full && actual == full - 3
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = encoded(&[NamedArray::float64("zhalf", vec![0.0])]);
        bytes.push(0);
        let err = BinaryReader::new(Cursor::new(bytes))
            .read_arrays(None)
            .unwrap_err();
        assert!(matches!(err, BinaryError::LengthMismatch { .. }));
    }

    #[test]
    fn test_metadata_only() {
        let bytes = encoded(&[NamedArray::float64("temp", vec![1.0; 5]).with_units("K")]);
        let meta = BinaryReader::new(Cursor::new(bytes)).read_metadata().unwrap();
        assert_eq!(meta.description, "test");
        assert_eq!(meta.arrays[0].count, 5);
        assert_eq!(meta.arrays[0].units, "K");
    }
}
