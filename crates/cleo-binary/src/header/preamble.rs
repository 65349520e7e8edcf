//! Preamble encoding and parsing.

use std::collections::HashSet;

use super::descriptor::{format_descriptor, parse_descriptor};
use crate::error::{BinaryError, Result};
use crate::types::FileMetadata;

/// Tag opening every file.
pub const MAGIC: &str = "CLEOBIN";

/// Line terminating the preamble.
pub const DELIMITER: &str = "END";

/// Units token written for dimensionless arrays.
pub const DIMENSIONLESS_UNITS: &str = "-";

/// Build the preamble bytes for `metadata`.
#[must_use]
pub fn build_preamble(metadata: &FileMetadata) -> Vec<u8> {
    let mut text = format!(
        "{MAGIC} {} {}\n",
        metadata.narrays(),
        metadata.description.len()
    );
    for desc in &metadata.arrays {
        text.push_str(&format_descriptor(desc));
        text.push('\n');
    }
    text.push_str(&metadata.description);
    text.push('\n');
    text.push_str(DELIMITER);
    text.push('\n');
    text.into_bytes()
}

/// Parse the preamble at the start of `data`.
///
/// Returns the metadata and the byte offset where payloads begin.
pub fn parse_preamble(data: &[u8]) -> Result<(FileMetadata, usize)> {
    let mut cursor = Cursor { data, pos: 0 };

    let header = cursor.line()?;
    let (narrays, description_len) = parse_header_line(header)?;

    let mut arrays = Vec::with_capacity(narrays.min(64));
    let mut seen = HashSet::new();
    for index in 0..narrays {
        let desc = parse_descriptor(cursor.line()?, index)?;
        if !seen.insert(desc.name.clone()) {
            return Err(BinaryError::format(format!(
                "duplicate array name {:?}",
                desc.name
            )));
        }
        arrays.push(desc);
    }

    let description = std::str::from_utf8(cursor.take(description_len)?)
        .map_err(|_| BinaryError::format("description is not valid UTF-8"))?
        .to_string();
    if cursor.take(1)? != b"\n" {
        return Err(BinaryError::format(
            "description length does not match declared byte count",
        ));
    }

    let end = cursor.line()?;
    if end != DELIMITER {
        return Err(BinaryError::format(format!(
            "expected {DELIMITER} delimiter, found {end:?}"
        )));
    }

    Ok((
        FileMetadata {
            arrays,
            description,
        },
        cursor.pos,
    ))
}

fn parse_header_line(line: &str) -> Result<(usize, usize)> {
    let fields: Vec<&str> = line.split(' ').collect();
    let [magic, narrays, description_len] = fields.as_slice() else {
        return Err(BinaryError::format(format!(
            "malformed header line {line:?}"
        )));
    };
    if *magic != MAGIC {
        return Err(BinaryError::format(format!("missing {MAGIC} tag")));
    }
    let narrays = narrays
        .parse()
        .map_err(|_| BinaryError::format(format!("invalid array count {narrays:?}")))?;
    let description_len = description_len.parse().map_err(|_| {
        BinaryError::format(format!("invalid description length {description_len:?}"))
    })?;
    Ok((narrays, description_len))
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Next newline-terminated ASCII line, without the newline.
    fn line(&mut self) -> Result<&'a str> {
        let rest = self
            .data
            .get(self.pos..)
            .ok_or_else(|| BinaryError::format("preamble truncated"))?;
        let end = rest
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| BinaryError::format("preamble truncated"))?;
        let line = &rest[..end];
        if !line.is_ascii() {
            return Err(BinaryError::format("preamble contains non-ASCII bytes"));
        }
        self.pos += end + 1;
        std::str::from_utf8(line).map_err(|_| BinaryError::format("preamble is not text"))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or_else(|| BinaryError::format("preamble length overflow"))?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or_else(|| BinaryError::format("preamble truncated"))?;
        self.pos = end;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArrayDescriptor, TypeCode};

    fn sample() -> FileMetadata {
        FileMetadata {
            arrays: vec![
                ArrayDescriptor {
                    name: "ndims".into(),
                    type_code: TypeCode::UInt64,
                    count: 3,
                    scale_factor: 1.0,
                    units: String::new(),
                },
                ArrayDescriptor {
                    name: "zhalf".into(),
                    type_code: TypeCode::Float64,
                    count: 4,
                    scale_factor: 1000.0,
                    units: "m".into(),
                },
            ],
            description: "gridbox boundaries\nline two".into(),
        }
    }

    #[test]
    fn test_build_and_parse() {
        let meta = sample();
        let mut bytes = build_preamble(&meta);
        let preamble_len = bytes.len();
        bytes.extend_from_slice(&[0xFF; 16]);

        let (parsed, offset) = parse_preamble(&bytes).unwrap();
        assert_eq!(parsed, meta);
        assert_eq!(offset, preamble_len);
    }

    #[test]
    fn test_empty_description() {
        let meta = FileMetadata::default();
        let bytes = build_preamble(&meta);
        assert_eq!(bytes, b"CLEOBIN 0 0\n\nEND\n");
        let (parsed, offset) = parse_preamble(&bytes).unwrap();
        assert_eq!(parsed, meta);
        assert_eq!(offset, bytes.len());
    }

    #[test]
    fn test_missing_magic() {
        let err = parse_preamble(b"NOTCLEO 0 0\n\nEND\n").unwrap_err();
        assert!(matches!(err, BinaryError::Format { .. }));
    }

    #[test]
    fn test_missing_delimiter() {
        let err = parse_preamble(b"CLEOBIN 0 0\n\nEDN\n").unwrap_err();
        assert!(matches!(err, BinaryError::Format { .. }));
    }

    #[test]
    fn test_truncated() {
        let bytes = build_preamble(&sample());
        for cut in [0, 5, 20, bytes.len() - 1] {
            let err = parse_preamble(&bytes[..cut]).unwrap_err();
            assert!(matches!(err, BinaryError::Format { .. }), "cut at {cut}");
        }
    }

    #[test]
    fn test_wrong_description_length() {
        let err = parse_preamble(b"CLEOBIN 0 3\nabcd\nEND\n").unwrap_err();
        assert!(matches!(err, BinaryError::Format { .. }));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let text = b"CLEOBIN 2 0\nxi Q 1 1e0 -\nxi Q 1 1e0 -\n\nEND\n";
        let err = parse_preamble(text).unwrap_err();
        assert!(matches!(err, BinaryError::Format { .. }));
    }
}
