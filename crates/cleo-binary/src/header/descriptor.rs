//! Descriptor lines.
//!
//! One line per array:
//!
//! | Field          | Format                                   |
//! |----------------|------------------------------------------|
//! | `name`         | printable ASCII, no whitespace           |
//! | `type_code`    | one of `d f I Q i q`                     |
//! | `count`        | decimal element count                    |
//! | `scale_factor` | `{:e}` float, finite and positive        |
//! | `units`        | printable ASCII, `-` when dimensionless  |

use super::preamble::DIMENSIONLESS_UNITS;
use crate::error::{BinaryError, Result};
use crate::types::{ArrayDescriptor, TypeCode};

/// True when `token` is non-empty printable ASCII without whitespace.
#[must_use]
pub fn is_valid_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_graphic())
}

/// Format a descriptor line, without the trailing newline.
#[must_use]
pub fn format_descriptor(desc: &ArrayDescriptor) -> String {
    let units = if desc.units.is_empty() {
        DIMENSIONLESS_UNITS
    } else {
        desc.units.as_str()
    };
    format!(
        "{} {} {} {:e} {}",
        desc.name, desc.type_code, desc.count, desc.scale_factor, units
    )
}

/// Parse a descriptor line (without newline).
///
/// `index` is the position of the line among the descriptors, used only in
/// error messages.
pub fn parse_descriptor(line: &str, index: usize) -> Result<ArrayDescriptor> {
    let fields: Vec<&str> = line.split(' ').collect();
    let [name, code, count, scale, units] = fields.as_slice() else {
        return Err(BinaryError::format(format!(
            "descriptor {index}: expected 5 fields, found {}",
            fields.len()
        )));
    };

    if !is_valid_token(name) {
        return Err(BinaryError::format(format!(
            "descriptor {index}: invalid array name {name:?}"
        )));
    }

    let mut chars = code.chars();
    let type_code = match (chars.next(), chars.next()) {
        (Some(c), None) => TypeCode::from_char(c),
        _ => None,
    }
    .ok_or_else(|| {
        BinaryError::format(format!("descriptor {index}: unknown type code {code:?}"))
    })?;

    let count: usize = count.parse().map_err(|_| {
        BinaryError::format(format!("descriptor {index}: invalid element count {count:?}"))
    })?;

    let scale_factor: f64 = scale.parse().map_err(|_| {
        BinaryError::format(format!("descriptor {index}: invalid scale factor {scale:?}"))
    })?;
    if !scale_factor.is_finite() || scale_factor <= 0.0 {
        return Err(BinaryError::format(format!(
            "descriptor {index}: scale factor must be finite and positive, got {scale}"
        )));
    }

    if !is_valid_token(units) {
        return Err(BinaryError::format(format!(
            "descriptor {index}: invalid units {units:?}"
        )));
    }
    let units = if *units == DIMENSIONLESS_UNITS {
        String::new()
    } else {
        (*units).to_string()
    };

    Ok(ArrayDescriptor {
        name: (*name).to_string(),
        type_code,
        count,
        scale_factor,
        units,
    })
}
