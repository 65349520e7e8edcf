//! Little-endian payload encoding.
//!
//! Every value is checked for exact representability under its declared
//! type code before encoding. Integer codes accept only integral values
//! within range; `f` accepts only values that survive an `f32` round trip.

use crate::error::{BinaryError, Result};
use crate::types::{ArrayValues, NamedArray, TypeCode};

/// 2^63 as f64.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
/// 2^64 as f64.
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Check that every value of `array` is exactly representable.
///
/// Returns the first offending value as a `TypeMismatch`.
pub fn check_representable(array: &NamedArray) -> Result<()> {
    let code = array.type_code;
    let offending = match &array.values {
        ArrayValues::Float(values) => values
            .iter()
            .position(|&v| !float_fits(v, code))
            .map(|i| (i, values[i].to_string())),
        ArrayValues::Unsigned(values) => values
            .iter()
            .position(|&v| !unsigned_fits(v, code))
            .map(|i| (i, values[i].to_string())),
        ArrayValues::Signed(values) => values
            .iter()
            .position(|&v| !signed_fits(v, code))
            .map(|i| (i, values[i].to_string())),
    };

    match offending {
        Some((index, value)) => Err(BinaryError::TypeMismatch {
            name: array.name.clone(),
            index,
            value,
            type_code: code,
        }),
        None => Ok(()),
    }
}

fn float_fits(v: f64, code: TypeCode) -> bool {
    let integral = v.fract() == 0.0;
    match code {
        TypeCode::Float64 => true,
        TypeCode::Float32 => v.is_nan() || f64::from(v as f32) == v,
        TypeCode::UInt32 => integral && (0.0..=f64::from(u32::MAX)).contains(&v),
        TypeCode::UInt64 => integral && v >= 0.0 && v < TWO_POW_64,
        TypeCode::Int32 => integral && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&v),
        TypeCode::Int64 => integral && v >= -TWO_POW_63 && v < TWO_POW_63,
    }
}

fn unsigned_fits(v: u64, code: TypeCode) -> bool {
    match code {
        TypeCode::Float64 => {
            let f = v as f64;
            f < TWO_POW_64 && f as u64 == v
        }
        TypeCode::Float32 => {
            let f = f64::from(v as f32);
            f < TWO_POW_64 && f as u64 == v
        }
        TypeCode::UInt32 => u32::try_from(v).is_ok(),
        TypeCode::UInt64 => true,
        TypeCode::Int32 => i32::try_from(v).is_ok(),
        TypeCode::Int64 => i64::try_from(v).is_ok(),
    }
}

fn signed_fits(v: i64, code: TypeCode) -> bool {
    match code {
        TypeCode::Float64 => {
            let f = v as f64;
            f < TWO_POW_63 && f as i64 == v
        }
        TypeCode::Float32 => {
            let f = f64::from(v as f32);
            f < TWO_POW_63 && f as i64 == v
        }
        TypeCode::UInt32 => u32::try_from(v).is_ok(),
        TypeCode::UInt64 => u64::try_from(v).is_ok(),
        TypeCode::Int32 => i32::try_from(v).is_ok(),
        TypeCode::Int64 => true,
    }
}

/// Encode `array` as little-endian bytes, appending to `out`.
///
/// Callers must run [`check_representable`] first; values outside the
/// range of the type code are saturated.
pub fn encode_into(array: &NamedArray, out: &mut Vec<u8>) {
    let code = array.type_code;
    out.reserve(array.len() * code.width());
    match &array.values {
        ArrayValues::Float(values) => {
            for &v in values {
                encode_f64(v, code, out);
            }
        }
        ArrayValues::Unsigned(values) => {
            for &v in values {
                encode_u64(v, code, out);
            }
        }
        ArrayValues::Signed(values) => {
            for &v in values {
                encode_i64(v, code, out);
            }
        }
    }
}

fn encode_f64(v: f64, code: TypeCode, out: &mut Vec<u8>) {
    match code {
        TypeCode::Float64 => out.extend_from_slice(&v.to_le_bytes()),
        TypeCode::Float32 => out.extend_from_slice(&(v as f32).to_le_bytes()),
        TypeCode::UInt32 => out.extend_from_slice(&(v as u32).to_le_bytes()),
        TypeCode::UInt64 => out.extend_from_slice(&(v as u64).to_le_bytes()),
        TypeCode::Int32 => out.extend_from_slice(&(v as i32).to_le_bytes()),
        TypeCode::Int64 => out.extend_from_slice(&(v as i64).to_le_bytes()),
    }
}

fn encode_u64(v: u64, code: TypeCode, out: &mut Vec<u8>) {
    match code {
        TypeCode::Float64 => out.extend_from_slice(&(v as f64).to_le_bytes()),
        TypeCode::Float32 => out.extend_from_slice(&(v as f32).to_le_bytes()),
        TypeCode::UInt32 => out.extend_from_slice(&(v as u32).to_le_bytes()),
        TypeCode::UInt64 => out.extend_from_slice(&v.to_le_bytes()),
        TypeCode::Int32 => out.extend_from_slice(&(v as i32).to_le_bytes()),
        TypeCode::Int64 => out.extend_from_slice(&(v as i64).to_le_bytes()),
    }
}

fn encode_i64(v: i64, code: TypeCode, out: &mut Vec<u8>) {
    match code {
        TypeCode::Float64 => out.extend_from_slice(&(v as f64).to_le_bytes()),
        TypeCode::Float32 => out.extend_from_slice(&(v as f32).to_le_bytes()),
        TypeCode::UInt32 => out.extend_from_slice(&(v as u32).to_le_bytes()),
        TypeCode::UInt64 => out.extend_from_slice(&(v as u64).to_le_bytes()),
        TypeCode::Int32 => out.extend_from_slice(&(v as i32).to_le_bytes()),
        TypeCode::Int64 => out.extend_from_slice(&v.to_le_bytes()),
    }
}

/// Decode `count` elements of type `code` from the start of `data`.
///
/// The variant of the result follows the code: floats for `d`/`f`,
/// unsigned for `I`/`Q`, signed for `i`/`q`.
pub fn decode(data: &[u8], code: TypeCode, count: usize) -> Result<ArrayValues> {
    let width = code.width();
    let len = count
        .checked_mul(width)
        .ok_or_else(|| BinaryError::format("array byte length overflow"))?;
    let bytes = data
        .get(..len)
        .ok_or_else(|| BinaryError::format("array payload truncated"))?;
    let chunks = bytes.chunks_exact(width);

    let values = match code {
        TypeCode::Float64 => {
            ArrayValues::Float(chunks.map(|c| f64::from_le_bytes(take8(c))).collect())
        }
        TypeCode::Float32 => ArrayValues::Float(
            chunks
                .map(|c| f64::from(f32::from_le_bytes(take4(c))))
                .collect(),
        ),
        TypeCode::UInt32 => ArrayValues::Unsigned(
            chunks
                .map(|c| u64::from(u32::from_le_bytes(take4(c))))
                .collect(),
        ),
        TypeCode::UInt64 => {
            ArrayValues::Unsigned(chunks.map(|c| u64::from_le_bytes(take8(c))).collect())
        }
        TypeCode::Int32 => ArrayValues::Signed(
            chunks
                .map(|c| i64::from(i32::from_le_bytes(take4(c))))
                .collect(),
        ),
        TypeCode::Int64 => {
            ArrayValues::Signed(chunks.map(|c| i64::from_le_bytes(take8(c))).collect())
        }
    };
    Ok(values)
}

fn take4(chunk: &[u8]) -> [u8; 4] {
    let mut buf = [0_u8; 4];
    buf.copy_from_slice(chunk);
    buf
}

fn take8(chunk: &[u8]) -> [u8; 8] {
    let mut buf = [0_u8; 8];
    buf.copy_from_slice(chunk);
    buf
}
