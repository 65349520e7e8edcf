//! Named arrays and their values.

use super::{ArrayDescriptor, TypeCode};

/// Values held by a [`NamedArray`].
///
/// The variant is independent of the declared [`TypeCode`]; the writer
/// checks that every value is exactly representable under the code before
/// anything is written. The reader always produces `Float` for `d`/`f`,
/// `Unsigned` for `I`/`Q` and `Signed` for `i`/`q`.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValues {
    /// Floating-point values.
    Float(Vec<f64>),
    /// Unsigned integer values.
    Unsigned(Vec<u64>),
    /// Signed integer values.
    Signed(Vec<i64>),
}

impl ArrayValues {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Unsigned(v) => v.len(),
            Self::Signed(v) => v.len(),
        }
    }

    /// True when there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values widened to `f64`.
    #[must_use]
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Self::Float(v) => v.clone(),
            Self::Unsigned(v) => v.iter().map(|&x| x as f64).collect(),
            Self::Signed(v) => v.iter().map(|&x| x as f64).collect(),
        }
    }

    /// Borrow float values, if this is the `Float` variant.
    #[must_use]
    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow unsigned values, if this is the `Unsigned` variant.
    #[must_use]
    pub fn as_unsigned(&self) -> Option<&[u64]> {
        match self {
            Self::Unsigned(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow signed values, if this is the `Signed` variant.
    #[must_use]
    pub fn as_signed(&self) -> Option<&[i64]> {
        match self {
            Self::Signed(v) => Some(v),
            _ => None,
        }
    }
}

/// A named, typed, dimensionless array with its scale factor and units.
///
/// Multiplying the stored values by `scale_factor` recovers the physical
/// quantity, expressed in `units`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArray {
    /// Array name (printable ASCII, no whitespace).
    pub name: String,
    /// Element type code.
    pub type_code: TypeCode,
    /// Dimensionless values.
    pub values: ArrayValues,
    /// Factor restoring physical values.
    pub scale_factor: f64,
    /// Physical units label; empty means dimensionless.
    pub units: String,
}

impl NamedArray {
    /// Create an array with scale factor 1 and no units.
    #[must_use]
    pub fn new(name: impl Into<String>, type_code: TypeCode, values: ArrayValues) -> Self {
        Self {
            name: name.into(),
            type_code,
            values,
            scale_factor: 1.0,
            units: String::new(),
        }
    }

    /// Create a `d` array.
    #[must_use]
    pub fn float64(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, TypeCode::Float64, ArrayValues::Float(values))
    }

    /// Create an `f` array.
    #[must_use]
    pub fn float32(name: impl Into<String>, values: Vec<f32>) -> Self {
        let values = values.into_iter().map(f64::from).collect();
        Self::new(name, TypeCode::Float32, ArrayValues::Float(values))
    }

    /// Create an `I` array.
    #[must_use]
    pub fn uint32(name: impl Into<String>, values: Vec<u32>) -> Self {
        let values = values.into_iter().map(u64::from).collect();
        Self::new(name, TypeCode::UInt32, ArrayValues::Unsigned(values))
    }

    /// Create a `Q` array.
    #[must_use]
    pub fn uint64(name: impl Into<String>, values: Vec<u64>) -> Self {
        Self::new(name, TypeCode::UInt64, ArrayValues::Unsigned(values))
    }

    /// Create an `i` array.
    #[must_use]
    pub fn int32(name: impl Into<String>, values: Vec<i32>) -> Self {
        let values = values.into_iter().map(i64::from).collect();
        Self::new(name, TypeCode::Int32, ArrayValues::Signed(values))
    }

    /// Create a `q` array.
    #[must_use]
    pub fn int64(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(name, TypeCode::Int64, ArrayValues::Signed(values))
    }

    /// Create a `d` array by dividing physical values by `scale_factor`.
    #[must_use]
    pub fn from_physical(name: impl Into<String>, physical: &[f64], scale_factor: f64) -> Self {
        let values = physical.iter().map(|v| v / scale_factor).collect();
        Self::float64(name, values).with_scale_factor(scale_factor)
    }

    /// Set the scale factor.
    #[must_use]
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the units label.
    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Physical values: stored values multiplied by the scale factor.
    #[must_use]
    pub fn redimensionalised(&self) -> Vec<f64> {
        let scale = self.scale_factor;
        match &self.values {
            ArrayValues::Float(v) => v.iter().map(|x| x * scale).collect(),
            ArrayValues::Unsigned(v) => v.iter().map(|&x| x as f64 * scale).collect(),
            ArrayValues::Signed(v) => v.iter().map(|&x| x as f64 * scale).collect(),
        }
    }

    /// Preamble descriptor for this array.
    #[must_use]
    pub fn descriptor(&self) -> ArrayDescriptor {
        ArrayDescriptor {
            name: self.name.clone(),
            type_code: self.type_code,
            count: self.len(),
            scale_factor: self.scale_factor,
            units: self.units.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_physical() {
        let arr = NamedArray::from_physical("zhalf", &[0.0, 100.0, 200.0, 300.0], 100.0)
            .with_units("m");
        assert_eq!(arr.values, ArrayValues::Float(vec![0.0, 1.0, 2.0, 3.0]));
        assert_eq!(arr.scale_factor, 100.0);
        assert_eq!(arr.units, "m");
        assert_eq!(arr.redimensionalised(), vec![0.0, 100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_integer_constructors() {
        let arr = NamedArray::uint32("gbxindex", vec![0, 1, 2]);
        assert_eq!(arr.type_code, TypeCode::UInt32);
        assert_eq!(arr.values.as_unsigned(), Some(&[0_u64, 1, 2][..]));

        let arr = NamedArray::int32("offsets", vec![-1, 0, 1]);
        assert_eq!(arr.values.to_f64(), vec![-1.0, 0.0, 1.0]);
        assert!(arr.values.as_float().is_none());
    }

    #[test]
    fn test_descriptor() {
        let arr = NamedArray::uint64("xi", vec![5, 6]);
        let desc = arr.descriptor();
        assert_eq!(desc.name, "xi");
        assert_eq!(desc.count, 2);
        assert_eq!(desc.type_code, TypeCode::UInt64);
        assert_eq!(desc.scale_factor, 1.0);
        assert!(desc.units.is_empty());
    }
}
