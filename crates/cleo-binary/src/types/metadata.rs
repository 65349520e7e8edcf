//! File-level metadata parsed from the preamble.

use super::TypeCode;

/// Preamble entry describing one array.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    /// Array name.
    pub name: String,
    /// Element type code.
    pub type_code: TypeCode,
    /// Number of elements.
    pub count: usize,
    /// Factor restoring physical values.
    pub scale_factor: f64,
    /// Physical units label; empty means dimensionless.
    pub units: String,
}

impl ArrayDescriptor {
    /// Payload size in bytes, or `None` on overflow.
    #[must_use]
    pub fn byte_len(&self) -> Option<usize> {
        self.count.checked_mul(self.type_code.width())
    }
}

/// Everything the preamble declares about a file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileMetadata {
    /// Array descriptors in file order.
    pub arrays: Vec<ArrayDescriptor>,
    /// Free-text description.
    pub description: String,
}

impl FileMetadata {
    /// Number of arrays.
    #[must_use]
    pub fn narrays(&self) -> usize {
        self.arrays.len()
    }

    /// Look up a descriptor by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArrayDescriptor> {
        self.arrays.iter().find(|a| a.name == name)
    }

    /// Array names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.iter().map(|a| a.name.as_str())
    }

    /// Total payload size in bytes, or `None` on overflow.
    #[must_use]
    pub fn payload_len(&self) -> Option<usize> {
        self.arrays
            .iter()
            .try_fold(0_usize, |acc, a| acc.checked_add(a.byte_len()?))
    }
}
