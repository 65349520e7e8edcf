//! Ordered collections of named arrays.

use super::NamedArray;
use crate::error::{BinaryError, Result};

/// Ordered set of arrays with unique names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArraySet {
    arrays: Vec<NamedArray>,
}

impl ArraySet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, rejecting duplicate names.
    pub fn from_arrays(arrays: Vec<NamedArray>) -> Result<Self> {
        let mut set = Self::new();
        for array in arrays {
            set.push(array)?;
        }
        Ok(set)
    }

    /// Append an array.
    pub fn push(&mut self, array: NamedArray) -> Result<()> {
        if self.contains(&array.name) {
            return Err(BinaryError::duplicate_array(array.name));
        }
        self.arrays.push(array);
        Ok(())
    }

    /// Append every array of `other`.
    pub fn extend(&mut self, other: ArraySet) -> Result<()> {
        for array in other.arrays {
            self.push(array)?;
        }
        Ok(())
    }

    /// True when an array with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up an array by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NamedArray> {
        self.arrays.iter().find(|a| a.name == name)
    }

    /// Look up an array by name, failing with `UnknownArray`.
    pub fn require(&self, name: &str) -> Result<&NamedArray> {
        self.get(name).ok_or_else(|| BinaryError::unknown_array(name))
    }

    /// Remove and return an array by name.
    pub fn take(&mut self, name: &str) -> Option<NamedArray> {
        let pos = self.arrays.iter().position(|a| a.name == name)?;
        Some(self.arrays.remove(pos))
    }

    /// Array names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.iter().map(|a| a.name.as_str())
    }

    /// Iterate over arrays in order.
    pub fn iter(&self) -> std::slice::Iter<'_, NamedArray> {
        self.arrays.iter()
    }

    /// Borrow arrays as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[NamedArray] {
        &self.arrays
    }

    /// Number of arrays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// True when there are no arrays.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Consume the set, returning the arrays in order.
    #[must_use]
    pub fn into_vec(self) -> Vec<NamedArray> {
        self.arrays
    }
}

impl<'a> IntoIterator for &'a ArraySet {
    type Item = &'a NamedArray;
    type IntoIter = std::slice::Iter<'a, NamedArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.arrays.iter()
    }
}

impl IntoIterator for ArraySet {
    type Item = NamedArray;
    type IntoIter = std::vec::IntoIter<NamedArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.arrays.into_iter()
    }
}
