//! Superdroplet attributes, stored as aligned per-attribute lists.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::geometry::Axis;

/// One superdroplet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Superdroplet {
    pub sdgbxindex: u32,
    pub xi: u64,
    /// Radius \[m\].
    pub radius: f64,
    /// Solute mass \[kg\].
    pub msol: f64,
    /// Coordinates `[coord3, coord1, coord2]` \[m\]; trailing entries are
    /// `None` in domains with fewer spatial dimensions.
    pub coords: [Option<f64>; 3],
}

/// Superdroplet attributes as parallel lists.
///
/// `coord3`, `coord1` and `coord2` are present (non-empty) for 1, 2 and 3
/// spatial dimensions respectively. Overlapping gridbox assignments across
/// merged sets are additive: every droplet is kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuperdropletAttributeSet {
    pub sdgbxindex: Vec<u32>,
    pub xi: Vec<u64>,
    pub radius: Vec<f64>,
    pub msol: Vec<f64>,
    #[serde(default)]
    pub coord3: Vec<f64>,
    #[serde(default)]
    pub coord1: Vec<f64>,
    #[serde(default)]
    pub coord2: Vec<f64>,
}

impl SuperdropletAttributeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of superdroplets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sdgbxindex.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sdgbxindex.is_empty()
    }

    /// Coordinate list along `axis`.
    #[must_use]
    pub fn coords(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Z => &self.coord3,
            Axis::X => &self.coord1,
            Axis::Y => &self.coord2,
        }
    }

    fn coords_mut(&mut self, axis: Axis) -> &mut Vec<f64> {
        match axis {
            Axis::Z => &mut self.coord3,
            Axis::X => &mut self.coord1,
            Axis::Y => &mut self.coord2,
        }
    }

    /// Number of leading coordinate lists that are non-empty.
    #[must_use]
    pub fn nspacedims(&self) -> usize {
        Axis::ALL
            .into_iter()
            .take_while(|&a| !self.coords(a).is_empty())
            .count()
    }

    /// Name and length of every attribute list, coordinates included only
    /// when present.
    #[must_use]
    pub fn lengths(&self) -> Vec<(&'static str, usize)> {
        let mut out = vec![
            ("sdgbxindex", self.sdgbxindex.len()),
            ("xi", self.xi.len()),
            ("radius", self.radius.len()),
            ("msol", self.msol.len()),
        ];
        for axis in Axis::ALL {
            let coords = self.coords(axis);
            if !coords.is_empty() {
                out.push((axis.coord_name(), coords.len()));
            }
        }
        out
    }

    /// Append one superdroplet.
    pub fn push(&mut self, droplet: Superdroplet) {
        self.sdgbxindex.push(droplet.sdgbxindex);
        self.xi.push(droplet.xi);
        self.radius.push(droplet.radius);
        self.msol.push(droplet.msol);
        for axis in Axis::ALL {
            if let Some(c) = droplet.coords[axis.position()] {
                self.coords_mut(axis).push(c);
            }
        }
    }

    /// Superdroplet at `index`, if every list has an entry there.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Superdroplet> {
        Some(Superdroplet {
            sdgbxindex: *self.sdgbxindex.get(index)?,
            xi: *self.xi.get(index)?,
            radius: *self.radius.get(index)?,
            msol: *self.msol.get(index)?,
            coords: Axis::ALL.map(|a| self.coords(a).get(index).copied()),
        })
    }

    /// Iterate over superdroplets.
    pub fn iter(&self) -> impl Iterator<Item = Superdroplet> + '_ {
        (0..self.len()).map_while(|i| self.get(i))
    }

    /// Append every superdroplet of `other`.
    ///
    /// Both sets must have the same number of spatial dimensions unless one
    /// of them is empty.
    pub fn extend(&mut self, other: SuperdropletAttributeSet) -> Result<()> {
        if !self.is_empty() && !other.is_empty() && self.nspacedims() != other.nspacedims() {
            return Err(ModelError::shape(
                "nspacedims",
                self.nspacedims(),
                other.nspacedims(),
            ));
        }
        self.sdgbxindex.extend(other.sdgbxindex);
        self.xi.extend(other.xi);
        self.radius.extend(other.radius);
        self.msol.extend(other.msol);
        self.coord3.extend(other.coord3);
        self.coord1.extend(other.coord1);
        self.coord2.extend(other.coord2);
        Ok(())
    }

    /// Merge batches into one set, in order.
    pub fn merge(batches: impl IntoIterator<Item = SuperdropletAttributeSet>) -> Result<Self> {
        let mut merged = Self::new();
        for batch in batches {
            merged.extend(batch)?;
        }
        Ok(merged)
    }

    /// Total multiplicity (number of real droplets represented).
    #[must_use]
    pub fn total_multiplicity(&self) -> u128 {
        self.xi.iter().map(|&x| u128::from(x)).sum()
    }
}
