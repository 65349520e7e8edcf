//! Superdroplet attributes.

use cleo_binary::{ArraySet, NamedArray};
use cleo_config::Constants;
use cleo_model::{Axis, DomainGeometry, SuperdropletAttributeSet};
use tracing::debug;

use super::{Dimensionaliser, coord_scale, scaled, scaled_by};
use crate::error::{InitError, Result};
use crate::shape::validate_consistent;

/// Dimensionaliser for the initial superdroplets file.
///
/// Merges batches of superdroplets into one set (all droplets kept), checks
/// every droplet lies inside the gridbox it is assigned to, and produces
/// `sdgbxindex` (`I`), `xi` (`Q`), `radius`, `msol` and the present
/// coordinates (`d`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuperdropletAttributes {
    expected_total: Option<usize>,
    nspacedims: Option<usize>,
}

impl SuperdropletAttributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require exactly `total` superdroplets after merging.
    #[must_use]
    pub fn with_expected_total(mut self, total: usize) -> Self {
        self.expected_total = Some(total);
        self
    }

    /// Require `nspacedims` coordinates per superdroplet.
    #[must_use]
    pub fn with_nspacedims(mut self, nspacedims: usize) -> Self {
        self.nspacedims = Some(nspacedims);
        self
    }

    /// Check attribute lengths and coordinate presence; returns the number
    /// of superdroplets.
    fn check_lists(&self, set: &SuperdropletAttributeSet) -> Result<usize> {
        let len = validate_consistent(set.lengths())?;
        let present = Axis::ALL
            .into_iter()
            .filter(|&a| !set.coords(a).is_empty())
            .count();
        let leading = set.nspacedims();
        if present != leading {
            return Err(InitError::shape("nspacedims", leading, present));
        }
        if let Some(n) = self.nspacedims
            && len > 0
            && n != leading
        {
            return Err(InitError::shape("nspacedims", n, leading));
        }
        Ok(len)
    }
}

/// Check every droplet's gridbox index and coordinates.
pub(crate) fn check_assignment(
    set: &SuperdropletAttributeSet,
    geometry: &DomainGeometry,
) -> Result<()> {
    let ngridboxes = geometry.ngridboxes();
    for (i, droplet) in set.iter().enumerate() {
        let index = droplet.sdgbxindex as usize;
        if index >= ngridboxes {
            return Err(InitError::index_assignment(format!(
                "superdroplet {i} assigned to gridbox {index}, but there are {ngridboxes} gridboxes"
            )));
        }
        let bounds = geometry.gridbox_bounds(index)?;
        for axis in Axis::ALL {
            let Some(coord) = droplet.coords[axis.position()] else {
                continue;
            };
            if !bounds.contains(axis, coord) {
                let p = axis.position();
                return Err(InitError::index_assignment(format!(
                    "superdroplet {i} {} = {coord} lies outside gridbox {index} [{}, {})",
                    axis.coord_name(),
                    bounds.lower[p],
                    bounds.upper[p]
                )));
            }
        }
    }
    Ok(())
}

impl Dimensionaliser for SuperdropletAttributes {
    type Input = [SuperdropletAttributeSet];
    type Context = DomainGeometry;

    fn kind(&self) -> &'static str {
        "superdroplets"
    }

    fn build(
        &self,
        input: &[SuperdropletAttributeSet],
        geometry: &DomainGeometry,
        constants: &Constants,
    ) -> Result<ArraySet> {
        for batch in input {
            self.check_lists(batch)?;
        }
        let set = SuperdropletAttributeSet::merge(input.iter().cloned())?;
        let len = self.check_lists(&set)?;
        if let Some(total) = self.expected_total
            && total != len
        {
            return Err(InitError::shape("superdroplets", total, len));
        }
        check_assignment(&set, geometry)?;

        let mut arrays = vec![
            NamedArray::uint32("sdgbxindex", set.sdgbxindex.clone()),
            NamedArray::uint64("xi", set.xi.clone()),
            scaled("radius", &set.radius, constants)?,
            scaled("msol", &set.msol, constants)?,
        ];
        let nspacedims = set.nspacedims();
        if nspacedims > 0 {
            let coord0 = coord_scale(constants)?;
            for axis in Axis::ALL.into_iter().take(nspacedims) {
                arrays.push(scaled_by(axis.coord_name(), set.coords(axis), coord0));
            }
        }
        debug!(
            nsupers = set.len(),
            nspacedims,
            batches = input.len(),
            "built superdroplet attributes"
        );
        Ok(ArraySet::from_arrays(arrays)?)
    }
}
