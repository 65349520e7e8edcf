//! Thermodynamic fields.

use cleo_binary::ArraySet;
use cleo_config::Constants;
use cleo_model::{DomainGeometry, ThermoVariable, ThermodynamicFieldSet, expected_field_len};
use tracing::debug;

use super::{Dimensionaliser, scaled};
use crate::error::{InitError, Result};

/// Mesh size and number of coupling steps the fields must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThermoContext {
    /// Cells along `[z, x, y]`.
    pub ndims: [usize; 3],
    pub ntimesteps: usize,
}

impl ThermoContext {
    #[must_use]
    pub fn new(ndims: [usize; 3], ntimesteps: usize) -> Self {
        Self { ndims, ntimesteps }
    }

    #[must_use]
    pub fn from_geometry(geometry: &DomainGeometry, ntimesteps: usize) -> Self {
        Self::new(geometry.ndims(), ntimesteps)
    }

    /// Expected length of `variable`.
    #[must_use]
    pub fn expected_len(&self, variable: ThermoVariable) -> usize {
        expected_field_len(variable, self.ndims, self.ntimesteps)
    }
}

/// Dimensionaliser for thermodynamic fields.
///
/// Scalars (`press`, `temp`, `qvap`, `qcond`) live on gridbox centres and
/// must hold `ngridboxes * ntimesteps` values. A wind component lives on the
/// faces normal to its axis; it is optional, and an empty wind is treated
/// as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thermodynamics;

impl Thermodynamics {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Check every present field has its staggered length.
    pub fn validate(&self, fields: &ThermodynamicFieldSet, context: &ThermoContext) -> Result<()> {
        if fields.ntimesteps != context.ntimesteps {
            return Err(InitError::shape(
                "ntimesteps",
                context.ntimesteps,
                fields.ntimesteps,
            ));
        }
        for (variable, values) in present_fields(fields) {
            let expected = context.expected_len(variable);
            if values.len() != expected {
                return Err(InitError::shape(variable.as_str(), expected, values.len()));
            }
        }
        Ok(())
    }
}

/// Scalars always, winds only when non-empty.
fn present_fields(fields: &ThermodynamicFieldSet) -> impl Iterator<Item = (ThermoVariable, &[f64])> {
    fields
        .fields()
        .filter(|(v, values)| v.staggered_axis().is_none() || !values.is_empty())
}

impl Dimensionaliser for Thermodynamics {
    type Input = ThermodynamicFieldSet;
    type Context = ThermoContext;

    fn kind(&self) -> &'static str {
        "thermodynamics"
    }

    fn build(
        &self,
        input: &ThermodynamicFieldSet,
        context: &ThermoContext,
        constants: &Constants,
    ) -> Result<ArraySet> {
        self.validate(input, context)?;
        let mut arrays = ArraySet::new();
        for (variable, values) in present_fields(input) {
            arrays.push(scaled(variable.as_str(), values, constants)?)?;
        }
        debug!(
            ndims = ?context.ndims,
            ntimesteps = context.ntimesteps,
            nfields = arrays.len(),
            "built thermodynamic fields"
        );
        Ok(arrays)
    }
}
