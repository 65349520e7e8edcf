//! Superdroplet attribute generation per gridbox.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use cleo_config::Constants;
use cleo_model::{Axis, DomainGeometry, GridboxBounds, SuperdropletAttributeSet};
use tracing::{debug, warn};

use super::probdists::RadiusDistribution;
use super::samplers::{AttributeSampler, CoordSampler};
use crate::dimensionalise::check_assignment;
use crate::error::{InitError, Result};

/// Number of superdroplets to create in each gridbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NsupersPerGridbox {
    /// The same count in every gridbox.
    Uniform(usize),
    /// A count per gridbox index; keys must be exactly the gridbox indexes.
    PerGridbox(BTreeMap<usize, usize>),
}

impl NsupersPerGridbox {
    /// Count for each of `ngridboxes` gridboxes, in index order.
    pub fn resolve(&self, ngridboxes: usize) -> Result<Vec<usize>> {
        match self {
            Self::Uniform(n) => Ok(vec![*n; ngridboxes]),
            Self::PerGridbox(map) => {
                if !map.keys().copied().eq(0..ngridboxes) {
                    return Err(InitError::generator(format!(
                        "nsupers keys {:?} do not match the {ngridboxes} gridbox indexes",
                        map.keys().collect::<Vec<_>>()
                    )));
                }
                Ok(map.values().copied().collect())
            }
        }
    }
}

impl From<usize> for NsupersPerGridbox {
    fn from(n: usize) -> Self {
        Self::Uniform(n)
    }
}

/// Generates superdroplet attributes from independent samplers.
///
/// Radii come from `radii`; dry radii from `dryradii`, capped at the radius,
/// give the solute mass; multiplicities follow the probability of each
/// radius under `xiprobdist`. One coordinate sampler per spatial dimension,
/// in z, x, y order.
pub struct AttributeGenerator {
    radii: Box<dyn AttributeSampler>,
    dryradii: Box<dyn AttributeSampler>,
    xiprobdist: Box<dyn RadiusDistribution>,
    coords: Vec<Box<dyn CoordSampler>>,
}

impl AttributeGenerator {
    pub fn new(
        radii: impl AttributeSampler + 'static,
        dryradii: impl AttributeSampler + 'static,
        xiprobdist: impl RadiusDistribution + 'static,
    ) -> Self {
        Self {
            radii: Box::new(radii),
            dryradii: Box::new(dryradii),
            xiprobdist: Box::new(xiprobdist),
            coords: Vec::new(),
        }
    }

    /// Add the sampler for the next spatial dimension.
    #[must_use]
    pub fn with_coord(mut self, sampler: impl CoordSampler + 'static) -> Self {
        self.coords.push(Box::new(sampler));
        self
    }

    /// Number of coordinate samplers.
    #[must_use]
    pub fn ncoords(&self) -> usize {
        self.coords.len()
    }

    /// Solute mass \[kg\] of droplets with `radii` \[m\] and solute density
    /// `rho_sol` \[kg/m^3\].
    #[must_use]
    pub fn mass_solutes(&self, radii: &[f64], rho_sol: f64) -> Vec<f64> {
        let dryradii = self.dryradii.sample(radii.len());
        radii
            .iter()
            .zip(dryradii)
            .map(|(&r, dry)| 4.0 / 3.0 * PI * r.min(dry).powi(3) * rho_sol)
            .collect()
    }

    /// Multiplicities giving about `numconc` \[m^-3\] real droplets in
    /// `volume` \[m^3\]. Any zero multiplicity is an error.
    pub fn multiplicities(&self, radii: &[f64], numconc: f64, volume: f64) -> Result<Vec<u64>> {
        let probs = self.xiprobdist.probabilities(radii);
        let mut xi = Vec::with_capacity(probs.len());
        for p in probs {
            let n = (p * numconc * volume).round_ties_even();
            if !n.is_finite() || n < 0.0 || n >= u64::MAX as f64 {
                return Err(InitError::generator(format!(
                    "multiplicity {n} is not a valid droplet count"
                )));
            }
            // n is a whole number within u64 range
            xi.push(n as u64);
        }
        let zeros = xi.iter().filter(|&&x| x == 0).count();
        if zeros > 0 {
            return Err(InitError::ZeroMultiplicity {
                count: zeros,
                total: xi.len(),
            });
        }
        Ok(xi)
    }

    /// Superdroplets for one gridbox.
    pub fn gridbox(
        &self,
        gbxindex: u32,
        nsupers: usize,
        bounds: &GridboxBounds,
        numconc: f64,
        rho_sol: f64,
    ) -> Result<SuperdropletAttributeSet> {
        let volume = bounds.volume();
        let radius = self.radii.sample(nsupers);
        if radius.len() != nsupers {
            return Err(InitError::shape("radius", nsupers, radius.len()));
        }
        let msol = self.mass_solutes(&radius, rho_sol);
        let xi = self.multiplicities(&radius, numconc, volume)?;
        if nsupers > 0 {
            check_number_concentration(&xi, numconc, volume);
        }

        let mut set = SuperdropletAttributeSet {
            sdgbxindex: vec![gbxindex; nsupers],
            xi,
            radius,
            msol,
            ..Default::default()
        };
        for (axis, sampler) in Axis::ALL.into_iter().zip(&self.coords) {
            let p = axis.position();
            let coords = sampler.sample(nsupers, [bounds.lower[p], bounds.upper[p]]);
            if coords.len() != nsupers {
                return Err(InitError::shape(axis.coord_name(), nsupers, coords.len()));
            }
            match axis {
                Axis::Z => set.coord3 = coords,
                Axis::X => set.coord1 = coords,
                Axis::Y => set.coord2 = coords,
            }
        }
        Ok(set)
    }
}

impl std::fmt::Debug for AttributeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeGenerator")
            .field("ncoords", &self.coords.len())
            .finish_non_exhaustive()
    }
}

fn check_number_concentration(xi: &[u64], numconc: f64, volume: f64) {
    let nreals = (numconc * volume).round_ties_even();
    let calc = xi.iter().map(|&x| x as f64).sum::<f64>();
    let calc_numconc = (calc / volume).round_ties_even();
    if numconc.round_ties_even() != calc_numconc || (nreals - calc).abs() > 0.001 * nreals {
        warn!(
            expected = nreals,
            actual = calc,
            volume,
            "real droplet count drifts from the number concentration"
        );
    }
}

/// Generate superdroplets in every gridbox of `geometry`.
///
/// `numconc` is the number concentration of real droplets \[m^-3\];
/// the solute density is the constant `RHO_SOL`.
pub fn generate_superdroplets(
    generator: &AttributeGenerator,
    geometry: &DomainGeometry,
    nsupers: &NsupersPerGridbox,
    nspacedims: usize,
    numconc: f64,
    constants: &Constants,
) -> Result<SuperdropletAttributeSet> {
    if generator.ncoords() != nspacedims || nspacedims > Axis::ALL.len() {
        return Err(InitError::generator(format!(
            "{} coordinate generators specified but nspacedims = {nspacedims}",
            generator.ncoords()
        )));
    }
    let rho_sol = constants.require("RHO_SOL")?;
    let counts = nsupers.resolve(geometry.ngridboxes())?;

    let mut all = SuperdropletAttributeSet::new();
    for (index, (n, bounds)) in counts.into_iter().zip(geometry.all_bounds()).enumerate() {
        let gbxindex = u32::try_from(index).map_err(|_| {
            InitError::index_assignment(format!("gridbox {index} exceeds the 32-bit gridbox index"))
        })?;
        let set = generator.gridbox(gbxindex, n, &bounds, numconc, rho_sol)?;
        all.extend(set)?;
    }
    check_assignment(&all, geometry)?;

    let volume = geometry.domain_volume();
    debug!(
        nsupers = all.len(),
        numconc_per_cm3 = all.total_multiplicity() as f64 / volume / 1e6,
        volume,
        "generated superdroplets"
    );
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{DiracDelta, EvenlySpaced, Monodisperse};

    fn geometry() -> DomainGeometry {
        DomainGeometry::new(vec![0.0, 10.0, 20.0], vec![0.0, 10.0], vec![0.0, 10.0]).unwrap()
    }

    fn mono(radius: f64) -> AttributeGenerator {
        AttributeGenerator::new(
            Monodisperse::new(radius),
            Monodisperse::new(radius / 2.0),
            DiracDelta::new(radius),
        )
    }

    #[test]
    fn test_nsupers_resolution() {
        assert_eq!(NsupersPerGridbox::Uniform(3).resolve(2).unwrap(), vec![3, 3]);
        let map = BTreeMap::from([(0, 1), (1, 4)]);
        assert_eq!(
            NsupersPerGridbox::PerGridbox(map).resolve(2).unwrap(),
            vec![1, 4]
        );
        let map = BTreeMap::from([(0, 1), (2, 4)]);
        assert!(NsupersPerGridbox::PerGridbox(map).resolve(2).is_err());
    }

    #[test]
    fn test_mass_solutes_cap_dry_radius() {
        let generator = AttributeGenerator::new(
            Monodisperse::new(1e-6),
            Monodisperse::new(2e-6),
            DiracDelta::new(1e-6),
        );
        let msol = generator.mass_solutes(&[1e-6], 1000.0);
        let expected = 4.0 / 3.0 * PI * 1e-18 * 1000.0;
        assert!((msol[0] / expected - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_multiplicities_from_number_concentration() {
        let generator = mono(1e-6);
        let xi = generator
            .multiplicities(&[1e-6, 1e-6], 1e6, 1000.0)
            .unwrap();
        assert_eq!(xi, vec![500_000_000, 500_000_000]);
    }

    #[test]
    fn test_zero_multiplicity_is_an_error() {
        let generator = mono(1e-6);
        let err = generator
            .multiplicities(&[1e-6, 5e-6], 1e6, 1000.0)
            .unwrap_err();
        assert!(matches!(err, InitError::ZeroMultiplicity { count: 1, total: 2 }));
    }

    #[test]
    fn test_generate_in_every_gridbox() {
        let generator = mono(1e-6).with_coord(EvenlySpaced);
        let set = generate_superdroplets(
            &generator,
            &geometry(),
            &NsupersPerGridbox::Uniform(2),
            1,
            1e6,
            &Constants::cleo_defaults(),
        )
        .unwrap();
        assert_eq!(set.sdgbxindex, vec![0, 0, 1, 1]);
        assert_eq!(set.coord3, vec![0.0, 5.0, 10.0, 15.0]);
        assert!(set.coord1.is_empty());
        // 1e6 m^-3 over 1000 m^3 split between two droplets
        assert_eq!(set.xi, vec![500_000_000; 4]);
    }

    #[test]
    fn test_coordinate_generator_count_must_match() {
        let err = generate_superdroplets(
            &mono(1e-6),
            &geometry(),
            &NsupersPerGridbox::Uniform(1),
            1,
            1e6,
            &Constants::cleo_defaults(),
        )
        .unwrap_err();
        assert!(matches!(err, InitError::Generator { .. }));
    }

    #[test]
    fn test_empty_gridboxes() {
        let map = BTreeMap::from([(0, 0), (1, 3)]);
        let set = generate_superdroplets(
            &mono(1e-6),
            &geometry(),
            &NsupersPerGridbox::PerGridbox(map),
            0,
            1e6,
            &Constants::cleo_defaults(),
        )
        .unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.sdgbxindex, vec![1, 1, 1]);
    }
}
