//! Radius and coordinate samplers.
//!
//! The random samplers own a [`StdRng`] seeded explicitly, so the same seed
//! gives the same superdroplets.

use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates one value per superdroplet in a gridbox, e.g. radii or dry
/// radii \[m\].
pub trait AttributeSampler {
    fn sample(&self, nsupers: usize) -> Vec<f64>;
}

/// Generates coordinates \[m\] inside `[min, max)` along one axis.
pub trait CoordSampler {
    fn sample(&self, nsupers: usize, range: [f64; 2]) -> Vec<f64>;
}

/// Every superdroplet gets `attr0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monodisperse {
    pub attr0: f64,
}

impl Monodisperse {
    #[must_use]
    pub fn new(attr0: f64) -> Self {
        Self { attr0 }
    }
}

impl AttributeSampler for Monodisperse {
    fn sample(&self, nsupers: usize) -> Vec<f64> {
        vec![self.attr0; nsupers]
    }
}

/// Radii at the centres of `nsupers` bins evenly spaced in `log10(r)`
/// across `rspan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Log10BinCentres {
    /// `[min, max]` radius \[m\].
    pub rspan: [f64; 2],
}

impl Log10BinCentres {
    #[must_use]
    pub fn new(rspan: [f64; 2]) -> Self {
        Self { rspan }
    }

    /// The `nsupers + 1` bin edges in `log10(r)`.
    #[must_use]
    pub fn log10_edges(&self, nsupers: usize) -> Vec<f64> {
        log10_edges(self.rspan, nsupers)
    }
}

fn log10_edges(rspan: [f64; 2], nbins: usize) -> Vec<f64> {
    let lo = rspan[0].log10();
    let hi = rspan[1].log10();
    if nbins == 0 {
        return vec![lo];
    }
    let step = (hi - lo) / nbins as f64;
    (0..=nbins)
        .map(|i| if i == nbins { hi } else { lo + i as f64 * step })
        .collect()
}

impl AttributeSampler for Log10BinCentres {
    fn sample(&self, nsupers: usize) -> Vec<f64> {
        self.log10_edges(nsupers)
            .windows(2)
            .map(|w| 10_f64.powf((w[0] + w[1]) / 2.0))
            .collect()
    }
}

/// One radius drawn uniformly in `log10(r)` from each of `nsupers` bins
/// evenly spaced in `log10(r)` across `rspan`.
#[derive(Debug, Clone)]
pub struct RandomLog10Bins {
    /// `[min, max]` radius \[m\].
    pub rspan: [f64; 2],
    rng: RefCell<StdRng>,
}

impl RandomLog10Bins {
    #[must_use]
    pub fn new(rspan: [f64; 2], seed: u64) -> Self {
        Self {
            rspan,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl AttributeSampler for RandomLog10Bins {
    fn sample(&self, nsupers: usize) -> Vec<f64> {
        let mut rng = self.rng.borrow_mut();
        log10_edges(self.rspan, nsupers)
            .windows(2)
            .map(|w| {
                let u: f64 = rng.random();
                10_f64.powf(w[0] + u * (w[1] - w[0]))
            })
            .collect()
    }
}

/// Every superdroplet at `coord0`, or none when `coord0` lies outside the
/// sampled range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonoCoord {
    pub coord0: f64,
}

impl MonoCoord {
    #[must_use]
    pub fn new(coord0: f64) -> Self {
        Self { coord0 }
    }
}

impl CoordSampler for MonoCoord {
    fn sample(&self, nsupers: usize, range: [f64; 2]) -> Vec<f64> {
        if range[0] <= self.coord0 && self.coord0 < range[1] {
            vec![self.coord0; nsupers]
        } else {
            Vec::new()
        }
    }
}

/// `nsupers` evenly spaced coordinates starting at the lower bound, the
/// upper bound excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvenlySpaced;

impl CoordSampler for EvenlySpaced {
    fn sample(&self, nsupers: usize, range: [f64; 2]) -> Vec<f64> {
        let step = (range[1] - range[0]) / nsupers.max(1) as f64;
        (0..nsupers).map(|i| range[0] + i as f64 * step).collect()
    }
}

/// `nsupers` coordinates drawn uniformly from `[min, max)`.
#[derive(Debug, Clone)]
pub struct RandomUniform {
    rng: RefCell<StdRng>,
}

impl RandomUniform {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl CoordSampler for RandomUniform {
    fn sample(&self, nsupers: usize, range: [f64; 2]) -> Vec<f64> {
        if !(range[0].is_finite() && range[1].is_finite()) || range[0] >= range[1] {
            return vec![range[0]; nsupers];
        }
        let mut rng = self.rng.borrow_mut();
        (0..nsupers)
            .map(|_| rng.random_range(range[0]..range[1]))
            .collect()
    }
}
