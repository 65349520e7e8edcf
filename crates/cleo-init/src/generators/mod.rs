//! Generators for superdroplet attributes.
//!
//! An [`AttributeGenerator`] combines a radius sampler, a dry-radius
//! sampler, a [`RadiusDistribution`] for multiplicities and up to three
//! coordinate samplers. [`generate_superdroplets`] runs it over every
//! gridbox of a domain. Random samplers take an explicit seed.

mod attrs;
mod probdists;
mod samplers;

pub use attrs::{AttributeGenerator, NsupersPerGridbox, generate_superdroplets};
pub use probdists::{
    CloudDropsGamma, CombinedDistribution, DiracDelta, LnNormal, LnNormalMode, RadiusDistribution,
    RainDropsGamma, VolExponential,
};
pub use samplers::{
    AttributeSampler, CoordSampler, EvenlySpaced, Log10BinCentres, MonoCoord, Monodisperse,
    RandomLog10Bins, RandomUniform,
};
