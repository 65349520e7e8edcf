//! Radius probability distributions.
//!
//! Every distribution returns one probability per radius, normalised so the
//! probabilities sum to 1 over the sample. A sample whose unnormalised
//! weights are all zero is returned unchanged.

use crate::error::{InitError, Result};

/// Relative probability of each radius in a sample.
pub trait RadiusDistribution {
    /// Normalised probabilities for `radii` \[m\].
    fn probabilities(&self, radii: &[f64]) -> Vec<f64>;
}

fn normalise(mut weights: Vec<f64>) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total != 0.0 {
        for w in &mut weights {
            *w /= total;
        }
    }
    weights
}

/// All probability on the radius (or radii) closest to `r0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiracDelta {
    pub r0: f64,
}

impl DiracDelta {
    #[must_use]
    pub fn new(r0: f64) -> Self {
        Self { r0 }
    }
}

impl RadiusDistribution for DiracDelta {
    fn probabilities(&self, radii: &[f64]) -> Vec<f64> {
        let diffs: Vec<f64> = radii.iter().map(|r| (r - self.r0).abs()).collect();
        let closest = diffs.iter().copied().fold(f64::INFINITY, f64::min);
        normalise(
            diffs
                .iter()
                .map(|&d| if d == closest { 1.0 } else { 0.0 })
                .collect(),
        )
    }
}

/// Volume exponential distribution with peak `radius0`, weighted by the
/// log-width of the sampled radius span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolExponential {
    pub radius0: f64,
    /// `[min, max]` radii sampled \[m\].
    pub rspan: [f64; 2],
}

impl VolExponential {
    #[must_use]
    pub fn new(radius0: f64, rspan: [f64; 2]) -> Self {
        Self { radius0, rspan }
    }
}

impl RadiusDistribution for VolExponential {
    fn probabilities(&self, radii: &[f64]) -> Vec<f64> {
        let rwidth = (self.rspan[1] / self.rspan[0]).ln();
        normalise(
            radii
                .iter()
                .map(|&r| rwidth * r.powi(3) * (-(r / self.radius0).powi(3)).exp())
                .collect(),
        )
    }
}

/// One lognormal mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LnNormalMode {
    /// Geometric mean radius \[m\].
    pub geomean: f64,
    /// Geometric standard deviation.
    pub geosig: f64,
    /// Relative height of the mode.
    pub scalefac: f64,
}

/// Sum of lognormal modes, `dn/dln(r)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LnNormal {
    modes: Vec<LnNormalMode>,
}

impl LnNormal {
    #[must_use]
    pub fn new(modes: Vec<LnNormalMode>) -> Self {
        Self { modes }
    }

    /// Build from parallel parameter lists, which must have equal lengths.
    pub fn from_params(geomeans: &[f64], geosigs: &[f64], scalefacs: &[f64]) -> Result<Self> {
        if geomeans.len() != geosigs.len() || geomeans.len() != scalefacs.len() {
            return Err(InitError::generator(format!(
                "inconsistent lognormal modes: {} geomeans, {} geosigs, {} scalefacs",
                geomeans.len(),
                geosigs.len(),
                scalefacs.len()
            )));
        }
        let modes = geomeans
            .iter()
            .zip(geosigs)
            .zip(scalefacs)
            .map(|((&geomean, &geosig), &scalefac)| LnNormalMode {
                geomean,
                geosig,
                scalefac,
            })
            .collect();
        Ok(Self::new(modes))
    }

    #[must_use]
    pub fn modes(&self) -> &[LnNormalMode] {
        &self.modes
    }

    fn density(mode: &LnNormalMode, r: f64) -> f64 {
        let sigtilda = mode.geosig.ln();
        let mutilda = mode.geomean.ln();
        let norm = mode.scalefac / ((2.0 * std::f64::consts::PI).sqrt() * sigtilda);
        let exponent = -(r.ln() - mutilda).powi(2) / (2.0 * sigtilda.powi(2));
        norm * exponent.exp()
    }
}

impl RadiusDistribution for LnNormal {
    fn probabilities(&self, radii: &[f64]) -> Vec<f64> {
        normalise(
            radii
                .iter()
                .map(|&r| self.modes.iter().map(|m| Self::density(m, r)).sum())
                .collect(),
        )
    }
}

/// Gamma distribution for cloud droplets with effective radius `reff` and
/// effective variance `nueff`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudDropsGamma {
    pub reff: f64,
    pub nueff: f64,
}

impl RadiusDistribution for CloudDropsGamma {
    fn probabilities(&self, radii: &[f64]) -> Vec<f64> {
        // the normalising constant cancels
        let power = (1.0 - 3.0 * self.nueff) / self.nueff;
        let scale = self.reff * self.nueff;
        normalise(
            radii
                .iter()
                .map(|&r| r.powf(power) * (-r / scale).exp())
                .collect(),
        )
    }
}

/// Gamma distribution for raindrops from concentration `nrain`
/// \[m^-3\], rain water content `qrain` \[g/m^3\] and volume mean diameter
/// `dvol` \[m\].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainDropsGamma {
    pub nrain: f64,
    pub qrain: f64,
    pub dvol: f64,
}

impl RadiusDistribution for RainDropsGamma {
    fn probabilities(&self, radii: &[f64]) -> Vec<f64> {
        let nu = 18.0 / (self.nrain * self.qrain).powf(0.25);
        let lamda = (nu * (nu + 1.0) * (nu + 2.0)).cbrt() / self.dvol;
        normalise(
            radii
                .iter()
                .map(|&r| {
                    let diam = 2.0 * r;
                    diam.powf(nu - 1.0) * (-lamda * diam).exp()
                })
                .collect(),
        )
    }
}

/// Weighted sum of distributions, renormalised.
#[derive(Default)]
pub struct CombinedDistribution {
    parts: Vec<(Box<dyn RadiusDistribution>, f64)>,
}

impl CombinedDistribution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `distribution` with relative height `scalefac`.
    #[must_use]
    pub fn with(mut self, distribution: impl RadiusDistribution + 'static, scalefac: f64) -> Self {
        self.parts.push((Box::new(distribution), scalefac));
        self
    }
}

impl RadiusDistribution for CombinedDistribution {
    fn probabilities(&self, radii: &[f64]) -> Vec<f64> {
        let mut probs = vec![0.0; radii.len()];
        for (distribution, scalefac) in &self.parts {
            for (p, q) in probs.iter_mut().zip(distribution.probabilities(radii)) {
                *p += scalefac * q;
            }
        }
        normalise(probs)
    }
}

impl std::fmt::Debug for CombinedDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedDistribution")
            .field("parts", &self.parts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_normalised(probs: &[f64]) {
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-12, "sum = {total}");
    }

    #[test]
    fn test_dirac_delta_picks_closest() {
        let probs = DiracDelta::new(2.1e-6).probabilities(&[1e-6, 2e-6, 3e-6]);
        assert_eq!(probs, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_dirac_delta_shares_ties() {
        let probs = DiracDelta::new(1e-6).probabilities(&[1e-6, 1e-6, 5e-6]);
        assert_eq!(probs, vec![0.5, 0.5, 0.0]);
        assert!(DiracDelta::new(1e-6).probabilities(&[]).is_empty());
    }

    #[test]
    fn test_vol_exponential_normalised() {
        let radii = [1e-6, 1e-5, 3e-5, 1e-4];
        let probs = VolExponential::new(30.531e-6, [1e-8, 1e-4]).probabilities(&radii);
        assert_normalised(&probs);
        // r^3 growth wins until near the peak radius
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_lnnormal_peaks_at_geomean() {
        let dist = LnNormal::from_params(&[1e-6], &[1.5], &[1.0]).unwrap();
        let probs = dist.probabilities(&[0.5e-6, 1e-6, 2e-6]);
        assert_normalised(&probs);
        assert!(probs[1] > probs[0]);
        assert!(probs[1] > probs[2]);
        // symmetric in ln(r)
        assert!((probs[0] - probs[2]).abs() < 1e-12);
    }

    #[test]
    fn test_lnnormal_rejects_ragged_params() {
        assert!(LnNormal::from_params(&[1e-6, 2e-6], &[1.5], &[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_gamma_distributions_normalised() {
        let radii = [1e-6, 5e-6, 1e-5, 2e-5];
        assert_normalised(
            &CloudDropsGamma {
                reff: 7e-6,
                nueff: 0.08,
            }
            .probabilities(&radii),
        );
        let radii = [1e-4, 4e-4, 1e-3];
        assert_normalised(
            &RainDropsGamma {
                nrain: 3000.0,
                qrain: 0.9,
                dvol: 800e-6,
            }
            .probabilities(&radii),
        );
    }

    #[test]
    fn test_combined_weights() {
        let radii = [1e-6, 2e-6];
        let dist = CombinedDistribution::new()
            .with(DiracDelta::new(1e-6), 3.0)
            .with(DiracDelta::new(2e-6), 1.0);
        let probs = dist.probabilities(&radii);
        assert_eq!(probs, vec![0.75, 0.25]);
    }
}
