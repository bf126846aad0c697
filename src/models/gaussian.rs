//! Univariate Gaussian emission model
//!
//! Each hidden state emits, per tracked dimension, from a normal distribution.
//! A state/dimension pair may also be left unset (`None`), in which case the
//! density is zero and the state is unreachable for that observation.

use crate::error::{HmmError, HmmResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};
use std::f64::consts::PI;

/// Emission parameters of one state for one dimension; `None` is the unset sentinel
pub type Emission = Option<Gaussian>;

/// Normal distribution with a strictly positive standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct Gaussian {
    mean: f64,
    std: f64,
    normal: Normal,
}

impl Gaussian {
    /// Create a Gaussian from mean and standard deviation.
    ///
    /// Zero, negative and non-finite deviations are rejected: the density is
    /// undefined there and no fallback is substituted.
    pub fn new(mean: f64, std: f64) -> HmmResult<Self> {
        if !mean.is_finite() {
            return Err(HmmError::InvalidInput(format!("non-finite mean: {}", mean)));
        }
        if !std.is_finite() || std <= 0.0 {
            return Err(HmmError::InvalidStdDev { std });
        }
        let normal = Normal::new(mean, std).map_err(|_| HmmError::InvalidStdDev { std })?;
        Ok(Self { mean, std, normal })
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Standard deviation
    pub fn std(&self) -> f64 {
        self.std
    }

    /// Probability density at `x`
    pub fn pdf(&self, x: f64) -> f64 {
        self.normal.pdf(x)
    }

    /// Log probability density at `x`
    pub fn ln_pdf(&self, x: f64) -> f64 {
        self.normal.ln_pdf(x)
    }

    /// Draw a sample (Box-Muller)
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        // 1 - u keeps the argument of ln in (0, 1]
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        self.mean + self.std * z
    }
}

impl TryFrom<(f64, f64)> for Gaussian {
    type Error = HmmError;

    fn try_from((mean, std): (f64, f64)) -> HmmResult<Self> {
        Self::new(mean, std)
    }
}

impl From<Gaussian> for (f64, f64) {
    fn from(g: Gaussian) -> Self {
        (g.mean, g.std)
    }
}

/// Density of `x` under `emission`; 0 when the emission is unset
pub fn density(x: f64, emission: &Emission) -> f64 {
    emission.as_ref().map_or(0.0, |g| g.pdf(x))
}

/// Log density of `x` under `emission`; `-inf` when the emission is unset
pub fn log_density(x: f64, emission: &Emission) -> f64 {
    emission.as_ref().map_or(f64::NEG_INFINITY, |g| g.ln_pdf(x))
}

/// Joint density of a D-dimensional observation.
///
/// Dimensions are treated as conditionally independent given the state, so
/// the joint density is the product of the per-dimension densities.
pub fn joint_density<const D: usize>(x: &[f64; D], emissions: &[Emission; D]) -> f64 {
    x.iter()
        .zip(emissions.iter())
        .map(|(&xi, e)| density(xi, e))
        .product()
}

/// Log of [`joint_density`], accumulated as a sum of per-dimension log densities
pub fn joint_log_density<const D: usize>(x: &[f64; D], emissions: &[Emission; D]) -> f64 {
    x.iter()
        .zip(emissions.iter())
        .map(|(&xi, e)| log_density(xi, e))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn closed_form(x: f64, mean: f64, std: f64) -> f64 {
        (2.0 * PI * std * std).powf(-0.5) * (-(x - mean).powi(2) / (2.0 * std * std)).exp()
    }

    #[test]
    fn test_density_matches_closed_form() {
        let g = Gaussian::new(5.0, 0.5).unwrap();
        for &x in &[4.0, 5.0, 5.3, 7.0] {
            let expected = closed_form(x, 5.0, 0.5);
            assert_relative_eq!(density(x, &Some(g)), expected, epsilon = 1e-12);
            assert_relative_eq!(log_density(x, &Some(g)), expected.ln(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_pdf_peaks_at_mean() {
        let g = Gaussian::new(0.0, 1.0).unwrap();
        assert!(g.pdf(0.0) > g.pdf(1.0));
        assert_relative_eq!(g.pdf(1.0), g.pdf(-1.0), epsilon = 1e-15);
    }

    #[test]
    fn test_unset_emission() {
        assert_eq!(density(1.0, &None), 0.0);
        assert_eq!(log_density(1.0, &None), f64::NEG_INFINITY);
    }

    #[test]
    fn test_rejects_degenerate_std() {
        assert_eq!(Gaussian::new(0.0, 0.0), Err(HmmError::InvalidStdDev { std: 0.0 }));
        assert!(Gaussian::new(0.0, -1.0).is_err());
        assert!(Gaussian::new(0.0, f64::NAN).is_err());
        assert!(Gaussian::new(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_joint_density_is_product() {
        let emissions = [
            Some(Gaussian::new(1.0, 0.5).unwrap()),
            Some(Gaussian::new(-2.0, 2.0).unwrap()),
        ];
        let x = [1.2, -1.0];
        let expected = closed_form(1.2, 1.0, 0.5) * closed_form(-1.0, -2.0, 2.0);
        assert_relative_eq!(joint_density(&x, &emissions), expected, epsilon = 1e-12);
        assert_relative_eq!(joint_log_density(&x, &emissions), expected.ln(), epsilon = 1e-9);
    }

    #[test]
    fn test_joint_density_with_unset_dimension() {
        let emissions = [Some(Gaussian::new(0.0, 1.0).unwrap()), None];
        assert_eq!(joint_density(&[0.0, 0.0], &emissions), 0.0);
    }

    #[test]
    fn test_serde_rejects_zero_std() {
        let g: Gaussian = serde_json::from_str("[2.5,0.25]").unwrap();
        assert_eq!(g.mean(), 2.5);
        assert_eq!(g.std(), 0.25);
        assert!(serde_json::from_str::<Gaussian>("[2.5,0.0]").is_err());
        assert_eq!(serde_json::to_string(&g).unwrap(), "[2.5,0.25]");
    }

    #[test]
    fn test_sample_mean() {
        let g = Gaussian::new(3.0, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let n = 5000;
        let mean = (0..n).map(|_| g.sample(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - 3.0).abs() < 0.05);
    }
}
