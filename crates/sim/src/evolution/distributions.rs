//! Magnitude and noise distributions for the stochastic operators.
//!
//! Mutation magnitudes and environmental noise are drawn from small,
//! validated distribution models. The serde-facing configuration enum keeps
//! raw parameters; `sampler()` pre-builds the `rand_distr` sampler once so
//! the hot loops never re-validate.

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::errors::DistributionError;

/// Configuration of a mutation-magnitude distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MagnitudeModel {
    /// Gaussian magnitudes centered on `mean` with `std_dev >= 0`.
    Normal { mean: f64, std_dev: f64 },
    /// Uniform magnitudes over `[low, high)`.
    Uniform { low: f64, high: f64 },
}

impl MagnitudeModel {
    /// Zero-magnitude draws; handy for switching a channel off.
    pub fn zero() -> Self {
        Self::Normal {
            mean: 0.0,
            std_dev: 0.0,
        }
    }

    /// Build the sampler, validating parameters.
    pub fn sampler(&self) -> Result<MagnitudeSampler, DistributionError> {
        match *self {
            Self::Normal { mean, std_dev } => {
                if !mean.is_finite() {
                    return Err(DistributionError::InvalidParameter("mean", mean));
                }
                let normal = Normal::new(mean, std_dev)
                    .map_err(|_| DistributionError::InvalidParameter("std_dev", std_dev))?;
                Ok(MagnitudeSampler::Normal(normal))
            }
            Self::Uniform { low, high } => {
                if !low.is_finite() {
                    return Err(DistributionError::InvalidParameter("low", low));
                }
                if !high.is_finite() {
                    return Err(DistributionError::InvalidParameter("high", high));
                }
                let uniform =
                    Uniform::new(low, high).map_err(|_| DistributionError::EmptyRange { low, high })?;
                Ok(MagnitudeSampler::Uniform(uniform))
            }
        }
    }
}

/// Pre-built magnitude sampler.
#[derive(Debug, Clone, Copy)]
pub enum MagnitudeSampler {
    Normal(Normal<f64>),
    Uniform(Uniform<f64>),
}

impl MagnitudeSampler {
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Normal(d) => d.sample(rng),
            Self::Uniform(d) => d.sample(rng),
        }
    }
}

/// Environmental-noise model: zero-mean Gaussian with configurable spread.
///
/// One scalar draw per fitness evaluation, broadcast across the phenotype
/// vector. `std_dev = 0` makes evaluation deterministic.
#[derive(Debug, Clone, Copy)]
pub struct NoiseModel {
    std_dev: f64,
    normal: Normal<f64>,
}

impl NoiseModel {
    pub fn new(std_dev: f64) -> Result<Self, DistributionError> {
        let normal = Normal::new(0.0, std_dev)
            .map_err(|_| DistributionError::InvalidParameter("noise_std", std_dev))?;
        Ok(Self { std_dev, normal })
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    #[inline]
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.normal.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_normal_magnitude_rejects_negative_std() {
        let model = MagnitudeModel::Normal {
            mean: 0.0,
            std_dev: -1.0,
        };
        assert!(model.sampler().is_err());
    }

    #[test]
    fn test_uniform_magnitude_rejects_reversed_range() {
        let model = MagnitudeModel::Uniform {
            low: 1.0,
            high: 0.0,
        };
        assert!(model.sampler().is_err());
    }

    #[test]
    fn test_zero_model_draws_zero() {
        let sampler = MagnitudeModel::zero().sampler().unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(sampler.sample(&mut rng), 0.0);
        }
    }

    #[test]
    fn test_uniform_magnitude_stays_in_range() {
        let sampler = MagnitudeModel::Uniform {
            low: -0.5,
            high: 0.5,
        }
        .sampler()
        .unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        for _ in 0..100 {
            let x = sampler.sample(&mut rng);
            assert!((-0.5..0.5).contains(&x));
        }
    }

    #[test]
    fn test_noise_zero_std_is_deterministic() {
        let noise = NoiseModel::new(0.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        assert_eq!(noise.draw(&mut rng), 0.0);
    }

    #[test]
    fn test_noise_rejects_negative_std() {
        assert!(NoiseModel::new(-0.1).is_err());
    }

    #[test]
    fn test_magnitude_model_serde_roundtrip() {
        let model = MagnitudeModel::Normal {
            mean: 0.1,
            std_dev: 0.02,
        };
        let json = serde_json::to_string(&model).unwrap();
        let back: MagnitudeModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model, back);
    }
}
