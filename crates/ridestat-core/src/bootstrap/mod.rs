//! Percentile bootstrap confidence intervals.
//!
//! Resamples are generated in fixed-size chunks. Each chunk owns a ChaCha8
//! generator seeded with `seed + chunk_index`, so the resulting interval is
//! identical for any rayon thread count.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::error::{Result, StatsError};
use crate::stats::{check_finite, mean, quantile, require_len};

/// Resamples drawn per chunk.
const CHUNK_SIZE: usize = 256;

/// Bootstrap configuration.
///
/// # Example
///
/// ```
/// use ridestat_core::BootstrapConfig;
///
/// let config = BootstrapConfig::new()
///     .with_resamples(500)
///     .with_confidence(0.9)
///     .with_seed(7);
///
/// assert_eq!(config.resamples, 500);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BootstrapConfig {
    /// Number of bootstrap resamples.
    pub resamples: usize,
    /// Interval coverage, e.g. 0.95.
    pub confidence: f64,
    /// Seed for reproducible intervals; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resamples: 2000,
            confidence: 0.95,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resamples(mut self, resamples: usize) -> Self {
        self.resamples = resamples;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks resample count and confidence level.
    pub fn validate(&self) -> Result<()> {
        if self.resamples == 0 {
            return Err(StatsError::InvalidParameter(
                "bootstrap resamples must be positive".to_string(),
            ));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(StatsError::InvalidParameter(format!(
                "bootstrap confidence must be in (0, 1), got {}",
                self.confidence
            )));
        }
        Ok(())
    }

    fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}

/// Percentile bootstrap interval around a point estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootstrapInterval {
    /// Statistic evaluated on the original samples.
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
    pub confidence: f64,
    pub resamples: usize,
}

impl BootstrapInterval {
    /// Returns true if `value` lies inside the interval.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Bootstrap interval for `mean(treatment) - mean(control)`.
///
/// Each resample draws both groups independently with replacement.
///
/// # Example
///
/// ```
/// use ridestat_core::bootstrap::mean_difference_ci;
/// use ridestat_core::BootstrapConfig;
///
/// let treatment = [12.0, 15.0, 14.0, 10.0, 13.0, 17.0, 16.0];
/// let control = [9.0, 11.0, 10.0, 8.0, 12.0, 10.0];
/// let config = BootstrapConfig::new().with_resamples(1000).with_seed(42);
///
/// let interval = mean_difference_ci(&treatment, &control, &config).unwrap();
/// assert!(interval.lower <= interval.estimate && interval.estimate <= interval.upper);
/// assert!(!interval.contains(0.0));
/// ```
pub fn mean_difference_ci(
    treatment: &[f64],
    control: &[f64],
    config: &BootstrapConfig,
) -> Result<BootstrapInterval> {
    config.validate()?;
    check_finite(treatment, "treatment")?;
    check_finite(control, "control")?;
    require_len(treatment, "treatment", 1)?;
    require_len(control, "control", 1)?;

    let estimate = mean(treatment) - mean(control);
    let statistics = resample(config, |rng| {
        resampled_mean(treatment, rng) - resampled_mean(control, rng)
    });
    Ok(percentile_interval(estimate, statistics, config))
}

/// Bootstrap interval for the mean of a single sample.
pub fn mean_ci(sample: &[f64], config: &BootstrapConfig) -> Result<BootstrapInterval> {
    config.validate()?;
    check_finite(sample, "sample")?;
    require_len(sample, "sample", 1)?;

    let estimate = mean(sample);
    let statistics = resample(config, |rng| resampled_mean(sample, rng));
    Ok(percentile_interval(estimate, statistics, config))
}

fn resampled_mean(xs: &[f64], rng: &mut ChaCha8Rng) -> f64 {
    let n = xs.len();
    let total: f64 = (0..n).map(|_| xs[rng.random_range(0..n)]).sum();
    total / n as f64
}

// Evaluates `statistic` once per resample; output order is chunk order.
fn resample<F>(config: &BootstrapConfig, statistic: F) -> Vec<f64>
where
    F: Fn(&mut ChaCha8Rng) -> f64 + Sync,
{
    let seed = config.resolved_seed();
    let total = config.resamples;
    let chunks = total.div_ceil(CHUNK_SIZE);

    let per_chunk: Vec<Vec<f64>> = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(chunk as u64));
            let len = CHUNK_SIZE.min(total - chunk * CHUNK_SIZE);
            (0..len).map(|_| statistic(&mut rng)).collect()
        })
        .collect();

    per_chunk.into_iter().flatten().collect()
}

fn percentile_interval(
    estimate: f64,
    mut statistics: Vec<f64>,
    config: &BootstrapConfig,
) -> BootstrapInterval {
    statistics.sort_by(f64::total_cmp);
    let tail = (1.0 - config.confidence) / 2.0;
    BootstrapInterval {
        estimate,
        lower: quantile(&statistics, tail),
        upper: quantile(&statistics, 1.0 - tail),
        confidence: config.confidence,
        resamples: statistics.len(),
    }
}

#[cfg(test)]
mod tests;
