//! Descriptive statistics.
//!
//! Free functions operate on raw slices and assume the caller has validated
//! the input. [`Summary::from_sample`] performs that validation.

use crate::error::{Result, StatsError};

/// Rejects NaN / Inf input.
#[inline]
pub fn check_finite(xs: &[f64], name: &'static str) -> Result<()> {
    if xs.iter().any(|v| !v.is_finite()) {
        Err(StatsError::NonFinite { name })
    } else {
        Ok(())
    }
}

/// Rejects samples with fewer than `required` observations.
#[inline]
pub fn require_len(xs: &[f64], name: &'static str, required: usize) -> Result<()> {
    if xs.len() < required {
        Err(StatsError::InsufficientData {
            name,
            required,
            actual: xs.len(),
        })
    } else {
        Ok(())
    }
}

/// Arithmetic mean. Returns NaN for an empty slice.
#[inline]
pub fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample variance (ddof = 1) around a precomputed mean.
///
/// Returns NaN when fewer than two observations are given.
#[inline]
pub fn sample_variance(xs: &[f64], mean: f64) -> f64 {
    let n = xs.len();
    if n < 2 {
        return f64::NAN;
    }
    let ss: f64 = xs.iter().map(|v| (v - mean) * (v - mean)).sum();
    ss / (n - 1) as f64
}

/// Sample standard deviation (ddof = 1).
pub fn std_dev(xs: &[f64]) -> f64 {
    sample_variance(xs, mean(xs)).sqrt()
}

/// Quantile of an ascending-sorted slice using linear interpolation
/// between closest ranks.
///
/// # Example
///
/// ```
/// use ridestat_core::stats::quantile;
///
/// let sorted = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile(&sorted, 0.5), 2.5);
/// assert_eq!(quantile(&sorted, 0.0), 1.0);
/// assert_eq!(quantile(&sorted, 1.0), 4.0);
/// ```
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Median of an unsorted slice.
pub fn median(xs: &[f64]) -> f64 {
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile(&sorted, 0.5)
}

/// Descriptive summary of a sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    /// Number of observations.
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1); NaN when `n == 1`.
    pub std_dev: f64,
    /// Standard error of the mean; NaN when `n == 1`.
    pub std_err: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl Summary {
    /// Summarizes a non-empty, finite sample.
    ///
    /// # Example
    ///
    /// ```
    /// use ridestat_core::Summary;
    ///
    /// let summary = Summary::from_sample(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(summary.n, 8);
    /// assert_eq!(summary.mean, 5.0);
    /// assert_eq!(summary.median, 4.5);
    /// assert_eq!(summary.min, 2.0);
    /// assert_eq!(summary.max, 9.0);
    /// ```
    pub fn from_sample(xs: &[f64]) -> Result<Self> {
        check_finite(xs, "sample")?;
        require_len(xs, "sample", 1)?;

        let n = xs.len();
        let mean = mean(xs);
        let std_dev = sample_variance(xs, mean).sqrt();
        let mut sorted = xs.to_vec();
        sorted.sort_by(f64::total_cmp);

        Ok(Self {
            n,
            mean,
            std_dev,
            std_err: std_dev / (n as f64).sqrt(),
            min: sorted[0],
            max: sorted[n - 1],
            median: quantile(&sorted, 0.5),
        })
    }
}
