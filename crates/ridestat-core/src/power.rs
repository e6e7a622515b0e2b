//! Power analysis under the normal approximation.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Result, StatsError};
use crate::ttest::{validate_alpha, Alternative};

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))
}

fn critical_z(normal: &Normal, alpha: f64, alternative: Alternative) -> f64 {
    match alternative {
        Alternative::TwoSided => normal.inverse_cdf(1.0 - alpha / 2.0),
        Alternative::Less | Alternative::Greater => normal.inverse_cdf(1.0 - alpha),
    }
}

/// Per-group sample size needed to detect a standardized effect.
///
/// # Example
///
/// ```
/// use ridestat_core::{required_sample_size, Alternative};
///
/// let n = required_sample_size(0.5, 0.05, 0.8, Alternative::TwoSided).unwrap();
/// assert_eq!(n, 63);
/// ```
pub fn required_sample_size(
    effect_size: f64,
    alpha: f64,
    power: f64,
    alternative: Alternative,
) -> Result<usize> {
    validate_alpha(alpha)?;
    if !(power > 0.0 && power < 1.0) {
        return Err(StatsError::InvalidParameter(format!(
            "power must be in (0, 1), got {power}"
        )));
    }
    if !effect_size.is_finite() || effect_size == 0.0 {
        return Err(StatsError::InvalidParameter(format!(
            "effect size must be finite and non-zero, got {effect_size}"
        )));
    }

    let normal = standard_normal()?;
    let z_alpha = critical_z(&normal, alpha, alternative);
    let z_beta = normal.inverse_cdf(power);
    let n = 2.0 * ((z_alpha + z_beta) / effect_size.abs()).powi(2);
    Ok(n.ceil() as usize)
}

/// Power achieved by a comparison of the given group sizes.
///
/// For one-sided alternatives the sign of `effect_size` matters: an effect
/// in the wrong direction yields power below `alpha`.
pub fn achieved_power(
    effect_size: f64,
    n_treatment: usize,
    n_control: usize,
    alpha: f64,
    alternative: Alternative,
) -> Result<f64> {
    validate_alpha(alpha)?;
    if !effect_size.is_finite() {
        return Err(StatsError::InvalidParameter(format!(
            "effect size must be finite, got {effect_size}"
        )));
    }
    if n_treatment == 0 || n_control == 0 {
        return Ok(0.0);
    }

    let normal = standard_normal()?;
    let z = critical_z(&normal, alpha, alternative);
    let (n1, n2) = (n_treatment as f64, n_control as f64);
    let shift = effect_size * (n1 * n2 / (n1 + n2)).sqrt();

    let power = match alternative {
        Alternative::TwoSided => {
            normal.cdf(shift.abs() - z) + normal.cdf(-shift.abs() - z)
        }
        Alternative::Greater => normal.cdf(shift - z),
        Alternative::Less => normal.cdf(-shift - z),
    };
    Ok(power.clamp(0.0, 1.0))
}
