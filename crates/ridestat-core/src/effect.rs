//! Effect sizes for two-sample comparisons.

use crate::error::{Result, StatsError};
use crate::stats::{check_finite, mean, require_len, sample_variance};

fn pooled_std_dev(treatment: &[f64], control: &[f64]) -> Result<f64> {
    check_finite(treatment, "treatment")?;
    check_finite(control, "control")?;
    require_len(treatment, "treatment", 2)?;
    require_len(control, "control", 2)?;

    let n1 = treatment.len() as f64;
    let n2 = control.len() as f64;
    let v1 = sample_variance(treatment, mean(treatment));
    let v2 = sample_variance(control, mean(control));
    let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / (n1 + n2 - 2.0);
    if pooled <= 0.0 {
        return Err(StatsError::ZeroVariance);
    }
    Ok(pooled.sqrt())
}

/// Cohen's d using the pooled (ddof = 1) standard deviation.
pub fn cohens_d(treatment: &[f64], control: &[f64]) -> Result<f64> {
    let sd = pooled_std_dev(treatment, control)?;
    Ok((mean(treatment) - mean(control)) / sd)
}

/// Hedges' g: Cohen's d with the small-sample bias correction.
pub fn hedges_g(treatment: &[f64], control: &[f64]) -> Result<f64> {
    let d = cohens_d(treatment, control)?;
    let n = (treatment.len() + control.len()) as f64;
    Ok(d * (1.0 - 3.0 / (4.0 * n - 9.0)))
}

/// Relative lift of the treatment mean over the control mean.
///
/// Returns `None` when the control mean is zero.
pub fn relative_lift(treatment: &[f64], control: &[f64]) -> Result<Option<f64>> {
    check_finite(treatment, "treatment")?;
    check_finite(control, "control")?;
    require_len(treatment, "treatment", 1)?;
    require_len(control, "control", 1)?;

    let baseline = mean(control);
    if baseline == 0.0 {
        return Ok(None);
    }
    Ok(Some((mean(treatment) - baseline) / baseline))
}

/// Bundle of effect-size measures for one comparison.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSize {
    pub cohens_d: f64,
    pub hedges_g: f64,
    /// `(treatment - control) / control`; absent for a zero baseline.
    pub relative_lift: Option<f64>,
}

impl EffectSize {
    /// Computes all effect sizes for `treatment` against `control`.
    ///
    /// # Example
    ///
    /// ```
    /// use ridestat_core::EffectSize;
    ///
    /// let effect = EffectSize::compute(&[11.0, 12.0, 13.0], &[9.0, 10.0, 11.0]).unwrap();
    /// assert_eq!(effect.cohens_d, 2.0);
    /// assert_eq!(effect.relative_lift, Some(0.2));
    /// ```
    pub fn compute(treatment: &[f64], control: &[f64]) -> Result<Self> {
        let cohens_d = cohens_d(treatment, control)?;
        let n = (treatment.len() + control.len()) as f64;
        Ok(Self {
            cohens_d,
            hedges_g: cohens_d * (1.0 - 3.0 / (4.0 * n - 9.0)),
            relative_lift: relative_lift(treatment, control)?,
        })
    }
}
