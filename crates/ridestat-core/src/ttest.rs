//! Student's t-tests.
//!
//! Differences are always reported as `treatment - control`. The confidence
//! interval level is `1 - alpha` and its shape follows the alternative
//! hypothesis (two-sided or one-sided bound).

use std::fmt;
use std::str::FromStr;

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{Result, StatsError};
use crate::stats::{check_finite, mean, require_len, sample_variance};

/// Alternative hypothesis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Alternative {
    /// Treatment mean differs from control mean.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "two-sided"))]
    TwoSided,

    /// Treatment mean is less than control mean.
    Less,

    /// Treatment mean is greater than control mean.
    Greater,
}

impl FromStr for Alternative {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "two-sided" | "two_sided" => Ok(Self::TwoSided),
            "less" => Ok(Self::Less),
            "greater" => Ok(Self::Greater),
            _ => Err(StatsError::InvalidParameter(format!(
                "alternative must be one of 'two-sided', 'less', 'greater', got '{s}'"
            ))),
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwoSided => write!(f, "two-sided"),
            Self::Less => write!(f, "less"),
            Self::Greater => write!(f, "greater"),
        }
    }
}

/// Two-sample t-test variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TTestKind {
    /// Unequal variances, Welch–Satterthwaite degrees of freedom.
    #[default]
    Welch,

    /// Pooled variance, `n1 + n2 - 2` degrees of freedom.
    Student,
}

impl FromStr for TTestKind {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "welch" => Ok(Self::Welch),
            "student" | "pooled" => Ok(Self::Student),
            _ => Err(StatsError::InvalidParameter(format!(
                "test must be 'welch' or 'student', got '{s}'"
            ))),
        }
    }
}

impl fmt::Display for TTestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welch => write!(f, "welch"),
            Self::Student => write!(f, "student"),
        }
    }
}

/// Confidence interval for a mean or mean difference.
///
/// One-sided intervals use an infinite bound on the open side: `upper` for
/// [`Alternative::Greater`], `lower` for [`Alternative::Less`]. serde_json has
/// no representation for infinities and writes that bound as `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Coverage level, e.g. 0.95.
    pub level: f64,
}

impl ConfidenceInterval {
    fn around(
        estimate: f64,
        std_error: f64,
        dist: &StudentsT,
        alternative: Alternative,
        alpha: f64,
    ) -> Self {
        let (lower, upper) = match alternative {
            Alternative::TwoSided => {
                let q = dist.inverse_cdf(1.0 - alpha / 2.0);
                (estimate - q * std_error, estimate + q * std_error)
            }
            Alternative::Greater => {
                let q = dist.inverse_cdf(1.0 - alpha);
                (estimate - q * std_error, f64::INFINITY)
            }
            Alternative::Less => {
                let q = dist.inverse_cdf(1.0 - alpha);
                (f64::NEG_INFINITY, estimate + q * std_error)
            }
        };
        Self {
            lower,
            upper,
            level: 1.0 - alpha,
        }
    }

    /// Returns true if `value` lies inside the interval.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Outcome of a t-test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TTestResult {
    /// Variant used; `None` for one-sample tests.
    pub kind: Option<TTestKind>,
    pub alternative: Alternative,
    /// The t statistic.
    pub statistic: f64,
    /// Degrees of freedom (fractional for Welch).
    pub df: f64,
    pub p_value: f64,
    /// `mean(treatment) - mean(control)`, or `mean(sample) - mu`.
    pub mean_difference: f64,
    pub std_error: f64,
    pub confidence_interval: ConfidenceInterval,
}

impl TTestResult {
    /// Returns true if the p-value is strictly below `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidParameter(format!(
            "alpha must be in (0, 1), got {alpha}"
        )))
    }
}

fn students_t(df: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))
}

fn p_value(dist: &StudentsT, statistic: f64, alternative: Alternative) -> f64 {
    let p = match alternative {
        Alternative::TwoSided => 2.0 * dist.sf(statistic.abs()),
        Alternative::Greater => dist.sf(statistic),
        Alternative::Less => dist.cdf(statistic),
    };
    p.clamp(0.0, 1.0)
}

/// Two-sample t-test of `treatment` against `control`.
///
/// Both samples need at least two finite observations. Returns
/// [`StatsError::ZeroVariance`] when both samples are constant.
///
/// # Example
///
/// ```
/// use ridestat_core::{two_sample, Alternative, TTestKind};
///
/// let treatment = [12.0, 15.0, 14.0, 10.0, 13.0, 17.0, 16.0];
/// let control = [9.0, 11.0, 10.0, 8.0, 12.0, 10.0];
///
/// let welch = two_sample(&treatment, &control, TTestKind::Welch, Alternative::TwoSided, 0.05).unwrap();
/// assert!((welch.statistic - 3.576237).abs() < 1e-5);
/// assert!((welch.df - 9.875825).abs() < 1e-5);
/// assert!(welch.confidence_interval.lower > 0.0);
/// ```
pub fn two_sample(
    treatment: &[f64],
    control: &[f64],
    kind: TTestKind,
    alternative: Alternative,
    alpha: f64,
) -> Result<TTestResult> {
    validate_alpha(alpha)?;
    check_finite(treatment, "treatment")?;
    check_finite(control, "control")?;
    require_len(treatment, "treatment", 2)?;
    require_len(control, "control", 2)?;

    let n1 = treatment.len() as f64;
    let n2 = control.len() as f64;
    let m1 = mean(treatment);
    let m2 = mean(control);
    let v1 = sample_variance(treatment, m1);
    let v2 = sample_variance(control, m2);

    let (std_error, df) = match kind {
        TTestKind::Welch => {
            let a = v1 / n1;
            let b = v2 / n2;
            let se2 = a + b;
            if se2 <= 0.0 {
                return Err(StatsError::ZeroVariance);
            }
            let df = se2 * se2 / (a * a / (n1 - 1.0) + b * b / (n2 - 1.0));
            (se2.sqrt(), df)
        }
        TTestKind::Student => {
            let df = n1 + n2 - 2.0;
            let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
            if pooled <= 0.0 {
                return Err(StatsError::ZeroVariance);
            }
            ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
        }
    };

    let mean_difference = m1 - m2;
    let statistic = mean_difference / std_error;
    let dist = students_t(df)?;

    Ok(TTestResult {
        kind: Some(kind),
        alternative,
        statistic,
        df,
        p_value: p_value(&dist, statistic, alternative),
        mean_difference,
        std_error,
        confidence_interval: ConfidenceInterval::around(
            mean_difference,
            std_error,
            &dist,
            alternative,
            alpha,
        ),
    })
}

/// One-sample t-test of `sample` against a hypothesized mean `mu`.
pub fn one_sample(
    sample: &[f64],
    mu: f64,
    alternative: Alternative,
    alpha: f64,
) -> Result<TTestResult> {
    validate_alpha(alpha)?;
    check_finite(sample, "sample")?;
    require_len(sample, "sample", 2)?;
    if !mu.is_finite() {
        return Err(StatsError::InvalidParameter(format!(
            "mu must be finite, got {mu}"
        )));
    }

    let n = sample.len() as f64;
    let m = mean(sample);
    let variance = sample_variance(sample, m);
    if variance <= 0.0 {
        return Err(StatsError::ZeroVariance);
    }

    let std_error = (variance / n).sqrt();
    let df = n - 1.0;
    let mean_difference = m - mu;
    let statistic = mean_difference / std_error;
    let dist = students_t(df)?;

    Ok(TTestResult {
        kind: None,
        alternative,
        statistic,
        df,
        p_value: p_value(&dist, statistic, alternative),
        mean_difference,
        std_error,
        confidence_interval: ConfidenceInterval::around(
            mean_difference,
            std_error,
            &dist,
            alternative,
            alpha,
        ),
    })
}
