//! Multiple-testing correction of p-values.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StatsError};

/// Correction applied across a family of tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CorrectionMethod {
    /// Raw p-values.
    #[default]
    None,

    /// Family-wise error control, `p * m`.
    Bonferroni,

    /// Holm step-down family-wise error control.
    Holm,

    /// Benjamini–Hochberg false discovery rate control.
    #[cfg_attr(feature = "serde", serde(alias = "bh", alias = "fdr_bh"))]
    BenjaminiHochberg,
}

impl FromStr for CorrectionMethod {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Self::None),
            "bonferroni" => Ok(Self::Bonferroni),
            "holm" => Ok(Self::Holm),
            "benjamini_hochberg" | "bh" | "fdr_bh" => Ok(Self::BenjaminiHochberg),
            _ => Err(StatsError::InvalidParameter(format!(
                "unknown correction method '{s}'"
            ))),
        }
    }
}

impl fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Bonferroni => write!(f, "bonferroni"),
            Self::Holm => write!(f, "holm"),
            Self::BenjaminiHochberg => write!(f, "benjamini_hochberg"),
        }
    }
}

/// Adjusts `p_values` for multiple comparisons.
///
/// Output is in input order and capped at 1.
///
/// # Example
///
/// ```
/// use ridestat_core::{adjust, CorrectionMethod};
///
/// let adjusted = adjust(&[0.01, 0.04, 0.03], CorrectionMethod::Bonferroni).unwrap();
/// assert!((adjusted[0] - 0.03).abs() < 1e-12);
/// assert_eq!(adjusted[1], 0.12);
/// ```
pub fn adjust(p_values: &[f64], method: CorrectionMethod) -> Result<Vec<f64>> {
    if let Some(bad) = p_values.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(StatsError::InvalidParameter(format!(
            "p-values must lie in [0, 1], got {bad}"
        )));
    }

    let m = p_values.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut adjusted = vec![0.0; m];
    match method {
        CorrectionMethod::None => adjusted.copy_from_slice(p_values),
        CorrectionMethod::Bonferroni => {
            for (out, p) in adjusted.iter_mut().zip(p_values) {
                *out = (p * m as f64).min(1.0);
            }
        }
        CorrectionMethod::Holm => {
            let mut running = 0.0f64;
            for (rank, &idx) in order.iter().enumerate() {
                let value = ((m - rank) as f64 * p_values[idx]).min(1.0);
                running = running.max(value);
                adjusted[idx] = running;
            }
        }
        CorrectionMethod::BenjaminiHochberg => {
            let mut running = 1.0f64;
            for (rank, &idx) in order.iter().enumerate().rev() {
                let value = (p_values[idx] * m as f64 / (rank + 1) as f64).min(1.0);
                running = running.min(value);
                adjusted[idx] = running;
            }
        }
    }
    Ok(adjusted)
}
