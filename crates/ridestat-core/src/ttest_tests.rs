//! Tests for t-tests against high-precision reference values.

use crate::error::StatsError;
use crate::ttest::*;

const TREATMENT: [f64; 7] = [12.0, 15.0, 14.0, 10.0, 13.0, 17.0, 16.0];
const CONTROL: [f64; 6] = [9.0, 11.0, 10.0, 8.0, 12.0, 10.0];

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() < tol,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_welch_two_sided() {
    let r = two_sample(&TREATMENT, &CONTROL, TTestKind::Welch, Alternative::TwoSided, 0.05)
        .unwrap();

    assert_eq!(r.kind, Some(TTestKind::Welch));
    assert_close(r.statistic, 3.576_237_364, 1e-6);
    assert_close(r.df, 9.875_824_646, 1e-6);
    assert_close(r.p_value, 0.005_143_608, 1e-6);
    assert_close(r.mean_difference, 3.857_142_857, 1e-9);
    assert_close(r.confidence_interval.lower, 1.449_886_552, 1e-5);
    assert_close(r.confidence_interval.upper, 6.264_399_162, 1e-5);
    assert_close(r.confidence_interval.level, 0.95, 1e-12);
}

#[test]
fn test_welch_one_sided() {
    let greater =
        two_sample(&TREATMENT, &CONTROL, TTestKind::Welch, Alternative::Greater, 0.05).unwrap();
    let less = two_sample(&TREATMENT, &CONTROL, TTestKind::Welch, Alternative::Less, 0.05).unwrap();

    assert_close(greater.p_value, 0.002_571_804, 1e-6);
    assert_close(less.p_value, 0.997_428_196, 1e-6);
    assert!(greater.confidence_interval.upper.is_infinite());
    assert!(less.confidence_interval.lower.is_infinite());
    assert!(greater.confidence_interval.lower > 0.0);
}

#[test]
fn test_student_pooled() {
    let r = two_sample(&TREATMENT, &CONTROL, TTestKind::Student, Alternative::TwoSided, 0.05)
        .unwrap();

    assert_close(r.statistic, 3.433_201_011, 1e-6);
    assert_close(r.df, 11.0, 1e-12);
    assert_close(r.p_value, 0.005_591_369, 1e-6);
    assert_close(r.confidence_interval.lower, 1.384_373_520, 1e-5);
    assert_close(r.confidence_interval.upper, 6.329_912_194, 1e-5);
}

#[test]
fn test_identical_samples_have_unit_p_value() {
    let r = two_sample(&CONTROL, &CONTROL, TTestKind::Welch, Alternative::TwoSided, 0.05).unwrap();
    assert_close(r.statistic, 0.0, 1e-12);
    assert_close(r.p_value, 1.0, 1e-9);
    assert!(r.confidence_interval.contains(0.0));
}

#[test]
fn test_swapping_groups_negates_statistic() {
    let forward =
        two_sample(&TREATMENT, &CONTROL, TTestKind::Welch, Alternative::TwoSided, 0.05).unwrap();
    let backward =
        two_sample(&CONTROL, &TREATMENT, TTestKind::Welch, Alternative::TwoSided, 0.05).unwrap();
    assert_close(forward.statistic, -backward.statistic, 1e-12);
    assert_close(forward.p_value, backward.p_value, 1e-12);
}

#[test]
fn test_constant_samples_are_rejected() {
    let err = two_sample(&[3.0, 3.0], &[3.0, 3.0, 3.0], TTestKind::Welch, Alternative::TwoSided, 0.05)
        .unwrap_err();
    assert_eq!(err, StatsError::ZeroVariance);
}

#[test]
fn test_one_constant_group_is_allowed() {
    let r = two_sample(&[5.0, 5.0, 5.0], &CONTROL, TTestKind::Welch, Alternative::TwoSided, 0.05)
        .unwrap();
    // Welch df collapses to the varying group's n - 1.
    assert_close(r.df, 5.0, 1e-9);
}

#[test]
fn test_small_sample_is_rejected() {
    let err = two_sample(&[1.0], &CONTROL, TTestKind::Welch, Alternative::TwoSided, 0.05)
        .unwrap_err();
    assert_eq!(
        err,
        StatsError::InsufficientData {
            name: "treatment",
            required: 2,
            actual: 1
        }
    );
}

#[test]
fn test_invalid_alpha() {
    for alpha in [0.0, 1.0, -0.1, f64::NAN] {
        let err = two_sample(&TREATMENT, &CONTROL, TTestKind::Welch, Alternative::TwoSided, alpha)
            .unwrap_err();
        assert!(matches!(err, StatsError::InvalidParameter(_)));
    }
}

#[test]
fn test_non_finite_rejected() {
    let err = two_sample(
        &TREATMENT,
        &[1.0, f64::INFINITY],
        TTestKind::Welch,
        Alternative::TwoSided,
        0.05,
    )
    .unwrap_err();
    assert_eq!(err, StatsError::NonFinite { name: "control" });
}

#[test]
fn test_one_sample() {
    let r = one_sample(&TREATMENT, 12.0, Alternative::TwoSided, 0.05).unwrap();
    assert_eq!(r.kind, None);
    assert_close(r.statistic, 2.038_562_657, 1e-6);
    assert_close(r.df, 6.0, 1e-12);
    assert_close(r.p_value, 0.087_618_616, 1e-6);
}

#[test]
fn test_alternative_parsing() {
    assert_eq!("two-sided".parse::<Alternative>().unwrap(), Alternative::TwoSided);
    assert_eq!("two_sided".parse::<Alternative>().unwrap(), Alternative::TwoSided);
    assert_eq!("greater".parse::<Alternative>().unwrap(), Alternative::Greater);
    assert!("bigger".parse::<Alternative>().is_err());
    assert_eq!(Alternative::Less.to_string(), "less");
}

#[test]
fn test_kind_parsing() {
    assert_eq!("welch".parse::<TTestKind>().unwrap(), TTestKind::Welch);
    assert_eq!("pooled".parse::<TTestKind>().unwrap(), TTestKind::Student);
    assert!("z".parse::<TTestKind>().is_err());
}
