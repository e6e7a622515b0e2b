use super::*;

const TREATMENT: [f64; 7] = [12.0, 15.0, 14.0, 10.0, 13.0, 17.0, 16.0];
const CONTROL: [f64; 6] = [9.0, 11.0, 10.0, 8.0, 12.0, 10.0];

#[test]
fn test_seeded_interval_is_deterministic() {
    let config = BootstrapConfig::new().with_resamples(1500).with_seed(99);
    let a = mean_difference_ci(&TREATMENT, &CONTROL, &config).unwrap();
    let b = mean_difference_ci(&TREATMENT, &CONTROL, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_interval_independent_of_thread_count() {
    let config = BootstrapConfig::new().with_resamples(3000).with_seed(17);
    let run_in = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        pool.install(|| mean_difference_ci(&TREATMENT, &CONTROL, &config).unwrap())
    };

    let single = run_in(1);
    let many = run_in(7);
    assert_eq!(single, many);
    assert_eq!(single.resamples, 3000);
}

#[test]
fn test_different_seeds_differ() {
    let a = mean_difference_ci(
        &TREATMENT,
        &CONTROL,
        &BootstrapConfig::new().with_seed(1),
    )
    .unwrap();
    let b = mean_difference_ci(
        &TREATMENT,
        &CONTROL,
        &BootstrapConfig::new().with_seed(2),
    )
    .unwrap();
    assert_eq!(a.estimate, b.estimate);
    assert!(a.lower != b.lower || a.upper != b.upper);
}

#[test]
fn test_resample_count_not_multiple_of_chunk() {
    let config = BootstrapConfig::new().with_resamples(CHUNK_SIZE + 3).with_seed(5);
    let interval = mean_ci(&CONTROL, &config).unwrap();
    assert_eq!(interval.resamples, CHUNK_SIZE + 3);
}

#[test]
fn test_interval_bounds_sample_range() {
    let config = BootstrapConfig::new().with_resamples(800).with_seed(11);
    let interval = mean_ci(&CONTROL, &config).unwrap();
    assert!(interval.lower >= 8.0);
    assert!(interval.upper <= 12.0);
    assert!(interval.contains(interval.estimate));
}

#[test]
fn test_wider_confidence_widens_interval() {
    let narrow = BootstrapConfig::new().with_confidence(0.8).with_seed(3);
    let wide = BootstrapConfig::new().with_confidence(0.99).with_seed(3);
    let n = mean_difference_ci(&TREATMENT, &CONTROL, &narrow).unwrap();
    let w = mean_difference_ci(&TREATMENT, &CONTROL, &wide).unwrap();
    assert!(w.upper - w.lower >= n.upper - n.lower);
}

#[test]
fn test_constant_sample_collapses() {
    let config = BootstrapConfig::new().with_resamples(100).with_seed(0);
    let interval = mean_ci(&[4.0, 4.0, 4.0], &config).unwrap();
    assert_eq!(interval.lower, 4.0);
    assert_eq!(interval.upper, 4.0);
}

#[test]
fn test_invalid_config() {
    let zero = BootstrapConfig::new().with_resamples(0);
    assert!(matches!(
        mean_ci(&CONTROL, &zero),
        Err(StatsError::InvalidParameter(_))
    ));

    let bad_level = BootstrapConfig::new().with_confidence(1.0);
    assert!(matches!(
        mean_ci(&CONTROL, &bad_level),
        Err(StatsError::InvalidParameter(_))
    ));
}

#[test]
fn test_empty_sample_rejected() {
    let config = BootstrapConfig::new().with_seed(0);
    assert!(matches!(
        mean_difference_ci(&[], &CONTROL, &config),
        Err(StatsError::InsufficientData { name: "treatment", .. })
    ));
}
