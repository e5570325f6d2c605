//! The allocating and in-place entry points must agree elementwise.

use ndarray::ArrayD;
use ndmatch::{match_template, match_template_into, Metric};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const METRICS: [Metric; 6] = [
    Metric::SquareDiff,
    Metric::NormalizedSquareDiff,
    Metric::CrossCorrelation,
    Metric::NormalizedCrossCorrelation,
    Metric::CorrelationCoeff,
    Metric::NormalizedCorrelationCoeff,
];

fn random_array(shape: &[usize], seed: u64) -> ArrayD<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    ArrayD::from_shape_fn(shape.to_vec(), |_| rng.random::<f64>())
}

#[test]
fn into_variant_matches_allocating_variant() {
    let source = random_array(&[30, 25], 61);
    let template = random_array(&[6, 7], 62);
    for metric in METRICS {
        let allocated = match_template(source.view(), template.view(), metric).unwrap();
        let mut dest = ArrayD::<f64>::zeros(vec![25, 19]);
        match_template_into(&mut dest.view_mut(), source.view(), template.view(), metric)
            .unwrap();
        assert_eq!(allocated, dest, "{metric:?}");
    }
}

#[test]
fn destination_is_reusable_across_calls() {
    let template = random_array(&[4, 4], 63);
    let mut dest = ArrayD::<f64>::zeros(vec![12, 9]);
    for seed in 0..3u64 {
        let source = random_array(&[15, 12], 64 + seed);
        match_template_into(
            &mut dest.view_mut(),
            source.view(),
            template.view(),
            Metric::NormalizedCrossCorrelation,
        )
        .unwrap();
        let allocated = match_template(
            source.view(),
            template.view(),
            Metric::NormalizedCrossCorrelation,
        )
        .unwrap();
        assert_eq!(allocated, dest, "seed {seed}");
    }
}

#[test]
fn into_variant_matches_in_3d() {
    let source = random_array(&[10, 11, 9], 67);
    let template = random_array(&[3, 4, 2], 68);
    for metric in METRICS {
        let allocated = match_template(source.view(), template.view(), metric).unwrap();
        let mut dest = ArrayD::<f64>::zeros(vec![8, 8, 8]);
        match_template_into(&mut dest.view_mut(), source.view(), template.view(), metric)
            .unwrap();
        assert_eq!(allocated, dest, "{metric:?}");
    }
}
