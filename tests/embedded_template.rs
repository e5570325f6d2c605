//! A template cut from the source must be found exactly where it was cut.

use ndarray::{ArrayD, Dimension};
use ndmatch::{match_template, Metric};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_array(shape: &[usize], seed: u64) -> ArrayD<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    ArrayD::from_shape_fn(shape.to_vec(), |_| rng.random::<f64>())
}

fn cut_window(source: &ArrayD<f64>, start: &[usize], extent: &[usize]) -> ArrayD<f64> {
    source
        .slice_each_axis(|ax| {
            let k = ax.axis.index();
            (start[k]..start[k] + extent[k]).into()
        })
        .to_owned()
}

fn argmin(scores: &ArrayD<f64>) -> Vec<usize> {
    let mut best = f64::INFINITY;
    let mut at = Vec::new();
    for (idx, &score) in scores.indexed_iter() {
        if score < best {
            best = score;
            at = idx.slice().to_vec();
        }
    }
    at
}

fn argmax(scores: &ArrayD<f64>) -> Vec<usize> {
    let mut best = f64::NEG_INFINITY;
    let mut at = Vec::new();
    for (idx, &score) in scores.indexed_iter() {
        if score > best {
            best = score;
            at = idx.slice().to_vec();
        }
    }
    at
}

#[test]
fn square_diff_minimum_at_cut_position() {
    let source = random_array(&[100, 100], 41);
    let template = cut_window(&source, &[10, 20], &[6, 11]);
    let scores = match_template(source.view(), template.view(), Metric::SquareDiff).unwrap();
    assert_eq!(scores.shape(), &[95, 90]);
    let at = argmin(&scores);
    assert_eq!(at, vec![10, 20]);
    assert!(scores[[10, 20]].abs() < 1e-9);
}

#[test]
fn correlation_coeff_maximum_at_cut_position() {
    let source = random_array(&[100, 100], 41);
    let template = cut_window(&source, &[10, 20], &[6, 11]);
    let scores =
        match_template(source.view(), template.view(), Metric::CorrelationCoeff).unwrap();
    let at = argmax(&scores);
    assert_eq!(at, vec![10, 20]);
}

#[test]
fn normalized_metrics_peak_at_cut_position() {
    let source = random_array(&[60, 50], 43);
    let template = cut_window(&source, &[17, 8], &[9, 12]);

    let ncc = match_template(
        source.view(),
        template.view(),
        Metric::NormalizedCrossCorrelation,
    )
    .unwrap();
    assert_eq!(argmax(&ncc), vec![17, 8]);
    assert!((ncc[[17, 8]] - 1.0).abs() < 1e-9);

    let ncoeff = match_template(
        source.view(),
        template.view(),
        Metric::NormalizedCorrelationCoeff,
    )
    .unwrap();
    assert_eq!(argmax(&ncoeff), vec![17, 8]);
    assert!((ncoeff[[17, 8]] - 1.0).abs() < 1e-9);

    let nsd = match_template(
        source.view(),
        template.view(),
        Metric::NormalizedSquareDiff,
    )
    .unwrap();
    assert_eq!(argmin(&nsd), vec![17, 8]);
    assert!(nsd[[17, 8]].abs() < 1e-9);
}

#[test]
fn embedded_template_found_in_3d() {
    let source = random_array(&[24, 18, 20], 47);
    let template = cut_window(&source, &[5, 9, 2], &[4, 3, 6]);

    let sd = match_template(source.view(), template.view(), Metric::SquareDiff).unwrap();
    assert_eq!(sd.shape(), &[21, 16, 15]);
    assert_eq!(argmin(&sd), vec![5, 9, 2]);
    assert!(sd[[5, 9, 2]].abs() < 1e-9);

    let cc = match_template(source.view(), template.view(), Metric::CorrelationCoeff).unwrap();
    assert_eq!(argmax(&cc), vec![5, 9, 2]);
}
