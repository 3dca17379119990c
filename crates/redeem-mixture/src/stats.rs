//! Numeric helpers shared by the mixture models and the classifier.

use ndarray::{Array1, ArrayView1};

/// Numerically stable `ln(sum(exp(values)))`.
///
/// Returns `-inf` for an empty slice or when every value is `-inf`.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }
    let sum: f64 = values.iter().map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}

/// Index of the largest value, first one wins on ties.
///
/// NaN entries never win. Panics on an empty view.
pub fn argmax_first(values: ArrayView1<f64>) -> usize {
    assert!(!values.is_empty(), "argmax_first requires a non-empty view");
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] || (values[best].is_nan() && !v.is_nan()) {
            best = i;
        }
    }
    best
}

/// Element-wise `max(score, floor)`. A NaN score becomes `floor`.
pub fn floor_scores(mut scores: Array1<f64>, floor: f64) -> Array1<f64> {
    scores.mapv_inplace(|v| v.max(floor));
    scores
}

/// Fraction of positions where `predicted` equals `truth`.
pub fn accuracy(predicted: &[usize], truth: &[usize]) -> f64 {
    assert_eq!(
        predicted.len(),
        truth.len(),
        "predicted and truth must have equal lengths"
    );
    if predicted.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / predicted.len() as f64
}
