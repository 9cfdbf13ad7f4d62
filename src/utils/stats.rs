// src/utils/stats.rs

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of `values[i] - values[i - 1]`, `None` when there are fewer than two values.
pub fn mean_successive_difference(values: &[f64]) -> Option<f64> {
    let diffs: Vec<f64> = values.windows(2).map(|pair| pair[1] - pair[0]).collect();
    mean(&diffs)
}

/// Mean absolute error between predictions and targets of equal length.
pub fn mean_absolute_error(predicted: &[f64], actual: &[f64]) -> Option<f64> {
    let errors: Vec<f64> = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).abs())
        .collect();
    mean(&errors)
}
