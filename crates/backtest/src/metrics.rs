//! Classification metrics.

/// Fraction of predictions equal to the actual labels. Empty input scores 0.
#[must_use]
pub fn accuracy(predicted: &[bool], actual: &[bool]) -> f64 {
    debug_assert_eq!(predicted.len(), actual.len());
    if actual.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(actual)
        .filter(|(p, a)| p == a)
        .count();
    correct as f64 / actual.len() as f64
}

/// Accuracy of always predicting `label`.
#[must_use]
pub fn constant_accuracy(label: bool, actual: &[bool]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual.iter().filter(|&&a| a == label).count() as f64 / actual.len() as f64
}
