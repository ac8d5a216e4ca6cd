//! Signal normalization and summary statistics
//!
//! Small numeric building blocks shared by the pipeline stages:
//! - Min-max normalization (constant signals map to all zeros)
//! - Discrete gradient (central differences, one-sided at the edges)
//! - Median
//! - Round-half-to-even, used wherever a fractional frame or pitch is rounded
//!
//! # Example
//!
//! ```
//! use note_segmenter::preprocessing::normalization::{median, min_max_normalize};
//!
//! let normalized = min_max_normalize(&[2.0, 4.0, 6.0]);
//! assert_eq!(normalized, vec![0.0, 0.5, 1.0]);
//! assert_eq!(median(&[3.0, 1.0, 2.0, 10.0]), Some(2.5));
//! ```

/// Numerical stability epsilon
const EPSILON: f32 = 1e-12;

/// Rescale a signal linearly so its minimum maps to 0 and its maximum to 1
///
/// A constant (or empty) signal has no range to rescale and yields all zeros
/// instead of dividing by zero.
pub fn min_max_normalize(signal: &[f32]) -> Vec<f32> {
    if signal.is_empty() {
        return Vec::new();
    }

    let (min, max) = signal
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    if !range.is_finite() || range <= EPSILON {
        return vec![0.0; signal.len()];
    }

    signal.iter().map(|&v| (v - min) / range).collect()
}

/// Discrete gradient of a signal with unit spacing
///
/// Interior points use central differences `(x[i+1] - x[i-1]) / 2`; the two
/// edges use one-sided differences. A single-sample signal has gradient 0.
pub fn gradient(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n)
            .map(|i| {
                if i == 0 {
                    signal[1] - signal[0]
                } else if i == n - 1 {
                    signal[n - 1] - signal[n - 2]
                } else {
                    (signal[i + 1] - signal[i - 1]) * 0.5
                }
            })
            .collect(),
    }
}

/// Median of a set of values
///
/// Even-length inputs average the two middle values.
///
/// # Returns
///
/// `None` for an empty input
pub fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) * 0.5)
    } else {
        Some(sorted[mid])
    }
}

/// Round to the nearest integer, ties to even
pub fn round_half_even(value: f32) -> f32 {
    value.round_ties_even()
}
