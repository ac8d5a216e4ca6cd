//! Onset activation helpers
//!
//! The onset model's raw activation is a smooth curve; a single strike can
//! stay above the split threshold for several frames. Peak-picking collapses
//! each strike to one frame before the resplitter scans it.

use crate::features::peaks::{local_maxima, select_by_distance};

/// Binarize an onset activation curve
///
/// Local maxima at least `min_height` high and `min_distance` frames apart
/// become 1.0; every other frame becomes 0.0.
///
/// # Arguments
///
/// * `activation` - Onset model activation per frame
/// * `min_height` - Minimum activation of an onset peak (e.g. 0.6)
/// * `min_distance` - Minimum distance between onset peaks in frames (e.g. 4)
///
/// # Example
///
/// ```
/// use note_segmenter::features::onset::activation::binarize_activation;
///
/// let activation = vec![0.0, 0.3, 0.8, 0.75, 0.2, 0.0, 0.4, 0.0];
/// let onsets = binarize_activation(&activation, 0.6, 4);
/// assert_eq!(onsets, vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
/// ```
pub fn binarize_activation(activation: &[f32], min_height: f32, min_distance: usize) -> Vec<f32> {
    let candidates: Vec<usize> = local_maxima(activation)
        .into_iter()
        .filter(|&i| activation[i] >= min_height)
        .collect();
    let onsets = select_by_distance(activation, &candidates, min_distance);

    log::debug!(
        "Binarized onset activation: {} onsets from {} candidates",
        onsets.len(),
        candidates.len()
    );

    let mut binary = vec![0.0; activation.len()];
    for idx in onsets {
        binary[idx] = 1.0;
    }
    binary
}

/// Frame indices of `activation[start..end]` strictly above `threshold`
///
/// Indices are relative to `start` and increasing. The range is clipped to the
/// activation length.
pub fn onsets_above(activation: &[f32], start: usize, end: usize, threshold: f32) -> Vec<usize> {
    let end = end.min(activation.len());
    if start >= end {
        return Vec::new();
    }
    activation[start..end]
        .iter()
        .enumerate()
        .filter(|(_, &v)| v > threshold)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binarize_respects_distance() {
        let activation = vec![0.0, 0.9, 0.0, 0.7, 0.0, 0.0, 0.0, 0.8, 0.0];
        let binary = binarize_activation(&activation, 0.6, 4);
        // 3 is within 4 frames of the stronger peak at 1
        assert_eq!(binary, vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_binarize_height_filter() {
        let activation = vec![0.0, 0.5, 0.0, 0.0, 0.0, 0.65, 0.0];
        let binary = binarize_activation(&activation, 0.6, 4);
        assert_eq!(binary.iter().sum::<f32>(), 1.0);
        assert_eq!(binary[5], 1.0);
    }

    #[test]
    fn test_onsets_above_relative_indices() {
        let activation = vec![0.0, 0.9, 0.0, 0.0, 0.8, 0.71, 0.7, 0.0];
        assert_eq!(onsets_above(&activation, 2, 8, 0.7), vec![2, 3]);
        assert_eq!(onsets_above(&activation, 0, 100, 0.7), vec![1, 4, 5]);
        assert!(onsets_above(&activation, 5, 5, 0.7).is_empty());
    }
}
