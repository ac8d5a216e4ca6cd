//! Windowed onset prediction accumulation
//!
//! Context-window onset classifiers emit one prediction per window start; each
//! prediction speaks for every frame its window covers. The per-frame onset
//! curve is the sum of all predictions covering that frame, accumulated into a
//! buffer owned by the call.

use serde::{Deserialize, Serialize};

use crate::error::SegmentationError;

/// Parameters for turning window predictions into a binary onset curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowedOnsetConfig {
    /// Frames covered by one prediction window (default: 15, i.e. +-7 frames of context)
    pub window_len: usize,

    /// Multiplier applied to the accumulated predictions (default: 10.0)
    pub scale: f32,

    /// Scaled accumulation above which a frame is an onset (default: 0.02)
    pub threshold: f32,
}

impl Default for WindowedOnsetConfig {
    fn default() -> Self {
        Self {
            window_len: 15,
            scale: 10.0,
            threshold: 0.02,
        }
    }
}

/// Sum window predictions onto the frames each window covers
///
/// # Arguments
///
/// * `predictions` - One prediction per window start frame
/// * `window_len` - Number of frames each window covers
/// * `total_frames` - Length of the output curve
///
/// # Errors
///
/// Returns `SegmentationError::InvalidInput` if `window_len` is 0 or the last
/// window would extend past `total_frames`
///
/// # Example
///
/// ```
/// use note_segmenter::features::onset::window_fold::accumulate_window_predictions;
///
/// let curve = accumulate_window_predictions(&[1.0, 2.0], 3, 4)?;
/// assert_eq!(curve, vec![1.0, 3.0, 3.0, 2.0]);
/// # Ok::<(), note_segmenter::SegmentationError>(())
/// ```
pub fn accumulate_window_predictions(
    predictions: &[f32],
    window_len: usize,
    total_frames: usize,
) -> Result<Vec<f32>, SegmentationError> {
    if window_len == 0 {
        return Err(SegmentationError::InvalidInput(
            "window_len must be > 0".to_string(),
        ));
    }

    if !predictions.is_empty() && predictions.len() + window_len - 1 > total_frames {
        return Err(SegmentationError::InvalidInput(format!(
            "{} windows of {} frames do not fit in {} frames",
            predictions.len(),
            window_len,
            total_frames
        )));
    }

    let curve = predictions.iter().enumerate().fold(
        vec![0.0f32; total_frames],
        |mut acc, (start, &p)| {
            for frame in &mut acc[start..start + window_len] {
                *frame += p;
            }
            acc
        },
    );

    Ok(curve)
}

/// Binary onset curve from window predictions
///
/// Accumulates, scales and thresholds the predictions; frames above the
/// threshold are 1.0, all others 0.0.
///
/// # Errors
///
/// Same as [`accumulate_window_predictions`]
pub fn windowed_onsets(
    predictions: &[f32],
    total_frames: usize,
    config: &WindowedOnsetConfig,
) -> Result<Vec<f32>, SegmentationError> {
    let curve = accumulate_window_predictions(predictions, config.window_len, total_frames)?;
    let onsets: Vec<f32> = curve
        .iter()
        .map(|&v| if v * config.scale > config.threshold { 1.0 } else { 0.0 })
        .collect();

    log::debug!(
        "Windowed onsets: {} predictions -> {} onset frames of {}",
        predictions.len(),
        onsets.iter().filter(|&&v| v > 0.0).count(),
        total_frames
    );

    Ok(onsets)
}
