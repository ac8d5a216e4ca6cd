//! Change-point signal
//!
//! Combines how fast the pitch is moving with how unsure the tracker is into a
//! single per-frame "instability" value in [0, 1]. Peaks in this signal are
//! likely note boundaries.
//!
//! Algorithm:
//! 1. Convert frequency to MIDI pitch, minus the tuning offset (unpitched frames become 0)
//! 2. Gradient magnitude of the pitch curve, min-max normalized
//! 3. `instability[i] = (1 - confidence[i]) * gradient[i]`, min-max normalized

use crate::preprocessing::normalization::{gradient, min_max_normalize};
use crate::preprocessing::pitch::hz_to_midi;
use crate::preprocessing::tuning::TuningOffset;

/// Per-frame pitch track and the instability signal derived from it
#[derive(Debug, Clone)]
pub struct ChangePointSignal {
    /// Tuning-corrected MIDI pitch per frame (0 where unpitched)
    pub pitch_midi: Vec<f32>,

    /// Normalized instability per frame in [0, 1]
    pub instability: Vec<f32>,
}

/// Convert a frequency track to tuning-corrected MIDI pitch
///
/// Any non-finite result, e.g. from a 0 Hz frame, becomes 0.
pub fn frequencies_to_midi(frequency: &[f32], tuning: TuningOffset) -> Vec<f32> {
    frequency
        .iter()
        .map(|&f| {
            let pitch = hz_to_midi(f) - tuning.semitones();
            if pitch.is_finite() {
                pitch
            } else {
                0.0
            }
        })
        .collect()
}

/// Normalized gradient magnitude of a pitch curve
pub fn pitch_gradient(pitch_midi: &[f32]) -> Vec<f32> {
    let magnitude: Vec<f32> = gradient(pitch_midi).iter().map(|g| g.abs()).collect();
    min_max_normalize(&magnitude)
}

/// Build the change-point signal
///
/// # Arguments
///
/// * `frequency` - Per-frame frequency in Hz
/// * `confidence` - Per-frame tracker confidence, same length as `frequency`
/// * `tuning` - Tuning offset subtracted from every pitch
///
/// # Returns
///
/// The corrected pitch track and the normalized instability signal
///
/// # Example
///
/// ```
/// use note_segmenter::features::change_point::build_change_point_signal;
/// use note_segmenter::preprocessing::tuning::TuningOffset;
///
/// let mut frequency = vec![440.0f32; 50];
/// frequency.extend(vec![493.88f32; 50]);
/// let confidence = vec![0.5f32; 100];
///
/// let signal = build_change_point_signal(&frequency, &confidence, TuningOffset::default());
/// let (peak_frame, _) = signal
///     .instability
///     .iter()
///     .enumerate()
///     .fold((0, 0.0f32), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
/// assert!(peak_frame == 49 || peak_frame == 50);
/// ```
pub fn build_change_point_signal(
    frequency: &[f32],
    confidence: &[f32],
    tuning: TuningOffset,
) -> ChangePointSignal {
    let pitch_midi = frequencies_to_midi(frequency, tuning);
    let pitch_changes = pitch_gradient(&pitch_midi);

    let raw: Vec<f32> = confidence
        .iter()
        .zip(&pitch_changes)
        .map(|(&c, &g)| (1.0 - c) * g)
        .collect();
    let instability = min_max_normalize(&raw);

    log::debug!(
        "Built change-point signal over {} frames (tuning {:.1} cents)",
        instability.len(),
        tuning.cents()
    );

    ChangePointSignal {
        pitch_midi,
        instability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequencies_to_midi_with_offset() {
        let pitch = frequencies_to_midi(&[440.0, 0.0, 880.0], TuningOffset::from_cents(50.0));
        assert!((pitch[0] - 68.5).abs() < 1e-4);
        assert_eq!(pitch[1], 0.0);
        assert!((pitch[2] - 80.5).abs() < 1e-4);
    }

    #[test]
    fn test_constant_pitch_has_zero_instability() {
        let signal = build_change_point_signal(&[440.0; 100], &[0.9; 100], TuningOffset::default());
        assert_eq!(signal.instability, vec![0.0; 100]);
        assert!(signal.pitch_midi.iter().all(|&p| (p - 69.0).abs() < 1e-4));
    }

    #[test]
    fn test_instability_is_normalized_and_peaks_at_jump() {
        let mut frequency = vec![440.0f32; 40];
        frequency.extend(vec![523.25f32; 40]);
        let mut confidence = vec![0.9f32; 80];
        confidence[39] = 0.3;
        confidence[40] = 0.3;

        let signal = build_change_point_signal(&frequency, &confidence, TuningOffset::default());
        let max = signal.instability.iter().copied().fold(0.0f32, f32::max);
        let min = signal.instability.iter().copied().fold(1.0f32, f32::min);
        assert!((max - 1.0).abs() < 1e-6);
        assert_eq!(min, 0.0);
        assert!(signal.instability[39] > 0.99);
        assert!(signal.instability[40] > 0.99);
        assert_eq!(signal.instability[10], 0.0);
    }

    #[test]
    fn test_empty_input() {
        let signal = build_change_point_signal(&[], &[], TuningOffset::default());
        assert!(signal.pitch_midi.is_empty());
        assert!(signal.instability.is_empty());
    }
}
