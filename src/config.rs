//! Configuration parameters for note segmentation

use serde::{Deserialize, Serialize};

use crate::error::SegmentationError;

/// Peak-picking applied to the raw onset activation before re-splitting
///
/// When set, only activation peaks at least `min_height` high and
/// `min_distance` frames apart survive, each as a single frame of value 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OnsetPeakPicking {
    /// Minimum activation height of an onset peak (default: 0.6)
    pub min_height: f32,

    /// Minimum distance between onset peaks in frames (default: 4)
    pub min_distance: usize,
}

impl Default for OnsetPeakPicking {
    fn default() -> Self {
        Self {
            min_height: 0.6,
            min_distance: 4,
        }
    }
}

/// Note segmentation configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    // Transition detection
    /// Minimum peak prominence for confidence dips and change points (default: 0.001)
    /// Lower values find more transitions
    pub sensitivity: f32,

    /// Minimum distance between transition peaks in frames (default: 4)
    pub peak_distance: usize,

    // Note acceptance
    /// Minimum note duration in seconds (default: 0.03)
    /// Governs onset re-splitting and boundary trimming
    pub min_duration_seconds: f32,

    /// Minimum velocity on the 0-127 scale (default: 6)
    /// Segments must be strictly louder than this to survive
    pub min_velocity: u8,

    /// Guided transcription target (default: None)
    /// When set, only segments at this MIDI pitch are accepted
    pub target_midi_note: Option<u8>,

    /// Tuning offset in cents (default: None = estimate from the frequency signal)
    /// Clamped to [-100, 100]
    pub tuning_offset_cents: Option<f32>,

    // Repeated notes
    /// Skip re-splitting sustained notes at onset-activation spikes (default: false)
    pub disable_splitting: bool,

    /// Activation level above which a frame counts as an onset (default: 0.7)
    pub onset_threshold: f32,

    /// Optional peak-picking of the raw onset activation (default: None)
    pub onset_peak_picking: Option<OnsetPeakPicking>,

    // Amplitude
    /// Envelope level treated as silence when trimming notes (default: 0.01)
    pub noise_floor: f32,

    /// Amplitude assigned when no envelope is available (default: 80.0)
    pub default_amplitude: f32,

    /// Envelope samples above mean + k * std are zeroed before scaling (default: 6.0)
    pub amplitude_outlier_sigma: f32,

    // Framing
    /// Duration of one frame in seconds (default: 0.01)
    pub frame_period_seconds: f32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.001,
            peak_distance: 4,
            min_duration_seconds: 0.03,
            min_velocity: 6,
            target_midi_note: None,
            tuning_offset_cents: None,
            disable_splitting: false,
            onset_threshold: 0.7,
            onset_peak_picking: None,
            noise_floor: 0.01,
            default_amplitude: 80.0,
            amplitude_outlier_sigma: 6.0,
            frame_period_seconds: 0.01,
        }
    }
}

/// Slack used when converting a duration to a frame count, so that
/// e.g. 0.05 s / 0.01 s is treated as exactly 5 frames
const FRAME_RATIO_TOLERANCE: f32 = 1e-4;

impl SegmentationConfig {
    /// Check that every parameter lies in its documented range
    ///
    /// # Errors
    ///
    /// Returns `SegmentationError::InvalidInput` naming the first offending field
    pub fn validate(&self) -> Result<(), SegmentationError> {
        if !(0.0..=1.0).contains(&self.sensitivity) {
            return Err(SegmentationError::InvalidInput(format!(
                "sensitivity must be in [0, 1], got {}",
                self.sensitivity
            )));
        }

        if !(0.0..=1.0).contains(&self.min_duration_seconds) {
            return Err(SegmentationError::InvalidInput(format!(
                "min_duration_seconds must be in [0, 1], got {}",
                self.min_duration_seconds
            )));
        }

        if self.min_velocity > 127 {
            return Err(SegmentationError::InvalidInput(format!(
                "min_velocity must be in [0, 127], got {}",
                self.min_velocity
            )));
        }

        if let Some(target) = self.target_midi_note {
            if target > 127 {
                return Err(SegmentationError::InvalidInput(format!(
                    "target_midi_note must be in [0, 127], got {}",
                    target
                )));
            }
        }

        if let Some(cents) = self.tuning_offset_cents {
            if !cents.is_finite() {
                return Err(SegmentationError::InvalidInput(
                    "tuning_offset_cents must be finite".to_string(),
                ));
            }
        }

        if !(self.frame_period_seconds.is_finite() && self.frame_period_seconds > 0.0) {
            return Err(SegmentationError::InvalidInput(format!(
                "frame_period_seconds must be > 0, got {}",
                self.frame_period_seconds
            )));
        }

        if self.peak_distance == 0 {
            return Err(SegmentationError::InvalidInput(
                "peak_distance must be >= 1".to_string(),
            ));
        }

        if let Some(picking) = self.onset_peak_picking {
            if picking.min_distance == 0 {
                return Err(SegmentationError::InvalidInput(
                    "onset_peak_picking.min_distance must be >= 1".to_string(),
                ));
            }
        }

        if !self.noise_floor.is_finite()
            || !self.onset_threshold.is_finite()
            || !self.default_amplitude.is_finite()
            || !self.amplitude_outlier_sigma.is_finite()
        {
            return Err(SegmentationError::InvalidInput(
                "noise_floor, onset_threshold, default_amplitude and amplitude_outlier_sigma must be finite"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Minimum note duration expressed in (fractional) frames
    pub fn min_duration_frames(&self) -> f32 {
        self.min_duration_seconds / self.frame_period_seconds
    }

    /// Minimum note duration rounded up to whole frames
    ///
    /// Used as the minimum gap between two accepted onsets when re-splitting.
    pub fn min_duration_frames_ceil(&self) -> usize {
        (self.min_duration_frames() - FRAME_RATIO_TOLERANCE)
            .ceil()
            .max(0.0) as usize
    }

    /// True if a span of `frames` frames is long enough to be trimmed
    pub fn is_trimmable_span(&self, frames: usize) -> bool {
        frames as f32 + FRAME_RATIO_TOLERANCE >= self.min_duration_frames()
    }

    /// Convert a frame index to seconds
    pub fn frame_to_seconds(&self, frame: usize) -> f32 {
        frame as f32 * self.frame_period_seconds
    }
}
