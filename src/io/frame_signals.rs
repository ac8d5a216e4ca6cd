//! Frame-rate input signals
//!
//! The pitch tracker, envelope extractor and onset model all run outside this
//! crate. Their per-frame outputs are bundled here, borrowed, and checked for
//! a common length before any processing starts.
//!
//! # Example
//!
//! ```
//! use note_segmenter::FrameSignals;
//!
//! let frequency = vec![440.0f32; 200];
//! let confidence = vec![0.9f32; 200];
//! let envelope = vec![0.5f32; 200];
//!
//! let signals = FrameSignals::new(&frequency, &confidence).with_amplitude_envelope(&envelope);
//! assert_eq!(signals.validate()?, 200);
//! # Ok::<(), note_segmenter::SegmentationError>(())
//! ```

use crate::error::SegmentationError;

/// Borrowed bundle of frame-indexed input signals
///
/// All present signals must have the same length `N`. Frame `i` starts at
/// `i * frame_period_seconds`.
#[derive(Debug, Clone, Copy)]
pub struct FrameSignals<'a> {
    /// Fundamental frequency per frame in Hz (0 = no pitch)
    pub frequency: &'a [f32],

    /// Pitch tracker confidence per frame (0.0-1.0)
    pub confidence: &'a [f32],

    /// Normalized, low-pass filtered loudness per frame (0.0-1.0)
    pub amplitude_envelope: Option<&'a [f32]>,

    /// Onset model activation per frame (0.0-1.0)
    pub onset_activation: Option<&'a [f32]>,
}

impl<'a> FrameSignals<'a> {
    /// Bundle the pitch tracker output
    pub fn new(frequency: &'a [f32], confidence: &'a [f32]) -> Self {
        Self {
            frequency,
            confidence,
            amplitude_envelope: None,
            onset_activation: None,
        }
    }

    /// Attach an amplitude envelope
    pub fn with_amplitude_envelope(mut self, envelope: &'a [f32]) -> Self {
        self.amplitude_envelope = Some(envelope);
        self
    }

    /// Attach an onset activation curve
    pub fn with_onset_activation(mut self, activation: &'a [f32]) -> Self {
        self.onset_activation = Some(activation);
        self
    }

    /// Number of frames (length of the frequency signal)
    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    /// True if there are no frames
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// Check that all present signals share one length
    ///
    /// # Returns
    ///
    /// The common frame count `N`
    ///
    /// # Errors
    ///
    /// Returns `SegmentationError::InputLengthMismatch` for the first signal
    /// whose length differs from the frequency signal
    pub fn validate(&self) -> Result<usize, SegmentationError> {
        let expected = self.frequency.len();

        let optional = [
            ("amplitude_envelope", self.amplitude_envelope),
            ("onset_activation", self.onset_activation),
        ];
        let present = std::iter::once(("confidence", Some(self.confidence)))
            .chain(optional)
            .filter_map(|(name, signal)| signal.map(|s| (name, s.len())));

        for (signal, actual) in present {
            if actual != expected {
                return Err(SegmentationError::InputLengthMismatch {
                    signal,
                    expected,
                    actual,
                });
            }
        }

        Ok(expected)
    }
}

/// Copy of the inputs with non-finite samples replaced
///
/// Frequency, envelope and activation map NaN/inf to 0. Confidence is also
/// clamped to [0, 1].
#[derive(Debug, Clone)]
pub(crate) struct SanitizedSignals {
    pub frequency: Vec<f32>,
    pub confidence: Vec<f32>,
    pub amplitude_envelope: Option<Vec<f32>>,
    pub onset_activation: Option<Vec<f32>>,
}

impl SanitizedSignals {
    pub(crate) fn from_signals(signals: &FrameSignals<'_>) -> Self {
        Self {
            frequency: finite_or_zero(signals.frequency),
            confidence: signals
                .confidence
                .iter()
                .map(|&c| if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 })
                .collect(),
            amplitude_envelope: signals.amplitude_envelope.map(finite_or_zero),
            onset_activation: signals.onset_activation.map(finite_or_zero),
        }
    }
}

fn finite_or_zero(values: &[f32]) -> Vec<f32> {
    values
        .iter()
        .map(|&v| if v.is_finite() { v } else { 0.0 })
        .collect()
}
