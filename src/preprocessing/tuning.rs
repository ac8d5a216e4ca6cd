//! Tuning offset estimation
//!
//! Recordings are rarely tuned exactly to A440. The offset, a fraction of a
//! semitone, is subtracted from every frame's MIDI pitch before rounding, so a
//! consistently sharp or flat performance still lands on the intended notes.
//!
//! The estimate histograms the deviation of each pitched frame from the
//! nearest equal-tempered semitone and picks the most populated bin.

use serde::{Deserialize, Serialize};

use super::pitch::A4_HZ;

/// Default histogram resolution in fractions of a semitone (1 cent)
pub const DEFAULT_TUNING_RESOLUTION: f32 = 0.01;

/// Largest offset accepted from the caller, in cents
const MAX_OFFSET_CENTS: f32 = 100.0;

/// Tuning deviation from A440 in fractions of a semitone
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TuningOffset {
    semitones: f32,
}

impl TuningOffset {
    /// Offset supplied in cents, clamped to [-100, 100]
    pub fn from_cents(cents: f32) -> Self {
        Self {
            semitones: cents.clamp(-MAX_OFFSET_CENTS, MAX_OFFSET_CENTS) / 100.0,
        }
    }

    /// Offset in semitones
    pub fn semitones(&self) -> f32 {
        self.semitones
    }

    /// Offset in cents
    pub fn cents(&self) -> f32 {
        self.semitones * 100.0
    }

    /// Estimate the tuning offset from a frequency track
    ///
    /// # Arguments
    ///
    /// * `frequencies` - Per-frame frequency in Hz; non-positive frames are ignored
    /// * `resolution` - Histogram bin width in fractions of a semitone (e.g. 0.01)
    ///
    /// # Returns
    ///
    /// The left edge of the most populated deviation bin, in [-0.5, 0.5).
    /// Ties resolve to the lowest bin. Zero if no frame is pitched.
    ///
    /// # Example
    ///
    /// ```
    /// use note_segmenter::preprocessing::tuning::TuningOffset;
    ///
    /// // A4 played 20 cents sharp
    /// let sharp_a = 440.0 * 2.0f32.powf(0.2 / 12.0);
    /// let offset = TuningOffset::estimate(&vec![sharp_a; 100], 0.01);
    /// assert!((offset.cents() - 20.0).abs() < 1.5);
    /// ```
    pub fn estimate(frequencies: &[f32], resolution: f32) -> Self {
        let resolution = if resolution > 0.0 && resolution.is_finite() {
            resolution
        } else {
            DEFAULT_TUNING_RESOLUTION
        };

        // Frequency of C0 in A440 tuning; octaves are counted from here
        let c0_hz = A4_HZ / 16.0;

        let deviations: Vec<f32> = frequencies
            .iter()
            .filter(|&&f| f > 0.0 && f.is_finite())
            .map(|&f| {
                let semitones = 12.0 * (f / c0_hz).log2();
                let mut residual = semitones.rem_euclid(1.0);
                if residual >= 0.5 {
                    residual -= 1.0;
                }
                residual
            })
            .collect();

        if deviations.is_empty() {
            log::debug!("No pitched frames, tuning offset defaults to 0");
            return Self::default();
        }

        let n_bins = (1.0 / resolution).ceil() as usize;
        let bin_width = 1.0 / n_bins as f32;
        let mut counts = vec![0usize; n_bins];
        for d in deviations {
            let bin = (((d + 0.5) / bin_width).floor() as usize).min(n_bins - 1);
            counts[bin] += 1;
        }

        // First maximum wins on ties
        let best_bin = counts
            .iter()
            .enumerate()
            .fold((0usize, 0usize), |(best, best_count), (i, &c)| {
                if c > best_count {
                    (i, c)
                } else {
                    (best, best_count)
                }
            })
            .0;

        let semitones = -0.5 + best_bin as f32 * bin_width;
        log::debug!(
            "Estimated tuning offset: {:.1} cents ({} bins)",
            semitones * 100.0,
            n_bins
        );

        Self { semitones }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_in_tune() {
        let offset = TuningOffset::estimate(&[440.0; 50], DEFAULT_TUNING_RESOLUTION);
        assert!(offset.semitones().abs() < 0.011, "got {}", offset.semitones());
    }

    #[test]
    fn test_estimate_flat() {
        let flat = 440.0 * 2.0f32.powf(-0.3 / 12.0);
        let offset = TuningOffset::estimate(&vec![flat; 80], DEFAULT_TUNING_RESOLUTION);
        assert!(
            (offset.semitones() + 0.3).abs() < 0.015,
            "got {}",
            offset.semitones()
        );
    }

    #[test]
    fn test_estimate_ignores_unpitched_frames() {
        let mut freqs = vec![0.0; 100];
        freqs.extend(std::iter::repeat(440.0 * 2.0f32.powf(0.1 / 12.0)).take(20));
        let offset = TuningOffset::estimate(&freqs, DEFAULT_TUNING_RESOLUTION);
        assert!((offset.cents() - 10.0).abs() < 1.5, "got {}", offset.cents());
    }

    #[test]
    fn test_estimate_no_pitch() {
        assert_eq!(TuningOffset::estimate(&[0.0; 10], 0.01), TuningOffset::default());
        assert_eq!(TuningOffset::estimate(&[], 0.01).semitones(), 0.0);
    }

    #[test]
    fn test_from_cents_clamps() {
        assert!((TuningOffset::from_cents(25.0).semitones() - 0.25).abs() < 1e-6);
        assert!((TuningOffset::from_cents(250.0).semitones() - 1.0).abs() < 1e-6);
        assert!((TuningOffset::from_cents(-250.0).semitones() + 1.0).abs() < 1e-6);
    }
}
