//! Amplitude envelope preparation and velocity scaling
//!
//! The envelope arrives normalized to [0, 1] but may contain isolated spikes
//! (clicks, bow noise). Samples far above the mean are zeroed so that a single
//! spike does not compress every other note's velocity. The prepared envelope
//! and its maximum are computed once per input and never outlive it.

/// Top of the MIDI velocity scale
pub const MAX_VELOCITY: f32 = 127.0;

/// Per-input amplitude envelope with outliers removed
#[derive(Debug, Clone)]
pub struct PreparedEnvelope {
    samples: Vec<f32>,
    global_max: f32,
}

impl PreparedEnvelope {
    /// Prepare an envelope for velocity scaling and trimming
    ///
    /// # Arguments
    ///
    /// * `envelope` - Per-frame amplitude envelope
    /// * `outlier_sigma` - Samples above `mean + outlier_sigma * std` are zeroed
    ///
    /// # Example
    ///
    /// ```
    /// use note_segmenter::preprocessing::amplitude::PreparedEnvelope;
    ///
    /// let mut envelope = vec![0.2f32; 1000];
    /// envelope[500] = 1.0; // isolated click
    /// let prepared = PreparedEnvelope::new(&envelope, 6.0);
    ///
    /// assert_eq!(prepared.samples()[500], 0.0);
    /// assert!((prepared.global_max() - 0.2).abs() < 1e-6);
    /// ```
    pub fn new(envelope: &[f32], outlier_sigma: f32) -> Self {
        if envelope.is_empty() {
            return Self {
                samples: Vec::new(),
                global_max: 0.0,
            };
        }

        let n = envelope.len() as f32;
        let mean = envelope.iter().sum::<f32>() / n;
        let variance = envelope.iter().map(|&v| (v - mean).powi(2)).sum::<f32>() / n;
        let cutoff = mean + outlier_sigma * variance.sqrt();

        let mut clipped = 0usize;
        let samples: Vec<f32> = envelope
            .iter()
            .map(|&v| {
                if v > cutoff {
                    clipped += 1;
                    0.0
                } else {
                    v
                }
            })
            .collect();

        let global_max = samples.iter().copied().fold(0.0f32, f32::max);

        log::debug!(
            "Prepared amplitude envelope: {} frames, {} outliers zeroed, global max {:.4}",
            samples.len(),
            clipped,
            global_max
        );

        Self {
            samples,
            global_max,
        }
    }

    /// Envelope samples after outlier suppression
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Maximum of the prepared envelope
    pub fn global_max(&self) -> f32 {
        self.global_max
    }

    /// Peak amplitude over `[start, end)`, scaled from `[0, global_max]` to `[0, 127]`
    ///
    /// The range is clipped to the envelope length; an empty range scales to 0.
    pub fn scaled_max(&self, start: usize, end: usize) -> f32 {
        let end = end.min(self.samples.len());
        if start >= end {
            return 0.0;
        }
        let peak = self.samples[start..end]
            .iter()
            .copied()
            .fold(0.0f32, f32::max);
        scale_to_velocity(peak, self.global_max)
    }
}

/// Map `value` linearly from `[0, max]` onto `[0, 127]`, clamping outside values
///
/// A non-positive `max` leaves nothing to scale against and yields 0.
pub fn scale_to_velocity(value: f32, max: f32) -> f32 {
    if max <= 0.0 || !max.is_finite() {
        return 0.0;
    }
    (value / max * MAX_VELOCITY).clamp(0.0, MAX_VELOCITY)
}
