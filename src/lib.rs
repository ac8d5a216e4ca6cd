//! # Note Segmenter
//!
//! Turns frame-rate pitch tracker output into discrete note events for
//! monophonic transcription.
//!
//! ## Features
//!
//! - **Transition Detection**: Confidence-dip peaks with half-height widths mark note boundaries
//! - **Segment Merging**: Adjacent stable regions at the same pitch become one note
//! - **Note Filtering**: Velocity threshold and optional guided (single-target) transcription
//! - **Repeated Notes**: Onset activation re-splits sustained notes at new strikes
//! - **Boundary Trimming**: Note edges pulled in to where the envelope is audible
//!
//! ## Quick Start
//!
//! ```
//! use note_segmenter::{segment_notes, FrameSignals, SegmentationConfig};
//!
//! // Pitch tracker output at 100 frames per second
//! let frequency = vec![440.0f32; 200];
//! let confidence = vec![0.9f32; 200];
//!
//! let signals = FrameSignals::new(&frequency, &confidence);
//! let notes = segment_notes(&signals, SegmentationConfig::default())?;
//!
//! assert_eq!(notes.len(), 1);
//! assert_eq!(notes[0].pitch_midi, 69);
//! # Ok::<(), note_segmenter::SegmentationError>(())
//! ```
//!
//! ## Architecture
//!
//! The segmentation pipeline follows this flow:
//!
//! ```text
//! Frame Signals → Change Points / Dip Peaks → Regions → Segments → Candidate Notes
//!               → Filtered Notes → Onset Re-split → Trimmed Note Events
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod segmentation;

// Re-export main types
pub use analysis::result::{NoteEvent, SegmentationFlag, SegmentationMetadata, SegmentationResult};
pub use config::{OnsetPeakPicking, SegmentationConfig};
pub use error::SegmentationError;
pub use io::frame_signals::FrameSignals;
pub use preprocessing::tuning::TuningOffset;

use features::change_point::build_change_point_signal;
use features::peaks::find_peaks;
use io::frame_signals::SanitizedSignals;
use preprocessing::amplitude::PreparedEnvelope;
use preprocessing::tuning::DEFAULT_TUNING_RESOLUTION;
use segmentation::filter::{filter_notes, FilterParams};
use segmentation::merger::merge_segments;
use segmentation::regions::carve_regions;
use segmentation::resplit::resplit_notes;
use segmentation::summarizer::{summarize_segments, SegmentInputs, SummaryParams};
use segmentation::trim::trim_notes;

/// Main segmentation function
///
/// Segments frame-rate pitch tracker output into note events.
///
/// # Arguments
///
/// * `signals` - Frequency and confidence tracks, plus optional envelope and onset activation
/// * `config` - Segmentation configuration parameters
///
/// # Returns
///
/// Note events ordered by start time
///
/// # Errors
///
/// Returns `SegmentationError` if the signals differ in length or a
/// configuration value is out of range
///
/// # Example
///
/// ```
/// use note_segmenter::{segment_notes, FrameSignals, SegmentationConfig};
///
/// let frequency = vec![0.0f32; 100]; // nothing pitched
/// let confidence = vec![0.1f32; 100];
/// let notes = segment_notes(&FrameSignals::new(&frequency, &confidence), SegmentationConfig::default())?;
/// assert!(notes.is_empty());
/// # Ok::<(), note_segmenter::SegmentationError>(())
/// ```
pub fn segment_notes(
    signals: &FrameSignals<'_>,
    config: SegmentationConfig,
) -> Result<Vec<NoteEvent>, SegmentationError> {
    segment_notes_detailed(signals, config).map(|result| result.notes)
}

/// Segmentation with per-stage diagnostics
///
/// Same pipeline as [`segment_notes`], additionally reporting stage counts,
/// the tuning offset used and processing time.
///
/// # Errors
///
/// Returns `SegmentationError` if the signals differ in length or a
/// configuration value is out of range
pub fn segment_notes_detailed(
    signals: &FrameSignals<'_>,
    config: SegmentationConfig,
) -> Result<SegmentationResult, SegmentationError> {
    use std::time::Instant;
    let start_time = Instant::now();

    config.validate()?;
    let n = signals.validate()?;

    log::debug!(
        "Starting note segmentation: {} frames at {:.4} s/frame (envelope: {}, onsets: {})",
        n,
        config.frame_period_seconds,
        signals.amplitude_envelope.is_some(),
        signals.onset_activation.is_some()
    );

    let mut metadata = SegmentationMetadata {
        frame_count: n,
        duration_seconds: config.frame_to_seconds(n),
        frame_period_seconds: config.frame_period_seconds,
        ..Default::default()
    };

    let inputs = SanitizedSignals::from_signals(signals);

    if !inputs.frequency.iter().any(|&f| f > 0.0) {
        log::debug!("No pitched frames, returning no notes");
        metadata.flags.push(SegmentationFlag::NoPitchedFrames);
        metadata.processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
        return Ok(SegmentationResult {
            notes: vec![],
            metadata,
        });
    }

    // Tuning
    let tuning = match config.tuning_offset_cents {
        Some(cents) => TuningOffset::from_cents(cents),
        None => {
            metadata.tuning_estimated = true;
            TuningOffset::estimate(&inputs.frequency, DEFAULT_TUNING_RESOLUTION)
        }
    };
    metadata.tuning_offset_cents = tuning.cents();

    // Transitions
    let change_points = build_change_point_signal(&inputs.frequency, &inputs.confidence, tuning);
    let instability_peaks = find_peaks(
        &change_points.instability,
        config.peak_distance,
        config.sensitivity,
    );
    let confidence_dips: Vec<f32> = inputs.confidence.iter().map(|&c| 1.0 - c).collect();
    let dip_peaks = find_peaks(&confidence_dips, config.peak_distance, config.sensitivity);
    metadata.change_point_peak_count = instability_peaks.len();
    metadata.transition_count = dip_peaks.len();

    let regions = carve_regions(&dip_peaks, n);

    // Segments and notes
    let envelope = inputs
        .amplitude_envelope
        .as_deref()
        .map(|e| PreparedEnvelope::new(e, config.amplitude_outlier_sigma));

    let segments = summarize_segments(
        &regions,
        &SegmentInputs {
            frequency: &inputs.frequency,
            confidence: &inputs.confidence,
            pitch_midi: &change_points.pitch_midi,
            envelope: envelope.as_ref(),
        },
        &SummaryParams {
            target_midi_note: config.target_midi_note,
            default_amplitude: config.default_amplitude,
        },
    );
    metadata.segment_count = segments.len();

    let candidates = merge_segments(&segments);
    metadata.candidate_count = candidates.len();

    let filtered = filter_notes(
        &candidates,
        envelope.as_ref(),
        &FilterParams {
            min_velocity: config.min_velocity,
            target_midi_note: config.target_midi_note,
            default_amplitude: config.default_amplitude,
        },
    );
    metadata.filtered_count = filtered.len();

    // Repeated notes
    let activation = inputs.onset_activation.as_deref();
    metadata.splitting_applied = !config.disable_splitting && activation.is_some();
    if !config.disable_splitting && activation.is_none() {
        metadata
            .flags
            .push(SegmentationFlag::SplittingSkippedNoActivation);
    }
    let split = resplit_notes(filtered, activation, &config);
    metadata.split_count = split.len();

    // Boundaries
    let trimmed = trim_notes(&split, envelope.as_ref(), &config);
    metadata.silent_notes_dropped = trimmed.silent;
    if trimmed.silent > 0 {
        metadata.flags.push(SegmentationFlag::SilentNotesDropped);
    }

    metadata.processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Segmentation complete: {} notes from {} segments in {:.2} ms",
        trimmed.notes.len(),
        metadata.segment_count,
        metadata.processing_time_ms
    );

    Ok(SegmentationResult {
        notes: trimmed.notes,
        metadata,
    })
}
