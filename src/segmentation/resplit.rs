//! Onset re-splitting
//!
//! A repeated note at one pitch produces no confidence dip, so the merger
//! joins the strikes into one long note. The onset activation separates them
//! again: every strong onset inside a note, far enough from the previous one,
//! starts a new sub-note.

use super::FilteredNote;
use crate::config::SegmentationConfig;
use crate::features::onset::{binarize_activation, onsets_above};

/// Split notes at onset-activation spikes
///
/// Sub-notes inherit pitch, velocity, frequency and confidence from the note
/// they were cut from. With splitting disabled, or without an activation
/// signal, the notes are returned unchanged.
///
/// # Arguments
///
/// * `notes` - Filtered notes in time order
/// * `activation` - Onset activation per frame, if any
/// * `config` - Threshold, minimum duration and optional peak-picking
///
/// # Returns
///
/// Notes in time order; the sub-notes of a note concatenate to its span
pub fn resplit_notes(
    notes: Vec<FilteredNote>,
    activation: Option<&[f32]>,
    config: &SegmentationConfig,
) -> Vec<FilteredNote> {
    if config.disable_splitting {
        return notes;
    }

    let activation = match activation {
        Some(activation) => activation,
        None => {
            log::warn!("Onset splitting enabled but no onset activation supplied; skipping");
            return notes;
        }
    };

    let picked;
    let activation = match config.onset_peak_picking {
        Some(picking) => {
            picked = binarize_activation(activation, picking.min_height, picking.min_distance);
            picked.as_slice()
        }
        None => activation,
    };

    let min_frames = config.min_duration_frames_ceil();
    let before = notes.len();
    let split: Vec<FilteredNote> = notes
        .into_iter()
        .flat_map(|note| split_note(note, activation, config.onset_threshold, min_frames))
        .collect();

    log::debug!(
        "Onset re-splitting: {} notes -> {} notes (threshold={}, min_frames={})",
        before,
        split.len(),
        config.onset_threshold,
        min_frames
    );

    split
}

/// Split one note at onsets more than `min_frames` after the previous cut
pub fn split_note(
    note: FilteredNote,
    activation: &[f32],
    threshold: f32,
    min_frames: usize,
) -> Vec<FilteredNote> {
    let s = note.start_frame;
    let mut pieces = Vec::new();
    let mut last_onset = 0usize;

    for idx in onsets_above(activation, s, note.end_frame, threshold) {
        if idx > last_onset + min_frames {
            pieces.push(FilteredNote {
                start_frame: s + last_onset,
                end_frame: s + idx,
                ..note
            });
            last_onset = idx;
        }
    }

    pieces.push(FilteredNote {
        start_frame: s + last_onset,
        ..note
    });
    pieces
}
