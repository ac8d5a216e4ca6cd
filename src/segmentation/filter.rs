//! Note filtering
//!
//! Drops the quiet and off-target parts of each candidate note and settles
//! its final pitch, velocity and frame span.

use super::{CandidateNote, FilteredNote, Segment};
use crate::preprocessing::amplitude::{PreparedEnvelope, MAX_VELOCITY};
use crate::preprocessing::normalization::{median, round_half_even};
use crate::preprocessing::pitch::clamp_to_midi;

/// Acceptance thresholds for candidate notes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Segments must be strictly louder than this (0-127 scale)
    pub min_velocity: u8,
    /// Guided transcription target; segments further than one semitone away are dropped
    pub target_midi_note: Option<u8>,
    /// Amplitude used when there is no envelope
    pub default_amplitude: f32,
}

/// Filter candidate notes into finished notes
///
/// # Arguments
///
/// * `candidates` - Candidate notes in time order
/// * `envelope` - Prepared amplitude envelope, if any
/// * `params` - Acceptance thresholds
///
/// # Returns
///
/// One note per candidate with at least one surviving segment, in time order
pub fn filter_notes(
    candidates: &[CandidateNote],
    envelope: Option<&PreparedEnvelope>,
    params: &FilterParams,
) -> Vec<FilteredNote> {
    let notes: Vec<FilteredNote> = candidates
        .iter()
        .filter_map(|c| filter_candidate(c, envelope, params))
        .collect();

    log::debug!(
        "Note filter kept {} of {} candidates (min_velocity={}, target={:?})",
        notes.len(),
        candidates.len(),
        params.min_velocity,
        params.target_midi_note
    );

    notes
}

/// Filter a single candidate note
///
/// # Returns
///
/// `None` if no segment survives
pub fn filter_candidate(
    candidate: &CandidateNote,
    envelope: Option<&PreparedEnvelope>,
    params: &FilterParams,
) -> Option<FilteredNote> {
    let survivors: Vec<(u8, &Segment)> = candidate
        .segments
        .iter()
        .filter(|s| s.amplitude > params.min_velocity as f32)
        .filter_map(|s| s.pitch.midi().map(|p| (p, s)))
        .filter(|(p, _)| match params.target_midi_note {
            Some(target) => p.abs_diff(target) <= 1,
            None => true,
        })
        .collect();

    let (_, first) = *survivors.first()?;
    let (_, last) = *survivors.last()?;

    let pitches: Vec<f32> = survivors.iter().map(|(p, _)| *p as f32).collect();
    let confidences: Vec<f32> = survivors.iter().map(|(_, s)| s.confidence).collect();
    let median_pitch = median(&pitches)?;
    let median_confidence = median(&confidences)?;

    let start_frame = first.start_frame;
    let end_frame = last.end_frame;

    let amplitude = match envelope {
        Some(envelope) => envelope.scaled_max(start_frame, end_frame),
        None => params.default_amplitude,
    };
    let velocity = round_half_even(amplitude).clamp(0.0, MAX_VELOCITY) as u8;

    let transition_strength = candidate
        .segments
        .last()
        .map_or(first.transition_strength, |s| s.transition_strength);

    Some(FilteredNote {
        pitch_midi: clamp_to_midi(round_half_even(median_pitch)),
        velocity,
        start_frame,
        end_frame,
        frequency_hz: first.frequency_hz,
        confidence: median_confidence,
        transition_strength,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::SegmentPitch;

    fn segment(pitch: SegmentPitch, amplitude: f32, start: usize, end: usize) -> Segment {
        Segment {
            pitch,
            frequency_hz: 440.0 + start as f32,
            confidence: 0.5 + start as f32 / 1000.0,
            transition_strength: start as f32 / 1000.0,
            amplitude,
            start_frame: start,
            end_frame: end,
        }
    }

    fn params(min_velocity: u8, target: Option<u8>) -> FilterParams {
        FilterParams {
            min_velocity,
            target_midi_note: target,
            default_amplitude: 80.0,
        }
    }

    #[test]
    fn test_quiet_segments_trimmed_from_span() {
        let candidate = CandidateNote {
            segments: vec![
                segment(SegmentPitch::Accepted(69), 3.0, 0, 10),
                segment(SegmentPitch::Accepted(69), 50.0, 12, 40),
                segment(SegmentPitch::Accepted(69), 60.0, 42, 80),
                segment(SegmentPitch::Accepted(69), 2.0, 82, 90),
            ],
        };
        let note = filter_candidate(&candidate, None, &params(6, None)).unwrap();
        assert_eq!((note.start_frame, note.end_frame), (12, 80));
        assert_eq!(note.pitch_midi, 69);
        assert_eq!(note.velocity, 80);
        assert_eq!(note.frequency_hz, 452.0);
        assert!((note.transition_strength - 0.082).abs() < 1e-6);
    }

    #[test]
    fn test_all_quiet_dropped() {
        let candidate = CandidateNote {
            segments: vec![segment(SegmentPitch::Accepted(69), 6.0, 0, 10)],
        };
        assert!(filter_candidate(&candidate, None, &params(6, None)).is_none());
    }

    #[test]
    fn test_rejected_segments_never_survive() {
        let candidate = CandidateNote {
            segments: vec![segment(SegmentPitch::Rejected, 90.0, 0, 10)],
        };
        assert!(filter_candidate(&candidate, None, &params(0, None)).is_none());
        assert!(filter_candidate(&candidate, None, &params(0, Some(69))).is_none());
    }

    #[test]
    fn test_target_window() {
        let candidate = CandidateNote {
            segments: vec![
                segment(SegmentPitch::Accepted(67), 90.0, 0, 10),
                segment(SegmentPitch::Accepted(68), 90.0, 12, 20),
            ],
        };
        let note = filter_candidate(&candidate, None, &params(0, Some(69))).unwrap();
        assert_eq!((note.start_frame, note.end_frame), (12, 20));
        assert_eq!(note.pitch_midi, 68);
    }

    #[test]
    fn test_velocity_recomputed_over_span() {
        let envelope = PreparedEnvelope::new(&[0.2, 0.2, 0.8, 1.0, 0.2, 0.5], 6.0);
        let candidate = CandidateNote {
            segments: vec![segment(SegmentPitch::Accepted(60), 30.0, 0, 3)],
        };
        let note = filter_candidate(&candidate, Some(&envelope), &params(6, None)).unwrap();
        // max over [0, 3) is 0.8 of a 1.0 global max
        assert_eq!(note.velocity, 102);
    }

    #[test]
    fn test_filter_notes_keeps_order() {
        let candidates = vec![
            CandidateNote {
                segments: vec![segment(SegmentPitch::Accepted(60), 90.0, 0, 10)],
            },
            CandidateNote {
                segments: vec![segment(SegmentPitch::Accepted(62), 1.0, 12, 20)],
            },
            CandidateNote {
                segments: vec![segment(SegmentPitch::Accepted(64), 90.0, 22, 30)],
            },
        ];
        let notes = filter_notes(&candidates, None, &params(6, None));
        let pitches: Vec<u8> = notes.iter().map(|n| n.pitch_midi).collect();
        assert_eq!(pitches, vec![60, 64]);
    }
}
