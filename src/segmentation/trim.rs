//! Boundary trimming
//!
//! Notes are carved from the pitch track, which often keeps reporting a pitch
//! through the attack and release where the instrument is barely audible.
//! The trimmer pulls each boundary in to the first and last frames whose
//! envelope rises above the noise floor, then converts frames to seconds.

use super::FilteredNote;
use crate::analysis::result::NoteEvent;
use crate::config::SegmentationConfig;
use crate::preprocessing::amplitude::PreparedEnvelope;

/// What the trimmer did with one note
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrimOutcome {
    /// Boundaries moved to the audible part of the note
    Trimmed(NoteEvent),
    /// Too short to trim, or no envelope; times taken straight from frames
    PassedThrough(NoteEvent),
    /// No frame rose above the noise floor; the note is dropped
    Silent,
}

impl TrimOutcome {
    /// The resulting note, unless it was dropped
    pub fn note(self) -> Option<NoteEvent> {
        match self {
            TrimOutcome::Trimmed(note) | TrimOutcome::PassedThrough(note) => Some(note),
            TrimOutcome::Silent => None,
        }
    }
}

/// Notes produced by [`trim_notes`] plus the number dropped as silent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrimmedNotes {
    /// Notes ordered by start time, each with `start_time < end_time`
    pub notes: Vec<NoteEvent>,
    /// Notes dropped because they never rose above the noise floor
    pub silent: usize,
}

/// Trim a single note against the envelope
///
/// # Arguments
///
/// * `note` - Note in frame units
/// * `envelope` - Prepared amplitude envelope, if any
/// * `config` - Noise floor, minimum duration and frame period
pub fn trim_note(
    note: &FilteredNote,
    envelope: Option<&PreparedEnvelope>,
    config: &SegmentationConfig,
) -> TrimOutcome {
    let s = note.start_frame;
    let f = note.end_frame;

    let envelope = match envelope {
        Some(envelope) if config.is_trimmable_span(note.frame_len()) => envelope,
        _ => return TrimOutcome::PassedThrough(to_event(note, s, f, config)),
    };

    let samples = envelope.samples();
    let f_clipped = f.min(samples.len());
    if s >= f_clipped {
        return TrimOutcome::Silent;
    }

    let audible = &samples[s..f_clipped];
    let first = audible.iter().position(|&v| v > config.noise_floor);
    let last = audible.iter().rposition(|&v| v > config.noise_floor);

    match (first, last) {
        (Some(k), Some(j)) => TrimOutcome::Trimmed(to_event(note, s + k, s + j + 1, config)),
        _ => TrimOutcome::Silent,
    }
}

/// Trim every note, drop silent and empty ones, and order by start time
pub fn trim_notes(
    notes: &[FilteredNote],
    envelope: Option<&PreparedEnvelope>,
    config: &SegmentationConfig,
) -> TrimmedNotes {
    let mut silent = 0usize;
    let mut trimmed = 0usize;
    let mut events: Vec<NoteEvent> = Vec::with_capacity(notes.len());

    for note in notes {
        match trim_note(note, envelope, config) {
            TrimOutcome::Trimmed(event) => {
                trimmed += 1;
                events.push(event);
            }
            TrimOutcome::PassedThrough(event) => events.push(event),
            TrimOutcome::Silent => {
                log::debug!(
                    "Dropping silent note at frames {}..{} (pitch {})",
                    note.start_frame,
                    note.end_frame,
                    note.pitch_midi
                );
                silent += 1;
            }
        }
    }

    events.retain(|e| e.start_time < e.end_time);
    events.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    log::debug!(
        "Boundary trimming: {} notes kept ({} trimmed), {} dropped as silent",
        events.len(),
        trimmed,
        silent
    );

    TrimmedNotes {
        notes: events,
        silent,
    }
}

fn to_event(note: &FilteredNote, start: usize, end: usize, config: &SegmentationConfig) -> NoteEvent {
    NoteEvent {
        pitch_midi: note.pitch_midi,
        velocity: note.velocity,
        start_time: config.frame_to_seconds(start),
        end_time: config.frame_to_seconds(end),
        frequency_hz: note.frequency_hz,
        confidence: note.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(start: usize, end: usize) -> FilteredNote {
        FilteredNote {
            pitch_midi: 60,
            velocity: 90,
            start_frame: start,
            end_frame: end,
            frequency_hz: 261.63,
            confidence: 0.9,
            transition_strength: 0.2,
        }
    }

    fn assert_times(event: &NoteEvent, start: f32, end: f32) {
        assert!((event.start_time - start).abs() < 1e-5, "start {}", event.start_time);
        assert!((event.end_time - end).abs() < 1e-5, "end {}", event.end_time);
    }

    #[test]
    fn test_trim_to_audible_frames() {
        let mut envelope = vec![0.0; 100];
        for v in &mut envelope[15..70] {
            *v = 0.5;
        }
        let envelope = PreparedEnvelope::new(&envelope, 6.0);
        let config = SegmentationConfig::default();

        match trim_note(&note(10, 80), Some(&envelope), &config) {
            TrimOutcome::Trimmed(event) => assert_times(&event, 0.15, 0.70),
            other => panic!("expected trimmed note, got {:?}", other),
        }
    }

    #[test]
    fn test_silent_note_dropped() {
        let envelope = PreparedEnvelope::new(&[0.005; 50], 6.0);
        let config = SegmentationConfig::default();
        assert_eq!(
            trim_note(&note(0, 50), Some(&envelope), &config),
            TrimOutcome::Silent
        );
    }

    #[test]
    fn test_short_note_passes_through() {
        let envelope = PreparedEnvelope::new(&[0.0; 50], 6.0);
        let config = SegmentationConfig::default();
        // Two frames is shorter than the 3-frame minimum
        match trim_note(&note(10, 12), Some(&envelope), &config) {
            TrimOutcome::PassedThrough(event) => assert_times(&event, 0.10, 0.12),
            other => panic!("expected pass-through, got {:?}", other),
        }
    }

    #[test]
    fn test_no_envelope_passes_through() {
        let config = SegmentationConfig::default();
        let outcome = trim_note(&note(0, 200), None, &config);
        assert!(matches!(outcome, TrimOutcome::PassedThrough(_)));
        assert_times(&outcome.note().unwrap(), 0.0, 2.0);
    }

    #[test]
    fn test_trim_notes_sorts_and_counts_silent() {
        let mut envelope = vec![0.3; 300];
        for v in &mut envelope[100..200] {
            *v = 0.0;
        }
        let envelope = PreparedEnvelope::new(&envelope, 6.0);
        let config = SegmentationConfig::default();

        let notes = vec![note(200, 300), note(100, 200), note(0, 100)];
        let trimmed = trim_notes(&notes, Some(&envelope), &config);

        assert_eq!(trimmed.silent, 1);
        assert_eq!(trimmed.notes.len(), 2);
        assert_times(&trimmed.notes[0], 0.0, 1.0);
        assert_times(&trimmed.notes[1], 2.0, 3.0);
    }

    #[test]
    fn test_empty_spans_removed() {
        let config = SegmentationConfig::default();
        let trimmed = trim_notes(&[note(5, 5), note(6, 20)], None, &config);
        assert_eq!(trimmed.notes.len(), 1);
        assert_times(&trimmed.notes[0], 0.06, 0.20);
    }
}
