//! Segmentation result types

use serde::{Deserialize, Serialize};

use crate::preprocessing::pitch::midi_to_note_name;

/// A detected note
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI pitch (0-127)
    pub pitch_midi: u8,

    /// MIDI velocity (0-127)
    pub velocity: u8,

    /// Note start in seconds
    pub start_time: f32,

    /// Note end in seconds (always after `start_time`)
    pub end_time: f32,

    /// Frequency of the note's first stable segment in Hz
    pub frequency_hz: f32,

    /// Median tracker confidence (0.0-1.0)
    pub confidence: f32,
}

impl NoteEvent {
    /// Note length in seconds
    pub fn duration(&self) -> f32 {
        self.end_time - self.start_time
    }

    /// Pitch in scientific notation (e.g., "A4", "C#3")
    ///
    /// # Example
    ///
    /// ```
    /// use note_segmenter::NoteEvent;
    ///
    /// let note = NoteEvent {
    ///     pitch_midi: 69,
    ///     velocity: 80,
    ///     start_time: 0.0,
    ///     end_time: 0.5,
    ///     frequency_hz: 440.0,
    ///     confidence: 0.9,
    /// };
    /// assert_eq!(note.note_name(), "A4");
    /// assert_eq!(note.duration(), 0.5);
    /// ```
    pub fn note_name(&self) -> String {
        midi_to_note_name(self.pitch_midi)
    }
}

/// Segmentation flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentationFlag {
    /// The input held no frames with a positive frequency
    NoPitchedFrames,
    /// Onset splitting was enabled but no onset activation was supplied
    SplittingSkippedNoActivation,
    /// At least one note was dropped because its envelope never rose above the noise floor
    SilentNotesDropped,
}

/// Complete segmentation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationResult {
    /// Detected notes, ordered by start time
    pub notes: Vec<NoteEvent>,

    /// Segmentation metadata
    pub metadata: SegmentationMetadata,
}

/// Segmentation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationMetadata {
    /// Number of input frames
    pub frame_count: usize,

    /// Input duration in seconds
    pub duration_seconds: f32,

    /// Frame period in seconds
    pub frame_period_seconds: f32,

    /// Tuning offset applied to the pitch track, in cents
    pub tuning_offset_cents: f32,

    /// True if the tuning offset was estimated rather than supplied
    pub tuning_estimated: bool,

    /// Confidence-dip peaks used as transitions
    pub transition_count: usize,

    /// Peaks of the pitch-instability signal (diagnostic only)
    pub change_point_peak_count: usize,

    /// Summarized note segments
    pub segment_count: usize,

    /// Candidate notes after merging
    pub candidate_count: usize,

    /// Notes surviving the amplitude / target filter
    pub filtered_count: usize,

    /// Notes after onset re-splitting
    pub split_count: usize,

    /// Notes dropped by the boundary trimmer as silent
    pub silent_notes_dropped: usize,

    /// True if onset re-splitting ran
    pub splitting_applied: bool,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Segmentation flags
    pub flags: Vec<SegmentationFlag>,
}

impl Default for SegmentationMetadata {
    fn default() -> Self {
        Self {
            frame_count: 0,
            duration_seconds: 0.0,
            frame_period_seconds: 0.0,
            tuning_offset_cents: 0.0,
            tuning_estimated: false,
            transition_count: 0,
            change_point_peak_count: 0,
            segment_count: 0,
            candidate_count: 0,
            filtered_count: 0,
            split_count: 0,
            silent_notes_dropped: 0,
            splitting_applied: false,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            flags: vec![],
        }
    }
}
