//! Note segmentation modules
//!
//! Turns transition peaks into discrete notes:
//! - Region carving (transition / note partition of the timeline)
//! - Segment summarization (pitch, frequency, confidence, amplitude per note region)
//! - Segment merging (adjacent segments at the same pitch)
//! - Note filtering (amplitude and target pitch)
//! - Onset re-splitting (repeated notes at one pitch)
//! - Boundary trimming (noise-floor start/end, conversion to seconds)

pub mod filter;
pub mod merger;
pub mod regions;
pub mod resplit;
pub mod summarizer;
pub mod trim;

/// Kind of a timeline region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Pitch is moving or the tracker is unsure
    Transition,
    /// Candidate stable note
    Note,
}

/// Half-open frame interval `[start, end)` of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// First frame
    pub start: usize,
    /// One past the last frame
    pub end: usize,
    /// Transition or note
    pub kind: RegionKind,
}

impl Region {
    /// Number of frames covered
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True if the region covers no frames
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pitch verdict for a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPitch {
    /// Rounded MIDI pitch of a usable segment
    Accepted(u8),
    /// Unpitched, or off the guided target
    Rejected,
}

impl SegmentPitch {
    /// MIDI pitch if accepted
    pub fn midi(&self) -> Option<u8> {
        match self {
            SegmentPitch::Accepted(p) => Some(*p),
            SegmentPitch::Rejected => None,
        }
    }

    /// True if both verdicts describe the same sounding pitch
    ///
    /// Accepted pitches match within half a semitone; two rejected segments
    /// match each other but never an accepted one.
    pub fn same_note_as(&self, other: &SegmentPitch) -> bool {
        match (self, other) {
            (SegmentPitch::Accepted(a), SegmentPitch::Accepted(b)) => {
                (*a as f32 - *b as f32).abs() <= 0.5
            }
            (SegmentPitch::Rejected, SegmentPitch::Rejected) => true,
            _ => false,
        }
    }
}

/// Summary of one note region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Rounded median pitch, or rejection
    pub pitch: SegmentPitch,
    /// Median frequency in Hz
    pub frequency_hz: f32,
    /// Median tracker confidence
    pub confidence: f32,
    /// `1 - confidence` at the first frame
    pub transition_strength: f32,
    /// Peak amplitude on the 0-127 scale
    pub amplitude: f32,
    /// First frame
    pub start_frame: usize,
    /// One past the last frame (always greater than `start_frame`)
    pub end_frame: usize,
}

/// Run of adjacent segments judged to be one sounding note
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateNote {
    /// Segments in time order (never empty)
    pub segments: Vec<Segment>,
}

/// Note that passed the filter, still in frame units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilteredNote {
    /// MIDI pitch (0-127)
    pub pitch_midi: u8,
    /// MIDI velocity (0-127)
    pub velocity: u8,
    /// First frame
    pub start_frame: usize,
    /// One past the last frame
    pub end_frame: usize,
    /// Frequency of the first surviving segment in Hz
    pub frequency_hz: f32,
    /// Median confidence of the surviving segments
    pub confidence: f32,
    /// Transition strength of the candidate's last segment
    pub transition_strength: f32,
}

impl FilteredNote {
    /// Number of frames covered
    pub fn frame_len(&self) -> usize {
        self.end_frame.saturating_sub(self.start_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_note_as() {
        let a = SegmentPitch::Accepted(69);
        assert!(a.same_note_as(&SegmentPitch::Accepted(69)));
        assert!(!a.same_note_as(&SegmentPitch::Accepted(70)));
        assert!(!a.same_note_as(&SegmentPitch::Rejected));
        assert!(SegmentPitch::Rejected.same_note_as(&SegmentPitch::Rejected));
        // MIDI pitch 0 is a real pitch, not a rejection
        assert!(!SegmentPitch::Accepted(0).same_note_as(&SegmentPitch::Rejected));
    }

    #[test]
    fn test_region_len() {
        let region = Region {
            start: 4,
            end: 10,
            kind: RegionKind::Note,
        };
        assert_eq!(region.len(), 6);
        assert!(!region.is_empty());
    }
}
