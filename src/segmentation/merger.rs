//! Segment merging
//!
//! A sustained note is often cut into several segments by brief confidence
//! wobbles. Consecutive segments at the same rounded pitch are joined back
//! into one candidate note; a pitch change of more than half a semitone
//! starts a new one.

use super::{CandidateNote, Segment};

/// Group consecutive same-pitch segments into candidate notes
///
/// # Arguments
///
/// * `segments` - Segments in time order
///
/// # Returns
///
/// Candidate notes in time order; every segment appears in exactly one
pub fn merge_segments(segments: &[Segment]) -> Vec<CandidateNote> {
    let mut candidates: Vec<CandidateNote> = Vec::new();
    let mut open: Vec<Segment> = Vec::new();

    for segment in segments {
        if let Some(previous) = open.last() {
            if !previous.pitch.same_note_as(&segment.pitch) {
                candidates.push(CandidateNote {
                    segments: std::mem::take(&mut open),
                });
            }
        }
        open.push(*segment);
    }

    if !open.is_empty() {
        candidates.push(CandidateNote { segments: open });
    }

    log::debug!(
        "Merged {} segments into {} candidate notes",
        segments.len(),
        candidates.len()
    );

    candidates
}
