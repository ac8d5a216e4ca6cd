//! Segment summarization
//!
//! Reduces every note region to a fixed-shape [`Segment`]: median pitch,
//! frequency and confidence, the confidence dip at its start, and its peak
//! amplitude on the velocity scale.

use super::{Region, RegionKind, Segment, SegmentPitch};
use crate::preprocessing::amplitude::PreparedEnvelope;
use crate::preprocessing::normalization::{median, round_half_even};
use crate::preprocessing::pitch::clamp_to_midi;

/// Per-frame tracks a segment is summarized from
#[derive(Debug, Clone, Copy)]
pub struct SegmentInputs<'a> {
    /// Frequency per frame in Hz
    pub frequency: &'a [f32],
    /// Tracker confidence per frame
    pub confidence: &'a [f32],
    /// Tuning-corrected MIDI pitch per frame
    pub pitch_midi: &'a [f32],
    /// Prepared amplitude envelope, if one was supplied
    pub envelope: Option<&'a PreparedEnvelope>,
}

/// How segments are judged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryParams {
    /// Guided transcription target; other pitches are rejected
    pub target_midi_note: Option<u8>,
    /// Amplitude used when there is no envelope
    pub default_amplitude: f32,
}

/// Summarize every note region
///
/// Transition regions and note regions of one frame or less are skipped.
///
/// # Returns
///
/// Segments in time order
pub fn summarize_segments(
    regions: &[Region],
    inputs: &SegmentInputs<'_>,
    params: &SummaryParams,
) -> Vec<Segment> {
    let segments: Vec<Segment> = regions
        .iter()
        .filter(|r| r.kind == RegionKind::Note)
        .filter_map(|r| summarize_region(r.start, r.end, inputs, params))
        .collect();

    log::debug!(
        "Summarized {} segments ({} rejected)",
        segments.len(),
        segments
            .iter()
            .filter(|s| s.pitch == SegmentPitch::Rejected)
            .count()
    );

    segments
}

/// Summarize the frames `[start, end)`
///
/// # Returns
///
/// `None` if the range holds one frame or less after clipping to the input
pub fn summarize_region(
    start: usize,
    end: usize,
    inputs: &SegmentInputs<'_>,
    params: &SummaryParams,
) -> Option<Segment> {
    let end = end.min(inputs.frequency.len());
    if end <= start + 1 {
        return None;
    }

    let frequency_hz = median(&inputs.frequency[start..end])?;
    let confidence = median(&inputs.confidence[start..end])?;
    let median_pitch = median(&inputs.pitch_midi[start..end])?;
    let transition_strength = 1.0 - inputs.confidence[start];

    let amplitude = match inputs.envelope {
        Some(envelope) => envelope.scaled_max(start, end),
        None => params.default_amplitude,
    };

    let pitch = if frequency_hz <= 0.0 {
        SegmentPitch::Rejected
    } else {
        let rounded = clamp_to_midi(round_half_even(median_pitch));
        match params.target_midi_note {
            Some(target) if target != rounded => SegmentPitch::Rejected,
            _ => SegmentPitch::Accepted(rounded),
        }
    };

    Some(Segment {
        pitch,
        frequency_hz,
        confidence,
        transition_strength,
        amplitude,
        start_frame: start,
        end_frame: end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(start: usize, end: usize) -> Region {
        Region {
            start,
            end,
            kind: RegionKind::Note,
        }
    }

    fn params(target: Option<u8>) -> SummaryParams {
        SummaryParams {
            target_midi_note: target,
            default_amplitude: 80.0,
        }
    }

    #[test]
    fn test_summarize_basic_region() {
        let frequency = vec![440.0, 441.0, 439.0, 440.0];
        let confidence = vec![0.6, 0.9, 0.8, 0.95];
        let pitch = vec![69.0, 69.04, 68.96, 69.0];
        let inputs = SegmentInputs {
            frequency: &frequency,
            confidence: &confidence,
            pitch_midi: &pitch,
            envelope: None,
        };

        let segment = summarize_region(0, 4, &inputs, &params(None)).unwrap();
        assert_eq!(segment.pitch, SegmentPitch::Accepted(69));
        assert_eq!(segment.frequency_hz, 440.0);
        assert!((segment.confidence - 0.85).abs() < 1e-6);
        assert!((segment.transition_strength - 0.4).abs() < 1e-6);
        assert_eq!(segment.amplitude, 80.0);
        assert_eq!((segment.start_frame, segment.end_frame), (0, 4));
    }

    #[test]
    fn test_amplitude_from_envelope() {
        let frequency = vec![440.0; 6];
        let confidence = vec![0.9; 6];
        let pitch = vec![69.0; 6];
        let envelope = PreparedEnvelope::new(&[0.1, 0.2, 0.5, 1.0, 0.4, 0.2], 6.0);
        let inputs = SegmentInputs {
            frequency: &frequency,
            confidence: &confidence,
            pitch_midi: &pitch,
            envelope: Some(&envelope),
        };

        let first = summarize_region(0, 3, &inputs, &params(None)).unwrap();
        assert_eq!(first.amplitude, 63.5);
        let second = summarize_region(3, 6, &inputs, &params(None)).unwrap();
        assert_eq!(second.amplitude, 127.0);
    }

    #[test]
    fn test_guided_mode_rejects_off_target() {
        let frequency = vec![440.0; 4];
        let confidence = vec![0.9; 4];
        let pitch = vec![69.0; 4];
        let inputs = SegmentInputs {
            frequency: &frequency,
            confidence: &confidence,
            pitch_midi: &pitch,
            envelope: None,
        };

        let on_target = summarize_region(0, 4, &inputs, &params(Some(69))).unwrap();
        assert_eq!(on_target.pitch, SegmentPitch::Accepted(69));
        let off_target = summarize_region(0, 4, &inputs, &params(Some(70))).unwrap();
        assert_eq!(off_target.pitch, SegmentPitch::Rejected);
    }

    #[test]
    fn test_unpitched_region_rejected() {
        let frequency = vec![0.0; 5];
        let confidence = vec![0.2; 5];
        let pitch = vec![0.0; 5];
        let inputs = SegmentInputs {
            frequency: &frequency,
            confidence: &confidence,
            pitch_midi: &pitch,
            envelope: None,
        };
        let segment = summarize_region(0, 5, &inputs, &params(None)).unwrap();
        assert_eq!(segment.pitch, SegmentPitch::Rejected);
    }

    #[test]
    fn test_short_and_transition_regions_skipped() {
        let frequency = vec![440.0; 10];
        let confidence = vec![0.9; 10];
        let pitch = vec![69.0; 10];
        let inputs = SegmentInputs {
            frequency: &frequency,
            confidence: &confidence,
            pitch_midi: &pitch,
            envelope: None,
        };
        let regions = vec![
            note(0, 1),
            Region {
                start: 1,
                end: 3,
                kind: RegionKind::Transition,
            },
            note(3, 10),
        ];
        let segments = summarize_segments(&regions, &inputs, &params(None));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_frame, 3);
    }
}
