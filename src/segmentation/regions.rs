//! Region carving
//!
//! Splits the frame timeline into transition and note regions. Every
//! confidence-dip peak contributes one transition spanning its half-height
//! width; note regions are whatever lies between consecutive transitions.
//!
//! The result always partitions `[0, n]`: overlapping transitions are
//! coalesced, and note regions too short to be meaningful (one frame or
//! less) are folded into the neighbouring transition rather than left as gaps.

use super::{Region, RegionKind};
use crate::features::peaks::Peak;
use crate::preprocessing::normalization::round_half_even;

/// Note regions shorter than or equal to this many frames are discarded
const MIN_NOTE_FRAMES: usize = 1;

/// Carve the timeline into transition and note regions
///
/// # Arguments
///
/// * `dip_peaks` - Confidence-dip peaks with half-height bounds
/// * `n` - Number of frames
///
/// # Returns
///
/// Non-empty regions in time order, covering `[0, n]` exactly
///
/// # Example
///
/// ```
/// use note_segmenter::features::peaks::Peak;
/// use note_segmenter::segmentation::regions::{carve_regions, note_regions};
///
/// let dip = Peak { index: 102, height: 0.9, prominence: 0.8, left_bound: 99.5, right_bound: 104.5 };
/// let regions = carve_regions(&[dip], 205);
/// let notes: Vec<(usize, usize)> = note_regions(&regions).map(|r| (r.start, r.end)).collect();
///
/// assert_eq!(notes, vec![(0, 100), (104, 205)]);
/// ```
pub fn carve_regions(dip_peaks: &[Peak], n: usize) -> Vec<Region> {
    let transitions = coalesce(
        dip_peaks
            .iter()
            .map(|p| (round_frame(p.left_bound, n), round_frame(p.right_bound, n)))
            .collect(),
    );

    // Notes sit between transitions: [0] + ends paired with starts + [n]
    let note_starts = std::iter::once(0).chain(transitions.iter().map(|&(_, end)| end));
    let note_ends = transitions
        .iter()
        .map(|&(start, _)| start)
        .chain(std::iter::once(n));

    let mut raw = Vec::with_capacity(transitions.len() * 2 + 1);
    for (i, (start, end)) in note_starts.zip(note_ends).enumerate() {
        let kind = if end > start && end - start > MIN_NOTE_FRAMES {
            RegionKind::Note
        } else {
            RegionKind::Transition
        };
        raw.push(Region { start, end, kind });

        if let Some(&(start, end)) = transitions.get(i) {
            raw.push(Region {
                start,
                end,
                kind: RegionKind::Transition,
            });
        }
    }

    let regions = merge_adjacent_transitions(raw);

    log::debug!(
        "Carved {} regions ({} notes, {} transitions) over {} frames",
        regions.len(),
        regions.iter().filter(|r| r.kind == RegionKind::Note).count(),
        regions
            .iter()
            .filter(|r| r.kind == RegionKind::Transition)
            .count(),
        n
    );

    regions
}

/// Note regions of a carved timeline
pub fn note_regions(regions: &[Region]) -> impl Iterator<Item = &Region> {
    regions.iter().filter(|r| r.kind == RegionKind::Note)
}

fn round_frame(bound: f32, n: usize) -> usize {
    round_half_even(bound).clamp(0.0, n as f32) as usize
}

/// Sort transitions and merge the ones that overlap or touch
fn coalesce(mut spans: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    spans.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1 => {
                last.1 = last.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Drop empty regions and fuse runs of transitions into one
fn merge_adjacent_transitions(raw: Vec<Region>) -> Vec<Region> {
    let mut regions: Vec<Region> = Vec::with_capacity(raw.len());
    for region in raw.into_iter().filter(|r| !r.is_empty()) {
        match regions.last_mut() {
            Some(last)
                if last.kind == RegionKind::Transition && region.kind == RegionKind::Transition =>
            {
                last.end = region.end;
            }
            _ => regions.push(region),
        }
    }
    regions
}
