//! Peak detection with prominence and half-height widths
//!
//! Finds local maxima in a 1D signal, enforces a minimum index separation and
//! a minimum prominence, and measures each surviving peak's width at half of
//! its prominence. The widths of confidence-dip peaks become transition
//! regions; see [`crate::segmentation::regions`].
//!
//! # Algorithm
//!
//! 1. Find all local maxima (flat tops resolve to the plateau midpoint)
//! 2. Enforce minimum distance (keep the higher peak, then the earlier one)
//! 3. Compute prominence and drop peaks below the threshold
//! 4. Measure width at `peak - prominence / 2`, interpolating crossings
//!
//! # Example
//!
//! ```
//! use note_segmenter::features::peaks::find_peaks;
//!
//! let signal = vec![0.1, 0.1, 0.9, 0.1, 0.1, 0.1, 0.1, 0.5, 0.1, 0.1];
//! let peaks = find_peaks(&signal, 4, 0.2);
//!
//! assert_eq!(peaks.len(), 2);
//! assert_eq!(peaks[0].index, 2);
//! assert_eq!(peaks[1].index, 7);
//! ```

/// Relative height at which peak widths are measured
pub const HALF_HEIGHT: f32 = 0.5;

/// A detected peak with its prominence and half-height boundaries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Frame index of the peak
    pub index: usize,

    /// Signal value at the peak
    pub height: f32,

    /// Height above the higher of the two surrounding valleys
    pub prominence: f32,

    /// Interpolated left crossing of the half-height line (frames)
    pub left_bound: f32,

    /// Interpolated right crossing of the half-height line (frames)
    pub right_bound: f32,
}

impl Peak {
    /// Width between the half-height crossings in frames
    pub fn width(&self) -> f32 {
        self.right_bound - self.left_bound
    }
}

/// Prominence of a peak together with the valley positions bounding it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prominence {
    /// Height above the higher of the two valleys
    pub value: f32,

    /// Index of the lowest point left of the peak before a higher sample
    pub left_base: usize,

    /// Index of the lowest point right of the peak before a higher sample
    pub right_base: usize,
}

/// Find peaks with a minimum separation and minimum prominence
///
/// # Arguments
///
/// * `signal` - Signal to find peaks in
/// * `min_distance` - Minimum index distance between kept peaks (values below 1 act as 1)
/// * `min_prominence` - Minimum prominence of kept peaks
///
/// # Returns
///
/// Peaks sorted by index, each with half-height width boundaries
pub fn find_peaks(signal: &[f32], min_distance: usize, min_prominence: f32) -> Vec<Peak> {
    log::debug!(
        "Finding peaks in signal of length {}, min_distance={}, min_prominence={:.4}",
        signal.len(),
        min_distance,
        min_prominence
    );

    let candidates = local_maxima(signal);
    let spaced = select_by_distance(signal, &candidates, min_distance);

    let peaks: Vec<Peak> = spaced
        .into_iter()
        .filter_map(|index| {
            let prominence = peak_prominence(signal, index);
            if prominence.value < min_prominence {
                return None;
            }
            let (left_bound, right_bound) = peak_width(signal, index, &prominence, HALF_HEIGHT);
            Some(Peak {
                index,
                height: signal[index],
                prominence: prominence.value,
                left_bound,
                right_bound,
            })
        })
        .collect();

    log::debug!(
        "Found {} peaks ({} local maxima)",
        peaks.len(),
        candidates.len()
    );

    peaks
}

/// Find all local maxima
///
/// A sample is a maximum if it is strictly higher than its left neighbour and
/// the first differing sample to its right is lower. For flat tops the
/// plateau midpoint (rounded down) is reported. The first and last samples
/// are never maxima.
///
/// # Returns
///
/// Indices of local maxima in increasing order
pub fn local_maxima(signal: &[f32]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if signal.len() < 3 {
        return maxima;
    }

    let last = signal.len() - 1;
    let mut i = 1;
    while i < last {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    maxima
}

/// Keep only peaks that are at least `min_distance` apart
///
/// Candidates are visited from highest to lowest value, ties resolved in
/// favour of the earlier index. A candidate is kept if no already-kept peak
/// lies closer than `min_distance`.
///
/// # Returns
///
/// Kept indices in increasing order
pub fn select_by_distance(signal: &[f32], candidates: &[usize], min_distance: usize) -> Vec<usize> {
    if min_distance <= 1 || candidates.len() < 2 {
        return candidates.to_vec();
    }

    let mut by_priority = candidates.to_vec();
    by_priority.sort_by(|&a, &b| {
        signal[b]
            .partial_cmp(&signal[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut kept: Vec<usize> = Vec::with_capacity(by_priority.len());
    for idx in by_priority {
        let too_close = kept.iter().any(|&k| idx.abs_diff(k) < min_distance);
        if !too_close {
            kept.push(idx);
        }
    }

    kept.sort_unstable();
    kept
}

/// Prominence of the peak at `index`
///
/// Walks outward in both directions while the signal does not exceed the
/// peak, tracking the lowest sample seen. The signal edges bound the walk.
pub fn peak_prominence(signal: &[f32], index: usize) -> Prominence {
    let height = signal[index];

    let mut left_min = height;
    let mut left_base = index;
    let mut i = index;
    loop {
        if signal[i] > height {
            break;
        }
        if signal[i] < left_min {
            left_min = signal[i];
            left_base = i;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut right_min = height;
    let mut right_base = index;
    for (j, &v) in signal.iter().enumerate().skip(index) {
        if v > height {
            break;
        }
        if v < right_min {
            right_min = v;
            right_base = j;
        }
    }

    Prominence {
        value: height - left_min.max(right_min),
        left_base,
        right_base,
    }
}

/// Interpolated width of the peak at `index`
///
/// The reference line sits at `peak - prominence * rel_height`. From the peak
/// the walk moves outward while the signal stays above the line, stopping at
/// the prominence bases at the latest; the crossing is linearly interpolated
/// between the last sample above and the first sample below.
///
/// # Returns
///
/// `(left_bound, right_bound)` in fractional frames
pub fn peak_width(
    signal: &[f32],
    index: usize,
    prominence: &Prominence,
    rel_height: f32,
) -> (f32, f32) {
    let reference = signal[index] - prominence.value * rel_height;

    let mut i = index;
    while prominence.left_base < i && reference < signal[i] {
        i -= 1;
    }
    let mut left = i as f32;
    if signal[i] < reference {
        left += (reference - signal[i]) / (signal[i + 1] - signal[i]);
    }

    let mut i = index;
    while i < prominence.right_base && reference < signal[i] {
        i += 1;
    }
    let mut right = i as f32;
    if signal[i] < reference {
        right -= (reference - signal[i]) / (signal[i - 1] - signal[i]);
    }

    (left, right)
}
