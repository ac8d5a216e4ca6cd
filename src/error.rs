//! Error types for the note segmentation engine

use std::fmt;

/// Errors that can occur during note segmentation
///
/// Only malformed input is fatal. Empty or silent signals, stages that filter
/// everything away, and notes that fail boundary adjustment are recovered
/// locally and show up as a shorter (possibly empty) note list instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentationError {
    /// Frame-indexed signals do not share the same length
    InputLengthMismatch {
        /// Name of the offending signal
        signal: &'static str,
        /// Length of the frequency signal
        expected: usize,
        /// Length of the offending signal
        actual: usize,
    },

    /// Invalid input parameters
    InvalidInput(String),
}

impl fmt::Display for SegmentationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentationError::InputLengthMismatch {
                signal,
                expected,
                actual,
            } => write!(
                f,
                "Input length mismatch: {} has {} frames, expected {}",
                signal, actual, expected
            ),
            SegmentationError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for SegmentationError {}
