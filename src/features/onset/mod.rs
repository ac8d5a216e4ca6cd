//! Onset activation modules
//!
//! Helpers for the externally produced onset signal used to re-split repeated notes:
//! - Peak-picked binarization of a raw activation curve
//! - Accumulation of context-window predictions into a per-frame curve

pub mod activation;
pub mod window_fold;

pub use activation::{binarize_activation, onsets_above};
pub use window_fold::{accumulate_window_predictions, windowed_onsets, WindowedOnsetConfig};
