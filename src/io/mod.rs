//! Input signal modules
//!
//! Frame-rate signals handed over by the external pitch tracker, envelope
//! extractor and onset model.

pub mod frame_signals;
