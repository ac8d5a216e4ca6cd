//! Feature extraction modules
//!
//! This module contains the signal analysis that drives segmentation:
//! - Change-point (instability) signal
//! - Peak detection with prominence and half-height widths
//! - Onset activation helpers

pub mod change_point;
pub mod onset;
pub mod peaks;
