//! Signal preprocessing modules
//!
//! This module contains utilities for preparing frame signals for segmentation:
//! - Normalization and summary statistics (min-max, gradient, median)
//! - Frequency / MIDI / note-name conversion
//! - Tuning offset estimation
//! - Amplitude envelope outlier suppression and velocity scaling

pub mod amplitude;
pub mod normalization;
pub mod pitch;
pub mod tuning;
