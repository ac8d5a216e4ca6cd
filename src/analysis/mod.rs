//! Segmentation output
//!
//! Note events and the metadata describing how they were produced.

pub mod result;
