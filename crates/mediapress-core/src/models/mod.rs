//! Data models for the conversion workflow
//!
//! This module contains the data structures shared by the converter and its
//! callers: what was uploaded, what conversion was requested, and what came
//! back.

mod media;

pub use media::*;
