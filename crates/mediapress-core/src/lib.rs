//! Mediapress Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared across all Mediapress components.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::ConverterConfig;
pub use error::ConvertError;
pub use models::{
    Algorithm, Bitrate, ConversionRequest, ConversionResult, MediaKind, ResolutionPreset,
    TargetFormat, UploadedAsset,
};
