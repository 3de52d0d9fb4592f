//! Mediapress Processing Library
//!
//! This crate implements the conversion workflow: validate an upload, run it
//! through the codec for the requested format, and package the bytes that
//! come back. Audio and image conversions run fully in memory; video is
//! staged to disk for ffmpeg and the staged files are removed on every exit
//! path.

pub mod audio;
pub mod converter;
pub mod image;
pub mod packager;
pub mod staging;
pub mod traits;
pub mod validator;
pub mod video;

// Re-export commonly used types
pub use audio::{AudioCodec, AudioTransformOptions, AudioTransformer};
pub use converter::Converter;
pub use image::{ImageCodec, ImageTransformOptions, ImageTransformer};
pub use staging::StagedFile;
pub use traits::MediaTransformer;
pub use validator::{MediaValidator, ValidationError};
pub use video::{VideoCodec, VideoTransformOptions, VideoTransformer};
