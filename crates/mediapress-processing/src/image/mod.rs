//! Image conversion
//!
//! Re-encodes uploaded images as JPEG (mozjpeg) or PNG, fully in memory.

mod transformer;

pub use transformer::{ImageCodec, ImageTransformOptions, ImageTransformer};
