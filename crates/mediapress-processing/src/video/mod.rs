//! Video conversion
//!
//! ffmpeg only reads and writes filesystem paths, so video is the one kind
//! that goes through staging: write the upload to a staged input, reserve a
//! staged output, run the encoder, read the product back, unstage both.

mod transformer;

pub use transformer::{VideoCodec, VideoTransformOptions, VideoTransformer};
