//! Audio conversion
//!
//! Decodes uploaded audio to interleaved PCM in memory and re-encodes it as
//! FLAC or WAV. No audio data touches disk.

pub mod pcm;
mod transformer;

pub use transformer::{AudioCodec, AudioTransformOptions, AudioTransformer};
