//! Core traits for media conversion
//!
//! This module defines the unified interface the converter drives each codec
//! through.

use async_trait::async_trait;
use bytes::Bytes;

use mediapress_core::ConvertError;

/// Media transformer trait - turns input bytes into converted output bytes
#[async_trait]
pub trait MediaTransformer: Send + Sync {
    type Options: Send + Sync;

    /// Apply the conversion to media data
    async fn transform(&self, data: &[u8], options: Self::Options) -> Result<Bytes, ConvertError>;
}
