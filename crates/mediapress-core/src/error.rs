//! Error types module
//!
//! This module provides the error taxonomy for the conversion workflow. Every
//! failure a caller can observe is one of three classes: the upload was
//! rejected up front, durable storage misbehaved while staging, or the
//! external decode/resize/encode step failed. Each variant carries a single
//! human-readable reason; no failure is allowed to escape as a panic.

/// Unified error for the conversion workflow.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The upload was rejected before any conversion work started
    /// (extension outside the allow-list, empty payload, bad parameters).
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// A durable storage write or read failed while staging data for an
    /// external tool.
    #[error("Staging failed: {0}")]
    Staging(String),

    /// The external decode/resize/encode step failed (corrupt input,
    /// encoder error, timeout).
    #[error("Transform failed: {0}")]
    Transform(String),
}

impl ConvertError {
    pub fn unsupported(reason: impl Into<String>) -> Self {
        ConvertError::UnsupportedInput(reason.into())
    }

    pub fn staging(reason: impl Into<String>) -> Self {
        ConvertError::Staging(reason.into())
    }

    pub fn transform(reason: impl Into<String>) -> Self {
        ConvertError::Transform(reason.into())
    }

    /// The underlying reason text, without the variant prefix.
    pub fn reason(&self) -> &str {
        match self {
            ConvertError::UnsupportedInput(reason)
            | ConvertError::Staging(reason)
            | ConvertError::Transform(reason) => reason,
        }
    }

    /// Machine-readable error code (e.g., "TRANSFORM_FAILURE")
    pub fn error_code(&self) -> &'static str {
        match self {
            ConvertError::UnsupportedInput(_) => "UNSUPPORTED_INPUT",
            ConvertError::Staging(_) => "STAGING_FAILURE",
            ConvertError::Transform(_) => "TRANSFORM_FAILURE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_input() {
        let err = ConvertError::unsupported("extension ogg is not allowed");
        assert_eq!(err.error_code(), "UNSUPPORTED_INPUT");
        assert_eq!(err.reason(), "extension ogg is not allowed");
        assert_eq!(
            err.to_string(),
            "Unsupported input: extension ogg is not allowed"
        );
    }

    #[test]
    fn test_staging_failure() {
        let err = ConvertError::staging("disk full");
        assert_eq!(err.error_code(), "STAGING_FAILURE");
        assert_eq!(err.reason(), "disk full");
        assert_eq!(err.to_string(), "Staging failed: disk full");
    }

    #[test]
    fn test_transform_failure() {
        let err = ConvertError::transform("encoder exited with status 1");
        assert_eq!(err.error_code(), "TRANSFORM_FAILURE");
        assert_eq!(err.reason(), "encoder exited with status 1");
        assert_eq!(
            err.to_string(),
            "Transform failed: encoder exited with status 1"
        );
    }
}
