use std::path::Path;

use mediapress_core::models::MediaKind;
use mediapress_core::ConvertError;

/// Validation errors for uploaded media files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid {kind} extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        kind: MediaKind,
        extension: String,
        allowed: &'static [&'static str],
    },

    #[error("Content type {content_type} does not match extension '{extension}' (expected: {expected})")]
    ContentTypeMismatch {
        content_type: String,
        extension: String,
        expected: String,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for ConvertError {
    fn from(err: ValidationError) -> Self {
        ConvertError::unsupported(err.to_string())
    }
}

/// Media file validator
///
/// Validates an upload against the allow-list and size cap for one media
/// kind before any conversion work is attempted.
pub struct MediaValidator {
    kind: MediaKind,
    max_file_size: usize,
}

impl MediaValidator {
    pub fn new(kind: MediaKind, max_file_size: usize) -> Self {
        Self {
            kind,
            max_file_size,
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate file extension against this kind's allow-list
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = extension_of(filename)?;
        let allowed = self.kind.allowed_extensions();

        if !allowed.contains(&extension.as_str()) {
            return Err(ValidationError::InvalidExtension {
                kind: self.kind,
                extension,
                allowed,
            });
        }

        Ok(())
    }

    /// Validate that Content-Type matches the file extension
    /// This prevents Content-Type spoofing where a file is uploaded under a
    /// legitimate-looking type.
    pub fn validate_content_type_match(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        let extension = extension_of(filename)?;
        let normalized = content_type.to_lowercase();

        let expected = accepted_content_types(&extension);
        if expected.is_empty() {
            // Unknown extensions skip cross-validation; the allow-list check
            // still rejects anything outside this kind.
            tracing::debug!(
                extension = %extension,
                content_type = %content_type,
                "Unknown extension, skipping Content-Type/extension cross-validation"
            );
            return Ok(());
        }

        if !expected.iter().any(|ct| ct == &normalized) {
            return Err(ValidationError::ContentTypeMismatch {
                content_type: content_type.to_string(),
                extension,
                expected: expected.join(", "),
            });
        }

        Ok(())
    }

    /// Validate all aspects of a file
    pub fn validate(
        &self,
        filename: &str,
        content_type: &str,
        file_size: usize,
    ) -> Result<(), ValidationError> {
        self.validate_file_size(file_size)?;
        self.validate_extension(filename)?;
        self.validate_content_type_match(filename, content_type)?;
        Ok(())
    }
}

fn extension_of(filename: &str) -> Result<String, ValidationError> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))
}

/// Content-Types accepted for an extension. Empty for unknown extensions.
fn accepted_content_types(extension: &str) -> &'static [&'static str] {
    match extension {
        "mp3" => &["audio/mpeg", "audio/mp3"],
        "wav" => &["audio/wav", "audio/wave", "audio/x-wav"],
        "flac" => &["audio/flac", "audio/x-flac"],
        "jpg" | "jpeg" => &["image/jpeg"],
        "png" => &["image/png"],
        "mp4" => &["video/mp4"],
        "mov" => &["video/quicktime"],
        "avi" => &["video/x-msvideo", "video/avi"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> MediaValidator {
        MediaValidator::new(MediaKind::Image, 1024 * 1024)
    }

    #[test]
    fn test_validate_file_size_ok() {
        let validator = test_validator();
        assert!(validator.validate_file_size(512 * 1024).is_ok());
    }

    #[test]
    fn test_validate_file_size_too_large() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_file_size(2 * 1024 * 1024),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_file_size_empty() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_validate_extension_ok() {
        let validator = test_validator();
        assert!(validator.validate_extension("test.jpg").is_ok());
        assert!(validator.validate_extension("test.PNG").is_ok()); // case insensitive
    }

    #[test]
    fn test_validate_extension_outside_allow_list() {
        let validator = test_validator();
        assert!(validator.validate_extension("test.gif").is_err());
        assert!(validator.validate_extension("test.webp").is_err());
    }

    #[test]
    fn test_validate_extension_wrong_kind() {
        let audio = MediaValidator::new(MediaKind::Audio, 1024 * 1024);
        assert!(audio.validate_extension("song.mp3").is_ok());
        assert!(audio.validate_extension("song.jpg").is_err());

        let video = MediaValidator::new(MediaKind::Video, 1024 * 1024);
        assert!(video.validate_extension("clip.mov").is_ok());
        assert!(video.validate_extension("clip.mp3").is_err());
    }

    #[test]
    fn test_validate_extension_no_extension() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_extension("noextension"),
            Err(ValidationError::InvalidFilename(_))
        ));
    }

    #[test]
    fn test_validate_content_type_match() {
        let validator = test_validator();
        assert!(validator
            .validate_content_type_match("test.jpg", "image/jpeg")
            .is_ok());
        assert!(validator
            .validate_content_type_match("test.jpeg", "image/jpeg")
            .is_ok());
        assert!(validator
            .validate_content_type_match("test.jpg", "image/png")
            .is_err());
    }

    #[test]
    fn test_validate_content_type_match_audio_aliases() {
        let validator = MediaValidator::new(MediaKind::Audio, 1024 * 1024);
        assert!(validator
            .validate_content_type_match("test.mp3", "audio/mpeg")
            .is_ok());
        assert!(validator
            .validate_content_type_match("test.mp3", "audio/mp3")
            .is_ok());
        assert!(validator
            .validate_content_type_match("test.wav", "audio/wave")
            .is_ok());
        assert!(validator
            .validate_content_type_match("test.flac", "audio/x-flac")
            .is_ok());
    }

    #[test]
    fn test_validate_content_type_match_case_insensitive() {
        let validator = test_validator();
        assert!(validator
            .validate_content_type_match("test.JPG", "IMAGE/JPEG")
            .is_ok());
    }

    #[test]
    fn test_validate_content_type_match_unknown_extension() {
        let validator = test_validator();
        // Unknown extensions skip cross-validation (allow-list still rejects them)
        assert!(validator
            .validate_content_type_match("test.xyz", "application/xyz")
            .is_ok());
    }

    #[test]
    fn test_validate_all_ok() {
        let validator = test_validator();
        assert!(validator
            .validate("test.jpg", "image/jpeg", 512 * 1024)
            .is_ok());
    }

    #[test]
    fn test_validate_all_fails_on_size() {
        let validator = test_validator();
        assert!(validator
            .validate("test.jpg", "image/jpeg", 2 * 1024 * 1024)
            .is_err());
    }

    #[test]
    fn test_validate_all_fails_on_extension() {
        let validator = test_validator();
        assert!(validator
            .validate("test.gif", "image/gif", 512 * 1024)
            .is_err());
    }

    #[test]
    fn test_validation_error_converts_to_unsupported_input() {
        let err: ConvertError = ValidationError::EmptyFile.into();
        assert_eq!(err.error_code(), "UNSUPPORTED_INPUT");
        assert_eq!(err.reason(), "Empty file");
    }
}
