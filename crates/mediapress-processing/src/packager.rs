//! Result packaging
//!
//! Wraps converted bytes with the download filename and Content-Type the
//! caller hands on. Filenames are derived from the upload's basename, the
//! conversion verb, and the algorithm label, e.g.
//! `song_compressed_algorithm1.flac`.

use bytes::Bytes;

use mediapress_core::models::{Algorithm, ConversionRequest, ConversionResult};

/// Package converted bytes into the result handed back to the caller.
pub fn package(data: Bytes, original_filename: &str, request: &ConversionRequest) -> ConversionResult {
    let format = request.target_format();
    ConversionResult {
        data,
        filename: suggested_filename(original_filename, request),
        content_type: format.content_type().to_string(),
    }
}

/// Download filename for a conversion of `original_filename`.
pub fn suggested_filename(original_filename: &str, request: &ConversionRequest) -> String {
    // WAV output is a format change, everything else is a compression
    let verb = match request {
        ConversionRequest::Audio {
            algorithm: Algorithm::Secondary,
        } => "converted",
        _ => "compressed",
    };

    format!(
        "{}_{}_{}.{}",
        sanitize_basename(original_filename),
        verb,
        request.algorithm().label(),
        request.target_format().extension()
    )
}

/// Sanitize the upload's basename for use in a download filename.
/// Path components are dropped and unexpected characters replaced.
fn sanitize_basename(filename: &str) -> String {
    const MAX_BASENAME_LENGTH: usize = 64;

    let basename = std::path::Path::new(filename)
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let sanitized: String = basename
        .chars()
        .take(MAX_BASENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('_').is_empty() {
        return "file".to_string();
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediapress_core::models::{Bitrate, ResolutionPreset};

    #[test]
    fn test_audio_primary_filename() {
        let request = ConversionRequest::Audio {
            algorithm: Algorithm::Primary,
        };
        assert_eq!(
            suggested_filename("song.mp3", &request),
            "song_compressed_algorithm1.flac"
        );
    }

    #[test]
    fn test_audio_secondary_filename_uses_converted() {
        let request = ConversionRequest::Audio {
            algorithm: Algorithm::Secondary,
        };
        assert_eq!(
            suggested_filename("song.mp3", &request),
            "song_converted_algorithm2.wav"
        );
    }

    #[test]
    fn test_image_filenames() {
        let jpeg = ConversionRequest::Image {
            algorithm: Algorithm::Primary,
            quality: 50,
        };
        let png = ConversionRequest::Image {
            algorithm: Algorithm::Secondary,
            quality: 50,
        };
        assert_eq!(
            suggested_filename("photo.png", &jpeg),
            "photo_compressed_algorithm1.jpg"
        );
        assert_eq!(
            suggested_filename("photo.jpeg", &png),
            "photo_compressed_algorithm2.png"
        );
    }

    #[test]
    fn test_video_filenames() {
        let request = ConversionRequest::Video {
            algorithm: Algorithm::Secondary,
            resolution: ResolutionPreset::P720,
            bitrate: Bitrate::K1000,
        };
        assert_eq!(
            suggested_filename("clip.avi", &request),
            "clip_compressed_algorithm2.mp4"
        );
    }

    #[test]
    fn test_sanitize_drops_path_components() {
        assert_eq!(sanitize_basename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_basename("/var/tmp/video.mp4"), "video");
    }

    #[test]
    fn test_sanitize_replaces_unexpected_characters() {
        assert_eq!(sanitize_basename("my song (1).mp3"), "my_song__1_");
        assert_eq!(sanitize_basename("caf\u{e9}.png"), "caf\u{e9}");
    }

    #[test]
    fn test_sanitize_falls_back_to_file() {
        assert_eq!(sanitize_basename(""), "file");
        assert_eq!(sanitize_basename(".."), "file");
        assert_eq!(sanitize_basename("???.mp3"), "file");
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "a".repeat(200) + ".mp3";
        assert_eq!(sanitize_basename(&long).len(), 64);
    }

    #[test]
    fn test_package_sets_content_type() {
        let request = ConversionRequest::Audio {
            algorithm: Algorithm::Primary,
        };
        let result = package(Bytes::from_static(b"flacdata"), "tone.wav", &request);
        assert_eq!(result.filename, "tone_compressed_algorithm1.flac");
        assert_eq!(result.content_type, "audio/flac");
        assert_eq!(result.size_bytes(), 8);
    }
}
