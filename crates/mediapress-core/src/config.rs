//! Configuration module
//!
//! This module provides the converter configuration, loaded from environment
//! variables with sensible defaults so the binary runs with no configuration
//! at all on a machine that has `ffmpeg` on PATH.

use std::env;
use std::path::PathBuf;

// Defaults, overridable via environment
const TRANSCODE_TIMEOUT_SECS: u64 = 300;
const MAX_AUDIO_SIZE_MB: usize = 100;
const MAX_IMAGE_SIZE_MB: usize = 50;
const MAX_VIDEO_SIZE_MB: usize = 500;

/// Converter configuration
#[derive(Clone, Debug)]
pub struct ConverterConfig {
    /// Path or name of the ffmpeg binary used for video transcodes.
    pub ffmpeg_path: String,
    /// Hard wall-clock limit for a single ffmpeg invocation.
    pub transcode_timeout_secs: u64,
    /// Directory for staged temp files. None = the system temp directory.
    pub work_dir: Option<PathBuf>,
    pub max_audio_size_bytes: usize,
    pub max_image_size_bytes: usize,
    pub max_video_size_bytes: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            ffmpeg_path: "ffmpeg".to_string(),
            transcode_timeout_secs: TRANSCODE_TIMEOUT_SECS,
            work_dir: None,
            max_audio_size_bytes: MAX_AUDIO_SIZE_MB * 1024 * 1024,
            max_image_size_bytes: MAX_IMAGE_SIZE_MB * 1024 * 1024,
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
        }
    }
}

impl ConverterConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let config = ConverterConfig {
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            transcode_timeout_secs: env::var("TRANSCODE_TIMEOUT_SECS")
                .unwrap_or_else(|_| TRANSCODE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(TRANSCODE_TIMEOUT_SECS),
            work_dir: env::var("WORK_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            max_audio_size_bytes: env::var("MAX_AUDIO_SIZE_MB")
                .unwrap_or_else(|_| MAX_AUDIO_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_AUDIO_SIZE_MB)
                * 1024
                * 1024,
            max_image_size_bytes: env::var("MAX_IMAGE_SIZE_MB")
                .unwrap_or_else(|_| MAX_IMAGE_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_IMAGE_SIZE_MB)
                * 1024
                * 1024,
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_MB")
                .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_VIDEO_SIZE_MB)
                * 1024
                * 1024,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.ffmpeg_path.trim().is_empty() {
            return Err(anyhow::anyhow!("FFMPEG_PATH cannot be empty"));
        }

        // Reject shell metacharacters to prevent command injection
        let dangerous_chars = [
            ';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r',
        ];
        if self.ffmpeg_path.chars().any(|c| dangerous_chars.contains(&c)) {
            return Err(anyhow::anyhow!(
                "FFMPEG_PATH contains invalid characters: {}",
                self.ffmpeg_path
            ));
        }

        if self.transcode_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "TRANSCODE_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.max_audio_size_bytes == 0
            || self.max_image_size_bytes == 0
            || self.max_video_size_bytes == 0
        {
            return Err(anyhow::anyhow!("size limits must be greater than zero"));
        }

        Ok(())
    }
}
