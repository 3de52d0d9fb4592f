//! Video transformer - MP4 transcoding via ffmpeg

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use mediapress_core::models::Bitrate;
use mediapress_core::ConvertError;

use crate::staging::{self, StagedFile};
use crate::traits::MediaTransformer;

/// Video encoder for the MP4 output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
    Hevc,
}

impl VideoCodec {
    pub fn encoder_name(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "libx264",
            VideoCodec::Hevc => "libx265",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VideoTransformOptions {
    pub codec: VideoCodec,
    pub target_height: u32,
    pub bitrate: Bitrate,
}

/// Converts uploaded video by staging it to disk and running ffmpeg.
pub struct VideoTransformer {
    ffmpeg_path: String,
    timeout: Duration,
    work_dir: Option<PathBuf>,
}

impl VideoTransformer {
    pub fn new(ffmpeg_path: String, timeout: Duration) -> Self {
        Self {
            ffmpeg_path,
            timeout,
            work_dir: None,
        }
    }

    /// Stage and reserve files in `dir` instead of the system temp directory.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    async fn stage_input(&self, data: &[u8]) -> Result<StagedFile, ConvertError> {
        match &self.work_dir {
            Some(dir) => staging::stage_in(dir, data).await,
            None => staging::stage(data).await,
        }
        .map_err(|e| ConvertError::staging(format!("could not stage input: {e}")))
    }

    fn reserve_output(&self) -> Result<StagedFile, ConvertError> {
        match &self.work_dir {
            Some(dir) => staging::reserve_in(dir, ".mp4"),
            None => staging::reserve(".mp4"),
        }
        .map_err(|e| ConvertError::staging(format!("could not reserve output: {e}")))
    }

    async fn run_ffmpeg(&self, args: &[String]) -> Result<(), ConvertError> {
        // kill_on_drop: when the timeout cancels the output future, the
        // spawned encoder must not keep running against the staged files.
        let result = tokio::time::timeout(
            self.timeout,
            Command::new(&self.ffmpeg_path)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ConvertError::transform(format!(
                    "could not run {}: {e}",
                    self.ffmpeg_path
                )));
            }
            Err(_) => {
                return Err(ConvertError::transform(format!(
                    "encoder timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            return Err(ConvertError::transform(format!(
                "ffmpeg failed ({}): {}",
                output.status,
                stderr_reason(&output.stderr)
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl MediaTransformer for VideoTransformer {
    type Options = VideoTransformOptions;

    async fn transform(&self, data: &[u8], options: Self::Options) -> Result<Bytes, ConvertError> {
        let input = self.stage_input(data).await?;
        let output = self.reserve_output()?;

        let args = build_args(input.path(), output.path(), &options);
        tracing::debug!(ffmpeg = %self.ffmpeg_path, args = ?args, "Running video transcode");

        let run_result = self.run_ffmpeg(&args).await;
        let read_result = if run_result.is_ok() {
            tokio::fs::read(output.path())
                .await
                .map_err(|e| ConvertError::staging(format!("could not read transcoded output: {e}")))
        } else {
            Ok(Vec::new())
        };

        // Both staged files are removed on success and on failure alike.
        staging::unstage(input);
        staging::unstage(output);

        run_result?;
        let transcoded = read_result?;
        if transcoded.is_empty() {
            return Err(ConvertError::transform("encoder produced no output"));
        }

        Ok(Bytes::from(transcoded))
    }
}

fn build_args(input: &Path, output: &Path, options: &VideoTransformOptions) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        // -2 keeps the width even, which libx264/libx265 require
        "-vf".to_string(),
        format!("scale=-2:{}", options.target_height),
        "-c:v".to_string(),
        options.codec.encoder_name().to_string(),
        "-b:v".to_string(),
        options.bitrate.label().to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-f".to_string(),
        "mp4".to_string(),
        // The reserved output path already exists
        "-y".to_string(),
        output.to_string_lossy().to_string(),
    ]
}

/// The last non-empty stderr line, which is where ffmpeg states its error.
fn stderr_reason(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "no error output".to_string())
}
