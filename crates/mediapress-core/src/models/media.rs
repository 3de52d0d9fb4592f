use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Default JPEG quality when the caller does not pick one.
pub const DEFAULT_IMAGE_QUALITY: u8 = 50;

/// Media kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Image,
    Video,
}

impl MediaKind {
    /// File extensions accepted for this kind, lowercase and without the dot.
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Audio => &["mp3", "wav", "flac"],
            MediaKind::Image => &["jpg", "jpeg", "png"],
            MediaKind::Video => &["mp4", "mov", "avi"],
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Which of the two conversion pipelines to run for a media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Primary,
    Secondary,
}

impl Algorithm {
    /// Label used in output filenames ("algorithm1" / "algorithm2").
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Primary => "algorithm1",
            Algorithm::Secondary => "algorithm2",
        }
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" | "algorithm1" | "1" => Ok(Algorithm::Primary),
            "secondary" | "algorithm2" | "2" => Ok(Algorithm::Secondary),
            _ => Err(anyhow::anyhow!("Invalid algorithm: {}", s)),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Algorithm::Primary => write!(f, "primary"),
            Algorithm::Secondary => write!(f, "secondary"),
        }
    }
}

/// Output resolution presets for video transcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPreset {
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl ResolutionPreset {
    /// Output frame height in pixels. The 480p preset renders at 270.
    pub fn target_height(&self) -> u32 {
        match self {
            ResolutionPreset::P480 => 270,
            ResolutionPreset::P720 => 720,
            ResolutionPreset::P1080 => 1080,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResolutionPreset::P480 => "480p",
            ResolutionPreset::P720 => "720p",
            ResolutionPreset::P1080 => "1080p",
        }
    }
}

impl FromStr for ResolutionPreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "480p" | "480" => Ok(ResolutionPreset::P480),
            "720p" | "720" => Ok(ResolutionPreset::P720),
            "1080p" | "1080" => Ok(ResolutionPreset::P1080),
            _ => Err(anyhow::anyhow!("Invalid resolution: {}", s)),
        }
    }
}

impl Display for ResolutionPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.label())
    }
}

/// Target video bitrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bitrate {
    #[serde(rename = "500k")]
    K500,
    #[serde(rename = "1000k")]
    K1000,
    #[serde(rename = "1500k")]
    K1500,
    #[serde(rename = "2000k")]
    K2000,
}

impl Bitrate {
    /// Bitrate in the form ffmpeg's `-b:v` expects ("500k", "1000k", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Bitrate::K500 => "500k",
            Bitrate::K1000 => "1000k",
            Bitrate::K1500 => "1500k",
            Bitrate::K2000 => "2000k",
        }
    }
}

impl FromStr for Bitrate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "500k" | "500" => Ok(Bitrate::K500),
            "1000k" | "1000" => Ok(Bitrate::K1000),
            "1500k" | "1500" => Ok(Bitrate::K1500),
            "2000k" | "2000" => Ok(Bitrate::K2000),
            _ => Err(anyhow::anyhow!("Invalid bitrate: {}", s)),
        }
    }
}

impl Display for Bitrate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.label())
    }
}

/// Container/codec the conversion produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Flac,
    Wav,
    Jpeg,
    Png,
    Mp4,
}

impl TargetFormat {
    /// Extension used in output filenames, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Flac => "flac",
            TargetFormat::Wav => "wav",
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::Mp4 => "mp4",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            TargetFormat::Flac => "audio/flac",
            TargetFormat::Wav => "audio/wav",
            TargetFormat::Jpeg => "image/jpeg",
            TargetFormat::Png => "image/png",
            TargetFormat::Mp4 => "video/mp4",
        }
    }
}

/// A requested conversion, with the per-kind parameters it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConversionRequest {
    Audio {
        algorithm: Algorithm,
    },
    Image {
        algorithm: Algorithm,
        /// JPEG quality (1-100). Ignored by the PNG algorithm.
        quality: u8,
    },
    Video {
        algorithm: Algorithm,
        resolution: ResolutionPreset,
        bitrate: Bitrate,
    },
}

impl ConversionRequest {
    pub fn media_kind(&self) -> MediaKind {
        match self {
            ConversionRequest::Audio { .. } => MediaKind::Audio,
            ConversionRequest::Image { .. } => MediaKind::Image,
            ConversionRequest::Video { .. } => MediaKind::Video,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            ConversionRequest::Audio { algorithm }
            | ConversionRequest::Image { algorithm, .. }
            | ConversionRequest::Video { algorithm, .. } => *algorithm,
        }
    }

    /// The format this request produces.
    pub fn target_format(&self) -> TargetFormat {
        match self {
            ConversionRequest::Audio {
                algorithm: Algorithm::Primary,
            } => TargetFormat::Flac,
            ConversionRequest::Audio {
                algorithm: Algorithm::Secondary,
            } => TargetFormat::Wav,
            ConversionRequest::Image {
                algorithm: Algorithm::Primary,
                ..
            } => TargetFormat::Jpeg,
            ConversionRequest::Image {
                algorithm: Algorithm::Secondary,
                ..
            } => TargetFormat::Png,
            ConversionRequest::Video { .. } => TargetFormat::Mp4,
        }
    }
}

/// An uploaded file held fully in memory, as received from the caller.
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    pub original_filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadedAsset {
    pub fn new(
        original_filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        UploadedAsset {
            original_filename: original_filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// The packaged outcome of a conversion, ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub data: Bytes,
    pub filename: String,
    pub content_type: String,
}

impl ConversionResult {
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Canonical content type for a file extension, if it is one we know.
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "flac" => Some("audio/flac"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "avi" => Some("video/x-msvideo"),
        _ => None,
    }
}
