//! Conversion orchestration
//!
//! The [`Converter`] drives the whole workflow for one upload: validate it,
//! dispatch to the codec the request calls for, and package the converted
//! bytes with their download filename and Content-Type. Every failure comes
//! back as a [`ConvertError`] so callers can report it instead of crashing.

use std::time::Duration;

use bytes::Bytes;
use uuid::Uuid;

use mediapress_core::models::{
    Algorithm, ConversionRequest, ConversionResult, MediaKind, UploadedAsset,
};
use mediapress_core::{ConvertError, ConverterConfig};

use crate::audio::{AudioCodec, AudioTransformOptions, AudioTransformer};
use crate::image::{ImageCodec, ImageTransformOptions, ImageTransformer};
use crate::packager;
use crate::traits::MediaTransformer;
use crate::validator::MediaValidator;
use crate::video::{VideoCodec, VideoTransformOptions, VideoTransformer};

/// End-to-end converter for uploaded media.
pub struct Converter {
    audio: AudioTransformer,
    image: ImageTransformer,
    video: VideoTransformer,
    max_audio_size_bytes: usize,
    max_image_size_bytes: usize,
    max_video_size_bytes: usize,
}

impl Converter {
    pub fn new(config: &ConverterConfig) -> Self {
        let mut video = VideoTransformer::new(
            config.ffmpeg_path.clone(),
            Duration::from_secs(config.transcode_timeout_secs),
        );
        if let Some(dir) = &config.work_dir {
            video = video.with_work_dir(dir);
        }

        Self {
            audio: AudioTransformer::new(),
            image: ImageTransformer::new(),
            video,
            max_audio_size_bytes: config.max_audio_size_bytes,
            max_image_size_bytes: config.max_image_size_bytes,
            max_video_size_bytes: config.max_video_size_bytes,
        }
    }

    fn max_size_for(&self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Audio => self.max_audio_size_bytes,
            MediaKind::Image => self.max_image_size_bytes,
            MediaKind::Video => self.max_video_size_bytes,
        }
    }

    /// Convert an upload per the request and package the outcome.
    pub async fn convert(
        &self,
        asset: &UploadedAsset,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConvertError> {
        let conversion_id = Uuid::new_v4();
        let kind = request.media_kind();
        tracing::info!(
            conversion_id = %conversion_id,
            media_kind = %kind,
            algorithm = %request.algorithm(),
            filename = %asset.original_filename,
            size_bytes = asset.size_bytes(),
            "Conversion request received"
        );

        MediaValidator::new(kind, self.max_size_for(kind)).validate(
            &asset.original_filename,
            &asset.content_type,
            asset.size_bytes(),
        )?;

        if let ConversionRequest::Image { quality, .. } = request {
            if !(1..=100).contains(quality) {
                return Err(ConvertError::unsupported(format!(
                    "quality must be between 1 and 100, got {quality}"
                )));
            }
        }

        let data = self.transform(asset, request).await.map_err(|err| {
            tracing::warn!(
                conversion_id = %conversion_id,
                code = err.error_code(),
                error = %err,
                "Conversion failed"
            );
            err
        })?;

        let result = packager::package(data, &asset.original_filename, request);
        tracing::info!(
            conversion_id = %conversion_id,
            filename = %result.filename,
            content_type = %result.content_type,
            size_bytes = result.size_bytes(),
            "Conversion packaged"
        );
        Ok(result)
    }

    async fn transform(
        &self,
        asset: &UploadedAsset,
        request: &ConversionRequest,
    ) -> Result<Bytes, ConvertError> {
        match request {
            ConversionRequest::Audio { algorithm } => {
                let codec = match algorithm {
                    Algorithm::Primary => AudioCodec::Flac,
                    Algorithm::Secondary => AudioCodec::Wav,
                };
                self.audio
                    .transform(&asset.data, AudioTransformOptions { codec })
                    .await
            }
            ConversionRequest::Image { algorithm, quality } => {
                let codec = match algorithm {
                    Algorithm::Primary => ImageCodec::Jpeg,
                    Algorithm::Secondary => ImageCodec::Png,
                };
                self.image
                    .transform(
                        &asset.data,
                        ImageTransformOptions {
                            codec,
                            quality: *quality,
                        },
                    )
                    .await
            }
            ConversionRequest::Video {
                algorithm,
                resolution,
                bitrate,
            } => {
                let codec = match algorithm {
                    Algorithm::Primary => VideoCodec::H264,
                    Algorithm::Secondary => VideoCodec::Hevc,
                };
                self.video
                    .transform(
                        &asset.data,
                        VideoTransformOptions {
                            codec,
                            target_height: resolution.target_height(),
                            bitrate: *bitrate,
                        },
                    )
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> Converter {
        Converter::new(&ConverterConfig::default())
    }

    fn audio_request() -> ConversionRequest {
        ConversionRequest::Audio {
            algorithm: Algorithm::Primary,
        }
    }

    #[tokio::test]
    async fn test_rejects_extension_outside_allow_list() {
        let asset = UploadedAsset::new("track.ogg", "audio/ogg", vec![1u8; 16]);
        let err = converter()
            .convert(&asset, &audio_request())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_INPUT");
        assert!(err.reason().contains("ogg"));
    }

    #[tokio::test]
    async fn test_rejects_empty_upload() {
        let asset = UploadedAsset::new("track.mp3", "audio/mpeg", Vec::new());
        let err = converter()
            .convert(&asset, &audio_request())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_INPUT");
    }

    #[tokio::test]
    async fn test_rejects_oversized_upload() {
        let config = ConverterConfig {
            max_audio_size_bytes: 8,
            ..Default::default()
        };
        let asset = UploadedAsset::new("track.mp3", "audio/mpeg", vec![0u8; 16]);
        let err = Converter::new(&config)
            .convert(&asset, &audio_request())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_INPUT");
        assert!(err.reason().contains("too large"));
    }

    #[tokio::test]
    async fn test_rejects_content_type_mismatch() {
        let asset = UploadedAsset::new("track.mp3", "video/mp4", vec![1u8; 16]);
        let err = converter()
            .convert(&asset, &audio_request())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_INPUT");
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_quality() {
        let asset = UploadedAsset::new("photo.jpg", "image/jpeg", vec![1u8; 16]);
        for quality in [0u8, 101] {
            let request = ConversionRequest::Image {
                algorithm: Algorithm::Primary,
                quality,
            };
            let err = converter().convert(&asset, &request).await.unwrap_err();
            assert_eq!(err.error_code(), "UNSUPPORTED_INPUT");
            assert!(err.reason().contains("quality"));
        }
    }

    #[tokio::test]
    async fn test_rejects_video_extension_for_image_request() {
        let asset = UploadedAsset::new("clip.mp4", "video/mp4", vec![1u8; 16]);
        let request = ConversionRequest::Image {
            algorithm: Algorithm::Primary,
            quality: 50,
        };
        let err = converter().convert(&asset, &request).await.unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_INPUT");
    }
}
