//! Image transformer - JPEG and PNG re-encoding

use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};

use mediapress_core::ConvertError;

use crate::traits::MediaTransformer;

/// Output codec for image conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCodec {
    Jpeg,
    Png,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImageTransformOptions {
    pub codec: ImageCodec,
    /// JPEG quality (1-100). PNG is lossless and accepts this without
    /// using it.
    pub quality: u8,
}

/// Converts uploaded images entirely in memory.
#[derive(Debug, Default)]
pub struct ImageTransformer;

impl ImageTransformer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaTransformer for ImageTransformer {
    type Options = ImageTransformOptions;

    async fn transform(&self, data: &[u8], options: Self::Options) -> Result<Bytes, ConvertError> {
        let img = image::load_from_memory(data)
            .map_err(|e| ConvertError::transform(format!("image decode failed: {e}")))?;
        tracing::debug!(
            width = img.width(),
            height = img.height(),
            "Decoded image"
        );

        match options.codec {
            ImageCodec::Jpeg => encode_jpeg(&img, options.quality),
            ImageCodec::Png => encode_png(&img),
        }
    }
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes, ConvertError> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| ConvertError::transform(format!("JPEG encode failed: {e}")))?;
    comp.write_scanlines(&rgb_img)
        .map_err(|e| ConvertError::transform(format!("JPEG encode failed: {e}")))?;
    let jpeg_data = comp
        .finish()
        .map_err(|e| ConvertError::transform(format!("JPEG encode failed: {e}")))?;

    Ok(Bytes::from(jpeg_data))
}

fn encode_png(img: &DynamicImage) -> Result<Bytes, ConvertError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    img.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ConvertError::transform(format!("PNG encode failed: {e}")))?;

    Ok(Bytes::from(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn gradient_png(size: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(size, size, |x, y| {
            image::Rgb([
                ((x * 7 + y * 13) % 256) as u8,
                ((x * 3) % 256) as u8,
                ((y * 5) % 256) as u8,
            ])
        });
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[tokio::test]
    async fn test_jpeg_output_is_jpeg() {
        let transformer = ImageTransformer::new();
        let out = transformer
            .transform(
                &gradient_png(64),
                ImageTransformOptions {
                    codec: ImageCodec::Jpeg,
                    quality: 50,
                },
            )
            .await
            .unwrap();

        assert_eq!(&out[..2], &[0xFF, 0xD8]);
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn test_jpeg_quality_is_monotonic_in_size() {
        let transformer = ImageTransformer::new();
        let input = gradient_png(128);

        let low = transformer
            .transform(
                &input,
                ImageTransformOptions {
                    codec: ImageCodec::Jpeg,
                    quality: 10,
                },
            )
            .await
            .unwrap();
        let high = transformer
            .transform(
                &input,
                ImageTransformOptions {
                    codec: ImageCodec::Jpeg,
                    quality: 95,
                },
            )
            .await
            .unwrap();

        assert!(!low.is_empty());
        assert!(high.len() >= low.len());
    }

    #[tokio::test]
    async fn test_png_output_is_png() {
        let transformer = ImageTransformer::new();
        let out = transformer
            .transform(
                &gradient_png(64),
                ImageTransformOptions {
                    codec: ImageCodec::Png,
                    quality: 50,
                },
            )
            .await
            .unwrap();

        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Png);
        let round = image::load_from_memory(&out).unwrap();
        assert_eq!(round.width(), 64);
        assert_eq!(round.height(), 64);
    }

    #[tokio::test]
    async fn test_rgba_input_converts_to_jpeg() {
        // JPEG has no alpha; conversion flattens instead of failing
        let img = image::RgbaImage::from_fn(32, 32, |x, y| {
            image::Rgba([x as u8 * 8, y as u8 * 8, 128, 200])
        });
        let mut buffer = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();

        let transformer = ImageTransformer::new();
        let out = transformer
            .transform(
                &buffer,
                ImageTransformOptions {
                    codec: ImageCodec::Jpeg,
                    quality: 80,
                },
            )
            .await
            .unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn test_garbage_input_is_transform_failure() {
        let transformer = ImageTransformer::new();
        let err = transformer
            .transform(
                b"not an image",
                ImageTransformOptions {
                    codec: ImageCodec::Png,
                    quality: 50,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "TRANSFORM_FAILURE");
    }
}
