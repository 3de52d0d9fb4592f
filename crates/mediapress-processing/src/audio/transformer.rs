//! Audio transformer - FLAC and WAV re-encoding

use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use flacenc::component::{BitRepr, Stream, StreamInfo};
use flacenc::error::Verify;
use flacenc::source::{Context, Fill, FrameBuf};
use serde::{Deserialize, Serialize};

use mediapress_core::ConvertError;

use super::pcm::{self, PcmAudio};
use crate::traits::MediaTransformer;

/// Output codec for audio conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Flac,
    Wav,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AudioTransformOptions {
    pub codec: AudioCodec,
}

/// Converts uploaded audio entirely in memory.
#[derive(Debug, Default)]
pub struct AudioTransformer;

impl AudioTransformer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaTransformer for AudioTransformer {
    type Options = AudioTransformOptions;

    async fn transform(&self, data: &[u8], options: Self::Options) -> Result<Bytes, ConvertError> {
        let audio = pcm::decode(data)?;
        tracing::debug!(
            samples = audio.samples.len(),
            sample_rate = audio.sample_rate,
            channels = audio.channels,
            bits_per_sample = audio.bits_per_sample,
            "Decoded audio to PCM"
        );

        match options.codec {
            AudioCodec::Flac => encode_flac(&audio),
            AudioCodec::Wav => encode_wav(&audio),
        }
    }
}

fn encode_flac(audio: &PcmAudio) -> Result<Bytes, ConvertError> {
    // FLAC carries at most 24 bits per sample.
    if audio.bits_per_sample > 24 {
        return Err(ConvertError::unsupported(format!(
            "{}-bit audio exceeds the 24-bit FLAC maximum",
            audio.bits_per_sample
        )));
    }

    let channels = audio.channels as usize;
    let bits = audio.bits_per_sample as usize;
    let frames_total = audio.samples.len() / channels;

    let config = flacenc::config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| ConvertError::transform(format!("invalid FLAC encoder config: {e:?}")))?;
    let block_size = config.block_size;

    let mut stream_info = StreamInfo::new(audio.sample_rate as usize, channels, bits)
        .map_err(|e| ConvertError::transform(format!("invalid FLAC stream params: {e:?}")))?;
    stream_info.set_total_samples(frames_total);
    // Sized to the whole signal, a single fill hashes it without block padding.
    let mut md5 = Context::new(bits, channels, frames_total);
    md5.fill_interleaved(&audio.samples)
        .map_err(|e| ConvertError::transform(format!("FLAC digest failed: {e:?}")))?;
    stream_info.set_md5_digest(&md5.md5_digest());

    let mut stream = Stream::with_stream_info(stream_info);
    let mut framebuf = FrameBuf::with_size(channels, block_size)
        .map_err(|e| ConvertError::transform(format!("invalid FLAC block layout: {e:?}")))?;

    // Each frame encodes at the buffer's own size, so a short final chunk must
    // shrink the buffer rather than leave a stale tail behind the fill.
    for (number, chunk) in audio.samples.chunks(block_size * channels).enumerate() {
        let chunk_frames = chunk.len() / channels;
        if chunk_frames != framebuf.size() {
            framebuf.resize(chunk_frames);
        }
        framebuf
            .fill_interleaved(chunk)
            .map_err(|e| ConvertError::transform(format!("FLAC block fill failed: {e:?}")))?;
        let frame =
            flacenc::encode_fixed_size_frame(&config, &framebuf, number, stream.stream_info())
                .map_err(|e| ConvertError::transform(format!("FLAC encode failed: {e:?}")))?;
        stream.add_frame(frame);
    }

    let mut sink = flacenc::bitsink::ByteSink::new();
    stream
        .write(&mut sink)
        .map_err(|e| ConvertError::transform(format!("FLAC write failed: {e:?}")))?;

    Ok(Bytes::copy_from_slice(sink.as_slice()))
}

fn encode_wav(audio: &PcmAudio) -> Result<Bytes, ConvertError> {
    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: audio.bits_per_sample as u16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| ConvertError::transform(format!("WAV encode failed: {e}")))?;
    for &sample in &audio.samples {
        writer
            .write_sample(sample)
            .map_err(|e| ConvertError::transform(format!("WAV encode failed: {e}")))?;
    }
    writer
        .finalize()
        .map_err(|e| ConvertError::transform(format!("WAV finalize failed: {e}")))?;

    Ok(Bytes::from(cursor.into_inner()))
}
