//! In-memory PCM decoding for uploaded audio

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use mediapress_core::ConvertError;

/// Decoded audio as interleaved signed PCM at the source bit depth.
#[derive(Debug, Clone)]
pub struct PcmAudio {
    /// Interleaved samples holding `bits_per_sample`-wide values.
    pub samples: Vec<i32>,
    pub sample_rate: u32,
    pub channels: u16,
    /// 16, 24, or 32; sources that report no depth decode at 16.
    pub bits_per_sample: u32,
}

/// Decode MP3, WAV, or FLAC data to interleaved PCM.
pub fn decode(data: &[u8]) -> Result<PcmAudio, ConvertError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data.to_vec())), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ConvertError::transform(format!("unrecognized audio container: {e}")))?;

    let mut format = probed.format;

    // Copy the track parameters out so the packet loop can borrow the reader.
    let (track_id, codec_params) = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .map(|t| (t.id, t.codec_params.clone()))
        .ok_or_else(|| ConvertError::transform("no decodable audio track"))?;

    // Carry the source depth rounded up to a whole-byte width.
    let bits_per_sample: u32 = match codec_params.bits_per_sample.unwrap_or(16) {
        0..=16 => 16,
        17..=24 => 24,
        _ => 32,
    };
    // symphonia scales integer samples to the full i32 range; shifting back
    // down recovers the source-depth values.
    let shift = 32 - bits_per_sample;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| ConvertError::transform(format!("unsupported audio codec: {e}")))?;

    let mut samples: Vec<i32> = Vec::new();
    let mut sample_rate = 0u32;
    let mut channels = 0u16;
    let mut buf: Option<SampleBuffer<i32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(ConvertError::transform(format!("audio demux failed: {e}")));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if buf.is_none() {
                    let spec = *decoded.spec();
                    sample_rate = spec.rate;
                    channels = spec.channels.count() as u16;
                    buf = Some(SampleBuffer::<i32>::new(decoded.capacity() as u64, spec));
                }
                if let Some(buf) = buf.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    samples.extend(buf.samples().iter().map(|&s| s >> shift));
                }
            }
            Err(SymphoniaError::DecodeError(e)) => {
                // Recoverable per the symphonia contract, skip the packet
                tracing::warn!(error = %e, "Skipping undecodable audio packet");
            }
            Err(e) => {
                return Err(ConvertError::transform(format!("audio decode failed: {e}")));
            }
        }
    }

    if samples.is_empty() || sample_rate == 0 || channels == 0 {
        return Err(ConvertError::transform("no audio samples decoded"));
    }

    Ok(PcmAudio {
        samples,
        sample_rate,
        channels,
        bits_per_sample,
    })
}
