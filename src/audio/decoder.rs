//! Audio decoding using symphonia
//!
//! Decodes audio files to stereo f32 samples at the file's own sample rate.
//! Stems from one separation run share a rate, so nothing is resampled here.

use crate::error::{Result, StemmixError};
use crate::types::StereoBuffer;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, trace};

/// Decode an audio file to a stereo buffer
pub fn decode_stereo(path: &Path) -> Result<StereoBuffer> {
    if !path.exists() {
        return Err(StemmixError::FileNotFound(path.to_path_buf()));
    }

    let file = std::fs::File::open(path)
        .map_err(|e| StemmixError::decode_error(path, format!("Failed to open file: {}", e)))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Provide a hint based on file extension
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| StemmixError::decode_error(path, format!("Failed to probe format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| StemmixError::decode_error(path, "No audio tracks found"))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut sample_rate = codec_params.sample_rate.unwrap_or(44100);
    let mut channels = codec_params.channels.map(|c| c.count()).unwrap_or(2);

    debug!(
        "Decoding: {} @ {}Hz, {} channels",
        path.display(),
        sample_rate,
        channels
    );

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| {
            StemmixError::decode_error(path, format!("Failed to create decoder: {}", e))
        })?;

    // Interleaved samples in the source channel layout
    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break; // End of stream
            }
            Err(e) => {
                return Err(StemmixError::decode_error(
                    path,
                    format!("Failed to read packet: {}", e),
                ));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                trace!("Skipping corrupted frame: {}", e);
                continue;
            }
            Err(e) => {
                return Err(StemmixError::decode_error(path, format!("Decode error: {}", e)));
            }
        };

        let spec = *decoded.spec();
        // Container headers can be missing or wrong (e.g. raw MP3 streams)
        sample_rate = spec.rate;
        channels = spec.channels.count();

        let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        all_samples.extend_from_slice(sample_buf.samples());
    }

    let stereo = match channels {
        0 => {
            return Err(StemmixError::decode_error(path, "Stream reports zero channels"));
        }
        // Mono: duplicate to stereo
        1 => StereoBuffer::new(all_samples.clone(), all_samples, sample_rate),
        2 => StereoBuffer::from_interleaved(&all_samples, sample_rate),
        _ => StereoBuffer::from_interleaved(&front_pair(&all_samples, channels), sample_rate),
    };

    debug!(
        "Decoded {} frames ({:.2}s) from {}",
        stereo.len(),
        stereo.duration,
        path.display()
    );

    Ok(stereo)
}

/// Keep the front left/right pair of multi-channel audio
fn front_pair(samples: &[f32], channels: usize) -> Vec<f32> {
    let mut stereo = Vec::with_capacity(samples.len() / channels * 2);
    for frame in samples.chunks_exact(channels) {
        stereo.push(frame[0]);
        stereo.push(frame[1]);
    }
    stereo
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_wav(path: &Path, channels: u16, sample_rate: u32, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for s in samples {
            writer.write_sample(*s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_front_pair_drops_surround_channels() {
        let six = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6];
        assert_eq!(front_pair(&six, 6), vec![0.1, 0.2, 1.1, 1.2]);
    }

    #[test]
    fn test_decode_mono_wav_duplicates_channel() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mono.wav");
        write_wav(&path, 1, 8000, &[0, 16384, -16384, 0]);

        let audio = decode_stereo(&path).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.len(), 4);
        assert_eq!(audio.left, audio.right);
        assert!((audio.left[1] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_decode_stereo_wav_keeps_channels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2, 22050, &[16384, -16384, 8192, -8192]);

        let audio = decode_stereo(&path).unwrap();
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(audio.len(), 2);
        assert!(audio.left[0] > 0.0 && audio.right[0] < 0.0);
    }

    #[test]
    fn test_decode_missing_file() {
        let err = decode_stereo(Path::new("/definitely/not/here.wav")).unwrap_err();
        assert!(matches!(err, StemmixError::FileNotFound(_)));
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"this is not audio at all").unwrap();

        let err = decode_stereo(&path).unwrap_err();
        assert!(matches!(err, StemmixError::DecodeError { .. }));
    }
}
