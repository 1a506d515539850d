//! Audio encoding: WAV via hound, MP3 via LAME
//!
//! Every write goes to a `.tmp` sibling first and is renamed into place, so a
//! half-written file can never be mistaken for a finished artifact.

use crate::error::{Result, StemmixError};
use crate::types::{OutputFormat, StereoBuffer};
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, InterleavedPcm, Quality};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Constant bitrates (kbps) accepted for MP3 output
pub const SUPPORTED_BITRATES: [u32; 16] = [
    8, 16, 24, 32, 40, 48, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];

/// Encode `audio` to `path` in the given format
pub fn encode(path: &Path, audio: &StereoBuffer, format: OutputFormat, bitrate_kbps: u32) -> Result<()> {
    let temp_path = temp_path_for(path);

    let written = match format {
        OutputFormat::Wav => write_wav(&temp_path, audio),
        OutputFormat::Mp3 => write_mp3(&temp_path, audio, bitrate_kbps),
    };

    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    std::fs::rename(&temp_path, path).map_err(|e| StemmixError::output_error(path, e))?;

    debug!(
        "Wrote {:.2}s of audio to {}",
        audio.duration,
        path.display()
    );
    Ok(())
}

/// Map a kbps value to the encoder's bitrate setting
pub fn mp3_bitrate(kbps: u32) -> Option<Bitrate> {
    let bitrate = match kbps {
        8 => Bitrate::Kbps8,
        16 => Bitrate::Kbps16,
        24 => Bitrate::Kbps24,
        32 => Bitrate::Kbps32,
        40 => Bitrate::Kbps40,
        48 => Bitrate::Kbps48,
        64 => Bitrate::Kbps64,
        80 => Bitrate::Kbps80,
        96 => Bitrate::Kbps96,
        112 => Bitrate::Kbps112,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        224 => Bitrate::Kbps224,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        _ => return None,
    };
    Some(bitrate)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn to_i16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(-32768.0, 32767.0) as i16
}

/// Write 16-bit stereo PCM
fn write_wav(path: &Path, audio: &StereoBuffer) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| StemmixError::encode_error(path, format!("Failed to create WAV file: {}", e)))?;

    for (l, r) in audio.left.iter().zip(audio.right.iter()) {
        writer
            .write_sample(to_i16(*l))
            .and_then(|_| writer.write_sample(to_i16(*r)))
            .map_err(|e| StemmixError::encode_error(path, format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| StemmixError::encode_error(path, format!("Failed to finalize WAV: {}", e)))?;

    Ok(())
}

/// Write constant-bitrate stereo MP3
fn write_mp3(path: &Path, audio: &StereoBuffer, bitrate_kbps: u32) -> Result<()> {
    let bitrate = mp3_bitrate(bitrate_kbps).ok_or_else(|| {
        StemmixError::encode_error(path, format!("Unsupported MP3 bitrate: {}kbps", bitrate_kbps))
    })?;

    let mut builder = Builder::new()
        .ok_or_else(|| StemmixError::encode_error(path, "Failed to allocate LAME encoder"))?;
    builder
        .set_num_channels(2)
        .map_err(|e| StemmixError::encode_error(path, format!("Channel setup failed: {:?}", e)))?;
    builder
        .set_sample_rate(audio.sample_rate)
        .map_err(|e| StemmixError::encode_error(path, format!("Sample rate setup failed: {:?}", e)))?;
    builder
        .set_brate(bitrate)
        .map_err(|e| StemmixError::encode_error(path, format!("Bitrate setup failed: {:?}", e)))?;
    builder
        .set_quality(Quality::Best)
        .map_err(|e| StemmixError::encode_error(path, format!("Quality setup failed: {:?}", e)))?;
    let mut encoder = builder
        .build()
        .map_err(|e| StemmixError::encode_error(path, format!("Encoder init failed: {:?}", e)))?;

    let pcm: Vec<i16> = audio.interleaved().into_iter().map(to_i16).collect();

    // LAME needs room for the worst case plus the final flushed frames
    let mut mp3 = Vec::with_capacity(mp3lame_encoder::max_required_buffer_size(audio.len()) + 7200);
    encoder
        .encode_to_vec(InterleavedPcm(&pcm), &mut mp3)
        .map_err(|e| StemmixError::encode_error(path, format!("Encoding failed: {:?}", e)))?;
    encoder
        .flush_to_vec::<FlushNoGap>(&mut mp3)
        .map_err(|e| StemmixError::encode_error(path, format!("Flush failed: {:?}", e)))?;

    let file = File::create(path).map_err(|e| StemmixError::output_error(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&mp3)
        .and_then(|_| writer.flush())
        .map_err(|e| StemmixError::output_error(path, e))?;

    Ok(())
}
