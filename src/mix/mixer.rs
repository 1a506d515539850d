//! Overlaying stems into a single track

use super::gain::db_to_amplitude;
use super::recipe::Gain;
use crate::error::{Result, StemmixError};
use crate::types::{Stem, StereoBuffer};
use std::path::PathBuf;
use tracing::debug;

/// A decoded stem ready to be mixed
#[derive(Debug, Clone)]
pub struct LoadedStem {
    pub stem: Stem,
    /// File the audio was decoded from (for error messages)
    pub path: PathBuf,
    pub audio: StereoBuffer,
    pub gain: Gain,
}

/// Sum the stems sample by sample after applying each stem's gain.
///
/// All stems are first cut to the length of the shortest one, so small
/// length differences left by the separator never leave a tail where only
/// some stems play. Every stem must share the first stem's sample rate.
pub fn overlay(stems: &[LoadedStem]) -> Result<StereoBuffer> {
    let first = stems.first().ok_or_else(|| {
        StemmixError::ConfigError("Nothing to mix: the recipe selected no stems".to_string())
    })?;
    let sample_rate = first.audio.sample_rate;

    if let Some(mismatch) = stems.iter().find(|s| s.audio.sample_rate != sample_rate) {
        return Err(StemmixError::decode_error(
            &mismatch.path,
            format!(
                "Sample rate {}Hz differs from {}Hz of the {} stem",
                mismatch.audio.sample_rate, sample_rate, first.stem
            ),
        ));
    }

    let frames = stems.iter().map(|s| s.audio.len()).min().unwrap_or(0);
    debug!(
        "Overlaying {} stems, {} frames each ({:.2}s)",
        stems.len(),
        frames,
        frames as f64 / sample_rate.max(1) as f64
    );

    let mut mix = StereoBuffer::silence(frames, sample_rate);
    for stem in stems {
        let amplitude = db_to_amplitude(stem.gain.db());
        debug!(
            "  {} at {:.1}dB (x{:.3})",
            stem.stem,
            stem.gain.db(),
            amplitude
        );

        for (out, sample) in mix.left.iter_mut().zip(&stem.audio.left[..frames]) {
            *out += sample * amplitude;
        }
        for (out, sample) in mix.right.iter_mut().zip(&stem.audio.right[..frames]) {
            *out += sample * amplitude;
        }
    }

    Ok(mix)
}
