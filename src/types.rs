//! Core data types for stemmix
//!
//! These types represent the domain model and flow through the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Stems
// =============================================================================

/// One isolated component of a song, as produced by the separation model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stem {
    Drums,
    Vocals,
    Bass,
    Other,
}

impl Stem {
    /// Every stem, in the declared mix order
    pub const ALL: [Stem; 4] = [Stem::Drums, Stem::Vocals, Stem::Bass, Stem::Other];

    /// File and label name of the stem (e.g., "vocals")
    pub fn name(self) -> &'static str {
        match self {
            Stem::Drums => "drums",
            Stem::Vocals => "vocals",
            Stem::Bass => "bass",
            Stem::Other => "other",
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Pipeline state
// =============================================================================

/// Per-song pipeline state, advanced strictly in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SongStage {
    Pending,
    Separating,
    Converting,
    Mixing,
    Transcribing,
    Done,
}

impl fmt::Display for SongStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SongStage::Pending => "pending",
            SongStage::Separating => "separating",
            SongStage::Converting => "converting",
            SongStage::Mixing => "mixing",
            SongStage::Transcribing => "transcribing",
            SongStage::Done => "done",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Transcription
// =============================================================================

/// One timed piece of transcribed (translated) text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    pub text: String,
}

// =============================================================================
// Audio buffer types
// =============================================================================

/// Stereo audio buffer at the source's native sample rate
#[derive(Debug, Clone)]
pub struct StereoBuffer {
    /// Left channel samples normalized to [-1.0, 1.0]
    pub left: Vec<f32>,
    /// Right channel samples normalized to [-1.0, 1.0]
    pub right: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration: f64,
}

impl StereoBuffer {
    pub fn new(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Self {
        let num_samples = left.len().min(right.len());
        // Guard against division by zero - use 0 duration for invalid sample rate
        let duration = if sample_rate > 0 {
            num_samples as f64 / sample_rate as f64
        } else {
            0.0
        };
        Self {
            left,
            right,
            sample_rate,
            duration,
        }
    }

    /// Silent buffer of `frames` samples per channel
    pub fn silence(frames: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; frames], vec![0.0; frames], sample_rate)
    }

    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.left.len().min(self.right.len())
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get interleaved samples [L, R, L, R, ...]
    pub fn interleaved(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.len() * 2);
        for (l, r) in self.left.iter().zip(self.right.iter()) {
            result.push(*l);
            result.push(*r);
        }
        result
    }

    /// Create from interleaved samples
    pub fn from_interleaved(samples: &[f32], sample_rate: u32) -> Self {
        let num_frames = samples.len() / 2;
        let mut left = Vec::with_capacity(num_frames);
        let mut right = Vec::with_capacity(num_frames);

        for chunk in samples.chunks_exact(2) {
            left.push(chunk[0]);
            right.push(chunk[1]);
        }

        Self::new(left, right, sample_rate)
    }
}

// =============================================================================
// Formats
// =============================================================================

/// Song formats picked up when scanning an album
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Flac,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" => Some(AudioFormat::Wav),
            "flac" => Some(AudioFormat::Flac),
            _ => None,
        }
    }

}

/// Working format for converted stems and the final mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Mp3,
    Wav,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Wav => "wav",
        }
    }
}

/// How gains are written into mix file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// `vocals_-10,5dB`
    Db,
    /// `vocals_0,30`
    Fraction,
}
