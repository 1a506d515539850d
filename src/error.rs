//! Unified error types for stemmix
//!
//! Error strategy:
//! - Per-song errors (tool failure, decode, encode): abort that song, continue the album
//! - Startup errors (configuration, invalid gain): fatal, nothing is attempted
//!
//! Stage errors are wrapped in [`StemmixError::StageFailed`] so the operator
//! always sees which song and which stage broke.

use crate::types::{SongStage, Stem};
use std::path::PathBuf;
use thiserror::Error;

/// Supported input formats for helpful error messages
pub const SUPPORTED_FORMATS: &str = "MP3, WAV, FLAC";

/// Top-level error type for stemmix operations
#[derive(Debug, Error)]
pub enum StemmixError {
    // =========================================================================
    // Per-song errors - abort the song, continue the batch
    // =========================================================================
    #[error("Failed to decode audio file '{path}': {reason}\n  Supported formats: {SUPPORTED_FORMATS}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Failed to encode '{path}': {reason}")]
    EncodeError { path: PathBuf, reason: String },

    #[error("File not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    FileNotFound(PathBuf),

    #[error("Could not start {tool}: {reason}\n  Tip: Check that the command is installed and on PATH")]
    ToolUnavailable { tool: String, reason: String },

    #[error("{tool} exited abnormally ({status})")]
    ToolFailed { tool: String, status: String },

    #[error("Separation output in '{dir}' is incomplete, missing: {}", .missing.join(", "))]
    IncompleteSeparation { dir: PathBuf, missing: Vec<String> },

    #[error("'{path}' has the same song id '{id}' as '{first}'\n  Tip: Rename one of them; both would write to the same stem and mix directories")]
    DuplicateSongId {
        id: String,
        path: PathBuf,
        first: PathBuf,
    },

    #[error("Could not read transcript '{path}': {reason}")]
    TranscriptError { path: PathBuf, reason: String },

    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("[{song}] {stage} failed: {source}")]
    StageFailed {
        song: String,
        stage: SongStage,
        #[source]
        source: Box<StemmixError>,
    },

    // =========================================================================
    // Fatal errors - abort before any work
    // =========================================================================
    #[error("Invalid gain fraction {value}{}: must be finite and greater than 0", gain_target(.stem))]
    InvalidGain { stem: Option<Stem>, value: f64 },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn gain_target(stem: &Option<Stem>) -> String {
    stem.map(|s| format!(" for {}", s)).unwrap_or_default()
}

/// Result type alias for stemmix operations
pub type Result<T> = std::result::Result<T, StemmixError>;

impl StemmixError {
    /// Returns true if this error must abort the whole run rather than one song
    pub fn is_fatal(&self) -> bool {
        match self {
            StemmixError::ConfigError(_) | StemmixError::InvalidGain { .. } => true,
            StemmixError::StageFailed { source, .. } => source.is_fatal(),
            _ => false,
        }
    }

    /// Attach the song identifier and the stage that was running
    pub fn in_stage(self, song: impl Into<String>, stage: SongStage) -> Self {
        StemmixError::StageFailed {
            song: song.into(),
            stage,
            source: Box::new(self),
        }
    }

    /// The stage a wrapped error failed in, if any
    pub fn stage(&self) -> Option<SongStage> {
        match self {
            StemmixError::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Create a decode error with context about the issue
    pub fn decode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StemmixError::DecodeError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an encode error
    pub fn encode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StemmixError::EncodeError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!(
                    "Directory does not exist: {}",
                    path.parent().map(|p| p.display().to_string()).unwrap_or_default()
                )
            }
            _ => err.to_string(),
        };
        StemmixError::OutputError { path, reason }
    }
}
