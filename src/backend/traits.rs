//! Backend trait abstractions
//!
//! The separation and speech models are external programs. These traits are
//! the only thing the pipeline knows about them, so tests can swap in fakes.

use crate::error::Result;
use crate::types::Segment;
use std::path::Path;

/// Stem separation backend
pub trait StemSeparator: Send + Sync {
    /// Separate `song` into stems with `model`, blocking until done.
    ///
    /// # Arguments
    /// * `song` - Path to the source audio file
    /// * `model` - Separation model identifier
    /// * `output_root` - Root directory; stems land in
    ///   [`separation_dir`](super::separation_dir)`(output_root, model, song_id)`
    fn separate(&self, song: &Path, model: &str, output_root: &Path) -> Result<()>;

    /// Get the name of this separator (for logging)
    fn name(&self) -> &'static str;
}

/// Speech-to-text backend that translates while transcribing
pub trait Transcriber: Send + Sync {
    /// Transcribe `audio` and translate it to English.
    ///
    /// `source_language` is the language being sung; `None` leaves detection
    /// to the model. Segments come back in playback order.
    fn transcribe(&self, audio: &Path, source_language: Option<&str>) -> Result<Vec<Segment>>;

    /// Get the name of this transcriber (for logging)
    fn name(&self) -> &'static str;
}
