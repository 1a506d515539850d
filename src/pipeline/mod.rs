//! Per-song stages and album orchestration

pub mod orchestrator;
pub mod stages;

pub use orchestrator::{process_song, run, run_with, PipelineResult, SongReport};
pub use stages::{Artifact, ConversionReport};
