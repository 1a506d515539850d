//! stemmix - Stem Separation, Remix & Subtitle Pipeline
//!
//! A command-line utility that splits the songs of an album into drums,
//! vocals, bass and other stems, converts them, mixes them back with
//! per-stem gains and optionally transcribes the vocals into translated
//! subtitles.
//!
//! # Architecture
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `discovery`: Album scanning and the skip-if-present cache checks
//! - `audio`: Decoding (symphonia) and encoding (hound / LAME)
//! - `backend`: External separation and transcription tools
//! - `mix`: Gain conversion, mix recipes and the overlay mixer
//! - `export`: SRT subtitle output
//! - `pipeline`: Per-song stages and album orchestration
//!
//! # Example
//!
//! ```no_run
//! use stemmix::{config::Settings, pipeline};
//!
//! let settings = Settings::new("/music/album", "htdemucs");
//! let result = pipeline::run(&settings).expect("Pipeline failed");
//! println!("Processed {} songs", result.successful);
//! ```

pub mod audio;
pub mod backend;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod mix;
pub mod pipeline;
pub mod types;

// Re-export key types at crate root
pub use error::{Result, StemmixError};
pub use mix::MixRecipe;
pub use types::{Segment, SongStage, Stem, StereoBuffer};
