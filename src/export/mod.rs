//! Output formats

pub mod srt;

pub use srt::{format_timestamp, to_srt, write_srt};
