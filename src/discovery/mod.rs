//! Song discovery and artifact cache checks

pub mod cache;
pub mod scanner;

pub use cache::{file_exists_and_kept, missing_stems, stems_complete};
pub use scanner::{files_with_extension, resolve_song, scan_album, song_id, Song};
