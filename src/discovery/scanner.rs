//! Song discovery and stem-file listing

use crate::error::{Result, StemmixError};
use crate::types::AudioFormat;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A song found in the album directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub path: PathBuf,
    /// File name without extension; keys every artifact of the song
    pub id: String,
}

impl Song {
    /// Build a song from a path, if it has a supported audio extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        AudioFormat::from_extension(ext)?;
        let id = song_id(path)?;
        Some(Self {
            path: path.to_path_buf(),
            id,
        })
    }
}

/// Song identifier: file name without extension
pub fn song_id(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// List the songs directly inside an album directory, sorted by file name.
///
/// Subdirectories (including the album's own `tracks/` output) are not entered.
pub fn scan_album(album_dir: &Path) -> Result<Vec<Song>> {
    if !album_dir.is_dir() {
        return Err(StemmixError::FileNotFound(album_dir.to_path_buf()));
    }

    let songs: Vec<Song> = WalkDir::new(album_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Song::from_path(e.path()))
        .inspect(|song| debug!("Discovered: {}", song.path.display()))
        .collect();

    info!("Discovered {} songs in {}", songs.len(), album_dir.display());
    if songs.is_empty() {
        warn!("No supported audio files found in {}", album_dir.display());
    }

    Ok(songs)
}

/// Resolve the single configured song inside the album directory
pub fn resolve_song(album_dir: &Path, file_name: &str) -> Result<Song> {
    let path = album_dir.join(file_name);
    if !path.is_file() {
        return Err(StemmixError::FileNotFound(path));
    }
    Song::from_path(&path).ok_or_else(|| {
        StemmixError::ConfigError(format!(
            "'{}' is not a supported audio file ({})",
            path.display(),
            crate::error::SUPPORTED_FORMATS
        ))
    })
}

/// Files in `dir` with the given extension, sorted lexicographically
pub fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(StemmixError::FileNotFound(dir.to_path_buf()));
    }

    let files = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        })
        .collect();
    Ok(files)
}
