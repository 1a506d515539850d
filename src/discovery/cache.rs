//! Artifact cache checks
//!
//! Every expensive stage asks these predicates before doing any work, which
//! is what makes re-running the pipeline over an album cheap.

use super::scanner::files_with_extension;
use crate::types::Stem;
use std::collections::BTreeSet;
use std::path::Path;

/// Extension of the files the separation tool writes
pub const SEPARATED_EXTENSION: &str = "wav";

/// True iff the `.wav` files in `output_dir` are exactly the expected stems.
///
/// Matching is by name: `drums.wav`, `vocals.wav`, ... A missing directory,
/// a missing stem or an unexpected extra file all count as incomplete.
pub fn stems_complete(output_dir: &Path, expected: &[Stem]) -> bool {
    missing_stems(output_dir, expected).is_empty() && extra_files(output_dir, expected) == 0
}

/// Expected stems with no matching file in `output_dir`
pub fn missing_stems(output_dir: &Path, expected: &[Stem]) -> Vec<Stem> {
    let present = present_names(output_dir);
    expected
        .iter()
        .copied()
        .filter(|stem| !present.contains(stem.name()))
        .collect()
}

/// True iff `path` exists and must be kept (no overwrite requested)
pub fn file_exists_and_kept(path: &Path, overwrite: bool) -> bool {
    path.exists() && !overwrite
}

fn extra_files(output_dir: &Path, expected: &[Stem]) -> usize {
    present_names(output_dir)
        .iter()
        .filter(|name| !expected.iter().any(|s| s.name() == name.as_str()))
        .count()
}

fn present_names(output_dir: &Path) -> BTreeSet<String> {
    files_with_extension(output_dir, SEPARATED_EXTENSION)
        .unwrap_or_default()
        .iter()
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(|s| s.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_complete_when_all_stems_present() {
        let dir = TempDir::new().unwrap();
        for stem in Stem::ALL {
            touch(dir.path(), &format!("{}.wav", stem));
        }
        assert!(stems_complete(dir.path(), &Stem::ALL));
    }

    #[test]
    fn test_incomplete_when_stem_missing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "drums.wav");
        touch(dir.path(), "vocals.wav");

        assert!(!stems_complete(dir.path(), &Stem::ALL));
        assert_eq!(missing_stems(dir.path(), &Stem::ALL), vec![Stem::Bass, Stem::Other]);
    }

    #[test]
    fn test_same_count_wrong_names_is_incomplete() {
        let dir = TempDir::new().unwrap();
        for name in ["drums.wav", "vocals.wav", "bass.wav", "piano.wav"] {
            touch(dir.path(), name);
        }
        assert!(!stems_complete(dir.path(), &Stem::ALL));
    }

    #[test]
    fn test_other_extensions_ignored() {
        let dir = TempDir::new().unwrap();
        for stem in Stem::ALL {
            touch(dir.path(), &format!("{}.wav", stem));
        }
        touch(dir.path(), "log.txt");
        assert!(stems_complete(dir.path(), &Stem::ALL));
    }

    #[test]
    fn test_missing_directory_is_incomplete() {
        assert!(!stems_complete(Path::new("/no/such/dir"), &Stem::ALL));
    }

    #[test]
    fn test_file_exists_and_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mix.mp3");

        assert!(!file_exists_and_kept(&path, false));
        touch(dir.path(), "mix.mp3");
        assert!(file_exists_and_kept(&path, false));
        assert!(!file_exists_and_kept(&path, true));
    }
}
