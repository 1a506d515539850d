//! The four per-song stages: separate, convert, mix, transcribe
//!
//! Each stage owns only its own output artifacts and checks them before
//! doing any work, so re-running over an album only does what is missing.

use crate::audio::{decode_stereo, encode};
use crate::backend::{separation_dir, StemSeparator, Transcriber};
use crate::config::Settings;
use crate::discovery::cache::SEPARATED_EXTENSION;
use crate::discovery::{file_exists_and_kept, files_with_extension, missing_stems, stems_complete, Song};
use crate::error::{Result, StemmixError};
use crate::export::write_srt;
use crate::mix::{build_recipe_label, overlay, LoadedStem};
use crate::types::Stem;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the subtitle sidecar in the working directory
pub const SUBTITLE_FILE: &str = "vocals.srt";

/// What a stage did with its single output artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Produced by this run
    Written(PathBuf),
    /// Already present and kept
    Skipped(PathBuf),
}

impl Artifact {
    pub fn path(&self) -> &Path {
        match self {
            Artifact::Written(p) | Artifact::Skipped(p) => p,
        }
    }

    pub fn was_skipped(&self) -> bool {
        matches!(self, Artifact::Skipped(_))
    }
}

// =============================================================================
// Separation
// =============================================================================

/// Run the separator unless its output directory already holds every stem.
///
/// Returns the separation output directory.
pub fn separate(song: &Song, settings: &Settings, separator: &dyn StemSeparator) -> Result<Artifact> {
    let dir = separation_dir(&settings.separated_dir, &settings.model, &song.id);
    create_dir_if_needed(&dir)?;

    if stems_complete(&dir, &Stem::ALL) {
        info!("{}: skipping, stems already exist in '{}'", separator.name(), dir.display());
        return Ok(Artifact::Skipped(dir));
    }

    info!("{}: splitting '{}'", separator.name(), song.path.display());
    separator.separate(&song.path, &settings.model, &settings.separated_dir)?;

    let missing = missing_stems(&dir, &Stem::ALL);
    if !missing.is_empty() {
        return Err(StemmixError::IncompleteSeparation {
            dir,
            missing: missing.iter().map(|s| s.name().to_string()).collect(),
        });
    }

    Ok(Artifact::Written(dir))
}

// =============================================================================
// Conversion
// =============================================================================

/// Converted / kept files of one conversion run, in processing order
#[derive(Debug, Default, Clone)]
pub struct ConversionReport {
    pub converted: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Re-encode every separated `.wav` into the working format.
///
/// Files are taken in lexicographic order; targets that already exist are
/// kept unless `overwrite_stems` is set.
pub fn convert_stems(separated_dir: &Path, working_dir: &Path, settings: &Settings) -> Result<ConversionReport> {
    let mut report = ConversionReport::default();

    for input in files_with_extension(separated_dir, SEPARATED_EXTENSION)? {
        let name = input
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| StemmixError::decode_error(&input, "File name is not valid UTF-8"))?;
        let target = settings.stem_path(working_dir, name);

        if file_exists_and_kept(&target, settings.overwrite_stems) {
            info!("conversion: skipping, '{}' already exists", target.display());
            report.skipped.push(target);
            continue;
        }

        info!(
            "conversion: '{}' -> {}",
            input.display(),
            settings.format.extension()
        );
        let audio = decode_stereo(&input)?;
        encode(&target, &audio, settings.format, settings.bitrate)?;
        report.converted.push(target);
    }

    debug!(
        "Converted {} stems, kept {}",
        report.converted.len(),
        report.skipped.len()
    );
    Ok(report)
}

// =============================================================================
// Mixing
// =============================================================================

/// Mix file for a song: `<working_dir>/<song_id><recipe label>.<ext>`
pub fn mix_output_path(working_dir: &Path, song_id: &str, settings: &Settings) -> PathBuf {
    let label = build_recipe_label(&settings.recipe, settings.label_style);
    working_dir.join(format!("{}{}.{}", song_id, label, settings.format.extension()))
}

/// Overlay the converted stems at the recipe's gains and write the mix.
///
/// Every stem is decoded before anything is written; one bad stem means no mix.
pub fn mix_song(working_dir: &Path, song_id: &str, settings: &Settings) -> Result<Artifact> {
    let output = mix_output_path(working_dir, song_id, settings);

    if file_exists_and_kept(&output, settings.overwrite_mix) {
        info!("mix: skipping, '{}' already exists", output.display());
        return Ok(Artifact::Skipped(output));
    }

    let stems = settings
        .recipe
        .iter()
        .map(|entry| {
            let path = settings.stem_path(working_dir, entry.stem.name());
            let audio = decode_stereo(&path)?;
            Ok(LoadedStem {
                stem: entry.stem,
                path,
                audio,
                gain: entry.gain,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mix = overlay(&stems)?;

    info!("mix: merging {} stems into '{}'", stems.len(), output.display());
    encode(&output, &mix, settings.format, settings.bitrate)?;

    Ok(Artifact::Written(output))
}

// =============================================================================
// Transcription
// =============================================================================

/// Transcribe the converted vocal stem into `vocals.srt`
pub fn transcribe_vocals(working_dir: &Path, settings: &Settings, transcriber: &dyn Transcriber) -> Result<Artifact> {
    let output = working_dir.join(SUBTITLE_FILE);

    if file_exists_and_kept(&output, settings.overwrite_subtitles) {
        info!("subtitles: skipping, '{}' already exists", output.display());
        return Ok(Artifact::Skipped(output));
    }

    let vocals = settings.stem_path(working_dir, Stem::Vocals.name());
    if !vocals.exists() {
        return Err(StemmixError::FileNotFound(vocals));
    }

    info!("{}: transcribing '{}'", transcriber.name(), vocals.display());
    let segments = transcriber.transcribe(&vocals, settings.source_language.as_deref())?;
    write_srt(&segments, &output)?;

    Ok(Artifact::Written(output))
}

/// Create a directory (and parents) if it does not exist yet
pub fn create_dir_if_needed(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| StemmixError::output_error(dir, e))?;
        debug!("Created directory '{}'", dir.display());
    }
    Ok(())
}
