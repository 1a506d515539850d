//! Pipeline orchestration
//!
//! Runs separate -> convert -> mix -> (transcribe) for one song, and that
//! sequence for every song of an album. Songs run one after another; a
//! failing song is reported and the album carries on with the next one,
//! unless the error is fatal for the whole run.

use super::stages::{self, Artifact, SUBTITLE_FILE};
use crate::backend::{separation_dir, DemucsSeparator, StemSeparator, Transcriber, WhisperTranscriber};
use crate::config::Settings;
use crate::discovery::{self, Song};
use crate::error::{Result, StemmixError};
use crate::types::{SongStage, Stem};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// Outcome of one song's pipeline
#[derive(Debug, Clone)]
pub struct SongReport {
    pub song_id: String,
    /// `Done` on success, otherwise the stage that failed
    pub stage: SongStage,
    pub mix: Option<PathBuf>,
    pub subtitles: Option<PathBuf>,
    pub error: Option<String>,
}

impl SongReport {
    pub fn succeeded(&self) -> bool {
        self.stage == SongStage::Done
    }
}

/// Pipeline result summary
#[derive(Debug)]
pub struct PipelineResult {
    pub total_songs: usize,
    pub successful: usize,
    pub failed: usize,
    /// One report per song, in processing order
    pub songs: Vec<SongReport>,
}

/// Run the pipeline with the command-line backends from `settings`
pub fn run(settings: &Settings) -> Result<PipelineResult> {
    let separator = DemucsSeparator::new(settings.demucs_command.clone());
    let transcriber = WhisperTranscriber::new(settings.whisper_command.clone(), &settings.whisper_model);
    run_with(settings, &separator, &transcriber)
}

/// Run the pipeline with explicit backends
pub fn run_with(
    settings: &Settings,
    separator: &dyn StemSeparator,
    transcriber: &dyn Transcriber,
) -> Result<PipelineResult> {
    let pipeline_start = Instant::now();
    settings.validate()?;

    let songs = match &settings.song_file {
        Some(file_name) => {
            info!("Input song: '{}'", file_name);
            vec![discovery::resolve_song(&settings.album_dir, file_name)?]
        }
        None => {
            info!("Input album: '{}'", settings.album_dir.display());
            discovery::scan_album(&settings.album_dir)?
        }
    };

    if settings.dry_run {
        return Ok(run_dry_run(&songs, settings));
    }

    let progress_bar = if settings.show_progress && songs.len() > 1 {
        let pb = ProgressBar::new(songs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    // First file to claim each song id owns its directories
    let mut claimed: HashMap<&str, &Path> = HashMap::new();
    let mut reports = Vec::with_capacity(songs.len());
    for song in &songs {
        if let Some(ref pb) = progress_bar {
            pb.set_message(song.id.clone());
        }

        let song_start = Instant::now();
        let outcome = match claimed.get(song.id.as_str()) {
            Some(first) => Err(StemmixError::DuplicateSongId {
                id: song.id.clone(),
                path: song.path.clone(),
                first: first.to_path_buf(),
            }
            .in_stage(song.id.clone(), SongStage::Pending)),
            None => {
                claimed.insert(&song.id, &song.path);
                process_song(song, settings, separator, transcriber)
            }
        };

        let report = match outcome {
            Ok(report) => {
                info!(
                    "Finished '{}' in {:.1}s",
                    song.id,
                    song_start.elapsed().as_secs_f64()
                );
                report
            }
            Err(e) if e.is_fatal() => {
                if let Some(ref pb) = progress_bar {
                    pb.abandon();
                }
                return Err(e);
            }
            Err(e) => {
                error!("{}", e);
                SongReport {
                    song_id: song.id.clone(),
                    stage: e.stage().unwrap_or(SongStage::Pending),
                    mix: None,
                    subtitles: None,
                    error: Some(e.to_string()),
                }
            }
        };
        reports.push(report);

        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_with_message("done");
    }

    let successful = reports.iter().filter(|r| r.succeeded()).count();
    info!(
        "Total pipeline time: {:.2}s",
        pipeline_start.elapsed().as_secs_f64()
    );

    Ok(PipelineResult {
        total_songs: songs.len(),
        successful,
        failed: reports.len() - successful,
        songs: reports,
    })
}

/// Run every stage for one song, stopping at the first failure
pub fn process_song(
    song: &Song,
    settings: &Settings,
    separator: &dyn StemSeparator,
    transcriber: &dyn Transcriber,
) -> Result<SongReport> {
    let in_stage = |stage: SongStage| {
        let id = song.id.clone();
        move |e: StemmixError| e.in_stage(id, stage)
    };

    debug!("[{}] {}", song.id, SongStage::Pending);
    let working_dir = settings.working_dir(&song.id);
    stages::create_dir_if_needed(&working_dir).map_err(in_stage(SongStage::Pending))?;

    debug!("[{}] {}", song.id, SongStage::Separating);
    let separated = stages::separate(song, settings, separator).map_err(in_stage(SongStage::Separating))?;

    debug!("[{}] {}", song.id, SongStage::Converting);
    stages::convert_stems(separated.path(), &working_dir, settings)
        .map_err(in_stage(SongStage::Converting))?;

    debug!("[{}] {}", song.id, SongStage::Mixing);
    let mix = stages::mix_song(&working_dir, &song.id, settings).map_err(in_stage(SongStage::Mixing))?;

    let subtitles = if settings.transcribe {
        debug!("[{}] {}", song.id, SongStage::Transcribing);
        let artifact = stages::transcribe_vocals(&working_dir, settings, transcriber)
            .map_err(in_stage(SongStage::Transcribing))?;
        Some(artifact)
    } else {
        None
    };

    debug!("[{}] {}", song.id, SongStage::Done);
    Ok(SongReport {
        song_id: song.id.clone(),
        stage: SongStage::Done,
        mix: Some(mix.path().to_path_buf()),
        subtitles: subtitles.as_ref().map(|a: &Artifact| a.path().to_path_buf()),
        error: None,
    })
}

/// Dry run mode - show songs and planned outputs without processing
fn run_dry_run(songs: &[Song], settings: &Settings) -> PipelineResult {
    println!();
    println!("=== DRY RUN MODE ===");
    println!();

    for song in songs {
        let working_dir = settings.working_dir(&song.id);
        let separated = separation_dir(&settings.separated_dir, &settings.model, &song.id);

        println!("{}", song.path.display());
        println!("  stems:     {}/{{{}}}.wav", separated.display(), stem_list());
        println!(
            "  converted: {}/{{{}}}.{}",
            working_dir.display(),
            stem_list(),
            settings.format.extension()
        );
        println!(
            "  mix:       {}",
            stages::mix_output_path(&working_dir, &song.id, settings).display()
        );
        if settings.transcribe {
            println!("  subtitles: {}", working_dir.join(SUBTITLE_FILE).display());
        }
        println!();
    }

    println!("Would process {} songs", songs.len());
    println!();

    PipelineResult {
        total_songs: songs.len(),
        successful: 0,
        failed: 0,
        songs: Vec::new(),
    }
}

fn stem_list() -> String {
    Stem::ALL.iter().map(|s| s.name()).collect::<Vec<_>>().join(",")
}
