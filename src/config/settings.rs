//! Runtime configuration settings

use crate::audio::{mp3_bitrate, SUPPORTED_BITRATES};
use crate::backend::ExternalCommand;
use crate::error::{Result, StemmixError};
use crate::mix::MixRecipe;
use crate::types::{LabelStyle, OutputFormat, Stem};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Runtime settings for the split / mix pipeline.
///
/// Built once at startup and passed by reference to every stage.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    /// Album directory containing the source songs
    pub album_dir: PathBuf,
    /// Single song to process (batch mode when `None`)
    pub song_file: Option<String>,
    /// Separation model identifier
    pub model: String,
    /// Root the separation tool writes `<model>/<song_id>/` into
    pub separated_dir: PathBuf,
    /// Format of converted stems and the mix
    pub format: OutputFormat,
    /// MP3 bitrate in kbps
    pub bitrate: u32,
    /// Stems and gains, in mix order
    pub recipe: MixRecipe,
    /// How gains appear in the mix file name
    pub label_style: LabelStyle,
    pub overwrite_stems: bool,
    pub overwrite_mix: bool,
    pub overwrite_subtitles: bool,
    /// Run the transcription stage
    pub transcribe: bool,
    pub whisper_model: String,
    /// Language spoken in the vocals; `None` lets the speech model detect it
    pub source_language: Option<String>,
    pub demucs_command: ExternalCommand,
    pub whisper_command: ExternalCommand,
    /// Show progress bar
    pub show_progress: bool,
    /// Print settings as JSON at the end of the run
    pub show_config: bool,
    /// Dry run mode - show songs and outputs without processing
    pub dry_run: bool,
}

impl Settings {
    /// Create validated settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Result<Self> {
        let recipe = MixRecipe::new(vec![
            (Stem::Drums, cli.gain_drums),
            (Stem::Vocals, cli.gain_vocals),
            (Stem::Bass, cli.gain_bass),
            (Stem::Other, cli.gain_other),
        ])?;

        let settings = Self {
            album_dir: cli.album.clone(),
            song_file: cli.song.clone().filter(|s| !s.trim().is_empty()),
            model: cli.model.trim().to_string(),
            separated_dir: cli.separated_dir.clone(),
            format: cli.format,
            bitrate: cli.bitrate,
            recipe,
            label_style: cli.label_style,
            overwrite_stems: cli.overwrite_stems,
            overwrite_mix: cli.overwrite_mix,
            overwrite_subtitles: cli.overwrite_subtitles,
            transcribe: cli.transcribe,
            whisper_model: cli.whisper_model.clone(),
            source_language: cli
                .source_language
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            demucs_command: parse_command("demucs", &cli.demucs_command)?,
            whisper_command: parse_command("whisper", &cli.whisper_command)?,
            show_progress: !cli.quiet,
            show_config: cli.show_config,
            dry_run: cli.dry_run,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Settings with the usual defaults for an album and model
    pub fn new(album_dir: impl Into<PathBuf>, model: impl Into<String>) -> Self {
        Self {
            album_dir: album_dir.into(),
            song_file: None,
            model: model.into(),
            separated_dir: PathBuf::from("separated"),
            format: OutputFormat::Mp3,
            bitrate: 320,
            recipe: MixRecipe::unity(),
            label_style: LabelStyle::Db,
            overwrite_stems: false,
            overwrite_mix: false,
            overwrite_subtitles: false,
            transcribe: false,
            whisper_model: "medium".to_string(),
            source_language: None,
            demucs_command: ExternalCommand {
                program: "python3".to_string(),
                args: vec!["-m".to_string(), "demucs".to_string()],
            },
            whisper_command: ExternalCommand {
                program: "whisper".to_string(),
                args: Vec::new(),
            },
            show_progress: true,
            show_config: false,
            dry_run: false,
        }
    }

    /// Check everything that can be checked before touching any song
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(StemmixError::ConfigError(
                "A separation model is required (set MODEL or --model)".to_string(),
            ));
        }
        if self.model.contains(['/', '\\']) {
            return Err(StemmixError::ConfigError(format!(
                "Model identifier '{}' must not contain path separators",
                self.model
            )));
        }
        if self.format == OutputFormat::Mp3 && mp3_bitrate(self.bitrate).is_none() {
            return Err(StemmixError::ConfigError(format!(
                "Unsupported MP3 bitrate {}kbps. Supported: {:?}",
                self.bitrate, SUPPORTED_BITRATES
            )));
        }
        Ok(())
    }

    /// Per-song working directory: `<album>/tracks/<song_id>`
    pub fn working_dir(&self, song_id: &str) -> PathBuf {
        self.album_dir.join("tracks").join(song_id)
    }

    /// Converted stem file inside a working directory
    pub fn stem_path(&self, working_dir: &Path, stem_name: &str) -> PathBuf {
        working_dir.join(format!("{}.{}", stem_name, self.format.extension()))
    }
}

fn parse_command(tool: &str, command_line: &str) -> Result<ExternalCommand> {
    ExternalCommand::parse(command_line)
        .ok_or_else(|| StemmixError::ConfigError(format!("The {} command must not be empty", tool)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cli;
    use clap::Parser;

    fn cli(extra: &[&str]) -> Cli {
        let mut args = vec!["stemmix", "--album", "/music/album", "--model", "htdemucs"];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_from_cli_builds_recipe_in_declared_order() {
        let settings = Settings::from_cli(&cli(&[])).unwrap();
        assert_eq!(settings.recipe.stems(), Stem::ALL.to_vec());
        assert_eq!(settings.demucs_command.program, "python3");
        assert_eq!(settings.whisper_command.program, "whisper");
        assert!(settings.show_progress);
    }

    #[test]
    fn test_zero_gain_rejected_at_load() {
        let err = Settings::from_cli(&cli(&["--gain-bass", "0"])).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, StemmixError::InvalidGain { stem: Some(Stem::Bass), .. }));
    }

    #[test]
    fn test_negative_gain_rejected_at_load() {
        assert!(Settings::from_cli(&cli(&["--gain-other=-0.5"])).is_err());
    }

    #[test]
    fn test_bad_bitrate_rejected_for_mp3_only() {
        assert!(Settings::from_cli(&cli(&["--bitrate", "100"])).is_err());
        assert!(Settings::from_cli(&cli(&["--bitrate", "100", "--format", "wav"])).is_ok());
    }

    #[test]
    fn test_blank_command_rejected() {
        let err = Settings::from_cli(&cli(&["--demucs-command", "  "])).unwrap_err();
        assert!(matches!(err, StemmixError::ConfigError(_)));
    }

    #[test]
    fn test_blank_song_means_batch() {
        let settings = Settings::from_cli(&cli(&["--song", " "])).unwrap();
        assert_eq!(settings.song_file, None);
    }

    #[test]
    fn test_blank_source_language_means_detect() {
        let settings = Settings::from_cli(&cli(&["--source-language", " "])).unwrap();
        assert_eq!(settings.source_language, None);
        let settings = Settings::from_cli(&cli(&["--source-language", "de"])).unwrap();
        assert_eq!(settings.source_language.as_deref(), Some("de"));
    }

    #[test]
    fn test_working_layout() {
        let settings = Settings::new("/music/album", "htdemucs");
        let work = settings.working_dir("Song");
        assert_eq!(work, PathBuf::from("/music/album/tracks/Song"));
        assert_eq!(
            settings.stem_path(&work, "vocals"),
            PathBuf::from("/music/album/tracks/Song/vocals.mp3")
        );
    }

    #[test]
    fn test_settings_serialize_for_display() {
        let settings = Settings::new("/music/album", "htdemucs");
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["model"], "htdemucs");
        assert_eq!(json["format"], "mp3");
        assert_eq!(json["recipe"]["drums"], 1.0);
    }
}
