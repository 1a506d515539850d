//! CLI argument parsing and configuration
//!
//! Every option can also come from the environment, so a `.env`-style shell
//! setup (`ALBUM_DIR=... MODEL=... stemmix`) works without any flags.

use crate::types::{LabelStyle, OutputFormat};
use clap::builder::FalseyValueParser;
use clap::Parser;
use std::path::PathBuf;

/// stemmix - split songs into stems and remix them
///
/// Separates every song of an album (or a single song) into drums, vocals,
/// bass and other, converts the stems, mixes them back at the chosen levels
/// and optionally writes translated subtitles for the vocals.
#[derive(Parser, Debug)]
#[command(name = "stemmix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Album directory containing the source songs
    #[arg(short, long, env = "ALBUM_DIR", value_name = "DIR")]
    pub album: PathBuf,

    /// Process only this file of the album (otherwise the whole album)
    #[arg(short, long, env = "SONG_FILE_NAME", value_name = "FILE")]
    pub song: Option<String>,

    /// Separation model identifier (e.g. htdemucs)
    #[arg(short, long, env = "MODEL")]
    pub model: String,

    /// Root directory the separation tool writes into
    #[arg(long, env = "SEPARATED_DIR", value_name = "DIR", default_value = "separated")]
    pub separated_dir: PathBuf,

    /// Format of converted stems and the mix
    #[arg(long, env = "OUTPUT_FORMAT", value_enum, default_value_t = OutputFormat::Mp3)]
    pub format: OutputFormat,

    /// MP3 bitrate in kbps
    #[arg(short, long, env = "BITRATE", default_value_t = 320)]
    pub bitrate: u32,

    /// Drums level as a fraction of the original (1.0 = unchanged)
    #[arg(long, env = "GAIN_DRUMS", default_value_t = 1.0)]
    pub gain_drums: f64,

    /// Vocals level as a fraction of the original
    #[arg(long, env = "GAIN_VOCALS", default_value_t = 0.3)]
    pub gain_vocals: f64,

    /// Bass level as a fraction of the original
    #[arg(long, env = "GAIN_BASS", default_value_t = 0.3)]
    pub gain_bass: f64,

    /// Other instruments level as a fraction of the original
    #[arg(long, env = "GAIN_OTHER", default_value_t = 0.3)]
    pub gain_other: f64,

    /// How gains are written into the mix file name
    #[arg(long, env = "LABEL_STYLE", value_enum, default_value_t = LabelStyle::Db)]
    pub label_style: LabelStyle,

    /// Re-convert stems even if converted files exist
    #[arg(long, env = "OVERWRITE_STEMS", value_parser = FalseyValueParser::new())]
    pub overwrite_stems: bool,

    /// Re-mix even if the mix file exists
    #[arg(long, env = "OVERWRITE_MIX", value_parser = FalseyValueParser::new())]
    pub overwrite_mix: bool,

    /// Re-transcribe even if the subtitle file exists
    #[arg(long, env = "OVERWRITE_SUBTITLES", value_parser = FalseyValueParser::new())]
    pub overwrite_subtitles: bool,

    /// Transcribe the vocal stem into translated subtitles
    #[arg(short, long, env = "TRANSCRIBE", value_parser = FalseyValueParser::new())]
    pub transcribe: bool,

    /// Speech model used for transcription
    #[arg(long, env = "WHISPER_MODEL", default_value = "medium")]
    pub whisper_model: String,

    /// Language spoken in the vocals (auto-detected when unset).
    /// Subtitles are always translated to English.
    #[arg(long, env = "TRANSCRIBE_LANGUAGE", value_name = "LANG")]
    pub source_language: Option<String>,

    /// Command that runs the separation tool
    #[arg(long, env = "DEMUCS_COMMAND", default_value = "python3 -m demucs")]
    pub demucs_command: String,

    /// Command that runs the transcription tool
    #[arg(long, env = "WHISPER_COMMAND", default_value = "whisper")]
    pub whisper_command: String,

    /// Print the effective configuration as JSON when done
    #[arg(long, env = "SHOW_CONFIG", value_parser = FalseyValueParser::new())]
    pub show_config: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress progress bar)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Dry run - list songs and planned outputs without processing
    #[arg(long, default_value = "false")]
    pub dry_run: bool,
}

impl Cli {
    /// Get the log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
