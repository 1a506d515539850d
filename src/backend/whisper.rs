//! Whisper transcription via its command-line interface
//!
//! The CLI is asked for JSON output in a scratch directory; only the
//! `segments` array of that file is read back.

use super::{run_tool, ExternalCommand, Transcriber};
use crate::error::{Result, StemmixError};
use crate::types::Segment;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Runs `<command> <audio> --model <model> --task translate [--language <lang>]
/// --output_format json --output_dir <tmp>`.
///
/// `--language` is the spoken language; translation output is always English.
#[derive(Debug, Clone)]
pub struct WhisperTranscriber {
    command: ExternalCommand,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(command: ExternalCommand, model: impl Into<String>) -> Self {
        Self {
            command,
            model: model.into(),
        }
    }
}

/// The part of Whisper's JSON output we use
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
}

/// Parse Whisper JSON output into segments, trimming segment text
pub fn parse_segments(json: &str) -> serde_json::Result<Vec<Segment>> {
    let output: WhisperOutput = serde_json::from_str(json)?;
    Ok(output
        .segments
        .into_iter()
        .map(|s| Segment {
            start: s.start,
            end: s.end,
            text: s.text.trim().to_string(),
        })
        .collect())
}

impl WhisperTranscriber {
    fn command_for(&self, audio: &Path, source_language: Option<&str>, output_dir: &Path) -> Command {
        let mut cmd = self.command.to_command();
        cmd.arg(audio).arg("--model").arg(&self.model).arg("--task").arg("translate");
        if let Some(language) = source_language {
            cmd.arg("--language").arg(language);
        }
        cmd.arg("--output_format")
            .arg("json")
            .arg("--output_dir")
            .arg(output_dir);
        cmd
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, audio: &Path, source_language: Option<&str>) -> Result<Vec<Segment>> {
        info!(
            "Transcribing '{}' (model {}, spoken language {})",
            audio.display(),
            self.model,
            source_language.unwrap_or("auto")
        );

        let scratch = tempfile::tempdir()?;

        let cmd = self.command_for(audio, source_language, scratch.path());

        run_tool(self.name(), cmd)?;

        let stem = audio
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        let json_path = scratch.path().join(format!("{}.json", stem));

        let json = std::fs::read_to_string(&json_path).map_err(|e| StemmixError::TranscriptError {
            path: json_path.clone(),
            reason: e.to_string(),
        })?;

        let segments = parse_segments(&json).map_err(|e| StemmixError::TranscriptError {
            path: json_path.clone(),
            reason: e.to_string(),
        })?;

        debug!("Whisper returned {} segments", segments.len());
        Ok(segments)
    }

    fn name(&self) -> &'static str {
        "whisper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments_ignores_extra_fields() {
        let json = r#"{
            "text": " Hello there. General Kenobi.",
            "language": "es",
            "segments": [
                {"id": 0, "seek": 0, "start": 0.0, "end": 2.5, "text": " Hello there.", "tokens": [1, 2]},
                {"id": 1, "seek": 0, "start": 2.5, "end": 4.25, "text": " General Kenobi. "}
            ]
        }"#;

        let segments = parse_segments(json).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello there.");
        assert_eq!(segments[1].start, 2.5);
        assert_eq!(segments[1].end, 4.25);
        assert_eq!(segments[1].text, "General Kenobi.");
    }

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect()
    }

    #[test]
    fn test_language_flag_only_when_known() {
        let transcriber = WhisperTranscriber::new(ExternalCommand::parse("whisper").unwrap(), "medium");
        let out = Path::new("/tmp/out");

        let detect = args_of(&transcriber.command_for(Path::new("vocals.mp3"), None, out));
        assert!(!detect.contains(&"--language".to_string()));
        assert_eq!(detect[..5], ["vocals.mp3", "--model", "medium", "--task", "translate"]);

        let spanish = args_of(&transcriber.command_for(Path::new("vocals.mp3"), Some("es"), out));
        let pos = spanish.iter().position(|a| a == "--language").unwrap();
        assert_eq!(spanish[pos + 1], "es");
    }

    #[test]
    fn test_parse_segments_rejects_missing_array() {
        assert!(parse_segments(r#"{"text": "hi"}"#).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_success_without_output_is_transcript_error() {
        let transcriber = WhisperTranscriber::new(ExternalCommand::parse("true").unwrap(), "tiny");
        let err = transcriber
            .transcribe(Path::new("vocals.mp3"), None)
            .unwrap_err();
        assert!(matches!(err, StemmixError::TranscriptError { .. }));
    }
}
