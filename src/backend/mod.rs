//! External model backends (stem separation, transcription)

pub mod demucs;
pub mod traits;
pub mod whisper;

pub use demucs::DemucsSeparator;
pub use traits::{StemSeparator, Transcriber};
pub use whisper::WhisperTranscriber;

use crate::error::{Result, StemmixError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Directory the separator writes a song's stems into: `<root>/<model>/<song_id>`
pub fn separation_dir(output_root: &Path, model: &str, song_id: &str) -> PathBuf {
    output_root.join(model).join(song_id)
}

/// A program plus leading arguments, e.g. `python3 -m demucs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalCommand {
    /// Split a command line on whitespace; `None` if it is blank
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(|s| s.to_string());
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// A `Command` with the leading arguments applied and stdin closed
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        cmd
    }
}

/// Run to completion, mapping spawn failures and non-zero exits to errors
pub(crate) fn run_tool(tool: &str, mut cmd: Command) -> Result<()> {
    debug!("Running {}: {:?}", tool, cmd);

    let status: ExitStatus = cmd.status().map_err(|e| StemmixError::ToolUnavailable {
        tool: tool.to_string(),
        reason: e.to_string(),
    })?;

    if !status.success() {
        return Err(StemmixError::ToolFailed {
            tool: tool.to_string(),
            status: status.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_line() {
        let cmd = ExternalCommand::parse("python3 -m  demucs").unwrap();
        assert_eq!(cmd.program, "python3");
        assert_eq!(cmd.args, vec!["-m", "demucs"]);

        assert_eq!(ExternalCommand::parse("whisper").unwrap().args.len(), 0);
        assert!(ExternalCommand::parse("   ").is_none());
    }

    #[test]
    fn test_separation_dir_layout() {
        let dir = separation_dir(Path::new("separated"), "htdemucs", "My Song");
        assert_eq!(dir, PathBuf::from("separated/htdemucs/My Song"));
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let cmd = ExternalCommand::parse("stemmix-test-no-such-program --flag").unwrap();
        let err = run_tool("fake", cmd.to_command()).unwrap_err();
        assert!(matches!(err, StemmixError::ToolUnavailable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_tool_failure() {
        let cmd = ExternalCommand::parse("false").unwrap();
        let err = run_tool("false", cmd.to_command()).unwrap_err();
        assert!(matches!(err, StemmixError::ToolFailed { .. }));
    }
}
