//! Demucs stem separation via its command-line interface

use super::{run_tool, ExternalCommand, StemSeparator};
use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Runs `<command> -n <model> -o <output_root> <song>`.
///
/// Demucs writes one `.wav` per stem into `<output_root>/<model>/<song_id>/`.
/// Its own console output is passed through untouched.
#[derive(Debug, Clone)]
pub struct DemucsSeparator {
    command: ExternalCommand,
}

impl DemucsSeparator {
    pub fn new(command: ExternalCommand) -> Self {
        Self { command }
    }
}

impl Default for DemucsSeparator {
    fn default() -> Self {
        Self::new(ExternalCommand {
            program: "python3".to_string(),
            args: vec!["-m".to_string(), "demucs".to_string()],
        })
    }
}

impl StemSeparator for DemucsSeparator {
    fn separate(&self, song: &Path, model: &str, output_root: &Path) -> Result<()> {
        info!("Splitting '{}' with model {}", song.display(), model);

        let mut cmd = self.command.to_command();
        cmd.arg("-n").arg(model).arg("-o").arg(output_root).arg(song);

        run_tool(self.name(), cmd)
    }

    fn name(&self) -> &'static str {
        "demucs"
    }
}
