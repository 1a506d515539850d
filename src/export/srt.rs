//! SubRip (.srt) subtitle export

use crate::error::{Result, StemmixError};
use crate::types::Segment;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Format seconds as `HH:MM:SS,mmm`, truncating (never rounding) milliseconds
pub fn format_timestamp(seconds: f64) -> String {
    // 0.29 * 1000 = 289.999...
    let total_ms = (seconds.max(0.0) * 1000.0 + 1e-6).floor() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, ms)
}

/// Render segments as an SRT document: numbered blocks separated by blank lines
pub fn to_srt(segments: &[Segment]) -> String {
    let mut srt = String::new();
    for (i, segment) in segments.iter().enumerate() {
        srt.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            segment.text
        ));
    }
    srt
}

/// Write segments to an SRT file
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
pub fn write_srt(segments: &[Segment], output_path: &Path) -> Result<()> {
    let temp_path = output_path.with_extension("srt.tmp");

    let file = File::create(&temp_path).map_err(|e| StemmixError::output_error(&temp_path, e))?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(to_srt(segments).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| StemmixError::output_error(&temp_path, e))?;
    drop(writer);

    std::fs::rename(&temp_path, output_path)
        .map_err(|e| StemmixError::output_error(output_path, e))?;

    debug!("Wrote {} subtitle blocks", segments.len());
    info!("Wrote subtitles to {}", output_path.display());
    Ok(())
}
