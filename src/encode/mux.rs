use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Result, VizError};

/// Combine the silent video with the source audio into the final container.
///
/// The video stream is copied (no re-encode); audio is transcoded to AAC.
/// Any failure here is a job-level failure and is never retried.
pub fn mux_audio(silent_video: &Path, audio: &Path, output: &Path) -> Result<()> {
    log::info!("Muxing audio into {}", output.display());

    let result = Command::new("ffmpeg")
        .args([
            "-y",
            "-i", &silent_video.to_string_lossy(),
            "-i", &audio.to_string_lossy(),
            "-c:v", "copy",
            "-c:a", "aac",
            "-shortest",
        ])
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output();

    let output_info = result.map_err(|e| VizError::MuxFailure(e.to_string()))?;

    if !output_info.status.success() {
        let stderr = String::from_utf8_lossy(&output_info.stderr);
        // Keep the tail; ffmpeg puts the actual error last.
        let tail: String = stderr
            .lines()
            .rev()
            .take(5)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join("\n");
        return Err(VizError::MuxFailure(tail));
    }

    Ok(())
}
