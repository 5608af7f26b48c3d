use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use super::batch::FrameSink;
use crate::error::VizError;
use crate::render::frame::RasterFrame;

/// ffmpeg child process consuming raw `bgr24` frames on stdin and producing
/// the silent video. Audio is attached afterwards by the muxer.
///
/// `finish` takes the child out; if the encoder is dropped with the child
/// still present (a pipeline error aborted the job), `Drop` kills and reaps
/// it so no orphaned ffmpeg lingers.
pub struct FfmpegEncoder {
    child: Option<Child>,
}

impl FfmpegEncoder {
    pub fn new(
        output_path: &Path,
        width: u32,
        height: u32,
        fps: u32,
        codec: &str,
        pix_fmt: &str,
        crf: u32,
    ) -> Result<Self> {
        let args = vec![
            "-y".to_string(),
            "-f".into(), "rawvideo".into(),
            "-pixel_format".into(), "bgr24".into(),
            "-video_size".into(), format!("{}x{}", width, height),
            "-framerate".into(), fps.to_string(),
            "-i".into(), "pipe:0".into(),
            "-an".into(),
            "-c:v".into(), codec.to_string(),
            "-pix_fmt".into(), pix_fmt.to_string(),
            "-crf".into(), crf.to_string(),
            "-preset".into(), "medium".into(),
            output_path.to_string_lossy().into_owned(),
        ];

        let child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn ffmpeg. Is ffmpeg installed?")?;

        log::info!(
            "FFmpeg encoder started: {}x{} @ {}fps, codec={}",
            width, height, fps, codec
        );

        Ok(Self { child: Some(child) })
    }

    /// Close stdin, wait for ffmpeg, and fail on a nonzero exit.
    pub fn finish(mut self) -> Result<()> {
        let mut child = self
            .child
            .take()
            .context("ffmpeg encoder already finished")?;
        drop(child.stdin.take());

        let output = child.wait_with_output().context("Failed to wait for ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("FFmpeg exited with error:\n{}", stderr);
        }

        log::info!("FFmpeg encoding complete");
        Ok(())
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        // Abort path only: finish() clears the child on the normal path.
        if let Some(mut child) = self.child.take() {
            drop(child.stdin.take());
            let _ = child.kill();
            let _ = child.wait();
            log::warn!("FFmpeg encoder aborted before finishing; child terminated");
        }
    }
}

impl FrameSink for FfmpegEncoder {
    fn write_frame(&mut self, frame: &RasterFrame) -> crate::error::Result<()> {
        let stdin = self
            .child
            .as_mut()
            .and_then(|c| c.stdin.as_mut())
            .ok_or_else(|| VizError::SinkWriteFailure("ffmpeg stdin not available".into()))?;
        stdin
            .write_all(frame.as_bytes())
            .map_err(|e| VizError::SinkWriteFailure(e.to_string()))
    }
}

/// Probe for an ffmpeg binary on PATH before starting a job.
pub fn is_ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
