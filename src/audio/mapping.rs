/// Resolves which feature-matrix column applies to each output video frame.
///
/// The analysis frame rate (`sample_rate / hop_length`) and the video frame
/// rate are independent; when fps exceeds the analysis rate several video
/// frames share one column. The mapping is monotonic non-decreasing.
pub struct FrameIndexMapper {
    fps: u32,
    hop_length: usize,
    sample_rate: u32,
    columns: usize,
}

impl FrameIndexMapper {
    pub fn new(fps: u32, hop_length: usize, sample_rate: u32, columns: usize) -> Self {
        Self { fps, hop_length, sample_rate, columns }
    }

    /// Feature column for video frame `i`: the analysis window nearest to
    /// the frame's timestamp, clamped to the matrix.
    pub fn column_for(&self, frame_index: usize) -> usize {
        let seconds = frame_index as f64 / self.fps as f64;
        let col = (seconds * self.sample_rate as f64 / self.hop_length as f64).round() as usize;
        col.min(self.columns.saturating_sub(1))
    }
}

/// Total output frames for a clip: round(duration * fps), at least 1 frame
/// for any non-empty audio.
pub fn total_frames(duration_seconds: f32, fps: u32) -> usize {
    (duration_seconds as f64 * fps as f64).round() as usize
}
