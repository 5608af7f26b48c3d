use crate::error::Result;
use crate::render::frame::RasterFrame;

/// Destination for rendered frames. The pipeline is single-writer: frames
/// arrive in strictly increasing index order and are never written
/// concurrently.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &RasterFrame) -> Result<()>;
}

/// Accumulates frames and streams them to the sink in fixed-size batches,
/// so peak resident frame memory is bounded by `batch_size` no matter how
/// long the video is. A sink failure aborts the pipeline; partial output is
/// not valid.
pub struct BatchEncoder<S: FrameSink> {
    sink: S,
    batch: Vec<RasterFrame>,
    batch_size: usize,
    frames_written: u64,
}

impl<S: FrameSink> BatchEncoder<S> {
    pub fn new(sink: S, batch_size: usize) -> Self {
        Self {
            sink,
            batch: Vec::new(),
            batch_size: batch_size.max(1),
            frames_written: 0,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[allow(dead_code)]
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Append the next frame (in arrival order); flushes automatically when
    /// the batch is full.
    pub fn push(&mut self, frame: RasterFrame) -> Result<()> {
        self.batch.push(frame);
        if self.batch.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Write the pending batch to the sink in order and release the buffer.
    /// Taking the Vec (rather than clearing it) drops its capacity along
    /// with the frames.
    fn flush(&mut self) -> Result<()> {
        for frame in std::mem::take(&mut self.batch) {
            self.sink.write_frame(&frame)?;
            self.frames_written += 1;
        }
        Ok(())
    }

    /// Flush any trailing partial batch and hand the sink back for
    /// finalization.
    pub fn finish(mut self) -> Result<S> {
        self.flush()?;
        Ok(self.sink)
    }
}
