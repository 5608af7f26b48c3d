use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use super::style;
use super::RenderConfig;
use crate::audio::features::FeatureMatrix;
use crate::audio::mapping::FrameIndexMapper;
use crate::encode::batch::{BatchEncoder, FrameSink};
use crate::error::Result;

/// Drive the render loop: for each batch-sized chunk of frame indices,
/// render the frames in parallel and hand them to the encoder in index
/// order.
///
/// Rendering a frame is a pure function of its feature column and index, so
/// the chunk is fanned out across the rayon pool; the ordered collect keeps
/// the single-writer sink sequential. Extraction has already completed (the
/// matrix normalization is global), so the matrix is only read here.
pub fn run<S: FrameSink>(
    matrix: &FeatureMatrix,
    mapper: &FrameIndexMapper,
    config: &RenderConfig,
    total_frames: usize,
    mut encoder: BatchEncoder<S>,
) -> Result<S> {
    let pb = ProgressBar::new(total_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    let chunk = encoder.batch_size();
    let mut start = 0;
    while start < total_frames {
        let end = (start + chunk).min(total_frames);

        let frames = (start..end)
            .into_par_iter()
            .map(|i| style::render(matrix.column(mapper.column_for(i)), config, i))
            .collect::<Result<Vec<_>>>()?;

        for frame in frames {
            encoder.push(frame)?;
        }

        pb.set_position(end as u64);
        start = end;
    }

    pb.finish_with_message("Rendering complete");
    encoder.finish()
}
