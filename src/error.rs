/// Result alias carrying the pipeline error type.
pub type Result<T> = std::result::Result<T, VizError>;

/// Errors surfaced by the rendering/encoding pipeline.
///
/// Configuration problems (`InvalidColorFormat`, `UnknownStyle`,
/// `DimensionMismatch`, `InvalidConfig`) are detected before or at the first
/// frame and abort the job. Sink and mux failures abort and leave any partial
/// output file for the caller to discard.
#[derive(Debug, thiserror::Error)]
pub enum VizError {
    #[error("invalid color format {0:?}: expected #RRGGBB or RRGGBB")]
    InvalidColorFormat(String),

    #[error("unknown style {0:?}")]
    UnknownStyle(String),

    #[error("feature column has {got} values but bar_count is {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("failed to write frames to encoder sink: {0}")]
    SinkWriteFailure(String),

    #[error("muxing video and audio failed: {0}")]
    MuxFailure(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
