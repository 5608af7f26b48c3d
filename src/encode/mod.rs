pub mod batch;
pub mod ffmpeg;
pub mod mux;
