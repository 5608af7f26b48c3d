use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "specbars", about = "Audio spectrum bar video generator")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG, AAC)
    pub input: Option<PathBuf>,

    /// Output video file
    #[arg(short, long, default_value = "output.mp4")]
    pub output: PathBuf,

    /// Bar style (classic, rounded, dots, spikes, symmetric, waterfall, pulse, neon)
    #[arg(short, long, default_value = "classic")]
    pub style: String,

    /// Video width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Video height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Frames per second
    #[arg(long, default_value_t = 25)]
    pub fps: u32,

    /// Number of spectrum bars (= mel bands)
    #[arg(long, default_value_t = 64)]
    pub bars: usize,

    /// Background color (hex, #RRGGBB)
    #[arg(long, default_value = "#000000")]
    pub background: String,

    /// Bar color (hex, #RRGGBB)
    #[arg(long, default_value = "#00ccff")]
    pub bar_color: String,

    /// Highlight color for gradient/glow styles (hex, #RRGGBB)
    #[arg(long, default_value = "#ffffff")]
    pub highlight: String,

    /// Frames per encoder batch (bounds peak frame memory)
    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    /// Analysis hop length in samples
    #[arg(long, default_value_t = 512)]
    pub hop_length: usize,

    /// FFT window size in samples
    #[arg(long, default_value_t = 2048)]
    pub fft_size: usize,

    /// H.264 CRF quality (0-51, lower = better)
    #[arg(long, default_value_t = 18)]
    pub crf: u32,

    /// FFmpeg video codec
    #[arg(long, default_value = "libx264")]
    pub codec: String,

    /// FFmpeg pixel format
    #[arg(long, default_value = "yuv420p")]
    pub pix_fmt: String,

    /// List available styles and exit
    #[arg(long)]
    pub list_styles: bool,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}
