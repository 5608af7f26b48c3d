mod audio;
mod cli;
mod config;
mod encode;
mod error;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use audio::features::AnalysisParams;
use audio::mapping::{self, FrameIndexMapper};
use cli::Cli;
use encode::batch::BatchEncoder;
use encode::ffmpeg::{is_ffmpeg_available, FfmpegEncoder};
use render::color::Color;
use render::style::Style;
use render::RenderConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect specbars.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = PathBuf::from("specbars.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("specbars").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.width == 1280 { cli.width = cfg.output.width; }
            if cli.height == 720 { cli.height = cfg.output.height; }
            if cli.fps == 25 { cli.fps = cfg.output.fps; }
            if cli.crf == 18 { cli.crf = cfg.output.crf; }
            if cli.codec == "libx264" { cli.codec = cfg.output.codec; }
            if cli.style == "classic" { cli.style = cfg.render.style; }
            if cli.bars == 64 { cli.bars = cfg.render.bars; }
            if cli.background == "#000000" { cli.background = cfg.render.background; }
            if cli.bar_color == "#00ccff" { cli.bar_color = cfg.render.bar_color; }
            if cli.highlight == "#ffffff" { cli.highlight = cfg.render.highlight; }
            if cli.batch_size == 100 { cli.batch_size = cfg.render.batch_size; }
            if cli.hop_length == 512 { cli.hop_length = cfg.analysis.hop_length; }
            if cli.fft_size == 2048 { cli.fft_size = cfg.analysis.fft_size; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    // List styles mode
    if cli.list_styles {
        println!("Available styles:");
        for style in Style::ALL {
            println!("  {:<12} {}", style.name(), style.description());
        }
        return Ok(());
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    if !is_ffmpeg_available() {
        anyhow::bail!("ffmpeg not found. Install ffmpeg and make sure it is on PATH.");
    }

    log::info!("specbars - audio spectrum bar video generator");
    log::info!("Input: {}", input.display());
    log::info!("Output: {}", cli.output.display());
    log::info!("Style: {}", cli.style);
    log::info!("Resolution: {}x{} @ {}fps, {} bars", cli.width, cli.height, cli.fps, cli.bars);

    // 1. Validate configuration before touching the audio
    let render_config = RenderConfig {
        bar_count: cli.bars,
        fps: cli.fps,
        frame_width: cli.width,
        frame_height: cli.height,
        style: cli.style.parse::<Style>()?,
        background_color: Color::from_hex(&cli.background)?,
        bar_color: Color::from_hex(&cli.bar_color)?,
        highlight_color: Color::from_hex(&cli.highlight)?,
    };
    render_config.validate()?;
    if cli.batch_size == 0 {
        anyhow::bail!("batch size must be positive");
    }
    let params = AnalysisParams {
        n_bands: cli.bars,
        hop_length: cli.hop_length,
        fft_size: cli.fft_size,
    };
    params.validate()?;
    log::info!(
        "Palette: background={} bar={} highlight={}",
        render_config.background_color.to_hex(),
        render_config.bar_color.to_hex(),
        render_config.highlight_color.to_hex()
    );

    // 2. Decode audio
    log::info!("Decoding audio...");
    let audio_data = audio::decode::decode_audio(input)?;

    let total_frames = mapping::total_frames(audio_data.duration_seconds(), cli.fps);
    if total_frames == 0 {
        anyhow::bail!(
            "Audio is too short to produce any video frames ({:.3}s at {}fps)",
            audio_data.duration_seconds(),
            cli.fps
        );
    }
    log::info!("Total frames: {}, Duration: {:.1}s", total_frames, audio_data.duration_seconds());

    // 3. Extract the feature matrix (runs to completion before rendering;
    // normalization is matrix-global)
    let matrix = audio::features::extract_features(&audio_data, &params);

    let mapper = FrameIndexMapper::new(
        cli.fps,
        cli.hop_length,
        audio_data.sample_rate,
        matrix.columns(),
    );

    // 4. Render and encode the silent video in bounded batches
    let silent_path = std::env::temp_dir().join(format!("specbars-{}.mp4", std::process::id()));
    log::info!("Rendering silent video to {}", silent_path.display());

    let result = render_and_mux(
        &cli,
        input,
        &silent_path,
        &render_config,
        &matrix,
        &mapper,
        total_frames,
    );

    // Partial output is never valid; drop the temp file on both paths.
    let _ = std::fs::remove_file(&silent_path);
    result?;

    log::info!("Done! Output: {}", cli.output.display());
    Ok(())
}

fn render_and_mux(
    cli: &Cli,
    input: &PathBuf,
    silent_path: &PathBuf,
    render_config: &RenderConfig,
    matrix: &audio::features::FeatureMatrix,
    mapper: &FrameIndexMapper,
    total_frames: usize,
) -> Result<()> {
    let sink = FfmpegEncoder::new(
        silent_path,
        cli.width,
        cli.height,
        cli.fps,
        &cli.codec,
        &cli.pix_fmt,
        cli.crf,
    )?;

    let encoder = BatchEncoder::new(sink, cli.batch_size);
    let sink = render::pipeline::run(matrix, mapper, render_config, total_frames, encoder)?;

    log::info!("Finishing encoding...");
    sink.finish()?;

    // 5. Mux the source audio into the final output
    encode::mux::mux_audio(silent_path, input, &cli.output)?;
    Ok(())
}
