use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub analysis: AnalysisSection,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_crf")]
    pub crf: u32,
    #[serde(default = "default_codec")]
    pub codec: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderSection {
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_bars")]
    pub bars: usize,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_bar_color")]
    pub bar_color: String,
    #[serde(default = "default_highlight")]
    pub highlight: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisSection {
    #[serde(default = "default_hop_length")]
    pub hop_length: usize,
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            crf: default_crf(),
            codec: default_codec(),
        }
    }
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            style: default_style(),
            bars: default_bars(),
            background: default_background(),
            bar_color: default_bar_color(),
            highlight: default_highlight(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            hop_length: default_hop_length(),
            fft_size: default_fft_size(),
        }
    }
}

fn default_width() -> u32 { 1280 }
fn default_height() -> u32 { 720 }
fn default_fps() -> u32 { 25 }
fn default_crf() -> u32 { 18 }
fn default_codec() -> String { "libx264".into() }
fn default_style() -> String { "classic".into() }
fn default_bars() -> usize { 64 }
fn default_background() -> String { "#000000".into() }
fn default_bar_color() -> String { "#00ccff".into() }
fn default_highlight() -> String { "#ffffff".into() }
fn default_batch_size() -> usize { 100 }
fn default_hop_length() -> usize { 512 }
fn default_fft_size() -> usize { 2048 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.output.fps, 25);
        assert_eq!(cfg.render.bars, 64);
        assert_eq!(cfg.render.style, "classic");
        assert_eq!(cfg.analysis.hop_length, 512);
    }

    #[test]
    fn partial_sections_fill_in() {
        let cfg: Config = toml::from_str(
            "[render]\nstyle = \"neon\"\nbars = 32\n\n[output]\nfps = 60\n",
        )
        .unwrap();
        assert_eq!(cfg.render.style, "neon");
        assert_eq!(cfg.render.bars, 32);
        assert_eq!(cfg.render.batch_size, 100);
        assert_eq!(cfg.output.fps, 60);
        assert_eq!(cfg.output.width, 1280);
    }
}
