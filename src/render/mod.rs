pub mod color;
pub mod frame;
pub mod pipeline;
pub mod style;

use crate::error::{Result, VizError};
use color::Color;
use style::Style;

/// Immutable per-job rendering configuration. Constructed once from the
/// CLI/config layer, validated before the pipeline starts, then passed
/// through the call chain; there is no global palette state.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub bar_count: usize,
    pub fps: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub style: Style,
    pub background_color: Color,
    pub bar_color: Color,
    pub highlight_color: Color,
}

impl RenderConfig {
    /// Reject out-of-range values before any audio is decoded or rendered.
    pub fn validate(&self) -> Result<()> {
        if self.bar_count == 0 {
            return Err(VizError::InvalidConfig("bar_count must be positive".into()));
        }
        if self.fps == 0 {
            return Err(VizError::InvalidConfig("fps must be positive".into()));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(VizError::InvalidConfig("frame dimensions must be positive".into()));
        }
        // H.264 yuv420p subsampling requires even dimensions.
        if self.frame_width % 2 != 0 || self.frame_height % 2 != 0 {
            return Err(VizError::InvalidConfig(format!(
                "frame dimensions must be even, got {}x{}",
                self.frame_width, self.frame_height
            )));
        }
        if self.frame_width as usize / self.bar_count == 0 {
            return Err(VizError::InvalidConfig(format!(
                "{} bars do not fit in a {}px wide frame",
                self.bar_count, self.frame_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RenderConfig {
        RenderConfig {
            bar_count: 64,
            fps: 25,
            frame_width: 1280,
            frame_height: 720,
            style: Style::Classic,
            background_color: Color([0, 0, 0]),
            bar_color: Color([255, 255, 255]),
            highlight_color: Color([0, 255, 255]),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn zero_bar_count_rejected() {
        let mut cfg = base();
        cfg.bar_count = 0;
        assert!(matches!(cfg.validate(), Err(VizError::InvalidConfig(_))));
    }

    #[test]
    fn zero_fps_rejected() {
        let mut cfg = base();
        cfg.fps = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn odd_dimensions_rejected() {
        let mut cfg = base();
        cfg.frame_height = 719;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn too_many_bars_rejected() {
        let mut cfg = base();
        cfg.bar_count = 4000;
        assert!(cfg.validate().is_err());
    }
}
