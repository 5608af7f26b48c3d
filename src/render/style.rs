use std::str::FromStr;

use super::color::Color;
use super::frame::RasterFrame;
use super::RenderConfig;
use crate::error::{Result, VizError};

/// Cap on the rounded-style corner radius, in pixels.
const ROUNDED_RADIUS_CAP: f32 = 8.0;
/// Pulse animation period in seconds.
const PULSE_PERIOD: f32 = 2.0;
/// Fraction of the frame height a full-value bar may reach.
const MAX_BAR_FRACTION: f32 = 0.9;
/// Fraction of the frame height reserved below the baseline.
const BOTTOM_MARGIN_FRACTION: f32 = 0.05;

/// The closed set of bar-drawing strategies. Every variant is a pure
/// geometry/color decision over one bar's slot; dispatch is a single match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    Classic,
    Rounded,
    Dots,
    Spikes,
    Symmetric,
    Waterfall,
    Pulse,
    Neon,
}

impl Style {
    pub const ALL: [Style; 8] = [
        Style::Classic,
        Style::Rounded,
        Style::Dots,
        Style::Spikes,
        Style::Symmetric,
        Style::Waterfall,
        Style::Pulse,
        Style::Neon,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Style::Classic => "classic",
            Style::Rounded => "rounded",
            Style::Dots => "dots",
            Style::Spikes => "spikes",
            Style::Symmetric => "symmetric",
            Style::Waterfall => "waterfall",
            Style::Pulse => "pulse",
            Style::Neon => "neon",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Style::Classic => "Filled rectangles",
            Style::Rounded => "Rectangles with rounded corners",
            Style::Dots => "Stacked circles",
            Style::Spikes => "Upward-pointing triangles",
            Style::Symmetric => "Bars mirrored around the center line",
            Style::Waterfall => "Vertical gradient from bar color to highlight",
            Style::Pulse => "Rectangles with a time-driven pulse",
            Style::Neon => "Bars with a nested glow outline",
        }
    }
}

impl FromStr for Style {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "classic" | "1" => Ok(Style::Classic),
            "rounded" | "2" => Ok(Style::Rounded),
            "dots" | "3" => Ok(Style::Dots),
            "spikes" | "4" => Ok(Style::Spikes),
            "symmetric" | "5" => Ok(Style::Symmetric),
            "waterfall" | "6" => Ok(Style::Waterfall),
            "pulse" | "7" => Ok(Style::Pulse),
            "neon" | "8" => Ok(Style::Neon),
            _ => Err(VizError::UnknownStyle(s.to_string())),
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Horizontal slot partition and vertical extents shared by every style.
struct BarLayout {
    slot: f32,
    gap: f32,
    baseline: i64,
    max_bar_height: f32,
}

impl BarLayout {
    fn new(config: &RenderConfig) -> Self {
        let slot = config.frame_width as f32 / config.bar_count as f32;
        let gap = (slot * 0.15).max(1.0);
        let baseline = (config.frame_height as f32 * (1.0 - BOTTOM_MARGIN_FRACTION)) as i64;
        let max_bar_height = config.frame_height as f32 * MAX_BAR_FRACTION;
        Self { slot, gap, baseline, max_bar_height }
    }

    /// Horizontal span `[x0, x1)` for bar `i`, at least one pixel wide.
    fn span(&self, i: usize) -> (i64, i64) {
        let x0 = (i as f32 * self.slot + self.gap / 2.0).round() as i64;
        let x1 = ((i + 1) as f32 * self.slot - self.gap / 2.0).round() as i64;
        (x0, x1.max(x0 + 1))
    }
}

/// Render one raster frame from a feature column.
///
/// Deterministic: identical inputs produce byte-identical frames. The
/// `frame_index`/fps pair only drives time-based styles (pulse).
pub fn render(column: &[f32], config: &RenderConfig, frame_index: usize) -> Result<RasterFrame> {
    if column.len() != config.bar_count {
        return Err(VizError::DimensionMismatch {
            expected: config.bar_count,
            got: column.len(),
        });
    }

    let mut frame = RasterFrame::filled(
        config.frame_width,
        config.frame_height,
        config.background_color,
    );
    let layout = BarLayout::new(config);

    for (i, &value) in column.iter().enumerate() {
        let (x0, x1) = layout.span(i);
        let bar_h = (value.clamp(0.0, 1.0) * layout.max_bar_height).round() as i64;
        if bar_h == 0 {
            continue;
        }
        let y_base = layout.baseline;
        let y_top = y_base - bar_h;

        match config.style {
            Style::Classic => {
                frame.fill_rect(x0, y_top, x1, y_base, config.bar_color);
            }
            Style::Rounded => {
                draw_rounded(&mut frame, x0, x1, y_top, y_base, config.bar_color);
            }
            Style::Dots => {
                draw_dots(&mut frame, x0, x1, bar_h, y_base, config.bar_color);
            }
            Style::Spikes => {
                draw_spike(&mut frame, x0, x1, y_top, y_base, config.bar_color);
            }
            Style::Symmetric => {
                let center = config.frame_height as i64 / 2;
                let half = bar_h / 2;
                frame.fill_rect(x0, center - half, x1, center + half, config.bar_color);
            }
            Style::Waterfall => {
                draw_waterfall(&mut frame, x0, x1, y_top, y_base, config);
            }
            Style::Pulse => {
                let adjusted = (bar_h as f32 * pulse_factor(frame_index, config.fps)).round() as i64;
                frame.fill_rect(x0, y_base - adjusted, x1, y_base, config.bar_color);
            }
            Style::Neon => {
                draw_neon(&mut frame, x0, x1, y_top, y_base, config);
            }
        }
    }

    Ok(frame)
}

/// Time-driven modulation for the pulse style: 0.8..1.2 over a 2 s cycle,
/// phased on frame timing, never on the feature value.
fn pulse_factor(frame_index: usize, fps: u32) -> f32 {
    let t = frame_index as f32 / fps as f32;
    let phase = (t % PULSE_PERIOD) / PULSE_PERIOD;
    0.8 + 0.4 * (2.0 * std::f32::consts::PI * phase).sin()
}

/// Rounded rectangle via a per-row corner inset from the circle equation;
/// cap rows and body rows share spans, so the join has no gaps.
fn draw_rounded(frame: &mut RasterFrame, x0: i64, x1: i64, y_top: i64, y_base: i64, color: Color) {
    let w = (x1 - x0) as f32;
    let h = (y_base - y_top) as f32;
    let r = (w / 4.0).min(ROUNDED_RADIUS_CAP).min(h / 2.0);
    let top_center = y_top as f32 + r;
    let bottom_center = y_base as f32 - r;

    for y in y_top..y_base {
        let fy = y as f32 + 0.5;
        let dy = if fy < top_center {
            top_center - fy
        } else if fy > bottom_center {
            fy - bottom_center
        } else {
            0.0
        };
        let inset = (r - (r * r - dy * dy).max(0.0).sqrt()).round() as i64;
        frame.fill_span(y, x0 + inset, x1 - inset, color);
    }
}

/// Stack of filled circles from the baseline upward; diameter is the bar
/// width, count proportional to the bar height.
fn draw_dots(frame: &mut RasterFrame, x0: i64, x1: i64, bar_h: i64, y_base: i64, color: Color) {
    let diameter = (x1 - x0) as f32;
    let radius = diameter / 2.0;
    let count = (bar_h as f32 / diameter).floor() as i64;
    let cx = (x0 + x1) as f32 / 2.0;
    for k in 0..count {
        let cy = y_base as f32 - radius - k as f32 * diameter;
        frame.fill_circle(cx, cy, radius, color);
    }
}

/// Upward triangle: apex at the bar height, base spanning the slot.
fn draw_spike(frame: &mut RasterFrame, x0: i64, x1: i64, y_top: i64, y_base: i64, color: Color) {
    let h = (y_base - y_top) as f32;
    let half_base = (x1 - x0) as f32 / 2.0;
    let cx = (x0 + x1) as f32 / 2.0;
    for y in y_top..y_base {
        // 0 at apex row, 1 at base row
        let t = (y - y_top) as f32 / h.max(1.0);
        let half = half_base * t;
        let left = (cx - half).round() as i64;
        let right = ((cx + half).round() as i64).max(left + 1);
        frame.fill_span(y, left, right, color);
    }
}

/// Per-row gradient from bar_color at the base to highlight_color at the top.
fn draw_waterfall(
    frame: &mut RasterFrame,
    x0: i64,
    x1: i64,
    y_top: i64,
    y_base: i64,
    config: &RenderConfig,
) {
    let rows = (y_base - y_top).max(1);
    for y in y_top..y_base {
        let t = (y_base - 1 - y) as f32 / (rows - 1).max(1) as f32;
        let color = config.bar_color.lerp(&config.highlight_color, t);
        frame.fill_span(y, x0, x1, color);
    }
}

/// Inset fill plus two nested outlines simulating a glow halo: the outer at
/// full highlight intensity (stroke 2), the inner brightened (stroke 1).
fn draw_neon(
    frame: &mut RasterFrame,
    x0: i64,
    x1: i64,
    y_top: i64,
    y_base: i64,
    config: &RenderConfig,
) {
    frame.fill_rect(x0 + 2, y_top + 2, x1 - 2, y_base - 2, config.bar_color);
    frame.rect_outline(x0, y_top, x1, y_base, 1, config.highlight_color.brighten(50));
    frame.rect_outline(x0 - 2, y_top - 2, x1 + 2, y_base + 2, 2, config.highlight_color);
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Color = Color([0, 0, 0]);
    const BAR: Color = Color([255, 255, 255]);
    const GLOW: Color = Color([0, 200, 255]);

    fn config(style: Style) -> RenderConfig {
        RenderConfig {
            bar_count: 4,
            fps: 25,
            frame_width: 64,
            frame_height: 64,
            style,
            background_color: BG,
            bar_color: BAR,
            highlight_color: GLOW,
        }
    }

    #[test]
    fn parses_names_and_ids() {
        assert_eq!("classic".parse::<Style>().unwrap(), Style::Classic);
        assert_eq!("NEON".parse::<Style>().unwrap(), Style::Neon);
        assert_eq!("7".parse::<Style>().unwrap(), Style::Pulse);
    }

    #[test]
    fn unknown_style_is_rejected() {
        assert!(matches!(
            "plasma".parse::<Style>(),
            Err(VizError::UnknownStyle(_))
        ));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let cfg = config(Style::Classic);
        let err = render(&[0.5; 3], &cfg, 0).unwrap_err();
        assert!(matches!(err, VizError::DimensionMismatch { expected: 4, got: 3 }));
    }

    #[test]
    fn every_style_renders_deterministically() {
        let column = [0.9, 0.4, 0.0, 0.7];
        for style in Style::ALL {
            let cfg = config(style);
            let a = render(&column, &cfg, 13).unwrap();
            let b = render(&column, &cfg, 13).unwrap();
            assert_eq!(a.as_bytes(), b.as_bytes(), "style {}", style);
        }
    }

    #[test]
    fn zero_column_leaves_background_untouched() {
        for style in Style::ALL {
            let cfg = config(style);
            let frame = render(&[0.0; 4], &cfg, 0).unwrap();
            for y in 0..64 {
                for x in 0..64 {
                    assert_eq!(frame.pixel(x, y), BG, "style {} at ({},{})", style, x, y);
                }
            }
        }
    }

    #[test]
    fn classic_fills_only_the_active_slot() {
        let cfg = config(Style::Classic);
        let frame = render(&[0.0, 1.0, 0.0, 0.0], &cfg, 0).unwrap();

        // Slot 1 covers x in [16,32); its interior holds bar pixels.
        let mut bar_pixels = 0;
        for y in 0..64 {
            for x in 0..64 {
                let p = frame.pixel(x, y);
                if p == BAR {
                    assert!((16..32).contains(&x), "bar pixel outside slot at ({},{})", x, y);
                    bar_pixels += 1;
                } else {
                    assert_eq!(p, BG);
                }
            }
        }
        assert!(bar_pixels > 0);
    }

    #[test]
    fn pulse_factor_matches_contract() {
        // t = 0: sin(0) = 0
        assert!((pulse_factor(0, 25) - 0.8).abs() < 1e-6);
        // t = 0.5s (quarter period): sin(pi/2) = 1
        assert!((pulse_factor(12, 24) - 1.2).abs() < 1e-5);
    }

    #[test]
    fn pulse_modulates_height_over_time() {
        let cfg = config(Style::Pulse);
        let column = [1.0, 0.0, 0.0, 0.0];
        let at_min = render(&column, &cfg, 0).unwrap();
        let at_max = render(&column, &cfg, 12).unwrap(); // t ~= 0.48s

        let bar_rows = |frame: &RasterFrame| {
            (0..64).filter(|&y| frame.pixel(8, y) == BAR).count()
        };
        assert!(bar_rows(&at_max) > bar_rows(&at_min));
    }

    #[test]
    fn symmetric_mirrors_around_center() {
        let cfg = config(Style::Symmetric);
        let frame = render(&[0.8, 0.3, 0.6, 0.1], &cfg, 0).unwrap();
        let center = 32i64;
        for y in 0..32u32 {
            let mirrored = (2 * center - 1 - y as i64) as u32;
            for x in 0..64 {
                assert_eq!(
                    frame.pixel(x, y),
                    frame.pixel(x, mirrored),
                    "asymmetry at ({},{})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn waterfall_grades_from_bar_color_to_highlight() {
        let cfg = config(Style::Waterfall);
        let frame = render(&[1.0, 0.0, 0.0, 0.0], &cfg, 0).unwrap();

        // Baseline sits at 95% of height; the bottom bar row is bar_color.
        let y_base = (64.0f32 * 0.95) as u32;
        assert_eq!(frame.pixel(4, y_base - 1), BAR);
        // The top row of a full bar is exactly the highlight.
        let bar_h = (64.0f32 * 0.9).round() as u32;
        assert_eq!(frame.pixel(4, y_base - bar_h), GLOW);
    }

    #[test]
    fn neon_outlines_surround_the_fill() {
        let mut cfg = config(Style::Neon);
        cfg.bar_count = 2;
        let frame = render(&[1.0, 0.0], &cfg, 0).unwrap();

        let y_base = (64.0 * 0.95) as i64;
        let bar_h = (64.0 * 0.9) as i64;
        let y_top = y_base - bar_h;
        // Slot 0 spans [2, 30) after the gap; fill is inset by 2.
        assert_eq!(frame.pixel(6, (y_top + 6) as u32), BAR);
        // Inner 1px outline on the bar rect, brightened.
        assert_eq!(frame.pixel(2, (y_top + 10) as u32), GLOW.brighten(50));
        // Outer 2px outline expanded beyond the bar rect.
        assert_eq!(frame.pixel(0, (y_top + 10) as u32), GLOW);
    }

    #[test]
    fn dots_paint_circle_centers() {
        let cfg = config(Style::Dots);
        let frame = render(&[1.0, 0.0, 0.0, 0.0], &cfg, 0).unwrap();
        let y_base = (64.0 * 0.95) as f32;
        // First dot center: one radius above the baseline, slot center x=9.
        let cy = (y_base - 6.0) as u32;
        assert_eq!(frame.pixel(9, cy), BAR);
    }
}
