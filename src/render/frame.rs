use super::color::Color;

/// Fixed-size 3-channel pixel buffer in the renderer-native (BGR) order.
///
/// Owned exclusively by the rendering call that produced it until handed to
/// the batch encoder; all drawing primitives clip against the frame bounds.
#[derive(Debug)]
pub struct RasterFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterFrame {
    pub fn filled(width: u32, height: u32, background: Color) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        for px in pixels.chunks_exact_mut(3) {
            px.copy_from_slice(&background.0);
        }
        Self { width, height, pixels }
    }

    #[allow(dead_code)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[allow(dead_code)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes, row-major, ready to pipe to the encoder.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    #[allow(dead_code)]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Color([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Fill one horizontal span on row `y`, clipped to the frame. `x1` is
    /// exclusive.
    pub fn fill_span(&mut self, y: i64, x0: i64, x1: i64, color: Color) {
        if y < 0 || y >= self.height as i64 {
            return;
        }
        let x0 = x0.max(0) as usize;
        let x1 = x1.min(self.width as i64).max(0) as usize;
        if x0 >= x1 {
            return;
        }
        let row = y as usize * self.width as usize;
        for px in self.pixels[(row + x0) * 3..(row + x1) * 3].chunks_exact_mut(3) {
            px.copy_from_slice(&color.0);
        }
    }

    /// Fill the half-open rectangle [x0, x1) x [y0, y1).
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
        for y in y0.max(0)..y1.min(self.height as i64) {
            self.fill_span(y, x0, x1, color);
        }
    }

    /// Stroke the rectangle border inward by `stroke` pixels.
    pub fn rect_outline(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, stroke: i64, color: Color) {
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let s = stroke.min(x1 - x0).min(y1 - y0);
        self.fill_rect(x0, y0, x1, y0 + s, color);
        self.fill_rect(x0, y1 - s, x1, y1, color);
        self.fill_rect(x0, y0, x0 + s, y1, color);
        self.fill_rect(x1 - s, y0, x1, y1, color);
    }

    /// Filled circle via per-row spans.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let top = (cy - radius).floor() as i64;
        let bottom = (cy + radius).ceil() as i64;
        for y in top..=bottom {
            let dy = y as f32 + 0.5 - cy;
            let d2 = radius * radius - dy * dy;
            if d2 <= 0.0 {
                continue;
            }
            let half = d2.sqrt();
            self.fill_span(y, (cx - half).round() as i64, (cx + half).round() as i64, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Color = Color([1, 2, 3]);
    const FG: Color = Color([200, 100, 50]);

    #[test]
    fn filled_frame_is_uniform_background() {
        let frame = RasterFrame::filled(4, 2, BG);
        assert_eq!(frame.as_bytes().len(), 4 * 2 * 3);
        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(frame.pixel(x, y), BG);
            }
        }
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut frame = RasterFrame::filled(8, 8, BG);
        frame.fill_rect(-5, -5, 3, 3, FG);
        assert_eq!(frame.pixel(0, 0), FG);
        assert_eq!(frame.pixel(2, 2), FG);
        assert_eq!(frame.pixel(3, 3), BG);
    }

    #[test]
    fn fill_rect_right_edge_is_exclusive() {
        let mut frame = RasterFrame::filled(8, 8, BG);
        frame.fill_rect(2, 2, 4, 4, FG);
        assert_eq!(frame.pixel(3, 3), FG);
        assert_eq!(frame.pixel(4, 3), BG);
        assert_eq!(frame.pixel(3, 4), BG);
    }

    #[test]
    fn outline_leaves_interior_untouched() {
        let mut frame = RasterFrame::filled(10, 10, BG);
        frame.rect_outline(1, 1, 9, 9, 2, FG);
        assert_eq!(frame.pixel(1, 1), FG);
        assert_eq!(frame.pixel(2, 2), FG);
        assert_eq!(frame.pixel(5, 5), BG);
        assert_eq!(frame.pixel(8, 8), FG);
    }

    #[test]
    fn circle_stays_within_radius() {
        let mut frame = RasterFrame::filled(20, 20, BG);
        frame.fill_circle(10.0, 10.0, 4.0, FG);
        assert_eq!(frame.pixel(10, 10), FG);
        // Corner of the bounding box is outside the disc.
        assert_eq!(frame.pixel(6, 6), BG);
        assert_eq!(frame.pixel(15, 10), BG);
    }
}
