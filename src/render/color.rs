use crate::error::{Result, VizError};

/// Renderer-native color triple.
///
/// Channels are stored in BGR order, reversed relative to the hex string's
/// R,G,B: frames stream to the encoder as `bgr24` rawvideo, so the in-memory
/// triple is exactly the wire pixel. `from_hex` reverses `#RRGGBB` into
/// `[b, g, r]`; `to_hex` reverses back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Parse `#RRGGBB` or `RRGGBB`, case-insensitive.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(VizError::InvalidColorFormat(hex.to_string()));
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);
        let (r, g, b) = (channel(0), channel(2), channel(4));
        Ok(Color([b, g, r]))
    }

    /// Normalized lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        let [b, g, r] = self.0;
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Add `amount` to every channel, saturating at 255.
    pub fn brighten(&self, amount: u8) -> Color {
        Color(self.0.map(|c| c.saturating_add(amount)))
    }

    /// Per-channel linear interpolation towards `other`; `t` in [0,1].
    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0u8; 3];
        for i in 0..3 {
            let a = self.0[i] as f32;
            let b = other.0[i] as f32;
            out[i] = (a + (b - a) * t).round() as u8;
        }
        Color(out)
    }
}
