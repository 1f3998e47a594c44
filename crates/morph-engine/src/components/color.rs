use bytemuck::{Pod, Zeroable};
use crate::api::error::{MorphError, Result};

/// Linear RGB color written per instance.
/// Channels may exceed 1.0: over-bright values feed the bloom pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const FLOATS: usize = 3;

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MorphError::InvalidColor(hex.to_string()));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| MorphError::InvalidColor(hex.to_string()))?;
        let channel = |shift: u32| ((value >> shift) & 0xFF) as f32 / 255.0;
        Ok(Self::new(channel(16), channel(8), channel(0)))
    }

    /// Add the same amount to every channel (no clamping).
    pub fn add_scalar(self, s: f32) -> Self {
        Self::new(self.r + s, self.g + s, self.b + s)
    }

    /// Multiply every channel by `s` (no clamping).
    pub fn scaled(self, s: f32) -> Self {
        Self::new(self.r * s, self.g * s, self.b * s)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Parse a whole palette of hex strings.
pub fn parse_palette<S: AsRef<str>>(hexes: &[S]) -> Result<Vec<Color>> {
    hexes.iter().map(|h| Color::from_hex(h.as_ref())).collect()
}

/// Named colors of the scene.
pub mod named {
    pub const SILVER: &str = "#C0C0C0";
    pub const BARBIE_PINK: &str = "#FF007F";
    pub const PINE_GREEN: &str = "#01796F";
    pub const CYBER_BLUE: &str = "#00F0FF";
    pub const DEEP_PURPLE: &str = "#240046";
}
