use std::fmt;
use std::str::FromStr;

/// Error returned when a theme color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("color {0:?} must start with '#'")]
    MissingHash(String),
    #[error("color {0:?} must have 3, 6 or 8 hex digits")]
    BadLength(String),
    #[error("color {0:?} contains a non-hex digit")]
    BadDigit(String),
}

/// Premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are multiplied by `a` (premultiplied alpha).
///
/// Channels hold sRGB-encoded values, which is what the rasterizer blends in
/// (the same space a 2D canvas composites in).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;

        if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(s.to_string()));
        }

        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);
        let nibble = |i: usize| {
            let v = u8::from_str_radix(&digits[i..i + 1], 16).unwrap_or(0);
            v * 17
        };

        match digits.len() {
            3 => Ok(Self::from_srgb_u8(nibble(0), nibble(1), nibble(2), 255)),
            6 => Ok(Self::from_srgb_u8(byte(0), byte(2), byte(4), 255)),
            8 => Ok(Self::from_srgb_u8(byte(0), byte(2), byte(4), byte(6))),
            _ => Err(ColorParseError::BadLength(s.to_string())),
        }
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Scales every channel by `coverage`; stays premultiplied.
    #[inline]
    pub fn with_coverage(self, coverage: f32) -> Self {
        let k = coverage.clamp(0.0, 1.0);
        Self { r: self.r * k, g: self.g * k, b: self.b * k, a: self.a * k }
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    /// Formats as straight-alpha `#rrggbb` (or `#rrggbbaa` when translucent).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, a) = self.to_straight();
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", q(r), q(g), q(b))
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", q(r), q(g), q(b), q(a))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── from_hex ──────────────────────────────────────────────────────────

    #[test]
    fn parses_six_digit_hex() {
        let c = Color::from_hex("#c0392b").unwrap();
        assert_eq!(c.to_string(), "#c0392b");
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn parses_short_hex() {
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::from_srgb_u8(255, 255, 255, 255));
    }

    #[test]
    fn eight_digit_hex_is_premultiplied() {
        let c = Color::from_hex("#ff000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
        assert!((c.r - c.a).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!(matches!(Color::from_hex("222222"), Err(ColorParseError::MissingHash(_))));
        assert!(matches!(Color::from_hex("#12345"), Err(ColorParseError::BadLength(_))));
        assert!(matches!(Color::from_hex("#zzzzzz"), Err(ColorParseError::BadDigit(_))));
    }

    #[test]
    fn from_str_delegates_to_hex() {
        let c: Color = "#222222".parse().unwrap();
        assert_eq!(c, Color::from_srgb_u8(0x22, 0x22, 0x22, 255));
    }

    // ── with_coverage ─────────────────────────────────────────────────────

    #[test]
    fn coverage_scales_all_channels() {
        let c = Color::from_srgb_u8(255, 255, 255, 255).with_coverage(0.25);
        assert_eq!(c, Color::from_premul(0.25, 0.25, 0.25, 0.25));
    }
}
