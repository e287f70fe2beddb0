//! Gridline and border colors.
//!
//! Colors travel through configuration as CSS-style strings and are kept as
//! RGBA components once parsed, so compositors never re-parse them per frame.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// RGBA color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Default gridline color (light gray).
    pub const GRID_LINE: Self = Self::rgb(0xD4, 0xD4, 0xD4);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a color string.
    ///
    /// Supports formats:
    /// - "#RRGGBB" (hex without alpha)
    /// - "#AARRGGBB" (alpha first)
    /// - "RRGGBB" (hex without # prefix)
    /// - "rgb(r, g, b)"
    /// - "rgba(r, g, b, a)" with `a` in 0.0..=1.0
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            parse_hex(hex)
        } else if s.starts_with("rgba(") {
            parse_rgba_string(s)
        } else if s.starts_with("rgb(") {
            parse_rgb_string(s)
        } else {
            parse_hex(s)
        }
    }

    /// `#RRGGBB` when opaque, `#AARRGGBB` otherwise.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }

    /// Alpha as 0.0..=1.0.
    pub fn alpha(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            Some(Color::rgb(r, g, b))
        }
        8 => {
            let a = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let r = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(6..8)?, 16).ok()?;
            Some(Color::rgba(r, g, b, a))
        }
        _ => None,
    }
}

fn parse_rgb_string(s: &str) -> Option<Color> {
    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let r: u8 = parts.next()?.parse().ok()?;
    let g: u8 = parts.next()?.parse().ok()?;
    let b: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Color::rgb(r, g, b))
}

fn parse_rgba_string(s: &str) -> Option<Color> {
    let inner = s.strip_prefix("rgba(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let r: u8 = parts.next()?.parse().ok()?;
    let g: u8 = parts.next()?.parse().ok()?;
    let b: u8 = parts.next()?.parse().ok()?;
    let a: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(0.0..=1.0).contains(&a) {
        return None;
    }
    Some(Color::rgba(r, g, b, alpha_to_u8(a)))
}

/// The cast is safe because the value is clamped to [0, 255] first.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_to_u8(a: f64) -> u8 {
    (a * 255.0).round().clamp(0.0, 255.0) as u8
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: {s}")))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        assert_eq!(Color::parse("#FF0000"), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_parse_hex_8_alpha_first() {
        let color = Color::parse("#80FF0000").unwrap();
        assert_eq!((color.r, color.g, color.b, color.a), (255, 0, 0, 0x80));
        assert_eq!(color.to_hex(), "#80FF0000");
    }

    #[test]
    fn test_parse_rgb_and_rgba() {
        assert_eq!(Color::parse("rgb(255, 128, 64)"), Some(Color::rgb(255, 128, 64)));
        let color = Color::parse("rgba(255, 128, 64, 0.5)").unwrap();
        assert_eq!(color.a, 128);
        assert!(Color::parse("rgba(1, 2, 3, 4)").is_none());
    }

    #[test]
    fn test_parse_without_hash() {
        assert_eq!(Color::parse("00FF00"), Some(Color::rgb(0, 255, 0)));
        assert!(Color::parse("nope").is_none());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(0x12, 0x34, 0x56)).unwrap();
        assert_eq!(json, "\"#123456\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(0x12, 0x34, 0x56));
        assert!(serde_json::from_str::<Color>("\"zz\"").is_err());
    }
}
