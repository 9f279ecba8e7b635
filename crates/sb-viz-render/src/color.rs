use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Like [`Color::parse_hex`], black on malformed input.
    pub fn hex(s: &str) -> Self {
        Self::parse_hex(s).unwrap_or_default()
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{s}'")))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

/// Stack colours of the standard background processes, keyed by process label.
pub const PROCESS_COLORS: &[(&str, Color)] = &[
    ("Singletop", Color::rgb(54, 121, 191)),
    ("ttbar", Color::rgb(123, 178, 116)),
    ("Wjets", Color::rgb(130, 95, 135)),
    ("Zjets", Color::rgb(252, 176, 8)),
    ("Diboson", Color::rgb(168, 164, 150)),
];

/// Fallback colours for processes without an assigned colour.
pub const FALLBACK_PALETTE: &[&str] = &[
    "#4C78A8", "#F58518", "#54A24B", "#E45756", "#72B7B2", "#EECA3B", "#B279A2", "#FF9DA6",
    "#9D755D", "#BAB0AC",
];

pub fn fallback_color(index: usize) -> Color {
    Color::hex(FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::hex("#7BB274");
        assert_eq!((c.r, c.g, c.b), (123, 178, 116));
        assert!((c.a - 1.0).abs() < 1e-9);
        assert_eq!(Color::parse_hex("#12"), None);
        assert_eq!(Color::parse_hex("zzzzzz"), None);
    }

    #[test]
    fn svg_fill() {
        assert_eq!(Color::rgb(54, 121, 191).to_svg_fill(), "#3679bf");
        assert_eq!(Color::rgb(0, 0, 0).with_alpha(0.5).to_svg_fill(), "rgba(0,0,0,0.500)");
    }

    #[test]
    fn fallback_wraps() {
        assert_eq!(fallback_color(0), fallback_color(FALLBACK_PALETTE.len()));
    }
}
