//! Approximate text metrics.
//!
//! No font is embedded, so widths come from per-character advance estimates for a generic
//! sans-serif face. Good enough for margins and legend boxes.

use crate::style::Font;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

fn advance(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '!' | '|' | '\'' | 'I' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | ' ' | '-' | '/' => 0.36,
        'm' | 'w' | 'M' | 'W' => 0.86,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii_digit() => 0.56,
        // subscripts, superscripts
        '\u{2070}'..='\u{209F}' | '\u{00B2}' | '\u{00B3}' | '\u{00B9}' => 0.36,
        _ => 0.54,
    }
}

/// Estimate the extent of `text` set in `font`, in points.
pub fn measure_text(text: &str, font: Font) -> TextMetrics {
    let em: f64 = text.chars().map(advance).sum();
    let bold = if font.bold { 1.06 } else { 1.0 };
    TextMetrics { width: em * font.size * bold, height: font.size * 1.2, ascent: font.size * 0.93 }
}
