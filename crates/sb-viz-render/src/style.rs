//! Paint styles for canvas elements, each able to write its own SVG attributes.

use std::fmt::{self, Write};

use crate::color::Color;

const INK: Color = Color::rgb(0, 0, 0);

/// Fill and optional outline of a closed shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub fill: Option<Color>,
    /// Outline colour and width.
    pub outline: Option<(Color, f64)>,
}

impl Paint {
    pub const NONE: Paint = Paint { fill: None, outline: None };

    pub const fn fill(color: Color) -> Self {
        Self { fill: Some(color), outline: None }
    }

    pub const fn outline(color: Color, width: f64) -> Self {
        Self { fill: None, outline: Some((color, width)) }
    }

    /// Filled and outlined in one colour, so adjacent stack segments leave no seams.
    pub const fn solid(color: Color, width: f64) -> Self {
        Self { fill: Some(color), outline: Some((color, width)) }
    }

    pub(crate) fn write_attrs(&self, out: &mut String) -> fmt::Result {
        match self.fill {
            Some(fill) => write!(out, r#" fill="{fill}""#)?,
            None => out.push_str(r#" fill="none""#),
        }
        if let Some((color, width)) = self.outline {
            write!(out, r#" stroke="{color}" stroke-width="{width:.2}""#)?;
        }
        Ok(())
    }
}

/// A stroked line; dashed lines use a fixed 6-on 3-off pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub dashed: bool,
}

impl Stroke {
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width, dashed: false }
    }

    pub const fn dashed(self) -> Self {
        Self { dashed: true, ..self }
    }

    pub(crate) fn write_attrs(&self, out: &mut String) -> fmt::Result {
        write!(out, r#" stroke="{}" stroke-width="{:.2}""#, self.color, self.width)?;
        if self.dashed {
            out.push_str(r#" stroke-dasharray="6 3""#);
        }
        Ok(())
    }
}

/// Horizontal alignment of text relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Start,
    Middle,
    End,
}

/// Vertical alignment of text relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Baseline,
    Center,
    Top,
}

/// Font and placement of a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f64,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
    pub valign: VAlign,
}

impl Default for Font {
    fn default() -> Self {
        Self::sized(10.0)
    }
}

impl Font {
    pub const fn sized(size: f64) -> Self {
        Self {
            size,
            color: INK,
            bold: false,
            italic: false,
            align: Align::Start,
            valign: VAlign::Baseline,
        }
    }

    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub const fn italic(self) -> Self {
        Self { italic: true, ..self }
    }

    pub const fn aligned(self, align: Align, valign: VAlign) -> Self {
        Self { align, valign, ..self }
    }

    pub(crate) fn write_attrs(&self, out: &mut String) -> fmt::Result {
        out.push_str(r#" font-family="Helvetica, Arial, sans-serif""#);
        write!(out, r#" font-size="{:.1}" fill="{}""#, self.size, self.color)?;
        let anchor = match self.align {
            Align::Start => "start",
            Align::Middle => "middle",
            Align::End => "end",
        };
        let baseline = match self.valign {
            VAlign::Baseline => "auto",
            VAlign::Center => "central",
            VAlign::Top => "hanging",
        };
        write!(out, r#" text-anchor="{anchor}" dominant-baseline="{baseline}""#)?;
        if self.bold {
            out.push_str(r#" font-weight="bold""#);
        }
        if self.italic {
            out.push_str(r#" font-style="italic""#);
        }
        Ok(())
    }
}
