use std::fmt::{self, Write as FmtWrite};

use crate::color::Color;
use crate::style::{Font, Paint, Stroke};
use crate::text::{TextMetrics, measure_text};

#[derive(Debug, Clone)]
enum SvgElement {
    Rect { x: f64, y: f64, w: f64, h: f64, paint: Paint },
    PatternRect { x: f64, y: f64, w: f64, h: f64, pattern_id: String },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke },
    Text { x: f64, y: f64, content: String, font: Font, rotate: Option<f64> },
    Circle { cx: f64, cy: f64, r: f64, paint: Paint },
}

/// Immediate-mode SVG canvas. Coordinates in points (1pt = 1/72").
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    /// Elements with the clip path active when they were drawn.
    elements: Vec<(Option<String>, SvgElement)>,
    defs: Vec<String>,
    patterns: Vec<String>,
    clip_stack: Vec<String>,
    next_clip_id: usize,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> crate::Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(crate::RenderError::Layout(format!("invalid canvas size {width}x{height}")));
        }
        Ok(Self {
            width,
            height,
            elements: Vec::new(),
            defs: Vec::new(),
            patterns: Vec::new(),
            clip_stack: Vec::new(),
            next_clip_id: 0,
        })
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: Paint) {
        self.push(SvgElement::Rect { x, y, w, h, paint });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) {
        self.push(SvgElement::Line { x1, y1, x2, y2, stroke });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, font: Font) {
        self.push(SvgElement::Text { x, y, content: content.to_string(), font, rotate: None });
    }

    /// Text rotated by `angle` degrees about its anchor point.
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, font: Font, angle: f64) {
        let content = content.to_string();
        self.push(SvgElement::Text { x, y, content, font, rotate: Some(angle) });
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, paint: Paint) {
        self.push(SvgElement::Circle { cx, cy, r, paint });
    }

    /// Vertical error bar with optional caps.
    pub fn error_bar(&mut self, x: f64, y_lo: f64, y_hi: f64, cap_width: f64, stroke: Stroke) {
        self.line(x, y_lo, x, y_hi, stroke);
        if cap_width > 0.0 {
            let half = cap_width / 2.0;
            self.line(x - half, y_lo, x + half, y_lo, stroke);
            self.line(x - half, y_hi, x + half, y_hi, stroke);
        }
    }

    /// Filled data-point marker of radius `r`.
    pub fn marker(&mut self, x: f64, y: f64, r: f64, color: Color) {
        self.circle(x, y, r, Paint::solid(color, 0.5));
    }

    /// Define a diagonal hatch pattern once; later calls with the same id are no-ops.
    pub fn define_hatch(&mut self, pattern_id: &str, color: Color, spacing: f64) {
        if self.patterns.iter().any(|p| p == pattern_id) {
            return;
        }
        self.patterns.push(pattern_id.to_string());
        self.defs.push(format!(
            r#"<pattern id="{pattern_id}" patternUnits="userSpaceOnUse" width="{spacing}" height="{spacing}" patternTransform="rotate(45)"><line x1="0" y1="0" x2="0" y2="{spacing}" stroke="{c}" stroke-width="0.8"/></pattern>"#,
            c = color.to_svg_fill(),
        ));
    }

    /// Rectangle filled with a pattern from [`Canvas::define_hatch`].
    pub fn hatch_rect(&mut self, x: f64, y: f64, w: f64, h: f64, pattern_id: &str) {
        self.push(SvgElement::PatternRect { x, y, w, h, pattern_id: pattern_id.to_string() });
    }

    /// Clip everything drawn until the matching [`Canvas::pop_clip`] to a rectangle.
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        let id = format!("clip{}", self.next_clip_id);
        self.next_clip_id += 1;
        self.defs.push(format!(
            r#"<clipPath id="{id}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#
        ));
        self.clip_stack.push(id.clone());
        id
    }

    pub fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    pub fn measure_text(&self, content: &str, font: Font) -> TextMetrics {
        measure_text(content, font)
    }

    fn push(&mut self, elem: SvgElement) {
        self.elements.push((self.clip_stack.last().cloned(), elem));
    }

    pub fn finish_svg(&self) -> String {
        let mut out = String::with_capacity(32 * 1024);
        // fmt::Write into a String does not fail.
        let _ = self.write_svg(&mut out);
        out
    }

    fn write_svg(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        )?;

        if !self.defs.is_empty() {
            out.push_str("<defs>\n");
            for d in &self.defs {
                writeln!(out, "{d}")?;
            }
            out.push_str("</defs>\n");
        }

        writeln!(out, r#"<rect width="{}" height="{}" fill="white" />"#, self.width, self.height)?;

        // Consecutive elements sharing a clip path go into one group.
        let mut open: Option<&str> = None;
        for (clip, elem) in &self.elements {
            let clip = clip.as_deref();
            if clip != open {
                if open.is_some() {
                    out.push_str("</g>\n");
                }
                if let Some(id) = clip {
                    writeln!(out, r#"<g clip-path="url(#{id})">"#)?;
                }
                open = clip;
            }
            render_element(out, elem)?;
        }
        if open.is_some() {
            out.push_str("</g>\n");
        }

        out.push_str("</svg>\n");
        Ok(())
    }
}

fn render_element(out: &mut String, elem: &SvgElement) -> fmt::Result {
    match elem {
        SvgElement::Rect { x, y, w, h, paint } => {
            write!(out, r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#)?;
            paint.write_attrs(out)?;
            out.push_str(" />\n");
        }
        SvgElement::PatternRect { x, y, w, h, pattern_id } => {
            writeln!(
                out,
                r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="url(#{pattern_id})" />"#
            )?;
        }
        SvgElement::Line { x1, y1, x2, y2, stroke } => {
            write!(out, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#)?;
            stroke.write_attrs(out)?;
            out.push_str(" />\n");
        }
        SvgElement::Text { x, y, content, font, rotate } => {
            write!(out, r#"<text x="{x:.2}" y="{y:.2}""#)?;
            font.write_attrs(out)?;
            if let Some(angle) = rotate {
                write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#)?;
            }
            out.push('>');
            escape_xml(out, content);
            out.push_str("</text>\n");
        }
        SvgElement::Circle { cx, cy, r, paint } => {
            write!(out, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}""#)?;
            paint.write_attrs(out)?;
            out.push_str(" />\n");
        }
    }
    Ok(())
}

fn escape_xml(out: &mut String, content: &str) {
    for ch in content.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_canvas() {
        let c = Canvas::new(100.0, 50.0).unwrap();
        let svg = c.finish_svg();
        assert!(svg.contains("width=\"100\""));
        assert!(svg.contains("height=\"50\""));
        assert!(svg.ends_with("</svg>\n"));
        assert!(Canvas::new(0.0, 10.0).is_err());
    }

    #[test]
    fn clipped_elements_are_grouped() {
        let mut c = Canvas::new(200.0, 100.0).unwrap();
        let id = c.push_clip(0.0, 0.0, 50.0, 50.0);
        c.rect(10.0, 20.0, 50.0, 30.0, Paint::fill(Color::hex("#ff0000")));
        c.rect(0.0, 0.0, 5.0, 5.0, Paint::NONE);
        c.pop_clip();
        c.text(10.0, 20.0, "a < b", Font::default());
        let svg = c.finish_svg();
        assert_eq!(svg.matches(&format!("clip-path=\"url(#{id})\"")).count(), 1);
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains("a &lt; b"));
        let group_end = svg.find("</g>").unwrap();
        assert!(svg.find("<text").unwrap() > group_end);
    }

    #[test]
    fn hatch_defined_once() {
        let mut c = Canvas::new(200.0, 100.0).unwrap();
        c.define_hatch("band", Color::rgb(0, 0, 0), 4.0);
        c.define_hatch("band", Color::rgb(0, 0, 0), 4.0);
        c.hatch_rect(0.0, 0.0, 10.0, 10.0, "band");
        let svg = c.finish_svg();
        assert_eq!(svg.matches("<pattern id=\"band\"").count(), 1);
        assert!(svg.contains("fill=\"url(#band)\""));
    }

    #[test]
    fn marker_and_rotated_text() {
        let mut c = Canvas::new(100.0, 100.0).unwrap();
        c.marker(5.0, 6.0, 2.5, Color::hex("#000000"));
        c.text_rotated(10.0, 20.0, "Events", Font::default().italic(), -90.0);
        let svg = c.finish_svg();
        assert!(svg.contains(r##"<circle cx="5.00" cy="6.00" r="2.50" fill="#000000" stroke"##));
        let rotated = r#"font-style="italic" transform="rotate(-90.0,10.00,20.00)">Events"#;
        assert!(svg.contains(rotated));
    }
}
