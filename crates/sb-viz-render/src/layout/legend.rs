use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::margins::PlotArea;
use crate::style::{Align, Font, Paint, Stroke, VAlign};

pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub kind: LegendKind,
}

pub enum LegendKind {
    FilledRect,
    Marker,
    /// Hatched swatch using a pattern already defined on the canvas.
    HatchedRect(String),
}

/// Draw a frameless legend in the top-right corner of `area`, filled row by row over
/// `columns` columns.
pub fn draw_legend(
    canvas: &mut Canvas,
    area: &PlotArea,
    entries: &[LegendEntry],
    font_size: f64,
    columns: usize,
) {
    if entries.is_empty() {
        return;
    }
    let columns = columns.clamp(1, entries.len());

    let row_height = font_size + 5.0;
    let swatch_w = 16.0;
    let swatch_h = font_size - 1.0;
    let gap = 6.0;
    let col_gap = 14.0;
    let padding = 6.0;

    let label_font = Font::sized(font_size * 0.9).aligned(Align::Start, VAlign::Center);

    let max_w = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, label_font).width)
        .fold(0.0_f64, f64::max);
    let col_w = swatch_w + gap + max_w;

    let legend_w = padding * 2.0 + columns as f64 * col_w + (columns - 1) as f64 * col_gap;
    let lx = area.right() - legend_w - 5.0;
    let ly = area.top + 5.0;

    for (i, entry) in entries.iter().enumerate() {
        let (row, col) = (i / columns, i % columns);
        let sx = lx + padding + col as f64 * (col_w + col_gap);
        let ey = ly + padding + row as f64 * row_height + row_height / 2.0;

        match &entry.kind {
            LegendKind::FilledRect => {
                canvas.rect(
                    sx,
                    ey - swatch_h / 2.0,
                    swatch_w,
                    swatch_h,
                    Paint::solid(entry.color, 0.5),
                );
            }
            LegendKind::Marker => {
                let cx = sx + swatch_w / 2.0;
                let bar = Stroke::new(entry.color, 1.0);
                canvas.line(cx, ey - swatch_h / 2.0, cx, ey + swatch_h / 2.0, bar);
                canvas.marker(cx, ey, 3.0, entry.color);
            }
            LegendKind::HatchedRect(pattern_id) => {
                canvas.hatch_rect(sx, ey - swatch_h / 2.0, swatch_w, swatch_h, pattern_id);
                canvas.rect(
                    sx,
                    ey - swatch_h / 2.0,
                    swatch_w,
                    swatch_h,
                    Paint::outline(entry.color, 0.8),
                );
            }
        }

        canvas.text(sx + swatch_w + gap, ey, &entry.label, label_font);
    }
}
