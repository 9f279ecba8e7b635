use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::style::{Align, Font, Stroke, VAlign};

/// Draw a box frame with major/minor ticks, tick labels and axis titles.
///
/// `x_tick_labels = false` suppresses the x tick labels and title, for a panel sharing its x
/// axis with the one below.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
    x_tick_labels: bool,
) {
    let frame_color = Color::rgb(0, 0, 0);
    let frame = Stroke::new(frame_color, 0.8);
    let major_tick = Stroke::new(frame_color, 0.6);
    let minor_tick = Stroke::new(frame_color, 0.4);

    // inward ticks point into the panel: +1 from the bottom/left edges
    let dir = if config.axes.tick_direction == "in" { 1.0 } else { -1.0 };
    let tl = config.axes.tick_length;
    let mtl = config.axes.minor_tick_length;

    canvas.line(area.left, area.top, area.right(), area.top, frame);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), frame);
    canvas.line(area.left, area.top, area.left, area.bottom(), frame);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), frame);

    let tick_font = Font { color: frame_color, ..Font::sized(config.font.tick_size) };
    let x_label_font = tick_font.aligned(Align::Middle, VAlign::Top);
    let label_gap = if dir > 0.0 { 3.0 } else { tl + 3.0 };

    let x_major = x_axis.tick_positions.iter().map(|&v| (v, tl, major_tick));
    let x_minor = x_axis.minor_ticks.iter().map(|&v| (v, mtl, minor_tick));
    for (val, len, stroke) in x_major.chain(x_minor) {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        canvas.line(px, area.bottom(), px, area.bottom() - dir * len, stroke);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top + dir * len, stroke);
        }
    }
    if x_tick_labels {
        for (&val, label) in x_axis.tick_positions.iter().zip(&x_axis.tick_labels) {
            let px = x_axis.data_to_pixel(val, area.left, area.right());
            if px < area.left - 0.5 || px > area.right() + 0.5 || label.is_empty() {
                continue;
            }
            canvas.text(px, area.bottom() + label_gap, label, x_label_font);
        }
    }

    let y_label_font = tick_font.aligned(Align::End, VAlign::Center);

    let y_major = y_axis.tick_positions.iter().map(|&v| (v, tl, major_tick));
    let y_minor = y_axis.minor_ticks.iter().map(|&v| (v, mtl, minor_tick));
    for (val, len, stroke) in y_major.chain(y_minor) {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        canvas.line(area.left, py, area.left + dir * len, py, stroke);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() - dir * len, py, stroke);
        }
    }
    let mut max_tick_w = 0.0_f64;
    for (&val, label) in y_axis.tick_positions.iter().zip(&y_axis.tick_labels) {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 || label.is_empty() {
            continue;
        }
        max_tick_w = max_tick_w.max(canvas.measure_text(label, y_label_font).width);
        canvas.text(area.left - label_gap - 1.0, py, label, y_label_font);
    }

    let title_font =
        Font { color: frame_color, align: Align::End, ..Font::sized(config.font.label_size) };

    // ROOT-style titles: right-aligned at the far end of each axis
    if x_tick_labels && !x_axis.label.is_empty() {
        let y = area.bottom() + label_gap + config.font.tick_size + config.font.label_size + 4.0;
        canvas.text(area.right(), y, &x_axis.label, title_font);
    }
    if !y_axis.label.is_empty() {
        let x = area.left - label_gap - max_tick_w - 8.0;
        canvas.text_rotated(x, area.top, &y_axis.label, title_font, -90.0);
    }
}
