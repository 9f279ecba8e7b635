use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::margins::PlotArea;
use crate::style::Font;

/// Experiment label inside the top-left corner of `area`: bold italic name, status, then
/// `<√s> TeV <lumi> fb⁻¹` on the line below.
pub fn draw_experiment_header(canvas: &mut Canvas, area: &PlotArea, config: &VizConfig) {
    let exp = &config.experiment;
    if exp.name.is_empty() {
        return;
    }

    let header_size = config.font.label_size * 1.2;
    let x = area.left + area.width * 0.04;
    let y = area.top + header_size + 6.0;

    let name_font = Font::sized(header_size).bold().italic();
    canvas.text(x, y, &exp.name, name_font);
    let name_w = canvas.measure_text(&exp.name, name_font).width;

    if !exp.status.is_empty() {
        canvas.text(x + name_w + 5.0, y, &exp.status, Font::sized(header_size));
    }

    let mut info_parts = Vec::new();
    if exp.sqrt_s_tev > 0.0 {
        info_parts.push(format!("{} TeV", exp.sqrt_s_tev));
    }
    if exp.lumi_fb_inv > 0.0 {
        info_parts.push(format!("{} fb\u{207B}\u{00B9}", exp.lumi_fb_inv));
    }
    if !info_parts.is_empty() {
        let info_font = Font::sized(config.font.label_size);
        canvas.text(x, y + header_size + 4.0, &info_parts.join(" "), info_font);
    }
}
