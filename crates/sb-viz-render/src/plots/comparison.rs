use sb_viz::ComparisonArtifact;

use crate::RenderError;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::header::draw_experiment_header;
use crate::layout::axes::Axis;
use crate::layout::legend::{self, LegendEntry, LegendKind};
use crate::layout::margins::PlotArea;
use crate::layout::multi_panel::MainRatioLayout;
use crate::plots::axes_draw::draw_axes;
use crate::style::{Font, Paint, Stroke};

const BAND_PATTERN: &str = "mc_band_hatch";

fn check_len(what: &str, len: usize, n_bins: usize) -> crate::Result<()> {
    if len == n_bins {
        Ok(())
    } else {
        Err(RenderError::Layout(format!("{what} has {len} entries, expected {n_bins} bins")))
    }
}

fn validate(art: &ComparisonArtifact) -> crate::Result<usize> {
    let n_bins = art.bin_edges.len().saturating_sub(1);
    if n_bins == 0 {
        return Err(RenderError::Layout(format!("{}: no bins", art.plot_name)));
    }
    if art.bin_edges.windows(2).any(|w| w[0].is_nan() || w[1].is_nan() || w[1] <= w[0]) {
        return Err(RenderError::Layout(format!("{}: bin edges not increasing", art.plot_name)));
    }
    for s in &art.samples {
        check_len(&s.name, s.y.len(), n_bins)?;
    }
    check_len("total_mc_y", art.total_mc_y.len(), n_bins)?;
    check_len("total_mc_err", art.total_mc_err.len(), n_bins)?;
    check_len("ratio_y", art.ratio_y.len(), n_bins)?;
    check_len("ratio_yerr", art.ratio_yerr.len(), n_bins)?;
    check_len("ratio_band.lo", art.ratio_band.lo.len(), n_bins)?;
    check_len("ratio_band.hi", art.ratio_band.hi.len(), n_bins)?;
    if let Some(d) = &art.data {
        check_len("data.y", d.y.len(), n_bins)?;
        check_len("data.yerr", d.yerr.len(), n_bins)?;
    }
    Ok(n_bins)
}

struct Panel<'a> {
    area: &'a PlotArea,
    x: &'a Axis,
    y: &'a Axis,
}

impl Panel<'_> {
    fn px(&self, x: f64) -> f64 {
        self.x.data_to_pixel(x, self.area.left, self.area.right())
    }

    fn py(&self, y: f64) -> f64 {
        self.y.data_to_pixel_clamped(y, self.area.bottom(), self.area.top)
    }

    /// Filled box over bin `[x_lo, x_hi]` between `y_lo` and `y_hi` (data units).
    fn bin_box(&self, x_lo: f64, x_hi: f64, y_lo: f64, y_hi: f64) -> (f64, f64, f64, f64) {
        let (px_lo, px_hi) = (self.px(x_lo), self.px(x_hi));
        let (py_lo, py_hi) = (self.py(y_lo), self.py(y_hi));
        (px_lo, py_hi, px_hi - px_lo, py_lo - py_hi)
    }
}

/// Stacked simulation with hatched uncertainty band and data on a log scale, above a
/// data/simulation ratio panel.
pub fn render(art: &ComparisonArtifact, config: &VizConfig) -> crate::Result<String> {
    let n_bins = validate(art)?;
    let cmp = &config.comparison;
    let edges = &art.bin_edges;

    let fig_w = config.figure.width;
    let fig_h = config.figure.height;
    let mut canvas = Canvas::new(fig_w, fig_h)?;

    let x_min = edges[0];
    let x_max = edges[n_bins];
    let y_top = (if art.y_max > 0.0 { art.y_max } else { 1.0 }) * cmp.headroom;

    let x_axis_main = Axis::linear(x_min, x_max, 6);
    let y_axis_main = Axis::log(cmp.y_min, y_top).with_label(art.y_label.as_str());
    let x_axis_ratio = Axis::linear(x_min, x_max, 6).with_label(art.x_label.as_str());
    let [r_lo, r_hi] = cmp.ratio_y_range;
    let y_axis_ratio = Axis::linear(r_lo, r_hi, 3).with_label("Data/MC");

    let tick_font = Font::sized(config.font.tick_size);
    let left_margin = y_axis_main
        .tick_labels
        .iter()
        .chain(&y_axis_ratio.tick_labels)
        .map(|l| canvas.measure_text(l, tick_font).width)
        .fold(0.0_f64, f64::max)
        + config.font.label_size
        + 24.0;
    let right_margin = 15.0;
    let top_margin = 12.0;
    let bottom_margin = config.font.tick_size + config.font.label_size + 24.0;
    let content_w = fig_w - left_margin - right_margin;
    let content_h = fig_h - top_margin - bottom_margin;
    if content_w < 50.0 || content_h < 80.0 {
        return Err(RenderError::Layout(format!("figure {fig_w}x{fig_h} too small")));
    }

    let layout = MainRatioLayout::new(
        left_margin,
        top_margin,
        content_w,
        content_h,
        6.0,
        cmp.ratio_fraction,
    );

    // --- Main panel ---
    let main = Panel { area: &layout.main, x: &x_axis_main, y: &y_axis_main };
    draw_axes(&mut canvas, main.area, main.x, main.y, config, false);
    canvas.push_clip(main.area.left, main.area.top, main.area.width, main.area.height);

    let mut cumulative = vec![0.0_f64; n_bins];
    let mut entries = Vec::with_capacity(art.samples.len() + 2);
    for (si, sample) in art.samples.iter().enumerate() {
        let color = config.sample_color(&sample.label, si);
        for (bi, cum) in cumulative.iter_mut().enumerate() {
            let base = *cum;
            *cum += sample.y[bi];
            if sample.y[bi] <= 0.0 {
                continue;
            }
            let (x, y, w, h) = main.bin_box(edges[bi], edges[bi + 1], base, *cum);
            canvas.rect(x, y, w, h, Paint::solid(color, 0.3));
        }
        entries.push(LegendEntry {
            label: sample.label.clone(),
            color,
            kind: LegendKind::FilledRect,
        });
    }
    // top of the stack first
    entries.reverse();

    // stack total outline
    let total_line = Stroke::new(config.colors.total, 1.0);
    for bi in 0..n_bins {
        let py = main.py(art.total_mc_y[bi]);
        canvas.line(main.px(edges[bi]), py, main.px(edges[bi + 1]), py, total_line);
    }

    if cmp.show_mc_band {
        canvas.define_hatch(BAND_PATTERN, config.colors.band, 4.0);
        for bi in 0..n_bins {
            let (y, err) = (art.total_mc_y[bi], art.total_mc_err[bi]);
            if y <= 0.0 || err <= 0.0 {
                continue;
            }
            let (px, py, w, h) = main.bin_box(edges[bi], edges[bi + 1], y - err, y + err);
            canvas.hatch_rect(px, py, w, h, BAND_PATTERN);
        }
        entries.push(LegendEntry {
            label: "SM Total".into(),
            color: config.colors.band,
            kind: LegendKind::HatchedRect(BAND_PATTERN.into()),
        });
    }

    if let Some(data) = &art.data {
        let observed = config.colors.observed;
        let err_bar = Stroke::new(observed, 1.0);
        for bi in 0..n_bins {
            let y = data.y[bi];
            if y <= 0.0 {
                continue;
            }
            let px = main.px(0.5 * (edges[bi] + edges[bi + 1]));
            let e = data.yerr[bi];
            canvas.error_bar(px, main.py(y - e), main.py(y + e), 0.0, err_bar);
            canvas.marker(px, main.py(y), 2.5, observed);
        }
        entries.push(LegendEntry {
            label: "Data".into(),
            color: config.colors.observed,
            kind: LegendKind::Marker,
        });
    }

    canvas.pop_clip();
    draw_experiment_header(&mut canvas, main.area, config);
    legend::draw_legend(&mut canvas, main.area, &entries, config.font.size, cmp.legend_columns);

    // --- Ratio panel ---
    let ratio = Panel { area: &layout.ratio, x: &x_axis_ratio, y: &y_axis_ratio };
    draw_axes(&mut canvas, ratio.area, ratio.x, ratio.y, config, true);
    canvas.push_clip(ratio.area.left, ratio.area.top, ratio.area.width, ratio.area.height);

    if cmp.show_mc_band {
        let band = art.ratio_band.lo.iter().zip(&art.ratio_band.hi);
        for (bi, (lo, hi)) in band.enumerate() {
            let (Some(lo), Some(hi)) = (lo, hi) else {
                continue;
            };
            let (x, y, w, h) = ratio.bin_box(edges[bi], edges[bi + 1], *lo, *hi);
            canvas.hatch_rect(x, y, w, h, BAND_PATTERN);
        }
    }

    let ref_py = ratio.py(1.0);
    canvas.line(
        ratio.area.left,
        ref_py,
        ratio.area.right(),
        ref_py,
        Stroke::new(Color::rgb(120, 120, 120), 0.8).dashed(),
    );

    if art.data.is_some() {
        let observed = config.colors.observed;
        let err_bar = Stroke::new(observed, 0.8);
        for bi in 0..n_bins {
            let Some(r) = art.ratio_y[bi] else {
                continue;
            };
            let e = art.ratio_yerr[bi].unwrap_or(0.0);
            let px = ratio.px(0.5 * (edges[bi] + edges[bi + 1]));
            canvas.error_bar(px, ratio.py(r - e), ratio.py(r + e), 0.0, err_bar);
            canvas.marker(px, ratio.py(r), 2.0, observed);
        }
    }

    canvas.pop_clip();

    tracing::debug!(
        plot = art.plot_name.as_str(),
        n_bins,
        samples = art.samples.len(),
        "comparison rendered"
    );
    Ok(canvas.finish_svg())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_viz::comparison::{
        BandEnvelope, ComparisonMeta, ComparisonSample, DataSeries, RatioPolicy,
    };

    fn sample(name: &str, label: &str, y: &[f64]) -> ComparisonSample {
        ComparisonSample { name: name.into(), label: label.into(), y: y.to_vec() }
    }

    fn artifact() -> ComparisonArtifact {
        ComparisonArtifact {
            schema_version: sb_viz::COMPARISON_SCHEMA_VERSION.into(),
            meta: ComparisonMeta {
                tool: "systband".into(),
                tool_version: "0.0.0".into(),
                created_unix_ms: 0,
            },
            plot_name: "Final_h_emu_OS_J2_jet1_pt".into(),
            scope: "emu_OS_J2".into(),
            x_label: "j₁ - pT".into(),
            y_label: "No. of Events".into(),
            bin_edges: vec![0.0, 50.0, 100.0],
            samples: vec![
                sample("S_Wjets_b", "Wjets", &[10.0, 0.0]),
                sample("S_ttbar_a", "ttbar", &[90.0, 4.0]),
            ],
            total_mc_y: vec![100.0, 4.0],
            total_mc_stat_err: vec![10.0, 2.0],
            syst_band: Some(vec![5.0, 1.0]),
            total_mc_err: vec![125f64.sqrt(), 5f64.sqrt()],
            data: Some(DataSeries { y: vec![110.0, 0.0], yerr: vec![110f64.sqrt(), 0.0] }),
            ratio_policy: RatioPolicy {
                numerator: "data".into(),
                denominator: "mc_total".into(),
                zero_policy: "null".into(),
            },
            ratio_y: vec![Some(1.1), Some(0.0)],
            ratio_yerr: vec![Some(0.1), Some(0.0)],
            ratio_band: BandEnvelope {
                lo: vec![Some(0.89), Some(0.44)],
                hi: vec![Some(1.11), Some(1.56)],
            },
            y_max: 100.0,
        }
    }

    #[test]
    fn renders_all_layers() {
        let svg = render(&artifact(), &VizConfig::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        // ttbar and Wjets stack colours
        assert!(svg.contains("#7bb274"));
        assert!(svg.contains("#825f87"));
        assert!(svg.contains("url(#mc_band_hatch)"));
        for text in ["SM Total", "Data", "Data/MC", "No. of Events", "j₁ - pT", "ATLAS"] {
            assert!(svg.contains(text), "missing {text}");
        }
        assert!(svg.contains("139.1 fb⁻¹"));
        // 0.1 .. 1e5 decades on the main axis
        assert!(svg.contains(">10⁵<"));
    }

    #[test]
    fn band_and_data_optional() {
        let mut art = artifact();
        art.data = None;
        art.ratio_y = vec![None, None];
        art.ratio_yerr = vec![None, None];
        let mut config = VizConfig::default();
        config.comparison.show_mc_band = false;
        let svg = render(&art, &config).unwrap();
        assert!(!svg.contains("mc_band_hatch"));
        assert!(!svg.contains(">Data<"));
    }

    #[test]
    fn inconsistent_artifact_is_layout_error() {
        let mut art = artifact();
        art.total_mc_err.pop();
        assert!(matches!(render(&art, &VizConfig::default()), Err(RenderError::Layout(_))));

        let mut art = artifact();
        art.bin_edges = vec![0.0];
        assert!(render(&art, &VizConfig::default()).is_err());

        let mut art = artifact();
        art.bin_edges = vec![0.0, 100.0, 50.0];
        assert!(render(&art, &VizConfig::default()).is_err());
    }
}
