/// Axis with fixed limits, tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Linear axis over exactly `[min, max]` with "nice number" ticks inside it.
    pub fn linear(min: f64, max: f64, target_ticks: usize) -> Self {
        let (min, max) = if (max - min).abs() < 1e-15 || max < min {
            (min - 1.0, min + 1.0)
        } else {
            (min, max)
        };
        let step = nice_step((max - min) / (target_ticks.max(2) - 1) as f64);

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut k = (min / step - 1e-9).ceil() as i64;
        while (k as f64) * step <= max + step * 1e-9 {
            let v = k as f64 * step;
            ticks.push(v);
            labels.push(format_tick(v, step));
            k += 1;
        }

        // 5 subdivisions per major step
        let minor_step = step / 5.0;
        let mut minor = Vec::new();
        let mut m = (min / minor_step - 1e-9).ceil() as i64;
        while (m as f64) * minor_step <= max + minor_step * 1e-9 {
            if m % 5 != 0 {
                minor.push(m as f64 * minor_step);
            }
            m += 1;
        }

        Self {
            min,
            max,
            log: false,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    /// Logarithmic axis over exactly `[min, max]`, major ticks on decades.
    ///
    /// Non-positive limits are clamped; with many decades only every n-th one is labelled.
    pub fn log(min: f64, max: f64) -> Self {
        let min = if min > 0.0 { min } else { 1e-3 };
        let max = if max > min { max } else { min * 10.0 };
        let lo = (min.log10() - 1e-9).ceil() as i32;
        let hi = (max.log10() + 1e-9).floor() as i32;
        let n_decades = (hi - lo + 1).max(1) as usize;
        let stride = n_decades.div_ceil(8).max(1);

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut minor = Vec::new();
        for exp in (lo - 1)..=hi {
            let decade = 10f64.powi(exp);
            if exp >= lo {
                ticks.push(decade);
                let idx = (exp - lo) as usize;
                labels.push(if idx % stride == 0 { decade_label(exp) } else { String::new() });
            }
            for m in 2..=9 {
                let v = m as f64 * decade;
                if v > min && v < max {
                    minor.push(v);
                }
            }
        }

        Self {
            min,
            max,
            log: true,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to pixel coordinate. Values at or below zero on a log axis map far
    /// below `px_min` and are expected to be clipped.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = if self.log {
            let v = value.max(1e-300).log10();
            let lo = self.min.log10();
            let hi = self.max.log10();
            (v - lo) / (hi - lo)
        } else {
            (value - self.min) / (self.max - self.min)
        };
        px_min + frac * (px_max - px_min)
    }

    /// Like [`Axis::data_to_pixel`] but clamped to a margin around the pixel range, so
    /// shapes reaching far off-axis stay representable.
    pub fn data_to_pixel_clamped(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let px = self.data_to_pixel(value, px_min, px_max);
        let span = (px_max - px_min).abs();
        let lo = px_min.min(px_max) - span;
        let hi = px_min.max(px_max) + span;
        px.clamp(lo, hi)
    }
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 { format!("{}", v.round() as i64) } else { format!("{v:.decimals$}") }
}

fn decade_label(exp: i32) -> String {
    match exp {
        0 => "1".into(),
        1 => "10".into(),
        _ => format!("10{}", superscript(exp)),
    }
}

fn superscript(n: i32) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '-' => '\u{207B}',
            '0' => '\u{2070}',
            '1' => '\u{00B9}',
            '2' => '\u{00B2}',
            '3' => '\u{00B3}',
            '4' => '\u{2074}',
            '5' => '\u{2075}',
            '6' => '\u{2076}',
            '7' => '\u{2077}',
            '8' => '\u{2078}',
            '9' => '\u{2079}',
            _ => c,
        })
        .collect()
}
