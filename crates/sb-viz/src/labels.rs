use sb_core::naming::ObjVar;

fn object_label(object: &str) -> &str {
    match object {
        "jet1" => "j₁",
        "jet2" => "j₂",
        "el1" => "e⁻₁",
        "mu1" => "μ₁",
        other => other,
    }
}

fn variable_label(variable: &str) -> &str {
    match variable {
        "pt" | "pt1" => "pT",
        "eta" | "eta1" => "η",
        "cl_eta1" => "Calo. η",
        "phi" | "phi1" => "φ",
        "m" => "m(lj)",
        other => other,
    }
}

/// x-axis label, e.g. `jet1`/`pt` → `j₁ - pT`. Event-level quantities keep the object name.
pub fn axis_label(objvar: &ObjVar) -> String {
    match &objvar.variable {
        Some(v) => format!("{} - {}", object_label(&objvar.object), variable_label(v)),
        None => objvar.object.clone(),
    }
}

/// Round to one significant figure (`1234` → `1000`, `0.0372` → `0.04`).
///
/// Zero and non-finite values are returned unchanged.
pub fn round_to_1(x: f64) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let exp = x.abs().log10().floor();
    let mag = 10f64.powf(exp);
    (x / mag).round() * mag
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn labels() {
        assert_eq!(axis_label(&ObjVar::new("jet1", "pt")), "j₁ - pT");
        assert_eq!(axis_label(&ObjVar::new("mu1", "cl_eta1")), "μ₁ - Calo. η");
        assert_eq!(axis_label(&ObjVar::new("bjet", "mv2")), "bjet - mv2");
        assert_eq!(axis_label(&ObjVar::event("nJets")), "nJets");
    }

    #[test]
    fn one_significant_figure() {
        assert_relative_eq!(round_to_1(1234.0), 1000.0);
        assert_relative_eq!(round_to_1(8765.0), 9000.0);
        assert_relative_eq!(round_to_1(0.0372), 0.04, epsilon = 1e-12);
        assert_relative_eq!(round_to_1(-55.0), -60.0);
        assert_eq!(round_to_1(0.0), 0.0);
    }
}
