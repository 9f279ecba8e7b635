use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sb_core::naming::ObjVar;
use sb_core::{Histogram, UncertaintySeries};
use sb_syst::pipeline::{PlotInputs, SampleHistogram};
use sb_viz::{ComparisonArtifact, comparison_artifact};
use sb_viz_render::config::{VizConfig, resolve_config};
use sb_viz_render::{RenderError, render_json_svg, render_to_bytes, render_to_file};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    p.push(format!("sb-viz-render-{}-{}-{}", name, std::process::id(), nanos));
    p
}

fn rm_rf(path: &Path) {
    let _ = std::fs::remove_dir_all(path);
}

fn hist(name: &str, content: &[f64]) -> Histogram {
    let edges = (0..=content.len()).map(|i| 20.0 + i as f64 * 40.0).collect();
    Histogram::from_counts(name, edges, content.to_vec()).unwrap()
}

fn artifact() -> ComparisonArtifact {
    let mc = vec![
        SampleHistogram {
            sample: "S_ttbar_a".into(),
            label: "ttbar".into(),
            hist: hist("tt", &[5000.0, 1200.0, 300.0, 40.0]),
        },
        SampleHistogram {
            sample: "S_Singletop_b".into(),
            label: "Singletop".into(),
            hist: hist("st", &[400.0, 90.0, 20.0, 2.0]),
        },
        SampleHistogram {
            sample: "S_Diboson_c".into(),
            label: "Diboson".into(),
            hist: hist("vv", &[10.0, 3.0, 0.0, 0.0]),
        },
    ];
    let centers = mc[0].hist.bin_centers();
    let band =
        UncertaintySeries::from_points("band", centers, vec![300.0, 80.0, 20.0, 5.0]).unwrap();
    let inputs = PlotInputs {
        scope: "emu_OS_J2".into(),
        objvar: ObjVar::new("jet1", "pt"),
        plot_name: "Final_h_emu_OS_J2_jet1_pt".into(),
        mc,
        data: Some(hist("data", &[5600.0, 1250.0, 330.0, 0.0])),
        band: Some(band),
    };
    comparison_artifact(&inputs).unwrap()
}

#[test]
fn svg_file_written_with_parent_dirs() {
    let root = tmp_dir("svg");
    rm_rf(&root);
    let path = root.join("emu_OS_J2").join("Final_h_emu_OS_J2_jet1_pt.svg");

    render_to_file(&artifact(), &path, &VizConfig::default()).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("j₁ - pT"));
    // stack order follows integral: Diboson, Singletop, ttbar
    let pos = |label: &str| svg.find(&format!(">{label}<")).unwrap();
    assert!(pos("ttbar") < pos("Singletop"));
    assert!(pos("Singletop") < pos("Diboson"));
    // 5000 rounds to 5000, upper limit 5e6
    assert!(svg.contains(">10⁶<"));
    assert!(!svg.contains(">10⁷<"));

    rm_rf(&root);
}

#[test]
fn json_artifact_renders_same_svg_body() {
    let art = artifact();
    let json = serde_json::to_string(&art).unwrap();
    let config = VizConfig::default();
    let from_json = render_json_svg(&json, &config).unwrap();
    let direct = String::from_utf8(render_to_bytes(&art, "svg", &config).unwrap()).unwrap();
    assert_eq!(from_json, direct);

    assert!(matches!(render_json_svg("{}", &config), Err(RenderError::Deserialize(_))));
}

#[test]
fn unknown_format_rejected() {
    let err = render_to_bytes(&artifact(), "bmp", &VizConfig::default()).unwrap_err();
    assert!(matches!(err, RenderError::UnknownFormat(ref f) if f == "bmp"));
    #[cfg(not(feature = "png"))]
    assert!(render_to_bytes(&artifact(), "png", &VizConfig::default()).is_err());
}

#[test]
fn minimal_theme_drops_header() {
    let config = resolve_config(Some("theme: minimal\n")).unwrap();
    let svg = String::from_utf8(render_to_bytes(&artifact(), "svg", &config).unwrap()).unwrap();
    assert!(!svg.contains("ATLAS"));
    assert!(svg.contains("SM Total"));
}

#[cfg(feature = "png")]
#[test]
fn png_has_signature() {
    let bytes = render_to_bytes(&artifact(), "png", &VizConfig::default()).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
