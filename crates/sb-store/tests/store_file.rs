//! Integration tests: write a store to disk, reopen it, update it in place.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use approx::assert_abs_diff_eq;
use sb_core::{Histogram, UncertaintySeries};
use sb_store::{HistFile, ObjectClass, StoreError};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    p.push(format!("sb-store-{}-{}-{}", name, std::process::id(), nanos));
    p
}

fn rm_rf(path: &Path) {
    let _ = std::fs::remove_dir_all(path);
}

fn hist(name: &str, content: &[f64]) -> Histogram {
    let edges = (0..=content.len()).map(|i| i as f64 * 10.0).collect();
    Histogram::from_counts(name, edges, content.to_vec()).unwrap()
}

#[test]
fn write_then_reopen_preserves_objects() {
    let root = tmp_dir("reopen");
    rm_rf(&root);
    let path = root.join("nested/out.json");

    let mut f = HistFile::open_or_create(&path).unwrap();
    f.mkdir("emu_OS_J2/FTAG2_ttbar_PhPy8");
    f.mkdir("emu_OS_J2/FTAG2_empty");
    let dir = "emu_OS_J2/FTAG2_ttbar_PhPy8";
    f.put_histogram(dir, hist("h_emu_OS_J2_jet1_pt_nominal", &[4.0, 9.0]));
    let total = UncertaintySeries::from_points(
        "Gr_emu_OS_J2_jet1_pt_tot_uncert",
        vec![5.0, 15.0],
        vec![0.1, 0.2],
    )
    .unwrap();
    f.put_series(dir, total);
    f.write().unwrap();
    assert!(path.exists());

    let g = HistFile::open(&path).unwrap();
    let h = g.get_histogram("emu_OS_J2/FTAG2_ttbar_PhPy8/h_emu_OS_J2_jet1_pt_nominal").unwrap();
    assert_eq!(h.bin_content(), &[4.0, 9.0]);
    assert_abs_diff_eq!(h.bin_error()[1], 3.0, epsilon = 1e-12);

    let s = g.get_series("emu_OS_J2/FTAG2_ttbar_PhPy8/Gr_emu_OS_J2_jet1_pt_tot_uncert").unwrap();
    assert_eq!(s.y(), &[0.1, 0.2]);

    // Empty directories survive the round trip.
    assert!(g.has_dir("emu_OS_J2/FTAG2_empty"));
    assert!(g.dir("emu_OS_J2/FTAG2_empty").unwrap().is_empty());

    // Objects come back in name order: "Gr_..." before "h_...".
    let keys = g.list_keys("emu_OS_J2/FTAG2_ttbar_PhPy8").unwrap();
    let classes: Vec<_> = keys.iter().map(|k| k.class).collect();
    assert_eq!(classes, vec![ObjectClass::Series, ObjectClass::Histogram]);

    rm_rf(&root);
}

#[test]
fn update_mode_overwrites_existing_objects() {
    let root = tmp_dir("update");
    rm_rf(&root);
    let path = root.join("out.json");

    let mut f = HistFile::open_or_create(&path).unwrap();
    f.put_histogram("s", hist("h", &[1.0]));
    f.write().unwrap();

    let mut f = HistFile::open_or_create(&path).unwrap();
    f.put_histogram("s", hist("h", &[7.0]));
    f.put_histogram("s", hist("h2", &[2.0]));
    f.write().unwrap();

    let g = HistFile::open(&path).unwrap();
    assert_eq!(g.get_histogram("s/h").unwrap().bin_content(), &[7.0]);
    assert_eq!(g.list_keys("s").unwrap().len(), 2);

    rm_rf(&root);
}

#[test]
fn corrupt_histogram_is_a_decode_error() {
    let root = tmp_dir("corrupt");
    rm_rf(&root);
    std::fs::create_dir_all(&root).unwrap();
    let path = root.join("bad.json");
    std::fs::write(
        &path,
        r#"{"schema_version":"systband_store_v0","root":{"objects":{"h":{"class":"histogram","name":"h","bin_edges":[0],"bin_content":[1],"bin_error":[1]}}}}"#,
    )
    .unwrap();

    let err = HistFile::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Json(_)));
    assert!(!err.is_missing());

    rm_rf(&root);
}
