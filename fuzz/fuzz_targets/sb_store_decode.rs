#![no_main]

use std::path::PathBuf;

use libfuzzer_sys::fuzz_target;
use sb_core::naming::{HistName, ObjVar, SuffixKind};
use sb_store::HistFile;

fuzz_target!(|data: &[u8]| {
    let Ok(file) = HistFile::from_slice(data, PathBuf::from("fuzz.json")) else {
        return;
    };
    let Ok(keys) = file.list_keys("emu_OS_J2") else {
        return;
    };

    let objvar = ObjVar::new("jet1", "pt");
    for key in keys {
        let _ = HistName::match_input(&key.name, "emu_OS_J2", &objvar, SuffixKind::Flavour);
        let _ = HistName::match_input(&key.name, "emu_OS_J2", &objvar, SuffixKind::Data);
        let _ = file.get_histogram(&format!("emu_OS_J2/{}", key.name));
        let _ = file.get_series(&format!("emu_OS_J2/{}", key.name));
    }
});
