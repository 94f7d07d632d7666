#![no_main]

use libfuzzer_sys::fuzz_target;
use strata_catalog::cataloger::golang::binary::{build_packages, goarch_from_header};
use strata_catalog::cataloger::golang::buildinfo::read_build_info;

fuzz_target!(|data: &[u8]| {
    let arch = goarch_from_header(data).unwrap_or_default();
    if let Ok(Some(info)) = read_build_info(data, "fuzz/bin") {
        let _ = build_packages(&info, &arch);
    }
});
