#![no_main]

use libfuzzer_sys::fuzz_target;
use strata_catalog::cataloger::golang::gomod::{GoModFile, parse_go_sum};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(file) = GoModFile::parse(content, "fuzz/go.mod") {
            let _ = file.resolved_modules();
        }
        let _ = parse_go_sum(content);
    }
});
