#![no_main]

use libfuzzer_sys::fuzz_target;
use strata_catalog::cataloger::FileParser;
use strata_catalog::cataloger::javascript::lock::PackageLockParser;
use strata_source::{Location, MockResolver};

fuzz_target!(|data: &[u8]| {
    let resolver = MockResolver::new().build();
    let _ = PackageLockParser.parse(&resolver, &Location::new("/fuzz/package-lock.json"), data);
});
