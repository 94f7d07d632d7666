#![no_main]

use libfuzzer_sys::fuzz_target;
use strata_catalog::cataloger::FileParser;
use strata_catalog::cataloger::rust::CargoLockParser;
use strata_source::{Location, MockResolver};

fuzz_target!(|data: &[u8]| {
    let resolver = MockResolver::new().build();
    let _ = CargoLockParser.parse(&resolver, &Location::new("/fuzz/Cargo.lock"), data);
});
