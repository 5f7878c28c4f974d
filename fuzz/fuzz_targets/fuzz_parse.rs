#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = nfasat_dsl::parse_with_diagnostics(s, "fuzz.nfa");
    }
});
