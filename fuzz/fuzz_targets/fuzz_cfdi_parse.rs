#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are expected on garbage input; panics are not.
    if let Ok(Some(record)) = cartaporte::cfdi::parse_bytes(data) {
        let row = cartaporte::ReportRow::from(record);
        let _ = cartaporte::report::to_csv(&[row], &Default::default());
    }
});
