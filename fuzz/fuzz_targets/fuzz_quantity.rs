#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (billed, transported) = data;
    let r = cartaporte::reconcile(Some(billed), Some(transported));
    assert!(r.billed().split_once('.').is_some_and(|(_, f)| f.len() == 3));
    if billed == transported {
        assert_eq!(r.comparison(), cartaporte::Comparison::Equal);
    }
});
