#![no_main]

use libfuzzer_sys::fuzz_target;
use stackgate::{ReferenceParser, StackIdentifier};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for reference in ReferenceParser::default().extract(text) {
            assert!(StackIdentifier::parse(reference.target.as_str()).is_some());
        }
    }
});
