#![no_main]

use libfuzzer_sys::fuzz_target;
use stackgate::StackIdentifier;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        if let Ok(id) = StackIdentifier::new(raw) {
            // Accepted identifiers are stable under re-validation
            let again = StackIdentifier::new(id.as_str()).map(|i| i.to_string());
            assert_eq!(again.ok().as_deref(), Some(id.as_str()));
        }
    }
});
