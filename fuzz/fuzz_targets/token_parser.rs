#![no_main]

use codex_canon::canon::validate_sequence;
use codex_canon::parser::parse_tokens;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Arbitrary text must parse or error cleanly, never panic
        if let Ok(parsed) = parse_tokens(input) {
            let result = validate_sequence(&parsed.indices);
            assert_eq!(result.is_valid, result.violations.is_empty());
        }
    }
});
