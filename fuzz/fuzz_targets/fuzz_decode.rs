// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz JSON decoding of errors.
//!
//! Verifies:
//! 1. Decoding arbitrary bytes never panics.
//! 2. Anything that decodes re-encodes and decodes to an equal chain of codes.
#![no_main]
use libfuzzer_sys::fuzz_target;
use serum::json;

fuzz_target!(|data: &[u8]| {
    let Ok(err) = json::from_json(data) else {
        return;
    };
    let Ok(bytes) = json::to_json(&err) else {
        return;
    };
    // Chains past the decoder's recursion limit are allowed to fail here.
    if let Ok(again) = json::from_json(&bytes) {
        assert_eq!(again.details(), err.details());
        assert_eq!(json::to_json(&again).ok(), Some(bytes));
    }
});
