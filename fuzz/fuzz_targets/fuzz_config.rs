// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz configuration parsing.
//!
//! Verifies:
//! 1. Parsing arbitrary TOML never panics.
//! 2. Validation never panics on anything that parses.
//! 3. Every valid config yields a codec with a non-zero depth.
#![no_main]
use libfuzzer_sys::fuzz_target;
use serum_config::{parse_toml, validate_config};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = parse_toml(text) else {
        return;
    };
    if validate_config(&config).is_ok() {
        assert!(config.codec().max_cause_depth > 0);
    }
});
