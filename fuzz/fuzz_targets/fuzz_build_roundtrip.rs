// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz construction from options followed by a JSON round trip.
//!
//! Verifies:
//! 1. Building from any option sequence never panics.
//! 2. The built error decodes back from its own encoding.
//! 3. The decoded error is equivalent to the original unless a zero-value
//!    cause was dropped.
#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serum::{ErrorOption, ErrorValue, json};

#[derive(Debug, Arbitrary)]
enum Op {
    Message(String),
    Template(String),
    Detail(String, String),
    Cause(String, String),
}

#[derive(Debug, Arbitrary)]
struct Input {
    code: String,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let options = input.ops.into_iter().map(|op| match op {
        Op::Message(m) => serum::with_message_literal(m),
        Op::Template(t) => serum::with_message_template(&t),
        Op::Detail(k, v) => serum::with_detail(k, v),
        Op::Cause(code, message) => ErrorOption::Cause(Box::new(ErrorValue {
            message,
            ..ErrorValue::new(code)
        })),
    });
    let err = serum::error(input.code, options);

    let bytes = json::to_json(&err).expect("encoding never fails");
    let decoded = json::from_json(&bytes).expect("own encoding decodes");
    // A zero-value cause is dropped by the encoder, which changes the display.
    assert!(serum::is_equivalent(&decoded, &err) || err.chain().any(ErrorValue::is_empty));
});
