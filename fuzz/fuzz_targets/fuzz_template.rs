// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz template parsing and rendering.
//!
//! Verifies:
//! 1. Parsing any string never panics and yields at least one segment.
//! 2. Rendering against any table never panics.
//! 3. Text without `{{` renders to itself.
#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serum_template::{Segment, Template};

#[derive(Debug, Arbitrary)]
struct Input {
    template: String,
    table: Vec<(String, String)>,
}

fuzz_target!(|input: Input| {
    let template = Template::parse(&input.template);
    assert!(!template.segments().is_empty());

    let rendered = template.render(&input.table);

    if !input.template.contains("{{") {
        assert_eq!(template.segments(), [Segment::Literal(input.template.clone())]);
        assert_eq!(rendered, input.template);
    }
});
