// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end encoding and decoding of errors, canonical and foreign.

use std::borrow::Cow;
use std::fmt;
use std::ptr;

use serum::json::{self, Codec, JsonError};
use serum::{ErrorRef, ErrorValue, SerumError, errorf, standardize};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A hand-written Serum error that keeps its details in a map.
#[derive(Debug)]
struct QuotaExceeded {
    details: std::collections::HashMap<String, String>,
    source: std::io::Error,
}

impl QuotaExceeded {
    fn new() -> Self {
        Self {
            details: [("user", "ada"), ("limit", "10")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            source: std::io::Error::other("bucket full"),
        }
    }
}

impl fmt::Display for QuotaExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("quota exceeded")
    }
}

impl std::error::Error for QuotaExceeded {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl SerumError for QuotaExceeded {
    fn code(&self) -> &str {
        "storage-quota-exceeded"
    }

    fn message(&self) -> Option<&str> {
        Some("quota exceeded")
    }

    fn keyed_details(&self) -> Option<&std::collections::HashMap<String, String>> {
        Some(&self.details)
    }
}

fn deep(levels: usize) -> ErrorValue {
    (0..levels).rev().fold(None, |cause: Option<ErrorValue>, i| {
        let mut builder = ErrorValue::builder(format!("level-{i}")).detail("n", i.to_string());
        if let Some(cause) = cause {
            builder = builder.cause(&cause);
        }
        Some(builder.build())
    })
    .unwrap_or_else(|| ErrorValue::new("empty"))
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[test]
fn custom_serum_type_encodes_sorted_keyed_details_and_source() {
    let err = QuotaExceeded::new();
    insta::assert_snapshot!(
        json::to_string(ErrorRef::serum(&err)).unwrap(),
        @r#"{"code":"storage-quota-exceeded","message":"quota exceeded","details":{"limit":"10","user":"ada"},"cause":{"code":"bestguess-rust-Custom","message":"bucket full"}}"#
    );
}

#[test]
fn encoding_a_foreign_error_matches_its_standardized_form() {
    let err = QuotaExceeded::new();
    let view = ErrorRef::serum(&err);
    assert_eq!(
        json::to_json(view).unwrap(),
        json::to_json(&*serum::construct::standardize_bounded(view, 64)).unwrap()
    );
}

#[test]
fn wrapped_foreign_cause_is_well_formed_json() {
    let io = std::io::Error::other("connection reset");
    let err = errorf!("net-fetch-failed", cause = &io, "fetching index: {cause}");
    let value: serde_json::Value = serde_json::from_str(&json::to_string(&err).unwrap()).unwrap();
    assert_eq!(value["code"], "net-fetch-failed");
    assert_eq!(value["message"], "fetching index: connection reset");
    assert!(value["cause"]["code"].as_str().unwrap().starts_with("bestguess-"));
}

#[test]
fn pretty_codec() {
    let codec = Codec {
        pretty: true,
        ..Codec::default()
    };
    let text = String::from_utf8(codec.encode(&ErrorValue::new("x")).unwrap()).unwrap();
    assert_eq!(text, "{\n  \"code\": \"x\"\n}");
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[test]
fn round_trip_deep_chain() {
    let err = deep(20);
    let decoded = json::from_json(&json::to_json(&err).unwrap()).unwrap();
    assert_eq!(decoded, err);
    assert_eq!(decoded.chain().count(), 20);
}

#[test]
fn round_trip_keeps_chains_longer_than_the_walk_limit() {
    let err = deep(70);
    let decoded = json::from_json(&json::to_json(&err).unwrap()).unwrap();
    assert_eq!(decoded.chain().count(), 70);
    assert_eq!(decoded, err);
    assert!(serum::is(&err, &ErrorValue::builder("level-69").detail("n", "69").build()));
}

#[test]
fn decoded_detail_order_follows_document() {
    let err = json::from_str(r#"{"code":"x","details":{"z":"1","a":"2","m":"3"}}"#).unwrap();
    let keys: Vec<&str> = err.details().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn decoded_duplicate_details_are_kept() {
    let err = json::from_str(r#"{"code":"x","details":{"k":"1","k":"2"}}"#).unwrap();
    assert_eq!(err.details().len(), 2);
    assert_eq!(err.detail("k"), "1");
}

#[test]
fn decode_error_reports_shape() {
    for (input, shape) in [
        ("\"just a string\"", "string"),
        ("42", "number"),
        ("null", "null"),
        ("", "empty input"),
        ("{\"code\":", "object"),
    ] {
        match json::from_str(input) {
            Err(JsonError::Decode { shape: got, .. }) => assert_eq!(got, shape, "input {input:?}"),
            other => panic!("expected decode error for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn decode_error_display_mentions_shape() {
    let err = json::from_str("[]").unwrap_err();
    assert!(err.to_string().starts_with("cannot decode error from JSON array"), "{err}");
}

// ---------------------------------------------------------------------------
// Standardization
// ---------------------------------------------------------------------------

#[test]
fn standardize_twice_is_the_same_reference() {
    let err = QuotaExceeded::new();
    let once = standardize(ErrorRef::serum(&err));
    assert!(matches!(once, Cow::Owned(_)));
    let twice = standardize(&*once);
    assert!(ptr::eq(&*twice, &*once));
}

#[test]
fn standardized_custom_type_is_a_deep_copy() {
    let standard = standardize(ErrorRef::serum(&QuotaExceeded::new())).into_owned();
    assert_eq!(standard.code(), "storage-quota-exceeded");
    assert_eq!(standard.detail("user"), "ada");
    assert_eq!(standard.cause().map(ErrorValue::message), Some("bucket full"));
}
