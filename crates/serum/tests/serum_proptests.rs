// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property-based tests for construction, standardization, equivalence and
//! the JSON codec.

use proptest::prelude::*;
use serum::{ErrorValue, is, is_equivalent, json, standardize};

/// Strategy: a short code, possibly empty.
fn code() -> impl Strategy<Value = String> {
    "[a-z]{0,6}(-[a-z]{1,6}){0,2}"
}

/// Strategy: ordered details with deliberate key collisions.
fn details() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-d]", ".{0,8}"), 0..5)
}

/// Strategy: an error with up to three levels of cause.
fn error_value() -> impl Strategy<Value = ErrorValue> {
    let leaf = (code(), ".{0,12}", details()).prop_map(|(code, message, details)| ErrorValue {
        code,
        message,
        details,
        cause: None,
    });
    leaf.prop_recursive(3, 8, 1, |inner| {
        (code(), ".{0,12}", details(), inner).prop_map(|(code, message, details, cause)| {
            ErrorValue {
                code,
                message,
                details,
                cause: Some(Box::new(cause)),
            }
        })
    })
}

/// Replace empty codes and drop empty causes, which the encoder normalizes.
fn normalized(mut err: ErrorValue) -> ErrorValue {
    if err.code.is_empty() {
        err.code = serum::EMPTY_CODE_SENTINEL.to_string();
    }
    err.cause = err
        .cause
        .filter(|c| !c.is_empty())
        .map(|c| Box::new(normalized(*c)));
    err
}

// ── 1. Decoding an encoding gives the normalized value back ─────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]
    #[test]
    fn round_trip(err in error_value()) {
        let decoded = json::from_json(&json::to_json(&err).unwrap()).unwrap();
        prop_assert_eq!(decoded, normalized(err));
    }
}

// ── 2. Encoded detail keys follow the original order ───────────────

proptest! {
    #[test]
    fn detail_order_preserved(details in details()) {
        let err = ErrorValue { details: details.clone(), ..ErrorValue::new("x") };
        let text = json::to_string(&err).unwrap();
        let decoded = json::from_str(&text).unwrap();
        prop_assert_eq!(decoded.details, details);
    }
}

// ── 3. Every error is equivalent to itself and to its clone ─────────

proptest! {
    #[test]
    fn equivalence_is_reflexive(err in error_value()) {
        prop_assert!(is_equivalent(&err, &err));
        prop_assert!(is(&err, &err.clone()));
    }
}

// ── 4. Every level of a chain is found by `is` ──────────────────────

proptest! {
    #[test]
    fn is_finds_every_level(err in error_value()) {
        for level in err.chain() {
            prop_assert!(is(&err, level));
        }
    }
}

// ── 5. Standardizing a canonical value never copies ─────────────────

proptest! {
    #[test]
    fn standardize_is_identity_on_canonical(err in error_value()) {
        let standard = standardize(&err);
        prop_assert!(std::ptr::eq(&*standard, &err));
    }
}

// ── 6. Decoding arbitrary bytes never panics ────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]
    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = json::from_json(&bytes);
    }
}
