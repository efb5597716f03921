// SPDX-License-Identifier: MIT OR Apache-2.0
//! Capability-probing accessors.
//!
//! Every function here accepts anything convertible to an [`ErrorRef`]
//! (`&ErrorValue`, `&std::io::Error`, an explicit [`ErrorRef::serum`] view,
//! ...) and answers from whichever capabilities the value exposes, falling
//! back to something sensible when a capability is missing.  None of them
//! fail.

use std::borrow::Cow;
use std::collections::HashMap;
use std::error::Error;

use tracing::{debug, warn};

use crate::value::ErrorRef;
use crate::{BEST_GUESS_PREFIX, DEFAULT_MAX_CAUSE_DEPTH, EMPTY_CODE_SENTINEL};

/// The error code.
///
/// Serum errors report their own code, or [`EMPTY_CODE_SENTINEL`] if that
/// code is empty.  Anything else gets a code invented from its runtime shape
/// by [`best_guess_code`].
pub fn code<'a>(err: impl Into<ErrorRef<'a>>) -> Cow<'a, str> {
    let err = err.into();
    match (err.as_serum(), err) {
        (Some(serum), _) => {
            let code = serum.code();
            if code.is_empty() {
                Cow::Borrowed(EMPTY_CODE_SENTINEL)
            } else {
                Cow::Borrowed(code)
            }
        }
        (None, ErrorRef::Foreign(foreign)) => Cow::Owned(best_guess_code(foreign)),
        (None, _) => Cow::Borrowed(EMPTY_CODE_SENTINEL),
    }
}

/// Invent a code for an error that has none.
///
/// **Unstable.** The result is `"bestguess-rust-"` followed by the leading
/// identifier of the error's `Debug` output (usually its type or variant
/// name), or `opaque` when there is none.  It exists to point a developer at
/// the offending error, and must never feed comparison logic beyond
/// [`code`] itself.
pub fn best_guess_code(err: &(dyn Error + 'static)) -> String {
    let debug = format!("{err:?}");
    let ident: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    let guess = if ident.is_empty() {
        format!("{BEST_GUESS_PREFIX}opaque")
    } else {
        format!("{BEST_GUESS_PREFIX}{ident}")
    };
    debug!(target: "serum.code", code = %guess, "invented a code for a non-serum error");
    guess
}

/// The message.
///
/// Serum errors report their message capability, or `""` without one.  A
/// foreign error's whole display string is its message.
pub fn message<'a>(err: impl Into<ErrorRef<'a>>) -> Cow<'a, str> {
    match err.into() {
        ErrorRef::Foreign(foreign) => Cow::Owned(foreign.to_string()),
        other => Cow::Borrowed(other.as_serum().and_then(|s| s.message()).unwrap_or("")),
    }
}

/// The details in order.
///
/// Ordered details are returned as-is.  Keyed details are sorted by key so
/// the output is deterministic.  Anything else has no details.
pub fn details<'a>(err: impl Into<ErrorRef<'a>>) -> Cow<'a, [(String, String)]> {
    let Some(serum) = err.into().as_serum() else {
        return Cow::Borrowed(&[]);
    };
    if let Some(ordered) = serum.ordered_details() {
        return Cow::Borrowed(ordered);
    }
    match serum.keyed_details() {
        Some(keyed) => {
            let mut pairs: Vec<(String, String)> = keyed
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            Cow::Owned(pairs)
        }
        None => Cow::Borrowed(&[]),
    }
}

/// The details as a map.  Not order-preserving; prefer [`details`] when
/// order matters.  When ordered details repeat a key, the last value wins.
pub fn details_map<'a>(err: impl Into<ErrorRef<'a>>) -> Cow<'a, HashMap<String, String>> {
    let Some(serum) = err.into().as_serum() else {
        return Cow::Owned(HashMap::new());
    };
    if let Some(keyed) = serum.keyed_details() {
        return Cow::Borrowed(keyed);
    }
    let map: HashMap<String, String> = serum
        .ordered_details()
        .unwrap_or_default()
        .iter()
        .cloned()
        .collect();
    Cow::Owned(map)
}

/// One detail value, or `""` if there is no such key.
pub fn detail<'a>(err: impl Into<ErrorRef<'a>>, key: &str) -> &'a str {
    let Some(serum) = err.into().as_serum() else {
        return "";
    };
    if let Some(keyed) = serum.keyed_details() {
        return keyed.get(key).map(String::as_str).unwrap_or("");
    }
    serum
        .ordered_details()
        .unwrap_or_default()
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

/// The next error in the chain.
///
/// Serum errors answer through their cause capability; foreign errors
/// through [`Error::source`].
pub fn cause<'a>(err: impl Into<ErrorRef<'a>>) -> Option<ErrorRef<'a>> {
    match err.into() {
        ErrorRef::Value(v) => v.cause.as_deref().map(ErrorRef::Value),
        ErrorRef::Serum(s) => s.serum_cause(),
        ErrorRef::Foreign(e) => e.source().map(ErrorRef::probe),
    }
}

/// Iterate an error and its causes, outermost first.
///
/// Causes reached from a non-canonical error count against
/// [`DEFAULT_MAX_CAUSE_DEPTH`]; an [`ErrorValue`](crate::ErrorValue) chain
/// is walked in full.
pub fn chain<'a>(err: impl Into<ErrorRef<'a>>) -> Chain<'a> {
    Chain::new(err.into(), DEFAULT_MAX_CAUSE_DEPTH)
}

/// Iterator returned by [`chain`].
///
/// Nothing stops a hand-written [`crate::SerumError`] from reporting itself
/// as its own cause, so the walk is bounded.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<ErrorRef<'a>>,
    causes_left: usize,
}

impl<'a> Chain<'a> {
    /// Walk from `err`, following at most `max_causes` causes.
    pub fn new(err: ErrorRef<'a>, max_causes: usize) -> Self {
        Self {
            next: Some(err),
            causes_left: max_causes,
        }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = ErrorRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if let Some(next) = cause(current) {
            if current.as_value().is_some() {
                self.next = Some(next);
            } else if self.causes_left == 0 {
                warn!(target: "serum.chain", "cause chain truncated at depth limit");
            } else {
                self.causes_left -= 1;
                self.next = Some(next);
            }
        }
        Some(current)
    }
}

/// Display string in the form `code[: message][: caused by: cause]`.
///
/// Empty parts are left out.  Details never appear unless a template has
/// already folded them into the message.  The cause part is the cause's own
/// display string.
pub fn synthesize_string<'a>(err: impl Into<ErrorRef<'a>>) -> String {
    let err = err.into();
    let mut out = code(err).into_owned();
    let msg = message(err);
    if !msg.is_empty() {
        out.push_str(": ");
        out.push_str(&msg);
    }
    if let Some(cause) = cause(err) {
        out.push_str(": caused by: ");
        out.push_str(&cause.to_string());
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
