// SPDX-License-Identifier: MIT OR Apache-2.0
//! Equivalence of errors.
//!
//! Two errors are *equivalent* when they report the same code and the same
//! display string.  Details that never reach the message are ignored, so an
//! error rebuilt from a code and message matches the original.  Use
//! `PartialEq` on [`ErrorValue`](crate::ErrorValue), or
//! [`json::same_encoding`](crate::json::same_encoding), when every field must
//! match.

use crate::access::{self, synthesize_string};
use crate::value::ErrorRef;

/// Single-level equivalence.
///
/// Causes take part only through the display string, which includes the
/// cause's own display string.
pub fn is_equivalent<'a, 'b>(
    err: impl Into<ErrorRef<'a>>,
    target: impl Into<ErrorRef<'b>>,
) -> bool {
    let (err, target) = (err.into(), target.into());
    access::code(err) == access::code(target) && synthesize_string(err) == synthesize_string(target)
}

/// `true` if `err` or any error in its cause chain is equivalent to
/// `target`.
///
/// ```
/// let io = std::io::Error::other("disk on fire");
/// let err = serum::errorf!("app-save-failed", cause = &io, "save: {cause}");
/// assert!(serum::is(&err, &io));
/// assert!(!serum::is(&err, &serum::ErrorValue::new("app-other")));
/// ```
pub fn is<'a, 'b>(err: impl Into<ErrorRef<'a>>, target: impl Into<ErrorRef<'b>>) -> bool {
    let target = target.into();
    access::chain(err).any(|level| is_equivalent(level, target))
}
