// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured, serializable errors following the Serum errors convention.
//!
//! Every Serum error carries a stable, machine-readable `code`, an optional
//! human-readable `message`, optional ordered key/value `details`, and an
//! optional `cause`.  The crate provides:
//!
//! - [`ErrorValue`], the canonical concrete record;
//! - [`SerumError`], the capability trait any other error type can
//!   implement to be treated as a Serum error;
//! - [`ErrorRef`], a borrowed view over any error (Serum or not), which the
//!   accessor functions in [`access`] probe for capabilities;
//! - construction helpers in [`construct`] (options, a builder, the
//!   [`errorf!`] macro) and [`standardize`] for coercing foreign errors;
//! - equivalence checks in [`equality`];
//! - the order-preserving JSON codec in [`json`].
//!
//! ```
//! use serum::{ErrorValue, json};
//!
//! let err = ErrorValue::builder("demo-error-job-not-found")
//!     .template("job ID {{ID}} not found")
//!     .detail("ID", "12")
//!     .build();
//! assert_eq!(err.to_string(), "demo-error-job-not-found: job ID 12 not found");
//! assert_eq!(
//!     json::to_string(&err).unwrap(),
//!     r#"{"code":"demo-error-job-not-found","message":"job ID 12 not found","details":{"ID":"12"}}"#,
//! );
//! ```
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod construct;
pub mod equality;
pub mod json;
mod value;

pub use access::{cause, code, detail, details, details_map, message, synthesize_string};
pub use construct::{
    ErrorBuilder, ErrorOption, error, standardize, with_cause, with_detail, with_message_literal,
    with_message_template,
};
pub use equality::{is, is_equivalent};
pub use value::{Details, ErrorRef, ErrorValue, SerumError};

/// Re-export so callers can name the template type used by
/// [`with_message_template`].
pub use serum_template::Template;

/// Code reported for a Serum error whose own code is empty.
pub const EMPTY_CODE_SENTINEL: &str = "?!";

/// Prefix of codes invented for errors that carry no code of their own.
pub const BEST_GUESS_PREFIX: &str = "bestguess-rust-";

/// Default cap on how many causes are followed when walking a chain.
pub const DEFAULT_MAX_CAUSE_DEPTH: usize = 64;

/// Build an [`ErrorValue`] whose message is a format string.
///
/// ```
/// let err = serum::errorf!("app-foobar", "freetext goes here ({})", "X");
/// assert_eq!(err.message(), "freetext goes here (X)");
/// ```
///
/// A cause is attached with a leading `cause = <expr>` argument, where the
/// expression is anything convertible to an [`ErrorRef`]: `&err` for a plain
/// error or an [`ErrorValue`], [`ErrorRef::serum`] for a custom
/// [`SerumError`].  The format string must mention `{cause}`, where the
/// cause's display text is placed.  The cause is standardized immediately,
/// so the result always serializes cleanly:
///
/// ```
/// let io = std::io::Error::other("disk on fire");
/// let err = serum::errorf!("app-save-failed", cause = &io, "saving {}: {cause}", "a.txt");
/// assert_eq!(err.message(), "saving a.txt: disk on fire");
/// assert!(err.cause().is_some());
/// ```
#[macro_export]
macro_rules! errorf {
    ($code:expr, cause = $cause:expr, $($fmt:tt)+) => {{
        let __serum_cause: $crate::ErrorRef<'_> = ::core::convert::Into::into($cause);
        $crate::construct::errorf_wrap(
            $code,
            ::std::format_args!($($fmt)+, cause = __serum_cause),
            __serum_cause,
        )
    }};
    ($code:expr, $($fmt:tt)+) => {
        $crate::construct::errorf($code, ::std::format_args!($($fmt)+))
    };
}
