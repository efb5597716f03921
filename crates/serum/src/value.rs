// SPDX-License-Identifier: MIT OR Apache-2.0
//! The canonical [`ErrorValue`], the [`SerumError`] capability trait, and the
//! [`ErrorRef`] view used to probe arbitrary errors.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::access;

/// Ordered key/value details.  Order is significant and duplicates are kept.
pub type Details = Vec<(String, String)>;

// ---------------------------------------------------------------------------
// SerumError
// ---------------------------------------------------------------------------

/// The Serum capability set.
///
/// `code` is the only required capability.  Every other method defaults to
/// "not provided", and the accessor functions in [`crate::access`] degrade
/// accordingly.  Implement this for your own error types to have them read,
/// compared and serialized like an [`ErrorValue`]; hand them to the accessors
/// with [`ErrorRef::serum`].
pub trait SerumError: Error {
    /// Machine-readable, stable error code.
    fn code(&self) -> &str;

    /// Human-readable message, if this type carries one.
    fn message(&self) -> Option<&str> {
        None
    }

    /// Details in their original order.  Preferred over
    /// [`keyed_details`](Self::keyed_details) when both are provided.
    fn ordered_details(&self) -> Option<&[(String, String)]> {
        None
    }

    /// Details as an unordered map.
    fn keyed_details(&self) -> Option<&HashMap<String, String>> {
        None
    }

    /// The next error in the chain.  Defaults to [`Error::source`].
    fn serum_cause(&self) -> Option<ErrorRef<'_>> {
        self.source().map(ErrorRef::probe)
    }
}

// ---------------------------------------------------------------------------
// ErrorRef
// ---------------------------------------------------------------------------

/// A borrowed view of any error, tagged with how much of the Serum capability
/// set it exposes.
#[derive(Clone, Copy)]
pub enum ErrorRef<'a> {
    /// The canonical concrete type.
    Value(&'a ErrorValue),
    /// Some other type implementing [`SerumError`].
    Serum(&'a dyn SerumError),
    /// An error with no Serum capabilities at all.
    Foreign(&'a (dyn Error + 'static)),
}

impl<'a> ErrorRef<'a> {
    /// View a [`SerumError`] implementation.
    pub fn serum(err: &'a dyn SerumError) -> Self {
        Self::Serum(err)
    }

    /// Classify a plain error.  Only [`ErrorValue`] is recognised here, since
    /// the capability trait cannot be detected behind `dyn Error`.
    pub fn probe(err: &'a (dyn Error + 'static)) -> Self {
        match err.downcast_ref::<ErrorValue>() {
            Some(value) => Self::Value(value),
            None => Self::Foreign(err),
        }
    }

    /// The capability set, or `None` for a foreign error.
    pub fn as_serum(self) -> Option<&'a dyn SerumError> {
        match self {
            Self::Value(v) => Some(v),
            Self::Serum(s) => Some(s),
            Self::Foreign(_) => None,
        }
    }

    /// The canonical value, if that is what this view points at.
    pub fn as_value(self) -> Option<&'a ErrorValue> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// `true` unless this is a foreign error.
    pub fn is_serum(self) -> bool {
        !matches!(self, Self::Foreign(_))
    }
}

impl<'a, E: Error + 'static> From<&'a E> for ErrorRef<'a> {
    fn from(err: &'a E) -> Self {
        Self::probe(err)
    }
}

impl fmt::Debug for ErrorRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Serum(s) => f.debug_tuple("Serum").field(&s.to_string()).finish(),
            Self::Foreign(e) => f.debug_tuple("Foreign").field(e).finish(),
        }
    }
}

impl fmt::Display for ErrorRef<'_> {
    /// The error's own display string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => fmt::Display::fmt(v, f),
            Self::Serum(s) => fmt::Display::fmt(s, f),
            Self::Foreign(e) => fmt::Display::fmt(e, f),
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorValue
// ---------------------------------------------------------------------------

/// The canonical Serum error.
///
/// Fields are public so values can be built and inspected directly, but they
/// should not be mutated after construction; nothing synchronizes such
/// writes and the message may have been rendered from the details.
///
/// `PartialEq` compares every field, including details that do not appear
/// in the message.  For the looser "same logical error" check see
/// [`crate::is_equivalent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    /// Machine-readable, stable error code.
    pub code: String,
    /// Human-readable message; may be empty.
    pub message: String,
    /// Ordered details.
    pub details: Details,
    /// The error that caused this one.
    pub cause: Option<Box<ErrorValue>>,
}

impl ErrorValue {
    /// An error carrying only a code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: String::new(),
            details: Vec::new(),
            cause: None,
        }
    }

    /// Start a builder; see [`crate::ErrorBuilder`].
    pub fn builder(code: impl Into<String>) -> crate::ErrorBuilder {
        crate::ErrorBuilder::new(code)
    }

    /// The raw code.  [`crate::code`] substitutes a sentinel for an empty one.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The message; empty if none.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The ordered details.
    pub fn details(&self) -> &[(String, String)] {
        &self.details
    }

    /// The first value recorded under `key`, or `""`.
    pub fn detail(&self, key: &str) -> &str {
        access::detail(self, key)
    }

    /// The cause, if any.
    pub fn cause(&self) -> Option<&ErrorValue> {
        self.cause.as_deref()
    }

    /// Iterate this error and its causes, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &ErrorValue> {
        std::iter::successors(Some(self), |e| e.cause.as_deref())
    }

    /// Single-level equivalence with any error; see [`crate::is_equivalent`].
    pub fn is<'a>(&self, target: impl Into<ErrorRef<'a>>) -> bool {
        crate::is_equivalent(self, target)
    }

    /// `true` for the zero value: no code, message, details or cause.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
            && self.message.is_empty()
            && self.details.is_empty()
            && self.cause.is_none()
    }
}

impl SerumError for ErrorValue {
    fn code(&self) -> &str {
        &self.code
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn ordered_details(&self) -> Option<&[(String, String)]> {
        Some(&self.details)
    }

    fn serum_cause(&self) -> Option<ErrorRef<'_>> {
        self.cause.as_deref().map(ErrorRef::Value)
    }
}

impl fmt::Display for ErrorValue {
    /// `code[: message][: caused by: cause]`; details are not included.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&access::synthesize_string(self))
    }
}

impl Error for ErrorValue {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
