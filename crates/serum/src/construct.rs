// SPDX-License-Identifier: MIT OR Apache-2.0
//! Building [`ErrorValue`]s and coercing foreign errors into one.
//!
//! There are three ways in:
//!
//! - [`error`] with a list of [`ErrorOption`]s, the composable form;
//! - [`ErrorBuilder`], the same options as chained methods;
//! - the [`errorf!`](crate::errorf) macro, for a plain formatted message.
//!
//! Whichever is used, a templated message is rendered last, against every
//! detail added, and a cause is run through [`standardize`] before it is
//! attached.

use std::borrow::Cow;
use std::fmt;

use serum_template::Template;
use tracing::{trace, warn};

use crate::access;
use crate::value::{ErrorRef, ErrorValue};
use crate::DEFAULT_MAX_CAUSE_DEPTH;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// One construction step for [`error`].
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorOption {
    /// Set the message verbatim, replacing any earlier literal message.
    Message(String),
    /// Render the message from the final details once every other option
    /// has been applied.  Overrides any literal message.
    Template(Template),
    /// Append a detail.  Existing entries with the same key are kept.
    Detail(String, String),
    /// Attach an already-standardized cause.
    Cause(Box<ErrorValue>),
}

/// A literal message.
pub fn with_message_literal(message: impl Into<String>) -> ErrorOption {
    ErrorOption::Message(message.into())
}

/// A message rendered from the details, e.g. `"job {{ID}} not found"`.
///
/// The template is parsed here, once.
pub fn with_message_template(template: &str) -> ErrorOption {
    ErrorOption::Template(Template::parse(template))
}

/// One detail.
pub fn with_detail(key: impl Into<String>, value: impl Into<String>) -> ErrorOption {
    ErrorOption::Detail(key.into(), value.into())
}

/// A cause, which may be any error.  It is standardized immediately.
pub fn with_cause<'a>(cause: impl Into<ErrorRef<'a>>) -> ErrorOption {
    ErrorOption::Cause(Box::new(standardize(cause).into_owned()))
}

/// Build an error from a code and options applied in order.
///
/// ```
/// use serum::{error, with_detail, with_message_template};
///
/// let err = error(
///     "demo-error-job-not-found",
///     [with_message_template("job ID {{ID}} not found"), with_detail("ID", "12")],
/// );
/// assert_eq!(err.message(), "job ID 12 not found");
/// ```
pub fn error(code: impl Into<String>, options: impl IntoIterator<Item = ErrorOption>) -> ErrorValue {
    options
        .into_iter()
        .fold(ErrorBuilder::new(code), ErrorBuilder::option)
        .build()
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Chained-method form of [`error`].
///
/// ```
/// use serum::ErrorValue;
///
/// let err = ErrorValue::builder("app-upload-failed")
///     .message("upload failed")
///     .detail("bucket", "photos")
///     .build();
/// assert_eq!(err.detail("bucket"), "photos");
/// ```
#[derive(Debug, Clone)]
#[must_use = "call .build() to obtain the error"]
pub struct ErrorBuilder {
    value: ErrorValue,
    template: Option<Template>,
}

impl ErrorBuilder {
    /// Start with only a code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            value: ErrorValue::new(code),
            template: None,
        }
    }

    /// Set a literal message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.value.message = message.into();
        self
    }

    /// Set a message template.  Only the last template set is used.
    pub fn template(mut self, template: &str) -> Self {
        self.template = Some(Template::parse(template));
        self
    }

    /// Append a detail.
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.value.details.push((key.into(), value.into()));
        self
    }

    /// Attach a cause, standardizing it first.
    pub fn cause<'a>(mut self, cause: impl Into<ErrorRef<'a>>) -> Self {
        self.value.cause = Some(Box::new(standardize(cause).into_owned()));
        self
    }

    /// Apply one [`ErrorOption`].
    pub fn option(mut self, option: ErrorOption) -> Self {
        match option {
            ErrorOption::Message(message) => self.value.message = message,
            ErrorOption::Template(template) => self.template = Some(template),
            ErrorOption::Detail(key, value) => self.value.details.push((key, value)),
            ErrorOption::Cause(cause) => self.value.cause = Some(cause),
        }
        self
    }

    /// Render the template, if any, and return the finished error.
    pub fn build(self) -> ErrorValue {
        let mut value = self.value;
        if let Some(template) = self.template {
            value.message = template.render(&value.details);
        }
        value
    }
}

// ---------------------------------------------------------------------------
// Formatted construction
// ---------------------------------------------------------------------------

/// Build an error whose message is `args`.  Usually reached through
/// [`errorf!`](crate::errorf).
pub fn errorf(code: impl Into<String>, args: fmt::Arguments<'_>) -> ErrorValue {
    ErrorValue {
        message: fmt::format(args),
        ..ErrorValue::new(code)
    }
}

/// [`errorf`] plus a cause, which is standardized before it is attached.
pub fn errorf_wrap<'a>(
    code: impl Into<String>,
    args: fmt::Arguments<'_>,
    cause: impl Into<ErrorRef<'a>>,
) -> ErrorValue {
    ErrorValue {
        cause: Some(Box::new(standardize(cause).into_owned())),
        ..errorf(code, args)
    }
}

// ---------------------------------------------------------------------------
// Standardization
// ---------------------------------------------------------------------------

/// Coerce any error into an [`ErrorValue`].
///
/// An `ErrorValue` comes back borrowed, untouched.  Anything else is copied
/// through the accessors, cause and all, so the result has no ties to the
/// original.  Cause chains longer than [`DEFAULT_MAX_CAUSE_DEPTH`] are cut.
///
/// ```
/// use std::borrow::Cow;
///
/// let io = std::io::Error::other("disk on fire");
/// let standard = serum::standardize(&io);
/// assert!(matches!(standard, Cow::Owned(_)));
/// assert_eq!(standard.message(), "disk on fire");
///
/// // Standardizing again is free.
/// assert!(matches!(serum::standardize(&*standard), Cow::Borrowed(_)));
/// ```
pub fn standardize<'a>(err: impl Into<ErrorRef<'a>>) -> Cow<'a, ErrorValue> {
    standardize_bounded(err.into(), DEFAULT_MAX_CAUSE_DEPTH)
}

/// [`standardize`] for an optional error; `None` stays `None`.
pub fn standardize_opt(err: Option<ErrorRef<'_>>) -> Option<Cow<'_, ErrorValue>> {
    err.map(standardize)
}

/// [`standardize`] with an explicit cap on how many causes are copied.
pub fn standardize_bounded(err: ErrorRef<'_>, max_causes: usize) -> Cow<'_, ErrorValue> {
    match err {
        ErrorRef::Value(value) => Cow::Borrowed(value),
        other => Cow::Owned(copy_chain(other, max_causes)),
    }
}

fn copy_chain(err: ErrorRef<'_>, causes_left: usize) -> ErrorValue {
    let cause = match access::cause(err) {
        Some(_) if causes_left == 0 => {
            warn!(target: "serum.standardize", "cause chain truncated at depth limit");
            None
        }
        Some(cause) => Some(Box::new(
            standardize_bounded(cause, causes_left - 1).into_owned(),
        )),
        None => None,
    };
    let value = ErrorValue {
        code: access::code(err).into_owned(),
        message: access::message(err).into_owned(),
        details: access::details(err).into_owned(),
        cause,
    };
    trace!(target: "serum.standardize", code = %value.code, "standardized foreign error");
    value
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
