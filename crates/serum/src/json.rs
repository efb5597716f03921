// SPDX-License-Identifier: MIT OR Apache-2.0
//! Order-preserving JSON encoding.
//!
//! The wire shape is
//!
//! ```text
//! {"code": "...", "message": "...", "details": {"k": "v", ...}, "cause": {...}}
//! ```
//!
//! with members in exactly that order.  `message`, `details` and `cause` are
//! left out when empty.  Detail members appear in the error's own order,
//! duplicates included.
//!
//! Any error can be encoded, not only [`ErrorValue`]: whatever capabilities
//! it lacks are filled in by the accessors, so encoding a foreign error gives
//! the same bytes as encoding its [standardized](crate::standardize) form.
//! Decoding always yields an [`ErrorValue`].

use std::borrow::Cow;
use std::fmt;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;
use tracing::{debug, warn};

use crate::access;
use crate::value::{Details, ErrorRef, ErrorValue};
use crate::DEFAULT_MAX_CAUSE_DEPTH;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from encoding or decoding.
#[derive(Debug, Error)]
pub enum JsonError {
    /// The serializer failed.
    #[error("failed to encode error as JSON: {0}")]
    Encode(#[source] serde_json::Error),

    /// The input is not a valid serialized error.
    #[error("cannot decode error from JSON {shape}: {source}")]
    Decode {
        /// What the input looked like: `object`, `array`, `string`, ...
        shape: &'static str,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Encoding options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    /// How many causes of non-canonical errors to follow before the chain
    /// is cut.  Causes owned by an [`ErrorValue`] are always encoded.
    pub max_cause_depth: usize,
    /// Indent the output.
    pub pretty: bool,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            max_cause_depth: DEFAULT_MAX_CAUSE_DEPTH,
            pretty: false,
        }
    }
}

impl Codec {
    /// Encode any error to bytes.
    pub fn encode<'a>(&self, err: impl Into<ErrorRef<'a>>) -> Result<Vec<u8>, JsonError> {
        let wire = Wire::new(err.into(), self.max_cause_depth);
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&wire)
        } else {
            serde_json::to_vec(&wire)
        };
        bytes.map_err(JsonError::Encode)
    }

    /// Encode any error to a string.
    pub fn encode_to_string<'a>(&self, err: impl Into<ErrorRef<'a>>) -> Result<String, JsonError> {
        let wire = Wire::new(err.into(), self.max_cause_depth);
        let text = if self.pretty {
            serde_json::to_string_pretty(&wire)
        } else {
            serde_json::to_string(&wire)
        };
        text.map_err(JsonError::Encode)
    }

    /// Decode an error.
    pub fn decode(&self, bytes: &[u8]) -> Result<ErrorValue, JsonError> {
        serde_json::from_slice(bytes).map_err(|source| {
            let shape = shape_of(bytes);
            debug!(target: "serum.json", shape, error = %source, "decode failed");
            JsonError::Decode { shape, source }
        })
    }
}

/// Encode any error compactly.
pub fn to_json<'a>(err: impl Into<ErrorRef<'a>>) -> Result<Vec<u8>, JsonError> {
    Codec::default().encode(err)
}

/// Encode any error compactly, as a string.
pub fn to_string<'a>(err: impl Into<ErrorRef<'a>>) -> Result<String, JsonError> {
    Codec::default().encode_to_string(err)
}

/// Encode any error with indentation.  Member order is unchanged.
pub fn to_json_pretty<'a>(err: impl Into<ErrorRef<'a>>) -> Result<String, JsonError> {
    Codec {
        pretty: true,
        ..Codec::default()
    }
    .encode_to_string(err)
}

/// Decode an error from bytes.
pub fn from_json(bytes: &[u8]) -> Result<ErrorValue, JsonError> {
    Codec::default().decode(bytes)
}

/// Decode an error from a string.
pub fn from_str(text: &str) -> Result<ErrorValue, JsonError> {
    from_json(text.as_bytes())
}

/// `true` if both errors encode to the same bytes.
///
/// This is full-content equality for arbitrary errors, details included.
/// An encoding failure on either side counts as a mismatch.
pub fn same_encoding<'a, 'b>(a: impl Into<ErrorRef<'a>>, b: impl Into<ErrorRef<'b>>) -> bool {
    match (to_json(a), to_json(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Classify input by its first significant byte, for error reports.
fn shape_of(bytes: &[u8]) -> &'static str {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        None => "empty input",
        Some(b'{') => "object",
        Some(b'[') => "array",
        Some(b'"') => "string",
        Some(b'-' | b'0'..=b'9') => "number",
        Some(b't' | b'f') => "boolean",
        Some(b'n') => "null",
        Some(_) => "non-JSON input",
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Serializable view of any error with a bounded cause walk.
struct Wire<'a> {
    err: ErrorRef<'a>,
    causes_left: usize,
}

impl<'a> Wire<'a> {
    fn new(err: ErrorRef<'a>, causes_left: usize) -> Self {
        Self { err, causes_left }
    }
}

impl Serialize for Wire<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let code = access::code(self.err);
        let message = access::message(self.err);
        let details = access::details(self.err);
        // A zero-value cause carries nothing worth encoding.
        let cause = access::cause(self.err)
            .filter(|cause| !cause.as_value().is_some_and(ErrorValue::is_empty));
        // An `ErrorValue` owns its chain, so only other levels count
        // against the cap.
        let bounded = !matches!(self.err, ErrorRef::Value(_));
        let cause = match cause {
            Some(_) if bounded && self.causes_left == 0 => {
                warn!(target: "serum.json", code = %code, "cause chain truncated at depth limit");
                None
            }
            other => other,
        };
        let causes_left = if bounded {
            self.causes_left.saturating_sub(1)
        } else {
            self.causes_left
        };

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("code", &code)?;
        if !message.is_empty() {
            map.serialize_entry("message", &message)?;
        }
        if !details.is_empty() {
            map.serialize_entry("details", &OrderedDetails(&details))?;
        }
        if let Some(cause) = cause {
            map.serialize_entry("cause", &Wire::new(cause, causes_left))?;
        }
        map.end()
    }
}

/// Details as a JSON object in sequence order.
struct OrderedDetails<'a>(&'a [(String, String)]);

impl Serialize for OrderedDetails<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl Serialize for ErrorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Wire::new(ErrorRef::Value(self), DEFAULT_MAX_CAUSE_DEPTH).serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

impl<'de> Deserialize<'de> for ErrorValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ErrorValueVisitor)
    }
}

struct ErrorValueVisitor;

impl<'de> Visitor<'de> for ErrorValueVisitor {
    type Value = ErrorValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an error object with a \"code\" member")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ErrorValue, A::Error> {
        let mut code: Option<String> = None;
        let mut message = String::new();
        let mut details = Details::new();
        let mut cause = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "code" => code = Some(map.next_value()?),
                "message" => message = map.next_value::<Option<String>>()?.unwrap_or_default(),
                "details" => {
                    details = map
                        .next_value::<Option<DetailsSeq>>()?
                        .map(|d| d.0)
                        .unwrap_or_default()
                }
                "cause" => cause = map.next_value::<Option<ErrorValue>>()?.map(Box::new),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(ErrorValue {
            code: code.ok_or_else(|| de::Error::missing_field("code"))?,
            message,
            details,
            cause,
        })
    }
}

/// The `details` member, read in document order.
struct DetailsSeq(Details);

impl<'de> Deserialize<'de> for DetailsSeq {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DetailsVisitor)
    }
}

struct DetailsVisitor;

impl<'de> Visitor<'de> for DetailsVisitor {
    type Value = DetailsSeq;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("details field must be a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<DetailsSeq, A::Error> {
        let mut details = Details::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
            match value {
                serde_json::Value::String(value) => details.push((key, value)),
                _ => {
                    return Err(de::Error::custom(
                        "only strings are permitted in details map values",
                    ));
                }
            }
        }
        Ok(DetailsSeq(details))
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Schema of the wire shape.  Written by hand because the details map and
/// the omitted members are not visible to a derive.
impl JsonSchema for ErrorValue {
    fn schema_name() -> Cow<'static, str> {
        "SerumError".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "object",
            "required": ["code"],
            "properties": {
                "code": { "type": "string", "minLength": 1 },
                "message": { "type": "string" },
                "details": {
                    "type": "object",
                    "additionalProperties": { "type": "string" }
                },
                "cause": generator.subschema_for::<ErrorValue>()
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
