//! Error types for the protocol layer.
//!
//! Decoding and encoding fail in different ways, so they get different
//! types: a decode failure is an [`UnmarshalError`] describing what was
//! wrong with the input, an encode failure is a [`WriteError`] wrapping
//! whatever the byte sink reported.

use std::fmt;
use std::io;

use pushwire_parser::ParseError;

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Why decoding an event failed.
///
/// Match on this to tell failure categories apart, e.g. a truncated
/// stream from a malformed `retry` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnmarshalReason {
    /// The input held no usable fields, or its last field was not
    /// terminated.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A `retry` value contained something other than ASCII digits.
    /// Carries the first offending character.
    #[error("contains character {0:?}, which is not an ASCII digit")]
    InvalidRetry(char),
}

impl From<ParseError> for UnmarshalReason {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnexpectedEof => Self::UnexpectedEof,
        }
    }
}

/// The error returned by [`Message::unmarshal_text`](crate::Message::unmarshal_text).
///
/// The reason is always present. If the failure is about one specific
/// field, the field's name and raw value are carried too; otherwise both
/// are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmarshalError {
    reason: UnmarshalReason,
    field_name: &'static str,
    field_value: String,
}

impl UnmarshalError {
    /// A failure not tied to any field.
    pub fn new(reason: UnmarshalReason) -> Self {
        Self {
            reason,
            field_name: "",
            field_value: String::new(),
        }
    }

    /// A failure caused by the field `name` with raw value `value`.
    pub fn for_field(
        reason: UnmarshalReason,
        name: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self {
            reason,
            field_name: name,
            field_value: value.into(),
        }
    }

    pub fn reason(&self) -> UnmarshalReason {
        self.reason
    }

    /// The offending field's name, or `""`.
    pub fn field_name(&self) -> &str {
        self.field_name
    }

    /// The offending field's raw value, or `""`.
    pub fn field_value(&self) -> &str {
        &self.field_value
    }

    /// Shorthand for `reason() == UnmarshalReason::UnexpectedEof`.
    pub fn is_unexpected_eof(&self) -> bool {
        self.reason == UnmarshalReason::UnexpectedEof
    }
}

impl From<ParseError> for UnmarshalError {
    fn from(err: ParseError) -> Self {
        Self::new(err.into())
    }
}

impl fmt::Display for UnmarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field_name.is_empty() {
            write!(f, "unmarshal event error: {}", self.reason)
        } else {
            write!(
                f,
                "unmarshal event error, {} field invalid: {}. contents: {}",
                self.field_name, self.reason, self.field_value
            )
        }
    }
}

impl std::error::Error for UnmarshalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// The byte sink failed while a message was being written.
///
/// `written` counts the bytes the sink accepted before it failed, so the
/// caller knows exactly how much of the event went out.
#[derive(Debug, thiserror::Error)]
#[error("write failed after {written} bytes: {source}")]
pub struct WriteError {
    pub written: u64,
    #[source]
    pub source: io::Error,
}

// ---------------------------------------------------------------------------
// Field construction
// ---------------------------------------------------------------------------

/// A value was rejected when building an [`EventId`](crate::EventId) or
/// [`EventName`](crate::EventName).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The value spans more than one line.
    #[error("invalid event {field}: value must not contain newlines")]
    Newline { field: &'static str },

    /// The value contains a NUL byte. Only IDs reject these.
    #[error("invalid event {field}: value must not contain NUL bytes")]
    Nul { field: &'static str },
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Errors from [`Message::to_json`](crate::Message::to_json) and
/// [`Message::from_json`](crate::Message::from_json).
#[cfg(feature = "json")]
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    /// Serializing the message failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The JSON was malformed, or its embedded event did not decode.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
