//! Unified error type for the pushwire crates.

#[cfg(feature = "json")]
use pushwire_protocol::JsonError;
use pushwire_parser::ParseError;
use pushwire_protocol::{FieldError, UnmarshalError, WriteError};

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes let `?` convert errors from any layer, so an
/// application that decodes, validates and re-encodes events can use this
/// single type throughout.
#[derive(Debug, thiserror::Error)]
pub enum PushwireError {
    /// The tokenizer hit the end of its input mid-event.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An event could not be decoded.
    #[error(transparent)]
    Unmarshal(#[from] UnmarshalError),

    /// The byte sink failed while an event was being written.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// An event ID or name was rejected.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A stored message could not be converted to or from JSON.
    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] JsonError),
}
