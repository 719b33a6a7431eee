//! Server-sent event messages and their wire format.
//!
//! This crate defines the event a server pushes to its clients and the
//! codec between that event and the `text/event-stream` bytes:
//!
//! - **Types** ([`Message`], [`Chunk`], [`EventId`], [`EventName`],
//!   [`FieldValue`]) — one event plus its server-side metadata.
//! - **Encoding** ([`Message::write_to`], [`Message::to_bytes`], `Display`)
//!   — fixed field order, newline-normalized data lines.
//! - **Decoding** ([`Message::unmarshal_text`], [`Message::parse`]) — one
//!   event per call, all-or-nothing.
//! - **Errors** ([`UnmarshalError`], [`WriteError`], [`FieldError`]).
//!
//! # Architecture
//!
//! The protocol layer sits on top of the parser crate's tokenizer and
//! below whatever moves bytes (an HTTP response body, a replay buffer).
//! It never performs I/O itself: encoding writes into a caller-supplied
//! sink, decoding reads from a caller-supplied byte slice.
//!
//! ```text
//! Message ──write_to──▶ bytes ──unmarshal_text──▶ Message
//! ```
//!
//! # Feature Flags
//!
//! - `json` (default) — [`Message::to_json`] / [`Message::from_json`]
//!   via `serde_json`
//! - `tokio` — [`Message::write_to_async`] for tokio's `AsyncWrite`

mod decode;
mod encode;
mod error;
mod field;
mod message;
mod stored;

#[cfg(feature = "json")]
pub use error::JsonError;
pub use error::{FieldError, UnmarshalError, UnmarshalReason, WriteError};
pub use field::{EventId, EventName, FieldValue};
pub use message::{Chunk, Message};
