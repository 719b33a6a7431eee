//! # pushwire
//!
//! Wire-format codec for server-sent events.
//!
//! Build a [`Message`](prelude::Message), write it to any byte sink, and
//! parse the bytes back:
//!
//! ```rust
//! use pushwire::prelude::*;
//!
//! let mut msg = Message::new();
//! msg.set_id(EventId::new("1").unwrap());
//! msg.append_data(["line one\r\nline two"]);
//!
//! let bytes = msg.to_bytes();
//! assert_eq!(bytes, b"id: 1\ndata: line one\ndata: line two\n\n");
//!
//! let decoded = Message::parse(&bytes)?;
//! assert_eq!(decoded.chunks().len(), 2);
//! # Ok::<(), PushwireError>(())
//! ```
//!
//! This crate re-exports the pieces of the layered crates:
//!
//! - `pushwire-parser` — line splitting and field tokenizing
//! - `pushwire-protocol` — messages, encoder, decoder

mod error;

pub use error::PushwireError;
pub use pushwire_parser as parser;
pub use pushwire_protocol as protocol;

/// Everything needed to build, encode and decode events.
pub mod prelude {
    pub use crate::PushwireError;
    pub use pushwire_parser::{Field, FieldName, FieldParser, ParseError};
    #[cfg(feature = "json")]
    pub use pushwire_protocol::JsonError;
    pub use pushwire_protocol::{
        Chunk, EventId, EventName, FieldError, FieldValue, Message, UnmarshalError,
        UnmarshalReason, WriteError,
    };
}
