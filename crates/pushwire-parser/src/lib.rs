//! Low-level scanners for the server-sent events text format.
//!
//! - [`next_chunk`], [`newline_index`], [`Lines`] — split text on LF, CR
//!   or CRLF, treating the terminators as equivalent.
//! - [`FieldParser`] — tokenizes event-stream text into `name: value`
//!   fields and event boundaries.
//!
//! Neither scanner allocates: every returned string borrows from the
//! input.

mod error;
mod field;
mod lines;

pub use error::ParseError;
pub use field::{Field, FieldName, FieldParser};
pub use lines::{is_single_line, newline_index, next_chunk, Lines};
