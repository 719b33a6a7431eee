//! The [`Message`] type and its builder operations.
//!
//! A message is one server-sent event plus two pieces of server-side
//! metadata (its topic and expiry time) that never go on the wire.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use pushwire_parser::Lines;
use serde::{Deserialize, Serialize};

use crate::stored::StoredMessage;
use crate::{EventId, EventName};

// ---------------------------------------------------------------------------
// Chunk
// ---------------------------------------------------------------------------

/// One line of an event's content: a `data` field or a comment.
///
/// The content never contains CR or LF. Chunks can only be created by
/// [`Message`], which splits its input into lines first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chunk {
    content: String,
    is_comment: bool,
}

impl Chunk {
    pub(crate) fn new(content: impl Into<String>, is_comment: bool) -> Self {
        Self {
            content: content.into(),
            is_comment,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_comment(&self) -> bool {
        self.is_comment
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single event sent from the server to its clients, together with the
/// metadata the server needs to route and expire it.
///
/// `topic` and `expires_at` are public because they are plain server-side
/// data; the event fields go through methods that keep them valid.
///
/// ## Cloning
///
/// `clone()` is cheap: the clone shares the chunk history with the
/// original through an [`Arc`]. Chunks are never modified or removed once
/// appended, and the first append on a side whose history is still shared
/// copies it first, so appending to one message never shows up in the
/// other.
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
/// use pushwire_protocol::{EventName, Message};
///
/// let mut msg = Message::new();
/// msg.set_name(EventName::new("greeting").unwrap());
/// msg.set_retry(Duration::from_secs(3));
/// msg.append_data(["hello\nworld"]);
///
/// assert_eq!(
///     msg.to_string(),
///     "event: greeting\nretry: 3000\ndata: hello\ndata: world\n\n"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "StoredMessage", try_from = "StoredMessage")]
pub struct Message {
    /// Routing key: clients only receive messages of topics they subscribed to.
    pub topic: String,

    /// When replaying history, expired messages are skipped.
    /// `None` means the message never expires.
    pub expires_at: Option<SystemTime>,

    pub(crate) id: EventId,
    pub(crate) name: EventName,
    pub(crate) chunks: Arc<Vec<Chunk>>,
    pub(crate) retry_value: String,
}

impl Message {
    /// Creates an empty message: no fields set, no chunks.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder --

    /// Appends `data` lines built from each string, in order.
    ///
    /// Each string is split on LF, CR and CRLF and every resulting line
    /// becomes its own `data` field. Clients join data lines with LF, so
    /// any other newline style in the payload comes out as LF on the other
    /// side. An empty string appends nothing.
    ///
    /// The format cannot carry raw binary data; encode it first (e.g. as
    /// Base64) so it contains no CR or LF.
    pub fn append_data<I, S>(&mut self, chunks: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.append_text(false, chunks);
    }

    /// Appends comment lines, split the same way as [`append_data`](Self::append_data).
    pub fn comment<I, S>(&mut self, comments: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.append_text(true, comments);
    }

    /// Tells the client to wait `duration` before reconnecting.
    ///
    /// Stored as whole milliseconds; sub-millisecond precision is dropped.
    pub fn set_retry(&mut self, duration: Duration) {
        self.retry_value = duration.as_millis().to_string();
    }

    pub fn set_id(&mut self, id: EventId) {
        self.id = id;
    }

    pub fn set_name(&mut self, name: EventName) {
        self.name = name;
    }

    fn append_text<I, S>(&mut self, is_comment: bool, chunks: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for text in chunks {
            for line in Lines::new(text.as_ref()) {
                self.push_chunk(Chunk::new(line, is_comment));
            }
        }
    }

    /// Appends one chunk, copying the history first if a clone shares it.
    pub(crate) fn push_chunk(&mut self, chunk: Chunk) {
        Arc::make_mut(&mut self.chunks).push(chunk);
    }

    /// Clears every event field. Topic and expiry are kept.
    pub(crate) fn reset(&mut self) {
        self.chunks = Arc::default();
        self.name = EventName::unset();
        self.id = EventId::unset();
        self.retry_value.clear();
    }

    // -- Accessors --

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn name(&self) -> &EventName {
        &self.name
    }

    /// The data and comment lines, in the order they were added.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The raw `retry` value in milliseconds, or `""` if unset.
    pub fn retry_value(&self) -> &str {
        &self.retry_value
    }

    /// `true` if no event field is set and there are no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
            && !self.name.is_set()
            && !self.id.is_set()
            && self.retry_value.is_empty()
    }

    /// `true` if the message has an expiry time and it is not after `now`.
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
