//! Writing a [`Message`] in the event-stream text format.
//!
//! Fields are always written in the same order:
//!
//! ```text
//! id: <id>            (only if set)
//! event: <name>       (only if set)
//! retry: <millis>     (only if non-empty)
//! data: <line>        (one per chunk, in order;
//! : <comment>          comments have no field name)
//! <blank line>        (end of event)
//! ```
//!
//! Every output form walks the same sequence of string pieces, so
//! `write_to`, `to_bytes` and `Display` always agree byte for byte.

use std::fmt;
use std::io;
use std::iter;

use crate::message::Chunk;
use crate::{Message, WriteError};

const FIELD_ID: &str = "id: ";
const FIELD_EVENT: &str = "event: ";
const FIELD_RETRY: &str = "retry: ";
const FIELD_DATA: &str = "data: ";
const FIELD_COMMENT: &str = ": ";
const NEWLINE: &str = "\n";

impl Chunk {
    fn field_prefix(&self) -> &'static str {
        if self.is_comment() {
            FIELD_COMMENT
        } else {
            FIELD_DATA
        }
    }
}

impl Message {
    /// The encoded event as a sequence of borrowed pieces.
    fn wire_pieces(&self) -> impl Iterator<Item = &str> {
        let id = self.id.is_set().then(|| [FIELD_ID, self.id.as_str(), NEWLINE]);
        let name = self
            .name
            .is_set()
            .then(|| [FIELD_EVENT, self.name.as_str(), NEWLINE]);
        let retry = (!self.retry_value.is_empty())
            .then(|| [FIELD_RETRY, self.retry_value.as_str(), NEWLINE]);
        let chunks = self
            .chunks
            .iter()
            .map(|chunk| [chunk.field_prefix(), chunk.content(), NEWLINE]);

        id.into_iter()
            .chain(name)
            .chain(retry)
            .chain(chunks)
            .flatten()
            .chain(iter::once(NEWLINE))
    }

    /// The exact number of bytes the encoded event takes.
    pub fn encoded_len(&self) -> usize {
        self.wire_pieces().map(str::len).sum()
    }

    /// Writes the event to `w` and returns the number of bytes written.
    ///
    /// The event is written piece by piece, without building it in memory
    /// first. The first error from `w` aborts the write; the returned
    /// [`WriteError`] says how many bytes `w` had accepted by then. Failed
    /// writes are never retried, `Interrupted` included.
    pub fn write_to<W>(&self, w: &mut W) -> Result<u64, WriteError>
    where
        W: io::Write + ?Sized,
    {
        let mut written = 0;
        for piece in self.wire_pieces() {
            let mut buf = piece.as_bytes();
            while !buf.is_empty() {
                match w.write(buf) {
                    Ok(0) => {
                        return Err(write_failed(written, io::ErrorKind::WriteZero.into()));
                    }
                    Ok(n) => {
                        written += n as u64;
                        buf = &buf[n..];
                    }
                    Err(source) => return Err(write_failed(written, source)),
                }
            }
        }
        Ok(written)
    }

    /// Like [`write_to`](Self::write_to), for tokio's async writers.
    #[cfg(feature = "tokio")]
    pub async fn write_to_async<W>(&self, w: &mut W) -> Result<u64, WriteError>
    where
        W: tokio::io::AsyncWrite + Unpin + ?Sized,
    {
        use tokio::io::AsyncWriteExt;

        let mut written = 0;
        for piece in self.wire_pieces() {
            let mut buf = piece.as_bytes();
            while !buf.is_empty() {
                match w.write(buf).await {
                    Ok(0) => {
                        return Err(write_failed(written, io::ErrorKind::WriteZero.into()));
                    }
                    Ok(n) => {
                        written += n as u64;
                        buf = &buf[n..];
                    }
                    Err(source) => return Err(write_failed(written, source)),
                }
            }
        }
        Ok(written)
    }

    /// Returns the encoded event as bytes.
    ///
    /// Marshalling then unmarshalling yields an event with the same
    /// fields; the topic and expiry time are lost. Use the serde
    /// implementation to keep them.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        for piece in self.wire_pieces() {
            buf.extend_from_slice(piece.as_bytes());
        }
        buf
    }
}

fn write_failed(written: u64, source: io::Error) -> WriteError {
    tracing::debug!(written, error = %source, "event write failed");
    WriteError { written, source }
}

/// Formats the encoded event. `to_string()` therefore gives the wire text.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.wire_pieces().try_for_each(|piece| f.write_str(piece))
    }
}
