//! Reads an event stream on stdin, decodes every event and writes it back
//! out on stdout in canonical form.
//!
//! ```text
//! printf 'data: a\r\ndata: b\r\n\r\n:ping\n\n' | cargo run -p event-echo
//! ```
//!
//! Newlines come out as LF, field order is normalized, and invalid events
//! are reported on stderr. Set `RUST_LOG=debug` (or `trace`) to see what
//! the decoder does with each field.

use pushwire::prelude::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut input = Vec::new();
    tokio::io::stdin().read_to_end(&mut input).await?;
    let text = String::from_utf8_lossy(&input);

    let mut stdout = tokio::io::stdout();
    let (echoed, skipped) = echo_events(&text, &mut stdout).await?;
    stdout.flush().await?;

    tracing::info!(echoed, skipped, "stream finished");
    Ok(())
}

/// Decodes events from `text` one after another and re-encodes each into
/// `out`. Returns how many events were echoed and how many were skipped.
async fn echo_events<W>(text: &str, out: &mut W) -> Result<(usize, usize), PushwireError>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    let mut parser = FieldParser::new(text);
    let (mut echoed, mut skipped) = (0, 0);

    while !parser.remaining().is_empty() {
        match Message::from_field_parser(&mut parser) {
            Ok(msg) => {
                let written = msg.write_to_async(&mut *out).await?;
                tracing::debug!(written, chunks = msg.chunks().len(), "event echoed");
                echoed += 1;
            }
            // The tokenizer itself failed: the stream was cut off mid-event.
            Err(err) if parser.err().is_some() => {
                tracing::warn!(error = %err, "stream ended inside an event");
                skipped += 1;
                break;
            }
            Err(err) => {
                // A bad retry stops the decoder mid-event; anything else
                // means the event was blank and its terminator is consumed.
                if let UnmarshalReason::InvalidRetry(_) = err.reason() {
                    tracing::warn!(error = %err, "skipping invalid event");
                    skip_to_event_end(&mut parser);
                } else {
                    tracing::debug!("skipping empty event");
                }
                skipped += 1;
            }
        }
    }

    Ok((echoed, skipped))
}

/// Advances `parser` past the current event, if it stopped inside one.
fn skip_to_event_end(parser: &mut FieldParser<'_>) {
    while let Some(field) = parser.next_field() {
        if field.name == FieldName::EventEnd {
            break;
        }
    }
}
