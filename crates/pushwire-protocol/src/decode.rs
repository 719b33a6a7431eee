//! Reading a [`Message`] back from the event-stream text format.

use pushwire_parser::{FieldName, FieldParser};
use tracing::{debug, trace};

use crate::message::Chunk;
use crate::{EventId, EventName, Message, UnmarshalError, UnmarshalReason};

impl Message {
    /// Replaces the message's event with the first event found in `text`.
    ///
    /// The id, name, retry value and chunks are cleared first; the topic
    /// and expiry time are kept, since they are not event fields.
    ///
    /// Fields with unknown names are ignored. An `id` containing NUL is
    /// ignored too, as clients would. Decoding fails if:
    ///
    /// - no valid field is found, or the last field is not followed by the
    ///   event's blank line ([`UnmarshalReason::UnexpectedEof`]);
    /// - a `retry` value has a non-digit ([`UnmarshalReason::InvalidRetry`]).
    ///
    /// On failure every event field is cleared again: nothing from the
    /// failed attempt survives. Text after the first event is ignored.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD before parsing.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), UnmarshalError> {
        let text = String::from_utf8_lossy(text);
        let mut parser = FieldParser::new(&text);
        self.decode_from(&mut parser)
    }

    /// Decodes the first event in `text` into a new message.
    pub fn parse(text: &[u8]) -> Result<Self, UnmarshalError> {
        let mut msg = Self::new();
        msg.unmarshal_text(text)?;
        Ok(msg)
    }

    /// Decodes the next event from an existing tokenizer.
    ///
    /// Enables comment retention on `parser`. On success the parser is
    /// left right after the event's blank line, so calling this in a loop
    /// walks a stream of events.
    pub fn from_field_parser(parser: &mut FieldParser<'_>) -> Result<Self, UnmarshalError> {
        let mut msg = Self::new();
        msg.decode_from(parser)?;
        Ok(msg)
    }

    fn decode_from(&mut self, parser: &mut FieldParser<'_>) -> Result<(), UnmarshalError> {
        self.reset();
        parser.keep_comments(true);

        let result = self.read_fields(parser);
        if let Err(err) = &result {
            debug!(error = %err, "event decode failed");
            self.reset();
        }
        result
    }

    fn read_fields(&mut self, parser: &mut FieldParser<'_>) -> Result<(), UnmarshalError> {
        while let Some(field) = parser.next_field() {
            trace!(name = %field.name, value = field.value, "decoding field");

            match field.name {
                FieldName::Retry => {
                    if let Some(c) = field.value.chars().find(|c| !c.is_ascii_digit()) {
                        return Err(UnmarshalError::for_field(
                            UnmarshalReason::InvalidRetry(c),
                            FieldName::Retry.as_str(),
                            field.value,
                        ));
                    }
                    self.retry_value = field.value.to_owned();
                }
                FieldName::Data => self.push_chunk(Chunk::new(field.value, false)),
                FieldName::Comment => self.push_chunk(Chunk::new(field.value, true)),
                FieldName::Event => self.name = EventName::from_wire(field.value),
                FieldName::Id => {
                    if field.value.contains('\0') {
                        debug!(value = field.value, "ignoring event id containing NUL");
                        continue;
                    }
                    self.id = EventId::from_wire(field.value);
                }
                FieldName::EventEnd => break,
            }
        }

        if let Some(err) = parser.err() {
            return Err(err.into());
        }
        if self.is_empty() {
            return Err(UnmarshalError::new(UnmarshalReason::UnexpectedEof));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_pairs(msg: &Message) -> Vec<(&str, bool)> {
        msg.chunks()
            .iter()
            .map(|c| (c.content(), c.is_comment()))
            .collect()
    }

    // =====================================================================
    // Successful decodes
    // =====================================================================

    #[test]
    fn test_decode_every_field() {
        let msg = Message::parse(b"id: 1\nevent: e\nretry: 30\ndata: d\n: c\n\n").unwrap();

        assert_eq!(msg.id().get(), Some("1"));
        assert_eq!(msg.name().get(), Some("e"));
        assert_eq!(msg.retry_value(), "30");
        assert_eq!(chunk_pairs(&msg), [("d", false), ("c", true)]);
    }

    #[test]
    fn test_last_id_name_and_retry_win() {
        let msg = Message::parse(
            b"id: 1\nid: 2\nevent: a\nevent: b\nretry: 1\nretry: 2\ndata: x\n\n",
        )
        .unwrap();

        assert_eq!(msg.id().as_str(), "2");
        assert_eq!(msg.name().as_str(), "b");
        assert_eq!(msg.retry_value(), "2");
    }

    #[test]
    fn test_empty_values_are_set() {
        let msg = Message::parse(b"id: \nevent: \n\n").unwrap();

        assert_eq!(msg.id().get(), Some(""));
        assert_eq!(msg.name().get(), Some(""));
        assert!(msg.chunks().is_empty());
    }

    #[test]
    fn test_id_with_nul_is_dropped_silently() {
        let msg = Message::parse(b"id: ab\0cd\ndata: y\n\n").unwrap();

        assert!(!msg.id().is_set());
        assert_eq!(chunk_pairs(&msg), [("y", false)]);
    }

    #[test]
    fn test_id_with_nul_keeps_previous_id() {
        let msg = Message::parse(b"id: ok\nid: a\0b\ndata: y\n\n").unwrap();
        assert_eq!(msg.id().get(), Some("ok"));
    }

    #[test]
    fn test_only_first_event_is_decoded() {
        let msg = Message::parse(b"data: first\n\ndata: second\n\n").unwrap();
        assert_eq!(chunk_pairs(&msg), [("first", false)]);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let msg = Message::parse(b"foo: bar\ndata: x\n\n").unwrap();
        assert_eq!(chunk_pairs(&msg), [("x", false)]);
    }

    #[test]
    fn test_retry_only_event_is_valid() {
        let msg = Message::parse(b"retry: 5000\n\n").unwrap();
        assert_eq!(msg.retry_value(), "5000");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let msg = Message::parse(b"data: a\xffb\n\n").unwrap();
        assert_eq!(msg.chunks()[0].content(), "a\u{fffd}b");
    }

    // =====================================================================
    // Failures
    // =====================================================================

    #[test]
    fn test_invalid_retry_names_field_value_and_character() {
        let err = Message::parse(b"retry: 12a3\ndata: x\n\n").unwrap_err();

        assert_eq!(err.field_name(), "retry");
        assert_eq!(err.field_value(), "12a3");
        assert_eq!(err.reason(), UnmarshalReason::InvalidRetry('a'));
    }

    #[test]
    fn test_invalid_retry_reports_non_ascii_character() {
        let err = Message::parse("retry: 1é\n\n".as_bytes()).unwrap_err();
        assert_eq!(err.reason(), UnmarshalReason::InvalidRetry('é'));
    }

    #[test]
    fn test_negative_retry_is_rejected() {
        let err = Message::parse(b"retry: -1\n\n").unwrap_err();
        assert_eq!(err.reason(), UnmarshalReason::InvalidRetry('-'));
    }

    #[test]
    fn test_missing_terminator_is_unexpected_eof() {
        let err = Message::parse(b"data: x\n").unwrap_err();
        assert!(err.is_unexpected_eof());
        assert_eq!(err.field_name(), "");
    }

    #[test]
    fn test_missing_final_newline_is_unexpected_eof() {
        let err = Message::parse(b"data: x").unwrap_err();
        assert!(err.is_unexpected_eof());
    }

    #[test]
    fn test_truncated_text_after_first_event_is_not_inspected() {
        let msg = Message::parse(b"data: x\n\ndata").unwrap();
        assert_eq!(chunk_pairs(&msg), [("x", false)]);
    }

    #[test]
    fn test_empty_input_is_unexpected_eof() {
        let err = Message::parse(b"").unwrap_err();
        assert!(err.is_unexpected_eof());
    }

    #[test]
    fn test_blank_event_is_unexpected_eof() {
        let err = Message::parse(b"\n").unwrap_err();
        assert!(err.is_unexpected_eof());
    }

    #[test]
    fn test_only_unknown_fields_is_unexpected_eof() {
        let err = Message::parse(b"foo: bar\n\n").unwrap_err();
        assert!(err.is_unexpected_eof());
    }

    // =====================================================================
    // Reset discipline
    // =====================================================================

    #[test]
    fn test_failed_decode_resets_event_fields() {
        let mut msg = Message::new();
        msg.topic = "kept".into();
        msg.append_data(["old"]);
        msg.set_id(EventId::new("old").unwrap());

        let err = msg.unmarshal_text(b"data: new\nretry: 1x\n\n").unwrap_err();

        assert_eq!(err.field_name(), "retry");
        assert!(msg.is_empty());
        assert_eq!(msg.topic, "kept");
    }

    #[test]
    fn test_truncated_decode_discards_collected_chunks() {
        let mut msg = Message::new();
        let err = msg.unmarshal_text(b"id: 1\ndata: a\ndata: b\n").unwrap_err();

        assert!(err.is_unexpected_eof());
        assert!(msg.is_empty());
    }

    #[test]
    fn test_successful_decode_replaces_previous_event() {
        let mut msg = Message::new();
        msg.set_name(EventName::new("old").unwrap());
        msg.append_data(["old"]);

        msg.unmarshal_text(b"data: new\n\n").unwrap();

        assert!(!msg.name().is_set());
        assert_eq!(chunk_pairs(&msg), [("new", false)]);
    }

    #[test]
    fn test_decode_does_not_disturb_clone() {
        let mut msg = Message::new();
        msg.append_data(["shared"]);
        let clone = msg.clone();

        msg.unmarshal_text(b"data: other\n\n").unwrap();

        assert_eq!(chunk_pairs(&clone), [("shared", false)]);
    }

    // =====================================================================
    // Streams
    // =====================================================================

    #[test]
    fn test_from_field_parser_walks_a_stream() {
        let mut parser = FieldParser::new("data: a\n\n: ping\n\nid: 3\ndata: b\n\n");

        let first = Message::from_field_parser(&mut parser).unwrap();
        let second = Message::from_field_parser(&mut parser).unwrap();
        let third = Message::from_field_parser(&mut parser).unwrap();

        assert_eq!(chunk_pairs(&first), [("a", false)]);
        assert_eq!(chunk_pairs(&second), [("ping", true)]);
        assert_eq!(third.id().as_str(), "3");
        assert!(parser.remaining().is_empty());
        assert!(Message::from_field_parser(&mut parser).unwrap_err().is_unexpected_eof());
    }
}
