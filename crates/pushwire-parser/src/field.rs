//! Field tokenizer.
//!
//! Turns raw event-stream text into a sequence of [`Field`]s, one per
//! line. A blank line is reported as [`FieldName::EventEnd`] so callers
//! can tell where one event stops and the next one starts.

use std::fmt;

use crate::lines::next_chunk;
use crate::ParseError;

const BOM: char = '\u{feff}';

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// The name of a field, restricted to the names the protocol defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    /// `data: ...`
    Data,
    /// `event: ...`, the event's name.
    Event,
    /// `retry: ...`, the reconnection delay in milliseconds.
    Retry,
    /// `id: ...`
    Id,
    /// `: ...`, a line with an empty field name.
    Comment,
    /// A blank line: the end of the current event.
    EventEnd,
}

impl FieldName {
    /// Maps a raw field name to a known one. Unknown names yield `None`.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "data" => Some(Self::Data),
            "event" => Some(Self::Event),
            "retry" => Some(Self::Retry),
            "id" => Some(Self::Id),
            "" => Some(Self::Comment),
            _ => None,
        }
    }

    /// The name as written on the wire. Comments and event ends have none.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Event => "event",
            Self::Retry => "retry",
            Self::Id => "id",
            Self::Comment | Self::EventEnd => "",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tokenized line. `value` borrows from the parser's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub name: FieldName,
    pub value: &'a str,
}

impl<'a> Field<'a> {
    /// Splits a non-empty line into a field.
    ///
    /// Everything before the first colon is the name; a single space after
    /// the colon is dropped. A line without a colon is a field with an
    /// empty value. Lines with unknown names yield `None`.
    fn from_line(line: &'a str) -> Option<Self> {
        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        Some(Self {
            name: FieldName::from_wire(name)?,
            value,
        })
    }
}

// ---------------------------------------------------------------------------
// FieldParser
// ---------------------------------------------------------------------------

/// A forward-only tokenizer over event-stream text.
///
/// ```
/// use pushwire_parser::{FieldName, FieldParser};
///
/// let mut parser = FieldParser::new("event: ping\ndata: {}\n\n");
/// let names: Vec<_> = parser.by_ref().map(|f| f.name).collect();
///
/// assert_eq!(names, [FieldName::Event, FieldName::Data, FieldName::EventEnd]);
/// assert_eq!(parser.err(), None);
/// ```
#[derive(Debug, Clone)]
pub struct FieldParser<'a> {
    data: &'a str,
    keep_comments: bool,
    in_event: bool,
    err: Option<ParseError>,
}

impl<'a> FieldParser<'a> {
    /// Creates a parser over `data`. A leading byte order mark is skipped.
    pub fn new(data: &'a str) -> Self {
        Self {
            data: data.strip_prefix(BOM).unwrap_or(data),
            keep_comments: false,
            in_event: false,
            err: None,
        }
    }

    /// Whether comment lines are reported. They are discarded by default.
    pub fn keep_comments(&mut self, keep: bool) -> &mut Self {
        self.keep_comments = keep;
        self
    }

    /// Returns the next field, or `None` once the input is exhausted or an
    /// error occurred. Check [`err`](Self::err) after `None` to tell the
    /// two apart.
    pub fn next_field(&mut self) -> Option<Field<'a>> {
        if self.err.is_some() {
            return None;
        }

        while !self.data.is_empty() {
            let (line, rest, newline_len) = next_chunk(self.data);
            if newline_len == 0 {
                self.err = Some(ParseError::UnexpectedEof);
                return None;
            }
            self.data = rest;

            if line.is_empty() {
                self.in_event = false;
                return Some(Field {
                    name: FieldName::EventEnd,
                    value: "",
                });
            }
            self.in_event = true;

            let Some(field) = Field::from_line(line) else {
                tracing::trace!(line, "skipping field with unknown name");
                continue;
            };
            if field.name == FieldName::Comment && !self.keep_comments {
                continue;
            }
            return Some(field);
        }

        if self.in_event {
            self.err = Some(ParseError::UnexpectedEof);
        }
        None
    }

    /// The terminal error, if parsing stopped because of one.
    pub fn err(&self) -> Option<ParseError> {
        self.err
    }

    /// The input that has not been tokenized yet.
    ///
    /// After an [`EventEnd`](FieldName::EventEnd) this is exactly the text
    /// of the following events, so a caller can keep framing a stream.
    pub fn remaining(&self) -> &'a str {
        self.data
    }
}

impl<'a> Iterator for FieldParser<'a> {
    type Item = Field<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_field()
    }
}
