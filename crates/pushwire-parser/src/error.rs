/// Errors reported by the [`FieldParser`](crate::FieldParser).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input ended in the middle of a line, or after one or more
    /// fields without the blank line that terminates an event.
    #[error("unexpected end of input")]
    UnexpectedEof,
}
