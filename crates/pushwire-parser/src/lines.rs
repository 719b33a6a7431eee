//! Newline-agnostic line splitting.
//!
//! The event-stream format accepts three line terminators: LF, CR and
//! CRLF. Consumers treat all of them the same, so every function here
//! does too.

/// Finds the first line terminator in `s`.
///
/// Returns the byte index where the terminator starts and its length
/// (1 for LF or CR, 2 for CRLF), or `None` if `s` is a single line.
pub fn newline_index(s: &str) -> Option<(usize, usize)> {
    let bytes = s.as_bytes();
    let index = bytes.iter().position(|&b| b == b'\n' || b == b'\r')?;

    let len = if bytes[index] == b'\r' && bytes.get(index + 1) == Some(&b'\n') {
        2
    } else {
        1
    };

    Some((index, len))
}

/// Splits off the first line of `s`.
///
/// Returns `(line, remainder, terminator_len)`. When `s` contains no
/// terminator the whole input is the line, the remainder is empty and
/// `terminator_len` is 0.
///
/// ```
/// use pushwire_parser::next_chunk;
///
/// assert_eq!(next_chunk("a\r\nb"), ("a", "b", 2));
/// assert_eq!(next_chunk("tail"), ("tail", "", 0));
/// ```
pub fn next_chunk(s: &str) -> (&str, &str, usize) {
    match newline_index(s) {
        Some((index, len)) => (&s[..index], &s[index + len..], len),
        None => (s, "", 0),
    }
}

/// Returns `true` if `s` contains no CR or LF.
pub fn is_single_line(s: &str) -> bool {
    newline_index(s).is_none()
}

/// Iterator over the newline-free segments of a string.
///
/// A trailing terminator does not produce an empty final segment, and an
/// empty input produces nothing: `"a\n"` yields just `"a"`, `""` yields
/// no segments at all.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Lines<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let (line, rest, _) = next_chunk(self.rest);
        self.rest = rest;
        Some(line)
    }
}
