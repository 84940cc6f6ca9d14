//! Pushback character source over a byte stream

use crate::error::{Result, TableError};
use crate::settings::Encoding;
use std::io::{ErrorKind, Read};

/// Character-granular pull source with single-character pushback
///
/// Wraps a byte reader, decodes UTF-8 incrementally and lets the tokenizer
/// return characters for re-reading. Pushed-back characters come back in
/// LIFO order before anything newly decoded, so a failed multi-character
/// delimiter lookahead can be rolled back exactly.
pub struct PushbackSource<R> {
    inner: R,
    pushback: Vec<char>,
    lossy: bool,
}

impl<R: Read> PushbackSource<R> {
    /// Wrap a byte reader
    pub fn new(inner: R, encoding: Encoding) -> Self {
        PushbackSource {
            inner,
            pushback: Vec::new(),
            lossy: encoding == Encoding::Utf8Lossy,
        }
    }

    /// Read the next character, consuming it
    ///
    /// Returns `Ok(None)` at end of stream. The underlying reader only
    /// advances when the pushback stack is empty.
    pub fn read(&mut self) -> Result<Option<char>> {
        if let Some(ch) = self.pushback.pop() {
            return Ok(Some(ch));
        }
        self.next_char()
    }

    /// Look at the next character without consuming it
    pub fn peek(&mut self) -> Result<Option<char>> {
        if let Some(&ch) = self.pushback.last() {
            return Ok(Some(ch));
        }
        match self.next_char()? {
            Some(ch) => {
                self.pushback.push(ch);
                Ok(Some(ch))
            }
            None => Ok(None),
        }
    }

    /// Return a character to the front of the stream
    ///
    /// The most recently pushed character is the next one read.
    pub fn push_back(&mut self, ch: char) {
        self.pushback.push(ch);
    }

    /// Decode one character from the inner reader
    fn next_char(&mut self) -> Result<Option<char>> {
        let mut buf = [0u8; 4];
        if !self.fill(&mut buf[..1])? {
            return Ok(None);
        }
        let lead = buf[0];
        let len = match lead {
            0x00..=0x7f => return Ok(Some(lead as char)),
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => return self.bad_sequence(lead),
        };
        for i in 1..len {
            if !self.fill(&mut buf[i..i + 1])? {
                // Truncated sequence at end of stream.
                return self.bad_sequence(lead);
            }
        }
        match std::str::from_utf8(&buf[..len]) {
            Ok(s) => Ok(s.chars().next()),
            Err(_) => self.bad_sequence(lead),
        }
    }

    /// Read exactly `buf.len()` bytes; false at end of stream
    fn fill(&mut self, buf: &mut [u8]) -> Result<bool> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => return Ok(false),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(true)
    }

    fn bad_sequence(&self, lead: u8) -> Result<Option<char>> {
        if self.lossy {
            Ok(Some('\u{FFFD}'))
        } else {
            Err(TableError::Decode(format!(
                "invalid byte sequence starting with 0x{:02x}",
                lead
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn source(bytes: &[u8]) -> PushbackSource<Cursor<Vec<u8>>> {
        PushbackSource::new(Cursor::new(bytes.to_vec()), Encoding::Utf8)
    }

    #[test]
    fn test_read_ascii() {
        let mut src = source(b"ab");
        assert_eq!(src.read().unwrap(), Some('a'));
        assert_eq!(src.read().unwrap(), Some('b'));
        assert_eq!(src.read().unwrap(), None);
    }

    #[test]
    fn test_read_multibyte() {
        let mut src = source("é東🎉".as_bytes());
        assert_eq!(src.read().unwrap(), Some('é'));
        assert_eq!(src.read().unwrap(), Some('東'));
        assert_eq!(src.read().unwrap(), Some('🎉'));
        assert_eq!(src.read().unwrap(), None);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut src = source(b"x");
        assert_eq!(src.peek().unwrap(), Some('x'));
        assert_eq!(src.peek().unwrap(), Some('x'));
        assert_eq!(src.read().unwrap(), Some('x'));
        assert_eq!(src.peek().unwrap(), None);
    }

    #[test]
    fn test_pushback_is_lifo() {
        let mut src = source(b"z");
        src.push_back('b');
        src.push_back('a');
        assert_eq!(src.read().unwrap(), Some('a'));
        assert_eq!(src.read().unwrap(), Some('b'));
        assert_eq!(src.read().unwrap(), Some('z'));
        assert_eq!(src.read().unwrap(), None);
    }

    #[test]
    fn test_pushback_before_peek() {
        let mut src = source(b"z");
        src.push_back('a');
        assert_eq!(src.peek().unwrap(), Some('a'));
        assert_eq!(src.read().unwrap(), Some('a'));
        assert_eq!(src.read().unwrap(), Some('z'));
    }

    #[test]
    fn test_invalid_utf8_strict() {
        let mut src = source(&[0xff, b'a']);
        assert!(matches!(src.read(), Err(TableError::Decode(_))));
    }

    #[test]
    fn test_invalid_utf8_lossy() {
        let mut src =
            PushbackSource::new(Cursor::new(vec![0xff, b'a']), Encoding::Utf8Lossy);
        assert_eq!(src.read().unwrap(), Some('\u{FFFD}'));
        assert_eq!(src.read().unwrap(), Some('a'));
    }

    #[test]
    fn test_truncated_sequence_strict() {
        // Lead byte of a 3-byte sequence, then end of stream.
        let mut src = source(&[0xe3]);
        assert!(matches!(src.read(), Err(TableError::Decode(_))));
    }
}
