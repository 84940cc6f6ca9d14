//! Finite-state tokenizer for delimited text

use crate::error::{Result, TableError};
use crate::scan::source::PushbackSource;
use crate::settings::TableSettings;
use std::io::Read;

/// Tokenizer position within the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Inside an unquoted field
    Default,
    /// Inside a quoted field
    Quoted,
    /// Just after a closing quote
    Escaped,
    /// A field ended at a field separator
    EndOfField,
    /// A field ended at a record delimiter
    EndOfRecord,
    /// The underlying stream is exhausted
    EndOfStream,
    /// The reader has been closed; terminal
    Closed,
}

impl State {
    /// True while a field is still being accumulated
    pub fn mid_field(&self) -> bool {
        matches!(self, State::Default | State::Quoted | State::Escaped)
    }
}

#[derive(Clone, Copy)]
enum TokenKind {
    Separator,
    Delimiter,
}

/// State machine consuming characters from a [`PushbackSource`]
///
/// Holds the resolved separator/delimiter tokens and a scratch buffer sized to
/// the longest token for lookahead rollback. One `step` call consumes at least
/// one character, appends literal characters to the field buffer and returns
/// the next state.
pub struct Tokenizer {
    separator: Vec<char>,
    delimiter: Vec<char>,
    separator_first: char,
    delimiter_first: char,
    quote: char,
    scratch: Vec<char>,
}

impl Tokenizer {
    /// Build a tokenizer from validated settings
    pub fn new(settings: &TableSettings) -> Result<Self> {
        settings.validate()?;
        let separator: Vec<char> = settings.separator_str().chars().collect();
        let delimiter: Vec<char> = settings.delimiter_str().chars().collect();
        let scratch = Vec::with_capacity(separator.len().max(delimiter.len()));
        Ok(Tokenizer {
            separator_first: separator[0],
            delimiter_first: delimiter[0],
            separator,
            delimiter,
            quote: settings.quote_char(),
            scratch,
        })
    }

    /// Advance the state machine by one transition
    ///
    /// Appends literal characters to `field`. Returns the next state, which is
    /// one of the mid-field states or a boundary
    /// (`EndOfField`/`EndOfRecord`/`EndOfStream`).
    pub fn step<R: Read>(
        &mut self,
        state: State,
        source: &mut PushbackSource<R>,
        field: &mut String,
    ) -> Result<State> {
        match state {
            State::Closed => return Err(TableError::Closed),
            State::EndOfStream => return Ok(State::EndOfStream),
            _ => {}
        }

        let Some(mut ch) = source.read()? else {
            return match state {
                State::Quoted => Err(TableError::Malformed(
                    "unterminated quoted field at end of stream".to_string(),
                )),
                _ => Ok(State::EndOfStream),
            };
        };

        match state {
            State::Default => {
                // Fast path: plain characters up to the first char of a token.
                while ch != self.delimiter_first && ch != self.separator_first {
                    field.push(ch);
                    match source.read()? {
                        Some(next) => ch = next,
                        None => return Ok(State::EndOfStream),
                    }
                }
                if self.matches_token(ch, TokenKind::Delimiter, source)? {
                    return Ok(State::EndOfRecord);
                }
                if self.matches_token(ch, TokenKind::Separator, source)? {
                    return Ok(State::EndOfField);
                }
                field.push(ch);
                Ok(State::Default)
            }
            State::Quoted => {
                while ch != self.quote {
                    field.push(ch);
                    match source.read()? {
                        Some(next) => ch = next,
                        None => {
                            return Err(TableError::Malformed(
                                "unterminated quoted field at end of stream".to_string(),
                            ))
                        }
                    }
                }
                Ok(State::Escaped)
            }
            State::EndOfField | State::EndOfRecord => {
                // Start of a new field: a quote opens quoting here.
                if ch == self.quote {
                    return Ok(State::Quoted);
                }
                if self.matches_token(ch, TokenKind::Delimiter, source)? {
                    return Ok(State::EndOfRecord);
                }
                if self.matches_token(ch, TokenKind::Separator, source)? {
                    return Ok(State::EndOfField);
                }
                field.push(ch);
                Ok(State::Default)
            }
            State::Escaped => {
                if ch == self.quote {
                    // Doubled quote: literal quote character.
                    field.push(self.quote);
                    return Ok(State::Quoted);
                }
                if self.matches_token(ch, TokenKind::Delimiter, source)? {
                    return Ok(State::EndOfRecord);
                }
                if self.matches_token(ch, TokenKind::Separator, source)? {
                    return Ok(State::EndOfField);
                }
                Err(TableError::Malformed(format!(
                    "unexpected character {:?} after closing quote",
                    ch
                )))
            }
            State::EndOfStream | State::Closed => unreachable!(),
        }
    }

    /// Match the full multi-character token against the stream
    ///
    /// `first` has already been consumed. On a partial match every consumed
    /// lookahead character is pushed back in reverse order.
    fn matches_token<R: Read>(
        &mut self,
        first: char,
        kind: TokenKind,
        source: &mut PushbackSource<R>,
    ) -> Result<bool> {
        if first != self.token_char(kind, 0) {
            return Ok(false);
        }
        let len = match kind {
            TokenKind::Separator => self.separator.len(),
            TokenKind::Delimiter => self.delimiter.len(),
        };
        self.scratch.clear();
        for index in 1..len {
            let expected = self.token_char(kind, index);
            match source.read()? {
                Some(ch) if ch == expected => self.scratch.push(ch),
                mismatch => {
                    if let Some(ch) = mismatch {
                        source.push_back(ch);
                    }
                    while let Some(ch) = self.scratch.pop() {
                        source.push_back(ch);
                    }
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn token_char(&self, kind: TokenKind, index: usize) -> char {
        match kind {
            TokenKind::Separator => self.separator[index],
            TokenKind::Delimiter => self.delimiter[index],
        }
    }
}
