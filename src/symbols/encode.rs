//! Text to program bytes and back
//!
//! Programs are edited as ordinary text (`print:A+1`) but stored and executed
//! in symbol form, where every reserved spelling is a single byte. Encoding is
//! a greedy longest match over [`SYMBOL_TEXTS`]; the contents of string and
//! character literals are copied untouched so `"if:"` stays a string.

use super::{FIRST_SYMBOL, SYMBOL_TEXTS};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Only ASCII can be stored; symbol codes occupy the upper half
    UnsupportedCharacter {
        character: char,
        line: usize,
        column: usize,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodeError::UnsupportedCharacter {
                character,
                line,
                column,
            } => write!(
                f,
                "Unsupported character {:?} at line {}, column {}",
                character, line, column
            ),
        }
    }
}

impl std::error::Error for EncodeError {}

struct Encoder<'a> {
    input: &'a [u8],
    position: usize,
    line: usize,
    column: usize,
    output: Vec<u8>,
}

impl<'a> Encoder<'a> {
    fn new(input: &'a str) -> Self {
        Encoder {
            input: input.as_bytes(),
            position: 0,
            line: 1,
            column: 1,
            output: Vec::with_capacity(input.len()),
        }
    }

    fn current(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self, count: usize) {
        for _ in 0..count {
            if self.current() == Some(b'\n') {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.position += 1;
        }
    }

    /// Copy one byte through, rejecting anything outside ASCII.
    fn copy_byte(&mut self) -> Result<(), EncodeError> {
        let Some(byte) = self.current() else {
            return Ok(());
        };
        if !byte.is_ascii() {
            let rest = std::str::from_utf8(&self.input[self.position..]).unwrap_or_default();
            return Err(EncodeError::UnsupportedCharacter {
                character: rest.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER),
                line: self.line,
                column: self.column,
            });
        }
        if byte != b'\r' {
            self.output.push(byte);
        }
        self.advance(1);
        Ok(())
    }

    /// Copy a quoted literal through, honouring backslash escapes.
    fn copy_literal(&mut self, quote: u8) -> Result<(), EncodeError> {
        self.copy_byte()?;
        while let Some(byte) = self.current() {
            if byte == b'\n' {
                break;
            }
            if byte == b'\\' {
                self.copy_byte()?;
                self.copy_byte()?;
                continue;
            }
            self.copy_byte()?;
            if byte == quote {
                break;
            }
        }
        Ok(())
    }

    fn longest_symbol(&self) -> Option<(u8, usize)> {
        let rest = &self.input[self.position..];
        SYMBOL_TEXTS
            .iter()
            .enumerate()
            .filter(|(_, text)| rest.starts_with(text.as_bytes()))
            .max_by_key(|(_, text)| text.len())
            .map(|(index, text)| (FIRST_SYMBOL + index as u8, text.len()))
    }

    fn encode(mut self) -> Result<Vec<u8>, EncodeError> {
        while let Some(byte) = self.current() {
            match byte {
                b'"' | b'\'' => self.copy_literal(byte)?,
                _ => match self.longest_symbol() {
                    Some((symbol, length)) => {
                        self.output.push(symbol);
                        self.advance(length);
                    }
                    None => self.copy_byte()?,
                },
            }
        }
        Ok(self.output)
    }
}

/// Convert program text into symbol form.
pub fn encode(text: &str) -> Result<Vec<u8>, EncodeError> {
    Encoder::new(text).encode()
}

/// Expand symbol bytes back into program text.
pub fn decode(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for &byte in bytes {
        match super::text(byte) {
            Some(spelling) => text.push_str(spelling),
            None if byte.is_ascii() => text.push(byte as char),
            None => text.push(char::REPLACEMENT_CHARACTER),
        }
    }
    text
}
