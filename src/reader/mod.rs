//! Word reader - turns a byte stream into 32-bit data words
//!
//! Tokens are separated by ASCII whitespace and may span any number of
//! lines. The number base is taken from the token prefix:
//! - `0x` / `0X`: hexadecimal
//! - leading `0`: octal
//! - otherwise decimal
//!
//! Each token is read as far as its digits are valid for that base; the
//! unread rest is treated as the next token, so `0x1g` yields `1` and then
//! stops at `g`, and `08` yields `0` and then `8`. The first token with no
//! usable leading digits (or one that overflows 32 bits) ends the sequence
//! the same way end of input does. Input is not required to be UTF-8.
//! Lines are read lazily, so words pasted into a terminal are yielded as
//! soon as their line is complete.

use std::collections::VecDeque;
use std::io::BufRead;

use thiserror::Error;
use tracing::{debug, warn};

use crate::common::ToolResult;

/// Why a token could not be read as a data word
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWordError {
    #[error("no digits at start of token '{0}'")]
    NoDigits(String),

    #[error("trailing characters in token '{0}'")]
    Trailing(String),

    #[error("token '{0}' does not fit in 32 bits")]
    Overflow(String),
}

fn lossy(token: &[u8]) -> String {
    String::from_utf8_lossy(token).into_owned()
}

/// Read the longest data word at the start of a token
///
/// Returns the value and the unread rest of the token.
pub fn parse_prefix(token: &[u8]) -> Result<(u32, &[u8]), ParseWordError> {
    let unsigned = token.strip_prefix(b"+").unwrap_or(token);

    // A leading 0 is itself an octal digit
    let (digits, radix, has_zero) = match unsigned {
        [b'0', b'x' | b'X', rest @ ..] => (rest, 16, false),
        [b'0', rest @ ..] => (rest, 8, true),
        _ => (unsigned, 10, false),
    };

    let len = digits
        .iter()
        .take_while(|&&b| char::from(b).is_digit(radix))
        .count();
    if len == 0 && !has_zero {
        return Err(ParseWordError::NoDigits(lossy(token)));
    }

    let value = digits[..len]
        .iter()
        .try_fold(0u32, |acc, &b| {
            let digit = char::from(b).to_digit(radix)?;
            acc.checked_mul(radix)?.checked_add(digit)
        })
        .ok_or_else(|| ParseWordError::Overflow(lossy(token)))?;

    Ok((value, &digits[len..]))
}

/// Parse a whole token into a data word
pub fn parse_word(token: &str) -> Result<u32, ParseWordError> {
    match parse_prefix(token.as_bytes())? {
        (word, []) => Ok(word),
        _ => Err(ParseWordError::Trailing(token.to_string())),
    }
}

/// Iterator over data words read from a byte stream
///
/// Yields `Err` only for I/O failures. A malformed token stops iteration
/// and is kept in [`WordReader::stopped_at`].
pub struct WordReader<R> {
    input: R,
    line: Vec<u8>,
    tokens: VecDeque<Vec<u8>>,
    line_number: u64,
    words_read: u64,
    stopped_at: Option<ParseWordError>,
    finished: bool,
}

impl<R: BufRead> WordReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: Vec::new(),
            tokens: VecDeque::new(),
            line_number: 0,
            words_read: 0,
            stopped_at: None,
            finished: false,
        }
    }

    /// Number of words yielded so far
    pub fn words_read(&self) -> u64 {
        self.words_read
    }

    /// The token that ended the input early, if any
    pub fn stopped_at(&self) -> Option<&ParseWordError> {
        self.stopped_at.as_ref()
    }

    /// Refill the token queue from the next line. Returns false at EOF.
    fn fill_tokens(&mut self) -> std::io::Result<bool> {
        self.line.clear();
        if self.input.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        self.tokens.extend(
            self.line
                .split(u8::is_ascii_whitespace)
                .filter(|token| !token.is_empty())
                .map(<[u8]>::to_vec),
        );
        Ok(true)
    }
}

impl<R: BufRead> Iterator for WordReader<R> {
    type Item = ToolResult<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if let Some(token) = self.tokens.pop_front() {
                return match parse_prefix(&token) {
                    Ok((word, rest)) => {
                        if !rest.is_empty() {
                            self.tokens.push_front(rest.to_vec());
                        }
                        self.words_read += 1;
                        Some(Ok(word))
                    }
                    Err(e) => {
                        warn!(
                            line = self.line_number,
                            words_read = self.words_read,
                            error = %e,
                            "Stopping at unparseable token"
                        );
                        self.stopped_at = Some(e);
                        self.finished = true;
                        None
                    }
                };
            }

            match self.fill_tokens() {
                Ok(true) => continue,
                Ok(false) => {
                    debug!(
                        lines = self.line_number,
                        words_read = self.words_read,
                        "End of input"
                    );
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
