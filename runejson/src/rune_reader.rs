// SPDX-License-Identifier: Apache-2.0

use alloc::boxed::Box;

use crate::parse_error::ParseError;
use crate::Reader;

/// Size of the fixed read buffer between the [`Reader`] and the UTF-8 decoder.
pub const READ_CHUNK_SIZE: usize = 256;

/// Pull-based sequence of Unicode scalar values decoded from a [`Reader`].
///
/// Holds one fixed read buffer and a single look-ahead slot, so the lexer can
/// inspect the next rune with [`peek`](Self::peek) instead of pushing runes back.
pub struct RuneReader<R: Reader> {
    reader: R,
    buffer: [u8; READ_CHUNK_SIZE],
    start: usize,
    end: usize,
    /// Absolute offset of `buffer[start]` in the input
    offset: usize,
    peeked: Option<char>,
    finished: bool,
}

impl<R: Reader> RuneReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: [0u8; READ_CHUNK_SIZE],
            start: 0,
            end: 0,
            offset: 0,
            peeked: None,
            finished: false,
        }
    }

    /// Byte offset of the next undecoded byte. A peeked rune counts as decoded.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the next rune without consuming it. `Ok(None)` is end of input.
    pub fn peek(&mut self) -> Result<Option<char>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.decode()?;
        }
        Ok(self.peeked)
    }

    /// Consumes and returns the next rune. `Ok(None)` is end of input.
    pub fn next_rune(&mut self) -> Result<Option<char>, ParseError> {
        match self.peeked.take() {
            Some(c) => Ok(Some(c)),
            None => self.decode(),
        }
    }

    /// Consumes the next rune only if it satisfies `predicate`.
    pub fn next_if(&mut self, predicate: impl FnOnce(char) -> bool) -> Result<Option<char>, ParseError> {
        match self.peek()? {
            Some(c) if predicate(c) => {
                self.peeked = None;
                Ok(Some(c))
            }
            _ => Ok(None),
        }
    }

    /// Returns the next raw byte, refilling from the reader as needed.
    fn next_byte(&mut self) -> Result<Option<u8>, ParseError> {
        if self.start == self.end {
            if self.finished {
                return Ok(None);
            }
            let read = self
                .reader
                .read(&mut self.buffer)
                .map_err(|e| ParseError::ReaderError(Box::new(e)))?;
            if read == 0 {
                self.finished = true;
                return Ok(None);
            }
            self.start = 0;
            self.end = read.min(READ_CHUNK_SIZE);
        }
        let byte = self.buffer.get(self.start).copied();
        self.start = self.start.saturating_add(1);
        self.offset = self.offset.saturating_add(1);
        Ok(byte)
    }

    fn decode(&mut self) -> Result<Option<char>, ParseError> {
        let sequence_start = self.offset;
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };
        let width = utf8_width(lead);
        if width == 0 {
            return Err(ParseError::InvalidUtf8 {
                offset: sequence_start,
            });
        }

        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            match self.next_byte()? {
                Some(b) if b & 0xC0 == 0x80 => *slot = b,
                _ => {
                    return Err(ParseError::InvalidUtf8 {
                        offset: sequence_start,
                    })
                }
            }
        }

        // from_utf8 rejects overlong forms and encoded surrogates
        let encoded = bytes.get(..width).unwrap_or_default();
        core::str::from_utf8(encoded)
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or(ParseError::InvalidUtf8 {
                offset: sequence_start,
            })
    }
}

impl<R: Reader> Iterator for RuneReader<R> {
    type Item = Result<char, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_rune().transpose()
    }
}

/// Length of the UTF-8 sequence introduced by `lead`, or 0 if it cannot lead one.
const fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}
