// SPDX-License-Identifier: Apache-2.0

//! A convenience Reader implementation for in-memory input.
//!
//! This module provides [`ChunkReader`], a [`Reader`] over a byte slice. It can
//! hand the whole document to the lexer at once, or simulate streaming by
//! returning it in fixed-size chunks.
//!
//! For real I/O, wrap any `std::io::Read` in [`IoReader`](crate::IoReader), or
//! implement [`Reader`] for your own source.
//!
//! # Examples
//!
//! ```rust
//! use runejson::{iterate, ChunkReader};
//!
//! let json = br#"[{"name": "Alice"}, {"name": "Bob"}]"#;
//! // Simulate a slow network: 4 bytes per read
//! let reader = ChunkReader::new(json, 4);
//!
//! for element in iterate(reader).unwrap() {
//!     println!("{}", element.unwrap());
//! }
//! ```

use core::convert::Infallible;

use crate::Reader;

/// A [`Reader`] that reads from a byte slice, optionally in fixed-size chunks.
///
/// 1.  **Full Slice Reading**: [`ChunkReader::full_slice()`] fills the caller's
///     buffer as far as it can on every call.
///
/// 2.  **Chunked Reading**: [`ChunkReader::new()`] limits each `read()` call to
///     at most `chunk_size` bytes, which exercises the streaming paths of the
///     lexer exactly like short network reads would.
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
}

impl<'a> ChunkReader<'a> {
    /// Create a new chunked reader from a byte slice.
    ///
    /// Each call to `read()` will return at most `chunk_size` bytes
    /// (minimum 1).
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Create a new reader that consumes the entire byte slice at once.
    pub fn full_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: usize::MAX,
        }
    }

    /// Number of bytes handed out so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl Reader for ChunkReader<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let rest = self.data.get(self.pos..).unwrap_or_default();
        let to_copy = rest.len().min(buf.len()).min(self.chunk_size);
        if let (Some(dest), Some(src)) = (buf.get_mut(..to_copy), rest.get(..to_copy)) {
            dest.copy_from_slice(src);
            self.pos = self.pos.saturating_add(to_copy);
            Ok(to_copy)
        } else {
            Ok(0)
        }
    }
}
