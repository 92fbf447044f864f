// SPDX-License-Identifier: Apache-2.0

//! Element-by-element iteration over a document.
//!
//! # Example
//! ```
//! use runejson::{iterate, ChunkReader};
//!
//! let input = br#"[{"id": 1}, {"id": 2}, {"id": 3}]"#;
//! let mut ids = Vec::new();
//! for element in iterate(ChunkReader::full_slice(input))? {
//!     let element = element?;
//!     ids.push(element.get("id").and_then(|id| id.as_i64()));
//!     if ids.len() == 2 {
//!         break; // the third element is never parsed
//!     }
//! }
//! assert_eq!(ids, [Some(1), Some(2)]);
//! # Ok::<(), runejson::ParseError>(())
//! ```

use crate::parse_error::ParseError;
use crate::parser::{ArrayCursor, Parser};
use crate::token::TokenKind;
use crate::value::Value;
use crate::Reader;

/// What the stream still has to hand out.
#[derive(Debug)]
enum StreamState {
    /// A top-level object, already parsed
    Single(Value),
    /// A top-level array, parsed on demand
    Elements(ArrayCursor),
    /// Everything was yielded, or an error ended the stream
    Finished,
}

/// Iterator over the elements of a top-level array, or over the single
/// top-level object.
///
/// Created by [`iterate`]. Array elements are parsed one per call to
/// `next`; dropping the stream stops reading. After the closing `]` the rest
/// of the input must be whitespace, otherwise one final
/// [`ParseError::TrailingContent`] is yielded. The first error ends the
/// stream.
pub struct ValueStream<R: Reader> {
    parser: Parser<R>,
    state: StreamState,
}

impl<R: Reader> ValueStream<R> {
    fn open(mut parser: Parser<R>) -> Result<Self, ParseError> {
        let state = match parser.document_start()? {
            TokenKind::OpenBrace => {
                let object = parser.parse_object()?;
                parser.finish()?;
                log::debug!("document is an object, yielding it as one element");
                StreamState::Single(object)
            }
            _ => {
                log::debug!("document is an array, streaming its elements");
                StreamState::Elements(ArrayCursor::open(&mut parser)?)
            }
        };
        Ok(Self { parser, state })
    }

    /// Bytes consumed from the reader so far.
    pub fn offset(&self) -> usize {
        self.parser.offset()
    }

    /// True if the document is an array whose elements are being streamed.
    pub fn is_array(&self) -> bool {
        matches!(self.state, StreamState::Elements(_))
    }
}

impl<R: Reader> Iterator for ValueStream<R> {
    type Item = Result<Value, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match core::mem::replace(&mut self.state, StreamState::Finished) {
            StreamState::Finished => None,
            StreamState::Single(value) => Some(Ok(value)),
            StreamState::Elements(mut cursor) => match cursor.next_element(&mut self.parser) {
                Ok(Some(value)) => {
                    self.state = StreamState::Elements(cursor);
                    Some(Ok(value))
                }
                Ok(None) => {
                    log::debug!("array exhausted at byte {}", self.parser.offset());
                    self.parser.finish().err().map(Err)
                }
                Err(e) => Some(Err(e)),
            },
        }
    }
}

impl<R: Reader> core::iter::FusedIterator for ValueStream<R> {}

/// Starts iterating over `reader`'s document.
///
/// Reads the first token to classify the document:
/// - `[`: each element is parsed when the iterator asks for it;
/// - `{`: the object is parsed now and yielded as the only element.
///
/// Fails with [`ParseError::EmptyDocument`] for input with no tokens and with
/// [`ParseError::InvalidDocumentStart`] for any other first token.
pub fn iterate<R: Reader>(reader: R) -> Result<ValueStream<R>, ParseError> {
    ValueStream::open(Parser::new(reader))
}

/// Like [`iterate`] with a nesting limit other than
/// [`DEFAULT_MAX_DEPTH`](crate::DEFAULT_MAX_DEPTH). The top-level array
/// counts as one level.
pub fn iterate_with_max_depth<R: Reader>(
    reader: R,
    max_depth: usize,
) -> Result<ValueStream<R>, ParseError> {
    ValueStream::open(Parser::with_max_depth(reader, max_depth))
}
