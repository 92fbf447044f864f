// SPDX-License-Identifier: Apache-2.0

use alloc::boxed::Box;
use alloc::string::String;

use crate::token::TokenKind;

/// Boxed error produced by a [`Reader`](crate::Reader), kept intact so callers can downcast it.
pub type ReaderError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// The regular expression every JSON number must satisfy.
pub const NUMBER_REGEX: &str = r"-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?";

/// Errors that can occur during JSON lexing and parsing
///
/// Lexical variants carry the partial token text consumed before the failure.
#[derive(Debug)]
pub enum ParseError {
    /// A character that cannot begin any JSON token.
    InvalidCharacter(char),
    /// An unescaped code point below U+0020 inside a string.
    ControlCharacter { partial: String },
    /// Input ended before the closing quote of a string.
    IncompleteString { partial: String },
    /// Input ended in the middle of an escape sequence.
    IncompleteEscape { partial: String },
    /// Unknown escape character or invalid hex digit in `\uXXXX`.
    IllegalEscape { partial: String },
    /// A surrogate escape was not followed by a second `\u` escape.
    MissingSurrogateEscape { partial: String },
    /// A surrogate escape was followed by a `\u` escape that is not a surrogate.
    NonSurrogateEscape { partial: String },
    /// Two surrogate escapes that do not form a high/low pair.
    InvalidSurrogatePair { partial: String },
    /// Text that does not satisfy [`NUMBER_REGEX`].
    InvalidNumber { partial: String },
    /// A run of letters other than `true`, `false` or `null`.
    InvalidLiteral { partial: String },
    /// Malformed UTF-8 starting at the given byte offset.
    InvalidUtf8 { offset: usize },
    /// The input held no tokens at all.
    EmptyDocument,
    /// The first token was neither `{` nor `[`.
    InvalidDocumentStart(TokenKind),
    /// Another token followed the complete top-level value.
    TrailingContent(TokenKind),
    /// An object needed a string key (or `}` right after `{`).
    ExpectedKey(TokenKind),
    /// The same key appeared twice in one object.
    DuplicateKey(String),
    /// A key was not followed by `:`.
    ExpectedColon { key: String, found: TokenKind },
    /// A key was not followed by a value.
    ExpectedValue { key: String, found: TokenKind },
    /// A key/value pair was not followed by `,` or `}`.
    ExpectedCommaOrBrace { key: String, found: TokenKind },
    /// An array needed an element.
    ExpectedArrayValue(TokenKind),
    /// An array element was not followed by `,` or `]`.
    ExpectedCommaOrBracket(TokenKind),
    /// Objects and arrays nested deeper than the configured limit.
    MaxDepthReached(usize),
    /// Error from the underlying reader (I/O error, not end-of-stream)
    ReaderError(ReaderError),
}

impl ParseError {
    /// Returns true for errors raised while turning runes into tokens.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            ParseError::InvalidCharacter(_)
                | ParseError::ControlCharacter { .. }
                | ParseError::IncompleteString { .. }
                | ParseError::IncompleteEscape { .. }
                | ParseError::IllegalEscape { .. }
                | ParseError::MissingSurrogateEscape { .. }
                | ParseError::NonSurrogateEscape { .. }
                | ParseError::InvalidSurrogatePair { .. }
                | ParseError::InvalidNumber { .. }
                | ParseError::InvalidLiteral { .. }
                | ParseError::InvalidUtf8 { .. }
        )
    }

    /// Returns true when the failure came from the byte source rather than the document.
    pub fn is_reader_error(&self) -> bool {
        matches!(self, ParseError::ReaderError(_))
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::InvalidCharacter(c) => write!(f, "invalid character {c:?}"),
            ParseError::ControlCharacter { partial } => {
                write!(f, "control character not valid in a string: {partial:?}")
            }
            ParseError::IncompleteString { partial } => write!(
                f,
                "incomplete string, must be terminated by a quote: {partial:?}"
            ),
            ParseError::IncompleteEscape { partial } => {
                write!(f, "incomplete escape in string: {partial:?}")
            }
            ParseError::IllegalEscape { partial } => {
                write!(f, "illegal escape in string: {partial:?}")
            }
            ParseError::MissingSurrogateEscape { partial } => write!(
                f,
                "surrogate escape must be followed by another surrogate escape: {partial:?}"
            ),
            ParseError::NonSurrogateEscape { partial } => write!(
                f,
                "surrogate escape cannot be followed by non-surrogate escape: {partial:?}"
            ),
            ParseError::InvalidSurrogatePair { partial } => {
                write!(f, "not a valid UTF-16 surrogate pair: {partial:?}")
            }
            ParseError::InvalidNumber { partial } => write!(
                f,
                "invalid number, must satisfy the regex {NUMBER_REGEX}: {partial:?}"
            ),
            ParseError::InvalidLiteral { partial } => {
                write!(f, "invalid sequence, expected a value: {partial:?}")
            }
            ParseError::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 sequence at byte offset {offset}")
            }
            ParseError::EmptyDocument => f.write_str("empty document"),
            ParseError::InvalidDocumentStart(found) => write!(
                f,
                "document must begin with brace or bracket, found {found}"
            ),
            ParseError::TrailingContent(found) => {
                write!(f, "unexpected {found} after end of document")
            }
            ParseError::ExpectedKey(found) => {
                write!(f, "object requires key or closing brace, found {found}")
            }
            ParseError::DuplicateKey(key) => write!(f, "duplicate key {key:?}"),
            ParseError::ExpectedColon { key, found } => {
                write!(f, "key {key:?} must be followed by colon, found {found}")
            }
            ParseError::ExpectedValue { key, found } => write!(
                f,
                "key {key:?} must have a value that is object/array/string/number/boolean/null, found {found}"
            ),
            ParseError::ExpectedCommaOrBrace { key, found } => write!(
                f,
                "key/value pair for {key:?} must be followed by comma or closing brace, found {found}"
            ),
            ParseError::ExpectedArrayValue(found) => {
                write!(f, "array requires value, found {found}")
            }
            ParseError::ExpectedCommaOrBracket(found) => {
                write!(f, "array requires comma or closing bracket, found {found}")
            }
            ParseError::MaxDepthReached(limit) => {
                write!(f, "maximum nesting depth of {limit} exceeded")
            }
            ParseError::ReaderError(e) => write!(f, "reader error: {e}"),
        }
    }
}

impl core::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ParseError::ReaderError(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
