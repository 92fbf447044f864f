// SPDX-License-Identifier: Apache-2.0

use crate::json_number::NumberString;
use crate::lexer::Lexer;
use crate::parse_error::ParseError;
use crate::token::{Token, TokenKind};
use crate::value::{Map, Value};
use crate::{ChunkReader, Reader};

/// Nesting limit used by [`Parser::new`] and [`parse`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Recursive-descent parser building [`Value`]s from a token stream.
///
/// A document must be a single object or array. Arrays can also be walked
/// one element at a time through [`ValueStream`](crate::ValueStream).
pub struct Parser<R: Reader> {
    lexer: Lexer<R>,
    /// Maximum number of open objects/arrays
    max_depth: usize,
    /// Currently open objects/arrays
    depth: usize,
}

impl<'a> Parser<ChunkReader<'a>> {
    /// Creates a parser over an in-memory document.
    pub fn from_slice(input: &'a [u8]) -> Self {
        Self::new(ChunkReader::full_slice(input))
    }
}

impl<R: Reader> Parser<R> {
    /// Creates a parser with [`DEFAULT_MAX_DEPTH`].
    pub fn new(reader: R) -> Self {
        Self::with_max_depth(reader, DEFAULT_MAX_DEPTH)
    }

    /// Creates a parser that fails with [`ParseError::MaxDepthReached`] once
    /// more than `max_depth` objects and arrays are open at the same time.
    pub fn with_max_depth(reader: R, max_depth: usize) -> Self {
        Self {
            lexer: Lexer::new(reader),
            max_depth,
            depth: 0,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Bytes consumed from the reader so far.
    pub fn offset(&self) -> usize {
        self.lexer.offset()
    }

    /// Parses the whole document and checks nothing follows it.
    pub fn parse(mut self) -> Result<Value, ParseError> {
        let value = match self.document_start()? {
            TokenKind::OpenBrace => self.parse_object()?,
            _ => self.parse_array()?,
        };
        self.finish()?;
        Ok(value)
    }

    /// Peeks the first token and rejects anything other than `{` or `[`.
    pub(crate) fn document_start(&mut self) -> Result<TokenKind, ParseError> {
        match self.lexer.peek()?.kind() {
            kind @ (TokenKind::OpenBrace | TokenKind::OpenBracket) => Ok(kind),
            TokenKind::EndOfInput => Err(ParseError::EmptyDocument),
            other => Err(ParseError::InvalidDocumentStart(other)),
        }
    }

    /// Succeeds only if the input has no tokens left.
    pub(crate) fn finish(&mut self) -> Result<(), ParseError> {
        match self.lexer.next_token()? {
            Token::EndOfInput => Ok(()),
            other => Err(ParseError::TrailingContent(other.kind())),
        }
    }

    /// Parses the value starting at the next token.
    ///
    /// Returns `Ok(None)` without consuming anything when that token cannot
    /// start a value, so the caller can report it in its own terms.
    pub(crate) fn parse_value(&mut self) -> Result<Option<Value>, ParseError> {
        match self.lexer.peek()?.kind() {
            TokenKind::OpenBrace => self.parse_object().map(Some),
            TokenKind::OpenBracket => self.parse_array().map(Some),
            TokenKind::String | TokenKind::Number | TokenKind::Boolean | TokenKind::Null => {
                Ok(scalar_value(self.lexer.next_token()?))
            }
            _ => Ok(None),
        }
    }

    pub(crate) fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.lexer.next_token()?; // {
        self.enter()?;

        let mut map = Map::new();
        if matches!(self.lexer.peek()?, Token::CloseBrace) {
            self.lexer.next_token()?;
            self.leave();
            return Ok(Value::Object(map));
        }

        loop {
            let key = match self.lexer.next_token()? {
                Token::String(key) => key,
                other => return Err(ParseError::ExpectedKey(other.kind())),
            };
            if map.contains_key(&key) {
                return Err(ParseError::DuplicateKey(key));
            }

            match self.lexer.next_token()? {
                Token::Colon => {}
                other => {
                    return Err(ParseError::ExpectedColon {
                        key,
                        found: other.kind(),
                    })
                }
            }

            let Some(value) = self.parse_value()? else {
                let found = self.lexer.peek()?.kind();
                return Err(ParseError::ExpectedValue { key, found });
            };

            match self.lexer.next_token()? {
                Token::Comma => {
                    map.insert(key, value);
                }
                Token::CloseBrace => {
                    map.insert(key, value);
                    break;
                }
                other => {
                    return Err(ParseError::ExpectedCommaOrBrace {
                        key,
                        found: other.kind(),
                    })
                }
            }
        }

        self.leave();
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        let mut cursor = ArrayCursor::open(self)?;
        let mut items = alloc::vec::Vec::new();
        while let Some(item) = cursor.next_element(self)? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn parse_array_element(&mut self) -> Result<Value, ParseError> {
        match self.parse_value()? {
            Some(value) => Ok(value),
            None => Err(ParseError::ExpectedArrayValue(self.lexer.peek()?.kind())),
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::MaxDepthReached(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

fn scalar_value(token: Token) -> Option<Value> {
    match token {
        Token::String(s) => Some(Value::String(s)),
        Token::Number(text) => Some(Value::Number(NumberString::from_lexed(text))),
        Token::Boolean(b) => Some(Value::Boolean(b)),
        Token::Null => Some(Value::Null),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    /// Just after `[`
    First,
    /// After an element
    Next,
    /// `]` seen or an error was returned
    Done,
}

/// Position inside an array whose elements are produced on demand.
///
/// The cursor only holds its own state; the parser is lent to each
/// [`next_element`](Self::next_element) call. It is single-pass and returns
/// `Ok(None)` forever once the array is closed or an error was returned.
#[derive(Debug)]
pub(crate) struct ArrayCursor {
    state: CursorState,
}

impl ArrayCursor {
    /// Consumes the `[` the parser is positioned at.
    pub(crate) fn open<R: Reader>(parser: &mut Parser<R>) -> Result<Self, ParseError> {
        parser.lexer.next_token()?;
        parser.enter()?;
        Ok(Self {
            state: CursorState::First,
        })
    }

    pub(crate) fn is_done(&self) -> bool {
        self.state == CursorState::Done
    }

    /// Parses the next element, or returns `Ok(None)` after consuming `]`.
    pub(crate) fn next_element<R: Reader>(
        &mut self,
        parser: &mut Parser<R>,
    ) -> Result<Option<Value>, ParseError> {
        let result = self.step(parser);
        if !matches!(result, Ok(Some(_))) {
            self.state = CursorState::Done;
        }
        result
    }

    fn step<R: Reader>(&mut self, parser: &mut Parser<R>) -> Result<Option<Value>, ParseError> {
        match self.state {
            CursorState::Done => Ok(None),
            CursorState::First => {
                self.state = CursorState::Next;
                if matches!(parser.lexer.peek()?, Token::CloseBracket) {
                    parser.lexer.next_token()?;
                    parser.leave();
                    return Ok(None);
                }
                parser.parse_array_element().map(Some)
            }
            CursorState::Next => match parser.lexer.next_token()? {
                Token::Comma => parser.parse_array_element().map(Some),
                Token::CloseBracket => {
                    parser.leave();
                    Ok(None)
                }
                other => Err(ParseError::ExpectedCommaOrBracket(other.kind())),
            },
        }
    }
}

/// Parses a complete document from `reader`.
///
/// The document must be one object or array with nothing but whitespace
/// after it.
pub fn parse<R: Reader>(reader: R) -> Result<Value, ParseError> {
    Parser::new(reader).parse()
}

/// Parses a complete document held in a string.
pub fn parse_str(input: &str) -> Result<Value, ParseError> {
    parse_slice(input.as_bytes())
}

/// Parses a complete document held in a byte slice.
pub fn parse_slice(input: &[u8]) -> Result<Value, ParseError> {
    Parser::from_slice(input).parse()
}

/// Parses a document that is known to be valid, such as a literal in source code.
///
/// # Panics
///
/// Panics with the parse error if `input` is not a valid document.
pub fn must_parse(input: &str) -> Value {
    match parse_str(input) {
        Ok(value) => value,
        Err(e) => panic!("must_parse: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use test_log::test;

    #[test]
    fn test_simple_object() {
        let value = parse_str(r#"{"foo": "bar"}"#).unwrap();
        assert_eq!(value.get("foo").and_then(Value::as_str), Some("bar"));
        assert_eq!(value.as_object().map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_mixed_array() {
        let value = parse_str("[1, 2.5, true, null]").unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].as_i64(), Some(1));
        assert_eq!(items[1].as_number().map(NumberString::as_str), Some("2.5"));
        assert_eq!(items[2], Value::Boolean(true));
        assert_eq!(items[3], Value::Null);
    }

    #[test]
    fn test_nested_and_empty_containers() {
        let value = parse_str(r#" { "a" : [ {}, [], [[ ]] ], "b" : {"c":{}} } "#).unwrap();
        assert_eq!(
            value.get("a"),
            Some(&Value::from(vec![
                Value::object(),
                Value::array(),
                Value::from(vec![Value::array()]),
            ]))
        );
        assert_eq!(value.get("b").and_then(|b| b.get("c")), Some(&Value::object()));
    }

    #[test]
    fn test_document_start() {
        assert!(matches!(parse_str(""), Err(ParseError::EmptyDocument)));
        assert!(matches!(parse_str(" \n\t "), Err(ParseError::EmptyDocument)));
        assert!(matches!(
            parse_str("42"),
            Err(ParseError::InvalidDocumentStart(TokenKind::Number))
        ));
        assert!(matches!(
            parse_str(r#""text""#),
            Err(ParseError::InvalidDocumentStart(TokenKind::String))
        ));
        assert!(matches!(
            parse_str("}"),
            Err(ParseError::InvalidDocumentStart(TokenKind::CloseBrace))
        ));
    }

    #[test]
    fn test_trailing_content() {
        assert!(matches!(
            parse_str("{} {}"),
            Err(ParseError::TrailingContent(TokenKind::OpenBrace))
        ));
        assert!(matches!(
            parse_str("[1]]"),
            Err(ParseError::TrailingContent(TokenKind::CloseBracket))
        ));
        assert!(parse_str("[1]  \r\n").is_ok());
    }

    #[test]
    fn test_object_errors() {
        assert!(matches!(
            parse_str(r#"{"a" 1}"#),
            Err(ParseError::ExpectedColon { key, found: TokenKind::Number }) if key == "a"
        ));
        assert!(matches!(
            parse_str(r#"{"foo":"#),
            Err(ParseError::ExpectedValue { key, found: TokenKind::EndOfInput }) if key == "foo"
        ));
        assert!(matches!(
            parse_str(r#"{"a":}"#),
            Err(ParseError::ExpectedValue { key, found: TokenKind::CloseBrace }) if key == "a"
        ));
        assert!(matches!(
            parse_str(r#"{"a":1 "b":2}"#),
            Err(ParseError::ExpectedCommaOrBrace { key, found: TokenKind::String }) if key == "a"
        ));
        assert!(matches!(
            parse_str("{1:2}"),
            Err(ParseError::ExpectedKey(TokenKind::Number))
        ));
        assert!(matches!(
            parse_str(r#"{"a":1,}"#),
            Err(ParseError::ExpectedKey(TokenKind::CloseBrace))
        ));
        assert!(matches!(
            parse_str("{"),
            Err(ParseError::ExpectedKey(TokenKind::EndOfInput))
        ));
    }

    #[test]
    fn test_duplicate_key() {
        assert!(matches!(
            parse_str(r#"{"a":1,"b":2,"a":3}"#),
            Err(ParseError::DuplicateKey(key)) if key == "a"
        ));
        // Same key in sibling objects is fine
        assert!(parse_str(r#"[{"a":1},{"a":2}]"#).is_ok());
    }

    #[test]
    fn test_array_errors() {
        assert!(matches!(
            parse_str("[1,]"),
            Err(ParseError::ExpectedArrayValue(TokenKind::CloseBracket))
        ));
        assert!(matches!(
            parse_str("[1,"),
            Err(ParseError::ExpectedArrayValue(TokenKind::EndOfInput))
        ));
        assert!(matches!(
            parse_str("[,1]"),
            Err(ParseError::ExpectedArrayValue(TokenKind::Comma))
        ));
        assert!(matches!(
            parse_str("[1 2]"),
            Err(ParseError::ExpectedCommaOrBracket(TokenKind::Number))
        ));
        assert!(matches!(
            parse_str("[1"),
            Err(ParseError::ExpectedCommaOrBracket(TokenKind::EndOfInput))
        ));
    }

    #[test]
    fn test_lexical_errors_surface() {
        let err = parse_str("[tru]").unwrap_err();
        assert!(err.is_lexical());
        assert!(matches!(err, ParseError::InvalidLiteral { partial } if partial == "tru"));
        assert!(matches!(
            parse_str("[01]"),
            Err(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_max_depth() {
        let deep = |n: usize| {
            let mut s = String::new();
            (0..n).for_each(|_| s.push('['));
            (0..n).for_each(|_| s.push(']'));
            s
        };
        assert!(Parser::with_max_depth(ChunkReader::full_slice(deep(4).as_bytes()), 4)
            .parse()
            .is_ok());
        assert!(matches!(
            Parser::with_max_depth(ChunkReader::full_slice(deep(5).as_bytes()), 4).parse(),
            Err(ParseError::MaxDepthReached(4))
        ));
        assert_eq!(Parser::from_slice(b"[]").max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_depth_is_released_by_siblings() {
        let reader = ChunkReader::full_slice(br#"[[1],{"a":[]},[[]]]"#);
        assert!(Parser::with_max_depth(reader, 3).parse().is_ok());
    }

    #[test]
    fn test_parse_value_leaves_non_value_token() {
        let mut parser = Parser::from_slice(b"]");
        assert!(parser.parse_value().unwrap().is_none());
        assert!(matches!(
            parser.finish(),
            Err(ParseError::TrailingContent(TokenKind::CloseBracket))
        ));
    }

    #[test]
    fn test_array_cursor_is_fused() {
        let mut parser = Parser::from_slice(b"[1 2]");
        let mut cursor = ArrayCursor::open(&mut parser).unwrap();
        assert_eq!(cursor.next_element(&mut parser).unwrap(), Some(Value::from(1)));
        assert!(cursor.next_element(&mut parser).is_err());
        assert!(cursor.is_done());
        assert_eq!(cursor.next_element(&mut parser).unwrap(), None);
    }

    #[test]
    fn test_must_parse() {
        assert_eq!(must_parse("[true]"), Value::from(vec![true]));
    }

    #[test]
    #[should_panic(expected = "must_parse")]
    fn test_must_parse_panics_on_error() {
        must_parse("[");
    }

    #[test]
    fn test_chunked_reader_matches_whole_slice() {
        let doc = br#"{"key": ["value", 12345678901234567890, -0.5e-10, false]}"#;
        let whole = parse_slice(doc).unwrap();
        for chunk in 1..8 {
            assert_eq!(parse(ChunkReader::new(doc, chunk)).unwrap(), whole);
        }
    }
}
