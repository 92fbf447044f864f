// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

use crate::escape_processor::{CodeUnit, EscapeProcessor};
use crate::number_parser::NumberScanner;
use crate::parse_error::ParseError;
use crate::rune_reader::RuneReader;
use crate::token::Token;
use crate::{ChunkReader, Reader};

/// Turns a rune stream into [`Token`]s.
///
/// The lexer keeps no state between tokens apart from one token of
/// look-ahead for [`peek`](Self::peek); everything else lives in the local
/// variables of a single `lex_*` call.
pub struct Lexer<R: Reader> {
    runes: RuneReader<R>,
    peeked: Option<Token>,
    /// Set once the iterator has yielded end of input or an error
    done: bool,
}

impl<'a> Lexer<ChunkReader<'a>> {
    /// Creates a lexer over an in-memory document.
    pub fn from_slice(input: &'a [u8]) -> Self {
        Self::new(ChunkReader::full_slice(input))
    }
}

impl<R: Reader> Lexer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            runes: RuneReader::new(reader),
            peeked: None,
            done: false,
        }
    }

    /// Byte offset of the first byte not yet turned into a token (or peeked rune).
    pub fn offset(&self) -> usize {
        self.runes.offset()
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token, ParseError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lex()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Consumes and returns the next token. End of input is
    /// [`Token::EndOfInput`], returned as often as it is asked for.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lex(),
        }
    }

    fn lex(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace()?;

        let Some(c) = self.runes.peek()? else {
            return Ok(Token::EndOfInput);
        };
        let token = match c {
            '{' | '}' | '[' | ']' | ',' | ':' => {
                self.runes.next_rune()?;
                match c {
                    '{' => Token::OpenBrace,
                    '}' => Token::CloseBrace,
                    '[' => Token::OpenBracket,
                    ']' => Token::CloseBracket,
                    ',' => Token::Comma,
                    _ => Token::Colon,
                }
            }
            '"' => {
                self.runes.next_rune()?;
                self.lex_string()?
            }
            '-' | '0'..='9' => self.lex_number()?,
            't' | 'f' | 'n' => self.lex_literal()?,
            other => {
                self.runes.next_rune()?;
                return Err(ParseError::InvalidCharacter(other));
            }
        };
        log::trace!("token {:?} ending at byte {}", token, self.runes.offset());
        Ok(token)
    }

    fn skip_whitespace(&mut self) -> Result<(), ParseError> {
        while self
            .runes
            .next_if(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))?
            .is_some()
        {}
        Ok(())
    }

    /// Lexes the rest of a string after its opening quote.
    ///
    /// `raw` mirrors the source text for diagnostics; `text` collects the
    /// decoded content.
    fn lex_string(&mut self) -> Result<Token, ParseError> {
        let mut raw = String::from('"');
        let mut text = String::new();
        loop {
            let Some(c) = self.runes.next_rune()? else {
                return Err(ParseError::IncompleteString { partial: raw });
            };
            raw.push(c);
            match c {
                '"' => return Ok(Token::String(text)),
                '\\' => self.lex_escape(&mut raw, &mut text)?,
                c if u32::from(c) < 0x20 => {
                    return Err(ParseError::ControlCharacter { partial: raw })
                }
                c => text.push(c),
            }
        }
    }

    /// Decodes one escape sequence; the backslash is already consumed.
    fn lex_escape(&mut self, raw: &mut String, text: &mut String) -> Result<(), ParseError> {
        let Some(c) = self.runes.next_rune()? else {
            return Err(ParseError::IncompleteEscape {
                partial: raw.clone(),
            });
        };
        raw.push(c);
        if c != 'u' {
            let decoded = EscapeProcessor::process_simple_escape(c).ok_or_else(|| {
                ParseError::IllegalEscape {
                    partial: raw.clone(),
                }
            })?;
            text.push(decoded);
            return Ok(());
        }

        let first = match EscapeProcessor::classify(self.read_code_unit(raw)?) {
            Some(CodeUnit::Scalar(ch)) => {
                text.push(ch);
                return Ok(());
            }
            Some(CodeUnit::Surrogate(unit)) => unit,
            None => {
                return Err(ParseError::IllegalEscape {
                    partial: raw.clone(),
                })
            }
        };

        // A surrogate half needs its partner right away
        for expected in ['\\', 'u'] {
            match self.runes.next_rune()? {
                Some(c) if c == expected => raw.push(c),
                Some(c) => {
                    raw.push(c);
                    return Err(ParseError::MissingSurrogateEscape {
                        partial: raw.clone(),
                    });
                }
                None => {
                    return Err(ParseError::IncompleteEscape {
                        partial: raw.clone(),
                    })
                }
            }
        }

        let second = self.read_code_unit(raw)?;
        if !EscapeProcessor::is_surrogate(second) {
            return Err(ParseError::NonSurrogateEscape {
                partial: raw.clone(),
            });
        }
        let ch = EscapeProcessor::combine_surrogate_pair(first, second).ok_or_else(|| {
            ParseError::InvalidSurrogatePair {
                partial: raw.clone(),
            }
        })?;
        text.push(ch);
        Ok(())
    }

    /// Reads the four hex digits of a `\uXXXX` escape.
    fn read_code_unit(&mut self, raw: &mut String) -> Result<u32, ParseError> {
        let mut unit = 0u32;
        for _ in 0..4 {
            let Some(c) = self.runes.next_rune()? else {
                return Err(ParseError::IncompleteEscape {
                    partial: raw.clone(),
                });
            };
            raw.push(c);
            let digit = EscapeProcessor::validate_hex_digit(c).ok_or_else(|| {
                ParseError::IllegalEscape {
                    partial: raw.clone(),
                }
            })?;
            unit = (unit << 4) | digit;
        }
        Ok(unit)
    }

    /// Lexes a number, keeping its exact source text.
    fn lex_number(&mut self) -> Result<Token, ParseError> {
        let mut scanner = NumberScanner::new();
        let mut text = String::new();
        while let Some(c) = self.runes.next_if(NumberScanner::is_number_char)? {
            text.push(c);
            if !scanner.push(c) {
                return Err(ParseError::InvalidNumber { partial: text });
            }
        }
        if !scanner.is_complete() {
            return Err(ParseError::InvalidNumber { partial: text });
        }
        Ok(Token::Number(text))
    }

    /// Lexes `true`, `false` or `null`.
    fn lex_literal(&mut self) -> Result<Token, ParseError> {
        let mut text = String::new();
        while let Some(c) = self.runes.next_if(|c| c.is_ascii_lowercase())? {
            text.push(c);
        }
        match text.as_str() {
            "true" => Ok(Token::Boolean(true)),
            "false" => Ok(Token::Boolean(false)),
            "null" => Ok(Token::Null),
            _ => Err(ParseError::InvalidLiteral { partial: text }),
        }
    }
}

impl<R: Reader> Iterator for Lexer<R> {
    type Item = Result<Token, ParseError>;

    /// Yields tokens up to, but not including, [`Token::EndOfInput`].
    /// Stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(Token::EndOfInput) => {
                self.done = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use test_log::test;

    fn lex(input: &str) -> Result<Vec<Token>, ParseError> {
        Lexer::from_slice(input.as_bytes()).collect()
    }

    fn lex_one(input: &str) -> Result<Token, ParseError> {
        Lexer::from_slice(input.as_bytes()).next_token()
    }

    fn string(s: &str) -> Token {
        Token::String(s.into())
    }

    #[test]
    fn test_structural_tokens() {
        let tokens = lex(" { } [ ] , : ").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::OpenBrace,
                Token::CloseBrace,
                Token::OpenBracket,
                Token::CloseBracket,
                Token::Comma,
                Token::Colon,
            ]
        );
    }

    #[test]
    fn test_literals() {
        let tokens = lex("null\ttrue\r\nfalse").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Null, Token::Boolean(true), Token::Boolean(false)]
        );
    }

    #[test]
    fn test_invalid_literals() {
        for input in ["nul", "nulll", "True", "fals", "nan"] {
            match lex_one(input) {
                Err(ParseError::InvalidLiteral { .. }) | Err(ParseError::InvalidCharacter(_)) => {}
                other => panic!("{input:?}: expected literal error, got {other:?}"),
            }
        }
        assert!(matches!(
            lex_one("tru e"),
            Err(ParseError::InvalidLiteral { partial }) if partial == "tru"
        ));
    }

    #[test]
    fn test_end_of_input_repeats() {
        let mut lexer = Lexer::from_slice(b"  \n ");
        assert_eq!(lexer.next_token().unwrap(), Token::EndOfInput);
        assert_eq!(lexer.next_token().unwrap(), Token::EndOfInput);
    }

    #[test]
    fn test_peek_then_next() {
        let mut lexer = Lexer::from_slice(br#"{"a""#);
        assert_eq!(lexer.peek().unwrap(), &Token::OpenBrace);
        assert_eq!(lexer.peek().unwrap(), &Token::OpenBrace);
        assert_eq!(lexer.next_token().unwrap(), Token::OpenBrace);
        assert_eq!(lexer.next_token().unwrap(), string("a"));
        assert_eq!(lexer.peek().unwrap(), &Token::EndOfInput);
    }

    #[test]
    fn test_invalid_character() {
        assert!(matches!(lex_one("@"), Err(ParseError::InvalidCharacter('@'))));
        assert!(matches!(lex_one("'a'"), Err(ParseError::InvalidCharacter('\''))));
        assert!(matches!(lex_one("+1"), Err(ParseError::InvalidCharacter('+'))));
    }

    #[test]
    fn test_string() {
        assert_eq!(lex_one(r#""hello""#).unwrap(), string("hello"));
        assert_eq!(lex_one(r#""""#).unwrap(), string(""));
        assert_eq!(lex_one("\"caf\u{e9} \u{1F600}\"").unwrap(), string("caf\u{e9} \u{1F600}"));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            lex_one(r#""a\nb\tc\"d\\e\/f\bg\fh\ri""#).unwrap(),
            string("a\nb\tc\"d\\e/f\u{08}g\u{0C}h\ri")
        );
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(lex_one(r#""\u0041""#).unwrap(), string("A"));
        assert_eq!(lex_one(r#""\u00e9\u00E9""#).unwrap(), string("\u{e9}\u{e9}"));
        assert_eq!(lex_one(r#""\u0000""#).unwrap(), string("\0"));
    }

    #[test]
    fn test_surrogate_pairs_either_order() {
        let clef = string("\u{1D11E}");
        assert_eq!(lex_one(r#""\uD834\uDD1E""#).unwrap(), clef);
        assert_eq!(lex_one(r#""\uDD1E\uD834""#).unwrap(), clef);
        assert_eq!(lex_one(r#""\ud834\udd1e""#).unwrap(), clef);
    }

    #[test]
    fn test_control_character_rejected() {
        assert!(matches!(
            lex_one("\"ab\ncd\""),
            Err(ParseError::ControlCharacter { partial }) if partial == "\"ab\n"
        ));
        assert!(matches!(
            lex_one("\"\u{1f}\""),
            Err(ParseError::ControlCharacter { .. })
        ));
        // DEL is not a control character for JSON
        assert_eq!(lex_one("\"\u{7f}\"").unwrap(), string("\u{7f}"));
    }

    #[test]
    fn test_incomplete_string() {
        assert!(matches!(
            lex_one(r#""abc"#),
            Err(ParseError::IncompleteString { partial }) if partial == "\"abc"
        ));
        assert!(matches!(
            lex_one(r#""abc\""#),
            Err(ParseError::IncompleteString { .. })
        ));
    }

    #[test]
    fn test_escape_errors() {
        assert!(matches!(lex_one(r#""\"#), Err(ParseError::IncompleteEscape { .. })));
        assert!(matches!(lex_one(r#""\u12"#), Err(ParseError::IncompleteEscape { .. })));
        assert!(matches!(
            lex_one(r#""\x""#),
            Err(ParseError::IllegalEscape { partial }) if partial == r#""\x"#
        ));
        assert!(matches!(
            lex_one(r#""\u12G4""#),
            Err(ParseError::IllegalEscape { partial }) if partial == r#""\u12G"#
        ));
    }

    #[test]
    fn test_surrogate_errors() {
        assert!(matches!(
            lex_one(r#""\uD834x""#),
            Err(ParseError::MissingSurrogateEscape { .. })
        ));
        assert!(matches!(
            lex_one(r#""\uD834\n""#),
            Err(ParseError::MissingSurrogateEscape { .. })
        ));
        assert!(matches!(
            lex_one(r#""\uD834"#),
            Err(ParseError::IncompleteEscape { .. })
        ));
        assert!(matches!(
            lex_one(r#""\uD834\u0041""#),
            Err(ParseError::NonSurrogateEscape { partial }) if partial == r#""\uD834\u0041"#
        ));
        assert!(matches!(
            lex_one(r#""\uD834\uD834""#),
            Err(ParseError::InvalidSurrogatePair { .. })
        ));
        assert!(matches!(
            lex_one(r#""\uDD1E\uDD1E""#),
            Err(ParseError::InvalidSurrogatePair { .. })
        ));
    }

    #[test]
    fn test_numbers_keep_source_text() {
        let tokens = lex("42 -123 0 -0 3.14 1e10 2.5E-3 0.000 100000000000000000000000001").unwrap();
        let texts: Vec<_> = tokens
            .iter()
            .map(|t| match t {
                Token::Number(text) => text.as_str(),
                other => panic!("Expected number, got {other:?}"),
            })
            .collect();
        assert_eq!(
            texts,
            [
                "42",
                "-123",
                "0",
                "-0",
                "3.14",
                "1e10",
                "2.5E-3",
                "0.000",
                "100000000000000000000000001"
            ]
        );
    }

    #[test]
    fn test_number_terminated_by_structure() {
        assert_eq!(
            lex("[1,-2]").unwrap(),
            vec![
                Token::OpenBracket,
                Token::Number("1".into()),
                Token::Comma,
                Token::Number("-2".into()),
                Token::CloseBracket,
            ]
        );
    }

    #[test]
    fn test_invalid_numbers() {
        for (input, partial) in [
            ("-", "-"),
            ("-a", "-"),
            ("01", "01"),
            ("1.", "1."),
            ("1.e5", "1.e"),
            ("1e", "1e"),
            ("1e+", "1e+"),
            ("1.2.3", "1.2."),
            ("2-1", "2-"),
        ] {
            match lex_one(input) {
                Err(ParseError::InvalidNumber { partial: got }) => {
                    assert_eq!(got, partial, "input {input:?}")
                }
                other => panic!("{input:?}: expected InvalidNumber, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut lexer = Lexer::from_slice(b"[1, ?, 2]");
        assert_eq!(lexer.next().unwrap().unwrap(), Token::OpenBracket);
        assert_eq!(lexer.next().unwrap().unwrap(), Token::Number("1".into()));
        assert_eq!(lexer.next().unwrap().unwrap(), Token::Comma);
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_chunked_input_matches_full_input() {
        let input = r#"{"kéy": [true, -1.5e3, "😀", null]}"#;
        let expected = lex(input).unwrap();
        for chunk in 1..8 {
            let chunked: Vec<Token> = Lexer::new(ChunkReader::new(input.as_bytes(), chunk))
                .collect::<Result<_, _>>()
                .unwrap();
            assert_eq!(chunked, expected, "chunk size {chunk}");
        }
    }
}
