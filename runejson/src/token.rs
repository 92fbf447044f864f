// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

/// Tokens produced by the [`Lexer`](crate::Lexer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// A string with all escapes decoded, without the surrounding quotes.
    String(String),
    /// The exact source text of a number.
    Number(String),
    /// `true` or `false`
    Boolean(bool),
    /// `null`
    Null,
    /// No more tokens in the input.
    EndOfInput,
}

/// Payload-free discriminant of a [`Token`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    Colon,
    String,
    Number,
    Boolean,
    Null,
    EndOfInput,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::OpenBrace => TokenKind::OpenBrace,
            Token::CloseBrace => TokenKind::CloseBrace,
            Token::OpenBracket => TokenKind::OpenBracket,
            Token::CloseBracket => TokenKind::CloseBracket,
            Token::Comma => TokenKind::Comma,
            Token::Colon => TokenKind::Colon,
            Token::String(_) => TokenKind::String,
            Token::Number(_) => TokenKind::Number,
            Token::Boolean(_) => TokenKind::Boolean,
            Token::Null => TokenKind::Null,
            Token::EndOfInput => TokenKind::EndOfInput,
        }
    }

    /// Returns true if this token can start a value on its own.
    pub fn starts_value(&self) -> bool {
        !matches!(
            self,
            Token::CloseBrace
                | Token::CloseBracket
                | Token::Comma
                | Token::Colon
                | Token::EndOfInput
        )
    }
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
            TokenKind::OpenBracket => "'['",
            TokenKind::CloseBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Boolean => "boolean",
            TokenKind::Null => "null",
            TokenKind::EndOfInput => "end of input",
        };
        f.write_str(text)
    }
}
