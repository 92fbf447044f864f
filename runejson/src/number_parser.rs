// SPDX-License-Identifier: Apache-2.0

//! Character-at-a-time recognizer for the JSON number grammar
//! `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.

/// Position of the scanner inside the number grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing consumed yet
    Start,
    /// After `-`, a digit is required
    Sign,
    /// Integer part is a single `0`
    Zero,
    /// Integer part `[1-9][0-9]*`
    Integer,
    /// After `.`, a digit is required
    Dot,
    Fraction,
    /// After `e`/`E`, a sign or digit is required
    Exponent,
    /// After the exponent sign, a digit is required
    ExponentSign,
    ExponentDigits,
}

/// Incremental number grammar checker.
///
/// Feed characters with [`push`](Self::push); a rejected character leaves the
/// scanner unchanged. [`is_complete`](Self::is_complete) reports whether the
/// text so far is a full number (every entered segment has its digit).
#[derive(Debug, Clone)]
pub struct NumberScanner {
    state: State,
}

impl NumberScanner {
    pub const fn new() -> Self {
        Self {
            state: State::Start,
        }
    }

    /// Characters that may appear anywhere in a number.
    pub const fn is_number_char(c: char) -> bool {
        matches!(c, '0'..='9' | '-' | '+' | '.' | 'e' | 'E')
    }

    /// Advance by one character. Returns false if the grammar forbids it here.
    pub fn push(&mut self, c: char) -> bool {
        let next = match (self.state, c) {
            (State::Start, '-') => State::Sign,
            (State::Start | State::Sign, '0') => State::Zero,
            (State::Start | State::Sign, '1'..='9') => State::Integer,
            (State::Integer, '0'..='9') => State::Integer,
            (State::Zero | State::Integer, '.') => State::Dot,
            (State::Dot | State::Fraction, '0'..='9') => State::Fraction,
            (State::Zero | State::Integer | State::Fraction, 'e' | 'E') => State::Exponent,
            (State::Exponent, '+' | '-') => State::ExponentSign,
            (State::Exponent | State::ExponentSign | State::ExponentDigits, '0'..='9') => {
                State::ExponentDigits
            }
            _ => return false,
        };
        self.state = next;
        true
    }

    /// True when the characters pushed so far form a complete number.
    pub fn is_complete(&self) -> bool {
        matches!(
            self.state,
            State::Zero | State::Integer | State::Fraction | State::ExponentDigits
        )
    }
}

impl Default for NumberScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a whole string against the number grammar.
pub fn is_valid_number(text: &str) -> bool {
    let mut scanner = NumberScanner::new();
    text.chars().all(|c| scanner.push(c)) && scanner.is_complete()
}
