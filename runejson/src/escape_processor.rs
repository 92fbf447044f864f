// SPDX-License-Identifier: Apache-2.0

/// Pure functions for decoding JSON string escape sequences.
///
/// The lexer owns the rune cursor; this type only answers questions about
/// characters and code units it has already read.
pub struct EscapeProcessor;

/// Result of classifying one `\uXXXX` code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeUnit {
    /// A complete scalar value in the Basic Multilingual Plane.
    Scalar(char),
    /// One half of a UTF-16 surrogate pair; another `\u` escape must follow.
    Surrogate(u32),
}

impl EscapeProcessor {
    /// Process a simple escape sequence character and return the unescaped char.
    ///
    /// # Arguments
    /// * `escape_char` - The character following the backslash
    ///
    /// # Returns
    /// The unescaped character, or `None` for `u` and every unknown escape.
    ///
    /// # Examples
    /// ```ignore
    /// assert_eq!(EscapeProcessor::process_simple_escape('n'), Some('\n'));
    /// ```
    pub fn process_simple_escape(escape_char: char) -> Option<char> {
        match escape_char {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '\\' => Some('\\'),
            '"' => Some('"'),
            '/' => Some('/'),
            'b' => Some('\u{08}'), // Backspace
            'f' => Some('\u{0C}'), // Form feed
            _ => None,
        }
    }

    /// Numeric value (0-15) of a hexadecimal digit.
    pub fn validate_hex_digit(c: char) -> Option<u32> {
        c.to_digit(16)
    }

    /// Check if a code unit is a high surrogate (0xD800-0xDBFF)
    pub fn is_high_surrogate(unit: u32) -> bool {
        (0xD800..=0xDBFF).contains(&unit)
    }

    /// Check if a code unit is a low surrogate (0xDC00-0xDFFF)
    pub fn is_low_surrogate(unit: u32) -> bool {
        (0xDC00..=0xDFFF).contains(&unit)
    }

    pub fn is_surrogate(unit: u32) -> bool {
        Self::is_high_surrogate(unit) || Self::is_low_surrogate(unit)
    }

    /// Classify a 16-bit code unit read from `\uXXXX`.
    pub fn classify(unit: u32) -> Option<CodeUnit> {
        if Self::is_surrogate(unit) {
            Some(CodeUnit::Surrogate(unit))
        } else {
            char::from_u32(unit).map(CodeUnit::Scalar)
        }
    }

    /// Combine two surrogate code units into one scalar value.
    ///
    /// The halves are accepted in either order, so `\uD834\uDD1E` and
    /// `\uDD1E\uD834` both decode to U+1D11E. Two halves of the same kind
    /// return `None`.
    pub fn combine_surrogate_pair(first: u32, second: u32) -> Option<char> {
        let (high, low) = if Self::is_high_surrogate(first) && Self::is_low_surrogate(second) {
            (first, second)
        } else if Self::is_low_surrogate(first) && Self::is_high_surrogate(second) {
            (second, first)
        } else {
            return None;
        };

        // Combine surrogates according to UTF-16 specification
        let codepoint = 0x10000 + ((high & 0x3FF) << 10) + (low & 0x3FF);
        char::from_u32(codepoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_escapes() {
        assert_eq!(EscapeProcessor::process_simple_escape('n'), Some('\n'));
        assert_eq!(EscapeProcessor::process_simple_escape('t'), Some('\t'));
        assert_eq!(EscapeProcessor::process_simple_escape('r'), Some('\r'));
        assert_eq!(EscapeProcessor::process_simple_escape('\\'), Some('\\'));
        assert_eq!(EscapeProcessor::process_simple_escape('"'), Some('"'));
        assert_eq!(EscapeProcessor::process_simple_escape('/'), Some('/'));
        assert_eq!(EscapeProcessor::process_simple_escape('b'), Some('\u{08}'));
        assert_eq!(EscapeProcessor::process_simple_escape('f'), Some('\u{0C}'));
    }

    #[test]
    fn test_invalid_simple_escape() {
        assert_eq!(EscapeProcessor::process_simple_escape('x'), None);
        assert_eq!(EscapeProcessor::process_simple_escape('u'), None);
        assert_eq!(EscapeProcessor::process_simple_escape('1'), None);
    }

    #[test]
    fn test_hex_digit_validation() {
        assert_eq!(EscapeProcessor::validate_hex_digit('0'), Some(0));
        assert_eq!(EscapeProcessor::validate_hex_digit('9'), Some(9));
        assert_eq!(EscapeProcessor::validate_hex_digit('a'), Some(10));
        assert_eq!(EscapeProcessor::validate_hex_digit('F'), Some(15));

        assert_eq!(EscapeProcessor::validate_hex_digit('g'), None);
        assert_eq!(EscapeProcessor::validate_hex_digit(' '), None);
        assert_eq!(EscapeProcessor::validate_hex_digit('\u{663}'), None); // Arabic-Indic three
    }

    #[test]
    fn test_surrogate_pair_detection() {
        assert!(EscapeProcessor::is_high_surrogate(0xD800));
        assert!(EscapeProcessor::is_high_surrogate(0xDBFF));
        assert!(!EscapeProcessor::is_high_surrogate(0xD7FF));
        assert!(!EscapeProcessor::is_high_surrogate(0xDC00));

        assert!(EscapeProcessor::is_low_surrogate(0xDC00));
        assert!(EscapeProcessor::is_low_surrogate(0xDFFF));
        assert!(!EscapeProcessor::is_low_surrogate(0xDBFF));
        assert!(!EscapeProcessor::is_low_surrogate(0xE000));
    }

    #[test]
    fn test_classify() {
        assert_eq!(EscapeProcessor::classify(0x41), Some(CodeUnit::Scalar('A')));
        assert_eq!(EscapeProcessor::classify(0x0), Some(CodeUnit::Scalar('\0')));
        assert_eq!(
            EscapeProcessor::classify(0xD801),
            Some(CodeUnit::Surrogate(0xD801))
        );
        assert_eq!(
            EscapeProcessor::classify(0xDC37),
            Some(CodeUnit::Surrogate(0xDC37))
        );
    }

    #[test]
    fn test_surrogate_pair_combination() {
        // \uD801\uDC37 -> U+10437
        assert_eq!(
            EscapeProcessor::combine_surrogate_pair(0xD801, 0xDC37),
            Some('\u{10437}')
        );
        // Both orders of the musical symbol G clef
        assert_eq!(
            EscapeProcessor::combine_surrogate_pair(0xD834, 0xDD1E),
            Some('\u{1D11E}')
        );
        assert_eq!(
            EscapeProcessor::combine_surrogate_pair(0xDD1E, 0xD834),
            Some('\u{1D11E}')
        );

        assert_eq!(EscapeProcessor::combine_surrogate_pair(0xD801, 0xD802), None);
        assert_eq!(EscapeProcessor::combine_surrogate_pair(0xDC01, 0xDC02), None);
        assert_eq!(EscapeProcessor::combine_surrogate_pair(0x0041, 0xDC37), None);
    }
}
