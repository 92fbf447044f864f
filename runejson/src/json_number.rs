// SPDX-License-Identifier: Apache-2.0

use alloc::string::{String, ToString};
use core::ops::Deref;
use core::str::FromStr;

use crate::number_parser::is_valid_number;
use crate::ParseError;

/// The exact text of a JSON number.
///
/// Numbers are never converted to a binary float on the way in or out, so
/// integers wider than 64 bits and decimals with more digits than an `f64`
/// survive a parse/write round trip unchanged. Conversions to native types
/// are explicit and fallible.
///
/// Equality is textual: `1`, `1.0` and `1e0` are three different values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumberString(String);

impl NumberString {
    /// Validate `text` against the JSON number grammar.
    pub fn new(text: impl Into<String>) -> Result<Self, ParseError> {
        let text = text.into();
        if is_valid_number(&text) {
            Ok(Self(text))
        } else {
            Err(ParseError::InvalidNumber { partial: text })
        }
    }

    /// Wraps text the lexer has already checked.
    pub(crate) fn from_lexed(text: String) -> Self {
        Self(text)
    }

    /// Always available: get the exact string representation.
    /// This preserves full precision and never loses information.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Parse the number as a custom type using the exact string representation.
    /// This allows using external libraries like BigDecimal, arbitrary precision, etc.
    pub fn parse<T: FromStr>(&self) -> Result<T, T::Err> {
        T::from_str(self.as_str())
    }

    /// Check if this number represents an integer (no decimal point or exponent).
    pub fn is_integer(&self) -> bool {
        is_integer(self.0.as_bytes())
    }

    /// Returns true if this number has a decimal point or exponent.
    pub fn is_float(&self) -> bool {
        !self.is_integer()
    }

    /// The value as an `i64`, if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        self.integer()
    }

    /// The value as a `u64`, if it is a non-negative integer in range.
    pub fn as_u64(&self) -> Option<u64> {
        self.integer()
    }

    pub fn as_i128(&self) -> Option<i128> {
        self.integer()
    }

    pub fn as_u128(&self) -> Option<u128> {
        self.integer()
    }

    /// The nearest `f64`. Integers and decimals alike; precision may be lost.
    #[cfg(feature = "float")]
    pub fn as_f64(&self) -> Option<f64> {
        self.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn integer<T: FromStr>(&self) -> Option<T> {
        if self.is_integer() {
            self.parse().ok()
        } else {
            None
        }
    }
}

/// Detects if a number byte slice represents an integer (no decimal point or exponent).
/// JSON numbers are pure ASCII, so this avoids unnecessary UTF-8 string processing.
pub fn is_integer(bytes: &[u8]) -> bool {
    !bytes.iter().any(|&b| b == b'.' || b == b'e' || b == b'E')
}

impl AsRef<str> for NumberString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for NumberString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl core::fmt::Display for NumberString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NumberString {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<NumberString> for String {
    fn from(number: NumberString) -> Self {
        number.0
    }
}

macro_rules! impl_from_integer {
    ($($int_ty:ty),*) => {
        $(
            impl From<$int_ty> for NumberString {
                fn from(value: $int_ty) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Non-finite floats have no JSON representation.
#[cfg(feature = "float")]
impl TryFrom<f64> for NumberString {
    type Error = ParseError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        // Display never uses exponent notation and prints NaN/inf as text,
        // which the grammar check rejects.
        Self::new(value.to_string())
    }
}

#[cfg(feature = "float")]
impl TryFrom<f32> for NumberString {
    type Error = ParseError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}
