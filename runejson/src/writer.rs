// SPDX-License-Identifier: Apache-2.0

//! Compact JSON output.
//!
//! Output has no insignificant whitespace. Object members come out in key
//! order and numbers are written as their exact source text, so
//! `parse(to_string(v)) == v` for every [`Value`].

use alloc::string::String;
use core::convert::Infallible;

use crate::value::Value;

/// A sink for JSON text.
pub trait Writer {
    /// Error reported by the sink, passed through [`write`] unchanged.
    type Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error>;

    fn write_char(&mut self, c: char) -> Result<(), Self::Error> {
        let mut buf = [0u8; 4];
        self.write_str(c.encode_utf8(&mut buf))
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    type Error = W::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        (**self).write_str(s)
    }
}

impl Writer for String {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.push_str(s);
        Ok(())
    }
}

/// Adapter so `Display` impls can reuse [`write`].
pub(crate) struct FmtWriter<'a, 'b>(pub &'a mut core::fmt::Formatter<'b>);

impl Writer for FmtWriter<'_, '_> {
    type Error = core::fmt::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.0.write_str(s)
    }
}

/// Writes to any [`std::io::Write`].
///
/// No buffering is added; wrap the sink in a `BufWriter` for many small
/// writes to a file or socket.
#[cfg(feature = "std")]
pub struct IoWriter<W: std::io::Write> {
    inner: W,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> IoWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> Writer for IoWriter<W> {
    type Error = std::io::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.inner.write_all(s.as_bytes())
    }
}

/// Serializes `value` as compact JSON into `out`.
///
/// The first sink error aborts the write; whatever was written before it
/// stays in the sink.
pub fn write<W: Writer + ?Sized>(out: &mut W, value: &Value) -> Result<(), W::Error> {
    match value {
        Value::Null => out.write_str("null"),
        Value::Boolean(true) => out.write_str("true"),
        Value::Boolean(false) => out.write_str("false"),
        Value::Number(n) => out.write_str(n.as_str()),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write(out, item)?;
            }
            out.write_char(']')
        }
        Value::Object(map) => {
            out.write_char('{')?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_string(out, key)?;
                out.write_char(':')?;
                write(out, item)?;
            }
            out.write_char('}')
        }
    }
}

/// Serializes `value` as compact JSON into a new `String`.
pub fn to_string(value: &Value) -> String {
    let mut out = String::new();
    match write(&mut out, value) {
        Ok(()) => out,
        Err(never) => match never {},
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Writes `s` as a quoted JSON string.
///
/// Unescaped runs are written in one call, so a string without special
/// characters costs three writes.
fn write_string<W: Writer + ?Sized>(out: &mut W, s: &str) -> Result<(), W::Error> {
    out.write_char('"')?;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        let simple = match c {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            '\u{08}' => "\\b",
            '\u{0C}' => "\\f",
            c if c < ' ' => "",
            _ => continue,
        };
        if start < i {
            out.write_str(&s[start..i])?;
        }
        if simple.is_empty() {
            let byte = c as u8;
            out.write_str("\\u00")?;
            out.write_char(HEX_DIGITS[usize::from(byte >> 4)] as char)?;
            out.write_char(HEX_DIGITS[usize::from(byte & 0xF)] as char)?;
        } else {
            out.write_str(simple)?;
        }
        start = i + c.len_utf8();
    }
    if start < s.len() {
        out.write_str(&s[start..])?;
    }
    out.write_char('"')
}
