// SPDX-License-Identifier: Apache-2.0

//! A JSON value model and a recursive-descent parser over pull-based byte
//! readers.
//!
//! Documents are read through the [`Reader`] trait, decoded to runes, lexed
//! into [`Token`]s and parsed into [`Value`]s. Numbers keep their exact source
//! text as [`NumberString`], so nothing is lost to binary floating point.
//!
//! ```
//! use runejson::{parse_str, to_string, Value};
//!
//! let value = parse_str(r#"{"name": "rune", "big": 123456789012345678901234567890}"#)?;
//! assert_eq!(value.get("name").and_then(Value::as_str), Some("rune"));
//! assert_eq!(
//!     to_string(&value),
//!     r#"{"big":123456789012345678901234567890,"name":"rune"}"#
//! );
//! # Ok::<(), runejson::ParseError>(())
//! ```
//!
//! Large top-level arrays can be consumed one element at a time with
//! [`iterate`], which never reads further ahead than the element it returns.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod reader;
pub use reader::Reader;
#[cfg(feature = "std")]
pub use reader::IoReader;

mod chunk_reader;
pub use chunk_reader::ChunkReader;

mod rune_reader;
pub use rune_reader::{RuneReader, READ_CHUNK_SIZE};

mod escape_processor;

mod number_parser;

mod token;
pub use token::{Token, TokenKind};

mod lexer;
pub use lexer::Lexer;

mod parse_error;
pub use parse_error::{ParseError, ReaderError, NUMBER_REGEX};

mod json_number;
pub use json_number::NumberString;

mod value;
pub use value::{Map, Value};

mod parser;
pub use parser::{must_parse, parse, parse_slice, parse_str, Parser, DEFAULT_MAX_DEPTH};

mod value_stream;
pub use value_stream::{iterate, iterate_with_max_depth, ValueStream};

mod writer;
#[cfg(feature = "std")]
pub use writer::IoWriter;
pub use writer::{to_string, write, Writer};
