//! Parsing SNBT, the textual form of NBT data.
//!
//! The grammar reads a single value:
//!
//! - numbers, with an optional sign, `0x` or `0b` radix prefix, `_` digit separators and a type
//!   suffix (`b`, `s`, `i`, `l` for integers, optionally prefixed by `u` or `s` to pick
//!   unsigned or signed range; `f` or `d` for floats). Unsuffixed integers are `Int`s, and
//!   unsuffixed numbers with a decimal point or exponent are `Double`s.
//! - quoted strings in `"` or `'`, with the escapes `\b \s \t \n \f \r \\ \" \'`, hex escapes
//!   `\xHH`, `\uHHHH`, `\UHHHHHHHH`, and `\N{NAME}` (with the `named_escapes` feature).
//! - unquoted strings of `[0-9a-zA-Z_\-.+]` that do not start like a number;
//!   `true` and `false` are the bytes `1` and `0`.
//! - compounds `{key: value, ...}` and lists `[value, ...]`, both allowing a trailing comma.
//!   List elements may have different types.
//! - typed arrays `[B; ...]`, `[I; ...]` and `[L; ...]` of integers.
//! - builtin calls `bool(value)` and `uuid("...")`.
//!
//! Whitespace is allowed between any two tokens.

mod builtins;
mod escape;
mod numeric;
mod parser;

#[cfg(test)]
mod tests;


use thiserror::Error;

use crate::ops::{DynamicOps, NbtOps};
use crate::settings::SnbtParseOptions;
use crate::tag::{NbtCompound, NbtTag};
use self::parser::Parser;


pub use self::numeric::NumericParseError;


/// Parses a string into an NBT tag. Anything but whitespace after the value is an error.
#[inline]
pub fn parse_any<T>(string_nbt: &T, opts: SnbtParseOptions) -> Result<NbtTag, SnbtError>
where
    T: AsRef<str> + ?Sized,
{
    parse_with_ops(string_nbt.as_ref(), &NbtOps, opts)
}

/// Parses a string into a compound tag. Anything but whitespace after the value is an error.
pub fn parse_compound<T>(string_nbt: &T, opts: SnbtParseOptions) -> Result<NbtCompound, SnbtError>
where
    T: AsRef<str> + ?Sized,
{
    let mut parser = Parser::new(string_nbt.as_ref(), &NbtOps, opts);
    let compound = parser.parse_root_compound()?;
    parser.finish()?;
    Ok(compound)
}

/// Parses a value from the start of `string_nbt` just like [`parse_any`], but ignores whatever
/// follows it and also returns the number of bytes the value spans.
pub fn parse_any_and_size<T>(
    string_nbt: &T,
    opts:       SnbtParseOptions,
) -> Result<(NbtTag, usize), SnbtError>
where
    T: AsRef<str> + ?Sized,
{
    let mut parser = Parser::new(string_nbt.as_ref(), &NbtOps, opts);
    let tag = parser.parse_value()?;
    Ok((tag, parser.position()))
}

/// Parses a compound from the start of `string_nbt` just like [`parse_compound`], but ignores
/// whatever follows it and also returns the number of bytes the compound spans.
pub fn parse_compound_and_size<T>(
    string_nbt: &T,
    opts:       SnbtParseOptions,
) -> Result<(NbtCompound, usize), SnbtError>
where
    T: AsRef<str> + ?Sized,
{
    let mut parser = Parser::new(string_nbt.as_ref(), &NbtOps, opts);
    let compound = parser.parse_root_compound()?;
    Ok((compound, parser.position()))
}

/// Parses a string into a value built by `ops`. Anything but whitespace after the value is
/// an error.
pub fn parse_with_ops<O: DynamicOps>(
    input: &str,
    ops:   &O,
    opts:  SnbtParseOptions,
) -> Result<O::Value, SnbtError> {
    let mut parser = Parser::new(input, ops, opts);
    let value = parser.parse_value()?;
    parser.finish()?;
    Ok(value)
}

/// Returns whether a character is in `[0-9a-zA-Z]` or is `_`, `-`, `.`, or `+`,
/// which are the characters allowed to be in unquoted strings.
#[inline]
pub fn allowed_unquoted(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

/// Returns whether a character is in `[0-9]` or is `-`, `.`, or `+`,
/// which can be the first character of a valid integer or float tag in SNBT.
#[inline]
pub fn starts_unquoted_number(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | '.' | '+')
}


// ================================
//      Errors
// ================================

/// An error that occurs during parsing. Every error holds the byte offset into the input
/// where it was detected, and a short segment of the surrounding input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnbtError {
    /// The limit on recursive nesting depth of NBT lists and compounds was exceeded.
    #[error("exceeded depth limit {limit} for nested compound and list tags at {index} near '{segment}'")]
    ExceededDepthLimit {
        segment: String,
        index:   usize,
        limit:   u32,
    },
    /// The input ended while something else was required.
    #[error("reached end of input at {index} but expected {expected}")]
    UnexpectedEnd {
        segment:  String,
        index:    usize,
        expected: String,
    },
    /// Input that no rule accepts. `expected` lists everything tried at the furthest position.
    #[error("unexpected input at {index} near '{segment}', expected {expected}")]
    UnexpectedToken {
        segment:  String,
        index:    usize,
        expected: String,
    },
    /// A complete value was followed by more input.
    #[error("trailing data after value at {index}: '{segment}'")]
    TrailingData { segment: String, index: usize },
    #[error("unmatched quote at {index} near '{segment}'")]
    UnmatchedQuote { segment: String, index: usize },
    #[error("invalid escape sequence at {index}: '{segment}'")]
    InvalidEscape { segment: String, index: usize },
    /// A `\x`, `\u` or `\U` escape without its required number of hex digits.
    #[error("expected {digits} hex digits in escape sequence at {index}: '{segment}'")]
    ExpectedHexEscape {
        segment: String,
        index:   usize,
        digits:  usize,
    },
    /// A hex escape naming a surrogate or a value above `0x10FFFF`.
    #[error("invalid codepoint {codepoint:#X} in escape sequence at {index}: '{segment}'")]
    InvalidCodepoint {
        segment:   String,
        index:     usize,
        codepoint: u32,
    },
    #[error("unknown character name '{name}' at {index}")]
    UnknownCharacterName {
        segment: String,
        index:   usize,
        name:    String,
    },
    /// A `\N{...}` escape was found, but the `named_escapes` feature is disabled.
    #[error("named escape sequences are not supported; could not parse '{segment}' at {index}")]
    NamedEscapesDisabled { segment: String, index: usize },
    #[error("invalid number at {index} because {cause}: '{segment}'")]
    InvalidNumber {
        segment: String,
        index:   usize,
        cause:   NumericParseError,
    },
    #[error("empty compound key at {index} near '{segment}'")]
    EmptyKey { segment: String, index: usize },
    #[error("no such builtin operation '{name}' at {index}")]
    NoSuchBuiltin {
        segment: String,
        index:   usize,
        name:    String,
    },
    #[error("invalid argument for builtin operation at {index} near '{segment}': {reason}")]
    InvalidBuiltinArgument {
        segment: String,
        index:   usize,
        reason:  &'static str,
    },
    /// An element of a typed array that is not an integer of a width that fits the array.
    #[error("invalid element at {index} for an array of {expected}: '{segment}'")]
    InvalidArrayElement {
        segment:  String,
        index:    usize,
        expected: &'static str,
    },
    /// A word starting with a sign, digit or `.` which is not a number.
    #[error("unquoted string may not start with '{ch}' at {index}: '{segment}'")]
    InvalidUnquotedStart {
        segment: String,
        index:   usize,
        ch:      char,
    },
}

impl SnbtError {
    /// The byte offset into the input at which the error was detected.
    pub fn index(&self) -> usize {
        match self {
            Self::ExceededDepthLimit { index, .. }
            | Self::UnexpectedEnd { index, .. }
            | Self::UnexpectedToken { index, .. }
            | Self::TrailingData { index, .. }
            | Self::UnmatchedQuote { index, .. }
            | Self::InvalidEscape { index, .. }
            | Self::ExpectedHexEscape { index, .. }
            | Self::InvalidCodepoint { index, .. }
            | Self::UnknownCharacterName { index, .. }
            | Self::NamedEscapesDisabled { index, .. }
            | Self::InvalidNumber { index, .. }
            | Self::EmptyKey { index, .. }
            | Self::NoSuchBuiltin { index, .. }
            | Self::InvalidBuiltinArgument { index, .. }
            | Self::InvalidArrayElement { index, .. }
            | Self::InvalidUnquotedStart { index, .. } => *index,
        }
    }

    /// Copies up to `before` characters before `index` and the `width` plus `after` characters
    /// starting at `index`.
    fn segment(input: &str, index: usize, width: usize, before: usize, after: usize) -> String {
        let index = index.min(input.len());

        let start = input[..index]
            .char_indices()
            .rev()
            .nth(before.saturating_sub(1))
            .map_or(0, |(start, _)| start);
        let start = if before == 0 { index } else { start };

        let end = input[index..]
            .char_indices()
            .nth(width.min(20) + after)
            .map_or(input.len(), |(end, _)| index + end);

        input[start..end].to_owned()
    }

    pub(crate) fn exceeded_depth_limit(input: &str, index: usize, limit: u32) -> Self {
        Self::ExceededDepthLimit {
            segment: Self::segment(input, index, 1, 4, 4),
            index,
            limit,
        }
    }

    pub(crate) fn unexpected_end(input: &str, expected: String) -> Self {
        Self::UnexpectedEnd {
            segment: Self::segment(input, input.len(), 0, 10, 0),
            index: input.len(),
            expected,
        }
    }

    pub(crate) fn unexpected_token(input: &str, index: usize, expected: String) -> Self {
        if index >= input.len() {
            return Self::unexpected_end(input, expected);
        }
        Self::UnexpectedToken {
            segment: Self::segment(input, index, 1, 10, 5),
            index,
            expected,
        }
    }

    pub(crate) fn trailing_data(input: &str, index: usize) -> Self {
        Self::TrailingData {
            segment: Self::segment(input, index, 1, 0, 15),
            index,
        }
    }

    pub(crate) fn unmatched_quote(input: &str, index: usize) -> Self {
        Self::UnmatchedQuote {
            segment: Self::segment(input, index, 1, 0, 10),
            index,
        }
    }

    pub(crate) fn invalid_escape(input: &str, index: usize, width: usize) -> Self {
        Self::InvalidEscape {
            segment: Self::segment(input, index, width, 0, 0),
            index,
        }
    }

    pub(crate) fn expected_hex_escape(input: &str, index: usize, digits: usize) -> Self {
        Self::ExpectedHexEscape {
            segment: Self::segment(input, index, digits + 2, 0, 0),
            index,
            digits,
        }
    }

    pub(crate) fn invalid_codepoint(input: &str, index: usize, width: usize, codepoint: u32) -> Self {
        Self::InvalidCodepoint {
            segment: Self::segment(input, index, width, 0, 0),
            index,
            codepoint,
        }
    }

    #[cfg(feature = "named_escapes")]
    pub(crate) fn unknown_character_name(input: &str, index: usize, width: usize, name: &str) -> Self {
        Self::UnknownCharacterName {
            segment: Self::segment(input, index, width, 0, 0),
            index,
            name: name.to_owned(),
        }
    }

    #[cfg(not(feature = "named_escapes"))]
    pub(crate) fn named_escapes_disabled(input: &str, index: usize, width: usize) -> Self {
        Self::NamedEscapesDisabled {
            segment: Self::segment(input, index, width, 0, 0),
            index,
        }
    }

    pub(crate) fn invalid_number(
        input: &str,
        index: usize,
        width: usize,
        cause: NumericParseError,
    ) -> Self {
        Self::InvalidNumber {
            segment: Self::segment(input, index, width, 0, 0),
            index,
            cause,
        }
    }

    pub(crate) fn empty_key(input: &str, index: usize) -> Self {
        Self::EmptyKey {
            segment: Self::segment(input, index, 2, 5, 5),
            index,
        }
    }

    pub(crate) fn no_such_builtin(input: &str, index: usize, name: &str) -> Self {
        Self::NoSuchBuiltin {
            segment: Self::segment(input, index, name.chars().count(), 0, 1),
            index,
            name: name.to_owned(),
        }
    }

    pub(crate) fn invalid_builtin_argument(input: &str, index: usize, reason: &'static str) -> Self {
        Self::InvalidBuiltinArgument {
            segment: Self::segment(input, index, 1, 10, 10),
            index,
            reason,
        }
    }

    pub(crate) fn invalid_array_element(
        input:    &str,
        index:    usize,
        width:    usize,
        expected: &'static str,
    ) -> Self {
        Self::InvalidArrayElement {
            segment: Self::segment(input, index, width, 10, 0),
            index,
            expected,
        }
    }

    pub(crate) fn invalid_unquoted_start(input: &str, index: usize, width: usize, ch: char) -> Self {
        Self::InvalidUnquotedStart {
            segment: Self::segment(input, index, width, 0, 0),
            index,
            ch,
        }
    }
}
