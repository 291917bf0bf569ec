//! Rendering NBT trees as SNBT text.
//!
//! The three printers share the scalar formatting rules below, which use the same type suffixes
//! that the grammar in [`snbt`](crate::snbt) reads:
//!
//! - [`TagWithOptions`] and the `Display`/`Debug` impls of the tag types print compact,
//!   single-line SNBT with sorted compound keys.
//! - [`PrettyPrinter`] prints indented, multi-line SNBT.
//! - [`StyledPrinter`] produces runs of text tagged with a [`Style`], for display in a UI.

mod compact;
mod pretty;
mod styled;


use std::borrow::Cow;

use crate::settings::{SnbtWriteOptions, WriteNonFinite};
use crate::snbt::allowed_unquoted;
use crate::tag::{NbtCompound, NbtList, NbtTag};


pub use self::compact::{CompoundWithOptions, ListWithOptions, TagWithOptions};
pub use self::pretty::PrettyPrinter;
pub use self::styled::{Style, StyledPrinter, StyledSegment};


#[inline]
pub(crate) fn to_snbt(tag: &NbtTag, opts: SnbtWriteOptions) -> String {
    TagWithOptions::new(tag, opts).to_string()
}

#[inline]
pub(crate) fn list_to_snbt(list: &NbtList, opts: SnbtWriteOptions) -> String {
    ListWithOptions::new(list, opts).to_string()
}

#[inline]
pub(crate) fn compound_to_snbt(compound: &NbtCompound, opts: SnbtWriteOptions) -> String {
    CompoundWithOptions::new(compound, opts).to_string()
}

// ================================
//      Strings
// ================================

/// Whether `key` must be quoted to be read back as a compound key.
#[inline]
pub fn key_needs_quotes(key: &str) -> bool {
    key.is_empty() || !key.chars().all(allowed_unquoted)
}

/// Formats a compound key, quoting it only if necessary.
pub fn key_to_snbt(key: &str) -> Cow<'_, str> {
    if key_needs_quotes(key) {
        Cow::Owned(quote_string(key))
    } else {
        Cow::Borrowed(key)
    }
}

/// Wraps a string in quotes, escaping whatever the grammar could not read back verbatim.
///
/// Single quotes are used if the string contains a `"` but no `'`; otherwise double quotes are.
pub fn quote_string(string: &str) -> String {
    let quote = if string.contains('"') && !string.contains('\'') { '\'' } else { '"' };

    let mut quoted = String::with_capacity(string.len() + 2);
    quoted.push(quote);

    for c in string.chars() {
        match c {
            '\\'   => quoted.push_str("\\\\"),
            '\n'   => quoted.push_str("\\n"),
            '\t'   => quoted.push_str("\\t"),
            '\r'   => quoted.push_str("\\r"),
            '\x08' => quoted.push_str("\\b"),
            '\x0c' => quoted.push_str("\\f"),
            _ if c == quote => {
                quoted.push('\\');
                quoted.push(c);
            }
            _ if c.is_control() => {
                // Control characters are all below 0x100
                let codepoint = u32::from(c);
                let escape = if codepoint <= 0xFF {
                    format!("\\x{codepoint:02x}")
                } else {
                    format!("\\u{codepoint:04x}")
                };
                quoted.push_str(&escape);
            }
            _ => quoted.push(c),
        }
    }

    quoted.push(quote);
    quoted
}

// ================================
//      Numbers
// ================================

/// The digits and the type suffix of a numeric tag, or `None` if `tag` is not numeric.
///
/// Floats use the shortest representation which reads back to the same value.
pub(crate) fn number_parts(tag: &NbtTag, non_finite: WriteNonFinite) -> Option<(String, &'static str)> {
    Some(match *tag {
        NbtTag::Byte(n)   => (n.to_string(), "b"),
        NbtTag::Short(n)  => (n.to_string(), "s"),
        NbtTag::Int(n)    => (n.to_string(), ""),
        NbtTag::Long(n)   => (n.to_string(), "L"),
        NbtTag::Float(n)  => (float_digits(n, f32::MAX, f32::MIN, non_finite), "f"),
        NbtTag::Double(n) => (float_digits(n, f64::MAX, f64::MIN, non_finite), "d"),
        _ => return None,
    })
}

fn float_digits<F>(value: F, max: F, min: F, non_finite: WriteNonFinite) -> String
where
    F: Into<f64> + std::fmt::Debug + Copy,
{
    let as_f64: f64 = value.into();
    if as_f64.is_finite() {
        return format!("{value:?}");
    }

    match non_finite {
        WriteNonFinite::PrintFloats => {
            if as_f64.is_nan() {
                "0".to_owned()
            } else if as_f64 > 0.0 {
                format!("{max:?}")
            } else {
                format!("{min:?}")
            }
        }
        WriteNonFinite::PrintStrings => {
            if as_f64.is_nan() {
                "NaN".to_owned()
            } else if as_f64 > 0.0 {
                "Infinity".to_owned()
            } else {
                "-Infinity".to_owned()
            }
        }
    }
}

/// The string printed in place of a container nested past the depth limit.
fn depth_limit_placeholder(limit: u32, tag_name: &str) -> String {
    log::warn!("Depth limit of {limit} reached; could not print {tag_name} tag");
    quote_string(&format!("Depth limit of {limit} reached; could not print {tag_name} tag"))
}
