//! Memory estimates charged per node, shared by `size_in_bytes` and the decoders.

pub(crate) const END: u64 = 8;
pub(crate) const BYTE: u64 = 9;
pub(crate) const SHORT: u64 = 10;
pub(crate) const INT: u64 = 12;
pub(crate) const LONG: u64 = 16;
pub(crate) const FLOAT: u64 = 12;
pub(crate) const DOUBLE: u64 = 16;

pub(crate) const STRING: u64 = 36;
pub(crate) const ARRAY: u64 = 24;
pub(crate) const BYTE_ELEMENT: u64 = 1;
pub(crate) const INT_ELEMENT: u64 = 4;
pub(crate) const LONG_ELEMENT: u64 = 8;

pub(crate) const LIST: u64 = 37;
pub(crate) const LIST_ELEMENT: u64 = 4;

pub(crate) const COMPOUND: u64 = 48;
/// Charged for every key read, whether or not it is new.
pub(crate) const COMPOUND_KEY: u64 = 28;
/// Charged only when a key is inserted for the first time.
pub(crate) const COMPOUND_ENTRY: u64 = 36;


#[inline]
pub(crate) fn utf16_units(s: &str) -> u64 {
    s.chars().map(|c| c.len_utf16() as u64).sum()
}

#[inline]
pub(crate) fn string(s: &str) -> u64 {
    STRING + 2 * utf16_units(s)
}

#[inline]
pub(crate) fn array(per_element: u64, len: usize) -> u64 {
    ARRAY + per_element * len as u64
}

#[inline]
pub(crate) fn key(key: &str) -> u64 {
    COMPOUND_KEY + 2 * utf16_units(key)
}

#[inline]
pub(crate) fn compound_entry(key_str: &str) -> u64 {
    key(key_str) + COMPOUND_ENTRY
}
