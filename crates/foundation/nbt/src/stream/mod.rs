//! Push-style decoding: the decoder reports each value, entry and container boundary to a
//! [`StreamTagVisitor`] instead of building a tree, and the visitor steers it.
//!
//! A visitor can stop at any point. `Break` ends the current container early (the decoder
//! still consumes its remaining bytes, so the stream stays aligned), and `Halt` ends the whole
//! decode without reading anything further.

mod collect;
mod parse;
mod walk;


pub use self::collect::{CollectFields, CollectToTag, FieldSelector, SkipAll};

pub(crate) use self::parse::{parse_payload, parse_root};
pub(crate) use self::walk::walk_tag;

use crate::tag::NbtType;


/// The outcome of visiting a value or a container boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueResult {
    /// Proceed normally.
    Continue,
    /// Stop visiting the rest of the enclosing container; its bytes are skipped.
    Break,
    /// Stop the whole decode immediately.
    Halt,
}

/// The outcome of visiting a list element or a compound entry, before its payload is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryResult {
    /// Read and visit this payload.
    Enter,
    /// Skip this payload and move on to the next sibling.
    Skip,
    /// Skip this payload and the rest of the enclosing container.
    Break,
    /// Stop the whole decode immediately.
    Halt,
}

/// Receives the events of a streaming decode.
///
/// For a compound, the decoder calls `visit_entry` with the entry's type before its name is
/// read, then `visit_entry_named` once the name is known, then the payload's events, and
/// finally `visit_container_end` after the last entry. For a list, it calls `visit_list` with
/// the element type and count, then `visit_element` before each element's payload, and
/// finally `visit_container_end`.
pub trait StreamTagVisitor {
    fn visit_end(&mut self) -> ValueResult;
    fn visit_byte(&mut self, value: i8) -> ValueResult;
    fn visit_short(&mut self, value: i16) -> ValueResult;
    fn visit_int(&mut self, value: i32) -> ValueResult;
    fn visit_long(&mut self, value: i64) -> ValueResult;
    fn visit_float(&mut self, value: f32) -> ValueResult;
    fn visit_double(&mut self, value: f64) -> ValueResult;
    fn visit_string(&mut self, value: &str) -> ValueResult;
    fn visit_byte_array(&mut self, value: &[i8]) -> ValueResult;
    fn visit_int_array(&mut self, value: &[i32]) -> ValueResult;
    fn visit_long_array(&mut self, value: &[i64]) -> ValueResult;

    fn visit_list(&mut self, element_type: NbtType, len: usize) -> ValueResult;
    fn visit_element(&mut self, element_type: NbtType, index: usize) -> EntryResult;

    fn visit_entry(&mut self, entry_type: NbtType) -> EntryResult;
    fn visit_entry_named(&mut self, entry_type: NbtType, key: &str) -> EntryResult;

    fn visit_container_end(&mut self) -> ValueResult;

    /// Called once with the type of the root tag, before its name is read.
    fn visit_root_entry(&mut self, root_type: NbtType) -> ValueResult;
}


#[cfg(test)]
mod tests;
