use crate::tag::{NbtCompound, NbtList, NbtTag};

use super::{EntryResult, StreamTagVisitor, ValueResult};


/// Drives `visitor` over an in-memory tag with the same outcomes as a streaming decode.
pub(crate) fn walk_tag<V: StreamTagVisitor + ?Sized>(tag: &NbtTag, visitor: &mut V) -> ValueResult {
    match tag {
        NbtTag::End                => visitor.visit_end(),
        &NbtTag::Byte(value)       => visitor.visit_byte(value),
        &NbtTag::Short(value)      => visitor.visit_short(value),
        &NbtTag::Int(value)        => visitor.visit_int(value),
        &NbtTag::Long(value)       => visitor.visit_long(value),
        &NbtTag::Float(value)      => visitor.visit_float(value),
        &NbtTag::Double(value)     => visitor.visit_double(value),
        NbtTag::String(value)      => visitor.visit_string(value),
        NbtTag::ByteArray(value)   => visitor.visit_byte_array(value),
        NbtTag::IntArray(value)    => visitor.visit_int_array(value),
        NbtTag::LongArray(value)   => visitor.visit_long_array(value),
        NbtTag::List(list)         => walk_list(list, visitor),
        NbtTag::Compound(compound) => walk_compound(compound, visitor),
    }
}

fn walk_list<V: StreamTagVisitor + ?Sized>(list: &NbtList, visitor: &mut V) -> ValueResult {
    match visitor.visit_list(list.element_type(), list.len()) {
        ValueResult::Halt     => return ValueResult::Halt,
        ValueResult::Break    => return visitor.visit_container_end(),
        ValueResult::Continue => {}
    }

    for (index, element) in list.iter().enumerate() {
        match visitor.visit_element(element.nbt_type(), index) {
            EntryResult::Halt  => return ValueResult::Halt,
            EntryResult::Break => break,
            EntryResult::Skip  => continue,
            EntryResult::Enter => {}
        }
        match walk_tag(element, visitor) {
            ValueResult::Halt     => return ValueResult::Halt,
            ValueResult::Break    => break,
            ValueResult::Continue => {}
        }
    }
    visitor.visit_container_end()
}

fn walk_compound<V: StreamTagVisitor + ?Sized>(compound: &NbtCompound, visitor: &mut V) -> ValueResult {
    for (key, value) in compound {
        let entry_type = value.nbt_type();
        match visitor.visit_entry(entry_type) {
            EntryResult::Halt  => return ValueResult::Halt,
            EntryResult::Break => break,
            EntryResult::Skip  => continue,
            EntryResult::Enter => {}
        }
        match visitor.visit_entry_named(entry_type, key) {
            EntryResult::Halt  => return ValueResult::Halt,
            EntryResult::Break => break,
            EntryResult::Skip  => continue,
            EntryResult::Enter => {}
        }
        match walk_tag(value, visitor) {
            ValueResult::Halt     => return ValueResult::Halt,
            ValueResult::Break    => break,
            ValueResult::Continue => {}
        }
    }
    visitor.visit_container_end()
}
