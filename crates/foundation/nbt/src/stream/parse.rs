use std::io::Read;

use crate::{accounter::NbtAccounter, raw, tag_type::TagType};
use crate::io::{self, NbtIoError};
use crate::tag::{size, NbtType};

use super::{EntryResult, StreamTagVisitor, ValueResult};


type NbtResult<T> = Result<T, NbtIoError>;


/// Streams the root tag: its type, then (unless the visitor declines) its payload.
pub(crate) fn parse_root<R: Read, V: StreamTagVisitor + ?Sized>(
    reader:    &mut R,
    visitor:   &mut V,
    accounter: &mut NbtAccounter,
) -> NbtResult<ValueResult> {
    let id = raw::read_u8(reader)?;
    let root_type = NbtType::from_id(id).ok_or(NbtIoError::InvalidTagId(id))?;

    if root_type == NbtType::End {
        return Ok(match visitor.visit_root_entry(NbtType::End) {
            ValueResult::Continue => visitor.visit_end(),
            other                 => other,
        });
    }

    match visitor.visit_root_entry(root_type) {
        ValueResult::Halt => Ok(ValueResult::Halt),
        ValueResult::Break => {
            raw::skip_string(reader)?;
            io::skip_payload(reader, root_type, accounter)?;
            Ok(ValueResult::Break)
        }
        ValueResult::Continue => {
            raw::skip_string(reader)?;
            parse_payload(reader, root_type, visitor, accounter)
        }
    }
}

pub(crate) fn parse_payload<R: Read, V: StreamTagVisitor + ?Sized>(
    reader:    &mut R,
    nbt_type:  NbtType,
    visitor:   &mut V,
    accounter: &mut NbtAccounter,
) -> NbtResult<ValueResult> {
    let result = match nbt_type {
        NbtType::End => {
            accounter.account_bytes(size::END)?;
            visitor.visit_end()
        }
        NbtType::Byte => {
            accounter.account_bytes(size::BYTE)?;
            visitor.visit_byte(raw::read_i8(reader)?)
        }
        NbtType::Short => {
            accounter.account_bytes(size::SHORT)?;
            visitor.visit_short(raw::read_i16(reader)?)
        }
        NbtType::Int => {
            accounter.account_bytes(size::INT)?;
            visitor.visit_int(raw::read_i32(reader)?)
        }
        NbtType::Long => {
            accounter.account_bytes(size::LONG)?;
            visitor.visit_long(raw::read_i64(reader)?)
        }
        NbtType::Float => {
            accounter.account_bytes(size::FLOAT)?;
            visitor.visit_float(raw::read_f32(reader)?)
        }
        NbtType::Double => {
            accounter.account_bytes(size::DOUBLE)?;
            visitor.visit_double(raw::read_f64(reader)?)
        }
        NbtType::String => {
            let string = io::load_string(reader, accounter)?;
            visitor.visit_string(&string)
        }
        NbtType::ByteArray => {
            let len = io::load_array_len(reader, size::BYTE_ELEMENT, accounter)?;
            visitor.visit_byte_array(&raw::read_i8_array(reader, len)?)
        }
        NbtType::IntArray => {
            let len = io::load_array_len(reader, size::INT_ELEMENT, accounter)?;
            visitor.visit_int_array(&raw::read_i32_array(reader, len)?)
        }
        NbtType::LongArray => {
            let len = io::load_array_len(reader, size::LONG_ELEMENT, accounter)?;
            visitor.visit_long_array(&raw::read_i64_array(reader, len)?)
        }
        NbtType::List => {
            accounter.push_depth()?;
            let result = parse_list(reader, visitor, accounter);
            accounter.pop_depth();
            result?
        }
        NbtType::Compound => {
            accounter.push_depth()?;
            let result = parse_compound(reader, visitor, accounter);
            accounter.pop_depth();
            result?
        }
    };
    Ok(result)
}

fn parse_list<R: Read, V: StreamTagVisitor + ?Sized>(
    reader:    &mut R,
    visitor:   &mut V,
    accounter: &mut NbtAccounter,
) -> NbtResult<ValueResult> {
    accounter.account_bytes(size::LIST)?;
    let (element_type, len) = io::read_list_header(reader)?;
    let element_tag_type = TagType::Known(element_type);

    match visitor.visit_list(element_type, len) {
        ValueResult::Halt => return Ok(ValueResult::Halt),
        ValueResult::Break => {
            element_tag_type.skip_n(reader, len, accounter)?;
            return Ok(visitor.visit_container_end());
        }
        ValueResult::Continue => {}
    }

    accounter.account_elements(size::LIST_ELEMENT, len)?;

    // Elements fully handled so far, whether parsed or skipped
    let mut handled = 0;
    while handled < len {
        let index = handled;
        handled += 1;
        match visitor.visit_element(element_type, index) {
            EntryResult::Halt => return Ok(ValueResult::Halt),
            EntryResult::Break => {
                element_tag_type.skip(reader, accounter)?;
                break;
            }
            EntryResult::Skip => element_tag_type.skip(reader, accounter)?,
            EntryResult::Enter => match parse_payload(reader, element_type, visitor, accounter)? {
                ValueResult::Halt     => return Ok(ValueResult::Halt),
                ValueResult::Break    => break,
                ValueResult::Continue => {}
            },
        }
    }

    element_tag_type.skip_n(reader, len - handled, accounter)?;
    Ok(visitor.visit_container_end())
}

fn parse_compound<R: Read, V: StreamTagVisitor + ?Sized>(
    reader:    &mut R,
    visitor:   &mut V,
    accounter: &mut NbtAccounter,
) -> NbtResult<ValueResult> {
    accounter.account_bytes(size::COMPOUND)?;

    loop {
        let id = raw::read_u8(reader)?;
        if id == NbtType::End.id() {
            return Ok(visitor.visit_container_end());
        }
        let entry_type = NbtType::from_id(id).ok_or(NbtIoError::InvalidTagId(id))?;

        match visitor.visit_entry(entry_type) {
            EntryResult::Halt => return Ok(ValueResult::Halt),
            EntryResult::Break => {
                raw::skip_string(reader)?;
                io::skip_payload(reader, entry_type, accounter)?;
                break;
            }
            EntryResult::Skip => {
                raw::skip_string(reader)?;
                io::skip_payload(reader, entry_type, accounter)?;
                continue;
            }
            EntryResult::Enter => {}
        }

        let key = io::load_key(reader, accounter)?;
        match visitor.visit_entry_named(entry_type, &key) {
            EntryResult::Halt => return Ok(ValueResult::Halt),
            EntryResult::Break => {
                io::skip_payload(reader, entry_type, accounter)?;
                break;
            }
            EntryResult::Skip => {
                io::skip_payload(reader, entry_type, accounter)?;
                continue;
            }
            EntryResult::Enter => {}
        }

        accounter.account_bytes(size::COMPOUND_ENTRY)?;
        match parse_payload(reader, entry_type, visitor, accounter)? {
            ValueResult::Halt     => return Ok(ValueResult::Halt),
            ValueResult::Break    => break,
            ValueResult::Continue => {}
        }
    }

    // Broken out of early: the remaining siblings still have to be consumed.
    io::skip_compound_body(reader, accounter)?;
    Ok(visitor.visit_container_end())
}
