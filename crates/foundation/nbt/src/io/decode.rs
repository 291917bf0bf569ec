use std::io::Read;

use crate::{accounter::NbtAccounter, raw, tag_type::TagType};
use crate::tag::{size, NbtCompound, NbtList, NbtTag, NbtType};

use super::NbtIoError;


type NbtResult<T> = Result<T, NbtIoError>;

/// Lists never preallocate more than this many elements up front.
const MAX_PREALLOCATED: usize = 1024;


pub(crate) fn load_payload<R: Read>(
    reader:    &mut R,
    nbt_type:  NbtType,
    accounter: &mut NbtAccounter,
) -> NbtResult<NbtTag> {
    let tag = match nbt_type {
        NbtType::End => {
            accounter.account_bytes(size::END)?;
            NbtTag::End
        }
        NbtType::Byte => {
            accounter.account_bytes(size::BYTE)?;
            NbtTag::Byte(raw::read_i8(reader)?)
        }
        NbtType::Short => {
            accounter.account_bytes(size::SHORT)?;
            NbtTag::Short(raw::read_i16(reader)?)
        }
        NbtType::Int => {
            accounter.account_bytes(size::INT)?;
            NbtTag::Int(raw::read_i32(reader)?)
        }
        NbtType::Long => {
            accounter.account_bytes(size::LONG)?;
            NbtTag::Long(raw::read_i64(reader)?)
        }
        NbtType::Float => {
            accounter.account_bytes(size::FLOAT)?;
            NbtTag::Float(raw::read_f32(reader)?)
        }
        NbtType::Double => {
            accounter.account_bytes(size::DOUBLE)?;
            NbtTag::Double(raw::read_f64(reader)?)
        }
        NbtType::String => NbtTag::String(load_string(reader, accounter)?),
        NbtType::ByteArray => {
            let len = load_array_len(reader, size::BYTE_ELEMENT, accounter)?;
            NbtTag::ByteArray(raw::read_i8_array(reader, len)?)
        }
        NbtType::IntArray => {
            let len = load_array_len(reader, size::INT_ELEMENT, accounter)?;
            NbtTag::IntArray(raw::read_i32_array(reader, len)?)
        }
        NbtType::LongArray => {
            let len = load_array_len(reader, size::LONG_ELEMENT, accounter)?;
            NbtTag::LongArray(raw::read_i64_array(reader, len)?)
        }
        NbtType::List     => NbtTag::List(load_list(reader, accounter)?),
        NbtType::Compound => NbtTag::Compound(load_compound(reader, accounter)?),
    };
    Ok(tag)
}

pub(crate) fn load_string<R: Read>(reader: &mut R, accounter: &mut NbtAccounter) -> NbtResult<String> {
    accounter.account_bytes(size::STRING)?;
    let string = raw::read_string(reader)?;
    accounter.account_bytes(2 * size::utf16_units(&string))?;
    Ok(string)
}

/// Reads a compound key, charging for the key itself but not yet for the map entry.
pub(crate) fn load_key<R: Read>(reader: &mut R, accounter: &mut NbtAccounter) -> NbtResult<String> {
    let key = raw::read_string(reader)?;
    accounter.account_bytes(size::key(&key))?;
    Ok(key)
}

/// Charges the fixed overhead of an array and its declared elements, returning the length.
pub(crate) fn load_array_len<R: Read>(
    reader:      &mut R,
    per_element: u64,
    accounter:   &mut NbtAccounter,
) -> NbtResult<usize> {
    accounter.account_bytes(size::ARRAY)?;
    let len = raw::read_length(reader)?;
    accounter.account_elements(per_element, len)?;
    Ok(len)
}

/// Reads the element type and count of a list.
pub(crate) fn read_list_header<R: Read>(reader: &mut R) -> NbtResult<(NbtType, usize)> {
    let id = raw::read_u8(reader)?;
    let len = raw::read_length(reader)?;

    let element_type = NbtType::from_id(id).ok_or(NbtIoError::InvalidTagId(id))?;
    if element_type == NbtType::End && len > 0 {
        return Err(NbtIoError::MissingListElementType { count: len });
    }
    Ok((element_type, len))
}

fn load_list<R: Read>(reader: &mut R, accounter: &mut NbtAccounter) -> NbtResult<NbtList> {
    accounter.push_depth()?;
    let list = load_list_body(reader, accounter);
    accounter.pop_depth();
    list
}

fn load_list_body<R: Read>(reader: &mut R, accounter: &mut NbtAccounter) -> NbtResult<NbtList> {
    accounter.account_bytes(size::LIST)?;
    let (element_type, len) = read_list_header(reader)?;
    // Charged before allocating, so a huge declared length fails here
    accounter.account_elements(size::LIST_ELEMENT, len)?;

    let mut list = NbtList::with_capacity(len.min(MAX_PREALLOCATED));
    for _ in 0..len {
        list.0.push(load_payload(reader, element_type, accounter)?);
    }
    Ok(list)
}

pub(crate) fn load_compound<R: Read>(
    reader:    &mut R,
    accounter: &mut NbtAccounter,
) -> NbtResult<NbtCompound> {
    accounter.push_depth()?;
    let compound = load_compound_body(reader, accounter);
    accounter.pop_depth();
    compound
}

fn load_compound_body<R: Read>(
    reader:    &mut R,
    accounter: &mut NbtAccounter,
) -> NbtResult<NbtCompound> {
    accounter.account_bytes(size::COMPOUND)?;
    let mut compound = NbtCompound::new();

    loop {
        let id = raw::read_u8(reader)?;
        if id == NbtType::End.id() {
            break;
        }
        let entry_type = TagType::from_id(id);
        let key = load_key(reader, accounter)?;
        let value = entry_type.load(reader, accounter)?;
        if compound.0.insert(key, value).is_none() {
            accounter.account_bytes(size::COMPOUND_ENTRY)?;
        }
    }
    Ok(compound)
}

pub(crate) fn skip_payload<R: Read>(
    reader:    &mut R,
    nbt_type:  NbtType,
    accounter: &mut NbtAccounter,
) -> NbtResult<()> {
    match nbt_type {
        NbtType::String    => raw::skip_string(reader),
        NbtType::ByteArray => skip_array(reader, 1),
        NbtType::IntArray  => skip_array(reader, 4),
        NbtType::LongArray => skip_array(reader, 8),
        NbtType::List => {
            accounter.push_depth()?;
            let skipped = skip_list_body(reader, accounter);
            accounter.pop_depth();
            skipped
        }
        NbtType::Compound => {
            accounter.push_depth()?;
            let skipped = skip_compound_body(reader, accounter);
            accounter.pop_depth();
            skipped
        }
        fixed => TagType::Known(fixed).skip_n(reader, 1, accounter),
    }
}

fn skip_array<R: Read>(reader: &mut R, width: u64) -> NbtResult<()> {
    let len = raw::read_length(reader)?;
    raw::skip_bytes(reader, width.saturating_mul(len as u64))
}

fn skip_list_body<R: Read>(reader: &mut R, accounter: &mut NbtAccounter) -> NbtResult<()> {
    let (element_type, len) = read_list_header(reader)?;
    TagType::Known(element_type).skip_n(reader, len, accounter)
}

/// Skips compound entries up to and including the terminating `End`.
pub(crate) fn skip_compound_body<R: Read>(
    reader:    &mut R,
    accounter: &mut NbtAccounter,
) -> NbtResult<()> {
    loop {
        let id = raw::read_u8(reader)?;
        if id == NbtType::End.id() {
            return Ok(());
        }
        let entry_type = TagType::from_id(id);
        raw::skip_string(reader)?;
        entry_type.skip(reader, accounter)?;
    }
}
