use std::io::Write;

use crate::raw;
use crate::settings::IoOptions;
use crate::tag::{NbtCompound, NbtList, NbtTag, NbtType};

use super::NbtIoError;


type NbtResult<T> = Result<T, NbtIoError>;


pub(crate) fn write_root_compound<W: Write>(
    writer:    &mut W,
    opts:      IoOptions,
    root_name: &str,
    root:      &NbtCompound,
) -> NbtResult<()> {
    raw::write_u8(writer, NbtType::Compound.id())?;
    raw::write_string(writer, root_name)?;
    write_compound_body(writer, opts, root, 0)
}

/// Writes the payload of `tag`, which sits `depth` containers below the root payload.
pub(crate) fn write_payload<W: Write>(
    writer: &mut W,
    opts:   IoOptions,
    tag:    &NbtTag,
    depth:  u32,
) -> NbtResult<()> {
    match tag {
        NbtTag::End                => {}
        &NbtTag::Byte  (value)     => raw::write_i8 (writer, value)?,
        &NbtTag::Short (value)     => raw::write_i16(writer, value)?,
        &NbtTag::Int   (value)     => raw::write_i32(writer, value)?,
        &NbtTag::Long  (value)     => raw::write_i64(writer, value)?,
        &NbtTag::Float (value)     => raw::write_f32(writer, value)?,
        &NbtTag::Double(value)     => raw::write_f64(writer, value)?,
        NbtTag::String(value)      => raw::write_string(writer, value)?,
        NbtTag::ByteArray(value)   => {
            raw::write_length(writer, value.len())?;
            raw::write_i8_array(writer, value)?;
        }
        NbtTag::IntArray(value)    => {
            raw::write_length(writer, value.len())?;
            raw::write_i32_array(writer, value)?;
        }
        NbtTag::LongArray(value)   => {
            raw::write_length(writer, value.len())?;
            raw::write_i64_array(writer, value)?;
        }
        NbtTag::List(list)         => write_list_body(writer, opts, list, depth)?,
        NbtTag::Compound(compound) => write_compound_body(writer, opts, compound, depth)?,
    }
    Ok(())
}

#[inline]
fn check_depth(opts: IoOptions, depth: u32) -> NbtResult<()> {
    if depth >= opts.depth_limit.limit() {
        Err(NbtIoError::ExceededDepthLimit { limit: opts.depth_limit.limit() })
    } else {
        Ok(())
    }
}

fn write_compound_body<W: Write>(
    writer:   &mut W,
    opts:     IoOptions,
    compound: &NbtCompound,
    depth:    u32,
) -> NbtResult<()> {
    check_depth(opts, depth)?;

    for (key, value) in compound {
        if matches!(value, NbtTag::End) {
            log::warn!("Skipping End tag stored under key {key:?} while writing a compound");
            continue;
        }
        raw::write_u8(writer, value.id())?;
        raw::write_string(writer, key)?;
        write_payload(writer, opts, value, depth + 1)?;
    }

    raw::write_u8(writer, NbtType::End.id())?;
    Ok(())
}

fn write_list_body<W: Write>(
    writer: &mut W,
    opts:   IoOptions,
    list:   &NbtList,
    depth:  u32,
) -> NbtResult<()> {
    check_depth(opts, depth)?;

    let element_type = list.element_type();
    if element_type == NbtType::End {
        if !list.is_empty() {
            log::warn!("Writing a list of {} End tags as an empty list", list.len());
        }
        raw::write_u8(writer, NbtType::End.id())?;
        raw::write_length(writer, 0)?;
        return Ok(());
    }

    raw::write_u8(writer, element_type.id())?;
    raw::write_length(writer, list.len())?;

    if list.is_homogeneous() {
        for element in list {
            write_payload(writer, opts, element, depth + 1)?;
        }
        return Ok(());
    }

    // Mixed lists are written as lists of compounds, each element being the only entry of
    // its compound under the key "".
    log::trace!("Wrapping the {} elements of a mixed list in compounds", list.len());
    for element in list {
        check_depth(opts, depth + 1)?;
        if matches!(element, NbtTag::End) {
            log::warn!("Writing an End tag in a mixed list as an empty compound");
        } else {
            raw::write_u8(writer, element.id())?;
            raw::write_string(writer, "")?;
            write_payload(writer, opts, element, depth + 2)?;
        }
        raw::write_u8(writer, NbtType::End.id())?;
    }
    Ok(())
}
