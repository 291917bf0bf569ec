//! The binary codec: big-endian tag trees behind an optional gzip or zlib frame.
//!
//! Every read goes through an [`NbtAccounter`]. The helpers taking only [`IoOptions`] use an
//! accounter with no byte quota and the options' depth limit, which suits trusted data such as
//! a world's own files; untrusted input should be read with an explicit quota through the
//! `_with_accounter` variants.

mod decode;
mod encode;


use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
#[cfg(feature = "serde")]
use std::fmt::Display;

use flate2::Compression;
use flate2::{
    read::{GzDecoder, ZlibDecoder},
    write::{GzEncoder, ZlibEncoder},
};
use thiserror::Error;

use crate::{accounter::NbtAccounter, raw};
use crate::settings::{IoOptions, NbtCompression};
use crate::stream::{self, StreamTagVisitor, ValueResult};
use crate::tag::{NbtCompound, NbtTag, NbtType};

pub(crate) use self::decode::{
    load_array_len, load_key, load_payload, load_string, read_list_header, skip_compound_body,
    skip_payload,
};


// ================================
//      Reading
// ================================

/// Reads a named root compound, returning it with its root name.
pub fn read_nbt<R: Read>(
    reader: &mut R,
    opts:   IoOptions,
) -> Result<(NbtCompound, String), NbtIoError> {
    let mut accounter = NbtAccounter::depth_limited(opts.depth_limit);
    read_nbt_with_accounter(reader, opts.compression, &mut accounter)
}

/// Reads a named root compound, charging every node to `accounter`.
pub fn read_nbt_with_accounter<R: Read>(
    reader:      &mut R,
    compression: NbtCompression,
    accounter:   &mut NbtAccounter,
) -> Result<(NbtCompound, String), NbtIoError> {
    match compression {
        NbtCompression::Uncompressed => read_root_compound(reader, accounter),
        NbtCompression::ZlibCompressed | NbtCompression::ZlibCompressedWith(_) => {
            read_root_compound(&mut ZlibDecoder::new(reader), accounter)
        }
        NbtCompression::GzipCompressed | NbtCompression::GzipCompressedWith(_) => {
            read_root_compound(&mut GzDecoder::new(reader), accounter)
        }
    }
}

/// Reads an uncompressed root compound and discards its name.
#[inline]
pub fn read_compound<R: Read>(
    reader:    &mut R,
    accounter: &mut NbtAccounter,
) -> Result<NbtCompound, NbtIoError> {
    read_root_compound(reader, accounter).map(|(root, _)| root)
}

/// Reads a gzip-framed root compound and discards its name.
#[inline]
pub fn read_compressed<R: Read>(
    reader:    &mut R,
    accounter: &mut NbtAccounter,
) -> Result<NbtCompound, NbtIoError> {
    read_compound(&mut GzDecoder::new(reader), accounter)
}

/// Reads an uncompressed root tag of any type. A root `End` has no name and no payload.
pub fn read_any_tag<R: Read>(
    reader:    &mut R,
    accounter: &mut NbtAccounter,
) -> Result<NbtTag, NbtIoError> {
    let id = raw::read_u8(reader)?;
    if id == NbtType::End.id() {
        return Ok(NbtTag::End);
    }
    let nbt_type = NbtType::from_id(id).ok_or(NbtIoError::InvalidTagId(id))?;
    raw::skip_string(reader)?;
    load_payload(reader, nbt_type, accounter)
}

fn read_root_compound<R: Read>(
    reader:    &mut R,
    accounter: &mut NbtAccounter,
) -> Result<(NbtCompound, String), NbtIoError> {
    let id = raw::read_u8(reader)?;
    if id != NbtType::Compound.id() {
        return Err(NbtIoError::RootNotCompound(id));
    }
    let root_name = raw::read_string(reader)?;
    let root = decode::load_compound(reader, accounter)?;
    Ok((root, root_name))
}

/// Streams an uncompressed root tag into `visitor` without building a tree.
///
/// Returns `Halt` if the visitor stopped the decode, in which case nothing past the point
/// where it halted has been read.
pub fn parse_with_visitor<R: Read, V: StreamTagVisitor + ?Sized>(
    reader:    &mut R,
    visitor:   &mut V,
    accounter: &mut NbtAccounter,
) -> Result<ValueResult, NbtIoError> {
    let result = stream::parse_root(reader, visitor, accounter)?;
    if result == ValueResult::Halt {
        log::debug!("Streaming decode halted by its visitor");
    }
    Ok(result)
}

/// Reads the root compound of the file at `path`, decompressing per `opts`.
pub fn read_file<P: AsRef<Path>>(
    path: P,
    opts: IoOptions,
) -> Result<(NbtCompound, String), NbtIoError> {
    let path = path.as_ref();
    log::debug!("Reading NBT file {} ({:?})", path.display(), opts.compression);
    let mut reader = BufReader::new(File::open(path)?);
    read_nbt(&mut reader, opts)
}


// ================================
//      Writing
// ================================

/// Writes `root` as a named root compound, compressing per `opts`.
/// If no root name is provided, the empty string is used.
pub fn write_nbt<W: Write>(
    writer:    &mut W,
    opts:      IoOptions,
    root_name: Option<&str>,
    root:      &NbtCompound,
) -> Result<(), NbtIoError> {
    let (gzip, level) = match opts.compression {
        NbtCompression::Uncompressed => {
            return encode::write_root_compound(writer, opts, root_name.unwrap_or(""), root);
        }
        NbtCompression::ZlibCompressed            => (false, Compression::default()),
        NbtCompression::ZlibCompressedWith(level) => (false, level.into()),
        NbtCompression::GzipCompressed            => (true, Compression::default()),
        NbtCompression::GzipCompressedWith(level) => (true, level.into()),
    };

    let root_name = root_name.unwrap_or("");
    if gzip {
        let mut encoder = GzEncoder::new(writer, level);
        encode::write_root_compound(&mut encoder, opts, root_name, root)?;
        encoder.finish()?;
    } else {
        let mut encoder = ZlibEncoder::new(writer, level);
        encode::write_root_compound(&mut encoder, opts, root_name, root)?;
        encoder.finish()?;
    }
    Ok(())
}

/// Writes `root` uncompressed with an empty root name.
#[inline]
pub fn write_compound<W: Write>(writer: &mut W, root: &NbtCompound) -> Result<(), NbtIoError> {
    encode::write_root_compound(writer, IoOptions::uncompressed(), "", root)
}

/// Writes `root` gzip-framed with an empty root name.
#[inline]
pub fn write_compressed<W: Write>(writer: &mut W, root: &NbtCompound) -> Result<(), NbtIoError> {
    write_nbt(writer, IoOptions::java(), None, root)
}

/// Writes an uncompressed root tag of any type, named `""` unless it is `End`.
pub fn write_any_tag<W: Write>(writer: &mut W, tag: &NbtTag) -> Result<(), NbtIoError> {
    raw::write_u8(writer, tag.id())?;
    if matches!(tag, NbtTag::End) {
        return Ok(());
    }
    raw::write_string(writer, "")?;
    encode::write_payload(writer, IoOptions::uncompressed(), tag, 0)
}

/// Writes `root` to the file at `path`, replacing it atomically.
///
/// The data is written to a temporary file in the same directory, flushed and synced to disk,
/// and then renamed over `path`. If anything fails, `path` is left untouched and the temporary
/// file is removed.
pub fn write_file<P: AsRef<Path>>(
    path:      P,
    opts:      IoOptions,
    root_name: Option<&str>,
    root:      &NbtCompound,
) -> Result<(), NbtIoError> {
    let path = path.as_ref();
    log::debug!("Writing NBT file {} ({:?})", path.display(), opts.compression);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::Builder::new()
        .prefix(".nbt-")
        .suffix(".tmp")
        .tempfile_in(dir)?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write_nbt(&mut writer, opts, root_name, root)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| NbtIoError::StdIo(err.error))?;
    Ok(())
}


// ================================
//      Errors
// ================================

/// Describes an error which occurred during the reading or writing of NBT byte data.
#[derive(Error, Debug)]
pub enum NbtIoError {
    /// A native I/O error.
    #[error(transparent)]
    StdIo(#[from] io::Error),
    /// The accounter's byte quota was exceeded.
    #[error("Tried to read NBT tag that was too big; tried to allocate: {usage} bytes where max allowed: {quota}")]
    QuotaExceeded {
        usage: u64,
        quota: u64,
    },
    /// The limit on recursive nesting depth of NBT lists and compounds was exceeded.
    #[error("Exceeded depth limit {limit} for nested tag lists and compound tags")]
    ExceededDepthLimit {
        limit: u32,
    },
    /// A list or array declared a negative length.
    #[error("Length of a list or array must be nonnegative, found {0}")]
    NegativeLength(i32),
    /// A nonempty list declared `End` as its element type.
    #[error("Missing element type on a list of {count} elements")]
    MissingListElementType {
        count: usize,
    },
    /// An invalid tag ID was encountered.
    #[error("Encountered invalid tag ID 0x{0:X}")]
    InvalidTagId(u8),
    /// The root tag was not a compound.
    #[error("Root tag must be a compound (0xA), but found 0x{0:X}")]
    RootNotCompound(u8),
    /// A length was too large to fit in the numeric type it needed to.
    #[error("Length of a list or array must fit in an i32")]
    ExcessiveLength,
    /// An invalid CESU-8 string was encountered.
    #[error("Encountered invalid CESU-8 string")]
    InvalidCesu8String,
    /// A custom error message.
    #[error("{0}")]
    Custom(Box<str>),
}

#[cfg(feature = "serde")]
impl ::serde::ser::Error for NbtIoError {
    fn custom<T>(msg: T) -> Self
    where T: Display {
        Self::Custom(msg.to_string().into_boxed_str())
    }
}

#[cfg(feature = "serde")]
impl ::serde::de::Error for NbtIoError {
    fn custom<T>(msg: T) -> Self
    where T: Display {
        Self::Custom(msg.to_string().into_boxed_str())
    }
}
