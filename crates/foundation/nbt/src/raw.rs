//! Big-endian primitives of the binary format.

use std::io::{self, Read, Result as IoResult, Write};

use byteorder::{BigEndian, ReadBytesExt as _, WriteBytesExt as _};

use crate::io::NbtIoError;


type NbtResult<T> = Result<T, NbtIoError>;

/// Arrays are read in chunks of this many elements, so that the allocation grows with the data
/// actually present rather than with a declared length.
const ARRAY_CHUNK: usize = 4096;


#[inline]
pub fn read_u8<R: Read>(reader: &mut R) -> IoResult<u8> {
    reader.read_u8()
}

#[inline]
pub fn read_i8<R: Read>(reader: &mut R) -> IoResult<i8> {
    reader.read_i8()
}

#[inline]
pub fn read_i16<R: Read>(reader: &mut R) -> IoResult<i16> {
    reader.read_i16::<BigEndian>()
}

#[inline]
pub fn read_i32<R: Read>(reader: &mut R) -> IoResult<i32> {
    reader.read_i32::<BigEndian>()
}

#[inline]
pub fn read_i64<R: Read>(reader: &mut R) -> IoResult<i64> {
    reader.read_i64::<BigEndian>()
}

#[inline]
pub fn read_f32<R: Read>(reader: &mut R) -> IoResult<f32> {
    reader.read_f32::<BigEndian>()
}

#[inline]
pub fn read_f64<R: Read>(reader: &mut R) -> IoResult<f64> {
    reader.read_f64::<BigEndian>()
}

#[inline]
pub fn write_u8<W: Write>(writer: &mut W, value: u8) -> IoResult<()> {
    writer.write_u8(value)
}

#[inline]
pub fn write_i8<W: Write>(writer: &mut W, value: i8) -> IoResult<()> {
    writer.write_i8(value)
}

#[inline]
pub fn write_i16<W: Write>(writer: &mut W, value: i16) -> IoResult<()> {
    writer.write_i16::<BigEndian>(value)
}

#[inline]
pub fn write_i32<W: Write>(writer: &mut W, value: i32) -> IoResult<()> {
    writer.write_i32::<BigEndian>(value)
}

#[inline]
pub fn write_i64<W: Write>(writer: &mut W, value: i64) -> IoResult<()> {
    writer.write_i64::<BigEndian>(value)
}

#[inline]
pub fn write_f32<W: Write>(writer: &mut W, value: f32) -> IoResult<()> {
    writer.write_f32::<BigEndian>(value)
}

#[inline]
pub fn write_f64<W: Write>(writer: &mut W, value: f64) -> IoResult<()> {
    writer.write_f64::<BigEndian>(value)
}

/// Reads a signed 4-byte length, rejecting negative values.
#[inline]
pub fn read_length<R: Read>(reader: &mut R) -> NbtResult<usize> {
    let len = read_i32(reader)?;
    #[expect(
        clippy::map_err_ignore,
        reason = "a negative i32 is the only possible error ignored",
    )]
    usize::try_from(len).map_err(|_| NbtIoError::NegativeLength(len))
}

#[inline]
pub fn write_length<W: Write>(writer: &mut W, len: usize) -> NbtResult<()> {
    #[expect(
        clippy::map_err_ignore,
        reason = "out-of-range usize is the only possible error ignored",
    )]
    let len = i32::try_from(len).map_err(|_| NbtIoError::ExcessiveLength)?;
    write_i32(writer, len)?;
    Ok(())
}

/// Reads a string as a `u16` byte length followed by modified UTF-8.
pub fn read_string<R: Read>(reader: &mut R) -> NbtResult<String> {
    let len = usize::from(reader.read_u16::<BigEndian>()?);
    let mut bytes = vec![0; len];
    reader.read_exact(&mut bytes)?;

    match cesu8::from_java_cesu8(&bytes) {
        Ok(string) => Ok(string.into_owned()),
        Err(_)     => Err(NbtIoError::InvalidCesu8String),
    }
}

#[inline]
pub fn skip_string<R: Read>(reader: &mut R) -> NbtResult<()> {
    let len = reader.read_u16::<BigEndian>()?;
    skip_bytes(reader, u64::from(len))
}

/// Writes a string as a `u16` byte length followed by modified UTF-8.
///
/// A string whose encoding does not fit in a `u16` length is written as the empty string.
pub fn write_string<W: Write>(writer: &mut W, string: &str) -> NbtResult<()> {
    let bytes = cesu8::to_java_cesu8(string);
    if let Ok(len) = u16::try_from(bytes.len()) {
        writer.write_u16::<BigEndian>(len)?;
        writer.write_all(&bytes)?;
    } else {
        log::warn!(
            "String of {} encoded bytes exceeds the 65535 byte limit; writing an empty string",
            bytes.len(),
        );
        writer.write_u16::<BigEndian>(0)?;
    }
    Ok(())
}

/// Consumes exactly `count` bytes without storing them.
pub fn skip_bytes<R: Read>(reader: &mut R, count: u64) -> NbtResult<()> {
    let skipped = io::copy(&mut reader.by_ref().take(count), &mut io::sink())?;
    if skipped == count {
        Ok(())
    } else {
        Err(io::Error::from(io::ErrorKind::UnexpectedEof).into())
    }
}

// Generates a chunked array reader; `$read_into` fills a slice of the element type.
macro_rules! chunked_reader {
    ($name:ident, $elem:ty, |$reader:ident, $chunk:ident| $read_into:expr) => {
        pub fn $name<R: Read>($reader: &mut R, len: usize) -> IoResult<Vec<$elem>> {
            let mut data = Vec::with_capacity(len.min(ARRAY_CHUNK));
            let mut remaining = len;
            while remaining > 0 {
                let start = data.len();
                let step = remaining.min(ARRAY_CHUNK);
                data.resize(start + step, 0);
                let $chunk = &mut data[start..];
                $read_into?;
                remaining -= step;
            }
            Ok(data)
        }
    };
}

chunked_reader!(read_i8_array, i8, |reader, chunk| reader.read_i8_into(chunk));
chunked_reader!(read_i32_array, i32, |reader, chunk| reader.read_i32_into::<BigEndian>(chunk));
chunked_reader!(read_i64_array, i64, |reader, chunk| reader.read_i64_into::<BigEndian>(chunk));

pub fn write_i8_array<W: Write>(writer: &mut W, data: &[i8]) -> IoResult<()> {
    let bytes: Vec<u8> = data.iter().map(|byte| byte.to_be_bytes()[0]).collect();
    writer.write_all(&bytes)
}

pub fn write_i32_array<W: Write>(writer: &mut W, data: &[i32]) -> IoResult<()> {
    data.iter().try_for_each(|&value| write_i32(writer, value))
}

pub fn write_i64_array<W: Write>(writer: &mut W, data: &[i64]) -> IoResult<()> {
    data.iter().try_for_each(|&value| write_i64(writer, value))
}


#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn strings_use_modified_utf8() {
        let mut bytes = Vec::new();
        write_string(&mut bytes, "a\0\u{1F600}").unwrap();
        // NUL is two bytes, the emoji is two 3-byte surrogate halves
        assert_eq!(&bytes[..2], &[0, 1 + 2 + 6]);
        assert_eq!(&bytes[3..5], &[0xC0, 0x80]);

        let read = read_string(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(read, "a\0\u{1F600}");
    }

    #[test]
    fn overlong_strings_become_empty() {
        let mut bytes = Vec::new();
        write_string(&mut bytes, &"x".repeat(70_000)).unwrap();
        assert_eq!(bytes, [0, 0]);
    }

    #[test]
    fn negative_length() {
        let err = read_length(&mut Cursor::new((-1_i32).to_be_bytes())).unwrap_err();
        assert!(matches!(err, NbtIoError::NegativeLength(-1)), "{err:?}");
    }

    #[test]
    fn arrays_span_chunks() {
        let values: Vec<i32> = (0..10_000).collect();
        let mut bytes = Vec::new();
        write_i32_array(&mut bytes, &values).unwrap();
        assert_eq!(read_i32_array(&mut Cursor::new(bytes), values.len()).unwrap(), values);
    }

    #[test]
    fn short_array_input_fails() {
        let bytes = vec![0_u8; 3];
        assert!(read_i64_array(&mut Cursor::new(bytes), 1).is_err());
    }

    #[test]
    fn skip_past_end_fails() {
        let mut reader = Cursor::new(vec![0_u8; 4]);
        skip_bytes(&mut reader, 4).unwrap();
        assert!(skip_bytes(&mut reader, 1).is_err());
    }
}
