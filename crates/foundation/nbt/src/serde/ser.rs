use std::fmt::Display;

use serde::ser::{self, Impossible, Serialize};

use crate::io::NbtIoError;
use crate::tag::{NbtCompound, NbtList, NbtTag};
use super::{array_from_tag, is_array_token};


/// The serializer behind [`to_tag`](super::to_tag), whose output is a tag tree.
///
/// - `bool` becomes a `Byte` of `0` or `1`.
/// - Unsigned integers widen to the next signed variant, so that no value changes sign: `u8`
///   becomes `Short`, `u16` becomes `Int`, and `u32` and `u64` become `Long`. A `u64` above
///   `i64::MAX` is an error.
/// - `char` and strings become `String`, and byte slices become `ByteArray`.
/// - `None`, `()` and unit structs become `End`, and compounds leave out entries whose value
///   is `End`.
/// - Sequences and tuples become lists. Maps and structs become compounds; map keys must be
///   strings, chars or integers.
/// - A unit variant becomes a `String` of its name. Other variants become a compound with a
///   single entry keyed by the variant name.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagSerializer;

impl ser::Serializer for TagSerializer {
    type Ok = NbtTag;
    type Error = NbtIoError;

    type SerializeSeq = SerializeList;
    type SerializeTuple = SerializeList;
    type SerializeTupleStruct = SerializeList;
    type SerializeTupleVariant = SerializeVariant<SerializeList>;
    type SerializeMap = SerializeCompound;
    type SerializeStruct = SerializeCompound;
    type SerializeStructVariant = SerializeVariant<SerializeCompound>;

    #[inline]
    fn serialize_bool(self, v: bool) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Byte(i8::from(v)))
    }

    #[inline]
    fn serialize_i8(self, v: i8) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Byte(v))
    }

    #[inline]
    fn serialize_i16(self, v: i16) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Short(v))
    }

    #[inline]
    fn serialize_i32(self, v: i32) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Int(v))
    }

    #[inline]
    fn serialize_i64(self, v: i64) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Long(v))
    }

    #[inline]
    fn serialize_u8(self, v: u8) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Short(i16::from(v)))
    }

    #[inline]
    fn serialize_u16(self, v: u16) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Int(i32::from(v)))
    }

    #[inline]
    fn serialize_u32(self, v: u32) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Long(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<NbtTag, NbtIoError> {
        i64::try_from(v)
            .map(NbtTag::Long)
            .map_err(|_| ser::Error::custom(format_args!("{v} does not fit in a Long tag")))
    }

    #[inline]
    fn serialize_f32(self, v: f32) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Float(v))
    }

    #[inline]
    fn serialize_f64(self, v: f64) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Double(v))
    }

    #[inline]
    fn serialize_char(self, v: char) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::String(v.to_string()))
    }

    #[inline]
    fn serialize_str(self, v: &str) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::ByteArray(
            v.iter().map(|&byte| i8::from_ne_bytes([byte])).collect(),
        ))
    }

    #[inline]
    fn serialize_none(self) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::End)
    }

    #[inline]
    fn serialize_some<T>(self, value: &T) -> Result<NbtTag, NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    #[inline]
    fn serialize_unit(self) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::End)
    }

    #[inline]
    fn serialize_unit_struct(self, _name: &'static str) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::End)
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name:          &'static str,
        _variant_index: u32,
        variant:        &'static str,
    ) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<NbtTag, NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        let tag = value.serialize(self)?;
        if is_array_token(name) {
            array_from_tag(name, tag).map_err(ser::Error::custom)
        } else {
            Ok(tag)
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name:          &'static str,
        _variant_index: u32,
        variant:        &'static str,
        value:          &T,
    ) -> Result<NbtTag, NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        Ok(single_entry(variant, value.serialize(self)?))
    }

    #[inline]
    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList, NbtIoError> {
        Ok(SerializeList {
            list: NbtList::with_capacity(len.unwrap_or(0)),
        })
    }

    #[inline]
    fn serialize_tuple(self, len: usize) -> Result<SerializeList, NbtIoError> {
        self.serialize_seq(Some(len))
    }

    #[inline]
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len:   usize,
    ) -> Result<SerializeList, NbtIoError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name:          &'static str,
        _variant_index: u32,
        variant:        &'static str,
        len:            usize,
    ) -> Result<SerializeVariant<SerializeList>, NbtIoError> {
        Ok(SerializeVariant {
            variant,
            inner: self.serialize_seq(Some(len))?,
        })
    }

    #[inline]
    fn serialize_map(self, len: Option<usize>) -> Result<SerializeCompound, NbtIoError> {
        Ok(SerializeCompound {
            compound: NbtCompound::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    #[inline]
    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeCompound, NbtIoError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name:          &'static str,
        _variant_index: u32,
        variant:        &'static str,
        len:            usize,
    ) -> Result<SerializeVariant<SerializeCompound>, NbtIoError> {
        Ok(SerializeVariant {
            variant,
            inner: self.serialize_map(Some(len))?,
        })
    }

    fn collect_str<T>(self, value: &T) -> Result<NbtTag, NbtIoError>
    where
        T: ?Sized + Display,
    {
        Ok(NbtTag::String(value.to_string()))
    }
}

fn single_entry(key: &str, value: NbtTag) -> NbtTag {
    let mut compound = NbtCompound::with_capacity(1);
    compound.insert(key, value);
    NbtTag::Compound(compound)
}

// ================================
//      Sequences
// ================================

/// Collects the elements of a sequence or tuple into a list.
#[derive(Debug)]
pub struct SerializeList {
    list: NbtList,
}

impl ser::SerializeSeq for SerializeList {
    type Ok = NbtTag;
    type Error = NbtIoError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        self.list.push(value.serialize(TagSerializer)?);
        Ok(())
    }

    #[inline]
    fn end(self) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::List(self.list))
    }
}

impl ser::SerializeTuple for SerializeList {
    type Ok = NbtTag;
    type Error = NbtIoError;

    #[inline]
    fn serialize_element<T>(&mut self, value: &T) -> Result<(), NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    #[inline]
    fn end(self) -> Result<NbtTag, NbtIoError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeList {
    type Ok = NbtTag;
    type Error = NbtIoError;

    #[inline]
    fn serialize_field<T>(&mut self, value: &T) -> Result<(), NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    #[inline]
    fn end(self) -> Result<NbtTag, NbtIoError> {
        ser::SerializeSeq::end(self)
    }
}

// ================================
//      Maps
// ================================

/// Collects the entries of a map or the fields of a struct into a compound.
#[derive(Debug)]
pub struct SerializeCompound {
    compound: NbtCompound,
    next_key: Option<String>,
}

impl SerializeCompound {
    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<(), NbtIoError> {
        let tag = value.serialize(TagSerializer)?;
        if !matches!(tag, NbtTag::End) {
            self.compound.insert(key, tag);
        }
        Ok(())
    }
}

impl ser::SerializeMap for SerializeCompound {
    type Ok = NbtTag;
    type Error = NbtIoError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        let key = self.next_key
            .take()
            .ok_or_else(|| {
                <NbtIoError as ser::Error>::custom("serialize_value called before serialize_key")
            })?;
        self.insert(key, value)
    }

    #[inline]
    fn end(self) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Compound(self.compound))
    }
}

impl ser::SerializeStruct for SerializeCompound {
    type Ok = NbtTag;
    type Error = NbtIoError;

    #[inline]
    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_owned(), value)
    }

    #[inline]
    fn end(self) -> Result<NbtTag, NbtIoError> {
        Ok(NbtTag::Compound(self.compound))
    }
}

// ================================
//      Variants
// ================================

/// Wraps the contents of a tuple or struct variant in a compound keyed by the variant name.
#[derive(Debug)]
pub struct SerializeVariant<S> {
    variant: &'static str,
    inner:   S,
}

impl ser::SerializeTupleVariant for SerializeVariant<SerializeList> {
    type Ok = NbtTag;
    type Error = NbtIoError;

    #[inline]
    fn serialize_field<T>(&mut self, value: &T) -> Result<(), NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Result<NbtTag, NbtIoError> {
        Ok(single_entry(self.variant, ser::SerializeSeq::end(self.inner)?))
    }
}

impl ser::SerializeStructVariant for SerializeVariant<SerializeCompound> {
    type Ok = NbtTag;
    type Error = NbtIoError;

    #[inline]
    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<NbtTag, NbtIoError> {
        Ok(single_entry(self.variant, ser::SerializeStruct::end(self.inner)?))
    }
}

// ================================
//      Keys
// ================================

struct KeySerializer;

fn key_must_be_a_string() -> NbtIoError {
    ser::Error::custom("compound keys must be strings, chars or integers")
}

macro_rules! reject_keys {
    ($($method:ident($($arg:ty),*);)*) => {
        $(
            fn $method(self, $(_: $arg),*) -> Result<String, NbtIoError> {
                Err(key_must_be_a_string())
            }
        )*
    };
}

macro_rules! integer_keys {
    ($($method:ident($int:ty);)*) => {
        $(
            #[inline]
            fn $method(self, v: $int) -> Result<String, NbtIoError> {
                Ok(v.to_string())
            }
        )*
    };
}

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = NbtIoError;

    type SerializeSeq = Impossible<String, NbtIoError>;
    type SerializeTuple = Impossible<String, NbtIoError>;
    type SerializeTupleStruct = Impossible<String, NbtIoError>;
    type SerializeTupleVariant = Impossible<String, NbtIoError>;
    type SerializeMap = Impossible<String, NbtIoError>;
    type SerializeStruct = Impossible<String, NbtIoError>;
    type SerializeStructVariant = Impossible<String, NbtIoError>;

    integer_keys! {
        serialize_i8(i8);
        serialize_i16(i16);
        serialize_i32(i32);
        serialize_i64(i64);
        serialize_u8(u8);
        serialize_u16(u16);
        serialize_u32(u32);
        serialize_u64(u64);
    }

    reject_keys! {
        serialize_bool(bool);
        serialize_f32(f32);
        serialize_f64(f64);
        serialize_bytes(&[u8]);
        serialize_none();
        serialize_unit();
        serialize_unit_struct(&'static str);
    }

    #[inline]
    fn serialize_char(self, v: char) -> Result<String, NbtIoError> {
        Ok(v.to_string())
    }

    #[inline]
    fn serialize_str(self, v: &str) -> Result<String, NbtIoError> {
        Ok(v.to_owned())
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name:          &'static str,
        _variant_index: u32,
        variant:        &'static str,
    ) -> Result<String, NbtIoError> {
        Ok(variant.to_owned())
    }

    #[inline]
    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String, NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String, NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_newtype_variant<T>(
        self,
        _name:          &'static str,
        _variant_index: u32,
        _variant:       &'static str,
        _value:         &T,
    ) -> Result<String, NbtIoError>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, NbtIoError> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, NbtIoError> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len:  usize,
    ) -> Result<Self::SerializeTupleStruct, NbtIoError> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_variant(
        self,
        _name:          &'static str,
        _variant_index: u32,
        _variant:       &'static str,
        _len:           usize,
    ) -> Result<Self::SerializeTupleVariant, NbtIoError> {
        Err(key_must_be_a_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, NbtIoError> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct, NbtIoError> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct_variant(
        self,
        _name:          &'static str,
        _variant_index: u32,
        _variant:       &'static str,
        _len:           usize,
    ) -> Result<Self::SerializeStructVariant, NbtIoError> {
        Err(key_must_be_a_string())
    }

    fn collect_str<T>(self, value: &T) -> Result<String, NbtIoError>
    where
        T: ?Sized + Display,
    {
        Ok(value.to_string())
    }
}
