use serde::forward_to_deserialize_any;
use serde::de::{
    self, Deserialize as _, DeserializeSeed, Deserializer, EnumAccess, IntoDeserializer,
    Unexpected, VariantAccess, Visitor,
};
use serde::de::value::{MapDeserializer, SeqDeserializer, StringDeserializer};

use crate::io::NbtIoError;
use crate::tag::NbtTag;
use super::{is_array_token, BYTE_ARRAY_TOKEN, INT_ARRAY_TOKEN, LONG_ARRAY_TOKEN};


impl<'de> IntoDeserializer<'de, NbtIoError> for NbtTag {
    type Deserializer = Self;

    #[inline]
    fn into_deserializer(self) -> Self {
        self
    }
}

/// Reads a tag tree as the input of any deserializable type; see
/// [`from_tag`](super::from_tag).
///
/// Self-describing reads present an array as a map with a single entry, keyed by a reserved
/// name, holding the elements as a list. A type asking for a sequence gets the elements
/// directly.
impl<'de> Deserializer<'de> for NbtTag {
    type Error = NbtIoError;

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        map struct identifier
    }

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::End                  => visitor.visit_unit(),
            Self::Byte(n)              => visitor.visit_i8(n),
            Self::Short(n)             => visitor.visit_i16(n),
            Self::Int(n)               => visitor.visit_i32(n),
            Self::Long(n)              => visitor.visit_i64(n),
            Self::Float(n)             => visitor.visit_f32(n),
            Self::Double(n)            => visitor.visit_f64(n),
            Self::String(string)       => visitor.visit_string(string),
            Self::ByteArray(array)     => visit_array(visitor, BYTE_ARRAY_TOKEN, array),
            Self::IntArray(array)      => visit_array(visitor, INT_ARRAY_TOKEN, array),
            Self::LongArray(array)     => visit_array(visitor, LONG_ARRAY_TOKEN, array),
            Self::List(list)           => visit_seq(visitor, list.into_inner().into_iter()),
            Self::Compound(compound)   => visit_map(visitor, compound.into_inner().into_iter()),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::Byte(n)  => visitor.visit_bool(n != 0),
            Self::Short(n) => visitor.visit_bool(n != 0),
            Self::Int(n)   => visitor.visit_bool(n != 0),
            Self::Long(n)  => visitor.visit_bool(n != 0),
            other          => other.deserialize_any(visitor),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::ByteArray(array) => {
                visitor.visit_byte_buf(array.into_iter().map(|n| n.to_ne_bytes()[0]).collect())
            }
            other => other.deserialize_any(visitor),
        }
    }

    #[inline]
    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::End => visitor.visit_none(),
            other     => visitor.visit_some(other),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        let is_unit = match &self {
            Self::End                => true,
            Self::Compound(compound) => compound.is_empty(),
            _                        => false,
        };
        if is_unit {
            visitor.visit_unit()
        } else {
            self.deserialize_any(visitor)
        }
    }

    #[inline]
    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        name:    &'static str,
        visitor: V,
    ) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        if is_array_token(name) {
            self.deserialize_seq(visitor)
        } else {
            visitor.visit_newtype_struct(self)
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::ByteArray(array) => visit_seq(visitor, array.into_iter().map(Self::Byte)),
            Self::IntArray(array)  => visit_seq(visitor, array.into_iter().map(Self::Int)),
            Self::LongArray(array) => visit_seq(visitor, array.into_iter().map(Self::Long)),
            Self::List(list)       => visit_seq(visitor, list.into_inner().into_iter()),
            other                  => other.deserialize_any(visitor),
        }
    }

    #[inline]
    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    #[inline]
    fn deserialize_tuple_struct<V>(
        self,
        _name:   &'static str,
        _len:    usize,
        visitor: V,
    ) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name:     &'static str,
        _variants: &'static [&'static str],
        visitor:   V,
    ) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::String(variant) => {
                let variant: StringDeserializer<NbtIoError> = variant.into_deserializer();
                visitor.visit_enum(variant)
            }
            Self::Compound(compound) if compound.len() == 1 => {
                match compound.into_inner().into_iter().next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer { variant, value }),
                    None => Err(de::Error::invalid_length(0, &"a single variant")),
                }
            }
            other => Err(de::Error::invalid_type(
                Unexpected::Other(other.tag_name()),
                &"a string or a compound with a single entry",
            )),
        }
    }

    #[inline]
    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        drop(self);
        visitor.visit_unit()
    }
}

fn visit_seq<'de, V, I>(visitor: V, elements: I) -> Result<V::Value, NbtIoError>
where
    V: Visitor<'de>,
    I: Iterator<Item = NbtTag>,
{
    let mut seq = SeqDeserializer::<_, NbtIoError>::new(elements);
    let value = visitor.visit_seq(&mut seq)?;
    seq.end()?;
    Ok(value)
}

fn visit_map<'de, V, I>(visitor: V, entries: I) -> Result<V::Value, NbtIoError>
where
    V: Visitor<'de>,
    I: Iterator<Item = (String, NbtTag)>,
{
    let mut map = MapDeserializer::<_, NbtIoError>::new(entries);
    let value = visitor.visit_map(&mut map)?;
    map.end()?;
    Ok(value)
}

fn visit_array<'de, V, T>(visitor: V, token: &str, array: Vec<T>) -> Result<V::Value, NbtIoError>
where
    V: Visitor<'de>,
    T: Into<NbtTag>,
{
    let elements = NbtTag::List(array.into_iter().map(Into::into).collect());
    visit_map(visitor, std::iter::once((token.to_owned(), elements)))
}

// ================================
//      Enums
// ================================

struct EnumDeserializer {
    variant: String,
    value:   NbtTag,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = NbtIoError;
    type Variant = VariantDeserializer;

    fn variant_seed<S>(self, seed: S) -> Result<(S::Value, VariantDeserializer), NbtIoError>
    where
        S: DeserializeSeed<'de>,
    {
        let variant: StringDeserializer<NbtIoError> = self.variant.into_deserializer();
        Ok((seed.deserialize(variant)?, VariantDeserializer(self.value)))
    }
}

struct VariantDeserializer(NbtTag);

impl<'de> VariantAccess<'de> for VariantDeserializer {
    type Error = NbtIoError;

    #[inline]
    fn unit_variant(self) -> Result<(), NbtIoError> {
        <()>::deserialize(self.0)
    }

    #[inline]
    fn newtype_variant_seed<S>(self, seed: S) -> Result<S::Value, NbtIoError>
    where
        S: DeserializeSeed<'de>,
    {
        seed.deserialize(self.0)
    }

    #[inline]
    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        self.0.deserialize_seq(visitor)
    }

    #[inline]
    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, NbtIoError>
    where
        V: Visitor<'de>,
    {
        self.0.deserialize_map(visitor)
    }
}
