use std::fmt::{self, Formatter};

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::de::{MapAccess, SeqAccess, Unexpected, Visitor};

use crate::tag::{NbtCompound, NbtList, NbtTag};
use super::{array_from_tag, is_array_token, BYTE_ARRAY_TOKEN, INT_ARRAY_TOKEN, LONG_ARRAY_TOKEN};


impl Serialize for NbtTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::End                => serializer.serialize_unit(),
            &Self::Byte(value)       => serializer.serialize_i8(value),
            &Self::Short(value)      => serializer.serialize_i16(value),
            &Self::Int(value)        => serializer.serialize_i32(value),
            &Self::Long(value)       => serializer.serialize_i64(value),
            &Self::Float(value)      => serializer.serialize_f32(value),
            &Self::Double(value)     => serializer.serialize_f64(value),
            Self::String(value)      => serializer.serialize_str(value),
            Self::ByteArray(array)   => serializer.serialize_newtype_struct(BYTE_ARRAY_TOKEN, array),
            Self::IntArray(array)    => serializer.serialize_newtype_struct(INT_ARRAY_TOKEN, array),
            Self::LongArray(array)   => serializer.serialize_newtype_struct(LONG_ARRAY_TOKEN, array),
            Self::List(list)         => list.serialize(serializer),
            Self::Compound(compound) => compound.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for NbtTag {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NbtTagVisitor)
    }
}

struct NbtTagVisitor;

impl<'de> Visitor<'de> for NbtTagVisitor {
    type Value = NbtTag;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a valid NBT type")
    }

    #[inline]
    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(NbtTag::Byte(i8::from(v)))
    }

    #[inline]
    fn visit_i8<E: de::Error>(self, v: i8) -> Result<Self::Value, E> {
        Ok(NbtTag::Byte(v))
    }

    #[inline]
    fn visit_i16<E: de::Error>(self, v: i16) -> Result<Self::Value, E> {
        Ok(NbtTag::Short(v))
    }

    #[inline]
    fn visit_i32<E: de::Error>(self, v: i32) -> Result<Self::Value, E> {
        Ok(NbtTag::Int(v))
    }

    #[inline]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(NbtTag::Long(v))
    }

    // Unsigned values widen like they do in `TagSerializer`.
    #[inline]
    fn visit_u8<E: de::Error>(self, v: u8) -> Result<Self::Value, E> {
        Ok(NbtTag::Short(i16::from(v)))
    }

    #[inline]
    fn visit_u16<E: de::Error>(self, v: u16) -> Result<Self::Value, E> {
        Ok(NbtTag::Int(i32::from(v)))
    }

    #[inline]
    fn visit_u32<E: de::Error>(self, v: u32) -> Result<Self::Value, E> {
        Ok(NbtTag::Long(i64::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(NbtTag::Long)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    #[inline]
    fn visit_f32<E: de::Error>(self, v: f32) -> Result<Self::Value, E> {
        Ok(NbtTag::Float(v))
    }

    #[inline]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(NbtTag::Double(v))
    }

    #[inline]
    fn visit_char<E: de::Error>(self, v: char) -> Result<Self::Value, E> {
        Ok(NbtTag::String(v.to_string()))
    }

    #[inline]
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(NbtTag::String(v.to_owned()))
    }

    #[inline]
    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(NbtTag::String(v))
    }

    #[inline]
    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(NbtTag::ByteArray(v.iter().map(|&byte| i8::from_ne_bytes([byte])).collect()))
    }

    #[inline]
    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NbtTag::End)
    }

    #[inline]
    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NbtTag::End)
    }

    #[inline]
    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        NbtTag::deserialize(deserializer)
    }

    #[inline]
    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        NbtTag::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut list = NbtList::new();
        while let Some(tag) = seq.next_element::<NbtTag>()? {
            list.push(tag);
        }
        Ok(NbtTag::List(list))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let Some(first_key) = map.next_key::<String>()? else {
            return Ok(NbtTag::Compound(NbtCompound::new()));
        };

        // An array read back through a self-describing deserializer
        if is_array_token(&first_key) {
            let elements = map.next_value::<NbtTag>()?;
            return array_from_tag(&first_key, elements).map_err(de::Error::custom);
        }

        let first_value = map.next_value::<NbtTag>()?;
        collect_entries(map, Some((first_key, first_value))).map(NbtTag::Compound)
    }
}

fn collect_entries<'de, A>(
    mut map: A,
    first:   Option<(String, NbtTag)>,
) -> Result<NbtCompound, A::Error>
where
    A: MapAccess<'de>,
{
    let mut compound = NbtCompound::with_capacity(map.size_hint().unwrap_or(0).min(4096) + 1);
    if let Some((key, tag)) = first {
        compound.insert(key, tag);
    }
    while let Some((key, tag)) = map.next_entry::<String, NbtTag>()? {
        compound.insert(key, tag);
    }
    Ok(compound)
}

impl Serialize for NbtList {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for NbtList {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self(Deserialize::deserialize(deserializer)?))
    }
}

impl Serialize for NbtCompound {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for NbtCompound {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CompoundVisitor { accept_snbt: false })
    }
}

/// Reads a compound from a map, or also from SNBT text if `accept_snbt` is set.
pub(super) struct CompoundVisitor {
    pub(super) accept_snbt: bool,
}

impl<'de> Visitor<'de> for CompoundVisitor {
    type Value = NbtCompound;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.accept_snbt {
            f.write_str("a compound or an SNBT string")
        } else {
            f.write_str("a compound")
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if self.accept_snbt {
            NbtCompound::from_snbt(v).map_err(E::custom)
        } else {
            Err(E::invalid_type(Unexpected::Str(v), &self))
        }
    }

    #[inline]
    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        collect_entries(map, None)
    }
}
