//! Serde support: `Serialize`/`Deserialize` for the tag types, and a bridge which routes any
//! serde type through an [`NbtTag`] tree.
//!
//! Serde has no notion of the three NBT array variants, so they travel as a newtype struct
//! with a reserved name wrapping a sequence of integers. [`ByteArray`], [`IntArray`] and
//! [`LongArray`] do this for fields of derived types; a plain `Vec<i32>` becomes a list.
//! Formats which ignore newtype names, such as JSON, see an ordinary sequence.

mod de;
mod ser;
mod tag_impl;


use std::fmt::{self, Formatter};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::de::{DeserializeOwned, SeqAccess, Visitor};

use crate::io::NbtIoError;
use crate::tag::{NbtCompound, NbtTag};


pub use self::ser::{SerializeCompound, SerializeList, SerializeVariant, TagSerializer};


pub(crate) const BYTE_ARRAY_TOKEN: &str = "__tagtree_nbt_byte_array";
pub(crate) const INT_ARRAY_TOKEN:  &str = "__tagtree_nbt_int_array";
pub(crate) const LONG_ARRAY_TOKEN: &str = "__tagtree_nbt_long_array";


/// Serializes `value` into a tag tree. See [`TagSerializer`] for how serde's data model maps
/// onto tags.
#[inline]
pub fn to_tag<T: Serialize + ?Sized>(value: &T) -> Result<NbtTag, NbtIoError> {
    value.serialize(TagSerializer)
}

/// Deserializes a `T` out of a tag tree.
///
/// Integer tags convert to any integer type they fit in, and to `bool` (nonzero is `true`).
/// `End` reads as `None` or `()`. Enums are read from a string naming a unit variant or
/// from a compound with a single entry keyed by the variant name.
#[inline]
pub fn from_tag<T: DeserializeOwned>(tag: NbtTag) -> Result<T, NbtIoError> {
    T::deserialize(tag)
}

/// Deserializes a compound that may be given either as SNBT text or as a map.
///
/// Meant for `#[serde(deserialize_with = "deserialize_lenient_compound")]` on fields which
/// some producers write as a string.
pub fn deserialize_lenient_compound<'de, D>(deserializer: D) -> Result<NbtCompound, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(tag_impl::CompoundVisitor { accept_snbt: true })
}

#[inline]
pub(crate) fn is_array_token(name: &str) -> bool {
    matches!(name, BYTE_ARRAY_TOKEN | INT_ARRAY_TOKEN | LONG_ARRAY_TOKEN)
}

/// Builds the array variant named by `token` out of a list of integer tags.
///
/// Every element must fit the array's element width. An array tag of the right variant is
/// passed through unchanged.
pub(crate) fn array_from_tag(token: &str, tag: NbtTag) -> Result<NbtTag, String> {
    let elements = match (token, tag) {
        (_, NbtTag::List(list)) => list.into_inner(),
        (BYTE_ARRAY_TOKEN, tag @ NbtTag::ByteArray(_))
        | (INT_ARRAY_TOKEN, tag @ NbtTag::IntArray(_))
        | (LONG_ARRAY_TOKEN, tag @ NbtTag::LongArray(_)) => return Ok(tag),
        (_, other) => {
            return Err(format!(
                "expected a list of integers for an NBT array, found {}",
                other.tag_name(),
            ));
        }
    };

    match token {
        BYTE_ARRAY_TOKEN => collect_array(&elements).map(NbtTag::ByteArray),
        INT_ARRAY_TOKEN  => collect_array(&elements).map(NbtTag::IntArray),
        LONG_ARRAY_TOKEN => collect_array(&elements).map(NbtTag::LongArray),
        _ => Err(format!("{token} does not name an NBT array")),
    }
}

fn collect_array<T: TryFrom<i64>>(elements: &[NbtTag]) -> Result<Vec<T>, String> {
    elements
        .iter()
        .map(|element| {
            let n = match *element {
                NbtTag::Byte(n)  => i64::from(n),
                NbtTag::Short(n) => i64::from(n),
                NbtTag::Int(n)   => i64::from(n),
                NbtTag::Long(n)  => n,
                _ => return Err(format!("invalid NBT array element {element}")),
            };
            T::try_from(n).map_err(|_| format!("NBT array element {n} is out of range"))
        })
        .collect()
}

// ================================
//      Array wrappers
// ================================

macro_rules! array_wrapper {
    ($name:ident, $element:ty, $token:ident, $variant:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name(pub Vec<$element>);

        impl Serialize for $name {
            #[inline]
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_newtype_struct($token, &self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            #[inline]
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer
                    .deserialize_newtype_struct($token, ArrayVisitor::<$element>(PhantomData))
                    .map(Self)
            }
        }

        impl From<Vec<$element>> for $name {
            #[inline]
            fn from(array: Vec<$element>) -> Self {
                Self(array)
            }
        }

        impl From<$name> for NbtTag {
            #[inline]
            fn from(array: $name) -> Self {
                Self::$variant(array.0)
            }
        }
    };
}

array_wrapper!(ByteArray, i8,  BYTE_ARRAY_TOKEN, ByteArray, "A field stored as a `ByteArray` tag.");
array_wrapper!(IntArray,  i32, INT_ARRAY_TOKEN,  IntArray,  "A field stored as an `IntArray` tag.");
array_wrapper!(LongArray, i64, LONG_ARRAY_TOKEN, LongArray, "A field stored as a `LongArray` tag.");

struct ArrayVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for ArrayVisitor<T> {
    type Value = Vec<T>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("an NBT array")
    }

    #[inline]
    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut elements = Vec::new();
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok(elements)
    }
}


#[cfg(test)]
mod tests;
