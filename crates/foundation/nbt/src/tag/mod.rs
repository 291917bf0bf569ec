mod compound;
mod list;
pub(crate) mod size;


use std::hash::{Hash, Hasher};

use crate::print;
use crate::repr::NbtStructureError;
use crate::settings::{PrettyOptions, SnbtParseOptions, SnbtWriteOptions};
use crate::snbt::{self, SnbtError};
use crate::stream::{self, StreamTagVisitor, ValueResult};


pub use self::{compound::NbtCompound, list::NbtList};


/// The hash map type utilized in this crate.
///
/// If `preserve_order` is enabled, the map will iterate over keys and values
/// in the order they were inserted by using the `IndexMap` type
/// from the crate <https://docs.rs/indexmap/latest/indexmap/>.
/// Otherwise, `std`'s `HashMap` is used.
#[cfg(feature = "preserve_order")]
pub type Map<T> = indexmap::IndexMap<String, T>;

/// The hash map type utilized in this crate.
///
/// If `preserve_order` is enabled, the map will iterate over keys and values
/// in the order they were inserted by using the `IndexMap` type
/// from the crate <https://docs.rs/indexmap/latest/indexmap/>.
/// Otherwise, `std`'s `HashMap` is used.
#[cfg(not(feature = "preserve_order"))]
pub type Map<T> = std::collections::HashMap<String, T>;


/// The generic NBT tag type, containing all thirteen tag variants
/// which wrap around a corresponding Rust type.
///
/// Every container exclusively owns its children, so `clone` is a deep copy
/// producing an entirely independent tree.
///
/// Equality is structural. Hashing agrees with equality: floats are hashed by their bits
/// (with `-0.0` folded into `0.0`) and compounds are hashed independently of entry order.
#[derive(Clone, PartialEq)]
pub enum NbtTag {
    /// The zero-payload sentinel which terminates compounds in binary data and stands for
    /// "absent" elsewhere.
    End,
    /// A signed, one-byte integer. Booleans are stored as `0` and `1`.
    Byte(i8),
    /// A signed, two-byte integer.
    Short(i16),
    /// A signed, four-byte integer.
    Int(i32),
    /// A signed, eight-byte integer.
    Long(i64),
    /// A 32-bit floating point value.
    Float(f32),
    /// A 64-bit floating point value.
    Double(f64),
    /// An array (vec) of signed one-byte integers.
    ByteArray(Vec<i8>),
    /// A UTF-8 string.
    String(String),
    /// An NBT tag list. Usually homogeneous; see [`NbtList`] for the mixed case.
    List(NbtList),
    /// An NBT tag compound.
    Compound(NbtCompound),
    /// An array (vec) of signed, four-byte integers.
    IntArray(Vec<i32>),
    /// An array (vec) of signed, eight-byte integers.
    LongArray(Vec<i64>),
}

/// The closed set of tag variants, carrying the numeric IDs of the binary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum NbtType {
    End       = 0,
    Byte      = 1,
    Short     = 2,
    Int       = 3,
    Long      = 4,
    Float     = 5,
    Double    = 6,
    ByteArray = 7,
    String    = 8,
    List      = 9,
    Compound  = 10,
    IntArray  = 11,
    LongArray = 12,
}

impl NbtType {
    /// Every variant, in ID order.
    pub const ALL: [Self; 13] = [
        Self::End, Self::Byte, Self::Short, Self::Int, Self::Long, Self::Float, Self::Double,
        Self::ByteArray, Self::String, Self::List, Self::Compound, Self::IntArray,
        Self::LongArray,
    ];

    /// The ID used for this variant in binary NBT.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns `None` for IDs above 12.
    #[inline]
    pub const fn from_id(id: u8) -> Option<Self> {
        if (id as usize) < Self::ALL.len() {
            Some(Self::ALL[id as usize])
        } else {
            None
        }
    }

    /// The name used in diagnostics, such as `TAG_Compound`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::End       => "TAG_End",
            Self::Byte      => "TAG_Byte",
            Self::Short     => "TAG_Short",
            Self::Int       => "TAG_Int",
            Self::Long      => "TAG_Long",
            Self::Float     => "TAG_Float",
            Self::Double    => "TAG_Double",
            Self::ByteArray => "TAG_Byte_Array",
            Self::String    => "TAG_String",
            Self::List      => "TAG_List",
            Self::Compound  => "TAG_Compound",
            Self::IntArray  => "TAG_Int_Array",
            Self::LongArray => "TAG_Long_Array",
        }
    }

    /// The short name used in type mismatch errors, such as `Compound`.
    pub const fn pretty_name(self) -> &'static str {
        match self {
            Self::End       => "End",
            Self::Byte      => "Byte",
            Self::Short     => "Short",
            Self::Int       => "Int",
            Self::Long      => "Long",
            Self::Float     => "Float",
            Self::Double    => "Double",
            Self::ByteArray => "ByteArray",
            Self::String    => "String",
            Self::List      => "List",
            Self::Compound  => "Compound",
            Self::IntArray  => "IntArray",
            Self::LongArray => "LongArray",
        }
    }

    /// Whether a value of this type holds other tags.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::List | Self::Compound)
    }
}

impl NbtTag {
    /// Returns this tag's numeric ID.
    #[inline]
    pub fn id(&self) -> u8 {
        self.nbt_type().id()
    }

    /// Returns this tag's type.
    #[inline]
    pub fn nbt_type(&self) -> NbtType {
        match self {
            Self::End          => NbtType::End,
            Self::Byte(_)      => NbtType::Byte,
            Self::Short(_)     => NbtType::Short,
            Self::Int(_)       => NbtType::Int,
            Self::Long(_)      => NbtType::Long,
            Self::Float(_)     => NbtType::Float,
            Self::Double(_)    => NbtType::Double,
            Self::ByteArray(_) => NbtType::ByteArray,
            Self::String(_)    => NbtType::String,
            Self::List(_)      => NbtType::List,
            Self::Compound(_)  => NbtType::Compound,
            Self::IntArray(_)  => NbtType::IntArray,
            Self::LongArray(_) => NbtType::LongArray,
        }
    }

    #[inline]
    pub(crate) fn tag_name(&self) -> &'static str {
        self.nbt_type().pretty_name()
    }

    /// Whether this is one of the six numeric scalar variants.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Byte(_) | Self::Short(_) | Self::Int(_)
            | Self::Long(_) | Self::Float(_) | Self::Double(_)
        )
    }

    /// An estimate of the memory used by this tree, identical to what the decoder charges an
    /// [`NbtAccounter`] for the same data.
    ///
    /// [`NbtAccounter`]: crate::NbtAccounter
    pub fn size_in_bytes(&self) -> u64 {
        match self {
            Self::End          => size::END,
            Self::Byte(_)      => size::BYTE,
            Self::Short(_)     => size::SHORT,
            Self::Int(_)       => size::INT,
            Self::Long(_)      => size::LONG,
            Self::Float(_)     => size::FLOAT,
            Self::Double(_)    => size::DOUBLE,
            Self::String(s)    => size::string(s),
            Self::ByteArray(a) => size::array(size::BYTE_ELEMENT, a.len()),
            Self::IntArray(a)  => size::array(size::INT_ELEMENT, a.len()),
            Self::LongArray(a) => size::array(size::LONG_ELEMENT, a.len()),
            Self::List(list)   => list.size_in_bytes(),
            Self::Compound(c)  => c.size_in_bytes(),
        }
    }

    /// Drives `visitor` over this tag as though it were the payload of a root tag,
    /// starting with `visit_root_entry`.
    pub fn accept_as_root<V: StreamTagVisitor + ?Sized>(&self, visitor: &mut V) -> ValueResult {
        match visitor.visit_root_entry(self.nbt_type()) {
            ValueResult::Continue => stream::walk_tag(self, visitor),
            other                 => other,
        }
    }

    /// Drives `visitor` over this tag with the same outcome semantics as streaming decode.
    #[inline]
    pub fn accept_stream<V: StreamTagVisitor + ?Sized>(&self, visitor: &mut V) -> ValueResult {
        stream::walk_tag(self, visitor)
    }

    /// Parses an NBT tag from SNBT with the default options.
    #[inline]
    pub fn from_snbt(input: &str) -> Result<Self, SnbtError> {
        snbt::parse_any(input, SnbtParseOptions::default())
    }

    /// Parses an NBT tag from SNBT.
    #[inline]
    pub fn from_snbt_with_options(input: &str, opts: SnbtParseOptions) -> Result<Self, SnbtError> {
        snbt::parse_any(input, opts)
    }

    /// Converts this NBT tag into a valid, parsable SNBT string with no extraneous spacing
    /// and compound keys in sorted order. The same as `format!("{tag}")`.
    #[inline]
    pub fn to_snbt(&self) -> String {
        print::to_snbt(self, SnbtWriteOptions::default())
    }

    #[inline]
    pub fn to_snbt_with_options(&self, opts: SnbtWriteOptions) -> String {
        print::to_snbt(self, opts)
    }

    /// Converts this NBT tag into indented, multi-line SNBT.
    #[inline]
    pub fn to_pretty_snbt(&self) -> String {
        print::PrettyPrinter::new(PrettyOptions::default()).print(self)
    }
}

impl Default for NbtTag {
    #[inline]
    fn default() -> Self {
        Self::End
    }
}

// -0.0 == 0.0, so they must hash alike
#[inline]
fn f32_hash_bits(value: f32) -> u32 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

#[inline]
fn f64_hash_bits(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

impl Hash for NbtTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.id());
        match self {
            Self::End          => {}
            Self::Byte(v)      => v.hash(state),
            Self::Short(v)     => v.hash(state),
            Self::Int(v)       => v.hash(state),
            Self::Long(v)      => v.hash(state),
            Self::Float(v)     => f32_hash_bits(*v).hash(state),
            Self::Double(v)    => f64_hash_bits(*v).hash(state),
            Self::ByteArray(v) => v.hash(state),
            Self::String(v)    => v.hash(state),
            Self::List(v)      => v.hash(state),
            Self::Compound(v)  => v.hash(state),
            Self::IntArray(v)  => v.hash(state),
            Self::LongArray(v) => v.hash(state),
        }
    }
}


// ================================
//      Conversions
// ================================

// For each payload type: `From<T> for NbtTag`, `TryFrom<NbtTag> for T`, and borrowing
// conversions into `&T` and `&mut T`.
macro_rules! tag_conversions {
    ($($variant:ident($type:ty)),* $(,)?) => {
        $(
            impl From<$type> for NbtTag {
                #[inline]
                fn from(value: $type) -> Self {
                    Self::$variant(value)
                }
            }

            impl TryFrom<NbtTag> for $type {
                type Error = NbtStructureError;

                #[inline]
                fn try_from(tag: NbtTag) -> Result<Self, Self::Error> {
                    match tag {
                        NbtTag::$variant(value) => Ok(value),
                        other => Err(mismatch(stringify!($variant), &other)),
                    }
                }
            }

            impl<'a> TryFrom<&'a NbtTag> for &'a $type {
                type Error = NbtStructureError;

                #[inline]
                fn try_from(tag: &'a NbtTag) -> Result<Self, Self::Error> {
                    match tag {
                        NbtTag::$variant(value) => Ok(value),
                        other => Err(mismatch(stringify!($variant), other)),
                    }
                }
            }

            impl<'a> TryFrom<&'a mut NbtTag> for &'a mut $type {
                type Error = NbtStructureError;

                #[inline]
                fn try_from(tag: &'a mut NbtTag) -> Result<Self, Self::Error> {
                    match tag {
                        NbtTag::$variant(value) => Ok(value),
                        other => Err(mismatch(stringify!($variant), other)),
                    }
                }
            }
        )*
    };
}

// Copy scalars can also be read straight out of a shared reference.
macro_rules! scalar_from_ref {
    ($($variant:ident($type:ty)),* $(,)?) => {
        $(
            impl TryFrom<&NbtTag> for $type {
                type Error = NbtStructureError;

                #[inline]
                fn try_from(tag: &NbtTag) -> Result<Self, Self::Error> {
                    match *tag {
                        NbtTag::$variant(value) => Ok(value),
                        ref other => Err(mismatch(stringify!($variant), other)),
                    }
                }
            }
        )*
    };
}

#[inline]
fn mismatch(expected: &'static str, found: &NbtTag) -> NbtStructureError {
    NbtStructureError::type_mismatch(expected, found.tag_name())
}

tag_conversions!(
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(NbtList),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
);

scalar_from_ref!(
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
);

impl<'a> TryFrom<&'a NbtTag> for &'a str {
    type Error = NbtStructureError;

    #[inline]
    fn try_from(tag: &'a NbtTag) -> Result<Self, Self::Error> {
        match tag {
            NbtTag::String(value) => Ok(value),
            other => Err(mismatch("String", other)),
        }
    }
}

impl From<&str> for NbtTag {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<bool> for NbtTag {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Byte(i8::from(value))
    }
}

impl From<u8> for NbtTag {
    #[inline]
    fn from(value: u8) -> Self {
        Self::Byte(value as i8)
    }
}

impl TryFrom<&NbtTag> for bool {
    type Error = NbtStructureError;

    fn try_from(tag: &NbtTag) -> Result<Self, Self::Error> {
        match *tag {
            NbtTag::Byte(value)  => Ok(value != 0),
            NbtTag::Short(value) => Ok(value != 0),
            NbtTag::Int(value)   => Ok(value != 0),
            NbtTag::Long(value)  => Ok(value != 0),
            ref other => Err(mismatch("Byte, Short, Int, or Long", other)),
        }
    }
}


#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of(tag: &NbtTag) -> u64 {
        let mut hasher = DefaultHasher::new();
        tag.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn type_ids_are_stable() {
        for (id, ty) in NbtType::ALL.iter().enumerate() {
            assert_eq!(usize::from(ty.id()), id, "{ty:?}");
            assert_eq!(NbtType::from_id(ty.id()), Some(*ty));
        }
        assert_eq!(NbtType::from_id(13), None);
        assert_eq!(NbtTag::Compound(NbtCompound::new()).id(), 10);
        assert_eq!(NbtTag::End.nbt_type().name(), "TAG_End");
    }

    #[test]
    fn equal_tags_hash_alike() {
        assert_eq!(hash_of(&NbtTag::Double(0.0)), hash_of(&NbtTag::Double(-0.0)));
        assert_eq!(hash_of(&NbtTag::IntArray(vec![1, 2])), hash_of(&NbtTag::IntArray(vec![1, 2])));
        assert_ne!(hash_of(&NbtTag::Int(1)), hash_of(&NbtTag::Long(1)));

        let mut a = NbtCompound::new();
        a.insert("x", 1);
        a.insert("y", "two");
        let mut b = NbtCompound::new();
        b.insert("y", "two");
        b.insert("x", 1);
        assert_eq!(a, b);
        assert_eq!(hash_of(&NbtTag::Compound(a)), hash_of(&NbtTag::Compound(b)));
    }

    #[test]
    fn clone_is_independent() {
        let mut inner = NbtCompound::new();
        inner.insert("bytes", vec![1_i8, 2, 3]);
        let mut original = NbtCompound::new();
        original.insert("inner", inner);

        let mut copy = original.clone();
        let bytes: &mut Vec<i8> = copy
            .get_mut::<_, &mut NbtCompound>("inner")
            .and_then(|inner| inner.get_mut("bytes"))
            .unwrap();
        bytes.push(4);

        let original_bytes: &[i8] = original
            .get::<_, &NbtCompound>("inner")
            .and_then(|inner| inner.get::<_, &Vec<i8>>("bytes"))
            .unwrap();
        assert_eq!(original_bytes, &[1, 2, 3]);
    }

    #[test]
    fn conversions() {
        assert_eq!(i32::try_from(&NbtTag::Int(5)).unwrap(), 5);
        assert!(i32::try_from(&NbtTag::Byte(5)).is_err());
        assert!(bool::try_from(&NbtTag::Byte(1)).unwrap());
        assert_eq!(NbtTag::from(true), NbtTag::Byte(1));
        assert_eq!(<&str>::try_from(&NbtTag::from("hi")).unwrap(), "hi");
        let err = String::try_from(NbtTag::Int(1)).unwrap_err();
        assert_eq!(err, NbtStructureError::type_mismatch("String", "Int"));
    }

    #[test]
    fn sizes_match_shape() {
        assert_eq!(NbtTag::Byte(1).size_in_bytes(), 9);
        assert_eq!(NbtTag::from("ab").size_in_bytes(), 36 + 4);
        assert_eq!(NbtTag::LongArray(vec![0; 3]).size_in_bytes(), 24 + 24);

        let list: NbtList = vec![NbtTag::Int(1), NbtTag::Int(2)].into();
        assert_eq!(NbtTag::List(list).size_in_bytes(), 37 + 8 + 24);

        let mut compound = NbtCompound::new();
        compound.insert("k", 1_i8);
        assert_eq!(NbtTag::Compound(compound).size_in_bytes(), 48 + 28 + 2 + 36 + 9);
    }
}
