//! A narrow value-construction interface that lets generic code treat NBT trees as one of
//! several interchangeable serialization targets.
//!
//! [`DynamicOps`] creates scalars, lists and maps of some value type, reads them back, and
//! merges into containers without mutating the input. The SNBT grammar is written against it
//! (see [`snbt::parse_with_ops`]), so the same text can produce an [`NbtTag`] through
//! [`NbtOps`] or a `serde_json::Value` through [`JsonOps`].
//!
//! [`snbt::parse_with_ops`]: crate::snbt::parse_with_ops
//! [`NbtTag`]: crate::NbtTag

#[cfg(feature = "serde")]
mod json_ops;
mod nbt_ops;


use thiserror::Error;

use crate::snbt::{self, SnbtError};
use crate::settings::SnbtParseOptions;
use crate::tag::{NbtCompound, NbtTag};


#[cfg(feature = "serde")]
pub use self::json_ops::JsonOps;
pub use self::nbt_ops::NbtOps;


/// A numeric scalar of one of the six NBT widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    /// The value as an `i64`. Floating-point values are truncated toward zero and saturate.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Byte(n)   => i64::from(n),
            Self::Short(n)  => i64::from(n),
            Self::Int(n)    => i64::from(n),
            Self::Long(n)   => n,
            Self::Float(n)  => n as i64,
            Self::Double(n) => n as i64,
        }
    }

    /// The value as an `f64`. Longs outside the range of exact `f64` integers are rounded.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Byte(n)   => f64::from(n),
            Self::Short(n)  => f64::from(n),
            Self::Int(n)    => f64::from(n),
            Self::Long(n)   => n as f64,
            Self::Float(n)  => f64::from(n),
            Self::Double(n) => n,
        }
    }

    /// Whether the value is nonzero. NaN counts as nonzero.
    pub fn is_nonzero(self) -> bool {
        match self {
            Self::Float(n)  => n != 0.0,
            Self::Double(n) => n != 0.0,
            other           => other.as_i64() != 0,
        }
    }

    /// Whether this is one of the four integer widths.
    #[inline]
    pub fn is_integral(self) -> bool {
        !matches!(self, Self::Float(_) | Self::Double(_))
    }
}

impl From<Number> for NbtTag {
    fn from(value: Number) -> Self {
        match value {
            Number::Byte(n)   => Self::Byte(n),
            Number::Short(n)  => Self::Short(n),
            Number::Int(n)    => Self::Int(n),
            Number::Long(n)   => Self::Long(n),
            Number::Float(n)  => Self::Float(n),
            Number::Double(n) => Self::Double(n),
        }
    }
}

/// Builds and inspects values of one serialization format.
///
/// Every `merge_*` method and [`remove`] returns a new value and leaves its input untouched,
/// so a value shared by several callers is never changed behind their backs.
///
/// [`remove`]: DynamicOps::remove
pub trait DynamicOps {
    type Value: Clone;

    /// The format's notion of "nothing", such as an `End` tag or JSON `null`.
    fn empty(&self) -> Self::Value;

    fn create_numeric(&self, number: Number) -> Self::Value;
    fn create_string(&self, value: &str) -> Self::Value;
    fn create_list(&self, values: Vec<Self::Value>) -> Self::Value;
    /// Later entries replace earlier entries with the same key.
    fn create_map(&self, entries: Vec<(String, Self::Value)>) -> Self::Value;

    fn get_number(&self, input: &Self::Value) -> Result<Number, OpsError>;
    fn get_string(&self, input: &Self::Value) -> Result<String, OpsError>;
    fn get_map_entries(&self, input: &Self::Value) -> Result<Vec<(String, Self::Value)>, OpsError>;
    /// The elements of a list-like value.
    fn get_list(&self, input: &Self::Value) -> Result<Vec<Self::Value>, OpsError>;

    /// Appends `value` to a copy of `list`. An empty value is treated as an empty list.
    fn merge_to_list(&self, list: &Self::Value, value: Self::Value) -> Result<Self::Value, OpsError>;
    /// Inserts `key: value` into a copy of `map`. An empty value is treated as an empty map.
    fn merge_to_map(
        &self,
        map:   &Self::Value,
        key:   &str,
        value: Self::Value,
    ) -> Result<Self::Value, OpsError>;

    /// Returns a copy of `input` without `key`, or an unchanged copy if `input` is not a map.
    fn remove(&self, input: &Self::Value, key: &str) -> Self::Value;

    /// Rebuilds `input` with another set of ops.
    fn convert_to<O: DynamicOps>(&self, out: &O, input: &Self::Value) -> O::Value;

    fn create_byte(&self, value: i8) -> Self::Value {
        self.create_numeric(Number::Byte(value))
    }

    fn create_short(&self, value: i16) -> Self::Value {
        self.create_numeric(Number::Short(value))
    }

    fn create_int(&self, value: i32) -> Self::Value {
        self.create_numeric(Number::Int(value))
    }

    fn create_long(&self, value: i64) -> Self::Value {
        self.create_numeric(Number::Long(value))
    }

    fn create_float(&self, value: f32) -> Self::Value {
        self.create_numeric(Number::Float(value))
    }

    fn create_double(&self, value: f64) -> Self::Value {
        self.create_numeric(Number::Double(value))
    }

    fn create_bool(&self, value: bool) -> Self::Value {
        self.create_byte(i8::from(value))
    }

    fn create_byte_array(&self, values: Vec<i8>) -> Self::Value {
        let list = values.into_iter().map(|n| self.create_byte(n)).collect();
        self.create_list(list)
    }

    fn create_int_array(&self, values: Vec<i32>) -> Self::Value {
        let list = values.into_iter().map(|n| self.create_int(n)).collect();
        self.create_list(list)
    }

    fn create_long_array(&self, values: Vec<i64>) -> Self::Value {
        let list = values.into_iter().map(|n| self.create_long(n)).collect();
        self.create_list(list)
    }

    fn empty_list(&self) -> Self::Value {
        self.create_list(Vec::new())
    }

    fn empty_map(&self) -> Self::Value {
        self.create_map(Vec::new())
    }

    fn get_bool(&self, input: &Self::Value) -> Result<bool, OpsError> {
        self.get_number(input).map(Number::is_nonzero)
    }

    fn get_byte_array(&self, input: &Self::Value) -> Result<Vec<i8>, OpsError> {
        self.get_list(input)?
            .iter()
            .map(|value| self.get_number(value).map(|n| n.as_i64() as i8))
            .collect()
    }

    fn get_int_array(&self, input: &Self::Value) -> Result<Vec<i32>, OpsError> {
        self.get_list(input)?
            .iter()
            .map(|value| self.get_number(value).map(|n| n.as_i64() as i32))
            .collect()
    }

    fn get_long_array(&self, input: &Self::Value) -> Result<Vec<i64>, OpsError> {
        self.get_list(input)?
            .iter()
            .map(|value| self.get_number(value).map(Number::as_i64))
            .collect()
    }

    /// Inserts every entry into a copy of `map`.
    fn merge_entries_to_map(
        &self,
        map:     &Self::Value,
        entries: Vec<(String, Self::Value)>,
    ) -> Result<Self::Value, OpsError> {
        entries
            .into_iter()
            .try_fold(map.clone(), |merged, (key, value)| {
                self.merge_to_map(&merged, &key, value)
            })
    }

    /// Converts a map-like value to the output format; anything else becomes an empty map.
    fn convert_map<O: DynamicOps>(&self, out: &O, input: &Self::Value) -> O::Value {
        let entries = self.get_map_entries(input).unwrap_or_default();
        out.create_map(
            entries
                .into_iter()
                .map(|(key, value)| (key, self.convert_to(out, &value)))
                .collect(),
        )
    }

    /// Converts a list-like value to the output format; anything else becomes an empty list.
    fn convert_list<O: DynamicOps>(&self, out: &O, input: &Self::Value) -> O::Value {
        let values = self.get_list(input).unwrap_or_default();
        out.create_list(
            values
                .iter()
                .map(|value| self.convert_to(out, value))
                .collect(),
        )
    }
}

/// Reads a compound from a value that is either an SNBT string or already a map, trying them
/// in that order.
pub fn lenient_compound<O: DynamicOps>(ops: &O, value: &O::Value) -> Result<NbtCompound, OpsError> {
    if let Ok(snbt) = ops.get_string(value) {
        return Ok(snbt::parse_compound(&snbt, SnbtParseOptions::default())?);
    }

    match ops.convert_to(&NbtOps, value) {
        NbtTag::Compound(compound) => Ok(compound),
        other                      => Err(OpsError::NotAMap(other.tag_name())),
    }
}

/// An error from reading or merging a value through [`DynamicOps`].
#[derive(Error, Debug)]
pub enum OpsError {
    #[error("expected a number, found {0}")]
    NotANumber(&'static str),
    #[error("expected a string, found {0}")]
    NotAString(&'static str),
    #[error("expected a map, found {0}")]
    NotAMap(&'static str),
    #[error("expected a list, found {0}")]
    NotAList(&'static str),
    #[error("cannot merge a {value} into a {target}")]
    MergeMismatch {
        target: &'static str,
        value:  &'static str,
    },
    #[error(transparent)]
    Snbt(#[from] SnbtError),
}
