use crate::tag::{NbtCompound, NbtList, NbtTag};

use super::{DynamicOps, Number, OpsError};


/// [`DynamicOps`] over [`NbtTag`] trees.
///
/// Typed arrays are created as `ByteArray`, `IntArray` and `LongArray` tags. Reading a list
/// looks through the wrapper compounds of a list that came back from binary data with mixed
/// element types, and reading a typed array as a list yields its elements as scalar tags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NbtOps;

impl DynamicOps for NbtOps {
    type Value = NbtTag;

    #[inline]
    fn empty(&self) -> NbtTag {
        NbtTag::End
    }

    #[inline]
    fn create_numeric(&self, number: Number) -> NbtTag {
        number.into()
    }

    #[inline]
    fn create_string(&self, value: &str) -> NbtTag {
        NbtTag::String(value.to_owned())
    }

    #[inline]
    fn create_list(&self, values: Vec<NbtTag>) -> NbtTag {
        NbtTag::List(NbtList::from(values))
    }

    fn create_map(&self, entries: Vec<(String, NbtTag)>) -> NbtTag {
        NbtTag::Compound(entries.into_iter().collect())
    }

    #[inline]
    fn create_byte_array(&self, values: Vec<i8>) -> NbtTag {
        NbtTag::ByteArray(values)
    }

    #[inline]
    fn create_int_array(&self, values: Vec<i32>) -> NbtTag {
        NbtTag::IntArray(values)
    }

    #[inline]
    fn create_long_array(&self, values: Vec<i64>) -> NbtTag {
        NbtTag::LongArray(values)
    }

    fn get_number(&self, input: &NbtTag) -> Result<Number, OpsError> {
        Ok(match input {
            NbtTag::Byte(n)   => Number::Byte(*n),
            NbtTag::Short(n)  => Number::Short(*n),
            NbtTag::Int(n)    => Number::Int(*n),
            NbtTag::Long(n)   => Number::Long(*n),
            NbtTag::Float(n)  => Number::Float(*n),
            NbtTag::Double(n) => Number::Double(*n),
            other => return Err(OpsError::NotANumber(other.tag_name())),
        })
    }

    fn get_string(&self, input: &NbtTag) -> Result<String, OpsError> {
        match input {
            NbtTag::String(s) => Ok(s.clone()),
            other             => Err(OpsError::NotAString(other.tag_name())),
        }
    }

    fn get_map_entries(&self, input: &NbtTag) -> Result<Vec<(String, NbtTag)>, OpsError> {
        match input {
            NbtTag::Compound(compound) => Ok(
                compound
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
            other => Err(OpsError::NotAMap(other.tag_name())),
        }
    }

    fn get_list(&self, input: &NbtTag) -> Result<Vec<NbtTag>, OpsError> {
        Ok(match input {
            NbtTag::List(list)       => list.iter_unwrapped().cloned().collect(),
            NbtTag::ByteArray(array) => array.iter().copied().map(NbtTag::Byte).collect(),
            NbtTag::IntArray(array)  => array.iter().copied().map(NbtTag::Int).collect(),
            NbtTag::LongArray(array) => array.iter().copied().map(NbtTag::Long).collect(),
            other => return Err(OpsError::NotAList(other.tag_name())),
        })
    }

    fn get_byte_array(&self, input: &NbtTag) -> Result<Vec<i8>, OpsError> {
        match input {
            NbtTag::ByteArray(array) => Ok(array.clone()),
            _ => self.get_list(input)?
                .iter()
                .map(|value| self.get_number(value).map(|n| n.as_i64() as i8))
                .collect(),
        }
    }

    fn get_int_array(&self, input: &NbtTag) -> Result<Vec<i32>, OpsError> {
        match input {
            NbtTag::IntArray(array) => Ok(array.clone()),
            _ => self.get_list(input)?
                .iter()
                .map(|value| self.get_number(value).map(|n| n.as_i64() as i32))
                .collect(),
        }
    }

    fn get_long_array(&self, input: &NbtTag) -> Result<Vec<i64>, OpsError> {
        match input {
            NbtTag::LongArray(array) => Ok(array.clone()),
            _ => self.get_list(input)?
                .iter()
                .map(|value| self.get_number(value).map(Number::as_i64))
                .collect(),
        }
    }

    fn merge_to_list(&self, list: &NbtTag, value: NbtTag) -> Result<NbtTag, OpsError> {
        let mismatch = |target: &NbtTag, value: &NbtTag| OpsError::MergeMismatch {
            target: target.tag_name(),
            value:  value.tag_name(),
        };

        Ok(match (list, value) {
            (NbtTag::End, value) => NbtTag::List(NbtList::from(vec![value])),
            (NbtTag::List(list), value) => {
                let mut merged = list.clone();
                merged.push(value);
                NbtTag::List(merged)
            }
            (NbtTag::ByteArray(array), NbtTag::Byte(n)) => {
                let mut merged = array.clone();
                merged.push(n);
                NbtTag::ByteArray(merged)
            }
            (NbtTag::IntArray(array), NbtTag::Int(n)) => {
                let mut merged = array.clone();
                merged.push(n);
                NbtTag::IntArray(merged)
            }
            (NbtTag::LongArray(array), NbtTag::Long(n)) => {
                let mut merged = array.clone();
                merged.push(n);
                NbtTag::LongArray(merged)
            }
            // An array receiving an element of another type degrades to a general list.
            (array @ (NbtTag::ByteArray(_) | NbtTag::IntArray(_) | NbtTag::LongArray(_)), value) => {
                let mut merged = NbtList::from(self.get_list(array)?);
                merged.push(value);
                NbtTag::List(merged)
            }
            (target, value) => return Err(mismatch(target, &value)),
        })
    }

    fn merge_to_map(&self, map: &NbtTag, key: &str, value: NbtTag) -> Result<NbtTag, OpsError> {
        let mut merged = match map {
            NbtTag::End                => NbtCompound::new(),
            NbtTag::Compound(compound) => compound.clone(),
            other => {
                return Err(OpsError::MergeMismatch {
                    target: other.tag_name(),
                    value:  value.tag_name(),
                });
            }
        };
        merged.insert(key, value);
        Ok(NbtTag::Compound(merged))
    }

    fn remove(&self, input: &NbtTag, key: &str) -> NbtTag {
        match input {
            NbtTag::Compound(compound) => NbtTag::Compound(
                compound
                    .iter()
                    .filter(|(entry_key, _)| entry_key.as_str() != key)
                    .map(|(entry_key, value)| (entry_key.clone(), value.clone()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn convert_to<O: DynamicOps>(&self, out: &O, input: &NbtTag) -> O::Value {
        match input {
            NbtTag::End              => out.empty(),
            NbtTag::Byte(n)          => out.create_byte(*n),
            NbtTag::Short(n)         => out.create_short(*n),
            NbtTag::Int(n)           => out.create_int(*n),
            NbtTag::Long(n)          => out.create_long(*n),
            NbtTag::Float(n)         => out.create_float(*n),
            NbtTag::Double(n)        => out.create_double(*n),
            NbtTag::String(s)        => out.create_string(s),
            NbtTag::ByteArray(array) => out.create_byte_array(array.clone()),
            NbtTag::IntArray(array)  => out.create_int_array(array.clone()),
            NbtTag::LongArray(array) => out.create_long_array(array.clone()),
            NbtTag::List(_)          => self.convert_list(out, input),
            NbtTag::Compound(_)      => self.convert_map(out, input),
        }
    }
}
