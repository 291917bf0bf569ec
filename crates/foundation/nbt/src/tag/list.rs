use std::ops::{Deref, DerefMut};

use crate::print;
use crate::repr::{NbtReprError, NbtStructureError};
use crate::settings::SnbtWriteOptions;

use super::{size, NbtCompound, NbtTag, NbtType};


/// An NBT list: an ordered sequence of tags.
///
/// Lists are normally homogeneous, but a list may hold elements of different types in memory.
/// Such a list is written as a list of compounds, each wrapping one element under the empty
/// key `""`, and comes back from binary data in that wrapped form. [`iter_unwrapped`] and
/// [`push_unwrapped`] translate between the two shapes.
///
/// [`iter_unwrapped`]: NbtList::iter_unwrapped
/// [`push_unwrapped`]: NbtList::push_unwrapped
#[repr(transparent)]
#[derive(Clone, PartialEq, Hash)]
pub struct NbtList(pub(crate) Vec<NbtTag>);

impl NbtList {
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut Vec<NbtTag> {
        &mut self.0
    }

    #[inline]
    pub fn into_inner(self) -> Vec<NbtTag> {
        self.0
    }

    /// Returns the element at `index` converted into `T`.
    pub fn get_as<'a, T>(&'a self, index: usize) -> Result<T, NbtReprError>
    where
        T: TryFrom<&'a NbtTag>,
        T::Error: Into<anyhow::Error>,
    {
        let tag = self.0
            .get(index)
            .ok_or_else(|| NbtStructureError::invalid_index(index, self.0.len()))?;
        T::try_from(tag).map_err(NbtReprError::from_any)
    }

    #[inline]
    pub fn push<T: Into<NbtTag>>(&mut self, value: T) {
        self.0.push(value.into());
    }

    /// Inserts `value` before `index`, which may equal the length of the list.
    pub fn insert<T: Into<NbtTag>>(&mut self, index: usize, value: T) -> Result<(), NbtStructureError> {
        if index > self.0.len() {
            return Err(NbtStructureError::invalid_index(index, self.0.len()));
        }
        self.0.insert(index, value.into());
        Ok(())
    }

    /// Replaces the element at `index`, returning the previous element.
    pub fn set<T: Into<NbtTag>>(&mut self, index: usize, value: T) -> Result<NbtTag, NbtStructureError> {
        let len = self.0.len();
        let slot = self.0
            .get_mut(index)
            .ok_or_else(|| NbtStructureError::invalid_index(index, len))?;
        Ok(std::mem::replace(slot, value.into()))
    }

    /// Removes the element at `index`, shifting later elements down.
    pub fn remove(&mut self, index: usize) -> Result<NbtTag, NbtStructureError> {
        if index < self.0.len() {
            Ok(self.0.remove(index))
        } else {
            Err(NbtStructureError::invalid_index(index, self.0.len()))
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// The type written as this list's element type: `End` for an empty list, the shared type
    /// of a homogeneous list, and `Compound` for a mixed one.
    pub fn element_type(&self) -> NbtType {
        let mut elements = self.0.iter();
        let Some(first) = elements.next() else {
            return NbtType::End;
        };
        let first = first.nbt_type();
        if elements.all(|tag| tag.nbt_type() == first) {
            first
        } else {
            NbtType::Compound
        }
    }

    /// Whether every element has the same type. Empty lists are homogeneous.
    pub fn is_homogeneous(&self) -> bool {
        match self.0.first() {
            Some(first) => {
                let first = first.nbt_type();
                self.0.iter().all(|tag| tag.nbt_type() == first)
            }
            None => true,
        }
    }

    /// Whether `tag` is a compound holding exactly one entry, keyed by `""`.
    pub fn is_wrapper(tag: &NbtTag) -> bool {
        match tag {
            NbtTag::Compound(compound) => compound.len() == 1 && compound.contains_key(""),
            _ => false,
        }
    }

    /// Wraps `value` into the single-entry compound used for elements of a mixed list.
    pub fn wrap_element(value: NbtTag) -> NbtCompound {
        let mut wrapper = NbtCompound::with_capacity(1);
        wrapper.insert("", value);
        wrapper
    }

    /// Returns the wrapped value if `tag` is a wrapper compound, otherwise `tag` itself.
    pub fn unwrap_element(tag: &NbtTag) -> &NbtTag {
        match tag {
            NbtTag::Compound(compound) if Self::is_wrapper(tag) => {
                compound.get_tag("").unwrap_or(tag)
            }
            _ => tag,
        }
    }

    /// Iterates over the elements, looking through wrapper compounds.
    pub fn iter_unwrapped(&self) -> impl Iterator<Item = &NbtTag> {
        self.0.iter().map(Self::unwrap_element)
    }

    /// Appends `tag`, replacing a wrapper compound by the value it wraps.
    pub fn push_unwrapped(&mut self, tag: NbtTag) {
        let tag = match tag {
            NbtTag::Compound(mut compound) if compound.len() == 1 => {
                match compound.remove("") {
                    Some(inner) => inner,
                    None        => NbtTag::Compound(compound),
                }
            }
            other => other,
        };
        self.0.push(tag);
    }

    /// See [`NbtTag::size_in_bytes`].
    pub fn size_in_bytes(&self) -> u64 {
        self.0.iter().fold(
            size::LIST + size::LIST_ELEMENT * self.0.len() as u64,
            |total, element| total + element.size_in_bytes(),
        )
    }

    #[inline]
    pub fn to_snbt(&self) -> String {
        print::list_to_snbt(self, SnbtWriteOptions::default())
    }

    #[inline]
    pub fn to_snbt_with_options(&self, opts: SnbtWriteOptions) -> String {
        print::list_to_snbt(self, opts)
    }
}

impl Default for NbtList {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Into<NbtTag>> From<Vec<T>> for NbtList {
    #[inline]
    fn from(list: Vec<T>) -> Self {
        Self(list.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for NbtList {
    type IntoIter = <Vec<NbtTag> as IntoIterator>::IntoIter;
    type Item = NbtTag;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NbtList {
    type IntoIter = std::slice::Iter<'a, NbtTag>;
    type Item = &'a NbtTag;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a mut NbtList {
    type IntoIter = std::slice::IterMut<'a, NbtTag>;
    type Item = &'a mut NbtTag;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

impl FromIterator<NbtTag> for NbtList {
    #[inline]
    fn from_iter<T: IntoIterator<Item = NbtTag>>(iter: T) -> Self {
        Self(Vec::from_iter(iter))
    }
}

impl Extend<NbtTag> for NbtList {
    #[inline]
    fn extend<T: IntoIterator<Item = NbtTag>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl Deref for NbtList {
    type Target = [NbtTag];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for NbtList {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn element_type() {
        assert_eq!(NbtList::new().element_type(), NbtType::End);

        let ints: NbtList = vec![1_i32, 2, 3].into();
        assert_eq!(ints.element_type(), NbtType::Int);
        assert!(ints.is_homogeneous());

        let mixed: NbtList = vec![NbtTag::Byte(1), NbtTag::Int(2)].into();
        assert_eq!(mixed.element_type(), NbtType::Compound);
        assert!(!mixed.is_homogeneous());
    }

    #[test]
    fn indexed_mutation() {
        let mut list: NbtList = vec![1_i32, 2].into();
        assert_eq!(list.set(1, 5_i32), Ok(NbtTag::Int(2)));
        assert!(list.insert(2, 6_i32).is_ok());
        assert_eq!(list.insert(9, 0_i32), Err(NbtStructureError::invalid_index(9, 3)));
        assert_eq!(list.remove(0), Ok(NbtTag::Int(1)));
        assert_eq!(list.remove(2), Err(NbtStructureError::invalid_index(2, 2)));
        assert_eq!(list.get_as::<i32>(1).unwrap(), 6);

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn unwrapping() {
        let mut list = NbtList::new();
        list.push(NbtList::wrap_element(NbtTag::Byte(1)));
        list.push(NbtList::wrap_element(NbtTag::Int(2)));
        assert!(NbtList::is_wrapper(&list[0]));

        let values: Vec<&NbtTag> = list.iter_unwrapped().collect();
        assert_eq!(values, [&NbtTag::Byte(1), &NbtTag::Int(2)]);

        let mut rebuilt = NbtList::new();
        for element in list {
            rebuilt.push_unwrapped(element);
        }
        assert_eq!(rebuilt, NbtList::from(vec![NbtTag::Byte(1), NbtTag::Int(2)]));
    }

    #[test]
    fn ordinary_compounds_are_not_wrappers() {
        let mut two_keys = NbtCompound::new();
        two_keys.insert("", 1_i8);
        two_keys.insert("x", 2_i8);
        let tag = NbtTag::Compound(two_keys);
        assert!(!NbtList::is_wrapper(&tag));
        assert_eq!(NbtList::unwrap_element(&tag), &tag);
    }
}
