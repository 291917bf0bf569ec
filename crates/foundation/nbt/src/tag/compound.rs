use std::{borrow::Borrow, hash::Hash, ops::Index};
use std::fmt::Display;
use std::hash::{DefaultHasher, Hasher};

use crate::print;
use crate::repr::{NbtReprError, NbtStructureError};
use crate::settings::{SnbtParseOptions, SnbtWriteOptions};
use crate::snbt::{self, SnbtError};

use super::{size, Map, NbtTag};


/// An NBT compound: a map from string keys to tags.
///
/// Keys are unique, and inserting under an existing key replaces its value. With the
/// `preserve_order` feature, iteration follows insertion order; equality ignores order either
/// way. Printers sort keys, so nothing observable depends on map order.
#[repr(transparent)]
#[derive(Clone, PartialEq)]
pub struct NbtCompound(pub(crate) Map<NbtTag>);

impl NbtCompound {
    #[inline]
    pub fn new() -> Self {
        Self(Map::default())
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Map::with_capacity_and_hasher(capacity, Default::default()))
    }

    #[inline]
    pub fn inner(&self) -> &Map<NbtTag> {
        &self.0
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut Map<NbtTag> {
        &mut self.0
    }

    #[inline]
    pub fn into_inner(self) -> Map<NbtTag> {
        self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up `key` and converts its tag into `T`, such as `i32` or `&NbtList`.
    pub fn get<'a, K, T>(&'a self, key: &K) -> Result<T, NbtReprError>
    where
        String: Borrow<K>,
        K: Hash + Eq + Display + ?Sized,
        T: TryFrom<&'a NbtTag>,
        T::Error: Into<anyhow::Error>,
    {
        let tag = self.0
            .get(key)
            .ok_or_else(|| NbtStructureError::missing_tag(key.to_string()))?;
        T::try_from(tag).map_err(NbtReprError::from_any)
    }

    /// Looks up `key` and converts its tag into `T`, such as `&mut NbtCompound`.
    pub fn get_mut<'a, K, T>(&'a mut self, key: &K) -> Result<T, NbtReprError>
    where
        String: Borrow<K>,
        K: Hash + Eq + Display + ?Sized,
        T: TryFrom<&'a mut NbtTag>,
        T::Error: Into<anyhow::Error>,
    {
        let tag = self.0
            .get_mut(key)
            .ok_or_else(|| NbtStructureError::missing_tag(key.to_string()))?;
        T::try_from(tag).map_err(NbtReprError::from_any)
    }

    #[inline]
    pub fn get_tag<K>(&self, key: &K) -> Option<&NbtTag>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        self.0.get(key)
    }

    #[inline]
    pub fn get_tag_mut<K>(&mut self, key: &K) -> Option<&mut NbtTag>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        self.0.get_mut(key)
    }

    #[inline]
    pub fn contains_key<K>(&self, key: &K) -> bool
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        self.0.contains_key(key)
    }

    /// Stores `value` under `key`, returning the value it replaced.
    #[inline]
    pub fn insert<K: Into<String>, T: Into<NbtTag>>(&mut self, key: K, value: T) -> Option<NbtTag> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes the entry for `key`, keeping the order of the other entries.
    #[inline]
    pub fn remove<K>(&mut self, key: &K) -> Option<NbtTag>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "preserve_order")]
        {
            self.0.shift_remove(key)
        }
        #[cfg(not(feature = "preserve_order"))]
        {
            self.0.remove(key)
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The keys in lexicographic order, as used by every printer.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        keys
    }

    #[inline]
    pub fn iter(&self) -> <&Map<NbtTag> as IntoIterator>::IntoIter {
        self.0.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> <&mut Map<NbtTag> as IntoIterator>::IntoIter {
        self.0.iter_mut()
    }

    /// Deep-merges `other` into `self`.
    ///
    /// Where both sides hold a compound under the same key, the two are merged recursively;
    /// any other value in `other` overwrites (a copy of) itself into `self`.
    pub fn merge(&mut self, other: &Self) -> &mut Self {
        for (key, value) in &other.0 {
            if let NbtTag::Compound(incoming) = value {
                if let Some(NbtTag::Compound(existing)) = self.0.get_mut(key) {
                    existing.merge(incoming);
                    continue;
                }
            }
            self.0.insert(key.clone(), value.clone());
        }
        self
    }

    /// See [`NbtTag::size_in_bytes`].
    pub fn size_in_bytes(&self) -> u64 {
        self.0.iter().fold(size::COMPOUND, |total, (key, value)| {
            total + size::compound_entry(key) + value.size_in_bytes()
        })
    }

    #[inline]
    pub fn from_snbt(input: &str) -> Result<Self, SnbtError> {
        snbt::parse_compound(input, SnbtParseOptions::default())
    }

    #[inline]
    pub fn from_snbt_with_options(input: &str, opts: SnbtParseOptions) -> Result<Self, SnbtError> {
        snbt::parse_compound(input, opts)
    }

    #[inline]
    pub fn to_snbt(&self) -> String {
        print::compound_to_snbt(self, SnbtWriteOptions::default())
    }

    #[inline]
    pub fn to_snbt_with_options(&self, opts: SnbtWriteOptions) -> String {
        print::compound_to_snbt(self, opts)
    }
}

impl Default for NbtCompound {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// Summing per-entry hashes makes the result independent of iteration order,
// matching the order-insensitive equality of the map.
impl Hash for NbtCompound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self.0.iter().fold(0_u64, |combined, (key, value)| {
            let mut entry_hasher = DefaultHasher::new();
            key.hash(&mut entry_hasher);
            value.hash(&mut entry_hasher);
            combined.wrapping_add(entry_hasher.finish())
        });
        state.write_usize(self.0.len());
        state.write_u64(combined);
    }
}

impl IntoIterator for NbtCompound {
    type IntoIter = <Map<NbtTag> as IntoIterator>::IntoIter;
    type Item = <Map<NbtTag> as IntoIterator>::Item;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NbtCompound {
    type IntoIter = <&'a Map<NbtTag> as IntoIterator>::IntoIter;
    type Item = <&'a Map<NbtTag> as IntoIterator>::Item;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, NbtTag)> for NbtCompound {
    #[inline]
    fn from_iter<T: IntoIterator<Item = (String, NbtTag)>>(iter: T) -> Self {
        Self(Map::from_iter(iter))
    }
}

impl Extend<(String, NbtTag)> for NbtCompound {
    #[inline]
    fn extend<T: IntoIterator<Item = (String, NbtTag)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<Q> Index<&Q> for NbtCompound
where
    String: Borrow<Q>,
    Q: Eq + Hash + ?Sized,
{
    type Output = NbtTag;

    #[inline]
    fn index(&self, key: &Q) -> &NbtTag {
        &self.0[key]
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::NbtList;
    use super::*;

    #[test]
    fn insert_replaces_and_returns_old() {
        let mut compound = NbtCompound::new();
        assert!(compound.insert("a", 1_i32).is_none());
        assert_eq!(compound.insert("a", 2_i32), Some(NbtTag::Int(1)));
        assert_eq!(compound.len(), 1);
        assert_eq!(compound.get::<_, i32>("a").unwrap(), 2);
    }

    #[test]
    fn typed_lookup_errors() {
        let mut compound = NbtCompound::new();
        compound.insert("a", 1_i8);

        let missing = compound.get::<_, i8>("b").unwrap_err();
        assert_eq!(missing.as_structure(), Some(&NbtStructureError::missing_tag("b")));

        let wrong = compound.get::<_, &str>("a").unwrap_err();
        assert_eq!(
            wrong.as_structure(),
            Some(&NbtStructureError::type_mismatch("String", "Byte")),
        );
    }

    #[test]
    fn remove_and_sorted_keys() {
        let mut compound = NbtCompound::new();
        compound.insert("b", 1_i8);
        compound.insert("c", 2_i8);
        compound.insert("a", 3_i8);
        assert_eq!(compound.sorted_keys(), ["a", "b", "c"]);

        assert_eq!(compound.remove("c"), Some(NbtTag::Byte(2)));
        assert!(!compound.contains_key("c"));
        assert_eq!(compound["a"], NbtTag::Byte(3));
    }

    #[test]
    fn merge_is_deep() {
        let mut target = NbtCompound::from_snbt("{a:1,b:{x:1,y:2}}").unwrap();
        let source = NbtCompound::from_snbt("{b:{y:3,z:4},c:5}").unwrap();
        target.merge(&source);

        let expected = NbtCompound::from_snbt("{a:1,b:{x:1,y:3,z:4},c:5}").unwrap();
        assert_eq!(target, expected);
    }

    #[test]
    fn merge_replaces_non_compounds() {
        let mut target = NbtCompound::from_snbt("{a:{x:1},b:[1,2]}").unwrap();
        let source = NbtCompound::from_snbt("{a:7,b:[3]}").unwrap();
        target.merge(&source);

        assert_eq!(target.get_tag("a"), Some(&NbtTag::Int(7)));
        let list: &NbtList = target.get("b").unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn merged_source_stays_independent() {
        let mut target = NbtCompound::new();
        let mut source = NbtCompound::from_snbt("{inner:{v:1}}").unwrap();
        target.merge(&source);

        source.get_mut::<_, &mut NbtCompound>("inner").unwrap().insert("v", 2);
        let inner: &NbtCompound = target.get("inner").unwrap();
        assert_eq!(inner.get::<_, i32>("v").unwrap(), 1);
    }
}
