use std::io::Read;

use crate::{accounter::NbtAccounter, tag::NbtType};
use crate::io::{self, NbtIoError};
use crate::stream::{self, StreamTagVisitor, ValueResult};
use crate::tag::{size, NbtTag};


/// The descriptor for the payload of one tag ID, as found in binary data.
///
/// IDs 0 through 12 describe a tag variant. Any other ID yields [`TagType::Invalid`], whose
/// every operation fails with [`NbtIoError::InvalidTagId`] and which never decodes anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    Known(NbtType),
    Invalid(u8),
}

impl TagType {
    #[inline]
    pub const fn from_id(id: u8) -> Self {
        match NbtType::from_id(id) {
            Some(nbt_type) => Self::Known(nbt_type),
            None           => Self::Invalid(id),
        }
    }

    #[inline]
    pub const fn id(self) -> u8 {
        match self {
            Self::Known(nbt_type) => nbt_type.id(),
            Self::Invalid(id)     => id,
        }
    }

    /// The diagnostic name of the tag type, or `INVALID` for an unknown ID.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Known(nbt_type) => nbt_type.name(),
            Self::Invalid(_)      => "INVALID",
        }
    }

    /// The constant accounted size of a value of this type, if it has one.
    /// Strings, arrays, lists and compounds compute their size from their contents.
    pub const fn fixed_size(self) -> Option<u64> {
        match self {
            Self::Known(NbtType::End)    => Some(size::END),
            Self::Known(NbtType::Byte)   => Some(size::BYTE),
            Self::Known(NbtType::Short)  => Some(size::SHORT),
            Self::Known(NbtType::Int)    => Some(size::INT),
            Self::Known(NbtType::Long)   => Some(size::LONG),
            Self::Known(NbtType::Float)  => Some(size::FLOAT),
            Self::Known(NbtType::Double) => Some(size::DOUBLE),
            _ => None,
        }
    }

    /// The number of payload bytes a value of this type occupies, if it is constant.
    pub(crate) const fn wire_width(self) -> Option<u64> {
        match self {
            Self::Known(NbtType::End)                       => Some(0),
            Self::Known(NbtType::Byte)                      => Some(1),
            Self::Known(NbtType::Short)                     => Some(2),
            Self::Known(NbtType::Int | NbtType::Float)      => Some(4),
            Self::Known(NbtType::Long | NbtType::Double)    => Some(8),
            _ => None,
        }
    }

    #[inline]
    fn known(self) -> Result<NbtType, NbtIoError> {
        match self {
            Self::Known(nbt_type) => Ok(nbt_type),
            Self::Invalid(id)     => Err(NbtIoError::InvalidTagId(id)),
        }
    }

    /// Decodes one payload of this type into a tree.
    #[inline]
    pub fn load<R: Read>(
        self,
        reader:    &mut R,
        accounter: &mut NbtAccounter,
    ) -> Result<NbtTag, NbtIoError> {
        io::load_payload(reader, self.known()?, accounter)
    }

    /// Consumes one payload of this type without building anything.
    #[inline]
    pub fn skip<R: Read>(
        self,
        reader:    &mut R,
        accounter: &mut NbtAccounter,
    ) -> Result<(), NbtIoError> {
        io::skip_payload(reader, self.known()?, accounter)
    }

    /// Consumes `count` consecutive payloads of this type, as found in the body of a list.
    pub fn skip_n<R: Read>(
        self,
        reader:    &mut R,
        count:     usize,
        accounter: &mut NbtAccounter,
    ) -> Result<(), NbtIoError> {
        if count == 0 {
            return Ok(());
        }
        let nbt_type = self.known()?;
        match self.wire_width() {
            Some(width) => crate::raw::skip_bytes(reader, width.saturating_mul(count as u64)),
            None => (0..count).try_for_each(|_| io::skip_payload(reader, nbt_type, accounter)),
        }
    }

    /// Streams one payload of this type into `visitor`.
    #[inline]
    pub fn parse<R: Read, V: StreamTagVisitor + ?Sized>(
        self,
        reader:    &mut R,
        visitor:   &mut V,
        accounter: &mut NbtAccounter,
    ) -> Result<ValueResult, NbtIoError> {
        stream::parse_payload(reader, self.known()?, visitor, accounter)
    }
}

impl From<NbtType> for TagType {
    #[inline]
    fn from(nbt_type: NbtType) -> Self {
        Self::Known(nbt_type)
    }
}


#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn invalid_descriptor_never_decodes() {
        let invalid = TagType::from_id(13);
        assert_eq!(invalid, TagType::Invalid(13));
        assert_eq!(invalid.id(), 13);

        let mut accounter = NbtAccounter::unlimited();
        let mut reader = Cursor::new(vec![0_u8; 16]);
        let err = invalid.load(&mut reader, &mut accounter).unwrap_err();
        assert!(matches!(err, NbtIoError::InvalidTagId(13)), "{err:?}");
        assert!(invalid.skip(&mut reader, &mut accounter).is_err());
        assert!(invalid.skip_n(&mut reader, 2, &mut accounter).is_err());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn fixed_sizes() {
        assert_eq!(TagType::from_id(1).fixed_size(), Some(9));
        assert_eq!(TagType::from_id(6).fixed_size(), Some(16));
        assert_eq!(TagType::from_id(8).fixed_size(), None);
        assert_eq!(TagType::from_id(10).name(), "TAG_Compound");
    }

    #[test]
    fn bulk_skip_of_fixed_width() {
        let mut reader = Cursor::new(vec![0_u8; 20]);
        let mut accounter = NbtAccounter::unlimited();
        TagType::from_id(3).skip_n(&mut reader, 3, &mut accounter).unwrap();
        assert_eq!(reader.position(), 12);
        assert!(TagType::from_id(4).skip_n(&mut reader, 2, &mut accounter).is_err());
    }

    #[test]
    fn load_charges_fixed_size() {
        let mut reader = Cursor::new(7_i16.to_be_bytes().to_vec());
        let mut accounter = NbtAccounter::new(100);
        let tag = TagType::from_id(2).load(&mut reader, &mut accounter).unwrap();
        assert_eq!(tag, NbtTag::Short(7));
        assert_eq!(accounter.usage(), 10);
    }
}
