use thiserror::Error;


/// The failure of a typed lookup into a compound or list, such as `compound.get::<i32>("x")`.
#[derive(Error, Debug)]
pub enum NbtReprError {
    /// The tree did not have the requested shape.
    #[error(transparent)]
    Structure(Box<NbtStructureError>),
    /// A conversion outside this crate rejected the tag.
    #[error(transparent)]
    Custom(anyhow::Error),
}

impl NbtReprError {
    /// Wraps any error. Structure errors (boxed or not) and representation errors are
    /// recovered by downcasting; every other error becomes `Custom`.
    pub fn from_any<E: Into<anyhow::Error>>(error: E) -> Self {
        let error: anyhow::Error = error.into();

        let error = match error.downcast::<Self>() {
            Ok(repr)   => return repr,
            Err(other) => other,
        };

        match error.downcast::<NbtStructureError>() {
            Ok(structure) => Self::Structure(Box::new(structure)),
            Err(other)    => Self::Custom(other),
        }
    }

    /// The structure error, if this is one.
    #[inline]
    pub fn as_structure(&self) -> Option<&NbtStructureError> {
        match self {
            Self::Structure(structure) => Some(structure),
            Self::Custom(_)            => None,
        }
    }
}

impl From<NbtStructureError> for NbtReprError {
    #[inline]
    fn from(error: NbtStructureError) -> Self {
        Self::Structure(Box::new(error))
    }
}

/// A conflict between the expected and actual structure of an NBT tag tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NbtStructureError {
    #[error("Missing tag \"{tag_name}\"")]
    MissingTag {
        tag_name: Box<str>,
    },
    #[error("Index out of range: {index} >= {length}")]
    InvalidIndex {
        index:  usize,
        length: usize,
    },
    #[error("Tag type mismatch: expected {expected} but found {found}")]
    TypeMismatch {
        expected: &'static str,
        found:    &'static str,
    },
}

impl NbtStructureError {
    #[inline]
    pub fn missing_tag<T: Into<String>>(tag_name: T) -> Self {
        Self::MissingTag {
            tag_name: tag_name.into().into_boxed_str(),
        }
    }

    #[inline]
    pub fn invalid_index(index: usize, length: usize) -> Self {
        Self::InvalidIndex { index, length }
    }

    #[inline]
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch { expected, found }
    }
}
