//! The builtin operations callable as `name(args...)` in SNBT.

use tagtree_util::hex_chars_to_u32;

use crate::ops::DynamicOps;
use super::SnbtError;


/// The builtin operations, looked up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    /// `bool(x)`: the byte `1` if the number `x` is nonzero, else `0`.
    Bool,
    /// `uuid(str)`: the four big-endian ints of a UUID string, as an int array.
    Uuid,
}

impl Builtin {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "uuid" => Some(Self::Uuid),
            _      => None,
        }
    }

    /// Applies the operation to already-parsed arguments. `index` is where the call starts,
    /// and is used for errors.
    pub(crate) fn apply<O: DynamicOps>(
        self,
        ops:   &O,
        input: &str,
        index: usize,
        args:  &[O::Value],
    ) -> Result<O::Value, SnbtError> {
        let [arg] = args else {
            return Err(SnbtError::invalid_builtin_argument(input, index, "expected exactly one argument"));
        };

        match self {
            Self::Bool => ops
                .get_bool(arg)
                .map(|value| ops.create_bool(value))
                .map_err(|_| SnbtError::invalid_builtin_argument(input, index, "expected a number")),
            Self::Uuid => {
                let uuid = ops
                    .get_string(arg)
                    .map_err(|_| SnbtError::invalid_builtin_argument(input, index, "expected a string"))?;
                let ints = parse_uuid(&uuid)
                    .ok_or_else(|| SnbtError::invalid_builtin_argument(input, index, "invalid UUID"))?;
                Ok(ops.create_int_array(ints.to_vec()))
            }
        }
    }
}

/// Parses a UUID in either the hyphenated `8-4-4-4-12` form or as 32 plain hex digits, into
/// four ints holding its most significant bits first.
pub(crate) fn parse_uuid(uuid: &str) -> Option<[i32; 4]> {
    let chars: Vec<char> = uuid.chars().take(37).collect();

    let digits: Vec<char> = match chars.len() {
        36 => {
            if [8, 13, 18, 23].iter().any(|&hyphen| chars[hyphen] != '-') {
                return None;
            }
            chars.into_iter().filter(|&c| c != '-').collect()
        }
        32 => chars,
        _  => return None,
    };
    if digits.len() != 32 {
        return None;
    }

    let mut ints = [0; 4];
    for (int, group) in ints.iter_mut().zip(digits.chunks_exact(8)) {
        // The bits are reinterpreted as signed.
        *int = hex_chars_to_u32(group)? as i32;
    }
    Some(ints)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_uuid() {
        assert_eq!(
            parse_uuid("f81d4fae-7dec-11d0-a765-00a0c91e6bf6"),
            Some([0xf81d4fae_u32 as i32, 0x7dec11d0, 0xa76500a0_u32 as i32, 0xc91e6bf6_u32 as i32]),
        );
    }

    #[test]
    fn plain_uuid() {
        assert_eq!(
            parse_uuid("0000000100000002000000030000000F"),
            Some([1, 2, 3, 15]),
        );
    }

    #[test]
    fn malformed_uuids() {
        assert_eq!(parse_uuid("f81d4fae-7dec-11d0-a765-00a0c91e6bf"), None);
        assert_eq!(parse_uuid("f81d4fae+7dec-11d0-a765-00a0c91e6bf6"), None);
        assert_eq!(parse_uuid("g81d4fae-7dec-11d0-a765-00a0c91e6bf6"), None);
        // A hyphen in the wrong place leaves the wrong number of digits
        assert_eq!(parse_uuid("f81d4fae-7dec-11d0-a765-00a0c91e6b-f"), None);
        assert_eq!(parse_uuid(""), None);
    }
}
