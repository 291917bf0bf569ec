use std::fmt::{self, Debug, Display, Formatter};

use crate::settings::SnbtWriteOptions;
use crate::tag::{NbtCompound, NbtList, NbtTag};
use super::{depth_limit_placeholder, key_to_snbt, number_parts, quote_string};


/// Formats a tag as compact SNBT. `current_depth` is the depth of `tag` itself.
fn write_tag(
    f:             &mut Formatter<'_>,
    tag:           &NbtTag,
    current_depth: u32,
    opts:          SnbtWriteOptions,
) -> fmt::Result {
    if let Some((digits, suffix)) = number_parts(tag, opts.non_finite) {
        return write!(f, "{digits}{suffix}");
    }

    match tag {
        NbtTag::End               => f.write_str("END"),
        NbtTag::String(string)    => f.write_str(&quote_string(string)),
        NbtTag::ByteArray(array)  => write_array(f, "B", array, "B"),
        NbtTag::IntArray(array)   => write_array(f, "I", array, ""),
        NbtTag::LongArray(array)  => write_array(f, "L", array, "L"),
        NbtTag::List(_) | NbtTag::Compound(_) if current_depth >= opts.depth_limit.limit() => {
            f.write_str(&depth_limit_placeholder(opts.depth_limit.limit(), tag.tag_name()))
        }
        NbtTag::List(list)         => write_list(f, list, current_depth, opts),
        NbtTag::Compound(compound) => write_compound(f, compound, current_depth, opts),
        // Numbers were handled above
        _ => Ok(()),
    }
}

fn write_array<D: Display>(
    f:      &mut Formatter<'_>,
    header: &str,
    array:  &[D],
    suffix: &str,
) -> fmt::Result {
    write!(f, "[{header};")?;
    for (index, element) in array.iter().enumerate() {
        if index != 0 {
            f.write_str(",")?;
        }
        write!(f, "{element}{suffix}")?;
    }
    f.write_str("]")
}

fn write_list(
    f:             &mut Formatter<'_>,
    list:          &NbtList,
    current_depth: u32,
    opts:          SnbtWriteOptions,
) -> fmt::Result {
    f.write_str("[")?;
    for (index, element) in list.iter().enumerate() {
        if index != 0 {
            f.write_str(",")?;
        }
        // The elements are one level deeper than the list.
        write_tag(f, element, current_depth + 1, opts)?;
    }
    f.write_str("]")
}

fn write_compound(
    f:             &mut Formatter<'_>,
    compound:      &NbtCompound,
    current_depth: u32,
    opts:          SnbtWriteOptions,
) -> fmt::Result {
    f.write_str("{")?;
    for (index, key) in compound.sorted_keys().into_iter().enumerate() {
        if index != 0 {
            f.write_str(",")?;
        }
        write!(f, "{}:", key_to_snbt(key))?;
        if let Some(value) = compound.get_tag(key) {
            write_tag(f, value, current_depth + 1, opts)?;
        }
    }
    f.write_str("}")
}

trait WriteCompact {
    fn write_compact(&self, f: &mut Formatter<'_>, opts: SnbtWriteOptions) -> fmt::Result;
}

impl WriteCompact for NbtTag {
    #[inline]
    fn write_compact(&self, f: &mut Formatter<'_>, opts: SnbtWriteOptions) -> fmt::Result {
        write_tag(f, self, 0, opts)
    }
}

impl WriteCompact for NbtList {
    fn write_compact(&self, f: &mut Formatter<'_>, opts: SnbtWriteOptions) -> fmt::Result {
        if opts.depth_limit.limit() == 0 {
            return f.write_str(&depth_limit_placeholder(0, "List"));
        }
        write_list(f, self, 0, opts)
    }
}

impl WriteCompact for NbtCompound {
    fn write_compact(&self, f: &mut Formatter<'_>, opts: SnbtWriteOptions) -> fmt::Result {
        if opts.depth_limit.limit() == 0 {
            return f.write_str(&depth_limit_placeholder(0, "Compound"));
        }
        write_compound(f, self, 0, opts)
    }
}

macro_rules! display_and_debug {
    ($tag:ty, $name:ident) => {
        impl Display for $tag {
            #[inline]
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.write_compact(f, SnbtWriteOptions::default())
            }
        }

        impl Debug for $tag {
            #[inline]
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.write_compact(f, SnbtWriteOptions::default())
            }
        }

        #[doc = concat!("Formats a borrowed [`", stringify!($tag), "`] as compact SNBT with the given options.")]
        pub struct $name<'a> {
            tag:  &'a $tag,
            opts: SnbtWriteOptions,
        }

        impl<'a> $name<'a> {
            #[inline]
            pub fn new(tag: &'a $tag, opts: SnbtWriteOptions) -> Self {
                Self { tag, opts }
            }
        }

        impl Display for $name<'_> {
            #[inline]
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.tag.write_compact(f, self.opts)
            }
        }

        impl Debug for $name<'_> {
            #[inline]
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.tag.write_compact(f, self.opts)
            }
        }
    };
}

display_and_debug!(NbtTag,      TagWithOptions);
display_and_debug!(NbtList,     ListWithOptions);
display_and_debug!(NbtCompound, CompoundWithOptions);


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::DepthLimit;
    use crate::settings::WriteNonFinite;
    use super::*;

    #[test]
    fn scalars() {
        assert_eq!(NbtTag::Byte(1).to_snbt(), "1b");
        assert_eq!(NbtTag::Short(-2).to_snbt(), "-2s");
        assert_eq!(NbtTag::Int(3).to_snbt(), "3");
        assert_eq!(NbtTag::Long(4).to_snbt(), "4L");
        assert_eq!(NbtTag::Float(1.5).to_snbt(), "1.5f");
        assert_eq!(NbtTag::Double(0.1).to_snbt(), "0.1d");
        assert_eq!(NbtTag::String("a b".to_owned()).to_snbt(), "\"a b\"");
    }

    #[test]
    fn containers() {
        let tag = NbtTag::from_snbt("{z:[1,2],a:{c:[B;1b,-1b],b:[L;5L]},m:[I;]}").unwrap();
        assert_eq!(tag.to_snbt(), "{a:{b:[L;5L],c:[B;1B,-1B]},m:[I;],z:[1,2]}");
        assert_eq!(format!("{tag}"), tag.to_snbt());
        assert_eq!(format!("{tag:?}"), tag.to_snbt());

        let NbtTag::Compound(compound) = &tag else {
            panic!("expected a compound");
        };
        assert_eq!(compound.to_snbt(), tag.to_snbt());
        assert_eq!(NbtTag::List(NbtList::new()).to_snbt(), "[]");
    }

    #[test]
    fn quoted_keys() {
        let mut compound = NbtCompound::new();
        compound.insert("minecraft:id", 1);
        compound.insert("", 2);
        assert_eq!(compound.to_snbt(), "{\"\":2,\"minecraft:id\":1}");
    }

    #[test]
    fn non_finite() {
        let tag = NbtTag::Double(f64::NEG_INFINITY);
        assert_eq!(tag.to_snbt(), format!("{:?}d", f64::MIN));

        let opts = SnbtWriteOptions {
            non_finite: WriteNonFinite::PrintStrings,
            ..SnbtWriteOptions::default()
        };
        assert_eq!(tag.to_snbt_with_options(opts), "-Infinityd");
        assert_eq!(NbtTag::Float(f32::NAN).to_snbt_with_options(opts), "NaNf");
    }

    #[test]
    fn containers_past_depth_limit() {
        let tag = NbtTag::from_snbt("[[[1]]]").unwrap();
        let opts = SnbtWriteOptions {
            depth_limit: DepthLimit::new(2),
            ..SnbtWriteOptions::default()
        };
        assert_eq!(
            tag.to_snbt_with_options(opts),
            "[[\"Depth limit of 2 reached; could not print List tag\"]]",
        );
    }
}
