use crate::settings::{PrettyOptions, WriteNonFinite};
use crate::tag::{NbtCompound, NbtList, NbtTag};
use super::{depth_limit_placeholder, key_to_snbt, number_parts, quote_string};


/// Compound keys printed first, in this order, for compounds at the given path. Any other keys
/// follow in sorted order. These are the well-known fields of structure templates.
const KEY_ORDER: &[(&str, &[&str])] = &[
    ("{}", &["DataVersion", "author", "size", "data", "entities", "palette", "palettes"]),
    ("{}.data.[].{}", &["pos", "state", "nbt"]),
    ("{}.entities.[].{}", &["blockPos", "pos"]),
];

/// Containers at these paths, and everything inside them, are printed on one line.
const INLINE_PATHS: &[&str] = &[
    "{}.size.[]",
    "{}.data.[].{}",
    "{}.palette.[].{}",
    "{}.entities.[].{}",
];

/// Prints NBT as indented, multi-line SNBT that the grammar reads back.
///
/// Paths name containers from the root: `{}` for a compound and `[]` for a list, joined with
/// compound keys by `.`, so the compounds in the `data` list of a root compound are at
/// `{}.data.[].{}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettyPrinter {
    opts: PrettyOptions,
}

impl PrettyPrinter {
    #[inline]
    pub fn new(opts: PrettyOptions) -> Self {
        Self { opts }
    }

    pub fn print(&self, tag: &NbtTag) -> String {
        let mut out = String::new();
        let mut path = String::new();
        self.write_tag(&mut out, &mut path, tag, 0, false);
        out
    }

    fn write_tag(
        &self,
        out:    &mut String,
        path:   &mut String,
        tag:    &NbtTag,
        depth:  u32,
        inline: bool,
    ) {
        // Non-finite floats stay parsable
        if let Some((digits, suffix)) = number_parts(tag, WriteNonFinite::PrintFloats) {
            out.push_str(&digits);
            out.push_str(suffix);
            return;
        }

        let limit = self.opts.depth_limit.limit();
        match tag {
            NbtTag::End              => out.push_str("END"),
            NbtTag::String(string)   => out.push_str(&quote_string(string)),
            NbtTag::ByteArray(array) => write_array(out, "B", array, |n| {
                if self.opts.raw_arrays { format!("0x{:02X}ub", *n as u8) } else { format!("{n}B") }
            }),
            NbtTag::IntArray(array) => write_array(out, "I", array, |n| {
                if self.opts.raw_arrays { format!("0x{:08X}ui", *n as u32) } else { n.to_string() }
            }),
            NbtTag::LongArray(array) => write_array(out, "L", array, |n| {
                if self.opts.raw_arrays { format!("0x{:016X}uL", *n as u64) } else { format!("{n}L") }
            }),
            NbtTag::List(_) | NbtTag::Compound(_) if depth >= limit => {
                out.push_str(&depth_limit_placeholder(limit, tag.tag_name()));
            }
            NbtTag::List(list) => {
                let path_len = enter(path, "[]");
                let inline = inline || INLINE_PATHS.contains(&path.as_str());
                self.write_list(out, path, list, depth, inline);
                path.truncate(path_len);
            }
            NbtTag::Compound(compound) => {
                let path_len = enter(path, "{}");
                let inline = inline || INLINE_PATHS.contains(&path.as_str());
                self.write_compound(out, path, compound, depth, inline);
                path.truncate(path_len);
            }
            // Numbers were handled above
            _ => {}
        }
    }

    fn write_list(&self, out: &mut String, path: &mut String, list: &NbtList, depth: u32, inline: bool) {
        if list.is_empty() {
            out.push_str("[]");
            return;
        }

        out.push('[');
        for (index, element) in list.iter().enumerate() {
            self.separator(out, index, depth + 1, inline);
            self.write_tag(out, path, element, depth + 1, inline);
        }
        self.close(out, ']', depth, inline);
    }

    fn write_compound(
        &self,
        out:      &mut String,
        path:     &mut String,
        compound: &NbtCompound,
        depth:    u32,
        inline:   bool,
    ) {
        if compound.is_empty() {
            out.push_str("{}");
            return;
        }

        out.push('{');
        for (index, key) in ordered_keys(compound, path).into_iter().enumerate() {
            self.separator(out, index, depth + 1, inline);
            out.push_str(&key_to_snbt(key));
            out.push_str(": ");

            if let Some(value) = compound.get_tag(key) {
                let path_len = path.len();
                path.push('.');
                path.push_str(key);
                self.write_tag(out, path, value, depth + 1, inline);
                path.truncate(path_len);
            }
        }
        self.close(out, '}', depth, inline);
    }

    /// Writes whatever precedes the element at `index` of a container.
    fn separator(&self, out: &mut String, index: usize, element_depth: u32, inline: bool) {
        if inline {
            if index != 0 {
                out.push_str(", ");
            }
        } else {
            out.push_str(if index == 0 { "\n" } else { ",\n" });
            self.indent(out, element_depth);
        }
    }

    fn close(&self, out: &mut String, bracket: char, depth: u32, inline: bool) {
        if !inline {
            out.push('\n');
            self.indent(out, depth);
        }
        out.push(bracket);
    }

    fn indent(&self, out: &mut String, depth: u32) {
        for _ in 0..depth {
            out.push_str(&self.opts.indent);
        }
    }
}

impl Default for PrettyPrinter {
    #[inline]
    fn default() -> Self {
        Self::new(PrettyOptions::default())
    }
}

fn write_array<T, F>(out: &mut String, header: &str, array: &[T], element: F)
where
    F: Fn(&T) -> String,
{
    out.push('[');
    out.push_str(header);
    out.push(';');
    for (index, n) in array.iter().enumerate() {
        out.push_str(if index == 0 { " " } else { ", " });
        out.push_str(&element(n));
    }
    out.push(']');
}

/// Appends a container marker to `path`, returning the length to truncate back to.
fn enter(path: &mut String, marker: &str) -> usize {
    let path_len = path.len();
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(marker);
    path_len
}

fn ordered_keys<'a>(compound: &'a NbtCompound, path: &str) -> Vec<&'a str> {
    let mut keys = compound.sorted_keys();
    if let Some((_, order)) = KEY_ORDER.iter().find(|(known, _)| *known == path) {
        // The sort is stable, so the remaining keys stay sorted.
        keys.sort_by_key(|key| {
            order.iter().position(|known| known == key).unwrap_or(order.len())
        });
    }
    keys
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pretty(snbt: &str) -> String {
        NbtTag::from_snbt(snbt).unwrap().to_pretty_snbt()
    }

    #[test]
    fn layout() {
        assert_eq!(
            pretty("{b:[1b,2b],a:1,c:[I;1,2],d:{},e:[],f:'x'}"),
            "{\n    a: 1,\n    b: [\n        1b,\n        2b\n    ],\n    c: [I; 1, 2],\n    \
            d: {},\n    e: [],\n    f: \"x\"\n}",
        );
        assert_eq!(pretty("5s"), "5s");
        assert_eq!(pretty("[B;]"), "[B;]");
    }

    #[test]
    fn custom_indent() {
        let printer = PrettyPrinter::new(PrettyOptions {
            indent: "\t".to_owned(),
            ..PrettyOptions::default()
        });
        let tag = NbtTag::from_snbt("{a:{b:1}}").unwrap();
        assert_eq!(printer.print(&tag), "{\n\ta: {\n\t\tb: 1\n\t}\n}");
    }

    #[test]
    fn structure_template_order() {
        let tag = NbtTag::from_snbt(
            "{zeta:1,size:[1,2,3],palette:[{Name:'stone'}],DataVersion:3465,author:'me',\
            data:[{state:0,nbt:{},pos:[0,0,0]}]}",
        )
        .unwrap();

        assert_eq!(
            PrettyPrinter::default().print(&tag),
            "{\n    DataVersion: 3465,\n    author: \"me\",\n    size: [1, 2, 3],\n    \
            data: [\n        {pos: [0, 0, 0], state: 0, nbt: {}}\n    ],\n    \
            palette: [\n        {Name: \"stone\"}\n    ],\n    zeta: 1\n}",
        );
    }

    #[test]
    fn raw_arrays() {
        let printer = PrettyPrinter::new(PrettyOptions {
            raw_arrays: true,
            ..PrettyOptions::default()
        });
        let tag = NbtTag::from_snbt("{b:[B;-1b,1b],i:[I;-1],l:[L;1L]}").unwrap();

        let printed = printer.print(&tag);
        assert_eq!(
            printed,
            "{\n    b: [B; 0xFFub, 0x01ub],\n    i: [I; 0xFFFFFFFFui],\n    \
            l: [L; 0x0000000000000001uL]\n}",
        );
        assert_eq!(NbtTag::from_snbt(&printed).unwrap(), tag);
    }

    #[test]
    fn parses_back() {
        let tag = NbtTag::from_snbt(
            "{list:[[1,2],[3]],mixed:[1b,'a',{b:[]}],f:1e-7f,s:'line\\nbreak',n:{m:{o:[L;]}}}",
        )
        .unwrap();
        assert_eq!(NbtTag::from_snbt(&tag.to_pretty_snbt()).unwrap(), tag);
    }
}
