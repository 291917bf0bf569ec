use crate::settings::{StyledOptions, WriteNonFinite};
use crate::tag::{NbtCompound, NbtList, NbtTag};
use super::{key_to_snbt, number_parts, quote_string};


/// Containers nested deeper than this are folded into `{...}` or `[...]`.
const FOLD_DEPTH: u32 = 64;
/// Containers and arrays with more elements than this show only their first elements.
const MAX_ELEMENTS: usize = 128;

/// The kind of text in a [`StyledSegment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Brackets, separators, whitespace and the `END` placeholder.
    Plain,
    Key,
    /// A quoted string value.
    String,
    /// The digits of a number.
    Number,
    /// The type suffix of a number, such as the `b` in `1b`.
    NumberSuffix,
    /// A placeholder for content that was left out.
    Folded,
}

/// A run of text with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSegment {
    pub text:  String,
    pub style: Style,
}

/// Renders NBT as styled runs of text, for display.
///
/// Compound keys are sorted. Output is a single line unless an indent is configured. Very deep
/// or very long content is folded, so the output is not always valid SNBT.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledPrinter {
    opts: StyledOptions,
}

impl StyledPrinter {
    #[inline]
    pub fn new(opts: StyledOptions) -> Self {
        Self { opts }
    }

    /// Adjacent runs of the same style are merged.
    pub fn render(&self, tag: &NbtTag) -> Vec<StyledSegment> {
        let mut segments = Segments(Vec::new());
        self.write_tag(&mut segments, tag, 0);
        segments.0
    }

    /// The text of [`render`](Self::render) without styles.
    pub fn render_plain(&self, tag: &NbtTag) -> String {
        self.render(tag)
            .into_iter()
            .map(|segment| segment.text)
            .collect()
    }

    fn write_tag(&self, out: &mut Segments, tag: &NbtTag, depth: u32) {
        if let Some((digits, suffix)) = number_parts(tag, WriteNonFinite::PrintStrings) {
            out.push(&digits, Style::Number);
            out.push(suffix, Style::NumberSuffix);
            return;
        }

        match tag {
            NbtTag::End              => out.push("END", Style::Plain),
            NbtTag::String(string)   => out.push(&quote_string(string), Style::String),
            NbtTag::ByteArray(array) => write_array(out, "B", array, "B"),
            NbtTag::IntArray(array)  => write_array(out, "I", array, ""),
            NbtTag::LongArray(array) => write_array(out, "L", array, "L"),
            NbtTag::List(_) if depth > FOLD_DEPTH => out.push("[...]", Style::Folded),
            NbtTag::Compound(_) if depth > FOLD_DEPTH => out.push("{...}", Style::Folded),
            NbtTag::List(list)         => self.write_list(out, list, depth),
            NbtTag::Compound(compound) => self.write_compound(out, compound, depth),
            // Numbers were handled above
            _ => {}
        }
    }

    fn write_list(&self, out: &mut Segments, list: &NbtList, depth: u32) {
        if list.is_empty() {
            out.push("[]", Style::Plain);
            return;
        }

        out.push("[", Style::Plain);
        for (index, element) in list.iter().take(MAX_ELEMENTS).enumerate() {
            self.separator(out, index, depth + 1);
            self.write_tag(out, element, depth + 1);
        }
        if list.len() > MAX_ELEMENTS {
            self.separator(out, MAX_ELEMENTS, depth + 1);
            out.push("...", Style::Folded);
        }
        self.close(out, "]", depth);
    }

    fn write_compound(&self, out: &mut Segments, compound: &NbtCompound, depth: u32) {
        if compound.is_empty() {
            out.push("{}", Style::Plain);
            return;
        }

        out.push("{", Style::Plain);
        let keys = compound.sorted_keys();
        for (index, key) in keys.iter().take(MAX_ELEMENTS).enumerate() {
            self.separator(out, index, depth + 1);
            out.push(&key_to_snbt(key), Style::Key);
            out.push(": ", Style::Plain);
            if let Some(value) = compound.get_tag(*key) {
                self.write_tag(out, value, depth + 1);
            }
        }
        if keys.len() > MAX_ELEMENTS {
            self.separator(out, MAX_ELEMENTS, depth + 1);
            out.push("...", Style::Folded);
        }
        self.close(out, "}", depth);
    }

    fn separator(&self, out: &mut Segments, index: usize, element_depth: u32) {
        if self.opts.indent.is_empty() {
            if index != 0 {
                out.push(", ", Style::Plain);
            }
        } else {
            out.push(if index == 0 { "\n" } else { ",\n" }, Style::Plain);
            out.push(&self.opts.indent.repeat(element_depth as usize), Style::Plain);
        }
    }

    fn close(&self, out: &mut Segments, bracket: &str, depth: u32) {
        if !self.opts.indent.is_empty() {
            out.push("\n", Style::Plain);
            out.push(&self.opts.indent.repeat(depth as usize), Style::Plain);
        }
        out.push(bracket, Style::Plain);
    }
}

fn write_array<T: ToString>(out: &mut Segments, header: &str, array: &[T], suffix: &str) {
    out.push("[", Style::Plain);
    out.push(header, Style::Plain);
    out.push(";", Style::Plain);

    for (index, n) in array.iter().take(MAX_ELEMENTS).enumerate() {
        out.push(if index == 0 { " " } else { ", " }, Style::Plain);
        out.push(&n.to_string(), Style::Number);
        out.push(suffix, Style::NumberSuffix);
    }
    if array.len() > MAX_ELEMENTS {
        out.push(", ", Style::Plain);
        out.push("...", Style::Folded);
    }
    out.push("]", Style::Plain);
}

struct Segments(Vec<StyledSegment>);

impl Segments {
    fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        match self.0.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.0.push(StyledSegment {
                text: text.to_owned(),
                style,
            }),
        }
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn segment(text: &str, style: Style) -> StyledSegment {
        StyledSegment {
            text: text.to_owned(),
            style,
        }
    }

    #[test]
    fn styles() {
        let tag = NbtTag::from_snbt("{b:'x',a:1b,c:[I;2]}").unwrap();
        assert_eq!(
            StyledPrinter::default().render(&tag),
            vec![
                segment("{", Style::Plain),
                segment("a", Style::Key),
                segment(": ", Style::Plain),
                segment("1", Style::Number),
                segment("b", Style::NumberSuffix),
                segment(", ", Style::Plain),
                segment("b", Style::Key),
                segment(": ", Style::Plain),
                segment("\"x\"", Style::String),
                segment(", ", Style::Plain),
                segment("c", Style::Key),
                segment(": [I; ", Style::Plain),
                segment("2", Style::Number),
                segment("]}", Style::Plain),
            ],
        );
    }

    #[test]
    fn plain_text_is_the_concatenation() {
        let tag = NbtTag::from_snbt("{list:[1,2],nested:{x:1.5f}}").unwrap();
        let printer = StyledPrinter::default();
        let joined: String = printer
            .render(&tag)
            .iter()
            .map(|segment| segment.text.as_str())
            .collect();
        assert_eq!(joined, printer.render_plain(&tag));
        assert_eq!(joined, "{list: [1, 2], nested: {x: 1.5f}}");
    }

    #[test]
    fn indented() {
        let printer = StyledPrinter::new(StyledOptions { indent: "  ".to_owned() });
        let tag = NbtTag::from_snbt("{a:[1]}").unwrap();
        assert_eq!(printer.render_plain(&tag), "{\n  a: [\n    1\n  ]\n}");
    }

    #[test]
    fn deep_containers_fold() {
        let snbt = format!("{}{}", "[".repeat(70), "]".repeat(70));
        let tag = NbtTag::from_snbt(&snbt).unwrap();

        let rendered = StyledPrinter::default().render(&tag);
        assert!(rendered.contains(&segment("[...]", Style::Folded)));

        let expected = format!("{}[...]{}", "[".repeat(65), "]".repeat(65));
        assert_eq!(StyledPrinter::default().render_plain(&tag), expected);
    }

    #[test]
    fn long_containers_fold() {
        let tag = NbtTag::List((0..200).map(NbtTag::Int).collect());
        let plain = StyledPrinter::default().render_plain(&tag);
        assert!(plain.ends_with(", 126, 127, ...]"), "{plain}");

        let array = NbtTag::ByteArray(vec![0; 300]);
        let rendered = StyledPrinter::default().render(&array);
        assert_eq!(rendered.last(), Some(&segment("]", Style::Plain)));
        assert!(rendered.contains(&segment("...", Style::Folded)));
    }
}
