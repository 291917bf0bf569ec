use crate::ops::{DynamicOps, NbtOps, Number};
use crate::settings::SnbtParseOptions;
use crate::tag::{NbtCompound, NbtTag};
use super::builtins::Builtin;
use super::escape::parse_escape;
use super::numeric::{parse_number, IntWidth};
use super::{allowed_unquoted, starts_unquoted_number, SnbtError};


/// A recursive-descent parser over a borrowed input, building values with `ops`.
pub(crate) struct Parser<'a, 'o, O: DynamicOps> {
    input:    &'a str,
    pos:      usize,
    ops:      &'o O,
    opts:     SnbtParseOptions,
    depth:    u32,
    expected: Expected,
}

/// Everything that was tried and failed at the furthest position reached so far.
#[derive(Debug, Default)]
struct Expected {
    index: usize,
    names: Vec<&'static str>,
}

impl<'a, 'o, O: DynamicOps> Parser<'a, 'o, O> {
    pub(crate) fn new(input: &'a str, ops: &'o O, opts: SnbtParseOptions) -> Self {
        Self {
            input,
            pos: 0,
            ops,
            opts,
            depth: 0,
            expected: Expected::default(),
        }
    }

    /// The byte offset just past everything consumed so far.
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Fails if anything but whitespace remains.
    pub(crate) fn finish(&mut self) -> Result<(), SnbtError> {
        self.skip_whitespace();
        if self.pos < self.input.len() {
            Err(SnbtError::trailing_data(self.input, self.pos))
        } else {
            Ok(())
        }
    }

    pub(crate) fn parse_value(&mut self) -> Result<O::Value, SnbtError> {
        self.skip_whitespace();
        let start = self.pos;

        match self.peek() {
            Some('{') => self.parse_compound(),
            Some('[') => self.parse_list_or_array(),
            Some(quote @ ('"' | '\'')) => {
                let string = self.parse_quoted(quote)?;
                Ok(self.ops.create_string(&string))
            }
            Some(c) if starts_unquoted_number(c) => {
                let number = self.parse_number_word(IntWidth::Int)?;
                Ok(self.ops.create_numeric(number))
            }
            Some(c) if allowed_unquoted(c) => self.parse_word(),
            _ => {
                self.expect(start, "a value");
                Err(self.unexpected())
            }
        }
    }

    // ================================
    //      Containers
    // ================================

    fn enter_container(&mut self, index: usize) -> Result<(), SnbtError> {
        let limit = self.opts.depth_limit.limit();
        if self.depth >= limit {
            return Err(SnbtError::exceeded_depth_limit(self.input, index, limit));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_compound(&mut self) -> Result<O::Value, SnbtError> {
        self.enter_container(self.pos)?;
        // Skip '{'
        self.pos += 1;

        let mut entries = Vec::new();
        self.parse_sequence('}', "'}'", |parser| {
            let key = parser.parse_key()?;
            parser.skip_whitespace();
            if !parser.eat(':', "':'") {
                return Err(parser.unexpected());
            }
            let value = parser.parse_value()?;
            entries.push((key, value));
            Ok(())
        })?;

        self.depth -= 1;
        Ok(self.ops.create_map(entries))
    }

    fn parse_key(&mut self) -> Result<String, SnbtError> {
        let start = self.pos;
        let key = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_quoted(quote)?,
            Some(c) if allowed_unquoted(c) => self.read_word().to_owned(),
            _ => {
                self.expect(start, "a compound key");
                return Err(self.unexpected());
            }
        };

        if key.is_empty() {
            Err(SnbtError::empty_key(self.input, start))
        } else {
            Ok(key)
        }
    }

    fn parse_list_or_array(&mut self) -> Result<O::Value, SnbtError> {
        let open = self.pos;
        // Skip '['
        self.pos += 1;

        if let Some(width) = self.array_prefix() {
            return self.parse_array(width);
        }
        self.enter_container(open)?;

        let mut values = Vec::new();
        self.parse_sequence(']', "']'", |parser| {
            values.push(parser.parse_value()?);
            Ok(())
        })?;

        self.depth -= 1;
        Ok(self.ops.create_list(values))
    }

    /// Consumes `B;`, `I;` or `L;` (with optional whitespace) if present.
    fn array_prefix(&mut self) -> Option<IntWidth> {
        let before = self.pos;
        self.skip_whitespace();

        let width = match self.peek() {
            Some('B' | 'b') => IntWidth::Byte,
            Some('I' | 'i') => IntWidth::Int,
            Some('L' | 'l') => IntWidth::Long,
            _ => {
                self.pos = before;
                return None;
            }
        };
        self.pos += 1;
        self.skip_whitespace();

        if self.peek() == Some(';') {
            self.pos += 1;
            Some(width)
        } else {
            self.pos = before;
            None
        }
    }

    fn parse_array(&mut self, width: IntWidth) -> Result<O::Value, SnbtError> {
        let expected = match width {
            IntWidth::Byte                  => "bytes",
            IntWidth::Short | IntWidth::Int => "ints",
            IntWidth::Long                  => "longs",
        };

        let mut elements: Vec<i64> = Vec::new();
        self.parse_sequence(']', "']'", |parser| {
            let start = parser.pos;
            if !parser.peek().is_some_and(starts_unquoted_number) {
                let width = parser.peek_word_width();
                return Err(SnbtError::invalid_array_element(parser.input, start, width, expected));
            }

            let number = parser.parse_number_word(width)?;
            match int_width(number) {
                Some(element_width) if element_width.fits_in(width) => {
                    elements.push(number.as_i64());
                    Ok(())
                }
                _ => Err(SnbtError::invalid_array_element(
                    parser.input,
                    start,
                    parser.input[start..parser.pos].chars().count(),
                    expected,
                )),
            }
        })?;

        // Each element fit the array's width, so the casts are lossless.
        Ok(match width {
            IntWidth::Byte => self.ops.create_byte_array(elements.into_iter().map(|n| n as i8).collect()),
            IntWidth::Short | IntWidth::Int => {
                self.ops.create_int_array(elements.into_iter().map(|n| n as i32).collect())
            }
            IntWidth::Long => self.ops.create_long_array(elements),
        })
    }

    /// Parses elements separated by commas until `close`, allowing a trailing comma.
    fn parse_sequence<F>(
        &mut self,
        close:      char,
        close_name: &'static str,
        mut element: F,
    ) -> Result<(), SnbtError>
    where
        F: FnMut(&mut Self) -> Result<(), SnbtError>,
    {
        loop {
            self.skip_whitespace();
            if self.eat(close, close_name) {
                return Ok(());
            }

            element(self)?;

            self.skip_whitespace();
            if self.eat(',', "','") {
                continue;
            }
            if self.eat(close, close_name) {
                return Ok(());
            }
            return Err(self.unexpected());
        }
    }

    // ================================
    //      Scalars
    // ================================

    fn parse_quoted(&mut self, quote: char) -> Result<String, SnbtError> {
        let open = self.pos;
        // Both quote characters are one byte
        self.pos += 1;

        let mut string = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(SnbtError::unmatched_quote(self.input, open));
            };

            if c == quote {
                self.pos += 1;
                return Ok(string);
            } else if c == '\\' {
                let (escaped, end) = parse_escape(self.input, self.pos)?;
                string.push(escaped);
                self.pos = end;
            } else {
                string.push(c);
                self.pos += c.len_utf8();
            }
        }
    }

    fn parse_number_word(&mut self, default_width: IntWidth) -> Result<Number, SnbtError> {
        let start = self.pos;
        let word = self.read_word();

        parse_number(word, default_width, self.opts.replace_non_finite)
            .map(|literal| literal.number)
            .map_err(|cause| {
                let width = word.chars().count();
                // Signs and dots alone can't make a number, and that's not a string either
                match word.chars().find(|c| !matches!(c, '+' | '-' | '.')) {
                    Some(c) if c.is_ascii_digit() => {
                        SnbtError::invalid_number(self.input, start, width, cause)
                    }
                    _ => {
                        let first = word.chars().next().unwrap_or('-');
                        SnbtError::invalid_unquoted_start(self.input, start, width, first)
                    }
                }
            })
    }

    /// An unquoted word which doesn't start like a number: a string, a boolean, or the name
    /// of a builtin operation followed by its arguments.
    fn parse_word(&mut self) -> Result<O::Value, SnbtError> {
        let start = self.pos;
        let word = self.read_word();

        match word {
            "true"  => return Ok(self.ops.create_bool(true)),
            "false" => return Ok(self.ops.create_bool(false)),
            _ => {}
        }

        if self.peek() == Some('(') {
            self.parse_builtin_call(start, word)
        } else {
            Ok(self.ops.create_string(word))
        }
    }

    fn parse_builtin_call(&mut self, start: usize, name: &str) -> Result<O::Value, SnbtError> {
        let builtin = Builtin::from_name(name)
            .ok_or_else(|| SnbtError::no_such_builtin(self.input, start, name))?;
        // Skip '('
        self.pos += 1;

        let mut args = Vec::new();
        self.parse_sequence(')', "')'", |parser| {
            args.push(parser.parse_value()?);
            Ok(())
        })?;

        builtin.apply(self.ops, self.input, start, &args)
    }

    // ================================
    //      Input
    // ================================

    #[inline]
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consumes the longest run of characters allowed in unquoted strings.
    fn read_word(&mut self) -> &'a str {
        let input = self.input;
        let rest = &input[self.pos..];
        let len = rest.find(|c| !allowed_unquoted(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// The number of characters a word at the current position would span, for error segments.
    fn peek_word_width(&self) -> usize {
        self.input[self.pos..]
            .chars()
            .take_while(|&c| allowed_unquoted(c))
            .count()
            .max(1)
    }

    /// Consumes `c` if it comes next, otherwise records it as expected here.
    fn eat(&mut self, c: char, name: &'static str) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            self.expect(self.pos, name);
            false
        }
    }

    fn expect(&mut self, index: usize, name: &'static str) {
        if index > self.expected.index || self.expected.names.is_empty() {
            self.expected.index = index;
            self.expected.names.clear();
        }
        if index == self.expected.index && !self.expected.names.contains(&name) {
            self.expected.names.push(name);
        }
    }

    /// An error at the furthest position reached, listing everything expected there.
    fn unexpected(&self) -> SnbtError {
        let expected = match self.expected.names.as_slice() {
            []    => "a value".to_owned(),
            [one] => (*one).to_owned(),
            [init @ .., last] => format!("{} or {last}", init.join(", ")),
        };
        SnbtError::unexpected_token(self.input, self.expected.index, expected)
    }
}

impl Parser<'_, '_, NbtOps> {
    /// Parses a value which must be a compound.
    pub(crate) fn parse_root_compound(&mut self) -> Result<NbtCompound, SnbtError> {
        self.skip_whitespace();
        let start = self.pos;

        if self.peek() != Some('{') {
            self.expect(start, "'{'");
            return Err(self.unexpected());
        }

        match self.parse_value()? {
            NbtTag::Compound(compound) => Ok(compound),
            _ => Err(SnbtError::unexpected_token(self.input, start, "'{'".to_owned())),
        }
    }
}

fn int_width(number: Number) -> Option<IntWidth> {
    match number {
        Number::Byte(_)  => Some(IntWidth::Byte),
        Number::Short(_) => Some(IntWidth::Short),
        Number::Int(_)   => Some(IntWidth::Int),
        Number::Long(_)  => Some(IntWidth::Long),
        Number::Float(_) | Number::Double(_) => None,
    }
}
