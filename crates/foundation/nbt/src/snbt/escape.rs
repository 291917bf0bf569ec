use tagtree_util::hex_chars_to_u32;

use super::SnbtError;


/// Parses the escape sequence whose backslash is at byte `index` of `input`. Returns the
/// escaped character and the byte index just past the sequence.
pub(crate) fn parse_escape(input: &str, index: usize) -> Result<(char, usize), SnbtError> {
    // Skip the backslash, which has a length of 1 byte
    let body = &input[index + 1..];
    let mut chars = body.chars();

    let Some(kind) = chars.next() else {
        return Err(SnbtError::unexpected_end(input, "an escape sequence".to_owned()));
    };
    let after_kind = index + 1 + kind.len_utf8();

    let simple = match kind {
        '\'' | '"' | '\\' => Some(kind),
        'b' => Some('\x08'),
        's' => Some(' '),
        't' => Some('\t'),
        'n' => Some('\n'),
        'f' => Some('\x0c'),
        'r' => Some('\r'),
        _   => None,
    };
    if let Some(escaped) = simple {
        return Ok((escaped, after_kind));
    }

    match kind {
        'x' => parse_hex_escape(input, index, 2),
        'u' => parse_hex_escape(input, index, 4),
        'U' => parse_hex_escape(input, index, 8),
        'N' => parse_named_escape(input, index),
        _   => Err(SnbtError::invalid_escape(input, index, 2)),
    }
}

fn parse_hex_escape(input: &str, index: usize, digits: usize) -> Result<(char, usize), SnbtError> {
    // The backslash and the letter are each one byte
    let start = index + 2;
    let hex: Vec<char> = input[start..].chars().take(digits).collect();

    if hex.len() < digits {
        return Err(SnbtError::unexpected_end(
            input,
            format!("{digits} hexadecimal digits"),
        ));
    }

    let codepoint = hex_chars_to_u32(&hex)
        .ok_or_else(|| SnbtError::expected_hex_escape(input, index, digits))?;
    // Hex digits are ASCII, so the sequence spans `digits` bytes.
    let end = start + digits;

    char::from_u32(codepoint)
        .map(|escaped| (escaped, end))
        .ok_or_else(|| SnbtError::invalid_codepoint(input, index, digits + 2, codepoint))
}

fn parse_named_escape(input: &str, index: usize) -> Result<(char, usize), SnbtError> {
    // Skip '\\' and 'N'
    let start = index + 2;
    if !input[start..].starts_with('{') {
        return Err(SnbtError::unexpected_token(input, start, "'{'".to_owned()));
    }

    let name_start = start + 1;
    let Some(name_len) = input[name_start..].find('}') else {
        return Err(SnbtError::unexpected_end(input, "'}'".to_owned()));
    };
    let name = &input[name_start..name_start + name_len];
    let end = name_start + name_len + 1;
    let width = input[index..end].chars().count();

    #[cfg(feature = "named_escapes")]
    {
        unicode_names2::character(name)
            .map(|escaped| (escaped, end))
            .ok_or_else(|| SnbtError::unknown_character_name(input, index, width, name))
    }
    #[cfg(not(feature = "named_escapes"))]
    {
        let _ = name;
        Err(SnbtError::named_escapes_disabled(input, index, width))
    }
}
