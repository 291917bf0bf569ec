/// Folds up to eight hexadecimal digits into a `u32`, most significant nibble first.
/// Returns `None` if the slice is empty, longer than eight characters, or if any character
/// is not a hexadecimal digit (`0-9`, `a-f`, `A-F`).
///
/// # Examples:
/// ```
/// # use tagtree_util::hex_chars_to_u32;
/// assert_eq!(hex_chars_to_u32(&['1', 'f']), Some(31));
/// assert_eq!(hex_chars_to_u32(&['0', '0', '0', '1', 'F', '6', '0', '0']), Some(0x1F600));
/// assert_eq!(hex_chars_to_u32(&['g']), None);
/// assert_eq!(hex_chars_to_u32(&[]), None);
/// ```
#[inline]
pub fn hex_chars_to_u32(chars: &[char]) -> Option<u32> {
    if chars.is_empty() || chars.len() > 8 {
        return None;
    }

    chars
        .iter()
        .try_fold(0_u32, |acc, c| Some((acc << 4) | c.to_digit(16)?))
}
