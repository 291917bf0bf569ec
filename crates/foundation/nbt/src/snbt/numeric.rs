//! Numeric literals.
//!
//! Below, "digits" may contain underscores, but not at the start or end of the run of digits.
//! `[a | b]` denotes an optional `a` or `b`, and letters other than the `x` and `b` of a radix
//! prefix may be in either case.
//!
//! Integers: `[+ | -] [0x | 0b] digits [u | s] [b | s | i | l]`. Decimal digits may not have
//! a leading zero unless `0` is the only digit. Decimal integers are signed unless `u` is
//! given; hexadecimal and binary integers are unsigned unless `s` is given, so `0xFFb` is the
//! byte `-1`. A `-` sign on an unsigned integer is only allowed for zero.
//!
//! Floats: `[+ | -] digits [.] [e [+ | -] digits] [f | d]` or
//! `[+ | -] [digits] . digits [e [+ | -] digits] [f | d]`, and they need a decimal point, an
//! exponent or a suffix to not be an integer. Without a suffix they are doubles.
//!
//! Integer parsing happens first; whether it rejects a word outright or leaves it to the float
//! rules depends on whether the word could still be a valid float.

use thiserror::Error;

use crate::ops::Number;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntWidth {
    Byte,
    Short,
    Int,
    Long,
}

impl IntWidth {
    /// Whether an integer of this width may be an element of an array of `array` elements.
    #[inline]
    pub(crate) fn fits_in(self, array: Self) -> bool {
        self.rank() <= array.rank()
    }

    fn rank(self) -> u8 {
        match self {
            Self::Byte  => 0,
            Self::Short => 1,
            Self::Int   => 2,
            Self::Long  => 3,
        }
    }
}

/// A parsed numeric literal, and for integers, whether the width came from a suffix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Literal {
    pub(crate) number:   Number,
    pub(crate) suffixed: bool,
}

/// Parses `word` as a number. Unsuffixed integers get the width `default_width`.
pub(crate) fn parse_number(
    word:               &str,
    default_width:      IntWidth,
    replace_non_finite: bool,
) -> Result<Literal, NumericParseError> {
    if word.is_empty() {
        return Err(NumericParseError::EmptyString);
    }

    match try_parse_integer(word, default_width) {
        Some(result) => result,
        None         => parse_float(word, replace_non_finite).map(|number| Literal {
            number,
            suffixed: true,
        }),
    }
}

// ================================
//      Integers
// ================================

fn split_sign(word: &str) -> (bool, &str) {
    if let Some(rest) = word.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = word.strip_prefix('+') {
        (false, rest)
    } else {
        (false, word)
    }
}

/// `None` means the word is not an integer but might be a float.
fn try_parse_integer(
    word:          &str,
    default_width: IntWidth,
) -> Option<Result<Literal, NumericParseError>> {
    let (negative, body) = split_sign(word);
    if body.is_empty() {
        return Some(Err(NumericParseError::NoDigits));
    }

    let starts_binary_digit = |rest: &str| matches!(rest.chars().next(), Some('0' | '1'));
    let (radix, unprefixed) = if let Some(rest) = body.strip_prefix("0x") {
        (16, rest)
    } else {
        match body.strip_prefix("0b") {
            // `0b` alone is the byte zero
            Some(rest) if starts_binary_digit(rest) => (2, rest),
            _ => (10, body),
        }
    };

    let digits_end = unprefixed
        .find(|c: char| c != '_' && !c.is_digit(radix))
        .unwrap_or(unprefixed.len());
    let (digits, suffix) = unprefixed.split_at(digits_end);

    if digits.is_empty() {
        // Something like `.5` or `-e`; a radix prefix can't start a float.
        return if radix == 10 { None } else { Some(Err(NumericParseError::NoDigits)) };
    }

    let Some((unsigned, width)) = parse_int_suffix(suffix) else {
        return if radix == 10 {
            None
        } else {
            Some(Err(NumericParseError::InvalidIntegerSuffix(suffix.to_owned())))
        };
    };

    if digits.starts_with('_') || digits.ends_with('_') {
        // Floats have the same underscore rule, so this is wrong either way.
        return Some(Err(NumericParseError::InvalidUnderscore));
    }

    if radix == 10 && digits.len() > 1 && digits.starts_with('0') {
        return Some(Err(NumericParseError::LeadingZero));
    }

    let mut magnitude: u64 = 0;
    for digit in digits.chars().filter_map(|c| c.to_digit(radix)) {
        let Some(next) = magnitude
            .checked_mul(u64::from(radix))
            .and_then(|n| n.checked_add(u64::from(digit)))
        else {
            return Some(Err(NumericParseError::IntegerTooLarge));
        };
        magnitude = next;
    }

    let unsigned = unsigned.unwrap_or(radix != 10);
    let suffixed = width.is_some();
    let width = width.unwrap_or(default_width);

    Some(integral_value(negative, magnitude, unsigned, width).map(|number| Literal {
        number,
        suffixed,
    }))
}

/// Returns the explicit signedness (`Some(true)` for unsigned) and width of an integer suffix,
/// or `None` if `suffix` is not an integer suffix.
fn parse_int_suffix(suffix: &str) -> Option<(Option<bool>, Option<IntWidth>)> {
    let width = |c: char| match c.to_ascii_lowercase() {
        'b' => Some(IntWidth::Byte),
        's' => Some(IntWidth::Short),
        'i' => Some(IntWidth::Int),
        'l' => Some(IntWidth::Long),
        _   => None,
    };
    let signedness = |c: char| match c.to_ascii_lowercase() {
        'u' => Some(true),
        's' => Some(false),
        _   => None,
    };

    let mut chars = suffix.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (None, _, _) => Some((None, None)),
        // A lone `s` is a short, not a signedness
        (Some(w), None, _) => match width(w) {
            Some(w) => Some((None, Some(w))),
            None    => signedness(w).filter(|&unsigned| unsigned).map(|u| (Some(u), None)),
        },
        (Some(s), Some(w), None) => Some((Some(signedness(s)?), Some(width(w)?))),
        _ => None,
    }
}

fn integral_value(
    negative:  bool,
    magnitude: u64,
    unsigned:  bool,
    width:     IntWidth,
) -> Result<Number, NumericParseError> {
    let out_of_range = |expected_type: &'static str| NumericParseError::OutOfRange {
        negative,
        magnitude,
        expected_type,
    };

    if unsigned {
        if negative && magnitude != 0 {
            return Err(NumericParseError::NegativeUnsigned(magnitude));
        }
        // The bits of the unsigned value are reinterpreted as the signed type.
        return Ok(match width {
            IntWidth::Byte  => Number::Byte(u8::try_from(magnitude).map_err(|_| out_of_range("u8"))? as i8),
            IntWidth::Short => Number::Short(u16::try_from(magnitude).map_err(|_| out_of_range("u16"))? as i16),
            IntWidth::Int   => Number::Int(u32::try_from(magnitude).map_err(|_| out_of_range("u32"))? as i32),
            IntWidth::Long  => Number::Long(magnitude as i64),
        });
    }

    // The signed range is checked in i128, where negating the magnitude can't overflow.
    let value = if negative { -i128::from(magnitude) } else { i128::from(magnitude) };
    Ok(match width {
        IntWidth::Byte  => Number::Byte(i8::try_from(value).map_err(|_| out_of_range("i8"))?),
        IntWidth::Short => Number::Short(i16::try_from(value).map_err(|_| out_of_range("i16"))?),
        IntWidth::Int   => Number::Int(i32::try_from(value).map_err(|_| out_of_range("i32"))?),
        IntWidth::Long  => Number::Long(i64::try_from(value).map_err(|_| out_of_range("i64"))?),
    })
}

// ================================
//      Floats
// ================================

fn parse_float(word: &str, replace_non_finite: bool) -> Result<Number, NumericParseError> {
    let (negative, body) = split_sign(word);

    let (body, is_double, has_suffix) = match body.chars().next_back() {
        Some('f' | 'F') => (&body[..body.len() - 1], false, true),
        Some('d' | 'D') => (&body[..body.len() - 1], true, true),
        _               => (body, true, false),
    };

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(e) => (&body[..e], Some(&body[e + 1..])),
        None    => (body, None),
    };

    let (integral, fractional) = match mantissa.find('.') {
        Some(dot) => (&mantissa[..dot], Some(&mantissa[dot + 1..])),
        None      => (mantissa, None),
    };

    let integral = strip_digits(integral)?;
    let fractional = fractional.map(strip_digits).transpose()?;

    if integral.is_empty() && fractional.as_deref().is_none_or(str::is_empty) {
        return Err(NumericParseError::NoDigits);
    }
    if fractional.is_none() && exponent.is_none() && !has_suffix {
        // An integer would have been accepted already.
        return Err(NumericParseError::NoDigits);
    }

    let exponent = match exponent {
        Some(exponent) => {
            let (exp_negative, exp_digits) = split_sign(exponent);
            let exp_digits = strip_digits(exp_digits)?;
            if exp_digits.is_empty() {
                return Err(NumericParseError::NoExponentDigits);
            }
            format!("e{}{exp_digits}", if exp_negative { "-" } else { "" })
        }
        None => String::new(),
    };

    let normalized = format!(
        "{}{}.{}{exponent}",
        if negative { "-" } else { "" },
        if integral.is_empty() { "0" } else { &integral },
        fractional.as_deref().filter(|f| !f.is_empty()).unwrap_or("0"),
    );

    if is_double {
        let value: f64 = normalized.parse().map_err(|_| NumericParseError::NoDigits)?;
        if value.is_finite() {
            Ok(Number::Double(value))
        } else if replace_non_finite {
            Ok(Number::Double(if value > 0.0 { f64::MAX } else { f64::MIN }))
        } else {
            Err(NumericParseError::NonFiniteFloat)
        }
    } else {
        let value: f32 = normalized.parse().map_err(|_| NumericParseError::NoDigits)?;
        if value.is_finite() {
            Ok(Number::Float(value))
        } else if replace_non_finite {
            Ok(Number::Float(if value > 0.0 { f32::MAX } else { f32::MIN }))
        } else {
            Err(NumericParseError::NonFiniteFloat)
        }
    }
}

/// Validates a run of decimal digits and underscores and removes the underscores.
fn strip_digits(run: &str) -> Result<String, NumericParseError> {
    if let Some(invalid) = run.chars().find(|&c| c != '_' && !c.is_ascii_digit()) {
        return Err(NumericParseError::InvalidFloatCharacter(invalid));
    }
    if run.starts_with('_') || run.ends_with('_') {
        return Err(NumericParseError::InvalidUnderscore);
    }
    Ok(run.chars().filter(|&c| c != '_').collect())
}

// ================================
//      Numeric Parse Error
// ================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericParseError {
    #[error("empty strings are not valid numbers")]
    EmptyString,
    #[error("the numeric literal had no digits")]
    NoDigits,
    #[error("leading zero not allowed")]
    LeadingZero,
    #[error("underscores must be between digits")]
    InvalidUnderscore,
    #[error("'{0}' is not a valid integer suffix")]
    InvalidIntegerSuffix(String),
    #[error("the numeric literal was not a valid integer, and '{0}' cannot occur in floats")]
    InvalidFloatCharacter(char),
    #[error("the exponent had no digits")]
    NoExponentDigits,
    #[error("value is a syntactically correct integer, but too large for any integer type")]
    IntegerTooLarge,
    #[error("number out of range: -{0} is not in the range of any unsigned integer")]
    NegativeUnsigned(u64),
    #[error(
        "number out of range: {}{} is not in the range of {}",
        if *negative { "-" } else { "" },
        magnitude, expected_type,
    )]
    OutOfRange {
        negative:      bool,
        magnitude:     u64,
        expected_type: &'static str,
    },
    #[error("the floating-point value was infinite or NaN")]
    NonFiniteFloat,
}


#[cfg(test)]
mod tests {
    use super::*;

    fn number(word: &str) -> Result<Number, NumericParseError> {
        parse_number(word, IntWidth::Int, false).map(|literal| literal.number)
    }

    #[test]
    fn integer_suffixes() {
        assert_eq!(number("1b"), Ok(Number::Byte(1)));
        assert_eq!(number("-3S"), Ok(Number::Short(-3)));
        assert_eq!(number("42"), Ok(Number::Int(42)));
        assert_eq!(number("7i"), Ok(Number::Int(7)));
        assert_eq!(number("9L"), Ok(Number::Long(9)));
        assert_eq!(number("1_000_000"), Ok(Number::Int(1_000_000)));
        assert_eq!(number("0"), Ok(Number::Int(0)));
        assert_eq!(number("0b"), Ok(Number::Byte(0)));
        assert_eq!(number("+5"), Ok(Number::Int(5)));
    }

    #[test]
    fn signedness() {
        assert_eq!(number("255ub"), Ok(Number::Byte(-1)));
        assert_eq!(number("-128sb"), Ok(Number::Byte(-128)));
        assert_eq!(number("0xFF"), Ok(Number::Int(255)));
        assert_eq!(number("0xFFFFFFFF"), Ok(Number::Int(-1)));
        assert_eq!(number("0xFFub"), Ok(Number::Byte(-1)));
        assert_eq!(number("0x7Fsb"), Ok(Number::Byte(127)));
        assert_eq!(number("0b1010"), Ok(Number::Int(10)));
        assert_eq!(number("-0ub"), Ok(Number::Byte(0)));
        assert_eq!(number("-1ub"), Err(NumericParseError::NegativeUnsigned(1)));
    }

    #[test]
    fn hex_digits_are_greedy() {
        // `b` is a hex digit, so this is the int 0xFFB
        assert_eq!(number("0xFFb"), Ok(Number::Int(0xFFB)));
    }

    #[test]
    fn range_errors() {
        assert!(matches!(number("128b"), Err(NumericParseError::OutOfRange { expected_type: "i8", .. })));
        assert_eq!(number("-128b"), Ok(Number::Byte(-128)));
        assert!(matches!(number("2147483648"), Err(NumericParseError::OutOfRange { .. })));
        assert_eq!(number("-9223372036854775808L"), Ok(Number::Long(i64::MIN)));
        assert_eq!(number("99999999999999999999L"), Err(NumericParseError::IntegerTooLarge));
    }

    #[test]
    fn leading_zero() {
        assert_eq!(number("012"), Err(NumericParseError::LeadingZero));
        assert_eq!(number("00"), Err(NumericParseError::LeadingZero));
        // Floats may have leading zeroes
        assert_eq!(number("012f"), Ok(Number::Float(12.0)));
        assert_eq!(number("01.5"), Ok(Number::Double(1.5)));
    }

    #[test]
    fn underscores() {
        assert_eq!(number("_1"), Err(NumericParseError::InvalidUnderscore));
        assert_eq!(number("1_"), Err(NumericParseError::InvalidUnderscore));
        assert_eq!(number("1__0"), Ok(Number::Int(10)));
        assert_eq!(number("1_0.5_0"), Ok(Number::Double(10.5)));
        assert_eq!(number("0x_F"), Err(NumericParseError::InvalidUnderscore));
    }

    #[test]
    fn floats() {
        assert_eq!(number("1.5f"), Ok(Number::Float(1.5)));
        assert_eq!(number("1.5"), Ok(Number::Double(1.5)));
        assert_eq!(number(".5"), Ok(Number::Double(0.5)));
        assert_eq!(number("2."), Ok(Number::Double(2.0)));
        assert_eq!(number("3d"), Ok(Number::Double(3.0)));
        assert_eq!(number("1e3"), Ok(Number::Double(1000.0)));
        assert_eq!(number("-2.5E-1f"), Ok(Number::Float(-0.25)));
        assert_eq!(number("1e"), Err(NumericParseError::NoExponentDigits));
        assert_eq!(number("."), Err(NumericParseError::NoDigits));
        assert_eq!(number("1.2.3"), Err(NumericParseError::InvalidFloatCharacter('.')));
        assert_eq!(number("1abc"), Err(NumericParseError::InvalidFloatCharacter('a')));
    }

    #[test]
    fn non_finite() {
        assert_eq!(number("1e1000"), Err(NumericParseError::NonFiniteFloat));
        assert_eq!(
            parse_number("1e1000", IntWidth::Int, true).map(|l| l.number),
            Ok(Number::Double(f64::MAX)),
        );
        assert_eq!(
            parse_number("-1e50f", IntWidth::Int, true).map(|l| l.number),
            Ok(Number::Float(f32::MIN)),
        );
    }

    #[test]
    fn default_width_applies_to_unsuffixed() {
        let literal = parse_number("5", IntWidth::Byte, false).unwrap();
        assert_eq!(literal, Literal { number: Number::Byte(5), suffixed: false });
        let literal = parse_number("5s", IntWidth::Byte, false).unwrap();
        assert_eq!(literal, Literal { number: Number::Short(5), suffixed: true });
    }
}
