use pretty_assertions::assert_eq;

use crate::{DepthLimit, NbtCompound, NbtList, NbtTag};
use crate::settings::{SnbtParseOptions, SnbtWriteOptions};
use super::*;


fn parse(input: &str) -> NbtTag {
    NbtTag::from_snbt(input).unwrap()
}

fn parse_err(input: &str) -> SnbtError {
    NbtTag::from_snbt(input).unwrap_err()
}

fn compound(entries: Vec<(&str, NbtTag)>) -> NbtTag {
    let mut compound = NbtCompound::new();
    for (key, value) in entries {
        compound.insert(key, value);
    }
    NbtTag::Compound(compound)
}

#[test]
fn scalars() {
    assert_eq!(parse("1b"), NbtTag::Byte(1));
    assert_eq!(parse("-7s"), NbtTag::Short(-7));
    assert_eq!(parse("42"), NbtTag::Int(42));
    assert_eq!(parse("42L"), NbtTag::Long(42));
    assert_eq!(parse("1.5f"), NbtTag::Float(1.5));
    assert_eq!(parse("1.5"), NbtTag::Double(1.5));
    assert_eq!(parse("true"), NbtTag::Byte(1));
    assert_eq!(parse("false"), NbtTag::Byte(0));
    assert_eq!(parse("  hello_world.txt "), NbtTag::String("hello_world.txt".to_owned()));
    assert_eq!(parse("'single'"), NbtTag::String("single".to_owned()));
    assert_eq!(parse("\"double\""), NbtTag::String("double".to_owned()));
}

#[test]
fn containers() {
    assert_eq!(
        parse("{a:1,b:[1,2,3]}"),
        compound(vec![
            ("a", NbtTag::Int(1)),
            ("b", NbtTag::List(NbtList::from(vec![1, 2, 3]))),
        ]),
    );
    assert_eq!(parse("[B;1b,2b]"), NbtTag::ByteArray(vec![1, 2]));
    assert_eq!(parse("[I; 1, 2b, 3s]"), NbtTag::IntArray(vec![1, 2, 3]));
    assert_eq!(parse("[L;1,-2L]"), NbtTag::LongArray(vec![1, -2]));
    assert_eq!(parse("[B;]"), NbtTag::ByteArray(Vec::new()));
    assert_eq!(parse("[]"), NbtTag::List(NbtList::new()));
    assert_eq!(parse("{}"), compound(Vec::new()));
}

#[test]
fn whitespace_and_trailing_commas() {
    assert_eq!(
        parse(" {\n\ta : 1 ,\r\n  'b c' : [ 1 , 2 , ] , } "),
        compound(vec![
            ("a", NbtTag::Int(1)),
            ("b c", NbtTag::List(NbtList::from(vec![1, 2]))),
        ]),
    );
}

#[test]
fn array_prefix_needs_semicolon() {
    // Without `;` the letter is just an unquoted string
    assert_eq!(
        parse("[B, I]"),
        NbtTag::List(NbtList::from(vec!["B", "I"])),
    );
}

#[test]
fn mixed_lists() {
    let list = parse("[1b, 'two', {three: 3}]");
    let NbtTag::List(list) = list else {
        panic!("expected a list");
    };
    assert!(!list.is_homogeneous());
    assert_eq!(list.len(), 3);
    assert_eq!(list[0], NbtTag::Byte(1));
    assert_eq!(list[1], NbtTag::String("two".to_owned()));
}

#[test]
fn duplicate_keys_keep_last() {
    assert_eq!(parse("{a:1,a:2}"), compound(vec![("a", NbtTag::Int(2))]));
}

#[test]
fn quoted_strings() {
    assert_eq!(parse(r#""it's""#), NbtTag::String("it's".to_owned()));
    assert_eq!(parse(r#"'say "hi"'"#), NbtTag::String("say \"hi\"".to_owned()));
    assert_eq!(parse(r#""a\"b\\c\nd""#), NbtTag::String("a\"b\\c\nd".to_owned()));
    assert_eq!(parse(r#""\x41é\s""#), NbtTag::String("Aé ".to_owned()));
    assert_eq!(parse("\"nul:\0\""), NbtTag::String("nul:\0".to_owned()));
    assert_eq!(parse("\"\""), NbtTag::String(String::new()));
}

#[test]
fn builtins() {
    assert_eq!(parse("bool(1)"), NbtTag::Byte(1));
    assert_eq!(parse("bool(0.0)"), NbtTag::Byte(0));
    assert_eq!(parse("bool(-3L)"), NbtTag::Byte(1));
    assert_eq!(
        parse("uuid('00000001-0000-0002-0000-00030000000f')"),
        NbtTag::IntArray(vec![1, 2, 3, 15]),
    );

    assert!(matches!(parse_err("nope(1)"), SnbtError::NoSuchBuiltin { index: 0, .. }));
    assert!(matches!(parse_err("bool('x')"), SnbtError::InvalidBuiltinArgument { .. }));
    assert!(matches!(parse_err("bool(1, 2)"), SnbtError::InvalidBuiltinArgument { .. }));
    assert!(matches!(parse_err("uuid('not-a-uuid')"), SnbtError::InvalidBuiltinArgument { .. }));
}

#[test]
fn compound_roots() {
    let compound = NbtCompound::from_snbt("{a: 'b'}").unwrap();
    assert_eq!(compound.get::<_, &str>("a").unwrap(), "b");

    assert!(matches!(
        NbtCompound::from_snbt("[1]"),
        Err(SnbtError::UnexpectedToken { index: 0, .. }),
    ));
}

#[test]
fn parse_with_sizes() {
    let (tag, size) = parse_any_and_size("{a:1} {b:2}", SnbtParseOptions::default()).unwrap();
    assert_eq!(tag, compound(vec![("a", NbtTag::Int(1))]));
    assert_eq!(size, 5);

    let (_, size) = parse_compound_and_size("  {} trailing", SnbtParseOptions::default()).unwrap();
    assert_eq!(size, 4);
}

#[test]
fn structural_errors() {
    assert!(matches!(parse_err("{a:1} x"), SnbtError::TrailingData { index: 6, .. }));
    assert!(matches!(parse_err("{a:1"), SnbtError::UnexpectedEnd { .. }));
    assert!(matches!(parse_err("\"abc"), SnbtError::UnmatchedQuote { index: 0, .. }));
    assert!(matches!(parse_err("{:1}"), SnbtError::UnexpectedToken { index: 1, .. }));
    assert!(matches!(parse_err("{'':1}"), SnbtError::EmptyKey { index: 1, .. }));
    assert!(matches!(parse_err("[1,,2]"), SnbtError::UnexpectedToken { index: 3, .. }));
    assert!(matches!(parse_err(""), SnbtError::UnexpectedEnd { .. }));

    let SnbtError::UnexpectedToken { expected, index, .. } = parse_err("{a:1 b:2}") else {
        panic!("expected an unexpected token error");
    };
    assert_eq!(index, 5);
    assert_eq!(expected, "',' or '}'");
}

#[test]
fn number_errors() {
    assert!(matches!(parse_err("128b"), SnbtError::InvalidNumber { .. }));
    assert!(matches!(parse_err("012"), SnbtError::InvalidNumber { .. }));
    assert!(matches!(parse_err("1.2.3"), SnbtError::InvalidNumber { .. }));
    assert!(matches!(parse_err("-foo"), SnbtError::InvalidUnquotedStart { ch: '-', .. }));
    assert!(matches!(parse_err("[B; 1.5]"), SnbtError::InvalidArrayElement { .. }));
    assert!(matches!(parse_err("[B; 1s]"), SnbtError::InvalidArrayElement { .. }));
    assert!(matches!(parse_err("[I; 'x']"), SnbtError::InvalidArrayElement { .. }));
    assert!(matches!(parse_err("[B; 300]"), SnbtError::InvalidNumber { .. }));
}

#[test]
fn non_finite_floats() {
    assert!(matches!(parse_err("1e400"), SnbtError::InvalidNumber { .. }));

    let opts = SnbtParseOptions {
        replace_non_finite: true,
        ..SnbtParseOptions::default()
    };
    assert_eq!(NbtTag::from_snbt_with_options("1e400", opts).unwrap(), NbtTag::Double(f64::MAX));
}

#[test]
fn depth_limit() {
    let opts = SnbtParseOptions {
        depth_limit: DepthLimit::new(3),
        ..SnbtParseOptions::default()
    };

    assert!(NbtTag::from_snbt_with_options("[[[1]]]", opts).is_ok());
    assert!(NbtTag::from_snbt_with_options("{a:{b:[I;1]}}", opts).is_ok());
    assert!(matches!(
        NbtTag::from_snbt_with_options("[[[[1]]]]", opts),
        Err(SnbtError::ExceededDepthLimit { index: 3, limit: 3, .. }),
    ));
    assert!(matches!(
        NbtTag::from_snbt_with_options("{a:{b:{c:{}}}}", opts),
        Err(SnbtError::ExceededDepthLimit { .. }),
    ));
}

#[test]
fn error_index_is_a_byte_offset() {
    // 'é' is two bytes
    let err = parse_err("{\"é\":1 x}");
    assert_eq!(err.index(), 8);
}

#[cfg(feature = "serde")]
#[test]
fn parse_into_json() {
    use serde_json::json;

    use crate::ops::JsonOps;

    let value = parse_with_ops(
        "{name:'x',flags:[B;1b,0b],enabled:true,ratio:0.5f}",
        &JsonOps,
        SnbtParseOptions::default(),
    )
    .unwrap();
    assert_eq!(value, json!({
        "name": "x",
        "flags": [1, 0],
        "enabled": true,
        "ratio": 0.5,
    }));
}

#[test]
fn printed_snbt_parses_back() {
    let original = parse(
        "{id:'minecraft:chest',Items:[{Slot:0b,Count:64b,tag:{Damage:3s}}],\
        Lock:\"\",note:'say \"hi\"',quote:\"it's\",both:\"'\\\"\",ratio:0.1f,big:1e300,\
        bytes:[B;-128b,127b],ints:[I;],longs:[L;9223372036854775807L],\
        mixed:[1,'a',[]],control:\"\\t\\u0001\"}",
    );

    let compact = original.to_snbt();
    assert_eq!(NbtTag::from_snbt(&compact).unwrap(), original);

    let pretty = original.to_pretty_snbt();
    assert_eq!(NbtTag::from_snbt(&pretty).unwrap(), original);

    let opts = SnbtWriteOptions::default();
    assert_eq!(NbtTag::from_snbt(&original.to_snbt_with_options(opts)).unwrap(), original);
}
