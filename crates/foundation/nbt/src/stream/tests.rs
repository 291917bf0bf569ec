use std::io::Cursor;

use pretty_assertions::assert_eq;

use crate::{NbtAccounter, NbtCompound, NbtList, NbtTag};
use crate::io::{self, NbtIoError};
use crate::tag::NbtType;
use super::*;


/// Hand-assembled binary NBT, so that entry order does not depend on the map type.
struct Bytes(Vec<u8>);

impl Bytes {
    fn root() -> Self {
        Self(vec![10, 0, 0])
    }

    fn named(mut self, id: u8, name: &str) -> Self {
        self.0.push(id);
        self.0.extend((name.len() as u16).to_be_bytes());
        self.0.extend(name.as_bytes());
        self
    }

    fn int(self, name: &str, value: i32) -> Self {
        self.named(3, name).raw(&value.to_be_bytes())
    }

    fn raw(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    fn end(self) -> Self {
        self.raw(&[0])
    }
}

/// Records the keys it is shown and answers `answer` for one chosen key.
struct KeyRecorder {
    keys:   Vec<String>,
    target: &'static str,
    answer: EntryResult,
    ends:   usize,
}

impl KeyRecorder {
    fn new(target: &'static str, answer: EntryResult) -> Self {
        Self { keys: Vec::new(), target, answer, ends: 0 }
    }
}

impl StreamTagVisitor for KeyRecorder {
    fn visit_end(&mut self) -> ValueResult { ValueResult::Continue }
    fn visit_byte(&mut self, _: i8) -> ValueResult { ValueResult::Continue }
    fn visit_short(&mut self, _: i16) -> ValueResult { ValueResult::Continue }
    fn visit_int(&mut self, _: i32) -> ValueResult { ValueResult::Continue }
    fn visit_long(&mut self, _: i64) -> ValueResult { ValueResult::Continue }
    fn visit_float(&mut self, _: f32) -> ValueResult { ValueResult::Continue }
    fn visit_double(&mut self, _: f64) -> ValueResult { ValueResult::Continue }
    fn visit_string(&mut self, _: &str) -> ValueResult { ValueResult::Continue }
    fn visit_byte_array(&mut self, _: &[i8]) -> ValueResult { ValueResult::Continue }
    fn visit_int_array(&mut self, _: &[i32]) -> ValueResult { ValueResult::Continue }
    fn visit_long_array(&mut self, _: &[i64]) -> ValueResult { ValueResult::Continue }
    fn visit_list(&mut self, _: NbtType, _: usize) -> ValueResult { ValueResult::Continue }

    fn visit_element(&mut self, _: NbtType, index: usize) -> EntryResult {
        self.keys.push(format!("[{index}]"));
        if self.target == "[]" && index == 1 { self.answer } else { EntryResult::Enter }
    }

    fn visit_entry(&mut self, _: NbtType) -> EntryResult { EntryResult::Enter }

    fn visit_entry_named(&mut self, _: NbtType, key: &str) -> EntryResult {
        self.keys.push(key.to_owned());
        if key == self.target { self.answer } else { EntryResult::Enter }
    }

    fn visit_container_end(&mut self) -> ValueResult {
        self.ends += 1;
        ValueResult::Continue
    }

    fn visit_root_entry(&mut self, _: NbtType) -> ValueResult { ValueResult::Continue }
}

fn nested_input() -> Vec<u8> {
    Bytes::root()
        .int("a", 1)
        .named(10, "nested")
        .int("x", 1)
        .int("y", 2)
        .end()
        .int("z", 3)
        .end()
        .0
}

fn stream<V: StreamTagVisitor>(bytes: &[u8], visitor: &mut V) -> (Result<ValueResult, NbtIoError>, u64) {
    let mut reader = Cursor::new(bytes);
    let result = io::parse_with_visitor(&mut reader, visitor, &mut NbtAccounter::unlimited_heap());
    (result, reader.position())
}

#[test]
fn halt_on_second_entry_stops_reading() {
    struct HaltOnSecond(usize);

    impl StreamTagVisitor for HaltOnSecond {
        fn visit_end(&mut self) -> ValueResult { ValueResult::Continue }
        fn visit_byte(&mut self, _: i8) -> ValueResult { ValueResult::Continue }
        fn visit_short(&mut self, _: i16) -> ValueResult { ValueResult::Continue }
        fn visit_int(&mut self, _: i32) -> ValueResult { ValueResult::Continue }
        fn visit_long(&mut self, _: i64) -> ValueResult { panic!("read past the halt") }
        fn visit_float(&mut self, _: f32) -> ValueResult { ValueResult::Continue }
        fn visit_double(&mut self, _: f64) -> ValueResult { ValueResult::Continue }
        fn visit_string(&mut self, _: &str) -> ValueResult { ValueResult::Continue }
        fn visit_byte_array(&mut self, _: &[i8]) -> ValueResult { ValueResult::Continue }
        fn visit_int_array(&mut self, _: &[i32]) -> ValueResult { ValueResult::Continue }
        fn visit_long_array(&mut self, _: &[i64]) -> ValueResult { ValueResult::Continue }
        fn visit_list(&mut self, _: NbtType, _: usize) -> ValueResult { ValueResult::Continue }
        fn visit_element(&mut self, _: NbtType, _: usize) -> EntryResult { EntryResult::Enter }
        fn visit_entry_named(&mut self, _: NbtType, _: &str) -> EntryResult { EntryResult::Enter }
        fn visit_container_end(&mut self) -> ValueResult { ValueResult::Continue }
        fn visit_root_entry(&mut self, _: NbtType) -> ValueResult { ValueResult::Continue }

        fn visit_entry(&mut self, _: NbtType) -> EntryResult {
            self.0 += 1;
            if self.0 == 2 { EntryResult::Halt } else { EntryResult::Enter }
        }
    }

    let bytes = Bytes::root()
        .int("a", 1)
        .named(4, "b")
        .raw(&2_i64.to_be_bytes())
        .named(8, "c")
        .raw(&[0, 1, b'x'])
        .end()
        .0;

    let (result, position) = stream(&bytes, &mut HaltOnSecond(0));
    assert_eq!(result.unwrap(), ValueResult::Halt);
    // Root header (3) + entry "a" (8) + the type byte of "b"
    assert_eq!(position, 12);
}

#[test]
fn break_skips_the_rest_of_a_compound() {
    let bytes = nested_input();
    let mut visitor = KeyRecorder::new("x", EntryResult::Break);
    let (result, position) = stream(&bytes, &mut visitor);

    assert_eq!(result.unwrap(), ValueResult::Continue);
    assert_eq!(visitor.keys, ["a", "nested", "x", "z"]);
    assert_eq!(visitor.ends, 2);
    assert_eq!(position, bytes.len() as u64);
}

#[test]
fn skip_passes_over_one_entry() {
    let bytes = nested_input();
    let mut visitor = KeyRecorder::new("nested", EntryResult::Skip);
    let (result, position) = stream(&bytes, &mut visitor);

    assert_eq!(result.unwrap(), ValueResult::Continue);
    assert_eq!(visitor.keys, ["a", "nested", "z"]);
    assert_eq!(visitor.ends, 1);
    assert_eq!(position, bytes.len() as u64);
}

#[test]
fn break_inside_a_list_skips_remaining_elements() {
    let mut list_bytes = vec![3, 0, 0, 0, 4];
    for value in 1_i32..=4 {
        list_bytes.extend(value.to_be_bytes());
    }
    let bytes = Bytes::root().named(9, "list").raw(&list_bytes).int("after", 5).end().0;

    let mut visitor = KeyRecorder::new("[]", EntryResult::Break);
    let (result, position) = stream(&bytes, &mut visitor);

    assert_eq!(result.unwrap(), ValueResult::Continue);
    assert_eq!(visitor.keys, ["list", "[0]", "[1]", "after"]);
    assert_eq!(position, bytes.len() as u64);
}

#[test]
fn collect_to_tag_unwraps_mixed_lists() {
    let root = NbtCompound::from_snbt(
        "{name:\"Steve\",pos:[1.0d,64.5d,-3.0d],inv:[{id:\"stone\",n:3b},{id:\"dirt\",n:1b}],\
        bytes:[B;1b,2b],ints:[I;7],longs:[L;9L],mixed:[1b,2],empty:[],nested:{deeper:{x:1s}}}",
    )
    .unwrap();
    let mut bytes = Vec::new();
    io::write_compound(&mut bytes, &root).unwrap();

    // The tree decoder keeps the wrappers the encoder added
    let decoded = io::read_compound(&mut Cursor::new(&bytes), &mut NbtAccounter::unlimited()).unwrap();
    let wrapped = NbtList::from(vec![
        NbtList::wrap_element(NbtTag::Byte(1)),
        NbtList::wrap_element(NbtTag::Int(2)),
    ]);
    assert_eq!(decoded.get_tag("mixed"), Some(&NbtTag::List(wrapped)));

    let mut collector = CollectToTag::new();
    let (result, _) = stream(&bytes, &mut collector);
    assert_eq!(result.unwrap(), ValueResult::Continue);
    let collected = collector.into_result();
    assert_eq!(collected, Some(NbtTag::Compound(root)));

    let Some(NbtTag::Compound(collected)) = collected else {
        panic!("expected a compound");
    };
    assert_eq!(collected.get_tag("mixed"), Some(&NbtTag::from_snbt("[1b,2]").unwrap()));
}

#[test]
fn collect_fields_halts_once_complete() {
    let bytes = Bytes::root()
        .named(8, "name")
        .raw(&[0, 2, b'h', b'i'])
        .int("ignored", 0)
        .named(10, "data")
        .int("pos", 7)
        .int("other", 8)
        .end()
        .named(12, "big")
        .raw(&[0, 0, 0, 2])
        .raw(&[0; 16])
        .end()
        .0;

    let mut visitor = CollectFields::new([
        FieldSelector::root(NbtType::String, "name"),
        FieldSelector::nested(["data"], NbtType::Int, "pos"),
    ]);
    let (result, position) = stream(&bytes, &mut visitor);

    assert_eq!(result.unwrap(), ValueResult::Halt);
    assert_eq!(visitor.missing_field_count(), 0);
    assert!(position < bytes.len() as u64);

    let expected = NbtTag::Compound(NbtCompound::from_snbt("{name:\"hi\",data:{pos:7}}").unwrap());
    assert_eq!(visitor.into_result(), Some(expected));
}

#[test]
fn collect_fields_reports_missing() {
    let bytes = Bytes::root().int("a", 1).end().0;
    let mut visitor = CollectFields::new([FieldSelector::root(NbtType::Long, "a")]);
    let (result, _) = stream(&bytes, &mut visitor);

    assert_eq!(result.unwrap(), ValueResult::Continue);
    assert_eq!(visitor.missing_field_count(), 1);
    assert_eq!(visitor.into_result(), Some(NbtTag::Compound(NbtCompound::new())));
}

#[test]
fn skip_all_consumes_everything() {
    let bytes = nested_input();
    let (result, position) = stream(&bytes, &mut SkipAll);
    assert_eq!(result.unwrap(), ValueResult::Continue);
    assert_eq!(position, bytes.len() as u64);
}

#[test]
fn invalid_ids_fail_before_visiting() {
    let (result, _) = stream(&[13], &mut SkipAll);
    assert!(matches!(result, Err(NbtIoError::InvalidTagId(13))));

    let bytes = Bytes::root().named(20, "bad").end().0;
    let mut visitor = KeyRecorder::new("", EntryResult::Enter);
    let (result, _) = stream(&bytes, &mut visitor);
    assert!(matches!(result, Err(NbtIoError::InvalidTagId(20))));
    assert!(visitor.keys.is_empty());
}

#[test]
fn streaming_respects_the_quota() {
    let bytes = Bytes::root().named(9, "list").raw(&[1, 0x7F, 0xFF, 0xFF, 0xFF]).end().0;
    let mut reader = Cursor::new(&bytes);
    let err = io::parse_with_visitor(&mut reader, &mut CollectToTag::new(), &mut NbtAccounter::new(1024))
        .unwrap_err();
    assert!(matches!(err, NbtIoError::QuotaExceeded { .. }), "{err:?}");
}

#[test]
fn in_memory_walk_rebuilds_the_tree() {
    let tag = NbtTag::from_snbt("{a:[{b:1L},{c:[I;1,2]}],d:\"e\",f:[]}").unwrap();
    let mut collector = CollectToTag::new();
    assert_eq!(tag.accept_as_root(&mut collector), ValueResult::Continue);
    assert_eq!(collector.into_result(), Some(tag));

    let scalar = NbtTag::Double(1.5);
    let mut collector = CollectToTag::new();
    scalar.accept_as_root(&mut collector);
    assert_eq!(collector.into_result(), Some(scalar));
}

#[test]
fn collectors_are_debug() {
    let collector = CollectToTag::new();
    assert!(format!("{collector:?}").starts_with("CollectToTag"));

    let fields = CollectFields::new([FieldSelector::root(NbtType::Int, "a")]);
    assert!(format!("{fields:?}").starts_with("CollectFields"));
}
