use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde::ser::{SerializeMap as _, Serializer as _};
use serde_json::json;

use crate::{NbtCompound, NbtList, NbtTag};
use super::*;


#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Chest {
    id:    String,
    items: Vec<Item>,
    lock:  Option<String>,
    open:  bool,
    #[serde(rename = "Slots")]
    slots: ByteArray,
    kind:  Kind,
    count: u8,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Item {
    slot:   i8,
    count:  i8,
    damage: i16,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum Kind {
    Single,
    Double { left: bool },
    Trapped(i32),
    Pair(i32, i32),
}

fn snbt(input: &str) -> NbtTag {
    NbtTag::from_snbt(input).unwrap()
}

#[test]
fn derived_types() {
    let chest = Chest {
        id:    "minecraft:chest".to_owned(),
        items: vec![Item { slot: 0, count: 64, damage: 3 }],
        lock:  None,
        open:  true,
        slots: ByteArray(vec![1, 2]),
        kind:  Kind::Single,
        count: 5,
    };

    let tag = to_tag(&chest).unwrap();
    assert_eq!(
        tag,
        snbt(
            "{id:'minecraft:chest',items:[{slot:0b,count:64b,damage:3s}],open:1b,\
            Slots:[B;1b,2b],kind:'Single',count:5s}",
        ),
    );
    assert_eq!(from_tag::<Chest>(tag).unwrap(), chest);
}

#[test]
fn enums() {
    let cases = [
        (Kind::Single, "'Single'"),
        (Kind::Double { left: true }, "{Double:{left:1b}}"),
        (Kind::Trapped(7), "{Trapped:7}"),
        (Kind::Pair(1, 2), "{Pair:[1,2]}"),
    ];
    for (kind, expected) in cases {
        let tag = to_tag(&kind).unwrap();
        assert_eq!(tag, snbt(expected));
        assert_eq!(from_tag::<Kind>(tag).unwrap(), kind);
    }

    assert!(from_tag::<Kind>(snbt("{Single:{},Pair:[1,2]}")).is_err());
    assert!(from_tag::<Kind>(NbtTag::Int(0)).is_err());
}

#[test]
fn unsigned_integers_widen() {
    assert_eq!(to_tag(&255_u8).unwrap(), NbtTag::Short(255));
    assert_eq!(to_tag(&u16::MAX).unwrap(), NbtTag::Int(65535));
    assert_eq!(to_tag(&u32::MAX).unwrap(), NbtTag::Long(4_294_967_295));
    assert_eq!(to_tag(&5_u64).unwrap(), NbtTag::Long(5));
    assert!(to_tag(&u64::MAX).is_err());

    assert_eq!(from_tag::<u8>(NbtTag::Short(255)).unwrap(), 255);
    assert!(from_tag::<u8>(NbtTag::Short(256)).is_err());
    assert_eq!(from_tag::<u32>(NbtTag::Long(7)).unwrap(), 7);
}

#[test]
fn scalars() {
    assert_eq!(to_tag(&true).unwrap(), NbtTag::Byte(1));
    assert_eq!(to_tag(&'x').unwrap(), NbtTag::String("x".to_owned()));
    assert_eq!(to_tag(&()).unwrap(), NbtTag::End);
    assert_eq!(to_tag(&None::<i32>).unwrap(), NbtTag::End);
    assert_eq!(to_tag(&Some(1.5_f32)).unwrap(), NbtTag::Float(1.5));

    assert!(from_tag::<bool>(NbtTag::Int(2)).unwrap());
    assert!(!from_tag::<bool>(NbtTag::Byte(0)).unwrap());
    assert_eq!(from_tag::<Option<i32>>(NbtTag::End).unwrap(), None);
    assert_eq!(from_tag::<Option<i32>>(NbtTag::Int(3)).unwrap(), Some(3));
    assert_eq!(from_tag::<f64>(NbtTag::Float(0.5)).unwrap(), 0.5);
    assert_eq!(from_tag::<char>(NbtTag::String("y".to_owned())).unwrap(), 'y');
}

#[test]
fn arrays() {
    assert_eq!(to_tag(&IntArray(vec![1, -1])).unwrap(), NbtTag::IntArray(vec![1, -1]));
    assert_eq!(to_tag(&LongArray(Vec::new())).unwrap(), NbtTag::LongArray(Vec::new()));
    // Without a wrapper, a vector is a list
    assert_eq!(to_tag(&vec![1_i32, 2]).unwrap(), NbtTag::List(NbtList::from(vec![1, 2])));

    assert_eq!(from_tag::<IntArray>(NbtTag::IntArray(vec![3])).unwrap(), IntArray(vec![3]));
    assert_eq!(from_tag::<Vec<i64>>(NbtTag::LongArray(vec![4, 5])).unwrap(), vec![4, 5]);
    assert_eq!(from_tag::<ByteArray>(snbt("[1b,2b]")).unwrap(), ByteArray(vec![1, 2]));
    assert!(from_tag::<IntArray>(snbt("['x']")).is_err());
    assert!(from_tag::<ByteArray>(snbt("[300]")).is_err());

    assert_eq!(NbtTag::from(ByteArray(vec![9])), NbtTag::ByteArray(vec![9]));
}

#[test]
fn array_elements_must_fit() {
    assert_eq!(
        array_from_tag(INT_ARRAY_TOKEN, snbt("[1b,2s,3]")).unwrap(),
        NbtTag::IntArray(vec![1, 2, 3]),
    );
    assert!(array_from_tag(BYTE_ARRAY_TOKEN, snbt("[128]")).is_err());
    assert!(array_from_tag(LONG_ARRAY_TOKEN, snbt("[1.0d]")).is_err());
    assert!(array_from_tag(LONG_ARRAY_TOKEN, snbt("'x'")).is_err());
}

#[test]
fn map_keys() {
    let mut map = BTreeMap::new();
    map.insert(1_u8, "one");
    map.insert(2_u8, "two");
    assert_eq!(to_tag(&map).unwrap(), snbt("{'1':'one','2':'two'}"));

    let mut bad = BTreeMap::new();
    bad.insert(true, 1);
    assert!(to_tag(&bad).is_err());
}

#[test]
fn map_values_need_a_key() {
    let mut map = TagSerializer.serialize_map(Some(1)).unwrap();
    let err = map.serialize_value(&1_i32).unwrap_err();
    assert!(err.to_string().contains("before serialize_key"), "{err}");

    let mut map = TagSerializer.serialize_map(None).unwrap();
    map.serialize_key("a").unwrap();
    map.serialize_value(&1_i32).unwrap();
    assert_eq!(map.end().unwrap(), snbt("{a:1}"));
}

#[test]
fn tags_pass_through_unchanged() {
    let tag = snbt(
        "{b:[B;-1b],i:[I;1,2],l:[L;],list:[[1s],[]],mixed:[1b,'a',{}],nested:{x:1.5f,y:2.5d}}",
    );
    assert_eq!(to_tag(&tag).unwrap(), tag);
    assert_eq!(from_tag::<NbtTag>(tag.clone()).unwrap(), tag);

    let NbtTag::Compound(compound) = tag.clone() else {
        panic!("expected a compound");
    };
    assert_eq!(from_tag::<NbtCompound>(tag).unwrap(), compound);
}

#[test]
fn json() {
    let tag = snbt("{a:1b,b:[I;1,2],c:'x',d:[1.5d]}");
    assert_eq!(
        serde_json::to_value(&tag).unwrap(),
        json!({ "a": 1, "b": [1, 2], "c": "x", "d": [1.5] }),
    );

    // JSON numbers have no width, so integers come back as longs and arrays as lists
    let read: NbtTag = serde_json::from_value(json!({ "a": 1, "s": "x", "l": [1.5], "n": -2 }))
        .unwrap();
    assert_eq!(read, snbt("{a:1L,s:'x',l:[1.5d],n:-2L}"));
}

#[test]
fn lenient_compounds() {
    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize_lenient_compound")]
        data: NbtCompound,
    }

    let from_text: Holder = serde_json::from_value(json!({ "data": "{a: 1}" })).unwrap();
    assert_eq!(from_text.data.get::<_, i32>("a").unwrap(), 1);

    let from_map: Holder = serde_json::from_value(json!({ "data": { "a": 1 } })).unwrap();
    assert_eq!(from_map.data.get::<_, i64>("a").unwrap(), 1);

    let from_tree: Holder = from_tag(snbt("{data:'{b:2b}'}")).unwrap();
    assert_eq!(from_tree.data.get::<_, i8>("b").unwrap(), 2);

    assert!(serde_json::from_value::<Holder>(json!({ "data": "{unclosed" })).is_err());
    assert!(serde_json::from_value::<Holder>(json!({ "data": 5 })).is_err());
}
