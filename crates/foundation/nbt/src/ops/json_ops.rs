use serde_json::{Map as JsonMap, Number as JsonNumber, Value};

use super::{DynamicOps, Number, OpsError};


/// [`DynamicOps`] over `serde_json::Value`.
///
/// JSON has a single number type, so integers come back as `Int` when they fit in an `i32`
/// and as `Long` otherwise, and every other number comes back as `Double`. Booleans read as
/// the numbers `1` and `0`. Non-finite floats have no JSON representation and become `null`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JsonOps;

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}

impl DynamicOps for JsonOps {
    type Value = Value;

    #[inline]
    fn empty(&self) -> Value {
        Value::Null
    }

    fn create_numeric(&self, number: Number) -> Value {
        match number {
            Number::Float(n)  => JsonNumber::from_f64(f64::from(n)).map_or(Value::Null, Value::Number),
            Number::Double(n) => JsonNumber::from_f64(n).map_or(Value::Null, Value::Number),
            integral          => Value::Number(JsonNumber::from(integral.as_i64())),
        }
    }

    #[inline]
    fn create_bool(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    #[inline]
    fn create_string(&self, value: &str) -> Value {
        Value::String(value.to_owned())
    }

    #[inline]
    fn create_list(&self, values: Vec<Value>) -> Value {
        Value::Array(values)
    }

    fn create_map(&self, entries: Vec<(String, Value)>) -> Value {
        Value::Object(entries.into_iter().collect())
    }

    fn get_number(&self, input: &Value) -> Result<Number, OpsError> {
        match input {
            Value::Number(n) => {
                if let Some(n) = n.as_i64() {
                    Ok(i32::try_from(n).map_or(Number::Long(n), Number::Int))
                } else {
                    // u64 values above i64::MAX land here too
                    Ok(Number::Double(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::Bool(b) => Ok(Number::Byte(i8::from(*b))),
            other          => Err(OpsError::NotANumber(kind_name(other))),
        }
    }

    fn get_string(&self, input: &Value) -> Result<String, OpsError> {
        match input {
            Value::String(s) => Ok(s.clone()),
            other            => Err(OpsError::NotAString(kind_name(other))),
        }
    }

    fn get_map_entries(&self, input: &Value) -> Result<Vec<(String, Value)>, OpsError> {
        match input {
            Value::Object(map) => Ok(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
            other => Err(OpsError::NotAMap(kind_name(other))),
        }
    }

    fn get_list(&self, input: &Value) -> Result<Vec<Value>, OpsError> {
        match input {
            Value::Array(values) => Ok(values.clone()),
            other                => Err(OpsError::NotAList(kind_name(other))),
        }
    }

    fn merge_to_list(&self, list: &Value, value: Value) -> Result<Value, OpsError> {
        match list {
            Value::Null => Ok(Value::Array(vec![value])),
            Value::Array(values) => {
                let mut merged = values.clone();
                merged.push(value);
                Ok(Value::Array(merged))
            }
            other => Err(OpsError::MergeMismatch {
                target: kind_name(other),
                value:  kind_name(&value),
            }),
        }
    }

    fn merge_to_map(&self, map: &Value, key: &str, value: Value) -> Result<Value, OpsError> {
        let mut merged = match map {
            Value::Null        => JsonMap::new(),
            Value::Object(map) => map.clone(),
            other => {
                return Err(OpsError::MergeMismatch {
                    target: kind_name(other),
                    value:  kind_name(&value),
                });
            }
        };
        merged.insert(key.to_owned(), value);
        Ok(Value::Object(merged))
    }

    fn remove(&self, input: &Value, key: &str) -> Value {
        match input {
            Value::Object(map) => {
                let mut removed = map.clone();
                removed.remove(key);
                Value::Object(removed)
            }
            other => other.clone(),
        }
    }

    fn convert_to<O: DynamicOps>(&self, out: &O, input: &Value) -> O::Value {
        match input {
            Value::Null      => out.empty(),
            Value::Bool(b)   => out.create_bool(*b),
            Value::Number(_) => match self.get_number(input) {
                Ok(number) => out.create_numeric(number),
                Err(_)     => out.empty(),
            },
            Value::String(s) => out.create_string(s),
            Value::Array(_)  => self.convert_list(out, input),
            Value::Object(_) => self.convert_map(out, input),
        }
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::ops::NbtOps;
    use crate::tag::{NbtCompound, NbtList, NbtTag};
    use super::*;

    #[test]
    fn nbt_to_json() {
        let tag = NbtTag::from_snbt("{name:\"x\",count:3b,ratio:0.5d,ids:[I;1,2],tags:[\"a\",\"b\"]}")
            .unwrap();

        let json = NbtOps.convert_to(&JsonOps, &tag);
        assert_eq!(json, json!({
            "name": "x",
            "count": 3,
            "ratio": 0.5,
            "ids": [1, 2],
            "tags": ["a", "b"],
        }));
    }

    #[test]
    fn json_to_nbt() {
        let json = json!({ "flag": true, "big": 5_000_000_000_i64, "small": 7, "list": [1.5] });
        let tag = JsonOps.convert_to(&NbtOps, &json);

        let mut expected = NbtCompound::new();
        expected.insert("flag", NbtTag::Byte(1));
        expected.insert("big", NbtTag::Long(5_000_000_000));
        expected.insert("small", NbtTag::Int(7));
        expected.insert("list", NbtList::from(vec![1.5_f64]));
        assert_eq!(tag, NbtTag::Compound(expected));
    }

    #[test]
    fn merges_copy() {
        let source = json!({ "a": 1 });
        let merged = JsonOps.merge_to_map(&source, "b", json!(2)).unwrap();
        assert_eq!(source, json!({ "a": 1 }));
        assert_eq!(merged, json!({ "a": 1, "b": 2 }));

        let list = json!([1]);
        let merged = JsonOps.merge_to_list(&list, json!(2)).unwrap();
        assert_eq!(list, json!([1]));
        assert_eq!(merged, json!([1, 2]));
    }

    #[test]
    fn non_finite_becomes_null() {
        assert_eq!(JsonOps.create_double(f64::NAN), Value::Null);
        assert_eq!(JsonOps.create_float(f32::INFINITY), Value::Null);
    }
}
