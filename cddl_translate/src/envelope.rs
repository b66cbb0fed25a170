/***************************************************************************************************
 * Copyright (c) 2019-2021 Jeremy O'Donoghue. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
//! The YAML/JSON-compatible envelope, translating between `ciborium::value::Value` and
//! `serde_json::Value`. Used uniformly for both JSON and YAML output: `serde_yaml` re-serializes
//! whatever `serde::Serialize` the envelope (a `serde_json::Value`) produces.
//!
//! `ciborium::value::Value` has no variant distinct from `Null` for CBOR's `undefined` simple
//! value, so the envelope treats the two identically; `["zcbor_undefined"]` decodes back to
//! `Value::Null` rather than a separate wire value.

use std::convert::TryFrom;

use ciborium::value::{Integer, Value};
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::TranslationError;

/// Converts a CBOR value to its JSON/YAML envelope form per the compatibility table: opaque
/// byte strings become `{"zcbor_bstr": "<hex>"}`, byte strings that are themselves valid CBOR
/// become `{"zcbor_bstr": V}`, tags become `{"zcbor_tag": n, "zcbor_tag_val": V}`, and map
/// entries with a non-string key become `{"zcbor_keyvalN": {"key": K, "val": V}}`, numbered in
/// encounter order.
pub fn to_envelope(value: &Value) -> JsonValue {
    match value {
        Value::Integer(i) => integer_to_json(*i),
        Value::Float(f) => Number::from_f64(*f).map(JsonValue::Number).unwrap_or(JsonValue::Null),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Null => JsonValue::Null,
        Value::Bytes(b) => bytes_to_envelope(b),
        Value::Array(items) => JsonValue::Array(items.iter().map(to_envelope).collect()),
        Value::Tag(t, inner) => {
            let mut map = Map::new();
            map.insert("zcbor_tag".to_string(), JsonValue::Number((*t).into()));
            map.insert("zcbor_tag_val".to_string(), to_envelope(inner));
            JsonValue::Object(map)
        }
        Value::Map(entries) => map_to_envelope(entries),
        _ => JsonValue::Null,
    }
}

fn integer_to_json(i: Integer) -> JsonValue {
    if let Ok(v) = i64::try_from(i) {
        JsonValue::Number(Number::from(v))
    } else if let Ok(v) = u64::try_from(i) {
        JsonValue::Number(Number::from(v))
    } else {
        JsonValue::Null
    }
}

fn bytes_to_envelope(b: &[u8]) -> JsonValue {
    let mut cursor: &[u8] = b;
    match ciborium::de::from_reader::<Value, _>(&mut cursor) {
        Ok(inner) if cursor.is_empty() => {
            let mut map = Map::new();
            map.insert("zcbor_bstr".to_string(), to_envelope(&inner));
            JsonValue::Object(map)
        }
        _ => hex_bstr(b),
    }
}

fn hex_bstr(b: &[u8]) -> JsonValue {
    let mut map = Map::new();
    map.insert("zcbor_bstr".to_string(), JsonValue::String(hex::encode(b)));
    JsonValue::Object(map)
}

fn map_to_envelope(entries: &[(Value, Value)]) -> JsonValue {
    let mut map = Map::new();
    let mut counter = 0u32;
    for (k, v) in entries {
        if let Value::Text(s) = k {
            map.insert(s.clone(), to_envelope(v));
            continue;
        }
        let mut entry = Map::new();
        entry.insert("key".to_string(), to_envelope(k));
        entry.insert("val".to_string(), to_envelope(v));
        map.insert(format!("zcbor_keyval{}", counter), JsonValue::Object(entry));
        counter += 1;
    }
    JsonValue::Object(map)
}

/// The inverse of `to_envelope`.
pub fn from_envelope(value: &JsonValue) -> Result<Value, TranslationError> {
    match value {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => number_to_cbor(n),
        JsonValue::String(s) => Ok(Value::Text(s.clone())),
        JsonValue::Array(items) => array_from_envelope(items),
        JsonValue::Object(map) => object_from_envelope(map),
    }
}

fn array_from_envelope(items: &[JsonValue]) -> Result<Value, TranslationError> {
    if let [JsonValue::String(marker)] = items {
        if marker == "zcbor_undefined" {
            return Ok(Value::Null);
        }
    }
    Ok(Value::Array(items.iter().map(from_envelope).collect::<Result<_, _>>()?))
}

fn number_to_cbor(n: &Number) -> Result<Value, TranslationError> {
    if let Some(i) = n.as_i64() {
        Ok(Value::Integer(i.into()))
    } else if let Some(u) = n.as_u64() {
        Ok(Value::Integer(u.into()))
    } else if let Some(f) = n.as_f64() {
        Ok(Value::Float(f))
    } else {
        Err(TranslationError::Unrepresentable(format!("number {} has no CBOR representation", n)))
    }
}

fn object_from_envelope(map: &Map<String, JsonValue>) -> Result<Value, TranslationError> {
    if map.len() == 1 {
        if let Some(bstr) = map.get("zcbor_bstr") {
            return bstr_from_envelope(bstr);
        }
    }
    if let (Some(tag), Some(val)) = (map.get("zcbor_tag"), map.get("zcbor_tag_val")) {
        let t = tag
            .as_u64()
            .ok_or_else(|| TranslationError::Unrepresentable("zcbor_tag must be a non-negative integer".to_string()))?;
        return Ok(Value::Tag(t, Box::new(from_envelope(val)?)));
    }
    let mut entries = Vec::new();
    for (k, v) in map {
        if let Some(rest) = k.strip_prefix("zcbor_keyval") {
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                let obj = v.as_object().ok_or_else(|| TranslationError::Unrepresentable(format!("{} must be an object", k)))?;
                let key = obj.get("key").ok_or_else(|| TranslationError::Unrepresentable(format!("{} missing `key`", k)))?;
                let val = obj.get("val").ok_or_else(|| TranslationError::Unrepresentable(format!("{} missing `val`", k)))?;
                entries.push((from_envelope(key)?, from_envelope(val)?));
                continue;
            }
        }
        entries.push((Value::Text(k.clone()), from_envelope(v)?));
    }
    Ok(Value::Map(entries))
}

fn bstr_from_envelope(value: &JsonValue) -> Result<Value, TranslationError> {
    match value {
        JsonValue::String(hex_str) => {
            let bytes = hex::decode(hex_str).map_err(|e| TranslationError::Unrepresentable(e.to_string()))?;
            Ok(Value::Bytes(bytes))
        }
        other => {
            let inner = from_envelope(other)?;
            let mut buf = Vec::new();
            ciborium::ser::into_writer(&inner, &mut buf).map_err(|e| TranslationError::Unrepresentable(e.to_string()))?;
            Ok(Value::Bytes(buf))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::to_canonical_bytes;

    fn decode(hex_str: &str) -> Value {
        let bytes = hex::decode(hex_str).unwrap();
        ciborium::de::from_reader(&bytes[..]).unwrap()
    }

    #[test]
    fn non_string_map_key_becomes_numbered_keyval_entry() {
        let value = decode("a14001");
        let env = to_envelope(&value);
        let obj = env.as_object().unwrap();
        assert!(obj.contains_key("zcbor_keyval0"));
        let entry = obj["zcbor_keyval0"].as_object().unwrap();
        assert_eq!(entry["key"], serde_json::json!({"zcbor_bstr": ""}));
        assert_eq!(entry["val"], serde_json::json!(1));
    }

    #[test]
    fn envelope_round_trips_to_identical_canonical_cbor() {
        let value = decode("a14001");
        let env = to_envelope(&value);
        let back = from_envelope(&env).unwrap();
        assert_eq!(to_canonical_bytes(&value).unwrap(), to_canonical_bytes(&back).unwrap());
    }

    #[test]
    fn opaque_bytes_become_hex_string() {
        let value = Value::Bytes(vec![0xff, 0x00, 0xff]);
        let env = to_envelope(&value);
        assert_eq!(env, serde_json::json!({"zcbor_bstr": "ff00ff"}));
    }

    #[test]
    fn tag_round_trips_through_envelope() {
        let value = Value::Tag(55799, Box::new(Value::Integer(1.into())));
        let env = to_envelope(&value);
        let back = from_envelope(&env).unwrap();
        assert_eq!(to_canonical_bytes(&value).unwrap(), to_canonical_bytes(&back).unwrap());
    }
}
