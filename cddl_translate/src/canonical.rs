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
//! RFC 8949 §4.2 canonical-CBOR re-encoding. `ciborium`'s encoder already emits minimal-length
//! integers and definite-length containers on its own, so the one rule left to apply here is
//! sorting every map's entries by the byte order of their encoded key.

use ciborium::value::Value;

use crate::error::TranslationError;

/// Returns a structurally equivalent value with every map's entries sorted by the byte order of
/// their CBOR-encoded key, recursively.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Map(entries) => {
            let mut sorted: Vec<(Vec<u8>, Value, Value)> = entries
                .iter()
                .map(|(k, v)| (encode(k), canonicalize(k), canonicalize(v)))
                .collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Map(sorted.into_iter().map(|(_, k, v)| (k, v)).collect())
        }
        Value::Tag(t, inner) => Value::Tag(*t, Box::new(canonicalize(inner))),
        other => other.clone(),
    }
}

fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf).unwrap_or_default();
    buf
}

/// Serializes `value` to canonical-form CBOR bytes.
pub fn to_canonical_bytes(value: &Value) -> Result<Vec<u8>, TranslationError> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&canonicalize(value), &mut buf).map_err(|e| TranslationError::Unrepresentable(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_map_keys_by_encoded_byte_order() {
        let value = Value::Map(vec![
            (Value::Text("aa".to_string()), Value::Integer(1.into())),
            (Value::Text("b".to_string()), Value::Integer(2.into())),
        ]);
        let Value::Map(sorted) = canonicalize(&value) else { panic!("expected a map") };
        let Value::Text(first_key) = &sorted[0].0 else { panic!("expected a text key") };
        assert_eq!(first_key, "b");
    }

    #[test]
    fn canonicalizes_nested_arrays_and_tags() {
        let value = Value::Tag(55799, Box::new(Value::Array(vec![Value::Integer(1.into())])));
        let bytes = to_canonical_bytes(&value).unwrap();
        assert!(!bytes.is_empty());
    }
}
