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
//! Walks a `ciborium::value::Value` against a normalized graph: unwraps expected tags, checks
//! the dynamic CBOR type against the node's kind, applies value/size/range/bitmask checks, and
//! recurses into children (array elements, map `(key, value)` pairs, or union alternatives).

use std::convert::{TryFrom, TryInto};

use ciborium::value::Value;

use cddl_core::node::{Graph, Kind, Literal, Node, NodeId};

use crate::error::{DataValidationError, TranslationError};

/// Decodes `bytes` as CBOR and validates the result against `entry`.
pub fn decode_and_validate(graph: &Graph, entry: NodeId, bytes: &[u8]) -> Result<Value, TranslationError> {
    let value: Value = ciborium::de::from_reader(bytes).map_err(|e| TranslationError::CborDecode(e.to_string()))?;
    validate(graph, entry, &value)?;
    Ok(value)
}

/// Validates `value` against node `id`, per §4.5's per-node check order.
pub fn validate(graph: &Graph, id: NodeId, value: &Value) -> Result<(), DataValidationError> {
    validate_at(graph, id, value, "$")
}

fn wrong_type(path: &str, expected: &'static str) -> DataValidationError {
    DataValidationError::WrongType { path: path.to_string(), expected }
}

fn unwrap_tags<'v>(node: &Node, mut value: &'v Value, path: &str) -> Result<&'v Value, DataValidationError> {
    let mut expected = node.tags.iter().copied();
    loop {
        match (value, expected.next()) {
            (Value::Tag(found, inner), Some(want)) => {
                if *found as i64 != want {
                    return Err(DataValidationError::WrongTag { path: path.to_string(), expected: want, found: *found as i64 });
                }
                value = inner;
            }
            (Value::Tag(found, _), None) => {
                return Err(DataValidationError::WrongTag { path: path.to_string(), expected: -1, found: *found as i64 });
            }
            (_, Some(want)) => {
                return Err(DataValidationError::WrongTag { path: path.to_string(), expected: want, found: -1 });
            }
            (_, None) => return Ok(value),
        }
    }
}

fn validate_at(graph: &Graph, id: NodeId, value: &Value, path: &str) -> Result<(), DataValidationError> {
    let node = graph.get(id);
    let value = unwrap_tags(node, value, path)?;

    match node.kind {
        Kind::Any => Ok(()),
        Kind::Int | Kind::Uint | Kind::Nint => validate_int(node, value, path),
        Kind::Float => validate_float(node, value, path),
        Kind::Bstr => validate_bstr(graph, node, value, path),
        Kind::Tstr => validate_tstr(node, value, path),
        Kind::Bool => match value {
            Value::Bool(b) => validate_literal_bool(node, *b, path),
            _ => Err(wrong_type(path, "bool")),
        },
        Kind::Nil => match value {
            Value::Null => Ok(()),
            _ => Err(wrong_type(path, "null")),
        },
        Kind::Undef => match value {
            Value::Null => Ok(()),
            _ => Err(wrong_type(path, "undefined")),
        },
        Kind::List => validate_list(graph, node, value, path),
        Kind::Map => validate_map(graph, node, value, path),
        Kind::Group => node.children.iter().try_for_each(|c| validate_at(graph, *c, value, path)),
        Kind::Union => validate_union(graph, node, value, path),
        Kind::Other => match &node.literal {
            Literal::Ref(name) => match graph.resolve(name) {
                Some(target) => validate_at(graph, target, value, path),
                None => Ok(()),
            },
            _ => Ok(()),
        },
    }
}

fn check_range(node: &Node, n: f64, path: &str) -> Result<(), DataValidationError> {
    if let Some(min) = node.min_value {
        if n < min as f64 {
            return Err(DataValidationError::OutOfRange { path: path.to_string() });
        }
    }
    if let Some(max) = node.max_value {
        if n > max as f64 {
            return Err(DataValidationError::OutOfRange { path: path.to_string() });
        }
    }
    if let Some(min) = node.min_value_f {
        if n < min {
            return Err(DataValidationError::OutOfRange { path: path.to_string() });
        }
    }
    if let Some(max) = node.max_value_f {
        if n > max {
            return Err(DataValidationError::OutOfRange { path: path.to_string() });
        }
    }
    Ok(())
}

fn check_size(node: &Node, len: usize, path: &str) -> Result<(), DataValidationError> {
    if let Some(size) = node.size {
        if len as i64 != size {
            return Err(DataValidationError::WrongSize { path: path.to_string() });
        }
    }
    if let Some(min) = node.min_size {
        if (len as i64) < min {
            return Err(DataValidationError::WrongSize { path: path.to_string() });
        }
    }
    if let Some(max) = node.max_size {
        if (len as i64) > max {
            return Err(DataValidationError::WrongSize { path: path.to_string() });
        }
    }
    Ok(())
}

fn validate_int(node: &Node, value: &Value, path: &str) -> Result<(), DataValidationError> {
    let Value::Integer(i) = value else { return Err(wrong_type(path, "integer")) };
    let n: i64 = (*i).try_into().map_err(|_| DataValidationError::OutOfRange { path: path.to_string() })?;
    if node.kind == Kind::Uint && n < 0 {
        return Err(wrong_type(path, "uint"));
    }
    if node.kind == Kind::Nint && n >= 0 {
        return Err(wrong_type(path, "nint"));
    }
    if let Literal::Int(expected) = node.literal {
        if n != expected {
            return Err(DataValidationError::WrongValue { path: path.to_string() });
        }
    }
    check_range(node, n as f64, path)
}

fn validate_float(node: &Node, value: &Value, path: &str) -> Result<(), DataValidationError> {
    let f = match value {
        Value::Float(f) => *f,
        Value::Integer(i) => {
            i64::try_from(*i).map(|v| v as f64).map_err(|_| DataValidationError::OutOfRange { path: path.to_string() })?
        }
        _ => return Err(wrong_type(path, "float")),
    };
    check_range(node, f, path)
}

fn validate_bstr(graph: &Graph, node: &Node, value: &Value, path: &str) -> Result<(), DataValidationError> {
    let Value::Bytes(b) = value else { return Err(wrong_type(path, "bytes")) };
    check_size(node, b.len(), path)?;
    if let Literal::Bstr(expected) = &node.literal {
        if b != expected {
            return Err(DataValidationError::WrongValue { path: path.to_string() });
        }
    }
    if let Some(cbor_id) = node.cbor {
        let mut cursor: &[u8] = b;
        let inner: Value = ciborium::de::from_reader(&mut cursor)
            .map_err(|e| DataValidationError::Malformed { path: path.to_string(), reason: e.to_string() })?;
        if !cursor.is_empty() {
            return Err(DataValidationError::Malformed {
                path: path.to_string(),
                reason: "trailing bytes after nested CBOR payload".to_string(),
            });
        }
        validate_at(graph, cbor_id, &inner, &format!("{}/cbor", path))?;
    }
    Ok(())
}

fn validate_tstr(node: &Node, value: &Value, path: &str) -> Result<(), DataValidationError> {
    let Value::Text(s) = value else { return Err(wrong_type(path, "text")) };
    check_size(node, s.len(), path)?;
    if let Literal::Tstr(expected) = &node.literal {
        if s != expected {
            return Err(DataValidationError::WrongValue { path: path.to_string() });
        }
    }
    Ok(())
}

fn validate_literal_bool(node: &Node, b: bool, path: &str) -> Result<(), DataValidationError> {
    if let Literal::Bool(expected) = node.literal {
        if b != expected {
            return Err(DataValidationError::WrongValue { path: path.to_string() });
        }
    }
    Ok(())
}

fn validate_list(graph: &Graph, node: &Node, value: &Value, path: &str) -> Result<(), DataValidationError> {
    let Value::Array(items) = value else { return Err(wrong_type(path, "array")) };
    let mut iter = items.iter();
    for (idx, &child) in node.children.iter().enumerate() {
        let child_node = graph.get(child);
        let item_path = format!("{}[{}]", path, idx);
        let mut consumed: i64 = 0;
        loop {
            if let Some(max) = child_node.max_qty {
                if consumed >= max {
                    break;
                }
            }
            let Some(item) = iter.clone().next() else { break };
            if validate_at(graph, child, item, &item_path).is_err() {
                break;
            }
            iter.next();
            consumed += 1;
        }
        if consumed < child_node.min_qty {
            return Err(DataValidationError::Malformed {
                path: item_path,
                reason: format!("expected at least {} element(s)", child_node.min_qty),
            });
        }
    }
    Ok(())
}

fn validate_map(graph: &Graph, node: &Node, value: &Value, path: &str) -> Result<(), DataValidationError> {
    let Value::Map(entries) = value else { return Err(wrong_type(path, "map")) };
    for &child in &node.children {
        let child_node = graph.get(child);
        let field_path = format!("{}.{}", path, child_node.base_name);
        let key_id = child_node.key.ok_or_else(|| DataValidationError::Malformed {
            path: path.to_string(),
            reason: "map entry missing a key node".to_string(),
        })?;
        let found = entries.iter().find(|(k, _)| validate_at(graph, key_id, k, &field_path).is_ok());
        match found {
            Some((_, v)) => validate_at(graph, child, v, &field_path)?,
            None if child_node.is_optional() => {}
            None => {
                return Err(DataValidationError::MissingKey { path: path.to_string(), key: child_node.base_name.clone() });
            }
        }
    }
    Ok(())
}

fn validate_union(graph: &Graph, node: &Node, value: &Value, path: &str) -> Result<(), DataValidationError> {
    let mut attempts = Vec::new();
    for &child in &node.children {
        match validate_at(graph, child, value, path) {
            Ok(()) => return Ok(()),
            Err(e) => attempts.push(e.to_string()),
        }
    }
    Err(DataValidationError::UnionExhausted { path: path.to_string(), attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cddl_core::parse_cddl;

    fn cbor(hex_str: &str) -> Value {
        let bytes = hex::decode(hex_str).unwrap();
        ciborium::de::from_reader(&bytes[..]).unwrap()
    }

    #[test]
    fn validates_map_with_expected_key_string() {
        let graph = parse_cddl(r#"m = { "id": uint }"#).unwrap();
        let id = graph.resolve("m").unwrap();
        let value = cbor("a1626964182a");
        assert!(validate(&graph, id, &value).is_ok());
    }

    #[test]
    fn rejects_map_missing_a_required_key() {
        let graph = parse_cddl(r#"m = { "id": uint }"#).unwrap();
        let id = graph.resolve("m").unwrap();
        let value = cbor("a1626e6f182a");
        assert!(matches!(validate(&graph, id, &value), Err(DataValidationError::MissingKey { .. })));
    }

    #[test]
    fn accepts_nested_cbor_with_exact_consumption() {
        let graph = parse_cddl("payload = bstr .cbor uint").unwrap();
        let id = graph.resolve("payload").unwrap();
        let value = cbor("42182a");
        assert!(validate(&graph, id, &value).is_ok());
    }

    #[test]
    fn rejects_nested_cbor_with_trailing_bytes() {
        let graph = parse_cddl("payload = bstr .cbor uint").unwrap();
        let id = graph.resolve("payload").unwrap();
        let value = cbor("43182aff");
        assert!(matches!(validate(&graph, id, &value), Err(DataValidationError::Malformed { .. })));
    }

    #[test]
    fn union_reports_all_failed_alternatives() {
        let graph = parse_cddl("u = 1 / 2\n").unwrap();
        let id = graph.resolve("u").unwrap();
        let value = Value::Integer(4.into());
        match validate(&graph, id, &value) {
            Err(DataValidationError::UnionExhausted { attempts, .. }) => assert_eq!(attempts.len(), 2),
            other => panic!("expected UnionExhausted, got {:?}", other),
        }
    }
}
