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
//! Walks a normalized `cddl_core::Graph` against CBOR data (`decode`), converts between CBOR and
//! a JSON/YAML-compatible envelope (`envelope`), and re-encodes values as canonical CBOR
//! (`canonical`), per RFC 8949 §4.2.

pub mod canonical;
pub mod decode;
pub mod envelope;
pub mod error;

pub use error::{DataValidationError, TranslationError};

use ciborium::value::Value;
use cddl_core::node::{Graph, NodeId};
use serde_json::Value as JsonValue;

/// Decodes `bytes` as CBOR, validates against `entry`, and converts the result to its
/// envelope-compatible JSON form (shared with YAML output).
pub fn cbor_to_json(graph: &Graph, entry: NodeId, bytes: &[u8]) -> Result<JsonValue, TranslationError> {
    let value = decode::decode_and_validate(graph, entry, bytes)?;
    Ok(envelope::to_envelope(&value))
}

/// Decodes `bytes` as CBOR, validates against `entry`, and serializes the result as YAML text
/// through the same envelope used for JSON.
pub fn cbor_to_yaml(graph: &Graph, entry: NodeId, bytes: &[u8]) -> Result<String, TranslationError> {
    let json = cbor_to_json(graph, entry, bytes)?;
    serde_yaml::to_string(&json).map_err(|e| TranslationError::Unrepresentable(e.to_string()))
}

/// Converts an envelope-form JSON value back to CBOR, validates it against `entry`, and
/// re-encodes it as canonical CBOR bytes.
pub fn json_to_canonical_cbor(graph: &Graph, entry: NodeId, json: &JsonValue) -> Result<Vec<u8>, TranslationError> {
    let value: Value = envelope::from_envelope(json)?;
    decode::validate(graph, entry, &value)?;
    canonical::to_canonical_bytes(&value)
}

/// Parses `text` as YAML into the envelope form, then converts it back to canonical CBOR bytes
/// validated against `entry`.
pub fn yaml_to_canonical_cbor(graph: &Graph, entry: NodeId, text: &str) -> Result<Vec<u8>, TranslationError> {
    let json: JsonValue = serde_yaml::from_str(text).map_err(|e| TranslationError::YamlDecode(e.to_string()))?;
    json_to_canonical_cbor(graph, entry, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cddl_core::parse_cddl;

    #[test]
    fn round_trips_yaml_envelope_to_identical_canonical_cbor() {
        let graph = parse_cddl(r#"m = { "id": uint }"#).unwrap();
        let entry = graph.resolve("m").unwrap();
        let bytes = hex::decode("a1626964182a").unwrap();
        let yaml = cbor_to_yaml(&graph, entry, &bytes).unwrap();
        let round_tripped = yaml_to_canonical_cbor(&graph, entry, &yaml).unwrap();
        let canonical_original = canonical::to_canonical_bytes(&decode::decode_and_validate(&graph, entry, &bytes).unwrap()).unwrap();
        assert_eq!(round_tripped, canonical_original);
    }

    #[test]
    fn json_conversion_rejects_invalid_data() {
        let graph = parse_cddl(r#"m = { "id": uint }"#).unwrap();
        let entry = graph.resolve("m").unwrap();
        let json = serde_json::json!({"no": 42});
        assert!(json_to_canonical_cbor(&graph, entry, &json).is_err());
    }
}
