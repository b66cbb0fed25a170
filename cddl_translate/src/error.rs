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
//! Translator-side error taxonomy: failures validating a CBOR value against the graph, and
//! failures converting between CBOR, JSON and YAML.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataValidationError {
    #[error("expected {expected} at `{path}`, found a different CBOR major type")]
    WrongType { path: String, expected: &'static str },
    #[error("value at `{path}` is outside the allowed range")]
    OutOfRange { path: String },
    #[error("value at `{path}` has the wrong size")]
    WrongSize { path: String },
    #[error("value at `{path}` does not match the expected literal")]
    WrongValue { path: String },
    #[error("missing required map key `{key}` at `{path}`")]
    MissingKey { path: String, key: String },
    #[error("unexpected CBOR tag {found} at `{path}`, expected {expected}")]
    WrongTag { path: String, expected: i64, found: i64 },
    #[error("no alternative of the union at `{path}` matched: {}", attempts.join("; "))]
    UnionExhausted { path: String, attempts: Vec<String> },
    #[error("malformed CBOR structure at `{path}`: {reason}")]
    Malformed { path: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    #[error("failed to parse input as CBOR: {0}")]
    CborDecode(String),
    #[error("failed to parse input as JSON: {0}")]
    JsonDecode(String),
    #[error("failed to parse input as YAML: {0}")]
    YamlDecode(String),
    #[error("value cannot be represented in the target format: {0}")]
    Unrepresentable(String),
    #[error(transparent)]
    Validation(#[from] DataValidationError),
}
