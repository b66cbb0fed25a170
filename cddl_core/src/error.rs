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
use thiserror::Error;

/// Error raised while splitting or parsing CDDL source text.
///
/// Errors accumulate a chain of context frames as they unwind: the innermost frame names the
/// offending substring, and each enclosing rule-parse adds the rule name being parsed, so a
/// caller sees which rule a deep syntax error happened inside.
#[derive(Error, Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub offending: String,
    pub context: Vec<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at \"{}\")", self.message, truncate(&self.offending))?;
        for frame in &self.context {
            write!(f, "\n  while parsing {}", frame)?;
        }
        Ok(())
    }
}

fn truncate(s: &str) -> String {
    const MAX: usize = 40;
    if s.len() > MAX {
        format!("{}...", &s[..MAX])
    } else {
        s.to_string()
    }
}

impl ParseError {
    pub fn new(message: impl Into<String>, offending: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            offending: offending.into(),
            context: Vec::new(),
        }
    }

    /// Adds a context frame naming the rule (or containing construct) being parsed when this
    /// error propagated out, without discarding the original offending substring.
    pub fn with_context(mut self, frame: impl Into<String>) -> Self {
        self.context.push(frame.into());
        self
    }
}

/// Error raised by `normalize::post_validate` when a parsed graph violates one of the §3.1
/// invariants, or by duplicate-rule-name detection during the lexical pre-pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("duplicate rule name: {0}")]
    DuplicateRule(String),
    #[error("map entry in rule {0:?} has no key")]
    MapEntryMissingKey(Option<String>),
    #[error("list entry in rule {0:?} must not have a key")]
    ListEntryHasKey(Option<String>),
    #[error("union in rule {0:?} mixes ANY with other alternatives")]
    AmbiguousAny(Option<String>),
    #[error("ANY inside a list must be last, or have a fixed quantifier")]
    AnyNotLast,
    #[error(".size applied to a kind that is not sizable")]
    SizeOnUnsizable,
    #[error(".bits applied to a non-integer kind")]
    BitsOnNonInteger,
    #[error("numeric control operator applied to a non-numeric kind")]
    NumericControlOnNonNumeric,
    #[error(".cbor/.cborseq applied to a kind other than bstr")]
    CborOnNonBstr,
    #[error("unresolved type reference: {0}")]
    UnresolvedReference(String),
    #[error("reference {0} does not resolve to the expected node class")]
    ReferenceClassMismatch(String),
    #[error("default value given without optional (?) quantifier")]
    DefaultWithoutOptional,
    #[error("default value type does not match the element's type")]
    DefaultTypeMismatch,
    #[error("integer size {0} out of range 0..=8")]
    IntegerSizeOutOfRange(i64),
    #[error("float size {0} is not one of 2, 4, 8")]
    FloatSizeInvalid(i64),
    #[error("control group member {0:?} is not a non-negative integer literal")]
    ControlGroupMemberNotUint(String),
    #[error("generic CDDL rules (parameterized types) are not supported: {0}")]
    GenericsNotSupported(String),
    #[error("unsupported control operator: .{0}")]
    UnsupportedControlOperator(String),
}

/// Error raised while emitting C source: two distinct declarations or function bodies sharing
/// a name, or a generator invariant violated ("unreachable" states).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmissionError {
    #[error("typedef name collision: {0} emitted with two different bodies")]
    TypedefNameCollision(String),
    #[error("function name collision: {0} emitted with two different bodies")]
    FunctionNameCollision(String),
    #[error("internal code generator error: {0}")]
    Internal(String),
}

/// Top-level error returned from the public `parse_cddl` entry point, covering every stage
/// from rule splitting through graph validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CddlError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
