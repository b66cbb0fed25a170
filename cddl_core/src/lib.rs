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
//! Parses IETF CDDL ([RFC 8610](https://www.rfc-editor.org/info/rfc8610)) into a normalized
//! type graph. This crate owns the concrete-syntax AST (`ast`), the `nom` grammar (`parse`),
//! the lexical pre-pass that splits a source file into rule bodies (`lexer`), the typed graph
//! representation (`node`) everything downstream operates on, the lowering pass that builds it
//! (`lower`), graph normalization (`normalize`), and the shared predicate layer the C code
//! generator and data translator both query (`predicates`).

pub mod ast;
pub mod error;
pub mod hexfloat;
pub mod lexer;
pub mod lower;
pub mod naming;
pub mod node;
pub mod normalize;
pub mod parse;
pub mod predicates;

pub use error::CddlError;
pub use node::{bit_size, Graph, Kind, Literal, Node, NodeId};

/// Parses and fully normalizes a CDDL source file: splits and lowers every rule, inlines group
/// references, and validates every node-model invariant. This is the single entry point the
/// `cddl_codegen` and `cddl_translate` crates build on.
pub fn parse_cddl(source: &str) -> Result<Graph, CddlError> {
    let mut graph = lower::lower_cddl(source)?;
    normalize::flatten(&mut graph);
    normalize::post_validate(&graph)?;
    normalize::set_id_prefix(&mut graph);
    normalize::set_base_names(&mut graph);
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_schema_end_to_end() {
        let graph = parse_cddl("person = { name: tstr, age: uint, ? nickname: tstr }\n").unwrap();
        let id = graph.resolve("person").unwrap();
        let node = graph.get(id);
        assert_eq!(node.kind, Kind::Map);
        assert_eq!(node.children.len(), 3);
        assert_eq!(node.id_prefix, "person");
    }

    #[test]
    fn reports_invariant_violations() {
        let err = parse_cddl("bad = [a: int]\n").unwrap_err();
        assert!(matches!(err, CddlError::Validation(error::ValidationError::ListEntryHasKey(_))));
    }
}
