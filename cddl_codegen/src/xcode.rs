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
//! Function body emission. Every emitted function returns the boolean AND of a chain of
//! per-child calls into the `zcbor_*` runtime, following the per-kind chain shapes: primitives
//! call the matching runtime function directly, containers frame their children with
//! `*_start_*`/`*_end_*`, unions dispatch on a `_choice` discriminant, and optional/repeated
//! children are wrapped in `zcbor_present_*`/`zcbor_multi_*`.

use std::collections::HashMap;

use cddl_core::node::{bit_size, Graph, Kind, Node, NodeId};
use cddl_core::predicates::Predicates;

use crate::error::EmissionError;
use crate::names::{self, fn_name, post_order_reachable, resolved, type_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Decode,
    Encode,
}

impl Mode {
    pub fn verb(self) -> &'static str {
        match self {
            Mode::Decode => "decode",
            Mode::Encode => "encode",
        }
    }

    fn pointer_qualifier(self) -> &'static str {
        match self {
            Mode::Decode => "",
            Mode::Encode => "const ",
        }
    }

    pub fn arg_name(self) -> &'static str {
        match self {
            Mode::Decode => "result",
            Mode::Encode => "input",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub signature: String,
    pub body: String,
}

fn bits_for(node: &Node) -> u8 {
    bit_size(node.min_value.unwrap_or(0), node.max_value.unwrap_or(i32::MAX as i64))
}

fn primitive_call(graph: &Graph, id: NodeId, mode: Mode, accessor: &str) -> String {
    let node = graph.get(id);
    let arg = format!("(&{})", accessor);
    match node.kind {
        Kind::Uint => format!("zcbor_uint{}_{}(state, {})", bits_for(node), mode.verb(), arg),
        Kind::Int | Kind::Nint => format!("zcbor_int{}_{}(state, {})", bits_for(node), mode.verb(), arg),
        Kind::Float => format!("zcbor_float64_{}(state, {})", mode.verb(), arg),
        Kind::Bstr => format!("zcbor_bstr_{}(state, {})", mode.verb(), arg),
        Kind::Tstr => format!("zcbor_tstr_{}(state, {})", mode.verb(), arg),
        Kind::Any => "zcbor_any_skip(state, NULL)".to_string(),
        Kind::Bool => format!("zcbor_bool_{}(state, {})", mode.verb(), arg),
        Kind::Nil => format!("zcbor_nil_{}(state)", mode.verb()),
        Kind::Undef => format!("zcbor_undefined_{}(state)", mode.verb()),
        Kind::Other | Kind::Map | Kind::List | Kind::Group | Kind::Union => {
            format!("{}(state, {})", fn_name(graph, id, mode.verb()), arg)
        }
    }
}

fn range_check_expr(node: &Node) -> String {
    let mut checks = Vec::new();
    if let Some(min) = node.min_value {
        checks.push(format!("(*{} >= {})", node.base_name, min));
    }
    if let Some(max) = node.max_value {
        checks.push(format!("(*{} <= {})", node.base_name, max));
    }
    if let Some(min) = node.min_value_f {
        checks.push(format!("(*{} >= {})", node.base_name, min));
    }
    if let Some(max) = node.max_value_f {
        checks.push(format!("(*{} <= {})", node.base_name, max));
    }
    if let Some(bits) = &node.bits {
        checks.push(format!("zcbor_bits_check(*{}, {})", node.base_name, bits));
    }
    if checks.is_empty() {
        checks.push("true".to_string());
    }
    format!("(({}) || (zcbor_error(state, ZCBOR_ERR_WRONG_RANGE), false))", checks.join(" && "))
}

/// The struct-field access expression for `id` as seen from its parent's xcode function body.
fn accessor(mode: Mode, field: &str) -> String {
    format!("{}->{}", mode.arg_name(), field)
}

fn child_call(graph: &Graph, preds: &Predicates, id: NodeId, mode: Mode) -> String {
    let node = graph.get(id);
    let acc = accessor(mode, &node.base_name);
    let mut expr = primitive_call(graph, id, mode, &acc);

    if !node.tags.is_empty() {
        let tag_calls: Vec<String> =
            node.tags.iter().map(|t| format!("zcbor_tag_{}(state, {})", mode.verb(), t)).collect();
        expr = format!("({} && {})", tag_calls.join(" && "), expr);
    }

    if let Some(cbor) = node.cbor {
        let inner = child_call(graph, preds, cbor, mode);
        expr = format!(
            "(zcbor_bstr_start_{}(state) && ({}) && zcbor_bstr_end_{}(state))",
            mode.verb(),
            inner,
            mode.verb()
        );
    }

    if preds.range_check_condition(graph, id) {
        expr = format!("({} && {})", expr, range_check_expr(node));
    }

    if node.is_optional() && node.default.is_none() {
        expr = format!(
            "zcbor_present_{}(state, &{}_present, (void *){}, {})",
            mode.verb(),
            acc,
            "NULL",
            expr
        );
    } else if node.is_repeated() {
        let max = match node.max_qty {
            Some(n) => n.to_string(),
            None => "DEFAULT_MAX_QTY".to_string(),
        };
        expr = format!(
            "zcbor_multi_{}(state, {}, {}, &{}_count, (void *){}, sizeof({}))",
            mode.verb(),
            node.min_qty,
            max,
            acc,
            acc,
            type_name(graph, id)
        );
    }
    expr
}

fn framed_body(graph: &Graph, preds: &Predicates, id: NodeId, mode: Mode, frame: &str) -> String {
    let node = graph.get(id);
    let calls: Vec<String> = node.children.iter().map(|c| child_call(graph, preds, *c, mode)).collect();
    format!(
        "zcbor_{frame}_start_{verb}(state, {count})\n        && ({body})\n        && zcbor_{frame}_end_{verb}(state)",
        frame = frame,
        verb = mode.verb(),
        count = node.children.len(),
        body = calls.join("\n           && ")
    )
}

fn union_body(graph: &Graph, preds: &Predicates, id: NodeId, mode: Mode) -> String {
    let node = graph.get(id);
    match mode {
        Mode::Decode => {
            let arms: Vec<String> = node
                .children
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    format!(
                        "(zcbor_union_elem_code(state) && ({}) && (({}->_choice = {}) || 1))",
                        child_call(graph, preds, *c, mode),
                        mode.arg_name(),
                        i
                    )
                })
                .collect();
            format!(
                "zcbor_union_start_code(state)\n        && ({})\n        && zcbor_union_end_code(state)",
                arms.join("\n           || ")
            )
        }
        Mode::Encode => {
            let arms: Vec<String> = node
                .children
                .iter()
                .enumerate()
                .map(|(i, c)| format!("({}->_choice == {} ? ({}) : true)", mode.arg_name(), i, child_call(graph, preds, *c, mode)))
                .collect();
            arms.join("\n        && ")
        }
    }
}

/// The `&&`-chain expression implementing `id`'s encode/decode body, per the per-kind chain
/// shapes. Does not include the function signature; see `emit_function`.
pub fn body_expr(graph: &Graph, preds: &Predicates, id: NodeId, mode: Mode) -> String {
    let node = graph.get(id);
    match node.kind {
        Kind::Union => union_body(graph, preds, id, mode),
        Kind::Map => framed_body(graph, preds, id, mode, "map"),
        Kind::List => framed_body(graph, preds, id, mode, "list"),
        Kind::Group => {
            let calls: Vec<String> = node.children.iter().map(|c| child_call(graph, preds, *c, mode)).collect();
            calls.join("\n        && ")
        }
        Kind::Other => {
            let target = resolved(graph, id);
            if target == id {
                "true".to_string()
            } else {
                format!("{}(state, {})", fn_name(graph, target, mode.verb()), mode.arg_name())
            }
        }
        _ => primitive_call(graph, id, mode, &accessor(mode, &node.base_name)),
    }
}

pub fn signature(graph: &Graph, id: NodeId, mode: Mode) -> String {
    format!(
        "static bool {}(zcbor_state_t *state, {}{} *{})",
        fn_name(graph, id, mode.verb()),
        mode.pointer_qualifier(),
        type_name(graph, id),
        mode.arg_name()
    )
}

pub fn emit_function(graph: &Graph, preds: &Predicates, id: NodeId, mode: Mode) -> Function {
    let proto = signature(graph, id, mode);
    let body = format!("{} {{\n    return {};\n}}", proto, body_expr(graph, preds, id, mode));
    Function { name: fn_name(graph, id, mode.verb()), signature: format!("{};", proto), body }
}

/// Collects one function per compound node reachable from `roots`, deduplicated by name.
pub fn collect_functions(
    graph: &Graph,
    preds: &Predicates,
    roots: &[NodeId],
    mode: Mode,
) -> Result<Vec<Function>, EmissionError> {
    let mut by_name: HashMap<String, String> = HashMap::new();
    let mut out = Vec::new();
    for id in post_order_reachable(graph, roots) {
        if !names::is_compound(graph.get(id).kind) {
            continue;
        }
        let f = emit_function(graph, preds, id, mode);
        match by_name.get(&f.name) {
            Some(existing) if *existing != f.body => return Err(EmissionError::DuplicateFunction(f.name)),
            Some(_) => continue,
            None => {
                by_name.insert(f.name.clone(), f.body.clone());
                out.push(f);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cddl_core::parse_cddl;

    #[test]
    fn primitive_decode_body_calls_sized_uint_decode() {
        let graph = parse_cddl("foo = 0..65535\n").unwrap();
        let preds = Predicates::new();
        let id = graph.resolve("foo").unwrap();
        let body = body_expr(&graph, &preds, id, Mode::Decode);
        assert!(body.contains("zcbor_uint16_decode"));
    }

    #[test]
    fn map_decode_body_frames_with_start_and_end() {
        let graph = parse_cddl("rec = { a: uint }\n").unwrap();
        let preds = Predicates::new();
        let id = graph.resolve("rec").unwrap();
        let body = body_expr(&graph, &preds, id, Mode::Decode);
        assert!(body.starts_with("zcbor_map_start_decode"));
        assert!(body.ends_with("zcbor_map_end_decode(state)"));
    }

    #[test]
    fn optional_field_wrapped_in_present_decode() {
        let graph = parse_cddl("rec = { ? a: uint }\n").unwrap();
        let preds = Predicates::new();
        let id = graph.resolve("rec").unwrap();
        let body = body_expr(&graph, &preds, id, Mode::Decode);
        assert!(body.contains("zcbor_present_decode"));
    }

    #[test]
    fn union_decode_sets_choice_discriminant() {
        let graph = parse_cddl("u = int / tstr\n").unwrap();
        let preds = Predicates::new();
        let id = graph.resolve("u").unwrap();
        let body = body_expr(&graph, &preds, id, Mode::Decode);
        assert!(body.contains("_choice"));
    }

    #[test]
    fn collect_functions_dedups_shared_delegate() {
        let graph = parse_cddl("a = { x: shared }\nb = { y: shared }\nshared = { z: uint }\n").unwrap();
        let preds = Predicates::new();
        let a = graph.resolve("a").unwrap();
        let b = graph.resolve("b").unwrap();
        let funcs = collect_functions(&graph, &preds, &[a, b], Mode::Decode).unwrap();
        let shared_count = funcs.iter().filter(|f| f.name.contains("shared")).count();
        assert_eq!(shared_count, 1);
    }
}
