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
//! C identifier naming shared by declaration emission (`typedef`) and body emission (`xcode`,
//! `entry`). Kept in one place so both passes name the same node identically, which `render`'s
//! dedup-by-name logic depends on.

use std::collections::HashSet;

use cddl_core::node::{bit_size, Graph, Kind, Literal, Node, NodeId};
use cddl_core::predicates::Predicates;

pub fn is_compound(kind: Kind) -> bool {
    matches!(kind, Kind::Map | Kind::List | Kind::Group | Kind::Union)
}

fn uint_type(node: &Node) -> &'static str {
    match bit_size(node.min_value.unwrap_or(0), node.max_value.unwrap_or(u32::MAX as i64)) {
        8 => "uint8_t",
        16 => "uint16_t",
        32 => "uint32_t",
        _ => "uint64_t",
    }
}

fn int_type(node: &Node) -> &'static str {
    match bit_size(node.min_value.unwrap_or(i32::MIN as i64), node.max_value.unwrap_or(i32::MAX as i64)) {
        8 => "int8_t",
        16 => "int16_t",
        32 => "int32_t",
        _ => "int64_t",
    }
}

/// Resolves a `Kind::Other` delegate node to the node it ultimately stands for.
pub fn resolved(graph: &Graph, id: NodeId) -> NodeId {
    match &graph.get(id).literal {
        Literal::Ref(name) => graph.resolve(name).unwrap_or(id),
        _ => id,
    }
}

/// The C type this node is referred to by, whether it owns a typedef or is a bare primitive.
pub fn type_name(graph: &Graph, id: NodeId) -> String {
    let node = graph.get(id);
    match node.kind {
        Kind::Uint => uint_type(node).to_string(),
        Kind::Int | Kind::Nint => int_type(node).to_string(),
        Kind::Float => "double".to_string(),
        Kind::Bstr | Kind::Tstr | Kind::Any => "struct zcbor_string".to_string(),
        Kind::Bool => "bool".to_string(),
        Kind::Nil | Kind::Undef => "void".to_string(),
        Kind::Other => {
            let target = resolved(graph, id);
            if target == id {
                "void".to_string()
            } else {
                type_name(graph, target)
            }
        }
        Kind::Map | Kind::List | Kind::Group | Kind::Union => raw_type_name(node),
    }
}

fn raw_type_name(node: &Node) -> String {
    format!("{}_{}_t", node.id_prefix, node.base_name)
}

/// The value-only tier of a compound's type name: the struct this node's own members need,
/// ignoring the extra key/cbor/choice companions a repeated instance of it would carry. Every
/// compound in this generator owns exactly one struct regardless of tier, so this coincides with
/// `type_name` today; it exists as its own function so `repeated_type_name` has something to
/// compare against when deciding whether the `_r` suffix is actually needed.
pub fn val_type_name(graph: &Graph, id: NodeId) -> String {
    type_name(graph, id)
}

/// The tier used for one repetition of a repeated compound node. Per §3.3, a node whose own
/// key/cbor/choice makes it more than a bare value (`self_repeated_multi_var_condition`) needs a
/// distinct identity from its value-only tier; where the two would otherwise collide, the
/// repeated tier is suffixed `_r`.
///
/// Not currently wired into typedef/xcode emission: doing so correctly would require emitting a
/// second, differently-shaped struct for such nodes (one with the key/cbor/choice fields folded
/// in), which this generator's one-struct-per-node declaration model does not do. Recorded as an
/// open question in DESIGN.md rather than force-fit.
pub fn repeated_type_name(graph: &Graph, preds: &Predicates, id: NodeId) -> String {
    let node = graph.get(id);
    if !is_compound(node.kind) {
        return type_name(graph, id);
    }
    if preds.self_repeated_multi_var_condition(graph, id) {
        let raw = raw_type_name(node);
        if val_type_name(graph, id) == raw {
            return format!("{}_r", raw);
        }
        raw
    } else {
        val_type_name(graph, id)
    }
}

/// The generated function name for `id`'s encode/decode body (`verb` is `"decode"`/`"encode"`).
pub fn fn_name(graph: &Graph, id: NodeId, verb: &str) -> String {
    let target = resolved(graph, id);
    let node = graph.get(target);
    format!("{}_{}_{}", verb, node.id_prefix, node.base_name)
}

/// The exported entry-point function name for an entry type.
pub fn entry_fn_name(graph: &Graph, id: NodeId, verb: &str) -> String {
    let node = graph.get(id);
    format!("cbor_{}_{}", verb, node.base_stem)
}

/// Post-order traversal (children before parents) of every node reachable from `roots`,
/// visiting each node once. Dependency-respecting order for both typedef and function
/// collection: a node referenced by another always appears first.
pub fn post_order_reachable(graph: &Graph, roots: &[NodeId]) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for &root in roots {
        visit(graph, root, &mut seen, &mut order);
    }
    order
}

fn visit(graph: &Graph, id: NodeId, seen: &mut HashSet<NodeId>, order: &mut Vec<NodeId>) {
    if !seen.insert(id) {
        return;
    }
    let node = graph.get(id);
    for &child in &node.children {
        visit(graph, child, seen, order);
    }
    if let Some(key) = node.key {
        visit(graph, key, seen, order);
    }
    if let Literal::Ref(name) = &node.literal {
        if let Some(target) = graph.resolve(name) {
            visit(graph, target, seen, order);
        }
    }
    order.push(id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cddl_core::parse_cddl;

    #[test]
    fn uint_type_picks_smallest_width() {
        let graph = parse_cddl("foo = 0..255\n").unwrap();
        let id = graph.resolve("foo").unwrap();
        assert_eq!(type_name(&graph, id), "uint8_t");
    }

    #[test]
    fn compound_type_name_uses_id_prefix_and_base_name() {
        let graph = parse_cddl("rec = { a: uint }\n").unwrap();
        let id = graph.resolve("rec").unwrap();
        assert_eq!(type_name(&graph, id), "rec_rec_t");
    }

    #[test]
    fn repeated_type_name_matches_type_name_for_plain_compound() {
        let graph = parse_cddl("rec = { a: uint, b: tstr }\n").unwrap();
        let preds = Predicates::new();
        let id = graph.resolve("rec").unwrap();
        assert_eq!(repeated_type_name(&graph, &preds, id), type_name(&graph, id));
    }

    #[test]
    fn repeated_type_name_matches_type_name_for_primitive() {
        let graph = parse_cddl("foo = 0..255\n").unwrap();
        let preds = Predicates::new();
        let id = graph.resolve("foo").unwrap();
        assert_eq!(repeated_type_name(&graph, &preds, id), type_name(&graph, id));
    }

    #[test]
    fn repeated_type_name_suffixes_self_repeated_union_to_avoid_collision() {
        let graph = parse_cddl("u = int / tstr / bool\n").unwrap();
        let preds = Predicates::new();
        let id = graph.resolve("u").unwrap();
        let raw = type_name(&graph, id);
        assert_eq!(repeated_type_name(&graph, &preds, id), format!("{}_r", raw));
    }

    #[test]
    fn post_order_visits_children_before_parent() {
        let graph = parse_cddl("outer = { inner: inner }\ninner = { a: uint }\n").unwrap();
        let outer = graph.resolve("outer").unwrap();
        let order = post_order_reachable(&graph, &[outer]);
        assert_eq!(*order.last().unwrap(), outer);
    }
}
