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
//! Boolean predicates shared by the C code generator's declaration pass and body-emission
//! pass. Both passes must reach the same answer for the same node, which is why these live in
//! `cddl_core` rather than in `cddl_codegen`: a declaration that is skipped but whose body is
//! emitted (or vice versa) is a generator bug.
//!
//! Results are memoized per `Graph` in a `Predicates` cache keyed by `NodeId`, since several of
//! these walk a node's whole subtree and are queried repeatedly during emission.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::node::{Graph, Kind, NodeId};

/// Per-graph memoization cache for the predicates below. Each field is a separate cache since
/// the predicates are queried independently and a node can be "present" but not "repeated".
#[derive(Default)]
pub struct Predicates {
    present: RefCell<HashMap<NodeId, bool>>,
    count: RefCell<HashMap<NodeId, bool>>,
    key_var: RefCell<HashMap<NodeId, bool>>,
    cbor_var: RefCell<HashMap<NodeId, bool>>,
    choice_var: RefCell<HashMap<NodeId, bool>>,
    skip: RefCell<HashMap<NodeId, bool>>,
    delegate: RefCell<HashMap<NodeId, bool>>,
    range_check: RefCell<HashMap<NodeId, bool>>,
    single_func: RefCell<HashMap<NodeId, bool>>,
    repeated_single_func: RefCell<HashMap<NodeId, bool>>,
    self_repeated_multi_var: RefCell<HashMap<NodeId, bool>>,
    multi_val: RefCell<HashMap<NodeId, bool>>,
    repeated_multi_var: RefCell<HashMap<NodeId, bool>>,
    multi_var: RefCell<HashMap<NodeId, bool>>,
}

fn memo(cache: &RefCell<HashMap<NodeId, bool>>, id: NodeId, f: impl FnOnce() -> bool) -> bool {
    if let Some(v) = cache.borrow().get(&id) {
        return *v;
    }
    let v = f();
    cache.borrow_mut().insert(id, v);
    v
}

impl Predicates {
    pub fn new() -> Self {
        Predicates::default()
    }

    /// Whether the decoder needs a local "was this optional field present?" boolean: true for
    /// any node with `min_qty == 0` whose absence the caller must be able to observe (i.e. not
    /// a default-valued optional, which resolves silently to its default instead).
    pub fn present_var_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.present, id, || {
            let node = graph.get(id);
            node.is_optional() && node.default.is_none()
        })
    }

    /// Whether the decoder needs a running element counter: true for repeated elements whose
    /// multiplicity is bounded (so the generated loop must check it) or that are referenced by
    /// a `count_var_condition` elsewhere (callers pass that in via `also_counted`).
    pub fn count_var_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.count, id, || {
            let node = graph.get(id);
            node.is_repeated() && node.max_qty.is_some()
        })
    }

    /// Whether this node's key must be captured into a local variable before the value is
    /// decoded (true whenever the key itself is not a fixed literal, e.g. `tstr => int`).
    pub fn key_var_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.key_var, id, || {
            graph
                .get(id)
                .key
                .map(|k| !matches!(graph.get(k).kind, Kind::Other) && !is_fixed_literal(graph, k))
                .unwrap_or(false)
        })
    }

    /// Whether this node carries a nested `.cbor`/`.cborseq` payload that must be decoded via a
    /// scratch buffer variable.
    pub fn cbor_var_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.cbor_var, id, || graph.get(id).cbor.is_some())
    }

    /// Whether a union node needs a "which alternative matched" discriminant variable: true
    /// whenever it has more than one alternative (a single-alternative union needs none).
    pub fn choice_var_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.choice_var, id, || {
            let node = graph.get(id);
            node.kind == Kind::Union && node.children.len() > 1
        })
    }

    /// Whether this node can be skipped entirely by the decoder: an optional node with a
    /// default and no side effects worth observing (the default is substituted in C, not
    /// decoded from the wire).
    pub fn skip_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.skip, id, || {
            let node = graph.get(id);
            node.is_optional() && node.default.is_some()
        })
    }

    /// Whether this node is purely a reference to another named type and can therefore call
    /// that type's generated function directly, rather than emitting a decode body inline.
    pub fn delegate_type_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.delegate, id, || {
            let node = graph.get(id);
            node.kind == Kind::Other && node.tags.is_empty() && node.cbor.is_none()
        })
    }

    /// Whether a numeric range check must be emitted (the node has a tighter bound than its
    /// kind's natural wire range).
    pub fn range_check_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.range_check, id, || {
            let node = graph.get(id);
            node.min_value.is_some() || node.max_value.is_some() || node.min_value_f.is_some() || node.max_value_f.is_some()
        })
    }

    /// Whether this node, and everything inside it, can be emitted as a single non-static
    /// function (no repeats, unions or nested nodes needing their own entry points). Used to
    /// avoid emitting a separate trivial wrapper function for a leaf type.
    pub fn single_func_impl_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.single_func, id, || {
            let node = graph.get(id);
            !node.is_repeated() && node.children.iter().all(|c| self.repeated_single_func_impl_condition(graph, *c))
        })
    }

    /// As `single_func_impl_condition`, but for a node that is itself allowed to repeat (used
    /// when checking a container's children, where the container's own repetition is already
    /// accounted for by its caller).
    pub fn repeated_single_func_impl_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.repeated_single_func, id, || {
            let node = graph.get(id);
            node.kind != Kind::Union
                && node.children.iter().all(|c| self.repeated_single_func_impl_condition(graph, *c))
        })
    }

    /// Whether this node, on its own (ignoring any repetition of its container), needs one of
    /// the variables a repeated/multi-valued node needs: a captured key, a nested `.cbor`
    /// payload, or a choice discriminant.
    pub fn self_repeated_multi_var_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.self_repeated_multi_var, id, || {
            self.key_var_condition(graph, id) || self.cbor_var_condition(graph, id) || self.choice_var_condition(graph, id)
        })
    }

    /// Whether this node is a compound with more than one meaningful member: either it has more
    /// than one child outright, or its single child itself needs multiple variables to decode.
    pub fn multi_val_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.multi_val, id, || {
            let node = graph.get(id);
            matches!(node.kind, Kind::Map | Kind::List | Kind::Group | Kind::Union)
                && (node.children.len() > 1
                    || (node.children.len() == 1 && self.multi_member(graph, node.children[0])))
        })
    }

    /// Whether the repeated part of this node alone (its own key/cbor/choice, or its value being
    /// multi-valued) needs more than one variable to decode.
    pub fn repeated_multi_var_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.repeated_multi_var, id, || {
            self.self_repeated_multi_var_condition(graph, id) || self.multi_val_condition(graph, id)
        })
    }

    /// Whether the outer (non-repeated) shape of this node needs more than one variable to
    /// decode: true for a plain optional or a count-bounded repeat, which both add a variable
    /// beyond the value itself.
    pub fn multi_var_condition(&self, graph: &Graph, id: NodeId) -> bool {
        memo(&self.multi_var, id, || {
            self.present_var_condition(graph, id) || self.count_var_condition(graph, id)
        })
    }

    /// Whether decoding `id` needs more than one variable in total, combining both the outer
    /// (`multi_var_condition`) and repeated-part (`repeated_multi_var_condition`) tiers. Used
    /// only internally by `multi_val_condition` to check a compound's sole child.
    fn multi_member(&self, graph: &Graph, id: NodeId) -> bool {
        self.multi_var_condition(graph, id) || self.repeated_multi_var_condition(graph, id)
    }
}

fn is_fixed_literal(graph: &Graph, id: NodeId) -> bool {
    let node = graph.get(id);
    matches!(node.kind, Kind::Int | Kind::Uint | Kind::Nint | Kind::Tstr | Kind::Bstr | Kind::Bool)
        && node.min_value == node.max_value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::lower_cddl;
    use crate::normalize::flatten;

    #[test]
    fn present_var_needed_for_plain_optional() {
        let mut graph = lower_cddl("rec = { ? a: int }\n").unwrap();
        flatten(&mut graph);
        let id = graph.resolve("rec").unwrap();
        let child = graph.get(id).children[0];
        let preds = Predicates::new();
        assert!(preds.present_var_condition(&graph, child));
    }

    #[test]
    fn skip_condition_true_for_defaulted_optional() {
        let mut graph = lower_cddl("rec = { ? a: int .default 0 }\n").unwrap();
        flatten(&mut graph);
        let id = graph.resolve("rec").unwrap();
        let child = graph.get(id).children[0];
        let preds = Predicates::new();
        assert!(preds.skip_condition(&graph, child));
        assert!(!preds.present_var_condition(&graph, child));
    }

    #[test]
    fn choice_var_needed_for_multi_alternative_union() {
        let mut graph = lower_cddl("u = int / tstr / bool\n").unwrap();
        flatten(&mut graph);
        let id = graph.resolve("u").unwrap();
        let preds = Predicates::new();
        assert!(preds.choice_var_condition(&graph, id));
    }

    #[test]
    fn delegate_condition_true_for_plain_reference() {
        let mut graph = lower_cddl("a = b\nb = uint\n").unwrap();
        flatten(&mut graph);
        let id = graph.resolve("a").unwrap();
        let preds = Predicates::new();
        assert!(preds.delegate_type_condition(&graph, id));
    }

    #[test]
    fn repeated_single_func_cache_is_independent_of_single_func_cache() {
        let mut graph = lower_cddl("rec = { a: int / tstr }\n").unwrap();
        flatten(&mut graph);
        let id = graph.resolve("rec").unwrap();
        let child = graph.get(id).children[0];
        let preds = Predicates::new();
        // Querying the non-repeated predicate first must not poison the repeated one: a union
        // child fails `repeated_single_func_impl_condition` (Kind::Union) regardless of whether
        // `single_func_impl_condition` was asked about the same node first.
        let single = preds.single_func_impl_condition(&graph, child);
        assert!(single);
        let repeated = preds.repeated_single_func_impl_condition(&graph, child);
        assert!(!repeated);
    }

    #[test]
    fn self_repeated_multi_var_true_for_nested_cbor_payload() {
        let mut graph = lower_cddl("rec = { a: bstr .cbor int }\n").unwrap();
        flatten(&mut graph);
        let id = graph.resolve("rec").unwrap();
        let child = graph.get(id).children[0];
        let preds = Predicates::new();
        assert!(preds.cbor_var_condition(&graph, child));
        assert!(preds.self_repeated_multi_var_condition(&graph, child));
    }

    #[test]
    fn multi_val_true_for_map_with_more_than_one_child() {
        let mut graph = lower_cddl("rec = { a: int, b: tstr }\n").unwrap();
        flatten(&mut graph);
        let id = graph.resolve("rec").unwrap();
        let preds = Predicates::new();
        assert!(preds.multi_val_condition(&graph, id));
    }

    #[test]
    fn multi_val_false_for_single_plain_child() {
        let mut graph = lower_cddl("rec = { a: int }\n").unwrap();
        flatten(&mut graph);
        let id = graph.resolve("rec").unwrap();
        let preds = Predicates::new();
        assert!(!preds.multi_val_condition(&graph, id));
    }

    #[test]
    fn multi_var_true_for_count_bounded_repeat() {
        let mut graph = lower_cddl("rec = { a: 2*4 int }\n").unwrap();
        flatten(&mut graph);
        let id = graph.resolve("rec").unwrap();
        let child = graph.get(id).children[0];
        let preds = Predicates::new();
        assert!(preds.multi_var_condition(&graph, child));
    }

    #[test]
    fn repeated_multi_var_true_when_multi_val_is_true() {
        let mut graph = lower_cddl("rec = { a: { x: int, y: int } }\n").unwrap();
        flatten(&mut graph);
        let id = graph.resolve("rec").unwrap();
        let child = graph.get(id).children[0];
        let preds = Predicates::new();
        assert!(preds.multi_val_condition(&graph, child));
        assert!(preds.repeated_multi_var_condition(&graph, child));
    }
}
