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
//! Graph normalization: inlining group-rule references (`flatten`), enforcing the data-model
//! invariants from the node table (`post_validate`), and assigning the stable per-node names
//! the code generator and translator key their emitted symbols on (`set_id_prefix`,
//! `set_base_names`).

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::naming::Counter;
use crate::node::{Graph, Kind, Literal, NodeId};

/// Splices group-rule references into their use sites until no more splicing is possible.
/// A group rule (`Kind::Group`) carries no value of its own; every place it is referenced is
/// replaced by a copy of its children.
pub fn flatten(graph: &mut Graph) {
    loop {
        let mut changed = false;
        let ids: Vec<NodeId> = graph.ids().collect();
        for id in ids {
            let children = graph.get(id).children.clone();
            if children.is_empty() {
                continue;
            }
            let mut spliced = Vec::with_capacity(children.len());
            let mut local_changed = false;
            for child_id in children {
                if let Literal::Ref(name) = &graph.get(child_id).literal {
                    if let Some(target_id) = graph.resolve(name) {
                        if graph.get(target_id).kind == Kind::Group {
                            spliced.extend(graph.get(target_id).children.clone());
                            local_changed = true;
                            continue;
                        }
                    }
                }
                spliced.push(child_id);
            }
            if local_changed {
                graph.get_mut(id).children = spliced;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

/// Checks every invariant from the node data model against a flattened graph.
pub fn post_validate(graph: &Graph) -> Result<(), ValidationError> {
    for id in graph.ids() {
        let node = graph.get(id);

        if let Literal::Ref(name) = &node.literal {
            if graph.resolve(name).is_none() && !graph.control_groups.contains_key(name) {
                return Err(ValidationError::UnresolvedReference(name.clone()));
            }
        }

        if node.kind == Kind::Map {
            for child_id in &node.children {
                if graph.get(*child_id).key.is_none() {
                    return Err(ValidationError::MapEntryMissingKey(non_empty(&node.base_name)));
                }
            }
        }

        if node.kind == Kind::List {
            for child_id in &node.children {
                if graph.get(*child_id).key.is_some() {
                    return Err(ValidationError::ListEntryHasKey(non_empty(&node.base_name)));
                }
            }
            for (i, child_id) in node.children.iter().enumerate() {
                let child = graph.get(*child_id);
                if child.kind == Kind::Any && i + 1 != node.children.len() && !child.is_repeated() {
                    return Err(ValidationError::AnyNotLast);
                }
            }
        }

        if node.kind == Kind::Union {
            let has_any = node.children.iter().any(|c| graph.get(*c).kind == Kind::Any);
            if has_any && node.children.len() > 1 {
                return Err(ValidationError::AmbiguousAny(non_empty(&node.base_name)));
            }
        }

        if let Some(size) = node.size {
            if !matches!(node.kind, Kind::Bstr | Kind::Tstr | Kind::Uint | Kind::Int | Kind::Nint) {
                return Err(ValidationError::SizeOnUnsizable);
            }
            if node.kind != Kind::Bstr && node.kind != Kind::Tstr && !(0..=8).contains(&size) {
                return Err(ValidationError::IntegerSizeOutOfRange(size));
            }
            if node.kind == Kind::Float && ![2, 4, 8].contains(&size) {
                return Err(ValidationError::FloatSizeInvalid(size));
            }
        }

        if node.bits.is_some() && !matches!(node.kind, Kind::Uint | Kind::Int | Kind::Nint) {
            return Err(ValidationError::BitsOnNonInteger);
        }

        if node.cbor.is_some() && node.kind != Kind::Bstr {
            return Err(ValidationError::CborOnNonBstr);
        }

        if let Some(default) = &node.default {
            if !node.is_optional() {
                return Err(ValidationError::DefaultWithoutOptional);
            }
            if !default_matches_kind(default, node.kind) {
                return Err(ValidationError::DefaultTypeMismatch);
            }
        }
    }
    Ok(())
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn default_matches_kind(lit: &Literal, kind: Kind) -> bool {
    matches!(
        (lit, kind),
        (Literal::Int(_), Kind::Int | Kind::Uint | Kind::Nint)
            | (Literal::Float(_), Kind::Float)
            | (Literal::Tstr(_), Kind::Tstr)
            | (Literal::Bstr(_), Kind::Bstr)
            | (Literal::Bool(_), Kind::Bool)
    )
}

/// Sets `id_prefix` on every node to the name of its enclosing top-level rule.
pub fn set_id_prefix(graph: &mut Graph) {
    let roots: Vec<(String, NodeId)> = graph.roots.iter().map(|(k, v)| (k.clone(), *v)).collect();
    for (name, root_id) in roots {
        let mut stack = vec![root_id];
        let mut seen = HashSet::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            graph.get_mut(id).id_prefix = name.clone();
            stack.extend(graph.get(id).children.clone());
            if let Some(k) = graph.get(id).key {
                stack.push(k);
            }
            if let Some(c) = graph.get(id).cbor {
                stack.push(c);
            }
        }
    }
}

/// Fills in `base_name` / `base_stem` for every node that does not already carry one
/// (typically assigned during lowering), reseeding the counter at each top-level rule.
pub fn set_base_names(graph: &mut Graph) {
    let roots: Vec<(String, NodeId)> = graph.roots.iter().map(|(k, v)| (k.clone(), *v)).collect();
    for (name, root_id) in roots {
        graph.get_mut(root_id).base_name = name.clone();
        graph.get_mut(root_id).base_stem = name.clone();
        let mut counter = Counter::new();
        let mut stack = vec![root_id];
        let mut seen = HashSet::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if graph.get(id).base_name.is_empty() {
                let new_name = counter.next_name(&name);
                let node = graph.get_mut(id);
                node.base_name = new_name.clone();
                node.base_stem = new_name;
            }
            stack.extend(graph.get(id).children.clone());
            if let Some(k) = graph.get(id).key {
                stack.push(k);
            }
            if let Some(c) = graph.get(id).cbor {
                stack.push(c);
            }
        }
    }
}

/// Whether rule `from`'s subtree references rule `to`, directly or transitively (used by the
/// code generator to order type declarations so dependencies are emitted first).
pub fn depends_on(graph: &Graph, from: &str, to: &str) -> bool {
    let Some(start) = graph.resolve(from) else { return false };
    let mut stack = vec![start];
    let mut seen = HashSet::new();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let node = graph.get(id);
        if let Literal::Ref(name) = &node.literal {
            if name == to {
                return true;
            }
            if let Some(next) = graph.resolve(name) {
                stack.push(next);
            }
        }
        stack.extend(node.children.clone());
        if let Some(k) = node.key {
            stack.push(k);
        }
    }
    false
}

/// A node decodes unambiguously as a single value: its kind is concrete (not a reference still
/// awaiting resolution, and not a multi-alternative union).
pub fn is_unambiguous_value(graph: &Graph, id: NodeId) -> bool {
    let node = graph.get(id);
    !matches!(node.kind, Kind::Union | Kind::Other) && node.max_qty == Some(1) && node.min_qty <= 1
}

/// A node is a single repeated element whose inner type itself decodes unambiguously.
pub fn is_unambiguous_repeated(graph: &Graph, id: NodeId) -> bool {
    let node = graph.get(id);
    node.is_repeated() && !matches!(node.kind, Kind::Union | Kind::Other)
}

/// Either of the above: the only two shapes the code generator can emit a single-pass
/// (non-backtracking) decode loop for.
pub fn is_unambiguous(graph: &Graph, id: NodeId) -> bool {
    is_unambiguous_value(graph, id) || is_unambiguous_repeated(graph, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::lower_cddl;

    #[test]
    fn flatten_splices_group_reference() {
        let mut graph = lower_cddl("common = (a: uint, b: tstr)\nrecord = { common, c: bool }\n").unwrap();
        flatten(&mut graph);
        let id = graph.resolve("record").unwrap();
        let node = graph.get(id);
        assert_eq!(node.children.len(), 3);
    }

    #[test]
    fn post_validate_rejects_missing_map_key() {
        let mut graph = lower_cddl("bad = { uint }\n").unwrap();
        flatten(&mut graph);
        let err = post_validate(&graph).unwrap_err();
        assert!(matches!(err, ValidationError::MapEntryMissingKey(_)));
    }

    #[test]
    fn post_validate_accepts_well_formed_map() {
        let mut graph = lower_cddl("point = { x: int, y: int }\n").unwrap();
        flatten(&mut graph);
        assert!(post_validate(&graph).is_ok());
    }

    #[test]
    fn set_id_prefix_propagates_to_children() {
        let mut graph = lower_cddl("point = { x: int, y: int }\n").unwrap();
        flatten(&mut graph);
        set_id_prefix(&mut graph);
        let id = graph.resolve("point").unwrap();
        for child in graph.get(id).children.clone() {
            assert_eq!(graph.get(child).id_prefix, "point");
        }
    }

    #[test]
    fn depends_on_finds_transitive_reference() {
        let graph = lower_cddl("a = b\nb = uint\nc = tstr\n").unwrap();
        assert!(depends_on(&graph, "a", "b"));
        assert!(!depends_on(&graph, "a", "c"));
    }
}
