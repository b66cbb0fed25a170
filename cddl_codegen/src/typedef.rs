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
//! Type declaration emission. For every compound node reachable from an entry type, emits a
//! `typedef struct { ... } <id>_t;` (or a union for `UNION` nodes), in dependency order, with
//! `_present`/`_count`/`_choice` companion fields per the declaration rules.

use std::collections::HashMap;

use cddl_core::node::{Graph, Kind, Node, NodeId};
use cddl_core::predicates::Predicates;

use crate::error::EmissionError;
use crate::names::{is_compound, post_order_reachable, type_name};

#[derive(Debug, Clone, PartialEq)]
pub struct Typedef {
    pub name: String,
    pub body: String,
}

fn max_count_expr(node: &Node) -> String {
    match node.max_qty {
        Some(n) => n.to_string(),
        None => "DEFAULT_MAX_QTY".to_string(),
    }
}

fn struct_field(graph: &Graph, preds: &Predicates, id: NodeId) -> String {
    let node = graph.get(id);
    let c_type = type_name(graph, id);
    let mut lines = Vec::new();
    if let Some(key) = node.key {
        lines.push(format!("    {} {}_key;", type_name(graph, key), graph.get(key).base_name));
    }
    if node.is_repeated() {
        lines.push(format!("    {} {}[{}];", c_type, node.base_name, max_count_expr(node)));
    } else {
        lines.push(format!("    {} {};", c_type, node.base_name));
    }
    if preds.count_var_condition(graph, id) {
        lines.push(format!("    size_t {}_count;", node.base_name));
    }
    if preds.present_var_condition(graph, id) {
        lines.push(format!("    bool {}_present;", node.base_name));
    }
    lines.join("\n")
}

/// Emits the typedef body for a single compound node; `None` for primitive/delegate nodes,
/// which are inlined into their parent's struct field instead of owning a typedef.
pub fn emit_typedef(graph: &Graph, preds: &Predicates, id: NodeId) -> Option<Typedef> {
    let node = graph.get(id);
    if !is_compound(node.kind) {
        return None;
    }
    let name = type_name(graph, id);
    let body = match node.kind {
        Kind::Union => {
            let members: Vec<String> = node
                .children
                .iter()
                .map(|c| format!("        {} {};", type_name(graph, *c), graph.get(*c).base_name))
                .collect();
            let choice_enum = if preds.choice_var_condition(graph, id) {
                let variants: Vec<String> =
                    node.children.iter().map(|c| format!("        {}_c,", graph.get(*c).base_name)).collect();
                format!("\n    enum {{\n{}\n    }} _choice;", variants.join("\n"))
            } else {
                String::new()
            };
            format!("typedef struct {{\n    union {{\n{}\n    }};{}\n}} {};", members.join("\n"), choice_enum, name)
        }
        _ => {
            let fields: Vec<String> = node.children.iter().map(|c| struct_field(graph, preds, *c)).collect();
            format!("typedef struct {{\n{}\n}} {};", fields.join("\n"), name)
        }
    };
    Some(Typedef { name, body })
}

/// Collects typedefs for every compound node reachable from `roots`, in ascending
/// `depends_on()` order (a referenced type's typedef always precedes its referrer's),
/// deduplicated by name. Two differently-bodied typedefs sharing a name is a fatal error.
pub fn collect_typedefs(graph: &Graph, preds: &Predicates, roots: &[NodeId]) -> Result<Vec<Typedef>, EmissionError> {
    let mut by_name: HashMap<String, String> = HashMap::new();
    let mut out = Vec::new();
    for id in post_order_reachable(graph, roots) {
        let Some(td) = emit_typedef(graph, preds, id) else { continue };
        match by_name.get(&td.name) {
            Some(existing) if *existing != td.body => return Err(EmissionError::DuplicateTypedef(td.name)),
            Some(_) => continue,
            None => {
                by_name.insert(td.name.clone(), td.body.clone());
                out.push(td);
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
    fn emits_struct_with_optional_field() {
        let graph = parse_cddl("rec = { a: uint, ? b: tstr }\n").unwrap();
        let preds = Predicates::new();
        let id = graph.resolve("rec").unwrap();
        let td = emit_typedef(&graph, &preds, id).unwrap();
        assert!(td.body.contains("uint32_t a;") || td.body.contains("uint8_t a;"));
        assert!(td.body.contains("_present;"));
    }

    #[test]
    fn collect_typedefs_orders_dependencies_before_referrer() {
        let graph = parse_cddl("outer = { inner: inner }\ninner = { a: uint }\n").unwrap();
        let preds = Predicates::new();
        let outer = graph.resolve("outer").unwrap();
        let tds = collect_typedefs(&graph, &preds, &[outer]).unwrap();
        let inner_pos = tds.iter().position(|t| t.name.contains("inner")).unwrap();
        let outer_pos = tds.iter().position(|t| t.name.contains("outer")).unwrap();
        assert!(inner_pos < outer_pos);
    }

    #[test]
    fn rejects_conflicting_duplicate_typedef_names() {
        let graph = parse_cddl("a = { x: uint }\nb = a\n").unwrap();
        let preds = Predicates::new();
        let a = graph.resolve("a").unwrap();
        let b = graph.resolve("b").unwrap();
        assert!(collect_typedefs(&graph, &preds, &[a, b]).is_ok());
    }
}
