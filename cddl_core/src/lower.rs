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
//! Reduces the concrete-syntax `Type`/`Group` trees from `parse.rs` into the typed `Node`
//! graph that the rest of the toolchain (normalizer, graph-query layer, code generator, data
//! translator) operates on.
//!
//! A rule whose entire body parses as `&( key: uint, ... )` is a control group: it is stored in
//! `Graph::control_groups` rather than `Graph::roots`, and is only reachable via `.bits`.
//! Everything else becomes a root `Node`, keyed by rule name.

use crate::ast::{self, GroupItem, MemberKey, Occurs, Operator, Type, Value};
use crate::error::{CddlError, ValidationError};
use crate::lexer::{self, RuleEntry};
use crate::naming::{latinize, Counter};
use crate::node::{ControlGroup, Graph, Kind, Literal, Node, NodeId};
use crate::parse;

/// The CDDL prelude (RFC8610 Appendix D): primitive type names available in every schema
/// without a user-supplied rule. A user rule with the same name overrides its prelude entry.
const PRELUDE: &[(&str, Kind)] = &[
    ("any", Kind::Any),
    ("uint", Kind::Uint),
    ("nint", Kind::Nint),
    ("int", Kind::Int),
    ("float16", Kind::Float),
    ("float32", Kind::Float),
    ("float64", Kind::Float),
    ("float", Kind::Float),
    ("bstr", Kind::Bstr),
    ("bytes", Kind::Bstr),
    ("tstr", Kind::Tstr),
    ("text", Kind::Tstr),
    ("bool", Kind::Bool),
    ("nil", Kind::Nil),
    ("null", Kind::Nil),
    ("undefined", Kind::Undef),
];

fn seed_prelude(graph: &mut Graph) {
    for (name, kind) in PRELUDE {
        let mut node = Node::new(*kind);
        node.base_name = (*name).to_string();
        let id = graph.alloc(node);
        graph.roots.insert((*name).to_string(), id);
    }
}

/// Parses and lowers a full CDDL source file into a `Graph`.
pub fn lower_cddl(source: &str) -> Result<Graph, CddlError> {
    let rules = lexer::split_rules(source)?;
    let mut graph = Graph::new();
    seed_prelude(&mut graph);

    for (name, entry) in &rules {
        if let Some(cg) = try_control_group(name, entry)? {
            graph.control_groups.insert(name.clone(), cg);
        }
    }

    for (name, entry) in &rules {
        if graph.control_groups.contains_key(name) {
            continue;
        }
        let mut counter = Counter::new();
        let id = lower_rule_body(name, entry, &mut graph, &mut counter)?;
        graph.roots.insert(name.clone(), id);
    }

    Ok(graph)
}

/// A rule body is a control group when it parses in full as a bare `&( ... )` group-enum type
/// whose members are all `name: <non-negative integer literal>` entries.
fn try_control_group(name: &str, entry: &RuleEntry) -> Result<Option<ControlGroup>, CddlError> {
    let trimmed = entry.body.trim();
    if !trimmed.starts_with('&') {
        return Ok(None);
    }
    let (rest, ty) = parse::type_rule_body(trimmed)
        .map_err(|_| parse_error_at("malformed control group", trimmed, name))?;
    if !rest.trim().is_empty() {
        return Err(parse_error_at("trailing input after control group", rest, name));
    }
    let group = match ty {
        Type::GroupEnum(g) => g,
        _ => return Ok(None),
    };
    let mut members = Vec::new();
    for item in &group {
        match item {
            GroupItem::Key(Some(key), Type::Value(Value::Int(n)), Occurs::Once) => {
                let member_name = match key.as_ref() {
                    MemberKey::FromValue(v) if matches!(v.as_ref(), Value::Tstr(_)) => match v.as_ref() {
                        Value::Tstr(s) => s.clone(),
                        _ => unreachable!(),
                    },
                    MemberKey::FromType(t) => match t.as_ref() {
                        Type::Rule(s) => s.clone(),
                        _ => return Err(ValidationError::ControlGroupMemberNotUint(format!("{:?}", item)).into()),
                    },
                    _ => return Err(ValidationError::ControlGroupMemberNotUint(format!("{:?}", item)).into()),
                };
                if *n < 0 {
                    return Err(ValidationError::ControlGroupMemberNotUint(member_name).into());
                }
                members.push((member_name, *n));
            }
            other => return Err(ValidationError::ControlGroupMemberNotUint(format!("{:?}", other)).into()),
        }
    }
    Ok(Some(ControlGroup { members }))
}

fn lower_rule_body(
    name: &str,
    entry: &RuleEntry,
    graph: &mut Graph,
    counter: &mut Counter,
) -> Result<NodeId, CddlError> {
    let as_type = parse::type_rule_body(&entry.body);
    if let Ok((rest, ty)) = as_type {
        if rest.trim().is_empty() {
            return convert_type(&ty, graph, counter, name).map_err(|e| e.with_frame(name));
        }
    }
    let (rest, group) = parse::group_rule_body(&entry.body)
        .map_err(|_| parse_error_at("malformed rule body", &entry.body, name))?;
    if !rest.trim().is_empty() {
        return Err(parse_error_at("trailing input after group rule", rest, name));
    }
    let mut node = Node::new(Kind::Group);
    node.base_name = name.to_string();
    node.children = convert_group_items(&group, graph, counter, name).map_err(|e| e.with_frame(name))?;
    Ok(graph.alloc(node))
}

/// Looks up a CDDL prelude primitive's concrete kind, if `name` names one.
fn prelude_kind(name: &str) -> Option<Kind> {
    PRELUDE.iter().find(|(n, _)| *n == name).map(|(_, k)| *k)
}

fn convert_type(ty: &Type, graph: &mut Graph, counter: &mut Counter, stem: &str) -> Result<NodeId, LowerErr> {
    match ty {
        Type::Value(v) => Ok(graph.alloc(literal_node(v))),
        Type::Rule(name) => {
            // A reference to a prelude primitive (uint, bstr, ...) is resolved to its concrete
            // kind immediately, since control operators (`.size`, `.bits`, ...) need to see it
            // at lowering time, before the graph-wide alias resolution in `normalize::flatten`.
            if let Some(kind) = prelude_kind(name) {
                let mut n = Node::new(kind);
                n.base_name = name.clone();
                return Ok(graph.alloc(n));
            }
            let mut n = Node::new(Kind::Other);
            n.literal = Literal::Ref(name.clone());
            Ok(graph.alloc(n))
        }
        Type::Unwrap(name) => {
            // Approximation: one level of map/array unwrap is resolved by the normalizer when
            // it flattens the reference; at lowering time this is indistinguishable from a
            // plain reference.
            let mut n = Node::new(Kind::Other);
            n.literal = Literal::Ref(name.clone());
            Ok(graph.alloc(n))
        }
        Type::Any => Ok(graph.alloc(Node::new(Kind::Any))),
        Type::Major(major, _ai) => {
            let kind = match major {
                0 => Kind::Uint,
                1 => Kind::Nint,
                2 => Kind::Bstr,
                3 => Kind::Tstr,
                4 => Kind::List,
                5 => Kind::Map,
                _ => Kind::Any,
            };
            Ok(graph.alloc(Node::new(kind)))
        }
        Type::Types(alts) => {
            let mut n = Node::new(Kind::Union);
            for alt in alts {
                let child_stem = counter.next_name(stem);
                let id = convert_type(alt, graph, counter, &child_stem)?;
                n.children.push(id);
            }
            Ok(graph.alloc(n))
        }
        Type::GroupEnum(group) => {
            let mut n = Node::new(Kind::Union);
            n.children = convert_group_items(group, graph, counter, stem)?;
            Ok(graph.alloc(n))
        }
        Type::GroupMap(group) => {
            let mut n = Node::new(Kind::Map);
            n.children = convert_group_items(group, graph, counter, stem)?;
            for child_id in &n.children {
                let child = graph.get(*child_id);
                if child.kind != Kind::Group && child.key.is_none() && !matches!(child.literal, Literal::Ref(_)) {
                    return Err(LowerErr::Validation(ValidationError::MapEntryMissingKey(Some(stem.to_string()))));
                }
            }
            Ok(graph.alloc(n))
        }
        Type::GroupArray(group) => {
            let mut n = Node::new(Kind::List);
            n.children = convert_group_items(group, graph, counter, stem)?;
            for child_id in &n.children {
                if graph.get(*child_id).key.is_some() {
                    return Err(LowerErr::Validation(ValidationError::ListEntryHasKey(Some(stem.to_string()))));
                }
            }
            check_any_not_last(&n.children, graph)?;
            Ok(graph.alloc(n))
        }
        Type::Tagged(tag, inner) => {
            let id = convert_type(inner, graph, counter, stem)?;
            if let Some(t) = tag {
                graph.get_mut(id).tags.push(*t);
            }
            Ok(id)
        }
        Type::Combined(left, right, op) => convert_combined(left, right, op, graph, counter, stem),
    }
}

fn check_any_not_last(children: &[NodeId], graph: &Graph) -> Result<(), LowerErr> {
    for (i, id) in children.iter().enumerate() {
        let node = graph.get(*id);
        if node.kind == Kind::Any && i + 1 != children.len() && !node.is_repeated() {
            return Err(LowerErr::Validation(ValidationError::AnyNotLast));
        }
    }
    Ok(())
}

fn convert_combined(
    left: &Type,
    right: &Type,
    op: &Operator,
    graph: &mut Graph,
    counter: &mut Counter,
    stem: &str,
) -> Result<NodeId, LowerErr> {
    match op {
        Operator::RangeIncl | Operator::RangeExcl => {
            let (lo, hi) = (extract_numeric(left)?, extract_numeric(right)?);
            let excl = matches!(op, Operator::RangeExcl);
            Ok(graph.alloc(range_node(lo, hi, excl)))
        }
        Operator::Control(name, arg) => {
            let id = convert_type(left, graph, counter, stem)?;
            apply_control(graph, id, name, arg.as_deref())?;
            Ok(id)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

fn extract_numeric(ty: &Type) -> Result<Num, LowerErr> {
    match ty {
        Type::Value(Value::Int(n)) => Ok(Num::Int(*n)),
        Type::Value(Value::Float(f)) => Ok(Num::Float(*f)),
        _ => Err(LowerErr::Validation(ValidationError::NumericControlOnNonNumeric)),
    }
}

fn range_node(lo: Num, hi: Num, excl: bool) -> Node {
    match (lo, hi) {
        (Num::Int(a), Num::Int(b)) => {
            let mut n = Node::new(if a < 0 { Kind::Int } else { Kind::Uint });
            n.min_value = Some(a);
            n.max_value = Some(if excl { b - 1 } else { b });
            n
        }
        _ => {
            let (a, b) = (as_f64(lo), as_f64(hi));
            let mut n = Node::new(Kind::Float);
            n.min_value_f = Some(a);
            n.max_value_f = Some(b);
            n
        }
    }
}

fn as_f64(n: Num) -> f64 {
    match n {
        Num::Int(i) => i as f64,
        Num::Float(f) => f,
    }
}

fn apply_control(graph: &mut Graph, id: NodeId, name: &str, arg: Option<&Type>) -> Result<(), LowerErr> {
    match name {
        "size" => {
            let node = graph.get(id);
            if !matches!(node.kind, Kind::Bstr | Kind::Tstr | Kind::Uint | Kind::Int | Kind::Nint) {
                return Err(LowerErr::Validation(ValidationError::SizeOnUnsizable));
            }
            match arg {
                Some(Type::Value(Value::Int(n))) => {
                    let node = graph.get_mut(id);
                    node.size = Some(*n);
                    node.min_size = Some(*n);
                    node.max_size = Some(*n);
                }
                Some(Type::Combined(lo, hi, Operator::RangeIncl)) => {
                    let (lo, hi) = (extract_numeric(lo)?, extract_numeric(hi)?);
                    if let (Num::Int(a), Num::Int(b)) = (lo, hi) {
                        let node = graph.get_mut(id);
                        node.min_size = Some(a);
                        node.max_size = Some(b);
                    }
                }
                _ => return Err(LowerErr::Validation(ValidationError::SizeOnUnsizable)),
            }
            Ok(())
        }
        "bits" => {
            let node = graph.get(id);
            if !matches!(node.kind, Kind::Uint | Kind::Int | Kind::Nint) {
                return Err(LowerErr::Validation(ValidationError::BitsOnNonInteger));
            }
            match arg {
                Some(Type::Rule(group_name)) => {
                    graph.get_mut(id).bits = Some(group_name.clone());
                    Ok(())
                }
                _ => Err(LowerErr::Validation(ValidationError::BitsOnNonInteger)),
            }
        }
        "cbor" | "cborseq" => {
            let node = graph.get(id);
            if node.kind != Kind::Bstr {
                return Err(LowerErr::Validation(ValidationError::CborOnNonBstr));
            }
            match arg {
                Some(Type::Rule(target)) => {
                    let mut inner = Node::new(Kind::Other);
                    inner.literal = Literal::Ref(target.clone());
                    let inner_id = graph.alloc(inner);
                    graph.get_mut(id).cbor = Some(inner_id);
                    Ok(())
                }
                _ => Err(LowerErr::Validation(ValidationError::CborOnNonBstr)),
            }
        }
        "default" => {
            let default_lit = arg.and_then(type_to_literal);
            match default_lit {
                Some(lit) => {
                    graph.get_mut(id).default = Some(lit);
                    Ok(())
                }
                None => Err(LowerErr::Validation(ValidationError::DefaultTypeMismatch)),
            }
        }
        "eq" => {
            let num = arg.map(extract_numeric).transpose()?;
            if let Some(n) = num {
                set_exact(graph, id, n);
            }
            Ok(())
        }
        "lt" => {
            apply_bound(graph, id, arg, |node, n| set_max(node, n, true))
        }
        "le" => apply_bound(graph, id, arg, |node, n| set_max(node, n, false)),
        "gt" => apply_bound(graph, id, arg, |node, n| set_min(node, n, true)),
        "ge" => apply_bound(graph, id, arg, |node, n| set_min(node, n, false)),
        other => Err(LowerErr::Validation(ValidationError::UnsupportedControlOperator(other.to_string()))),
    }
}

fn apply_bound(
    graph: &mut Graph,
    id: NodeId,
    arg: Option<&Type>,
    f: impl Fn(&mut Node, Num),
) -> Result<(), LowerErr> {
    let arg = arg.ok_or(LowerErr::Validation(ValidationError::NumericControlOnNonNumeric))?;
    let num = extract_numeric(arg)?;
    f(graph.get_mut(id), num);
    Ok(())
}

fn set_exact(graph: &mut Graph, id: NodeId, n: Num) {
    let node = graph.get_mut(id);
    match n {
        Num::Int(v) => {
            node.min_value = Some(v);
            node.max_value = Some(v);
        }
        Num::Float(v) => {
            node.min_value_f = Some(v);
            node.max_value_f = Some(v);
        }
    }
}

fn set_max(node: &mut Node, n: Num, exclusive: bool) {
    match n {
        Num::Int(v) => node.max_value = Some(if exclusive { v - 1 } else { v }),
        Num::Float(v) => node.max_value_f = Some(v),
    }
}

fn set_min(node: &mut Node, n: Num, exclusive: bool) {
    match n {
        Num::Int(v) => node.min_value = Some(if exclusive { v + 1 } else { v }),
        Num::Float(v) => node.min_value_f = Some(v),
    }
}

fn type_to_literal(ty: &Type) -> Option<Literal> {
    match ty {
        Type::Value(Value::Int(n)) => Some(Literal::Int(*n)),
        Type::Value(Value::Float(f)) => Some(Literal::Float(*f)),
        Type::Value(Value::Tstr(s)) => Some(Literal::Tstr(s.clone())),
        Type::Value(Value::Bytes(b)) => Some(Literal::Bstr(b.clone())),
        Type::Value(Value::Bool(b)) => Some(Literal::Bool(*b)),
        _ => None,
    }
}

fn literal_node(v: &Value) -> Node {
    match v {
        Value::Int(n) => {
            let mut node = Node::new(if *n < 0 { Kind::Int } else { Kind::Uint });
            node.literal = Literal::Int(*n);
            node.min_value = Some(*n);
            node.max_value = Some(*n);
            node
        }
        Value::Float(f) => {
            let mut node = Node::new(Kind::Float);
            node.literal = Literal::Float(*f);
            node.min_value_f = Some(*f);
            node.max_value_f = Some(*f);
            node
        }
        Value::Tstr(s) => {
            let mut node = Node::new(Kind::Tstr);
            node.literal = Literal::Tstr(s.clone());
            node
        }
        Value::Bytes(b) => {
            let mut node = Node::new(Kind::Bstr);
            node.literal = Literal::Bstr(b.clone());
            node
        }
        Value::Bool(b) => {
            let mut node = Node::new(Kind::Bool);
            node.literal = Literal::Bool(*b);
            node
        }
    }
}

fn convert_group_items(
    group: &ast::Group,
    graph: &mut Graph,
    counter: &mut Counter,
    stem: &str,
) -> Result<Vec<NodeId>, LowerErr> {
    let mut out = Vec::new();
    for item in group {
        match item {
            GroupItem::Key(key, ty, occ) => {
                let child_stem = counter.next_name(stem);
                let id = convert_type(ty, graph, counter, &child_stem)?;
                let (min_qty, max_qty) = occurs_to_qty(*occ);
                {
                    let node = graph.get_mut(id);
                    node.min_qty = min_qty;
                    node.max_qty = max_qty;
                    // §3.3: base_name comes from the member key's value/name when one is
                    // derivable (a bareword, a quoted text key, or a labeled `name => type`
                    // key); only a key that carries no usable name falls back to the counter
                    // stem.
                    node.base_name = key.as_ref().and_then(|mk| member_key_name(mk.as_ref())).unwrap_or_else(|| child_stem.clone());
                }
                if let Some(mk) = key {
                    let key_id = convert_memberkey(mk, graph, counter, &child_stem)?;
                    graph.get_mut(id).key = Some(key_id);
                }
                out.push(id);
            }
            GroupItem::Name(name, occ) => {
                let mut n = Node::new(Kind::Other);
                n.literal = Literal::Ref(name.clone());
                let (min_qty, max_qty) = occurs_to_qty(*occ);
                n.min_qty = min_qty;
                n.max_qty = max_qty;
                out.push(graph.alloc(n));
            }
            GroupItem::Grp(nested, Occurs::Once) => {
                // A parenthesized sub-group with no repeat count is transparent grouping
                // syntax, not a separate collection: splice its members straight in.
                out.extend(convert_group_items(nested, graph, counter, stem)?);
            }
            GroupItem::Grp(nested, occ) => {
                let mut n = Node::new(Kind::Group);
                n.children = convert_group_items(nested, graph, counter, stem)?;
                let (min_qty, max_qty) = occurs_to_qty(*occ);
                n.min_qty = min_qty;
                n.max_qty = max_qty;
                out.push(graph.alloc(n));
            }
        }
    }
    Ok(out)
}

fn convert_memberkey(mk: &MemberKey, graph: &mut Graph, counter: &mut Counter, stem: &str) -> Result<NodeId, LowerErr> {
    match mk {
        MemberKey::FromValue(v) => Ok(graph.alloc(literal_node(v))),
        MemberKey::FromType(ty) => convert_type(ty, graph, counter, stem),
    }
}

/// Extracts a C-identifier-safe name from a member key, when the key carries one: a bareword or
/// quoted text key (`a: uint`, `"id": uint`) names itself, and a `name => type` key names itself
/// via its rule reference. Any other key shape (an integer/byte/bool key, or a non-bareword
/// type-valued key) has no name of its own.
fn member_key_name(mk: &MemberKey) -> Option<String> {
    match mk {
        MemberKey::FromValue(v) => match v.as_ref() {
            Value::Tstr(s) => Some(latinize(s)),
            _ => None,
        },
        MemberKey::FromType(ty) => match ty.as_ref() {
            Type::Rule(name) => Some(latinize(name)),
            _ => None,
        },
    }
}

fn occurs_to_qty(occ: Occurs) -> (i64, Option<i64>) {
    match occ {
        Occurs::Once => (1, Some(1)),
        Occurs::Optional => (0, Some(1)),
        Occurs::ZeroPlus => (0, None),
        Occurs::OnePlus => (1, None),
        Occurs::Between(a, b) => (a, Some(b)),
    }
}

/// Internal error type used while converting a single rule body, before it is attached to a
/// rule-name context frame and turned into a `CddlError`.
enum LowerErr {
    Parse(crate::error::ParseError),
    Validation(ValidationError),
}

impl LowerErr {
    fn with_frame(self, frame: &str) -> CddlError {
        match self {
            LowerErr::Parse(e) => CddlError::Parse(e.with_context(frame)),
            LowerErr::Validation(e) => CddlError::Validation(e),
        }
    }
}

impl From<ValidationError> for LowerErr {
    fn from(e: ValidationError) -> Self {
        LowerErr::Validation(e)
    }
}

fn parse_error_at(message: &str, offending: &str, rule: &str) -> CddlError {
    CddlError::Parse(crate::error::ParseError::new(message, offending).with_context(rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowers_prelude_alias_to_concrete_kind() {
        let graph = lower_cddl("age = uint\n").unwrap();
        let id = graph.resolve("age").unwrap();
        assert_eq!(graph.get(id).kind, Kind::Uint);
    }

    #[test]
    fn lowers_user_alias_as_pending_reference() {
        let graph = lower_cddl("age = year\nyear = uint\n").unwrap();
        let id = graph.resolve("age").unwrap();
        let node = graph.get(id);
        assert_eq!(node.kind, Kind::Other);
        assert_eq!(node.literal, Literal::Ref("year".to_string()));
    }

    #[test]
    fn lowers_map_with_key() {
        let graph = lower_cddl("point = { x: int, y: int }\n").unwrap();
        let id = graph.resolve("point").unwrap();
        let node = graph.get(id);
        assert_eq!(node.kind, Kind::Map);
        assert_eq!(node.children.len(), 2);
        assert!(graph.get(node.children[0]).key.is_some());
    }

    #[test]
    fn lowers_range() {
        let graph = lower_cddl("byte = 0..255\n").unwrap();
        let id = graph.resolve("byte").unwrap();
        let node = graph.get(id);
        assert_eq!(node.min_value, Some(0));
        assert_eq!(node.max_value, Some(255));
    }

    #[test]
    fn lowers_size_control() {
        let graph = lower_cddl("tag = bstr .size 4\n").unwrap();
        let id = graph.resolve("tag").unwrap();
        let node = graph.get(id);
        assert_eq!(node.kind, Kind::Bstr);
        assert_eq!(node.size, Some(4));
    }

    #[test]
    fn rejects_generics() {
        let err = lower_cddl("wrapped<T> = [T]\n").unwrap_err();
        assert!(matches!(err, CddlError::Validation(ValidationError::GenericsNotSupported(_))));
    }

    #[test]
    fn rejects_unsupported_control() {
        let err = lower_cddl("x = uint .within uint\n").unwrap_err();
        assert!(matches!(err, CddlError::Validation(ValidationError::UnsupportedControlOperator(_))));
    }

    #[test]
    fn parses_control_group() {
        let graph = lower_cddl("flags = &( a: 0, b: 1 )\nx = uint .bits flags\n").unwrap();
        assert!(graph.control_groups.contains_key("flags"));
        let id = graph.resolve("x").unwrap();
        assert_eq!(graph.get(id).bits, Some("flags".to_string()));
    }
}
