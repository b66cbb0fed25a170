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
//! The typed type-graph that every later stage (normalizer, graph-query layer, C code
//! generator, data translator) operates on. One `Node` per logical CDDL element; kinds are a
//! single tagged union rather than a class hierarchy, matching the `kind`-field representation
//! the original Python implementation uses.

use std::collections::HashMap;

/// Index into a `Graph`'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// The kind discriminant of a `Node`. See spec §3.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Int,
    Uint,
    Nint,
    Float,
    Bstr,
    Tstr,
    Bool,
    Nil,
    Undef,
    Any,
    List,
    Map,
    Group,
    Union,
    Other,
}

/// Kind-dependent literal payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Int(i64),
    Float(f64),
    Tstr(String),
    Bstr(Vec<u8>),
    Bool(bool),
    /// Target rule name, for `Kind::Other`.
    Ref(String),
}

/// One logical CDDL element. Every field defaults to "absent" (`None`/empty) for elements that
/// do not carry it; which fields are meaningful is entirely a function of `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: Kind,
    pub literal: Literal,
    /// Ordered children: list/map/group members, or union alternatives.
    pub children: Vec<NodeId>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub min_value_f: Option<f64>,
    pub max_value_f: Option<f64>,
    pub size: Option<i64>,
    pub min_size: Option<i64>,
    pub max_size: Option<i64>,
    pub min_qty: i64,
    pub max_qty: Option<i64>,
    pub key: Option<NodeId>,
    pub cbor: Option<NodeId>,
    pub tags: Vec<i64>,
    pub bits: Option<String>,
    pub default: Option<Literal>,
    pub label: Option<String>,
    pub is_socket: bool,
    pub base_name: String,
    pub id_prefix: String,
    pub base_stem: String,
}

impl Node {
    pub fn new(kind: Kind) -> Self {
        Node {
            kind,
            literal: Literal::None,
            children: Vec::new(),
            min_value: None,
            max_value: None,
            min_value_f: None,
            max_value_f: None,
            size: None,
            min_size: None,
            max_size: None,
            min_qty: 1,
            max_qty: Some(1),
            key: None,
            cbor: None,
            tags: Vec::new(),
            bits: None,
            default: None,
            label: None,
            is_socket: false,
            base_name: String::new(),
            id_prefix: String::new(),
            base_stem: String::new(),
        }
    }

    pub fn is_optional(&self) -> bool {
        self.min_qty == 0 && self.max_qty == Some(1)
    }

    pub fn is_repeated(&self) -> bool {
        self.max_qty != Some(1) || self.min_qty > 1
    }
}

/// A parsed control group: a set of named non-negative integer constants, referenced from
/// `.bits`. Stored separately from `types` per spec §4.1.1 ("a rule whose body begins with
/// `&(` is a control group; it is stored separately and only usable via `.bits`").
#[derive(Debug, Clone, PartialEq)]
pub struct ControlGroup {
    pub members: Vec<(String, i64)>,
}

/// The type graph: `(types, control_groups)`, both keyed by rule name, plus the node arena
/// that backs every `NodeId`.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    arena: Vec<Node>,
    pub roots: HashMap<String, NodeId>,
    pub control_groups: HashMap<String, ControlGroup>,
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            arena: Vec::new(),
            roots: HashMap::new(),
            control_groups: HashMap::new(),
        }
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.arena.len() as u32);
        self.arena.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.arena[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.arena[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.arena.len()).map(|i| NodeId(i as u32))
    }

    pub fn resolve(&self, name: &str) -> Option<NodeId> {
        self.roots.get(name).copied()
    }
}

/// Smallest standard C integer width (8/16/32/64) that can represent every value in
/// `[min, max]`. Grounds the C code generator's `int8_t`/`uint16_t`/… field sizing.
pub fn bit_size(min: i64, max: i64) -> u8 {
    if min >= 0 {
        if max <= u8::MAX as i64 {
            8
        } else if max <= u16::MAX as i64 {
            16
        } else if max <= u32::MAX as i64 {
            32
        } else {
            64
        }
    } else if min >= i8::MIN as i64 && max <= i8::MAX as i64 {
        8
    } else if min >= i16::MIN as i64 && max <= i16::MAX as i64 {
        16
    } else if min >= i32::MIN as i64 && max <= i32::MAX as i64 {
        32
    } else {
        64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_size_picks_smallest_unsigned_width() {
        assert_eq!(bit_size(0, 127), 8);
        assert_eq!(bit_size(0, 65535), 16);
        assert_eq!(bit_size(0, 4_000_000_000), 32);
    }

    #[test]
    fn bit_size_picks_smallest_signed_width() {
        assert_eq!(bit_size(-128, 127), 8);
        assert_eq!(bit_size(-40_000, 40_000), 32);
    }
}
