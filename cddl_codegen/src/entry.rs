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
//! Public entry-point wrappers. For each entry type this emits the exported
//! `cbor_(encode|decode)_<id>` function that allocates the `zcbor_state_t` backup stack and
//! delegates to the runtime's `zcbor_entry_function`.

use cddl_core::node::{Graph, Kind, NodeId};

use crate::names::{entry_fn_name, fn_name, type_name};
use crate::xcode::Mode;

/// Recursively sums the backup count a `zcbor_state_t` stack needs to decode/encode `id`: +1
/// for each MAP/LIST/UNION node, +1 for a `.cbor` nested payload, +1 for each key (plus that
/// key's own backups), and the maximum (not sum) over a UNION's children since only one
/// alternative is live at a time.
pub fn num_backups(graph: &Graph, id: NodeId) -> i64 {
    let node = graph.get(id);
    let mut n: i64 = match node.kind {
        Kind::Map | Kind::List | Kind::Union => 1,
        _ => 0,
    };
    if node.cbor.is_some() {
        n += 1 + num_backups(graph, node.cbor.unwrap());
    }
    if let Some(key) = node.key {
        n += 1 + num_backups(graph, key);
    }
    if node.kind == Kind::Union {
        n += node.children.iter().map(|c| num_backups(graph, *c)).max().unwrap_or(0);
    } else {
        n += node.children.iter().map(|c| num_backups(graph, *c)).sum::<i64>();
    }
    n
}

pub fn signature(graph: &Graph, id: NodeId, mode: Mode) -> String {
    let name = entry_fn_name(graph, id, mode.verb());
    let ty = type_name(graph, id);
    match mode {
        Mode::Decode => format!(
            "int {}(const uint8_t *payload, size_t payload_len, {} *result, size_t *payload_len_out)",
            name, ty
        ),
        Mode::Encode => format!(
            "int {}(uint8_t *payload, size_t payload_len, const {} *input, size_t *payload_len_out)",
            name, ty
        ),
    }
}

/// Emits the full definition of the entry-point wrapper for `id`.
pub fn emit_entry(graph: &Graph, id: NodeId, mode: Mode) -> String {
    let sig = signature(graph, id, mode);
    let inner = fn_name(graph, id, mode.verb());
    let backups = 2 + num_backups(graph, id);
    format!(
        "{sig}\n{{\n    zcbor_state_t states[{backups}];\n\n    return zcbor_entry_function(payload, payload_len, (void *){arg}, payload_len_out, states,\n        sizeof(states) / sizeof(zcbor_state_t), (zcbor_decoder_t *)ZCBOR_CUSTOM_CAST_FP({inner}), 1);\n}}",
        sig = sig,
        backups = backups,
        arg = mode.arg_name(),
        inner = inner,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cddl_core::parse_cddl;

    #[test]
    fn num_backups_counts_one_per_map() {
        let graph = parse_cddl("rec = { a: uint }\n").unwrap();
        let id = graph.resolve("rec").unwrap();
        assert_eq!(num_backups(&graph, id), 1);
    }

    #[test]
    fn union_backups_take_the_max_not_the_sum_of_children() {
        let graph = parse_cddl("u = { a: uint } / { b: tstr }\n").unwrap();
        let id = graph.resolve("u").unwrap();
        assert_eq!(num_backups(&graph, id), 2);
    }

    #[test]
    fn emit_entry_names_the_function_after_the_rule() {
        let graph = parse_cddl("rec = { a: uint }\n").unwrap();
        let id = graph.resolve("rec").unwrap();
        let text = emit_entry(&graph, id, Mode::Decode);
        assert!(text.starts_with("int cbor_decode_rec("));
    }
}
