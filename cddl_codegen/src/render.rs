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
//! Assembles typedefs, function bodies and entry wrappers into the project's output artifacts:
//! the shared types header, one `.c`/`.h` pair per mode, and a CMake fragment.

use cddl_core::node::{Graph, NodeId};
use cddl_core::predicates::Predicates;

use crate::entry::{emit_entry, signature as entry_signature};
use crate::error::EmissionError;
use crate::typedef::{collect_typedefs, Typedef};
use crate::xcode::{collect_functions, Mode};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedProject {
    pub types_h: String,
    pub decode_c: String,
    pub decode_h: String,
    pub encode_c: String,
    pub encode_h: String,
    pub cmake: String,
}

pub fn render(graph: &Graph, preds: &Predicates, proj: &str, entries: &[NodeId]) -> Result<RenderedProject, EmissionError> {
    let typedefs = collect_typedefs(graph, preds, entries)?;
    Ok(RenderedProject {
        types_h: render_types_h(proj, &typedefs),
        decode_c: render_mode_c(graph, preds, proj, entries, Mode::Decode)?,
        decode_h: render_mode_h(graph, proj, entries, Mode::Decode),
        encode_c: render_mode_c(graph, preds, proj, entries, Mode::Encode)?,
        encode_h: render_mode_h(graph, proj, entries, Mode::Encode),
        cmake: render_cmake(proj),
    })
}

fn render_types_h(proj: &str, typedefs: &[Typedef]) -> String {
    let guard = format!("{}_TYPES_H__", proj.to_uppercase());
    let mut out = format!(
        "#ifndef {guard}\n#define {guard}\n\n#include <stdint.h>\n#include <stdbool.h>\n#include \"zcbor_common.h\"\n\n#ifndef DEFAULT_MAX_QTY\n#define DEFAULT_MAX_QTY 3\n#endif\n\n",
        guard = guard
    );
    for td in typedefs {
        out.push_str(&td.body);
        out.push_str("\n\n");
    }
    out.push_str(&format!("#endif /* {} */\n", guard));
    out
}

fn render_mode_c(
    graph: &Graph,
    preds: &Predicates,
    proj: &str,
    entries: &[NodeId],
    mode: Mode,
) -> Result<String, EmissionError> {
    let functions = collect_functions(graph, preds, entries, mode)?;
    let mut out = format!(
        "#include \"{proj}_{verb}.h\"\n#include \"{proj}_types.h\"\n#include \"zcbor_{verb}.h\"\n\n",
        proj = proj,
        verb = mode.verb()
    );
    for f in &functions {
        out.push_str(&f.body);
        out.push_str("\n\n");
    }
    for &entry in entries {
        out.push_str(&emit_entry(graph, entry, mode));
        out.push_str("\n\n");
    }
    Ok(out)
}

fn render_mode_h(graph: &Graph, proj: &str, entries: &[NodeId], mode: Mode) -> String {
    let guard = format!("{}_{}_H__", proj.to_uppercase(), mode.verb().to_uppercase());
    let mut out = format!("#ifndef {guard}\n#define {guard}\n\n#include \"{proj}_types.h\"\n\n", guard = guard, proj = proj);
    for &entry in entries {
        out.push_str(&entry_signature(graph, entry, mode));
        out.push_str(";\n");
    }
    out.push_str(&format!("\n#endif /* {} */\n", guard));
    out
}

fn render_cmake(proj: &str) -> String {
    format!(
        "add_library({proj} STATIC\n    {proj}_decode.c\n    {proj}_encode.c\n    zcbor_decode.c\n    zcbor_encode.c\n    zcbor_common.c\n)\n\ntarget_include_directories({proj} PUBLIC\n    ${{CMAKE_CURRENT_SOURCE_DIR}}\n)\n",
        proj = proj
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cddl_core::parse_cddl;

    #[test]
    fn render_produces_all_six_artifacts_non_empty() {
        let graph = parse_cddl("rec = { a: uint, ? b: tstr }\n").unwrap();
        let preds = Predicates::new();
        let id = graph.resolve("rec").unwrap();
        let project = render(&graph, &preds, "demo", &[id]).unwrap();
        assert!(project.types_h.contains("rec_rec_t"));
        assert!(project.decode_c.contains("cbor_decode_rec"));
        assert!(project.encode_c.contains("cbor_encode_rec"));
        assert!(project.decode_h.contains("int cbor_decode_rec("));
        assert!(project.cmake.contains("add_library(demo"));
    }
}
