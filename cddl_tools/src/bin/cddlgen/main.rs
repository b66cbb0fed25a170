/***************************************************************************************************
 * Copyright (c) 2019-2021 Jeremy O'Donoghue. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * cddl_tools utility which generates C encoder/decoder source from a CDDL file, validates a CBOR
 * payload against one of its rules, and converts CBOR/JSON/YAML data through the schema's
 * compatibility envelope.
 **************************************************************************************************/
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use cddl_core::predicates::Predicates;
use cddl_core::{parse_cddl, Graph, NodeId};

#[derive(Parser)]
#[command(name = "cddlgen", version, author = "Jeremy O'Donoghue <quic_jodonogh@quicinc.com")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Emit C encoder/decoder source and headers for every rule reachable from the schema's roots.
    Code {
        /// Path to CDDL file
        cddl: PathBuf,
        /// Base name given to the generated files and the `cbor_(decode|encode)_<rule>` functions
        #[arg(long, default_value = "cddl_gen")]
        proj: String,
        /// Directory the generated files are written into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Decode a CBOR file and validate it against one rule of the schema.
    Validate {
        /// Path to CDDL file
        cddl: PathBuf,
        /// Name of the rule to validate against
        rule: String,
        /// Path to the CBOR-encoded input file
        input: PathBuf,
    },
    /// Convert a file between CBOR, JSON and YAML through the schema's compatibility envelope.
    Convert {
        /// Path to CDDL file
        cddl: PathBuf,
        /// Name of the rule to validate against
        rule: String,
        /// Path to the input file, in the format named by `--from`
        input: PathBuf,
        #[arg(long, value_enum)]
        from: Format,
        #[arg(long, value_enum)]
        to: Format,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Cbor,
    Json,
    Yaml,
}

fn main() -> Result<(), Box<dyn Error>> {
    match Cli::parse().command {
        Command::Code { cddl, proj, out_dir } => run_code(&cddl, &proj, &out_dir),
        Command::Validate { cddl, rule, input } => run_validate(&cddl, &rule, &input),
        Command::Convert { cddl, rule, input, from, to } => run_convert(&cddl, &rule, &input, from, to),
    }
}

fn load_schema(cddl: &PathBuf) -> Result<Graph, Box<dyn Error>> {
    let source = fs::read_to_string(cddl)?;
    Ok(parse_cddl(&source)?)
}

fn resolve_rule(graph: &Graph, rule: &str) -> Result<NodeId, Box<dyn Error>> {
    graph.resolve(rule).ok_or_else(|| format!("no such rule `{}` in schema", rule).into())
}

fn run_code(cddl: &PathBuf, proj: &str, out_dir: &PathBuf) -> Result<(), Box<dyn Error>> {
    let graph = load_schema(cddl)?;
    let preds = Predicates::new();
    let mut entries: Vec<NodeId> = graph.roots.values().copied().collect();
    entries.sort();
    let project = cddl_codegen::render(&graph, &preds, proj, &entries)?;

    fs::create_dir_all(out_dir)?;
    fs::write(out_dir.join(format!("{}_types.h", proj)), project.types_h)?;
    fs::write(out_dir.join(format!("{}_decode.c", proj)), project.decode_c)?;
    fs::write(out_dir.join(format!("{}_decode.h", proj)), project.decode_h)?;
    fs::write(out_dir.join(format!("{}_encode.c", proj)), project.encode_c)?;
    fs::write(out_dir.join(format!("{}_encode.h", proj)), project.encode_h)?;
    fs::write(out_dir.join(format!("{}.cmake", proj)), project.cmake)?;
    println!("wrote {} project files to {}", proj, out_dir.display());
    Ok(())
}

fn run_validate(cddl: &PathBuf, rule: &str, input: &PathBuf) -> Result<(), Box<dyn Error>> {
    let graph = load_schema(cddl)?;
    let id = resolve_rule(&graph, rule)?;
    let bytes = fs::read(input)?;
    cddl_translate::decode::decode_and_validate(&graph, id, &bytes)?;
    println!("ok");
    Ok(())
}

fn run_convert(cddl: &PathBuf, rule: &str, input: &PathBuf, from: Format, to: Format) -> Result<(), Box<dyn Error>> {
    let graph = load_schema(cddl)?;
    let id = resolve_rule(&graph, rule)?;
    let bytes = fs::read(input)?;

    let json = match from {
        Format::Cbor => cddl_translate::cbor_to_json(&graph, id, &bytes)?,
        Format::Json => serde_json::from_slice(&bytes)?,
        Format::Yaml => serde_yaml::from_slice(&bytes)?,
    };

    match to {
        Format::Json => println!("{}", serde_json::to_string_pretty(&json)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(&json)?),
        Format::Cbor => {
            let cbor = cddl_translate::json_to_canonical_cbor(&graph, id, &json)?;
            println!("{}", hex::encode(cbor));
        }
    }
    Ok(())
}
