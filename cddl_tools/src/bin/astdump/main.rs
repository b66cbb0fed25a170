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
 * cddl_tools utility binary for dumping, in debug format, the normalized type graph produced by
 * parsing a CDDL file.
 *
 * This can be useful for:
 * - Determining whether a CDDL file is syntactically correct and satisfies every node-model
 *   invariant
 * - Investigation and analysis of how code generation or data translation will see a schema
 **************************************************************************************************/
use std::error::Error;
use std::fs;

use clap::Parser;

/// Dump a CDDL file's normalized type graph.
#[derive(Parser)]
#[command(name = "astdump", version, author = "Jeremy O'Donoghue <quic_jodonogh@quicinc.com")]
struct Cli {
    /// Path to CDDL file
    #[arg(short, long, value_name = "CDDL_FILE")]
    cddl: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let source = fs::read_to_string(&cli.cddl)?;
    let graph = cddl_core::parse_cddl(&source)?;

    let mut names: Vec<&String> = graph.roots.keys().collect();
    names.sort();
    for name in names {
        let id = graph.roots[name];
        println!("{} = {:#?}", name, graph.get(id));
    }
    Ok(())
}
