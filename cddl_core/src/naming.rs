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
//! Deterministic name generation for anonymous graph nodes.
//!
//! Every top-level rule gets its own `Counter`, reseeded to zero before that rule's subtree is
//! named, so that two independent schemas (or two runs over the same schema) assign identical
//! suffixes to their anonymous members. This matches the stateful "one counter per top-level
//! rule" naming discipline described for the original tool.

/// Monotonic suffix generator, one instance per top-level rule.
#[derive(Debug, Default, Clone)]
pub struct Counter {
    next: u32,
}

impl Counter {
    pub fn new() -> Self {
        Counter { next: 0 }
    }

    /// Returns the next suffix and advances the counter.
    pub fn next(&mut self) -> u32 {
        let v = self.next;
        self.next += 1;
        v
    }

    /// Builds `{stem}_{suffix}` for an anonymous child of `stem`.
    pub fn next_name(&mut self, stem: &str) -> String {
        format!("{}_{}", stem, self.next())
    }
}

/// Rewrites a CDDL identifier into a valid C identifier: `-` and `.` become `_`, a leading
/// digit gets a `_` prefix, and the two-dollar / one-dollar socket markers are dropped.
pub fn latinize(name: &str) -> String {
    let stripped = name.trim_start_matches("$$").trim_start_matches('$');
    let mut out = String::with_capacity(stripped.len() + 1);
    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_advances() {
        let mut c = Counter::new();
        assert_eq!(c.next(), 0);
        assert_eq!(c.next(), 1);
        assert_eq!(c.next_name("foo"), "foo_2");
    }

    #[test]
    fn latinize_replaces_separators() {
        assert_eq!(latinize("my-type.name"), "my_type_name");
    }

    #[test]
    fn latinize_prefixes_leading_digit() {
        assert_eq!(latinize("3d-point"), "_3d_point");
    }

    #[test]
    fn latinize_strips_socket_markers() {
        assert_eq!(latinize("$$my-ext"), "my_ext");
        assert_eq!(latinize("$my-plug"), "my_plug");
    }
}
