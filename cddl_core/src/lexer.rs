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
//! Lexical pre-pass: strips comments, unfolds `\`-newline continuations, and splits a CDDL
//! source file into a dictionary of rule name -> accumulated body text, honoring `=`, `/=`
//! and `//=`.
//!
//! This runs ahead of the `nom` grammar in `parse.rs`. Finding rule boundaries requires
//! bracket-depth and string-literal tracking that doesn't fit naturally into a single forward
//! nom combinator chain over the whole file, so it is implemented here as a direct scan; each
//! individual rule body is still handed to the nom grammar afterwards.

use crate::ast::Assignment;
use crate::error::ValidationError;
use std::collections::HashMap;

/// One accumulated rule: its final assignment kind (only meaningful for reporting) and its
/// concatenated body text (with leading `/`/`//` stripped from appended alternatives, per
/// spec §4.1.1).
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub is_group: bool,
    pub body: String,
}

/// Removes `;` line comments (outside of string/byte-string literals) and unfolds
/// backslash-newline continuations.
fn strip_comments_and_continuations(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    let mut in_tstr = false;
    let mut in_bstr = false;
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\n' && !in_tstr && !in_bstr {
                    chars.next();
                    out.push(' ');
                    continue;
                }
            }
            out.push(c);
            if let Some(n) = chars.next() {
                out.push(n);
            }
            continue;
        }
        if c == '"' && !in_bstr {
            in_tstr = !in_tstr;
            out.push(c);
            continue;
        }
        if c == '\'' && !in_tstr {
            in_bstr = !in_bstr;
            out.push(c);
            continue;
        }
        if c == ';' && !in_tstr && !in_bstr {
            for nc in chars.by_ref() {
                if nc == '\n' {
                    out.push('\n');
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn is_ealpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '@' || c == '_' || c == '$'
}

fn is_id_cont(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '@' || c == '_' || c == '$'
}

/// A rule-start match at some position: the identifier, its assignment operator, and the byte
/// offset just past the operator (where the body begins).
struct RuleStart {
    start: usize,
    name_end: usize,
    name: String,
    assignment: Assignment,
    is_group: bool,
    body_start: usize,
    /// Set when the rule name is immediately followed by a `<...>` generic parameter list.
    /// Generic CDDL rules are rejected explicitly rather than silently ignored.
    is_generic: bool,
}

/// Scans for `name S ("//=" / "/=" / "=") S` at bracket depth 0, outside of literals.
fn find_rule_starts(text: &str) -> Vec<RuleStart> {
    let bytes: Vec<char> = text.chars().collect();
    let len = bytes.len();
    let mut starts = Vec::new();
    let mut depth: i32 = 0;
    let mut in_tstr = false;
    let mut in_bstr = false;
    let mut i = 0usize;
    while i < len {
        let c = bytes[i];
        if in_tstr {
            if c == '"' {
                in_tstr = false;
            }
            i += 1;
            continue;
        }
        if in_bstr {
            if c == '\'' {
                in_bstr = false;
            }
            i += 1;
            continue;
        }
        match c {
            '"' => {
                in_tstr = true;
                i += 1;
                continue;
            }
            '\'' => {
                in_bstr = true;
                i += 1;
                continue;
            }
            '(' | '[' | '{' => {
                depth += 1;
                i += 1;
                continue;
            }
            ')' | ']' | '}' => {
                depth -= 1;
                i += 1;
                continue;
            }
            _ => {}
        }
        if depth == 0 && is_ealpha(c) && (i == 0 || !is_id_cont(bytes[i - 1])) {
            let ident_start = i;
            let mut j = i + 1;
            while j < len && is_id_cont(bytes[j]) {
                j += 1;
            }
            let name_end = j;
            let mut is_generic = false;
            let mut k = j;
            if k < len && bytes[k] == '<' {
                // Generic parameter list: `name<T, U> = ...`. Skip to the matching `>` so the
                // assignment operator after it is still found, but flag the rule as generic.
                is_generic = true;
                let mut angle_depth = 0i32;
                while k < len {
                    match bytes[k] {
                        '<' => angle_depth += 1,
                        '>' => {
                            angle_depth -= 1;
                            if angle_depth == 0 {
                                k += 1;
                                break;
                            }
                        }
                        _ => {}
                    }
                    k += 1;
                }
            }
            while k < len && bytes[k].is_whitespace() {
                k += 1;
            }
            let (assignment, is_group, op_len) = if bytes[k..].starts_with(&['/', '/', '=']) {
                (Assignment::AssignExtend, true, 3)
            } else if bytes[k..].starts_with(&['/', '=']) {
                (Assignment::AssignExtend, false, 2)
            } else if k < len && bytes[k] == '=' && !bytes.get(k + 1).map_or(false, |c| *c == '=') {
                (Assignment::Assign, false, 1)
            } else {
                i = ident_start + 1;
                continue;
            };
            let name: String = bytes[ident_start..name_end].iter().collect();
            starts.push(RuleStart {
                start: ident_start,
                name_end,
                name,
                assignment,
                is_group,
                body_start: k + op_len,
                is_generic,
            });
            i = k + op_len;
            continue;
        }
        i += 1;
    }
    starts
}

/// Splits pre-processed CDDL source into a name -> `RuleEntry` map, applying append semantics
/// for `/=` and `//=` and rejecting duplicate plain (`=`) assignments.
pub fn split_rules(src: &str) -> Result<HashMap<String, RuleEntry>, ValidationError> {
    let cleaned = strip_comments_and_continuations(src);
    let chars: Vec<char> = cleaned.chars().collect();
    let starts = find_rule_starts(&cleaned);
    let mut rules: HashMap<String, RuleEntry> = HashMap::new();
    let mut first_seen: HashMap<String, bool> = HashMap::new();

    for (idx, rs) in starts.iter().enumerate() {
        if rs.is_generic {
            return Err(ValidationError::GenericsNotSupported(rs.name.clone()));
        }
        let body_end = starts.get(idx + 1).map(|n| n.start).unwrap_or(chars.len());
        let body: String = chars[rs.body_start..body_end].iter().collect();
        let body = body.trim().to_string();

        match rs.assignment {
            Assignment::Assign => {
                if first_seen.contains_key(&rs.name) {
                    return Err(ValidationError::DuplicateRule(rs.name.clone()));
                }
                first_seen.insert(rs.name.clone(), true);
                rules.insert(
                    rs.name.clone(),
                    RuleEntry {
                        is_group: rs.is_group,
                        body,
                    },
                );
            }
            Assignment::AssignExtend => {
                let joiner = if rs.is_group { " // " } else { " / " };
                rules
                    .entry(rs.name.clone())
                    .and_modify(|e| {
                        e.body.push_str(joiner);
                        e.body.push_str(&body);
                    })
                    .or_insert_with(|| RuleEntry {
                        is_group: rs.is_group,
                        body,
                    });
                first_seen.entry(rs.name.clone()).or_insert(true);
            }
        }
        let _ = rs.name_end;
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_comment() {
        let src = "foo = uint ; a comment\nbar = tstr\n";
        let cleaned = strip_comments_and_continuations(src);
        assert!(!cleaned.contains("comment"));
        assert!(cleaned.contains("foo = uint"));
        assert!(cleaned.contains("bar = tstr"));
    }

    #[test]
    fn unfolds_line_continuation() {
        let src = "foo = uint \\\n/ tstr\n";
        let cleaned = strip_comments_and_continuations(src);
        assert_eq!(cleaned, "foo = uint  / tstr\n");
    }

    #[test]
    fn splits_simple_rules() {
        let rules = split_rules("foo = uint\nbar = tstr\n").unwrap();
        assert_eq!(rules.get("foo").unwrap().body, "uint");
        assert_eq!(rules.get("bar").unwrap().body, "tstr");
    }

    #[test]
    fn appends_slash_assign() {
        let rules = split_rules("foo = uint\nfoo /= tstr\n").unwrap();
        assert_eq!(rules.get("foo").unwrap().body, "uint / tstr");
    }

    #[test]
    fn appends_doubleslash_assign_to_group() {
        let rules = split_rules("foo = (a: uint)\nfoo //= (b: tstr)\n").unwrap();
        assert_eq!(rules.get("foo").unwrap().body, "(a: uint) // (b: tstr)");
    }

    #[test]
    fn rejects_duplicate_rule() {
        let err = split_rules("foo = uint\nfoo = tstr\n").unwrap_err();
        assert_eq!(err, ValidationError::DuplicateRule("foo".to_string()));
    }

    #[test]
    fn ignores_equals_sign_inside_nested_braces() {
        let rules = split_rules("foo = { a: uint }\nbar = tstr\n").unwrap();
        assert_eq!(rules.get("foo").unwrap().body, "{ a: uint }");
        assert_eq!(rules.get("bar").unwrap().body, "tstr");
    }

    #[test]
    fn socket_name_is_recognised() {
        let rules = split_rules("$$foo-ext //= (a: uint)\n").unwrap();
        assert!(rules.contains_key("$$foo-ext"));
    }

    #[test]
    fn rejects_generic_rule() {
        let err = split_rules("wrapped<T> = [T]\n").unwrap_err();
        assert_eq!(err, ValidationError::GenericsNotSupported("wrapped".to_string()));
    }
}
