//! Symbol extractor (spec §4.2).
//!
//! Each language module walks a [`crate::parser::ParseTree`] and emits
//! `(symbols, references)`. Extraction is pattern-based, the same way
//! the parser adapters are: no AST, just line-oriented regexes plus a
//! handful of small state machines for the constructs that span lines
//! (struct bodies, multi-line parameter lists).

pub mod c;
pub mod python;

use crate::types::{ApparentType, Reference, Symbol};
use regex::Regex;

pub(crate) fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex literal")
}

/// Apparent-type inference for a literal token (spec §4.2): deliberately
/// shallow, `Unknown` is the safe default for anything not immediately
/// recognizable.
pub(crate) fn infer_c_literal(expr: &str) -> ApparentType {
    let expr = expr.trim();
    if expr.is_empty() {
        return ApparentType::Unknown;
    }
    if expr.starts_with('"') {
        return ApparentType::Named("char*".to_string());
    }
    if expr.starts_with('\'') {
        return ApparentType::Char;
    }
    if expr.chars().all(|c| c.is_ascii_digit() || c == '-') && expr.chars().any(|c| c.is_ascii_digit()) {
        return ApparentType::Int;
    }
    if is_float_literal(expr) {
        return ApparentType::Float;
    }
    ApparentType::Unknown
}

pub(crate) fn infer_python_literal(expr: &str) -> ApparentType {
    let expr = expr.trim();
    if expr.is_empty() {
        return ApparentType::Unknown;
    }
    if expr == "True" || expr == "False" {
        return ApparentType::Bool;
    }
    if (expr.starts_with('"') && expr.ends_with('"')) || (expr.starts_with('\'') && expr.ends_with('\'')) {
        return ApparentType::Str;
    }
    if expr.starts_with('[') && expr.ends_with(']') {
        return ApparentType::List;
    }
    if expr.starts_with('(') && expr.ends_with(')') {
        return ApparentType::Tuple;
    }
    if expr.starts_with('{') && expr.ends_with('}') {
        let inner = &expr[1..expr.len() - 1];
        if inner.trim().is_empty() {
            return ApparentType::Dict;
        }
        return if inner.contains(':') { ApparentType::Dict } else { ApparentType::Set };
    }
    if expr.chars().all(|c| c.is_ascii_digit() || c == '-') && expr.chars().any(|c| c.is_ascii_digit()) {
        return ApparentType::Int;
    }
    if is_float_literal(expr) {
        return ApparentType::Float;
    }
    ApparentType::Unknown
}

fn is_float_literal(expr: &str) -> bool {
    let expr = expr.strip_suffix('f').unwrap_or(expr);
    if !expr.contains('.') {
        return false;
    }
    expr.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-')
        && expr.chars().any(|c| c.is_ascii_digit())
}

/// Split a comma-separated argument list on top-level commas only,
/// respecting nested parens/brackets/braces and quoted strings so a
/// comma inside a string literal or nested call doesn't split early.
pub(crate) fn split_top_level_args(s: &str) -> Vec<String> {
    let s = s.trim();
    if s.is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_string: Option<char> = None;
    let mut current = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = in_string {
            current.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            } else if c == q {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                in_string = Some(c);
                current.push(c);
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Count the element literals in a top-level bracketed list, e.g.
/// `{1, 2, 3}` or `[1, 2, 3]` -> 3. Used for array_size on initializer
/// lists with no explicit size. Does not recurse into nested brackets
/// when splitting on commas.
pub(crate) fn count_top_level_elements(inner: &str) -> i64 {
    let inner = inner.trim();
    if inner.is_empty() {
        return 0;
    }
    let mut depth = 0i32;
    let mut count = 1i64;
    for c in inner.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => count += 1,
            _ => {}
        }
    }
    count
}

/// Fill in each symbol's `references_in_file` by counting references
/// elsewhere in the same file that share its name (used by
/// R-UNUSED-EXTERN and R-DEAD-IMPORT).
pub(crate) fn count_references_in_file(symbols: &mut [Symbol], references: &[Reference]) {
    for symbol in symbols.iter_mut() {
        symbol.references_in_file = references
            .iter()
            .filter(|r| r.name == symbol.name && r.line != symbol.line)
            .count();
    }
}
