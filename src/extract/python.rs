//! Python symbol and reference extraction (spec §4.2).
//!
//! Mirrors `extract::c`'s line-oriented approach, with an indent-based
//! stack standing in for Python's block structure — the same technique
//! the repo's own Python analyzer uses for its `TYPE_CHECKING` stack.

use std::sync::OnceLock;

use regex::Regex;

use super::{count_references_in_file, infer_python_literal, regex, split_top_level_args};
use crate::parser::ParseTree;
use crate::types::{Language, Param, RefContext, Reference, Scope, Symbol, SymbolKind, UseKind};

const PY_KEYWORDS: &[&str] = &[
    "def", "if", "elif", "else", "for", "while", "try", "except", "finally", "with", "class",
    "return", "import", "from", "lambda", "assert", "global", "nonlocal", "del", "raise", "yield",
    "pass", "break", "continue", "async", "await", "print", "not", "and", "or", "in", "is",
];

fn re_annotated_assign() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"^\s*([A-Za-z_]\w*)\s*:\s*([A-Za-z_][\w\[\],\. ]*)\s*=\s*(.+?)\s*$"))
}

fn re_plain_assign() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"^\s*([A-Za-z_]\w*)\s*=\s*(.+?)\s*$"))
}

fn re_def() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"^\s*def\s+([A-Za-z_]\w*)\s*\(([^)]*)\)\s*(->\s*([A-Za-z_][\w\[\],\. ]*))?\s*:\s*$"))
}

fn re_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"^\s*import\s+(.+)$"))
}

fn re_from_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"^\s*from\s+(\S+)\s+import\s+(.+)$"))
}

fn re_return() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"^\s*return\s+(.+)$"))
}

fn re_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"([A-Za-z_]\w*)\s*\(([^()]*)\)"))
}

fn re_subscript() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"([A-Za-z_]\w*)\s*\[\s*(-?\d+)?\s*\]"))
}

fn re_attribute() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"([A-Za-z_]\w*)\s*\.\s*([A-Za-z_]\w*)"))
}

fn indent_of(code: &str) -> usize {
    code.chars().take_while(|c| c.is_whitespace()).count()
}

pub fn extract(file: &str, tree: &ParseTree) -> (Vec<Symbol>, Vec<Reference>) {
    let mut symbols = Vec::new();
    let mut references = Vec::new();
    // (indent of the `def` line, function name, declared return type)
    let mut func_stack: Vec<(usize, String, Option<String>)> = Vec::new();

    for source_line in &tree.lines {
        let line_no = source_line.line;
        let code = source_line.code.as_str();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            continue;
        }

        let indent = indent_of(code);
        while let Some((def_indent, _, _)) = func_stack.last() {
            if indent <= *def_indent {
                func_stack.pop();
            } else {
                break;
            }
        }
        let in_function = !func_stack.is_empty();

        if let Some(caps) = re_def().captures(code) {
            let name = caps[1].to_string();
            let params_str = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let return_type = caps.get(4).map(|m| m.as_str().trim().to_string());
            let (params, varargs, kwargs) = parse_py_params(params_str);

            let mut symbol = Symbol::new(Language::Python, file, line_no, name.clone(), SymbolKind::Function);
            symbol.params = params;
            symbol.varargs = varargs;
            symbol.kwargs = kwargs;
            symbol.return_type = return_type.clone();
            symbol.scope = if in_function { Scope::Function } else { Scope::Module };
            symbols.push(symbol);

            func_stack.push((indent, name, return_type));
            continue;
        }

        if let Some(caps) = re_from_import().captures(code) {
            let module = caps[1].to_string();
            let names = caps[2].trim();
            if names == "*" {
                let mut symbol = Symbol::new(Language::Python, file, line_no, "*".to_string(), SymbolKind::Import);
                symbol.star_import = true;
                symbol.declared_type = Some(module);
                symbols.push(symbol);
            } else {
                for raw_name in names.split(',') {
                    let name = raw_name.trim().split(" as ").next().unwrap_or("").trim();
                    if name.is_empty() {
                        continue;
                    }
                    let mut symbol = Symbol::new(Language::Python, file, line_no, name.to_string(), SymbolKind::Import);
                    symbol.declared_type = Some(module.clone());
                    symbols.push(symbol);
                }
            }
            continue;
        }

        if let Some(caps) = re_import().captures(code) {
            for raw_name in caps[1].split(',') {
                let name = raw_name.trim().split(" as ").next().unwrap_or("").trim();
                if name.is_empty() {
                    continue;
                }
                let top_level = name.split('.').next().unwrap_or(name);
                symbols.push(Symbol::new(Language::Python, file, line_no, top_level.to_string(), SymbolKind::Import));
            }
            continue;
        }

        if let Some(caps) = re_return().captures(code) {
            let expr = caps[1].trim_end_matches(|c| c == ' ').to_string();
            if let Some((_, func_name, return_type)) = func_stack.last() {
                if let Some(rt) = return_type {
                    references.push(Reference {
                        name: func_name.clone(),
                        kind_of_use: UseKind::Read,
                        file: file.to_string(),
                        line: line_no,
                        context: RefContext {
                            target_type: Some(rt.clone()),
                            rhs_type: Some(infer_python_literal(&expr)),
                            ..Default::default()
                        },
                    });
                }
            }
            extract_references_from_line(file, line_no, &expr, &mut references);
            continue;
        }

        if let Some(caps) = re_annotated_assign().captures(code) {
            let name = caps[1].to_string();
            let annotation = caps[2].trim().to_string();
            let rhs = caps[3].trim().to_string();

            let mut symbol = Symbol::new(Language::Python, file, line_no, name.clone(), SymbolKind::Variable);
            symbol.declared_type = Some(annotation.clone());
            symbol.scope = if in_function { Scope::Function } else { Scope::Module };
            symbols.push(symbol);

            references.push(Reference {
                name,
                kind_of_use: UseKind::Write,
                file: file.to_string(),
                line: line_no,
                context: RefContext {
                    target_type: Some(annotation),
                    rhs_type: Some(infer_python_literal(&rhs)),
                    ..Default::default()
                },
            });
            extract_references_from_line(file, line_no, &rhs, &mut references);
            continue;
        }

        if let Some(caps) = re_plain_assign().captures(code) {
            let name = caps[1].to_string();
            let rhs = caps[2].trim().to_string();

            // `x == y` matches the same pattern with rhs `= y`; that's a
            // comparison, not an assignment.
            if rhs.starts_with('=') {
                extract_references_from_line(file, line_no, code, &mut references);
                continue;
            }

            if rhs.starts_with('[') || rhs.starts_with('(') {
                let inner = &rhs[1..rhs.len().saturating_sub(1)];
                let mut symbol = Symbol::new(Language::Python, file, line_no, name.clone(), SymbolKind::Array);
                symbol.declared_type = Some(if rhs.starts_with('[') { "list".to_string() } else { "tuple".to_string() });
                symbol.array_size = Some(super::count_top_level_elements(inner));
                symbol.scope = if in_function { Scope::Function } else { Scope::Module };
                symbols.push(symbol);
            } else if in_function {
                let mut symbol = Symbol::new(Language::Python, file, line_no, name.clone(), SymbolKind::Variable);
                symbol.scope = Scope::Function;
                symbols.push(symbol);
            }

            extract_references_from_line(file, line_no, &rhs, &mut references);
            continue;
        }

        extract_references_from_line(file, line_no, code, &mut references);
    }

    count_references_in_file(&mut symbols, &references);
    (symbols, references)
}

fn parse_py_params(raw: &str) -> (Vec<Param>, bool, bool) {
    let mut params = Vec::new();
    let mut varargs = false;
    let mut kwargs = false;

    for part in split_top_level_args(raw) {
        let part = part.trim();
        if part.is_empty() || part == "self" || part == "cls" {
            continue;
        }
        if let Some(rest) = part.strip_prefix("**") {
            kwargs = true;
            let _ = rest;
            continue;
        }
        if let Some(rest) = part.strip_prefix('*') {
            varargs = true;
            let _ = rest;
            continue;
        }

        let (name_and_type, default) = match part.split_once('=') {
            Some((lhs, rhs)) => (lhs.trim(), Some(rhs.trim().to_string())),
            None => (part, None),
        };
        let (name, annotated_type) = match name_and_type.split_once(':') {
            Some((n, t)) => (n.trim().to_string(), Some(t.trim().to_string())),
            None => (name_and_type.trim().to_string(), None),
        };
        params.push(Param { name, annotated_type, has_default: default.is_some() });
    }

    (params, varargs, kwargs)
}

fn extract_references_from_line(file: &str, line: usize, code: &str, references: &mut Vec<Reference>) {
    for caps in re_call().captures_iter(code) {
        let name = caps[1].to_string();
        if PY_KEYWORDS.contains(&name.as_str()) {
            continue;
        }
        let args_str = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let args = split_top_level_args(args_str);
        let arg_types = args.iter().map(|a| infer_python_literal(a)).collect();
        references.push(Reference {
            name,
            kind_of_use: UseKind::Call,
            file: file.to_string(),
            line,
            context: RefContext { arg_types, arg_count: Some(args.len()), ..Default::default() },
        });
    }

    for caps in re_subscript().captures_iter(code) {
        let name = caps[1].to_string();
        if PY_KEYWORDS.contains(&name.as_str()) {
            continue;
        }
        let index_literal = caps.get(2).and_then(|m| m.as_str().parse::<i64>().ok());
        references.push(Reference {
            name,
            kind_of_use: UseKind::ArrayAccess,
            file: file.to_string(),
            line,
            context: RefContext { index_literal, ..Default::default() },
        });
    }

    for caps in re_attribute().captures_iter(code) {
        let receiver = caps[1].to_string();
        let member = caps[2].to_string();
        if PY_KEYWORDS.contains(&receiver.as_str()) {
            continue;
        }
        references.push(Reference {
            name: receiver,
            kind_of_use: UseKind::MemberAccess,
            file: file.to_string(),
            line,
            context: RefContext { member_name: Some(member), ..Default::default() },
        });
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::python as pyparse;

    fn extract_str(src: &str) -> (Vec<Symbol>, Vec<Reference>) {
        extract("test.py", &pyparse::parse(src))
    }

    #[test]
    fn extracts_annotated_assignment() {
        let (symbols, _) = extract_str("balance: int = 0");
        let s = symbols.iter().find(|s| s.name == "balance").unwrap();
        assert_eq!(s.declared_type.as_deref(), Some("int"));
    }

    #[test]
    fn extracts_function_with_params_and_return() {
        let (symbols, _) = extract_str("def compute(a, b, c) -> int:\n    return a");
        let f = symbols.iter().find(|s| s.name == "compute").unwrap();
        assert_eq!(f.params.len(), 3);
        assert_eq!(f.return_type.as_deref(), Some("int"));
    }

    #[test]
    fn extracts_list_literal_array_size() {
        let (symbols, _) = extract_str("items = [1, 2, 3]");
        let s = symbols.iter().find(|s| s.name == "items").unwrap();
        assert_eq!(s.kind, SymbolKind::Array);
        assert_eq!(s.array_size, Some(3));
    }

    #[test]
    fn extracts_from_import_names() {
        let (symbols, refs) = extract_str("from os import path, getcwd\nprint(path)");
        assert!(symbols.iter().any(|s| s.name == "path"));
        assert!(symbols.iter().any(|s| s.name == "getcwd"));
        assert!(refs.iter().any(|r| r.name == "path"));
    }

    #[test]
    fn star_import_sets_flag() {
        let (symbols, _) = extract_str("from os import *");
        let s = symbols.iter().find(|s| s.name == "*").unwrap();
        assert!(s.star_import);
    }

    #[test]
    fn extracts_call_reference() {
        let (_, refs) = extract_str("compute(1, 2)");
        let r = refs.iter().find(|r| r.name == "compute" && r.kind_of_use == UseKind::Call).unwrap();
        assert_eq!(r.context.arg_count, Some(2));
    }
}
