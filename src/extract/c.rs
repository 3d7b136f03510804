//! C/header symbol and reference extraction (spec §4.2).
//!
//! Works line-by-line over a comment-stripped [`crate::parser::ParseTree`].
//! Declarations are recognized by a handful of anchored regexes; a line
//! that doesn't match any declaration shape is scanned for call,
//! subscript, and member-access references instead. A line is never
//! both: once a line is consumed as a declaration we don't also comb it
//! for references, which keeps `int total = compute();` from emitting a
//! spurious `compute` symbol while still missing rarer cases like calls
//! inside initializers — an accepted shallow-extraction tradeoff (spec
//! §4.2, §9).

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::{count_references_in_file, infer_c_literal, regex, split_top_level_args};
use crate::parser::ParseTree;
use crate::types::{Param, RefContext, Reference, Scope, Symbol, SymbolKind, UseKind, Language};

/// printf-family callee -> 1-based position of the format-string argument.
pub(crate) fn format_arg_position(callee: &str) -> Option<usize> {
    match callee {
        "printf" => Some(1),
        "scanf" => Some(1),
        "fprintf" => Some(2),
        "fscanf" => Some(2),
        "sprintf" => Some(2),
        "sscanf" => Some(2),
        "snprintf" => Some(3),
        _ => None,
    }
}

const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "return", "else", "break", "continue", "case", "default", "do",
    "goto", "typedef", "sizeof",
];

fn starts_with_control_keyword(code: &str) -> bool {
    let trimmed = code.trim_start();
    CONTROL_KEYWORDS.iter().any(|kw| {
        trimmed.starts_with(kw)
            && trimmed[kw.len()..].chars().next().map(|c| !c.is_alphanumeric() && c != '_').unwrap_or(true)
    })
}

fn re_extern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r"^\s*extern\s+([A-Za-z_][\w\s\*]*?)\s+([A-Za-z_]\w*)\s*(\[\s*(\d+)?\s*\])?\s*;")
    })
}

fn re_struct_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"^\s*struct\s+([A-Za-z_]\w*)\s*\{\s*$"))
}

fn re_struct_member() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"^\s*([A-Za-z_][\w\s\*]*?)\s+([A-Za-z_]\w*)\s*(\[\s*\d*\s*\])?\s*;"))
}

fn re_function() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r"^\s*([A-Za-z_][\w\s\*]*?)\s+([A-Za-z_]\w*)\s*\(([^)]*)\)\s*(\{)?\s*;?\s*$")
    })
}

fn re_array_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r"^\s*(?:static\s+)?([A-Za-z_][\w\s\*]*?)\s+([A-Za-z_]\w*)\s*\[\s*(\d+)?\s*\]\s*(=\s*\{([^}]*)\})?\s*;")
    })
}

fn re_var_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"^\s*(?:static\s+)?([A-Za-z_][\w\s\*]*?)\s+([A-Za-z_]\w*)\s*(=\s*(.+))?;\s*$"))
}

fn re_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"([A-Za-z_]\w*)\s*\(([^()]*)\)"))
}

fn re_array_access() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"([A-Za-z_]\w*)\s*\[\s*(-?\d+)?\s*\]\s*(==|=)?"))
}

fn re_member_access() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"([A-Za-z_]\w*)\s*(?:\.|->)\s*([A-Za-z_]\w*)"))
}

fn normalize_type(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn extract(file: &str, tree: &ParseTree) -> (Vec<Symbol>, Vec<Reference>) {
    let mut symbols = Vec::new();
    let mut references = Vec::new();
    let mut local_types: HashMap<String, String> = HashMap::new();

    let lines = &tree.lines;
    let mut i = 0;
    while i < lines.len() {
        let line_no = lines[i].line;
        let code = lines[i].code.as_str();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            i += 1;
            continue;
        }

        if starts_with_control_keyword(code) {
            extract_references_from_line(file, line_no, code, &local_types, &mut references);
            i += 1;
            continue;
        }

        if let Some(caps) = re_struct_start().captures(code) {
            let name = caps[1].to_string();
            let mut symbol = Symbol::new(Language::C, file, line_no, name, SymbolKind::Struct);
            let mut j = i + 1;
            while j < lines.len() {
                let member_code = lines[j].code.as_str();
                if member_code.contains('}') {
                    break;
                }
                if let Some(mcaps) = re_struct_member().captures(member_code) {
                    let mtype = normalize_type(&mcaps[1]);
                    let mname = mcaps[2].to_string();
                    symbol.struct_members.insert(mname, mtype);
                }
                j += 1;
            }
            symbols.push(symbol);
            i = j + 1;
            continue;
        }

        if let Some(caps) = re_extern().captures(code) {
            let declared_type = normalize_type(&caps[1]);
            let name = caps[2].to_string();
            let size = caps.get(4).and_then(|m| m.as_str().parse::<i64>().ok());
            let mut symbol = Symbol::new(Language::C, file, line_no, name.clone(), SymbolKind::Extern);
            symbol.declared_type = Some(declared_type.clone());
            symbol.array_size = size;
            local_types.insert(name, declared_type);
            symbols.push(symbol);
            i += 1;
            continue;
        }

        if let Some(caps) = re_function().captures(code) {
            let ret_type = normalize_type(&caps[1]);
            let name = caps[2].to_string();
            if !CONTROL_KEYWORDS.contains(&ret_type.as_str()) && ret_type != "struct" {
                let params_str = caps.get(3).map(|m| m.as_str()).unwrap_or("");
                let has_body = caps.get(4).is_some();
                let (params, varargs) = parse_c_params(params_str);
                for param in &params {
                    if let Some(param_type) = &param.annotated_type {
                        local_types.insert(param.name.clone(), param_type.clone());
                    }
                }
                let mut symbol = Symbol::new(Language::C, file, line_no, name.clone(), SymbolKind::Function);
                symbol.return_type = Some(ret_type.clone());
                symbol.params = params;
                symbol.varargs = varargs;
                symbols.push(symbol);
                local_types.insert(name, ret_type);
                if !has_body && !code.trim_end().ends_with(';') {
                    // Signature spans multiple lines; best effort only,
                    // references on the continuation lines are still scanned normally.
                }
                i += 1;
                continue;
            }
        }

        if let Some(caps) = re_array_decl().captures(code) {
            let declared_type = normalize_type(&caps[1]);
            let name = caps[2].to_string();
            let size = caps
                .get(3)
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .or_else(|| caps.get(5).map(|m| super::count_top_level_elements(m.as_str())));
            let mut symbol = Symbol::new(Language::C, file, line_no, name.clone(), SymbolKind::Array);
            symbol.declared_type = Some(declared_type.clone());
            symbol.array_size = size;
            local_types.insert(name, format!("{}[]", declared_type));
            symbols.push(symbol);
            i += 1;
            continue;
        }

        if let Some(caps) = re_var_decl().captures(code) {
            let declared_type = normalize_type(&caps[1]);
            let name = caps[2].to_string();
            if !CONTROL_KEYWORDS.contains(&declared_type.as_str()) {
                let mut symbol = Symbol::new(Language::C, file, line_no, name.clone(), SymbolKind::Variable);
                symbol.declared_type = Some(declared_type.clone());
                symbol.scope = Scope::Block;
                local_types.insert(name.clone(), declared_type);
                symbols.push(symbol);

                if let Some(init) = caps.get(4) {
                    extract_references_from_line(file, line_no, init.as_str(), &local_types, &mut references);
                }
                i += 1;
                continue;
            }
        }

        extract_references_from_line(file, line_no, code, &local_types, &mut references);
        i += 1;
    }

    for symbol in symbols.iter_mut() {
        if matches!(symbol.kind, SymbolKind::Function | SymbolKind::Extern) {
            symbol.scope = Scope::Module;
        }
    }

    count_references_in_file(&mut symbols, &references);
    (symbols, references)
}

fn parse_c_params(raw: &str) -> (Vec<Param>, bool) {
    let raw = raw.trim();
    if raw.is_empty() || raw == "void" {
        return (Vec::new(), false);
    }
    let mut params = Vec::new();
    let mut varargs = false;
    for part in split_top_level_args(raw) {
        let part = part.trim();
        if part == "..." {
            varargs = true;
            continue;
        }
        let tokens: Vec<&str> = part.rsplitn(2, |c: char| c.is_whitespace() || c == '*').collect();
        let name = tokens.first().copied().unwrap_or("").trim_start_matches('*').to_string();
        let annotated_type = if part.len() > name.len() {
            Some(normalize_type(&part[..part.len() - name.len()]))
        } else {
            None
        };
        params.push(Param { name, annotated_type, has_default: false });
    }
    (params, varargs)
}

fn extract_references_from_line(
    file: &str,
    line: usize,
    code: &str,
    local_types: &HashMap<String, String>,
    references: &mut Vec<Reference>,
) {
    for caps in re_call().captures_iter(code) {
        let name = caps[1].to_string();
        if CONTROL_KEYWORDS.contains(&name.as_str()) {
            continue;
        }
        let args_str = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let args = split_top_level_args(args_str);

        if let Some(pos) = format_arg_position(&name) {
            if let Some(fmt_arg) = args.get(pos - 1) {
                if fmt_arg.starts_with('"') {
                    let format_literal = fmt_arg.trim_matches('"').to_string();
                    let format_arg_count = args.len().saturating_sub(pos);
                    references.push(Reference {
                        name: name.clone(),
                        kind_of_use: UseKind::FormatCall,
                        file: file.to_string(),
                        line,
                        context: RefContext { format_literal: Some(format_literal), format_arg_count: Some(format_arg_count), ..Default::default() },
                    });
                    continue;
                }
            }
        }

        let arg_types = args.iter().map(|a| infer_c_literal(a)).collect();
        references.push(Reference {
            name,
            kind_of_use: UseKind::Call,
            file: file.to_string(),
            line,
            context: RefContext { arg_types, arg_count: Some(args.len()), ..Default::default() },
        });
    }

    for caps in re_array_access().captures_iter(code) {
        let name = caps[1].to_string();
        let index_literal = caps.get(2).and_then(|m| m.as_str().parse::<i64>().ok());
        let is_write = caps.get(3).map(|m| m.as_str() == "=").unwrap_or(false);

        if is_write {
            let after = &code[caps.get(0).unwrap().end()..];
            let rhs = after.trim_start().trim_start_matches('=').trim().trim_end_matches(';').trim();
            references.push(Reference {
                name,
                kind_of_use: UseKind::Write,
                file: file.to_string(),
                line,
                context: RefContext { index_literal, rhs_type: Some(infer_c_literal(rhs)), ..Default::default() },
            });
        } else {
            references.push(Reference {
                name,
                kind_of_use: UseKind::ArrayAccess,
                file: file.to_string(),
                line,
                context: RefContext { index_literal, ..Default::default() },
            });
        }
    }

    for caps in re_member_access().captures_iter(code) {
        let receiver = caps[1].to_string();
        let member = caps[2].to_string();
        let receiver_type = local_types.get(&receiver).cloned();
        references.push(Reference {
            name: receiver,
            kind_of_use: UseKind::MemberAccess,
            file: file.to_string(),
            line,
            context: RefContext { receiver_type, member_name: Some(member), ..Default::default() },
        });
    }
}
