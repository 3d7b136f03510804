//! Analysis rules engine (spec §4.4).
//!
//! The rule set is fixed and language-scoped; `evaluate` is the single
//! entry point the engine façade calls. Each rule function is pure:
//! `(buffer state, repo snapshot, config) -> Vec<Diagnostic>`, so
//! rule independence (spec P6) falls out of the structure rather than
//! needing to be proven separately.

mod allowlist;

use std::collections::HashSet;

use crate::graph::GraphSnapshot;
use crate::types::{
    ApparentType, Diagnostic, DiagnosticCode, Language, Reference, Scope, Severity, Symbol,
    SymbolKind, UseKind,
};

/// Resolve a symbol of the given kind, preferring the buffer's own
/// declaration (spec §4.4 rule 2: "the buffer is the newest source of
/// truth for its file") before falling back to the repo's canonical
/// (first lexicographic file) definition.
fn resolve_canonical<'a>(
    buffer_symbols: &'a [Symbol],
    snapshot: &'a GraphSnapshot,
    language: Language,
    name: &str,
    kinds: &[SymbolKind],
) -> Option<&'a Symbol> {
    if let Some(s) = buffer_symbols.iter().find(|s| s.language == language && s.name == name && kinds.contains(&s.kind)) {
        return Some(s);
    }
    snapshot.lookup_by_name(language, name).iter().find(|s| kinds.contains(&s.kind))
}

fn strip_struct_keyword(raw: &str) -> &str {
    raw.strip_prefix("struct ").or_else(|| raw.strip_prefix("union ")).map(str::trim).unwrap_or(raw)
}

fn normalize_type_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ").replace("[]", "").trim().to_string()
}

fn c_type_compatible(declared: &str, observed: &ApparentType) -> bool {
    let observed_str = observed.as_str();
    if observed_str == "unknown" {
        return true;
    }
    match declared {
        "char" => observed_str == "char",
        "int" => matches!(observed_str, "int" | "char"),
        "float" | "double" => matches!(observed_str, "float" | "int"),
        _ => true,
    }
}

fn python_type_compatible(annotation: &str, observed: &ApparentType) -> bool {
    let observed_str = observed.as_str();
    if observed_str == "unknown" {
        return true;
    }
    match annotation {
        "int" => observed_str == "int",
        "float" => matches!(observed_str, "int" | "float"),
        "str" => observed_str == "str",
        "bool" => observed_str == "bool",
        "list" => observed_str == "list",
        "tuple" => observed_str == "tuple",
        "dict" => observed_str == "dict",
        "set" => observed_str == "set",
        _ => true,
    }
}

/// Run the full rule set over one buffer. `buffer_file` and `language`
/// identify the buffer; repo lookups are restricted to `language`
/// throughout (spec I3, §4.4 rule 1).
pub fn evaluate(
    buffer_file: &str,
    language: Language,
    buffer_symbols: &[Symbol],
    buffer_references: &[Reference],
    snapshot: &GraphSnapshot,
    config: &crate::config::SnipeConfig,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let star_import = buffer_symbols.iter().any(|s| s.star_import);

    match language {
        Language::C => {
            r_type_extern(buffer_file, buffer_symbols, snapshot, &mut diagnostics);
            r_type_array_write(buffer_file, language, buffer_symbols, buffer_references, snapshot, &mut diagnostics);
            r_format(buffer_file, buffer_references, &mut diagnostics);
            r_struct(buffer_file, buffer_symbols, buffer_references, snapshot, &mut diagnostics);
            r_unsafe(buffer_file, buffer_references, config, &mut diagnostics);
            r_unused_extern(buffer_file, buffer_symbols, &mut diagnostics);
        }
        Language::Python => {
            r_type_assign(buffer_file, buffer_references, &mut diagnostics);
            r_type_return(buffer_file, buffer_references, &mut diagnostics);
            r_type_cross_file(buffer_file, language, buffer_symbols, snapshot, &mut diagnostics);
            r_arg_type(buffer_file, language, buffer_symbols, buffer_references, snapshot, &mut diagnostics);
            r_shadow(buffer_file, buffer_symbols, &mut diagnostics);
            r_dead_import(buffer_file, buffer_symbols, &mut diagnostics);
        }
    }

    r_bounds(buffer_file, language, buffer_symbols, buffer_references, snapshot, &mut diagnostics);
    r_signature(buffer_file, language, buffer_symbols, buffer_references, snapshot, &mut diagnostics);
    if !star_import {
        r_undefined(buffer_file, language, buffer_symbols, buffer_references, snapshot, &mut diagnostics);
    }

    diagnostics.retain(|d| config.rule_enabled(d.code.as_str()));
    Diagnostic::dedup(diagnostics)
}

fn r_type_extern(file: &str, buffer_symbols: &[Symbol], snapshot: &GraphSnapshot, out: &mut Vec<Diagnostic>) {
    for extern_sym in buffer_symbols.iter().filter(|s| s.kind == SymbolKind::Extern) {
        let Some(canonical) = resolve_canonical(
            buffer_symbols,
            snapshot,
            Language::C,
            &extern_sym.name,
            &[SymbolKind::Variable, SymbolKind::Array],
        ) else {
            continue;
        };
        let extern_type = normalize_type_text(extern_sym.declared_type.as_deref().unwrap_or(""));
        let canonical_type = normalize_type_text(canonical.declared_type.as_deref().unwrap_or(""));
        if extern_type != canonical_type {
            out.push(Diagnostic {
                file: file.to_string(),
                line: extern_sym.line,
                severity: Severity::Error,
                code: DiagnosticCode::TypeMismatch,
                message: format!(
                    "extern {} {} does not match declared type {} {} at {}:{}",
                    extern_sym.declared_type.as_deref().unwrap_or("?"),
                    extern_sym.name,
                    canonical.declared_type.as_deref().unwrap_or("?"),
                    canonical.name,
                    canonical.file,
                    canonical.line
                ),
            });
        }
    }
}

fn r_type_array_write(
    file: &str,
    language: Language,
    buffer_symbols: &[Symbol],
    buffer_references: &[Reference],
    snapshot: &GraphSnapshot,
    out: &mut Vec<Diagnostic>,
) {
    for reference in buffer_references.iter().filter(|r| r.kind_of_use == UseKind::Write && r.context.index_literal.is_some()) {
        let Some(array_sym) = resolve_canonical(buffer_symbols, snapshot, language, &reference.name, &[SymbolKind::Array]) else {
            continue;
        };
        let Some(declared_type) = array_sym.declared_type.as_deref() else {
            continue;
        };
        let Some(rhs_type) = &reference.context.rhs_type else {
            continue;
        };
        if !c_type_compatible(declared_type, rhs_type) {
            out.push(Diagnostic {
                file: file.to_string(),
                line: reference.line,
                severity: Severity::Error,
                code: DiagnosticCode::TypeMismatch,
                message: format!(
                    "assigning {} value to element of {} {}[]",
                    rhs_type.as_str(),
                    declared_type,
                    reference.name
                ),
            });
        }
    }
}

fn r_type_assign(file: &str, buffer_references: &[Reference], out: &mut Vec<Diagnostic>) {
    for reference in buffer_references.iter().filter(|r| r.kind_of_use == UseKind::Write) {
        let (Some(target_type), Some(rhs_type)) = (&reference.context.target_type, &reference.context.rhs_type) else {
            continue;
        };
        if !python_type_compatible(target_type, rhs_type) {
            out.push(Diagnostic {
                file: file.to_string(),
                line: reference.line,
                severity: Severity::Error,
                code: DiagnosticCode::TypeMismatch,
                message: format!("{} annotated as {} but assigned a {} value", reference.name, target_type, rhs_type.as_str()),
            });
        }
    }
}

fn r_type_return(file: &str, buffer_references: &[Reference], out: &mut Vec<Diagnostic>) {
    for reference in buffer_references.iter().filter(|r| r.kind_of_use == UseKind::Read && r.context.target_type.is_some()) {
        let (Some(return_type), Some(rhs_type)) = (&reference.context.target_type, &reference.context.rhs_type) else {
            continue;
        };
        if !python_type_compatible(return_type, rhs_type) {
            out.push(Diagnostic {
                file: file.to_string(),
                line: reference.line,
                severity: Severity::Error,
                code: DiagnosticCode::TypeMismatch,
                message: format!("function {} declared to return {} but returns a {} value", reference.name, return_type, rhs_type.as_str()),
            });
        }
    }
}

fn r_type_cross_file(
    file: &str,
    language: Language,
    buffer_symbols: &[Symbol],
    snapshot: &GraphSnapshot,
    out: &mut Vec<Diagnostic>,
) {
    for sym in buffer_symbols.iter().filter(|s| s.kind == SymbolKind::Variable && s.scope == Scope::Module && s.declared_type.is_some()) {
        let canonical_elsewhere = snapshot
            .lookup_by_name(language, &sym.name)
            .iter()
            .find(|other| other.file != file && other.kind == SymbolKind::Variable && other.scope == Scope::Module);
        let Some(canonical) = canonical_elsewhere else { continue };
        if canonical.declared_type != sym.declared_type {
            out.push(Diagnostic {
                file: file.to_string(),
                line: sym.line,
                severity: Severity::Error,
                code: DiagnosticCode::TypeMismatch,
                message: format!(
                    "{} annotated as {} here but {} at {}:{}",
                    sym.name,
                    sym.declared_type.as_deref().unwrap_or("?"),
                    canonical.declared_type.as_deref().unwrap_or("?"),
                    canonical.file,
                    canonical.line
                ),
            });
        }
    }
}

fn r_bounds(
    file: &str,
    language: Language,
    buffer_symbols: &[Symbol],
    buffer_references: &[Reference],
    snapshot: &GraphSnapshot,
    out: &mut Vec<Diagnostic>,
) {
    for reference in buffer_references.iter().filter(|r| matches!(r.kind_of_use, UseKind::Write | UseKind::ArrayAccess)) {
        let Some(index) = reference.context.index_literal else { continue };
        let Some(array_sym) = resolve_canonical(buffer_symbols, snapshot, language, &reference.name, &[SymbolKind::Array]) else {
            continue;
        };
        let Some(size) = array_sym.array_size else { continue };
        if index < 0 || index >= size {
            out.push(Diagnostic {
                file: file.to_string(),
                line: reference.line,
                severity: Severity::Error,
                code: DiagnosticCode::ArrayBounds,
                message: format!(
                    "Index {} exceeds declared size {} in {}:{}",
                    index, size, array_sym.file, array_sym.line
                ),
            });
        }
    }
}

fn r_signature(
    file: &str,
    language: Language,
    buffer_symbols: &[Symbol],
    buffer_references: &[Reference],
    snapshot: &GraphSnapshot,
    out: &mut Vec<Diagnostic>,
) {
    for reference in buffer_references.iter().filter(|r| r.kind_of_use == UseKind::Call) {
        let Some(func) = resolve_canonical(buffer_symbols, snapshot, language, &reference.name, &[SymbolKind::Function]) else {
            continue;
        };
        let Some(arg_count) = reference.context.arg_count else { continue };

        let required = func.params.iter().filter(|p| !p.has_default).count();
        let max = if func.varargs { usize::MAX } else { func.params.len() };
        if arg_count < required || arg_count > max {
            out.push(Diagnostic {
                file: file.to_string(),
                line: reference.line,
                severity: Severity::Error,
                code: DiagnosticCode::SignatureDrift,
                message: format!("{} expects {} got {}", reference.name, required, arg_count),
            });
        }
    }
}

fn r_arg_type(
    file: &str,
    language: Language,
    buffer_symbols: &[Symbol],
    buffer_references: &[Reference],
    snapshot: &GraphSnapshot,
    out: &mut Vec<Diagnostic>,
) {
    for reference in buffer_references.iter().filter(|r| r.kind_of_use == UseKind::Call) {
        let Some(func) = resolve_canonical(buffer_symbols, snapshot, language, &reference.name, &[SymbolKind::Function]) else {
            continue;
        };
        for (i, arg_type) in reference.context.arg_types.iter().enumerate() {
            let Some(param) = func.params.get(i) else { break };
            let Some(annotated) = &param.annotated_type else { continue };
            if !python_type_compatible(annotated, arg_type) {
                out.push(Diagnostic {
                    file: file.to_string(),
                    line: reference.line,
                    severity: Severity::Error,
                    code: DiagnosticCode::ArgTypeMismatch,
                    message: format!(
                        "argument {} to {} expects {} got {}",
                        i + 1,
                        reference.name,
                        annotated,
                        arg_type.as_str()
                    ),
                });
            }
        }
    }
}

fn r_undefined(
    file: &str,
    language: Language,
    buffer_symbols: &[Symbol],
    buffer_references: &[Reference],
    snapshot: &GraphSnapshot,
    out: &mut Vec<Diagnostic>,
) {
    let builtin_ok = |name: &str| match language {
        Language::C => allowlist::c_stdlib().contains(name),
        Language::Python => allowlist::python_builtins().contains(name),
    };

    let buffer_names: HashSet<&str> = buffer_symbols.iter().map(|s| s.name.as_str()).collect();

    for reference in buffer_references.iter().filter(|r| matches!(r.kind_of_use, UseKind::Call | UseKind::ArrayAccess | UseKind::MemberAccess)) {
        if buffer_names.contains(reference.name.as_str()) || builtin_ok(&reference.name) {
            continue;
        }
        if !snapshot.lookup_by_name(language, &reference.name).is_empty() {
            continue;
        }
        out.push(Diagnostic {
            file: file.to_string(),
            line: reference.line,
            severity: Severity::Warning,
            code: DiagnosticCode::UndefinedSymbol,
            message: format!("{} is not defined in this file or the repository", reference.name),
        });
    }
}

fn r_shadow(file: &str, buffer_symbols: &[Symbol], out: &mut Vec<Diagnostic>) {
    let module_names: HashSet<&str> = buffer_symbols
        .iter()
        .filter(|s| s.scope == Scope::Module)
        .map(|s| s.name.as_str())
        .collect();

    for sym in buffer_symbols.iter().filter(|s| s.scope == Scope::Function && s.kind == SymbolKind::Variable) {
        if module_names.contains(sym.name.as_str()) {
            out.push(Diagnostic {
                file: file.to_string(),
                line: sym.line,
                severity: Severity::Warning,
                code: DiagnosticCode::ShadowedSymbol,
                message: format!("{} shadows a module-level symbol of the same name", sym.name),
            });
        }
    }
}

fn r_dead_import(file: &str, buffer_symbols: &[Symbol], out: &mut Vec<Diagnostic>) {
    for sym in buffer_symbols.iter().filter(|s| s.kind == SymbolKind::Import && !s.star_import) {
        if sym.references_in_file == 0 {
            out.push(Diagnostic {
                file: file.to_string(),
                line: sym.line,
                severity: Severity::Warning,
                code: DiagnosticCode::DeadImport,
                message: format!("{} is imported but never used", sym.name),
            });
        }
    }
}

fn r_unused_extern(file: &str, buffer_symbols: &[Symbol], out: &mut Vec<Diagnostic>) {
    for sym in buffer_symbols.iter().filter(|s| s.kind == SymbolKind::Extern) {
        if sym.references_in_file == 0 {
            out.push(Diagnostic {
                file: file.to_string(),
                line: sym.line,
                severity: Severity::Warning,
                code: DiagnosticCode::UnusedExtern,
                message: format!("extern {} is never referenced in this file", sym.name),
            });
        }
    }
}

fn re_format_specifier() -> &'static regex::Regex {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"%[-+ 0#]*\d*(?:\.\d+)?(?:hh|h|ll|l|L|j|z|t)?[diouxXeEfFgGaAcspn%]").expect("valid regex"))
}

fn r_format(file: &str, buffer_references: &[Reference], out: &mut Vec<Diagnostic>) {
    for reference in buffer_references.iter().filter(|r| r.kind_of_use == UseKind::FormatCall) {
        let Some(literal) = &reference.context.format_literal else { continue };
        let arg_count = reference.context.format_arg_count.unwrap_or(0);
        let specifier_count = re_format_specifier()
            .find_iter(literal)
            .filter(|m| m.as_str() != "%%")
            .count();
        if specifier_count != arg_count {
            out.push(Diagnostic {
                file: file.to_string(),
                line: reference.line,
                severity: Severity::Error,
                code: DiagnosticCode::FormatString,
                message: format!("{} specifiers, {} argument{}", specifier_count, arg_count, if arg_count == 1 { "" } else { "s" }),
            });
        }
    }
}

fn r_struct(
    file: &str,
    buffer_symbols: &[Symbol],
    buffer_references: &[Reference],
    snapshot: &GraphSnapshot,
    out: &mut Vec<Diagnostic>,
) {
    for reference in buffer_references.iter().filter(|r| r.kind_of_use == UseKind::MemberAccess) {
        let Some(receiver_type) = &reference.context.receiver_type else { continue };
        let Some(member) = &reference.context.member_name else { continue };
        let struct_name = strip_struct_keyword(receiver_type.trim_end_matches('*').trim());

        let Some(struct_sym) = resolve_canonical(buffer_symbols, snapshot, Language::C, struct_name, &[SymbolKind::Struct]) else {
            continue;
        };
        if !struct_sym.struct_members.contains_key(member) {
            out.push(Diagnostic {
                file: file.to_string(),
                line: reference.line,
                severity: Severity::Error,
                code: DiagnosticCode::StructAccess,
                message: format!("{} has no member {}", struct_name, member),
            });
        }
    }
}

fn r_unsafe(file: &str, buffer_references: &[Reference], config: &crate::config::SnipeConfig, out: &mut Vec<Diagnostic>) {
    let table = allowlist::unsafe_functions();
    for reference in buffer_references.iter().filter(|r| r.kind_of_use == UseKind::Call) {
        if let Some(info) = table.get(reference.name.as_str()) {
            out.push(Diagnostic {
                file: file.to_string(),
                line: reference.line,
                severity: info.severity,
                code: DiagnosticCode::UnsafeFunction,
                message: format!("{} is unsafe: {}; use {} instead", reference.name, info.rationale, info.replacement),
            });
        } else if config.unsafe_functions.extra_warn.iter().any(|n| n == &reference.name) {
            out.push(Diagnostic {
                file: file.to_string(),
                line: reference.line,
                severity: Severity::Warning,
                code: DiagnosticCode::UnsafeFunction,
                message: format!("{} is flagged as unsafe by repository configuration", reference.name),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnipeConfig;
    use crate::graph::RepoGraph;
    use tempfile::TempDir;

    fn analyze(repo: &RepoGraph, file: &str, content: &str, language: Language) -> Vec<Diagnostic> {
        let (symbols, references) = crate::graph::extract_full(language, file, content);
        evaluate(file, language, &symbols, &references, &repo.snapshot(), repo.config())
    }

    #[test]
    fn array_bounds_cross_file() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("core.c"), "int arr[10];\n").unwrap();
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "main.c", "int x = arr[12];\n", Language::C);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::ArrayBounds);
        assert!(diags[0].message.contains("core.c:1"));
    }

    #[test]
    fn python_cross_file_type_mismatch() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("a.py"), "balance: int = 0\n").unwrap();
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "b.py", "balance: float = 3.14\n", Language::Python);
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::TypeMismatch));
    }

    #[test]
    fn signature_drift_on_wrong_arg_count() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("a.py"), "def compute(a, b, c):\n    return a\n").unwrap();
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "b.py", "compute(1, 2)\n", Language::Python);
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::SignatureDrift && d.message.contains("expects 3 got 2")));
    }

    #[test]
    fn gets_triggers_unsafe_error() {
        let temp = TempDir::new().expect("temp dir");
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "main.c", "gets(buf);\n", Language::C);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].code, DiagnosticCode::UnsafeFunction);
    }

    #[test]
    fn format_string_mismatch() {
        let temp = TempDir::new().expect("temp dir");
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "main.c", r#"printf("%d %s", 42);"#, Language::C);
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::FormatString && d.message.contains("2 specifiers, 1 argument")));
    }

    #[test]
    fn dead_import_on_unused_name() {
        let temp = TempDir::new().expect("temp dir");
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "b.py", "from os import path, getcwd\nprint(path)\n", Language::Python);
        let dead: Vec<_> = diags.iter().filter(|d| d.code == DiagnosticCode::DeadImport).collect();
        assert_eq!(dead.len(), 1);
        assert!(dead[0].message.contains("getcwd"));
    }

    #[test]
    fn star_import_suppresses_undefined_warnings() {
        let temp = TempDir::new().expect("temp dir");
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "b.py", "from os import *\nsome_undefined_name()\n", Language::Python);
        assert!(!diags.iter().any(|d| d.code == DiagnosticCode::UndefinedSymbol));
    }

    #[test]
    fn config_extra_warn_flags_unlisted_function() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(".snipe");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[unsafe_functions]\nextra_warn = [\"my_unsafe_copy\"]\n").unwrap();
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "main.c", "my_unsafe_copy(dst, src);\n", Language::C);
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::UnsafeFunction && d.severity == Severity::Warning));
    }

    #[test]
    fn extern_type_mismatch_against_canonical_definition() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("core.c"), "int counter;\n").unwrap();
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "main.c", "extern float counter;\n", Language::C);
        let mismatch = diags.iter().find(|d| d.code == DiagnosticCode::TypeMismatch).expect("type mismatch diagnostic");
        assert!(mismatch.message.contains("core.c:1"));
    }

    #[test]
    fn array_write_with_incompatible_value_type() {
        let temp = TempDir::new().expect("temp dir");
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "main.c", "char label[5];\nlabel[0] = 3.14;\n", Language::C);
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::TypeMismatch && d.message.contains("label")));
    }

    #[test]
    fn arg_type_mismatch_against_annotated_parameter() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("greet.py"), "def greet(name: str):\n    return name\n").unwrap();
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "call_site.py", "greet(5)\n", Language::Python);
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::ArgTypeMismatch));
    }

    #[test]
    fn shadow_warning_on_function_local_reuse_of_module_name() {
        let temp = TempDir::new().expect("temp dir");
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "a.py", "balance: int = 0\ndef f():\n    balance = 1\n", Language::Python);
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::ShadowedSymbol && d.message.contains("balance")));
    }

    #[test]
    fn unused_extern_with_no_references_in_file() {
        let temp = TempDir::new().expect("temp dir");
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "main.c", "extern int counter;\n", Language::C);
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::UnusedExtern && d.message.contains("counter")));
    }

    #[test]
    fn struct_access_through_pointer_parameter_flags_unknown_member() {
        let temp = TempDir::new().expect("temp dir");
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let content = "struct Point {\n    int x;\n    int y;\n};\nvoid f(struct Point *p) {\n    p->z = 1;\n}\n";
        let diags = analyze(&repo, "shapes.c", content, Language::C);
        let struct_diag = diags.iter().find(|d| d.code == DiagnosticCode::StructAccess).expect("struct access diagnostic");
        assert!(struct_diag.message.contains("Point"));
        assert!(struct_diag.message.contains('z'));
    }

    #[test]
    fn return_type_mismatch_against_annotation() {
        let temp = TempDir::new().expect("temp dir");
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diags = analyze(&repo, "a.py", "def f() -> int:\n    return \"oops\"\n", Language::Python);
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::TypeMismatch && d.message.contains("f")));
    }

    #[test]
    fn dedup_collapses_identical_diagnostics() {
        let file = "a.c".to_string();
        let diags = vec![
            Diagnostic { file: file.clone(), line: 1, severity: Severity::Error, code: DiagnosticCode::UnsafeFunction, message: "x".into() },
            Diagnostic { file: file.clone(), line: 1, severity: Severity::Error, code: DiagnosticCode::UnsafeFunction, message: "x".into() },
        ];
        assert_eq!(Diagnostic::dedup(diags).len(), 1);
    }
}
