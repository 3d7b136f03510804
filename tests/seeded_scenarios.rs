//! End-to-end tests driving the full engine through its five public
//! operations, one per seeded scenario.

use snipe::{DiagnosticCode, Engine, OpenBuffer, Severity};
use tempfile::TempDir;

#[test]
fn array_out_of_bounds_cites_the_declaring_file() {
    let temp = TempDir::new().expect("temp dir");
    std::fs::write(temp.path().join("core.c"), "int arr[10];\n").unwrap();

    let engine = Engine::new(temp.path());
    engine.refresh();

    let diagnostics = engine.analyze("int x = arr[12];\n", "main.c", &[]);
    assert_eq!(diagnostics.len(), 1);
    let d = &diagnostics[0];
    assert_eq!(d.file, "main.c");
    assert_eq!(d.line, 1);
    assert_eq!(d.severity, Severity::Error);
    assert_eq!(d.code, DiagnosticCode::ArrayBounds);
    assert_eq!(d.message, "Index 12 exceeds declared size 10 in core.c:1");
}

#[test]
fn python_cross_file_annotation_mismatch() {
    let temp = TempDir::new().expect("temp dir");
    std::fs::write(temp.path().join("a.py"), "balance: int = 0\n").unwrap();

    let engine = Engine::new(temp.path());
    engine.refresh();

    let diagnostics = engine.analyze("balance: float = 3.14\n", "b.py", &[]);
    let mismatches: Vec<_> = diagnostics.iter().filter(|d| d.code == DiagnosticCode::TypeMismatch).collect();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].file, "b.py");
    assert_eq!(mismatches[0].line, 1);
}

#[test]
fn call_with_too_few_arguments_reports_signature_drift() {
    let temp = TempDir::new().expect("temp dir");
    std::fs::write(temp.path().join("defs.py"), "def compute(a, b, c):\n    return a\n").unwrap();

    let engine = Engine::new(temp.path());
    engine.refresh();

    let diagnostics = engine.analyze("compute(1, 2)\n", "call_site.py", &[]);
    let drift = diagnostics.iter().find(|d| d.code == DiagnosticCode::SignatureDrift).expect("signature drift diagnostic");
    assert!(drift.message.contains("expects 3 got 2"));
}

#[test]
fn gets_call_reports_unsafe_function_error() {
    let temp = TempDir::new().expect("temp dir");
    let engine = Engine::new(temp.path());
    engine.refresh();

    let diagnostics = engine.analyze("gets(buf);\n", "input.c", &[]);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[0].code, DiagnosticCode::UnsafeFunction);
    assert!(diagnostics[0].message.contains("fgets"));
}

#[test]
fn printf_specifier_count_mismatch() {
    let temp = TempDir::new().expect("temp dir");
    let engine = Engine::new(temp.path());
    engine.refresh();

    let diagnostics = engine.analyze(r#"printf("%d %s", 42);"#, "log.c", &[]);
    let fmt = diagnostics.iter().find(|d| d.code == DiagnosticCode::FormatString).expect("format diagnostic");
    assert_eq!(fmt.severity, Severity::Error);
    assert!(fmt.message.contains("2 specifiers, 1 argument"));
}

#[test]
fn unused_import_warns_but_used_one_does_not() {
    let temp = TempDir::new().expect("temp dir");
    let engine = Engine::new(temp.path());
    engine.refresh();

    let diagnostics = engine.analyze("from os import path, getcwd\nprint(path)\n", "util.py", &[]);
    let dead: Vec<_> = diagnostics.iter().filter(|d| d.code == DiagnosticCode::DeadImport).collect();
    assert_eq!(dead.len(), 1);
    assert!(dead[0].message.contains("getcwd"));
    assert!(!dead[0].message.contains("path is"));
}

#[test]
fn open_buffer_overlay_takes_precedence_over_disk() {
    let temp = TempDir::new().expect("temp dir");
    std::fs::write(temp.path().join("shared.c"), "int table[20];\n").unwrap();
    let engine = Engine::new(temp.path());
    engine.refresh();

    // Against the on-disk version, index 15 is in bounds.
    let clean = engine.analyze("int x = table[15];\n", "reader.c", &[]);
    assert!(clean.iter().all(|d| d.code != DiagnosticCode::ArrayBounds));

    // The unsaved overlay shrinks the array; the same read is now out of bounds.
    let overlay = OpenBuffer { path: "shared.c".to_string(), content: "int table[10];\n".to_string() };
    let overlaid = engine.analyze("int x = table[15];\n", "reader.c", std::slice::from_ref(&overlay));
    assert!(overlaid.iter().any(|d| d.code == DiagnosticCode::ArrayBounds));
}

#[test]
fn save_diagnostics_then_graph_view_flags_the_file_node() {
    let temp = TempDir::new().expect("temp dir");
    std::fs::write(temp.path().join("risky.c"), "gets(buf);\n").unwrap();
    let engine = Engine::new(temp.path());
    engine.refresh();

    let diagnostics = engine.analyze("gets(buf);\n", "risky.c", &[]);
    engine.save_diagnostics(&diagnostics).unwrap();

    assert!(temp.path().join(".snipe").join("diagnostics.json").exists());

    let view = engine.graph_view();
    let risky_node = view.nodes.iter().find(|n| n.file == "risky.c" && matches!(n.kind, snipe::NodeKind::File)).unwrap();
    assert!(risky_node.has_errors);
}

#[test]
fn analyze_is_idempotent() {
    let temp = TempDir::new().expect("temp dir");
    std::fs::write(temp.path().join("core.c"), "int arr[10];\n").unwrap();
    let engine = Engine::new(temp.path());
    engine.refresh();

    let first = engine.analyze("int x = arr[12];\n", "main.c", &[]);
    let second = engine.analyze("int x = arr[12];\n", "main.c", &[]);
    assert_eq!(first.len(), second.len());
    assert_eq!(first[0].message, second[0].message);
}
