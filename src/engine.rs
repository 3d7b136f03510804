//! Engine façade (spec §6): the five operations a transport layer would
//! call. No transport lives here — this module is the thin interface,
//! not the interface's consumer.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};
use crate::graph::{self, RepoGraph};
use crate::rules;
use crate::types::{Diagnostic, Language, OpenBuffer, Symbol};
use crate::view::{self, GraphView};

pub struct Engine {
    graph: RepoGraph,
}

/// Result of [`Engine::refresh`].
pub struct RefreshResult {
    pub symbol_count: usize,
}

impl Engine {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self { graph: RepoGraph::new(repo_path) }
    }

    /// `analyze(content, file_path, repo_path, open_buffers?)` (spec
    /// §6.1). `open_buffers` overlay the repo graph for this call only;
    /// nothing here is persisted. A parse failure degrades to an empty
    /// diagnostic list rather than a transport error (spec §7).
    pub fn analyze(&self, content: &str, file_path: &str, open_buffers: &[OpenBuffer]) -> Vec<Diagnostic> {
        let Some(language) = Language::from_extension(graph::extension_of(file_path)) else {
            tracing::warn!(file = file_path, "analyze called with an unsupported file extension");
            return Vec::new();
        };

        let (buffer_symbols, buffer_references) = graph::extract_full(language, file_path, content);
        let base_snapshot = self.graph.snapshot();

        if open_buffers.is_empty() {
            return rules::evaluate(file_path, language, &buffer_symbols, &buffer_references, &base_snapshot, self.graph.config());
        }

        // Overlay: clone the snapshot's file buckets and replace each
        // overlaid path's bucket with the unsaved buffer's symbols
        // (spec P3). The base graph itself is never mutated.
        let mut by_file = base_snapshot.by_file.clone();
        for buffer in open_buffers {
            if let Some(overlay_language) = Language::from_extension(graph::extension_of(&buffer.path)) {
                let overlay_symbols = graph::extract_file(overlay_language, &buffer.path, &buffer.content);
                by_file.insert(buffer.path.clone(), overlay_symbols);
            }
        }
        by_file.insert(file_path.to_string(), buffer_symbols.clone());

        let overlaid = crate::graph::GraphSnapshot {
            by_file: by_file.clone(),
            by_name: rebuild_by_name(&by_file),
            functions: rebuild_functions(&by_file),
        };

        rules::evaluate(file_path, language, &buffer_symbols, &buffer_references, &overlaid, self.graph.config())
    }

    /// `refresh(repo_path)` (spec §6.2): full rescan, replaces the graph.
    pub fn refresh(&self) -> RefreshResult {
        RefreshResult { symbol_count: self.graph.full_scan() }
    }

    /// Incremental single-file refresh (spec §4.3), exposed for hosts
    /// that want to avoid a full rescan on every save.
    pub fn refresh_file(&self, relative_path: &str, content: &str) -> EngineResult<()> {
        self.graph.refresh_file(relative_path, content)
    }

    /// `symbols(repo_path)` (spec §6.3): full symbol table.
    pub fn symbols(&self) -> std::collections::HashMap<String, Vec<Symbol>> {
        self.graph.snapshot().by_file.clone()
    }

    /// `graph(repo_path)` (spec §6.4): nodes/edges for visualization,
    /// joined against the last diagnostics saved via [`Engine::save_diagnostics`].
    pub fn graph_view(&self) -> GraphView {
        let diagnostics = self.load_diagnostics().unwrap_or_default();
        view::build(&self.graph.snapshot(), &diagnostics)
    }

    /// `health()` (spec §6.5).
    pub fn health(&self) -> &'static str {
        "OK"
    }

    /// `save_diagnostics(repo_path, diagnostics)` (spec §6.6): persists
    /// the union of current diagnostics so the graph view can flag
    /// error nodes. Write failures are logged; in-memory state stays
    /// authoritative (spec §7).
    pub fn save_diagnostics(&self, diagnostics: &[Diagnostic]) -> EngineResult<()> {
        let dir = self.graph.root().join(".snipe");
        fs::create_dir_all(&dir).map_err(|e| EngineError::Write { path: dir.clone(), source: e })?;

        let path = dir.join("diagnostics.json");
        let mut sorted = diagnostics.to_vec();
        sorted.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
        let deduped = Diagnostic::dedup(sorted);

        let json = serde_json::to_vec_pretty(&deduped)?;
        let tmp_path = dir.join("diagnostics.json.tmp");
        fs::write(&tmp_path, &json).map_err(|e| EngineError::Write { path: tmp_path.clone(), source: e })?;
        fs::rename(&tmp_path, &path).map_err(|e| EngineError::Write { path: path.clone(), source: e })?;
        Ok(())
    }

    fn load_diagnostics(&self) -> EngineResult<Vec<Diagnostic>> {
        let path = self.graph.root().join(".snipe").join("diagnostics.json");
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| EngineError::Read { path: path.clone(), source: e })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn root(&self) -> &Path {
        self.graph.root()
    }
}

fn rebuild_by_name(
    by_file: &std::collections::HashMap<String, Vec<Symbol>>,
) -> std::collections::HashMap<(Language, String), Vec<Symbol>> {
    let mut by_name: std::collections::HashMap<(Language, String), Vec<Symbol>> = std::collections::HashMap::new();
    let mut paths: Vec<&String> = by_file.keys().collect();
    paths.sort();
    for path in paths {
        for symbol in &by_file[path] {
            by_name.entry((symbol.language, symbol.name.clone())).or_default().push(symbol.clone());
        }
    }
    by_name
}

fn rebuild_functions(
    by_file: &std::collections::HashMap<String, Vec<Symbol>>,
) -> std::collections::HashMap<(Language, String), Symbol> {
    let mut functions: std::collections::HashMap<(Language, String), Symbol> = std::collections::HashMap::new();
    let mut paths: Vec<&String> = by_file.keys().collect();
    paths.sort();
    for path in paths {
        for symbol in &by_file[path] {
            if symbol.kind == crate::types::SymbolKind::Function {
                functions.entry((symbol.language, symbol.name.clone())).or_insert_with(|| symbol.clone());
            }
        }
    }
    functions
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn analyze_returns_empty_for_unparseable_extension() {
        let temp = TempDir::new().expect("temp dir");
        let engine = Engine::new(temp.path());
        let diagnostics = engine.analyze("garbage", "file.unknown", &[]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn refresh_rebuilds_symbol_count() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("a.c"), "int x;\nint y;\n").unwrap();
        let engine = Engine::new(temp.path());
        let result = engine.refresh();
        assert_eq!(result.symbol_count, 2);
    }

    #[test]
    fn open_buffer_overlay_is_not_persisted() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("core.c"), "int arr[10];\n").unwrap();
        let engine = Engine::new(temp.path());
        engine.refresh();

        let overlay = OpenBuffer { path: "core.c".to_string(), content: "int arr[5];\n".to_string() };
        let diagnostics = engine.analyze("int x = arr[7];\n", "main.c", std::slice::from_ref(&overlay));
        assert!(diagnostics.iter().any(|d| d.code == crate::types::DiagnosticCode::ArrayBounds));

        // The on-disk graph is untouched by the overlay.
        let persisted_symbols = engine.symbols();
        let core = &persisted_symbols["core.c"];
        assert_eq!(core[0].array_size, Some(10));
    }

    #[test]
    fn save_and_load_diagnostics_round_trips_through_graph_view() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("main.c"), "int x;\n").unwrap();
        let engine = Engine::new(temp.path());
        engine.refresh();

        let diagnostics = vec![Diagnostic {
            file: "main.c".to_string(),
            line: 1,
            severity: crate::types::Severity::Warning,
            code: crate::types::DiagnosticCode::UnusedExtern,
            message: "unused".to_string(),
        }];
        engine.save_diagnostics(&diagnostics).unwrap();

        let view = engine.graph_view();
        let file_node = view.nodes.iter().find(|n| matches!(n.kind, crate::view::NodeKind::File)).unwrap();
        assert!(file_node.has_errors);
    }

    #[test]
    fn health_reports_ok() {
        let temp = TempDir::new().expect("temp dir");
        let engine = Engine::new(temp.path());
        assert_eq!(engine.health(), "OK");
    }
}
