//! Graph view builder (spec §4.5).
//!
//! Projects the repo graph plus the most recently saved diagnostics
//! into a node/edge view for visualization. Error-matching is by file
//! **basename**, not full path — a documented limitation (spec §9,
//! "Name collisions across directories"), not an oversight.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::graph::GraphSnapshot;
use crate::types::{Diagnostic, SymbolKind};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Symbol,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub file: String,
    pub line: Option<usize>,
    #[serde(rename = "hasErrors")]
    pub has_errors: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EdgeKind {
    BelongsTo,
    References,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

fn basename(path: &str) -> String {
    Path::new(path).file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| path.to_string())
}

fn file_node_id(path: &str) -> String {
    format!("file:{}", path)
}

fn symbol_node_id(path: &str, line: usize, name: &str) -> String {
    format!("symbol:{}:{}:{}", path, line, name)
}

/// Build the current view from a repo snapshot and the last-known
/// diagnostics set (spec §4.5, §6 `graph(repo_path)`).
pub fn build(snapshot: &GraphSnapshot, diagnostics: &[Diagnostic]) -> GraphView {
    let mut by_basename: HashMap<String, Vec<&Diagnostic>> = HashMap::new();
    for d in diagnostics {
        by_basename.entry(basename(&d.file)).or_default().push(d);
    }

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    // name -> (file, node_id), used to draw REFERENCES edges between
    // symbols of the same name declared in different files.
    let mut by_name: HashMap<&str, Vec<(&str, String)>> = HashMap::new();

    let mut files: Vec<&String> = snapshot.by_file.keys().collect();
    files.sort();

    for file in &files {
        let file_basename = basename(file);
        let file_has_errors = by_basename.get(&file_basename).is_some();
        let file_id = file_node_id(file);

        nodes.push(Node {
            id: file_id.clone(),
            kind: NodeKind::File,
            label: file_basename.clone(),
            file: (*file).clone(),
            line: None,
            has_errors: file_has_errors,
        });

        for symbol in &snapshot.by_file[*file] {
            if !matches!(symbol.kind, SymbolKind::Function | SymbolKind::Variable | SymbolKind::Array) {
                continue;
            }
            let node_id = symbol_node_id(file, symbol.line, &symbol.name);
            let has_errors = by_basename
                .get(&file_basename)
                .map(|ds| ds.iter().any(|d| d.line == symbol.line))
                .unwrap_or(false);

            nodes.push(Node {
                id: node_id.clone(),
                kind: NodeKind::Symbol,
                label: symbol.name.clone(),
                file: file.to_string(),
                line: Some(symbol.line),
                has_errors,
            });
            edges.push(Edge { from: node_id.clone(), to: file_id.clone(), kind: EdgeKind::BelongsTo });
            by_name.entry(symbol.name.as_str()).or_default().push((file.as_str(), node_id));
        }
    }

    for (_, occurrences) in by_name {
        for i in 0..occurrences.len() {
            for j in (i + 1)..occurrences.len() {
                let (file_a, id_a) = &occurrences[i];
                let (file_b, id_b) = &occurrences[j];
                if file_a != file_b {
                    edges.push(Edge { from: id_a.clone(), to: id_b.clone(), kind: EdgeKind::References });
                }
            }
        }
    }

    GraphView { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RepoGraph;
    use crate::types::{DiagnosticCode, Severity};
    use tempfile::TempDir;

    #[test]
    fn file_node_flagged_when_diagnostic_matches_basename() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("main.c"), "int x;\n").unwrap();
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let diagnostics = vec![Diagnostic {
            file: "main.c".to_string(),
            line: 1,
            severity: Severity::Error,
            code: DiagnosticCode::UnsafeFunction,
            message: "boom".to_string(),
        }];
        let view = build(&repo.snapshot(), &diagnostics);
        let file_node = view.nodes.iter().find(|n| matches!(n.kind, NodeKind::File)).unwrap();
        assert!(file_node.has_errors);
    }

    #[test]
    fn references_edge_drawn_across_files_sharing_a_name() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("a.c"), "int helper(int x) {\n  return x;\n}\n").unwrap();
        std::fs::write(temp.path().join("b.c"), "int main() {\n  return helper(1);\n}\n").unwrap();
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let view = build(&repo.snapshot(), &[]);
        assert!(view.edges.iter().any(|e| matches!(e.kind, EdgeKind::References)));
    }

    #[test]
    fn no_diagnostics_means_no_error_flags() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("a.c"), "int x;\n").unwrap();
        let repo = RepoGraph::new(temp.path());
        repo.full_scan();

        let view = build(&repo.snapshot(), &[]);
        assert!(view.nodes.iter().all(|n| !n.has_errors));
    }
}
