//! Repository symbol graph (spec §4.3).
//!
//! `RepoGraph` owns the authoritative cross-file view: a full scan walks
//! the tree once and builds a snapshot; a refresh replaces one file's
//! bucket and rebuilds the two derived indexes. Readers never block a
//! writer and never see a partially-rebuilt snapshot — `Arc` swap under
//! a short-lived write lock is the whole mechanism (spec §5, P4).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::config::SnipeConfig;
use crate::error::{EngineError, EngineResult};
use crate::extract;
use crate::fs_utils;
use crate::parser;
use crate::types::{Language, Symbol};

/// A consistent, read-only view of the repo graph at one point in time.
#[derive(Default)]
pub struct GraphSnapshot {
    pub by_file: HashMap<String, Vec<Symbol>>,
    pub by_name: HashMap<(Language, String), Vec<Symbol>>,
    pub functions: HashMap<(Language, String), Symbol>,
}

impl GraphSnapshot {
    /// All symbols in `by_file`, with cross-language lookups (I3)
    /// enforced by the `(Language, name)` key on both derived indexes.
    pub fn lookup_by_name(&self, language: Language, name: &str) -> &[Symbol] {
        self.by_name.get(&(language, name.to_string())).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn canonical_function(&self, language: Language, name: &str) -> Option<&Symbol> {
        self.functions.get(&(language, name.to_string()))
    }

    pub fn symbol_count(&self) -> usize {
        self.by_file.values().map(|v| v.len()).sum()
    }
}

fn rebuild_indexes(by_file: &HashMap<String, Vec<Symbol>>) -> GraphSnapshot {
    let mut by_name: HashMap<(Language, String), Vec<Symbol>> = HashMap::new();
    let mut functions: HashMap<(Language, String), Symbol> = HashMap::new();

    // Lexicographic file order decides which definition is canonical
    // when names collide (spec §4.3).
    let mut paths: Vec<&String> = by_file.keys().collect();
    paths.sort();

    for path in paths {
        let symbols = &by_file[path];
        for symbol in symbols {
            let key = (symbol.language, symbol.name.clone());
            by_name.entry(key.clone()).or_default().push(symbol.clone());

            if matches!(symbol.kind, crate::types::SymbolKind::Function) {
                functions.entry(key).or_insert_with(|| symbol.clone());
            }
        }
    }

    GraphSnapshot { by_file: by_file.clone(), by_name, functions }
}

/// Single-writer/many-readers repo graph (spec §5, §9 "Global state").
pub struct RepoGraph {
    root: PathBuf,
    config: SnipeConfig,
    inner: RwLock<Arc<GraphSnapshot>>,
}

impl RepoGraph {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config = SnipeConfig::load(&root);
        Self { root, config, inner: RwLock::new(Arc::new(GraphSnapshot::default())) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &SnipeConfig {
        &self.config
    }

    /// Take a cheap, consistent snapshot reference. No lock is held
    /// once this returns (spec §5: "no analysis ever holds a lock
    /// while calling external code").
    pub fn snapshot(&self) -> Arc<GraphSnapshot> {
        self.inner.read().expect("repo graph lock poisoned").clone()
    }

    /// Full rescan: walk the repo, parse and extract every supported
    /// file, replace the whole graph. Returns the new symbol count.
    pub fn full_scan(&self) -> usize {
        let files = fs_utils::collect_source_files(&self.root, &self.config.ignore_paths);
        let mut by_file = HashMap::with_capacity(files.len());

        for file in files {
            let symbols = extract_file(file.language, &file.relative_path, &file.content);
            by_file.insert(file.relative_path, symbols);
        }

        let snapshot = rebuild_indexes(&by_file);
        let count = snapshot.symbol_count();
        *self.inner.write().expect("repo graph lock poisoned") = Arc::new(snapshot);
        count
    }

    /// Replace a single file's bucket and rebuild both indexes. Cheap:
    /// no per-symbol diff, the whole bucket is swapped (spec §4.3).
    pub fn refresh_file(&self, relative_path: &str, content: &str) -> EngineResult<()> {
        let language = Language::from_extension(extension_of(relative_path)).ok_or_else(|| {
            EngineError::Read {
                path: PathBuf::from(relative_path),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "unsupported file extension"),
            }
        })?;

        let symbols = extract_file(language, relative_path, content);

        let mut by_file = self.snapshot().by_file.clone();
        by_file.insert(relative_path.to_string(), symbols);
        let snapshot = rebuild_indexes(&by_file);
        *self.inner.write().expect("repo graph lock poisoned") = Arc::new(snapshot);
        Ok(())
    }
}

pub(crate) fn extension_of(path: &str) -> &str {
    Path::new(path).extension().and_then(|e| e.to_str()).unwrap_or("")
}

pub(crate) fn extract_file(language: Language, path: &str, content: &str) -> Vec<Symbol> {
    extract_full(language, path, content).0
}

/// Parse + extract one file, returning both symbols and references —
/// buffer analysis needs the references too, a full scan only keeps
/// the symbols.
pub(crate) fn extract_full(
    language: Language,
    path: &str,
    content: &str,
) -> (Vec<Symbol>, Vec<crate::types::Reference>) {
    match language {
        Language::C => {
            let tree = parser::c::parse(content);
            extract::c::extract(path, &tree)
        }
        Language::Python => {
            let tree = parser::python::parse(content);
            extract::python::extract(path, &tree)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn full_scan_builds_canonical_functions_index() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("a.c"), "int helper(int x) {\n  return x;\n}\n").unwrap();
        std::fs::write(temp.path().join("b.c"), "int helper(int x, int y) {\n  return x;\n}\n").unwrap();

        let graph = RepoGraph::new(temp.path());
        let count = graph.full_scan();
        assert!(count >= 2);

        let snapshot = graph.snapshot();
        let canonical = snapshot.canonical_function(Language::C, "helper").unwrap();
        assert_eq!(canonical.file, "a.c");
    }

    #[test]
    fn refresh_file_replaces_only_that_bucket() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("a.c"), "int x;\n").unwrap();
        std::fs::write(temp.path().join("b.c"), "int y;\n").unwrap();

        let graph = RepoGraph::new(temp.path());
        graph.full_scan();

        graph.refresh_file("a.c", "int x;\nint z;\n").unwrap();
        let snapshot = graph.snapshot();
        assert_eq!(snapshot.by_file.get("a.c").unwrap().len(), 2);
        assert_eq!(snapshot.by_file.get("b.c").unwrap().len(), 1);
    }

    #[test]
    fn cross_language_lookup_returns_empty() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("a.c"), "int shared;\n").unwrap();
        std::fs::write(temp.path().join("b.py"), "shared: int = 0\n").unwrap();

        let graph = RepoGraph::new(temp.path());
        graph.full_scan();
        let snapshot = graph.snapshot();

        assert!(!snapshot.lookup_by_name(Language::C, "shared").is_empty());
        let python_hits = snapshot.lookup_by_name(Language::Python, "shared");
        assert_eq!(python_hits.len(), 1);
        assert_eq!(python_hits[0].language, Language::Python);
    }
}
