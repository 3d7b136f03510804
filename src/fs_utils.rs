//! Filesystem walking for full repo scans.
//!
//! Collects every `.c`/`.h`/`.py` file under a root, honoring the
//! fixed ignore list plus any additions from `.snipe/config.toml`
//! (spec §4.3). Kept deliberately dumb: no gitignore parsing, no
//! symlink following — a full scan that silently mis-skips a vendored
//! directory is much safer than one that wanders outside the repo.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::types::Language;

/// Directory names always excluded from a full scan.
const BUILTIN_IGNORE: &[&str] = &[
    ".git",
    ".snipe",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    "node_modules",
    "build",
    "dist",
    ".mypy_cache",
    ".pytest_cache",
];

/// A file discovered by [`collect_source_files`]: its repo-relative
/// path, language, and on-disk content at scan time.
pub struct DiscoveredFile {
    pub relative_path: String,
    pub language: Language,
    pub content: String,
}

/// Walk `root` and return every supported source file not excluded by
/// the built-in ignore list or `extra_ignore`. A file that fails to
/// read (permission error, mid-write truncation) is skipped and
/// logged, not propagated — a scan never aborts on one bad file
/// (spec §5, failure isolation).
pub fn collect_source_files(root: &Path, extra_ignore: &[String]) -> Vec<DiscoveredFile> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        let rel_path = match path.strip_prefix(root) {
            Ok(p) => p,
            Err(_) => continue,
        };

        if rel_path.components().any(|c| {
            let name = c.as_os_str().to_string_lossy();
            BUILTIN_IGNORE.contains(&name.as_ref()) || extra_ignore.iter().any(|e| e == name.as_ref())
        }) {
            continue;
        }

        if !path.is_file() {
            continue;
        }

        let language = match path.extension().and_then(|e| e.to_str()).and_then(Language::from_extension) {
            Some(lang) => lang,
            None => continue,
        };

        match fs::read_to_string(path) {
            Ok(content) => {
                files.push(DiscoveredFile {
                    relative_path: rel_path.to_string_lossy().to_string(),
                    language,
                    content,
                });
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file during scan");
            }
        }
    }

    // Lexicographic order is load-bearing: graph.rs relies on it to
    // pick the "first-seen" canonical definition when names collide.
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn collects_supported_files_only() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("a.c"), "int x;").unwrap();
        std::fs::write(temp.path().join("b.py"), "x = 1").unwrap();
        std::fs::write(temp.path().join("c.txt"), "ignored").unwrap();

        let files = collect_source_files(temp.path(), &[]);
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.relative_path == "a.c"));
        assert!(files.iter().any(|f| f.relative_path == "b.py"));
    }

    #[test]
    fn skips_builtin_ignored_directories() {
        let temp = TempDir::new().expect("temp dir");
        let venv = temp.path().join("venv");
        std::fs::create_dir_all(&venv).unwrap();
        std::fs::write(venv.join("lib.py"), "x = 1").unwrap();
        std::fs::write(temp.path().join("main.py"), "y = 2").unwrap();

        let files = collect_source_files(temp.path(), &[]);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "main.py");
    }

    #[test]
    fn skips_extra_ignored_directories() {
        let temp = TempDir::new().expect("temp dir");
        let vendor = temp.path().join("vendor");
        std::fs::create_dir_all(&vendor).unwrap();
        std::fs::write(vendor.join("lib.c"), "int x;").unwrap();
        std::fs::write(temp.path().join("main.c"), "int y;").unwrap();

        let files = collect_source_files(temp.path(), &["vendor".to_string()]);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "main.c");
    }

    #[test]
    fn results_are_lexicographically_sorted() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("z.c"), "int x;").unwrap();
        std::fs::write(temp.path().join("a.c"), "int y;").unwrap();

        let files = collect_source_files(temp.path(), &[]);
        assert_eq!(files[0].relative_path, "a.c");
        assert_eq!(files[1].relative_path, "z.c");
    }
}
