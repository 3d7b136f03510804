//! # snipe
//!
//! A local, in-process semantic analysis engine for C and Python source.
//! Snipe builds a repository-wide symbol graph by incrementally parsing
//! every source file, then joins a single unsaved buffer's references
//! against that graph under a fixed, language-scoped rule set to surface
//! cross-file defects — type mismatches, out-of-bounds indexing,
//! signature drift, undefined or shadowed symbols, format-string
//! mismatches, invalid struct access, dead imports, and unsafe C library
//! calls — before the file is ever saved.
//!
//! ## What this crate is not
//!
//! It does not do full type inference, data-flow or taint analysis, or
//! interprocedural call-graph construction, and it never resolves a C
//! reference against a Python symbol or vice versa. Apparent-type
//! inference is deliberately shallow: `unknown` is a safe, suppressive
//! default, not a fallback to be improved on later.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use snipe::Engine;
//!
//! let engine = Engine::new(".");
//! let result = engine.refresh();
//! println!("indexed {} symbols", result.symbol_count);
//!
//! let diagnostics = engine.analyze("int x = arr[99];\n", "main.c", &[]);
//! for d in diagnostics {
//!     println!("{}:{} {} {}", d.file, d.line, d.code.as_str(), d.message);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fs_utils;
pub mod graph;
pub mod parser;
pub mod rules;
pub mod types;
pub mod view;

pub use config::SnipeConfig;
pub use engine::{Engine, RefreshResult};
pub use error::{EngineError, EngineResult};
pub use types::{
    ApparentType, Diagnostic, DiagnosticCode, Language, OpenBuffer, Reference, Scope, Severity,
    Symbol, SymbolKind, UseKind,
};
pub use view::{Edge, EdgeKind, GraphView, Node, NodeKind};
