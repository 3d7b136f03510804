//! Error types for the parts of the engine that cross an I/O boundary.
//!
//! The hot analysis path (parsing, extraction, rule evaluation) never
//! returns `Result`: spec §7 requires it to degrade silently (missing
//! symbols suppress the dependent check rather than propagate an
//! error). `EngineError` exists only for `refresh`/`save_diagnostics`,
//! where a real I/O failure happened and the caller needs to know the
//! in-memory state stayed authoritative.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize diagnostics: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
