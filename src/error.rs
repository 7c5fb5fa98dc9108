//! Error taxonomy for the transform engine and the locale table store.
//!
//! - [`TransformError`] covers one source file. It never escapes the orchestrator:
//!   the file falls back to its original text.
//! - [`PersistenceError`] covers the on-disk locale tables.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// The file is not valid JSX/TSX.
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// A text node or element could not be rewritten safely.
    #[error("{path}:{line}: cannot rewrite \"{text}\": {reason}")]
    Extraction {
        path: String,
        line: usize,
        text: String,
        reason: String,
    },

    /// The accumulated edits could not be applied to the source text.
    #[error("cannot render {path}: {reason}")]
    Render { path: String, reason: String },

    /// The hook could not be injected into one component.
    #[error("cannot inject hook into component `{component}`: {reason}")]
    Injection { component: String, reason: String },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read locale table {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write locale table {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize locale table {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A key already bound to one text was extracted again from a different text.
    #[error("key `{key}` is bound to \"{existing}\" but was also extracted from \"{incoming}\"")]
    KeyConflict {
        key: String,
        existing: String,
        incoming: String,
    },
}
