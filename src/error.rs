//! Error types shared by every stage of the generation pipeline.
//!
//! Nothing in the library panics on bad input: rule tables, source files and
//! configuration problems all surface as a [`StyleError`] that the caller
//! inspects and degrades on.

use std::path::PathBuf;

/// Why a rule table blob was rejected before decoding.
#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("rule table is {len} bytes, shorter than its {header} byte header")]
    Truncated { len: usize, header: usize },

    #[error("rule table magic mismatch (found {found:?})")]
    BadMagic { found: [u8; 4] },

    #[error("unsupported rule table version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },

    #[error("rule table checksum mismatch, the file is corrupted")]
    ChecksumMismatch,

    #[error("failed to decode rule table payload: {0}")]
    Decode(#[from] bincode::Error),
}

/// Errors that can occur while generating styles.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// Reading or writing a file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The rule table at `path` failed structural verification
    #[error("invalid rule table {path:?}: {source}")]
    RuleTable {
        path: PathBuf,
        source: RuleTableError,
    },

    /// The human-authored rule source could not be compiled
    #[error("invalid rule source {path:?}: {message}")]
    RuleSource { path: PathBuf, message: String },

    /// A source file could not be parsed
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The configuration file is malformed
    #[error("invalid configuration {path:?}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The tree-sitter grammar could not be loaded
    #[error("failed to load TSX grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The filesystem watcher failed
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl StyleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StyleError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StyleError>;
