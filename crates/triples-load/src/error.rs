//! Error types for fragment loading.

use std::path::PathBuf;

use triples_core::CoreError;
use triples_resolve::ResolveError;

/// Errors that can occur while discovering or parsing fragment files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// YAML syntax error, including duplicate keys.
    #[error("YAML parse error in fragment '{fragment}': {source}")]
    Yaml {
        /// The fragment being parsed.
        fragment: String,
        source: serde_yaml::Error,
    },

    /// I/O error reading fragment files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while walking the fragment directory.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Fragment file or directory not found.
    #[error("fragment path not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Well-formed YAML that does not describe a valid fragment.
    #[error("invalid fragment '{fragment}': {detail}")]
    InvalidFragment {
        /// The fragment name.
        fragment: String,
        /// Description of the problem.
        detail: String,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Store-level failure, such as two files declaring one triple.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;

pub(crate) fn invalid(fragment: &str, detail: impl Into<String>) -> LoadError {
    LoadError::InvalidFragment {
        fragment: fragment.to_string(),
        detail: detail.into(),
    }
}
