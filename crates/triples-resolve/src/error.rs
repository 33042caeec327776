//! Resolution error types.

use triples_core::CoreError;

use crate::validate::Violation;

/// Errors that can occur while resolving triple fragments.
///
/// All of them are configuration errors: none is retried or recovered.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A fragment name, or a canonical triple, was declared twice.
    #[error("duplicate fragment '{name}' (declared by '{existing}' and '{duplicate}')")]
    DuplicateFragment {
        name: String,
        existing: String,
        duplicate: String,
    },

    /// No fragment with this name is stored.
    #[error("unknown fragment '{0}'")]
    UnknownFragment(String),

    /// A fragment imports a name absent from the store.
    #[error("fragment '{fragment}' imports missing fragment '{missing}'")]
    MissingImport { fragment: String, missing: String },

    /// A fragment imports a fragment that owns a canonical triple.
    #[error("fragment '{fragment}' imports '{import}', which declares a triple")]
    PrimaryImport { fragment: String, import: String },

    /// The import graph contains a cycle.
    #[error("import cycle: {}", path.join(" -> "))]
    ImportCycle { path: Vec<String> },

    /// Two canonical, alias or variant names clash.
    #[error("name '{name}' is claimed by both '{existing}' and '{new}'")]
    NameCollision {
        name: String,
        existing: String,
        new: String,
    },

    /// No canonical triple or alias has this name.
    #[error("unknown triple '{0}'")]
    UnknownTriple(String),

    /// The triple declares no variant with this name.
    #[error("triple '{triple}' has no variant '{variant}'")]
    UnknownVariant { triple: String, variant: String },

    /// A variant was requested on top of an already applied variant.
    #[error("triple '{triple}' already has variant '{applied}' applied; cannot add '{requested}'")]
    VariantComposition {
        triple: String,
        applied: String,
        requested: String,
    },

    /// A merged or variant descriptor fails schema checks.
    #[error("schema violation in '{triple}': {}", format_violations(violations))]
    SchemaViolation {
        triple: String,
        violations: Vec<Violation>,
    },

    /// Invalid fragment data.
    #[error(transparent)]
    Core(#[from] CoreError),
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
