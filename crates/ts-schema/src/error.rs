use thiserror::Error;

/// Raised before any write (`spec.md` §7): a source's branch set or types
/// disagree with the schema discovered from the first source, or a branch's
/// element type cannot be classified at all.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("branch `{0}` has an element type the registry cannot classify")]
    Unclassifiable(String),

    #[error(
        "schema drift: source declares branches {found:?}, expected {expected:?} (from the first source)"
    )]
    BranchSetMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("branch `{name}` changed element type relative to the first source")]
    TypeMismatch { name: String },
}
