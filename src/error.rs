use thiserror::Error;

/// Programmer errors: a descriptor that cannot be built or understood.
///
/// Never used for a value that fails validation; those are
/// [`crate::validate::ValidationResult`]s.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("expected {expected} arguments, got {received}")]
    Arity { expected: usize, received: usize },

    #[error("cannot convert {kind} to a partial type")]
    NotPartializable { kind: &'static str },

    #[error("unclassifiable descriptor at {path}: {reason}")]
    Unclassifiable { path: String, reason: String },

    #[error("reference to unknown type `{name}`")]
    UnknownReference { name: String },

    #[error("type `{name}` is declared more than once")]
    DuplicateType { name: String },

    #[error("root type `{name}` is not declared")]
    UnknownRoot { name: String },

    #[error("malformed descriptor document: {0}")]
    Json(#[from] serde_json::Error),
}
