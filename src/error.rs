use thiserror::Error;

/// A fetched record (or a local submission) that cannot be turned into a
/// `Post` or `Comment`. Only the offending record is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("{record} is missing required field `{field}`")]
    MissingField { record: String, field: &'static str },

    #[error("{record} has an invalid `{field}`: {reason}")]
    InvalidField {
        record: String,
        field: &'static str,
        reason: String,
    },

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("`{field}` must not be blank")]
    BlankField { field: &'static str },

    #[error("malformed {what}: {reason}")]
    Malformed { what: String, reason: String },
}

/// An operation referenced an id that is not in the current collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("Post not found: {id}{}", did_you_mean(.suggestion))]
    Post {
        id: String,
        suggestion: Option<String>,
    },

    #[error("Comment not found: {id}")]
    Comment { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!("\nDid you mean: {s}"))
        .unwrap_or_default()
}
