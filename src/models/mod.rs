mod comment;
mod draft;
mod post;

pub use comment::{Comment, CommentRecord};
pub use draft::{NewComment, NewPost};
pub use post::{LikeState, Post, PostRecord};

use crate::error::DataError;

/// Shown until the service has produced an answer for a post.
pub const DEFAULT_AI_ANSWER: &str = "AI answer is not available yet.";

/// Shown until the service has produced a reply for a comment.
pub const DEFAULT_AI_REPLY: &str = "AI reply is not available yet.";

/// Length of the summary derived from a post body when none is supplied.
pub const SUMMATION_CHARS: usize = 100;

fn require(value: Option<String>, record: &str, field: &'static str) -> Result<String, DataError> {
    value.ok_or_else(|| DataError::MissingField {
        record: record.to_string(),
        field,
    })
}

fn require_id(value: Option<String>, record: &str) -> Result<String, DataError> {
    require(value.filter(|id| !id.trim().is_empty()), record, "id")
}
