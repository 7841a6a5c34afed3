use serde::Serialize;

use crate::error::DataError;

/// Body of a `POST /posts` submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
    title: String,
    content: String,
    author: String,
}

impl NewPost {
    /// Every field must contain something besides whitespace.
    pub fn new(title: &str, content: &str, author: &str) -> Result<Self, DataError> {
        Ok(Self {
            title: not_blank(title, "title")?,
            content: not_blank(content, "content")?,
            author: not_blank(author, "author")?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &str {
        &self.author
    }
}

/// Body of a `POST /comments` submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    post_id: String,
    content: String,
}

impl NewComment {
    pub fn new(post_id: &str, content: &str) -> Result<Self, DataError> {
        Ok(Self {
            post_id: not_blank(post_id, "post_id")?,
            content: not_blank(content, "content")?,
        })
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

// Values are sent as typed; only the blank check trims.
fn not_blank(value: &str, field: &'static str) -> Result<String, DataError> {
    if value.trim().is_empty() {
        return Err(DataError::BlankField { field });
    }
    Ok(value.to_string())
}
