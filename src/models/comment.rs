use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{require, require_id, DEFAULT_AI_REPLY};
use crate::error::DataError;
use crate::helpers::parse_timestamp;

/// A comment as the board service sends it: flat, every field optional so
/// that missing data surfaces as a `DataError` instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub ai_reply: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub author: String,
    pub content: String,
    pub created_at: Timestamp,
    pub ai_reply: String,
    #[serde(default)]
    pub children: Vec<Comment>,
}

impl Comment {
    pub fn new(
        id: String,
        parent_id: Option<String>,
        author: String,
        content: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            parent_id,
            author,
            content,
            created_at,
            ai_reply: DEFAULT_AI_REPLY.to_string(),
            children: Vec::new(),
        }
    }

    pub fn with_ai_reply(mut self, ai_reply: String) -> Self {
        self.ai_reply = ai_reply;
        self
    }

    pub fn with_children(mut self, children: Vec<Comment>) -> Self {
        self.children = children;
        self
    }

    /// Normalizes a wire record. An empty `parent_id` is treated as absent.
    pub fn from_record(record: CommentRecord) -> Result<Self, DataError> {
        let label = record
            .id
            .as_deref()
            .map_or_else(|| "comment".to_string(), |id| format!("comment {id}"));

        let id = require_id(record.id, &label)?;
        let author = require(record.author, &label, "author")?;
        let content = require(record.content, &label, "content")?;
        let created_at = require(record.created_at, &label, "created_at")?;
        let created_at = parse_timestamp(&created_at).map_err(|reason| DataError::InvalidField {
            record: label.clone(),
            field: "created_at",
            reason,
        })?;

        Ok(Self {
            id,
            parent_id: record.parent_id.filter(|p| !p.trim().is_empty()),
            author,
            content,
            created_at,
            ai_reply: record
                .ai_reply
                .unwrap_or_else(|| DEFAULT_AI_REPLY.to_string()),
            children: Vec::new(),
        })
    }

    /// A copy of this comment without its replies.
    pub fn detached(&self) -> Self {
        Self {
            id: self.id.clone(),
            parent_id: self.parent_id.clone(),
            author: self.author.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
            ai_reply: self.ai_reply.clone(),
            children: Vec::new(),
        }
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: Option<&str>) -> CommentRecord {
        CommentRecord {
            id: id.map(str::to_string),
            parent_id: None,
            author: Some("kim".to_string()),
            content: Some("first!".to_string()),
            created_at: Some("2024-05-01T09:30:00Z".to_string()),
            ai_reply: None,
        }
    }

    #[test]
    fn from_record_defaults_ai_reply() {
        let comment = Comment::from_record(record(Some("c1"))).unwrap();
        assert_eq!(comment.id, "c1");
        assert_eq!(comment.ai_reply, DEFAULT_AI_REPLY);
        assert!(comment.children.is_empty());
        assert!(!comment.is_reply());
    }

    #[test]
    fn from_record_without_id_is_data_error() {
        let err = Comment::from_record(record(None)).unwrap_err();
        assert_eq!(
            err,
            DataError::MissingField {
                record: "comment".to_string(),
                field: "id",
            }
        );
    }

    #[test]
    fn from_record_rejects_bad_timestamp() {
        let mut raw = record(Some("c1"));
        raw.created_at = Some("yesterday".to_string());
        let err = Comment::from_record(raw).unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidField {
                field: "created_at",
                ..
            }
        ));
    }

    #[test]
    fn empty_parent_id_is_absent() {
        let mut raw = record(Some("c1"));
        raw.parent_id = Some(String::new());
        let comment = Comment::from_record(raw).unwrap();
        assert_eq!(comment.parent_id, None);
    }
}
