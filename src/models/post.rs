use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::{require, require_id, CommentRecord, DEFAULT_AI_ANSWER, SUMMATION_CHARS};
use crate::error::DataError;
use crate::helpers::parse_timestamp;
use crate::models::Comment;
use crate::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum LikeState {
    Liked,
    Unliked,
}

/// A post as the board service sends it, before defaults are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub summation: Option<String>,
    #[serde(default)]
    pub ai_answer: Option<String>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub liked: Option<bool>,
    #[serde(default)]
    pub comment_count: Option<u64>,
    #[serde(default)]
    pub comments: Option<Vec<CommentRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: Timestamp,
    pub summation: String,
    pub ai_answer: String,
    pub like_count: u64,
    pub liked: bool,
    pub comment_count: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn new(
        id: String,
        title: String,
        content: String,
        author: String,
        created_at: Timestamp,
    ) -> Self {
        let summation = summarize(&content);
        Self {
            id,
            title,
            content,
            author,
            created_at,
            summation,
            ai_answer: DEFAULT_AI_ANSWER.to_string(),
            like_count: 0,
            liked: false,
            comment_count: 0,
            comments: Vec::new(),
        }
    }

    /// Applies the documented defaults and threads the comment list.
    ///
    /// Only a bad post field fails the record. Comment records that fail
    /// normalization, or repeat an earlier id, are left out of the thread and
    /// returned alongside the post; their replies become roots.
    pub fn from_record(record: PostRecord) -> Result<(Self, Vec<DataError>), DataError> {
        let label = record
            .id
            .as_deref()
            .map_or_else(|| "post".to_string(), |id| format!("post {id}"));

        let id = require_id(record.id, &label)?;
        let title = require(record.title, &label, "title")?;
        let content = require(record.content, &label, "content")?;
        let author = require(record.author, &label, "author")?;
        let created_at = require(record.created_at, &label, "created_at")?;
        let created_at = parse_timestamp(&created_at).map_err(|reason| DataError::InvalidField {
            record: label.clone(),
            field: "created_at",
            reason,
        })?;

        let mut skipped = Vec::new();
        let flat: Vec<Comment> = record
            .comments
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| Comment::from_record(raw).map_err(|e| skipped.push(e)).ok())
            .collect();
        let (flat, repeated) = thread::dedup(flat);
        skipped.extend(repeated);
        let comments = thread::build(flat)?;

        let liked = record.liked.unwrap_or(false);
        // A liked post counts at least its own like, so unliking never underflows.
        let like_count = record.like_count.unwrap_or(0).max(u64::from(liked));

        let post = Self {
            id,
            summation: record.summation.unwrap_or_else(|| summarize(&content)),
            title,
            content,
            author,
            created_at,
            ai_answer: record
                .ai_answer
                .unwrap_or_else(|| DEFAULT_AI_ANSWER.to_string()),
            like_count,
            liked,
            comment_count: record.comment_count.unwrap_or(0),
            comments,
        };
        Ok((post, skipped))
    }

    pub fn like_state(&self) -> LikeState {
        if self.liked {
            LikeState::Liked
        } else {
            LikeState::Unliked
        }
    }

    /// Flips the local like flag, moving the counter by exactly one.
    pub fn toggle_like(&mut self) {
        if self.liked {
            self.liked = false;
            self.like_count = self.like_count.saturating_sub(1);
        } else {
            self.liked = true;
            self.like_count += 1;
        }
    }

    /// Case-sensitive substring match on title or body.
    pub fn matches(&self, query: &str) -> bool {
        self.title.contains(query) || self.content.contains(query)
    }
}

fn summarize(content: &str) -> String {
    content.chars().take(SUMMATION_CHARS).collect()
}
