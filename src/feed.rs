//! The in-memory feed for one session: loaded posts, local optimistic
//! mutations and search.
//!
//! Likes and appended comments are applied locally and never confirmed with
//! the service; they hold until the next `load` replaces the collection with
//! whatever the service returns.

use std::collections::{BTreeSet, HashSet};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{DataError, FeedError, NotFoundError};
use crate::helpers::find_similar_id;
use crate::models::{Comment, Post, PostRecord};
use crate::thread::{self, ThreadWalk};

/// Outcome of a `load`: how many posts were kept and which records were not.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<DataError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct FeedState {
    posts: Vec<Post>,
    visible: BTreeSet<String>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection. Records that fail normalization are
    /// skipped and reported; the first of several posts sharing an id wins.
    /// A bad comment record costs only that comment, not its post.
    pub fn load(&mut self, records: Vec<PostRecord>) -> LoadReport {
        let mut report = LoadReport::default();
        let mut posts: Vec<Post> = Vec::with_capacity(records.len());
        let mut seen: HashSet<String> = HashSet::with_capacity(records.len());

        for record in records {
            match Post::from_record(record) {
                Ok((post, _)) if seen.contains(&post.id) => {
                    report.rejected.push(DataError::DuplicateId {
                        kind: "post",
                        id: post.id,
                    });
                }
                Ok((post, skipped)) => {
                    seen.insert(post.id.clone());
                    posts.push(post);
                    report.rejected.extend(skipped);
                }
                Err(e) => report.rejected.push(e),
            }
        }

        for err in &report.rejected {
            warn!(error = %err, "skipping record");
        }

        report.loaded = posts.len();
        self.posts = posts;
        debug!(loaded = report.loaded, rejected = report.rejected.len(), "feed loaded");
        report
    }

    /// Loads a fetch response body: an array of posts, or the single post
    /// object the detail endpoint returns.
    pub fn load_json(&mut self, body: &str) -> Result<LoadReport, DataError> {
        let document: Value = serde_json::from_str(body).map_err(|e| DataError::Malformed {
            what: "response body".to_string(),
            reason: e.to_string(),
        })?;

        let values = match document {
            Value::Array(values) => values,
            object @ Value::Object(_) => vec![object],
            other => {
                return Err(DataError::Malformed {
                    what: "response body".to_string(),
                    reason: format!("expected an array or object, found {}", kind_of(&other)),
                });
            }
        };

        let mut undecodable = Vec::new();
        let mut records = Vec::with_capacity(values.len());
        for (position, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<PostRecord>(value) {
                Ok(record) => records.push(record),
                Err(e) => undecodable.push(DataError::Malformed {
                    what: format!("post record #{position}"),
                    reason: e.to_string(),
                }),
            }
        }

        let mut report = self.load(records);
        for err in &undecodable {
            warn!(error = %err, "skipping post record");
        }
        report.rejected.extend(undecodable);
        Ok(report)
    }

    /// Re-fetch of a single post: replaces it in place, or appends it if it
    /// was not loaded. Comment records left out of the thread are returned
    /// with the post.
    pub fn refresh_post(
        &mut self,
        record: PostRecord,
    ) -> Result<(&Post, Vec<DataError>), DataError> {
        let (post, skipped) = Post::from_record(record)?;
        for err in &skipped {
            warn!(error = %err, "skipping comment record");
        }
        let position = match self.posts.iter().position(|p| p.id == post.id) {
            Some(position) => {
                self.posts[position] = post;
                position
            }
            None => {
                self.posts.push(post);
                self.posts.len() - 1
            }
        };
        Ok((&self.posts[position], skipped))
    }

    /// Optimistic like toggle. Unknown ids are ignored.
    pub fn toggle_like(&mut self, post_id: &str) -> Option<&Post> {
        let Some(post) = self.post_mut(post_id) else {
            debug!(post = %post_id, "like toggle ignored: post not loaded");
            return None;
        };
        post.toggle_like();
        Some(&*post)
    }

    /// Adds a comment returned by the service without rebuilding the thread.
    ///
    /// The comment goes after all existing roots, or after the existing
    /// replies of its parent when its `parent_id` is in this post's thread.
    /// Unknown post ids are ignored (`Ok(None)`). Every id in the incoming
    /// subtree must be non-blank and new to the post.
    pub fn append_comment(
        &mut self,
        post_id: &str,
        comment: Comment,
    ) -> Result<Option<&Post>, DataError> {
        let incoming = std::slice::from_ref(&comment);
        if ThreadWalk::new(incoming).any(|(_, c)| c.id.trim().is_empty()) {
            let record = if comment.id.trim().is_empty() {
                "comment".to_string()
            } else {
                format!("reply under comment {}", comment.id)
            };
            return Err(DataError::MissingField { record, field: "id" });
        }

        let Some(post) = self.post_mut(post_id) else {
            debug!(post = %post_id, comment = %comment.id, "comment append ignored: post not loaded");
            return Ok(None);
        };

        let mut known: HashSet<&str> = ThreadWalk::new(&post.comments)
            .map(|(_, c)| c.id.as_str())
            .collect();
        if let Some((_, repeated)) = ThreadWalk::new(incoming).find(|(_, c)| !known.insert(&c.id)) {
            return Err(DataError::DuplicateId {
                kind: "comment",
                id: repeated.id.clone(),
            });
        }

        let parent = comment
            .parent_id
            .as_deref()
            .and_then(|parent_id| thread::find_mut(&mut post.comments, parent_id));
        match parent {
            Some(parent) => parent.children.push(comment),
            None => post.comments.push(comment),
        }
        post.comment_count += 1;
        Ok(Some(&*post))
    }

    /// Posts whose title or body contains `query` (case-sensitive), in load
    /// order. An empty query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.matches(query)).collect()
    }

    /// Records which posts the presentation layer currently has on screen.
    pub fn set_visible_post_ids<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.visible = ids.into_iter().collect();
    }

    pub fn visible_post_ids(&self) -> &BTreeSet<String> {
        &self.visible
    }

    pub fn is_visible(&self, post_id: &str) -> bool {
        self.visible.contains(post_id)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    /// Like `post`, but reports a near-miss id when there is one.
    pub fn find_post(&self, post_id: &str) -> Result<&Post, NotFoundError> {
        self.post(post_id).ok_or_else(|| {
            let ids: Vec<&str> = self.posts.iter().map(|p| p.id.as_str()).collect();
            NotFoundError::Post {
                id: post_id.to_string(),
                suggestion: find_similar_id(post_id, &ids).map(str::to_string),
            }
        })
    }

    /// A single comment (with its replies) inside a loaded post.
    pub fn find_comment(&self, post_id: &str, comment_id: &str) -> Result<&Comment, FeedError> {
        let post = self.find_post(post_id)?;
        ThreadWalk::new(&post.comments)
            .map(|(_, c)| c)
            .find(|c| c.id == comment_id)
            .ok_or_else(|| {
                NotFoundError::Comment {
                    id: comment_id.to_string(),
                }
                .into()
            })
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn post_mut(&mut self, post_id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == post_id)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
