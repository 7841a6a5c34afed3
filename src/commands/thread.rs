use std::path::Path;

use anyhow::Result;

use crate::error::DataError;
use crate::models::{Comment, Post};

/// A post and the part of its thread to display.
#[derive(Debug)]
pub struct ThreadView {
    pub post: Post,
    /// Set when a single comment was asked for; its replies come with it.
    pub focus: Option<Comment>,
    pub rejected: Vec<DataError>,
}

impl ThreadView {
    pub fn comments(&self) -> &[Comment] {
        match &self.focus {
            Some(comment) => std::slice::from_ref(comment),
            None => &self.post.comments,
        }
    }
}

pub fn run(source: &Path, post_id: &str, comment_id: Option<&str>) -> Result<ThreadView> {
    let (feed, report) = super::load_feed(source)?;

    let focus = comment_id
        .map(|id| feed.find_comment(post_id, id).cloned())
        .transpose()?;
    let post = feed.find_post(post_id)?.clone();

    Ok(ThreadView {
        post,
        focus,
        rejected: report.rejected,
    })
}
