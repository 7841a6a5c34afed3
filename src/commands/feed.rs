use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::error::DataError;
use crate::models::Post;

#[derive(Debug, Serialize)]
pub struct FeedListing {
    posts: Vec<Post>,
    total: usize,
    #[serde(skip)]
    rejected: Vec<DataError>,
}

impl FeedListing {
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Number of posts loaded, before filtering.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn rejected(&self) -> &[DataError] {
        &self.rejected
    }
}

pub fn run(source: &Path, query: Option<String>) -> Result<FeedListing> {
    let (feed, report) = super::load_feed(source)?;
    let posts = feed
        .filter(query.as_deref().unwrap_or_default())
        .into_iter()
        .cloned()
        .collect();

    Ok(FeedListing {
        posts,
        total: feed.len(),
        rejected: report.rejected,
    })
}
