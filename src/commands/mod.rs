#![allow(clippy::needless_pass_by_value)]

pub mod draft;
pub mod feed;
pub mod init;
pub mod thread;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::feed::{FeedState, LoadReport};

/// Reads a fetched response body from a file, or from stdin when the path is `-`.
pub fn read_source(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read response body from stdin")?;
        return Ok(body);
    }

    std::fs::read_to_string(source)
        .with_context(|| format!("Failed to read {}", source.display()))
}

/// Builds a fresh feed from a response body on disk.
pub fn load_feed(source: &Path) -> Result<(FeedState, LoadReport)> {
    let body = read_source(source)?;
    let mut feed = FeedState::new();
    let report = feed
        .load_json(&body)
        .with_context(|| format!("Failed to load feed from {}", source.display()))?;
    Ok((feed, report))
}
