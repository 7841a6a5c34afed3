use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::models::{NewComment, NewPost};

/// A request the network layer is expected to send.
#[derive(Debug, Serialize)]
pub struct Draft {
    pub method: &'static str,
    pub url: String,
    pub body: Value,
}

pub fn post(title: &str, content: &str, author: &str, config: &Config) -> Result<Draft> {
    let draft = NewPost::new(title, content, author)?;
    Ok(Draft {
        method: "POST",
        url: config.posts_url(),
        body: serde_json::to_value(&draft)?,
    })
}

pub fn comment(post_id: &str, content: &str, config: &Config) -> Result<Draft> {
    let draft = NewComment::new(post_id, content)?;
    Ok(Draft {
        method: "POST",
        url: config.comments_url(),
        body: serde_json::to_value(&draft)?,
    })
}
