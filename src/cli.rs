use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "threadboard")]
#[command(about = "Browse discussion-board feeds and comment threads", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create .threadboard/config.toml in the current directory
    Init,

    /// List the posts in a fetched feed
    Feed {
        /// File holding the fetched response body ("-" for stdin)
        source: PathBuf,

        /// Only show posts whose title or content contains this text (case-sensitive)
        #[arg(long, short)]
        query: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one post with its threaded comments
    Thread {
        /// File holding the fetched response body ("-" for stdin)
        source: PathBuf,

        /// The post to show
        post_id: String,

        /// Only show this comment and its replies
        #[arg(long)]
        comment: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Hide AI replies in output
        #[arg(long)]
        concise: bool,
    },

    /// Prepare a submission body for the board service
    #[command(subcommand)]
    Draft(DraftCommands),
}

#[derive(Subcommand)]
pub enum DraftCommands {
    /// Draft a new post
    Post {
        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        #[arg(long)]
        author: String,

        /// Output only the JSON body
        #[arg(long)]
        json: bool,
    },

    /// Draft a comment on a post
    Comment {
        /// The post to comment on
        post_id: String,

        /// The comment text
        content: String,

        /// Output only the JSON body
        #[arg(long)]
        json: bool,
    },
}
