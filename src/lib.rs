#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod helpers;
pub mod models;
pub mod output;
pub mod thread;

use anyhow::Result;

use cli::{Cli, Commands, DraftCommands};
use config::Config;
use output::Output;

pub use error::{DataError, FeedError, NotFoundError};
pub use feed::{FeedState, LoadReport};
pub use models::{Comment, LikeState, NewComment, NewPost, Post};

/// Environment variable holding the `tracing` filter for the `tb` binary.
pub const LOG_ENV: &str = "THREADBOARD_LOG";

fn run_draft(draft_cmd: DraftCommands, config: &Config) -> Result<()> {
    match draft_cmd {
        DraftCommands::Post {
            title,
            content,
            author,
            json,
        } => {
            let draft = commands::draft::post(&title, &content, &author, config)?;
            Output::new(json).draft(&draft)
        }
        DraftCommands::Comment {
            post_id,
            content,
            json,
        } => {
            let draft = commands::draft::comment(&post_id, &content, config)?;
            Output::new(json).draft(&draft)
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Feed {
            source,
            query,
            json,
        } => {
            let listing = commands::feed::run(&source, query)?;
            Output::new(json).feed(&listing)
        }
        Commands::Thread {
            source,
            post_id,
            comment,
            json,
            concise,
        } => {
            let config = Config::discover()?;
            let view = commands::thread::run(&source, &post_id, comment.as_deref())?;
            Output::with_thread_options(json, concise, config.render).thread(&view)
        }
        Commands::Draft(draft_cmd) => {
            let config = Config::discover()?;
            run_draft(draft_cmd, &config)
        }
    }
}
