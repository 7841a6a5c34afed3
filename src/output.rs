use anyhow::Result;
use console::{Term, style};
use serde::Serialize;
use textwrap::Options;

use crate::commands::draft::Draft;
use crate::commands::feed::FeedListing;
use crate::commands::thread::ThreadView;
use crate::config::RenderConfig;
use crate::error::DataError;
use crate::models::{Comment, Post};
use crate::thread::ThreadWalk;

pub struct Output {
    term: Term,
    errors: Term,
    json: bool,
    concise: bool,
    render: RenderConfig,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            term: Term::stdout(),
            errors: Term::stderr(),
            json,
            concise: false,
            render: RenderConfig::default(),
        }
    }

    pub fn with_thread_options(json: bool, concise: bool, render: RenderConfig) -> Self {
        Self {
            term: Term::stdout(),
            errors: Term::stderr(),
            json,
            concise,
            render,
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let output = serde_json::to_string_pretty(value)?;
        self.term.write_line(&output)?;
        Ok(())
    }

    /// Skipped records go to stderr so JSON on stdout stays parseable.
    fn report_rejected(&self, rejected: &[DataError]) -> Result<()> {
        for err in rejected {
            self.errors.write_line(&format!(
                "{} {err}",
                style("Skipped record:").yellow()
            ))?;
        }
        Ok(())
    }

    pub fn feed(&self, listing: &FeedListing) -> Result<()> {
        self.report_rejected(listing.rejected())?;

        if self.json {
            return self.print_json(listing);
        }

        if listing.posts().is_empty() {
            self.term.write_line("No posts found.")?;
            return Ok(());
        }

        for post in listing.posts() {
            self.print_post_summary(post)?;
            self.term.write_line("")?;
        }

        if listing.posts().len() != listing.total() {
            self.term.write_line(&format!(
                "{} of {} posts match.",
                style(listing.posts().len()).green().bold(),
                listing.total()
            ))?;
        }
        Ok(())
    }

    fn print_post_summary(&self, post: &Post) -> Result<()> {
        self.term.write_line(&format!(
            "{} [{}]",
            style(&post.id).cyan().bold(),
            style(post.like_state().as_ref()).yellow()
        ))?;
        self.term.write_line(&format!(
            "  {} {}",
            style(&post.author).bold(),
            style(&post.created_at).dim()
        ))?;
        self.term.write_line(&format!("  Title: {}", post.title))?;
        self.term.write_line(&format!("  {}", post.summation))?;
        self.term.write_line(&format!(
            "  Likes: {}  Comments: {}",
            post.like_count, post.comment_count
        ))?;
        Ok(())
    }

    pub fn thread(&self, view: &ThreadView) -> Result<()> {
        self.report_rejected(&view.rejected)?;

        if self.json {
            return match &view.focus {
                Some(comment) => self.print_json(comment),
                None => self.print_json(&view.post),
            };
        }

        let post = &view.post;
        self.term.write_line(&format!(
            "Post: {} [{}]",
            style(&post.id).cyan().bold(),
            style(post.like_state().as_ref()).yellow()
        ))?;
        self.term
            .write_line(&style(&post.title).bold().to_string())?;
        self.term.write_line(&format!("  Author: {}", post.author))?;
        self.term
            .write_line(&format!("  Created: {}", post.created_at))?;
        self.term.write_line(&format!(
            "  Likes: {}  Comments: {}",
            post.like_count, post.comment_count
        ))?;
        self.term.write_line("")?;
        self.write_wrapped(&post.content, "  ")?;

        self.term.write_line("")?;
        self.term
            .write_line(&style("AI answer:").bold().to_string())?;
        self.write_wrapped(&post.ai_answer, "  ")?;

        let comments = view.comments();
        self.term.write_line("")?;
        self.term.write_line(&format!(
            "{} ({})",
            style("Comments:").bold(),
            ThreadWalk::new(comments).count()
        ))?;
        if comments.is_empty() {
            self.term
                .write_line(&format!("  {}", style("(none yet)").dim()))?;
        }
        for (depth, comment) in ThreadWalk::new(comments) {
            self.print_comment(depth, comment)?;
        }
        Ok(())
    }

    fn print_comment(&self, depth: usize, comment: &Comment) -> Result<()> {
        let indent = "    ".repeat(depth.min(self.render.max_indent) + 1);
        self.term.write_line(&format!(
            "{indent}{} {} {}",
            style(&comment.author).bold(),
            style(&comment.created_at).dim(),
            style(format!("#{}", comment.id)).cyan()
        ))?;
        self.write_wrapped(&comment.content, &indent)?;

        if !self.concise {
            let ai_indent = format!("{indent}  ");
            self.write_wrapped(&format!("AI: {}", comment.ai_reply), &ai_indent)?;
        }
        Ok(())
    }

    fn write_wrapped(&self, text: &str, indent: &str) -> Result<()> {
        let width = self.render.wrap_width.max(indent.len() + 20);
        let options = Options::new(width)
            .initial_indent(indent)
            .subsequent_indent(indent);
        for line in textwrap::wrap(text, options) {
            self.term.write_line(&line)?;
        }
        Ok(())
    }

    pub fn draft(&self, draft: &Draft) -> Result<()> {
        if self.json {
            return self.print_json(&draft.body);
        }

        self.term.write_line(&format!(
            "{} {}",
            style(draft.method).green().bold(),
            style(&draft.url).cyan()
        ))?;
        self.term
            .write_line(&serde_json::to_string_pretty(&draft.body)?)?;
        Ok(())
    }
}
