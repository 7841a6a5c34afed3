//! Reconstruction of comment threads from the flat list the board service
//! returns.
//!
//! `build` is pure and deterministic: roots and siblings keep the order in
//! which they first appear in the input, replies whose parent is unknown are
//! promoted to roots, a repeated id keeps only its first occurrence, and
//! `parent_id` cycles are cut so every comment ends up in exactly one place. Nothing here recurses over input data; deep threads
//! are walked with explicit stacks.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::DataError;
use crate::models::Comment;

/// Turns a flat comment list into an ordered forest.
///
/// Comments that already carry `children` are flattened first, so the
/// output of `build` can be fed back in unchanged. Later comments that repeat
/// an id are dropped; call `dedup` beforehand to learn which ones. A blank id
/// is the only failure.
pub fn build(comments: Vec<Comment>) -> Result<Vec<Comment>, DataError> {
    let comments = if comments.iter().any(|c| !c.children.is_empty()) {
        flatten(&comments)
    } else {
        comments
    };
    let (comments, dropped) = dedup(comments);
    for err in &dropped {
        warn!(error = %err, "dropping repeated comment");
    }

    let mut parents = resolve_parents(&comments)?;
    break_cycles(&mut parents, &comments);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots = Vec::new();
    for (position, parent) in parents.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(position),
            None => roots.push(position),
        }
    }

    Ok(assemble(comments, &roots, &children))
}

/// Keeps the first comment for each id, in input order, and reports every
/// later one as a `DataError::DuplicateId`.
pub fn dedup(comments: Vec<Comment>) -> (Vec<Comment>, Vec<DataError>) {
    let mut seen: HashSet<String> = HashSet::with_capacity(comments.len());
    let mut kept = Vec::with_capacity(comments.len());
    let mut dropped = Vec::new();

    for comment in comments {
        if seen.insert(comment.id.clone()) {
            kept.push(comment);
        } else {
            dropped.push(DataError::DuplicateId {
                kind: "comment",
                id: comment.id,
            });
        }
    }

    (kept, dropped)
}

/// Pre-order flattening of a forest. Replies come out with empty `children`;
/// a nested reply without a `parent_id` takes its enclosing comment's id.
pub fn flatten(roots: &[Comment]) -> Vec<Comment> {
    let mut flat = Vec::with_capacity(count(roots));
    let mut stack: Vec<(Option<&str>, &Comment)> = roots.iter().rev().map(|c| (None, c)).collect();

    while let Some((enclosing, comment)) = stack.pop() {
        let mut node = comment.detached();
        if node.parent_id.is_none() {
            node.parent_id = enclosing.map(str::to_string);
        }
        flat.push(node);
        stack.extend(
            comment
                .children
                .iter()
                .rev()
                .map(|child| (Some(comment.id.as_str()), child)),
        );
    }

    flat
}

/// Total number of comments in a forest.
pub fn count(roots: &[Comment]) -> usize {
    ThreadWalk::new(roots).count()
}

/// Depth of the deepest reply; 0 for a forest of bare roots or no comments.
pub fn max_depth(roots: &[Comment]) -> usize {
    ThreadWalk::new(roots)
        .map(|(depth, _)| depth)
        .max()
        .unwrap_or(0)
}

/// Display-order traversal yielding each comment with its depth (roots are 0).
pub struct ThreadWalk<'a> {
    stack: Vec<(usize, &'a Comment)>,
}

impl<'a> ThreadWalk<'a> {
    pub fn new(roots: &'a [Comment]) -> Self {
        Self {
            stack: roots.iter().rev().map(|c| (0, c)).collect(),
        }
    }
}

impl<'a> Iterator for ThreadWalk<'a> {
    type Item = (usize, &'a Comment);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, comment) = self.stack.pop()?;
        self.stack
            .extend(comment.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, comment))
    }
}

/// Depth-first search for a comment anywhere in the forest.
pub fn find_mut<'a>(roots: &'a mut [Comment], id: &str) -> Option<&'a mut Comment> {
    let mut stack: Vec<&'a mut Comment> = roots.iter_mut().collect();
    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.children.iter_mut());
    }
    None
}

fn resolve_parents(comments: &[Comment]) -> Result<Vec<Option<usize>>, DataError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(comments.len());
    for (position, comment) in comments.iter().enumerate() {
        if comment.id.trim().is_empty() {
            return Err(DataError::MissingField {
                record: format!("comment #{position}"),
                field: "id",
            });
        }
        index.insert(comment.id.as_str(), position);
    }

    Ok(comments
        .iter()
        .map(|comment| {
            let parent_id = comment.parent_id.as_deref()?;
            let parent = index.get(parent_id).copied();
            if parent.is_none() {
                debug!(comment = %comment.id, parent = %parent_id, "orphaned comment promoted to root");
            }
            parent
        })
        .collect())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Settled,
}

/// Cuts every parent cycle at the member that appears first in the input,
/// turning it into a root.
fn break_cycles(parents: &mut [Option<usize>], comments: &[Comment]) {
    let mut marks = vec![Mark::Unvisited; parents.len()];

    for start in 0..parents.len() {
        let mut path: Vec<usize> = Vec::new();
        let mut cursor = Some(start);

        while let Some(node) = cursor {
            match marks[node] {
                Mark::Settled => break,
                Mark::OnPath => {
                    let cycle_start = path.iter().position(|&n| n == node).unwrap_or(0);
                    if let Some(&entry) = path[cycle_start..].iter().min() {
                        warn!(
                            comment = %comments[entry].id,
                            cycle_len = path.len() - cycle_start,
                            "parent cycle detected; promoting comment to root"
                        );
                        parents[entry] = None;
                    }
                    break;
                }
                Mark::Unvisited => {
                    marks[node] = Mark::OnPath;
                    path.push(node);
                    cursor = parents[node];
                }
            }
        }

        for node in path {
            marks[node] = Mark::Settled;
        }
    }
}

/// Moves comments into their parents bottom-up (post-order), so each
/// `children` list is complete before its owner is attached.
fn assemble(comments: Vec<Comment>, roots: &[usize], children: &[Vec<usize>]) -> Vec<Comment> {
    let mut slots: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    let mut stack: Vec<(usize, bool)> = roots.iter().rev().map(|&r| (r, false)).collect();

    while let Some((position, expanded)) = stack.pop() {
        if expanded {
            let replies: Vec<Comment> = children[position]
                .iter()
                .filter_map(|&child| slots[child].take())
                .collect();
            if let Some(node) = slots[position].as_mut() {
                node.children = replies;
            }
            continue;
        }

        stack.push((position, true));
        stack.extend(children[position].iter().rev().map(|&child| (child, false)));
    }

    roots.iter().filter_map(|&root| slots[root].take()).collect()
}
