//! # Store History
//!
//! When the store root is a git repository, every mutating command records
//! a commit describing the change. Stores without a repository work the
//! same, minus the history. The `git` subcommand passes through to the
//! system git so the usual remote workflows (`pk git push`) keep working.

use std::path::Path;
use std::process::Command;

use git2::{IndexAddOption, Repository, Signature};

use crate::utils::error::{Error, Result};

/// True when the store root carries a git repository.
pub fn is_repo(root: &Path) -> bool {
    root.join(".git").exists()
}

/// Stages every change in the store and commits it. No-op when the store
/// has no repository or nothing changed.
pub fn commit_all(root: &Path, message: &str) -> Result<()> {
    if !is_repo(root) {
        return Ok(());
    }

    let repo = Repository::open(root)?;
    let mut index = repo.index()?;
    index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
    index.update_all(["*"].iter(), None)?;
    index.write()?;

    let tree_id = index.write_tree()?;
    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(_) => None,
    };

    // Skip empty commits
    if let Some(ref parent) = parent {
        if parent.tree_id() == tree_id {
            return Ok(());
        }
    }

    let tree = repo.find_tree(tree_id)?;
    let signature = repo
        .signature()
        .or_else(|_| Signature::now("passkeep", "passkeep@localhost"))?;
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )?;

    log::info!("committed: {}", message);
    Ok(())
}

/// Runs the system git inside the store, inheriting stdio.
pub fn passthrough(root: &Path, args: &[String]) -> Result<()> {
    let status = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .status()?;

    if !status.success() {
        return Err(Error::new(&format!("git exited with {}", status)));
    }
    Ok(())
}
