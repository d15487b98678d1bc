//! Preflight validation checks for early failure detection
//!
//! Commands call these before touching history so that they fail with a
//! clear message instead of half-way through a rewrite.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::git::GitRepository;

/// Validate that `path` is inside a git repository and open it
pub fn check_git_repository(path: &Path) -> Result<GitRepository> {
    GitRepository::open_at(path).with_context(|| {
        format!(
            "Not in a git repository: {}. Please run this command from within a git repository.",
            path.display()
        )
    })
}

/// Validate working directory is clean (no uncommitted changes to tracked files)
///
/// Untracked and ignored files are not considered: a message-only rewrite
/// keeps every tree as it is.
pub fn check_working_directory_clean(repo: &GitRepository) -> Result<()> {
    let status = repo
        .get_working_directory_status()
        .context("Failed to get working directory status")?;

    if !status.clean {
        let mut message = String::from("Working directory has uncommitted changes:\n");
        for change in &status.changes {
            message.push_str(&format!("  {} {}\n", change.status, change.file));
        }
        message.push_str("\nPlease commit or stash your changes before proceeding, or pass --force.");
        bail!(message);
    }

    Ok(())
}

/// Combined preflight check for commands that rewrite history
pub fn check_rewrite_prerequisites(path: &Path, force: bool) -> Result<GitRepository> {
    let repo = check_git_repository(path)?;
    repo.ensure_no_operation_in_progress()?;
    if !force {
        check_working_directory_clean(&repo)?;
    }
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_repository() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = check_git_repository(temp_dir.path()).err().unwrap();
        assert!(err.to_string().contains("Not in a git repository"));
    }

    #[test]
    fn accepts_fresh_repository() {
        let temp_dir = tempfile::tempdir().unwrap();
        git2::Repository::init(temp_dir.path()).unwrap();

        let repo = check_rewrite_prerequisites(temp_dir.path(), false).unwrap();
        assert!(repo.is_working_directory_clean().unwrap());
    }
}
