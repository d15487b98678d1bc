//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::{Commit, Repository, RepositoryState, Sort, Status, StatusOptions};

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

/// Working directory status
#[derive(Debug)]
pub struct WorkingDirectoryStatus {
    /// Whether tracked files have no uncommitted changes
    pub clean: bool,
    /// Tracked files with uncommitted changes
    pub changes: Vec<FileStatus>,
}

/// File status information
#[derive(Debug)]
pub struct FileStatus {
    /// Git status flags (e.g., "M ", " D")
    pub status: String,
    /// Path to the file relative to repository root
    pub file: String,
}

impl GitRepository {
    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Get access to the underlying git2::Repository
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Get working directory status, ignoring untracked and ignored files
    pub fn get_working_directory_status(&self) -> Result<WorkingDirectoryStatus> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .context("Failed to get repository status")?;

        let changes: Vec<FileStatus> = statuses
            .iter()
            .filter_map(|entry| {
                entry.path().map(|path| FileStatus {
                    status: format_status_flags(entry.status()),
                    file: path.to_string(),
                })
            })
            .collect();

        Ok(WorkingDirectoryStatus {
            clean: changes.is_empty(),
            changes,
        })
    }

    /// Check if working directory is clean
    pub fn is_working_directory_clean(&self) -> Result<bool> {
        Ok(self.get_working_directory_status()?.clean)
    }

    /// Fails when a merge, rebase, cherry-pick or similar is in progress
    pub fn ensure_no_operation_in_progress(&self) -> Result<()> {
        match self.repo.state() {
            RepositoryState::Clean => Ok(()),
            state => anyhow::bail!(
                "Repository has an operation in progress ({:?}). Finish or abort it first.",
                state
            ),
        }
    }

    /// Get every commit reachable from `rev`, oldest first
    pub fn get_history(&self, rev: &str) -> Result<Vec<Commit<'_>>> {
        let tip = self
            .repo
            .revparse_single(rev)
            .with_context(|| format!("Failed to parse revision: {}", rev))?
            .peel_to_commit()
            .context("Failed to peel object to commit")?;

        let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
        walker.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        walker.push(tip.id()).context("Failed to push commit")?;

        walker
            .map(|oid| {
                let oid = oid.context("Failed to get commit OID from walker")?;
                self.repo.find_commit(oid).context("Failed to find commit")
            })
            .collect()
    }

    /// Parse commit range and get commits, oldest first
    pub fn get_commits_in_range(&self, range: &str) -> Result<Vec<Commit<'_>>> {
        if let Some((start_spec, end_spec)) = range.split_once("..") {
            if start_spec.is_empty() || end_spec.is_empty() || end_spec.contains("..") {
                anyhow::bail!("Invalid range format: {}", range);
            }

            let start_commit = self
                .repo
                .revparse_single(start_spec)
                .with_context(|| format!("Failed to parse start commit: {}", start_spec))?
                .peel_to_commit()
                .context("Failed to peel start object to commit")?;
            let end_commit = self
                .repo
                .revparse_single(end_spec)
                .with_context(|| format!("Failed to parse end commit: {}", end_spec))?
                .peel_to_commit()
                .context("Failed to peel end object to commit")?;

            // Walk from end_commit back to start_commit (exclusive)
            let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
            walker.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
            walker
                .push(end_commit.id())
                .context("Failed to push end commit")?;
            walker
                .hide(start_commit.id())
                .context("Failed to hide start commit")?;

            walker
                .map(|oid| {
                    let oid = oid.context("Failed to get commit OID from walker")?;
                    self.repo.find_commit(oid).context("Failed to find commit")
                })
                .collect()
        } else {
            // Single commit by hash or reference
            let commit = self
                .repo
                .revparse_single(range)
                .with_context(|| format!("Failed to parse commit: {}", range))?
                .peel_to_commit()
                .context("Failed to peel object to commit")?;
            Ok(vec![commit])
        }
    }
}

/// Format git status flags into string representation
fn format_status_flags(flags: Status) -> String {
    let index = if flags.contains(Status::INDEX_NEW) {
        'A'
    } else if flags.contains(Status::INDEX_MODIFIED) {
        'M'
    } else if flags.contains(Status::INDEX_DELETED) {
        'D'
    } else if flags.contains(Status::INDEX_RENAMED) {
        'R'
    } else if flags.contains(Status::INDEX_TYPECHANGE) {
        'T'
    } else {
        ' '
    };

    let worktree = if flags.contains(Status::WT_MODIFIED) {
        'M'
    } else if flags.contains(Status::WT_DELETED) {
        'D'
    } else if flags.contains(Status::WT_TYPECHANGE) {
        'T'
    } else if flags.contains(Status::WT_RENAMED) {
        'R'
    } else {
        ' '
    };

    format!("{index}{worktree}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_flags_format() {
        assert_eq!(format_status_flags(Status::INDEX_NEW), "A ");
        assert_eq!(format_status_flags(Status::WT_MODIFIED), " M");
        assert_eq!(
            format_status_flags(Status::INDEX_MODIFIED | Status::WT_DELETED),
            "MD"
        );
    }
}
