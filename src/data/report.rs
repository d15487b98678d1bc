//! Scan report output structures.

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use git2::Commit;
use serde::{Deserialize, Serialize};

use crate::correction::CorrectionTable;
use crate::git::CommitMetadata;

/// Commits whose messages a rewrite would change.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// Number of commits inspected.
    pub scanned: usize,
    /// Commits with at least one correction, oldest first.
    pub commits: Vec<ScanEntry>,
}

impl ScanReport {
    /// Runs `table` over every commit message without writing anything.
    ///
    /// Commits with an empty or non UTF-8 message are counted but never listed.
    pub fn from_commits(table: &CorrectionTable, commits: &[Commit<'_>]) -> Result<Self> {
        let mut report = Self {
            scanned: commits.len(),
            commits: Vec::new(),
        };

        for commit in commits {
            let Ok(original) = std::str::from_utf8(commit.message_raw_bytes()) else {
                continue;
            };
            let corrected = table.apply(original);
            if corrected != original {
                let metadata = CommitMetadata::from_git_commit(commit)?;
                report
                    .commits
                    .push(ScanEntry::new(&metadata, original, &corrected));
            }
        }

        Ok(report)
    }
}

/// Single commit in a scan report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEntry {
    /// Full SHA-1 hash of the commit.
    pub hash: String,
    /// Commit author name and email address.
    pub author: String,
    /// Author date with the original time zone.
    pub date: DateTime<FixedOffset>,
    /// Message as stored in the repository.
    pub original_message: String,
    /// Message after correction.
    pub corrected_message: String,
}

impl ScanEntry {
    /// Creates an entry from commit metadata and the two messages.
    pub fn new(commit: &CommitMetadata, original: &str, corrected: &str) -> Self {
        Self {
            hash: commit.hash.clone(),
            author: commit.author.clone(),
            date: commit.date,
            original_message: original.to_string(),
            corrected_message: corrected.to_string(),
        }
    }
}
