//! Commit metadata handed to message callbacks.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::{Commit, Signature};
use serde::{Deserialize, Serialize};

/// Read-only description of the commit whose message is being corrected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitMetadata {
    /// Full SHA-1 hash of the original commit.
    pub hash: String,
    /// Commit author name and email address.
    pub author: String,
    /// Committer name and email address.
    pub committer: String,
    /// Author date with the original time zone.
    pub date: DateTime<FixedOffset>,
    /// Full hashes of the original parents.
    pub parents: Vec<String>,
}

impl CommitMetadata {
    /// Creates metadata from a git2 commit.
    pub fn from_git_commit(commit: &Commit) -> Result<Self> {
        let author = commit.author();
        let when = author.when();
        let offset = FixedOffset::east_opt(when.offset_minutes() * 60)
            .context("Invalid commit time zone offset")?;
        let date = DateTime::from_timestamp(when.seconds(), 0)
            .context("Invalid commit timestamp")?
            .with_timezone(&offset);

        Ok(Self {
            hash: commit.id().to_string(),
            author: format_signature(&author),
            committer: format_signature(&commit.committer()),
            date,
            parents: commit.parent_ids().map(|oid| oid.to_string()).collect(),
        })
    }

    /// Abbreviated hash for progress output.
    pub fn short_hash(&self) -> &str {
        &self.hash[..crate::git::SHORT_HASH_LEN.min(self.hash.len())]
    }
}

fn format_signature(signature: &Signature) -> String {
    format!(
        "{} <{}>",
        signature.name().unwrap_or("Unknown"),
        signature.email().unwrap_or("unknown@example.com")
    )
}
