//! In-process history rewriting.
//!
//! Every commit reachable from the selected references is visited parents
//! first. The message callback decides the new message; a commit whose
//! message and parents are unchanged keeps its id, anything else is written
//! again with its original header (tree, author, committer, encoding and any
//! extra headers) and the new parents.

use std::collections::HashMap;

use anyhow::{Context, Result};
use git2::{Commit, ObjectType, Oid, Reference, Repository, Sort};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::git::{CommitMetadata, GitRepository};

const REFLOG_MESSAGE: &str = "fix-commit-encoding: rewrite commit messages";
const BACKUP_PREFIX: &str = "refs/original/";

/// Outcome of a rewrite session.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RewriteSummary {
    /// Commits reachable from the rewritten references.
    pub commits_visited: usize,
    /// Commits written again, because of their message or their parents.
    pub commits_rewritten: usize,
    /// Commits whose message the callback changed.
    pub messages_changed: usize,
    /// References moved to rewritten commits.
    pub refs_updated: Vec<String>,
}

/// History rewrite session over one repository.
pub struct HistoryRewriter<'repo> {
    repo: &'repo Repository,
    refs: Option<Vec<String>>,
    backup: bool,
}

impl<'repo> HistoryRewriter<'repo> {
    /// Creates a session that rewrites every local branch and tag.
    pub fn new(repo: &'repo GitRepository) -> Self {
        Self {
            repo: repo.repository(),
            refs: None,
            backup: false,
        }
    }

    /// Restricts the session to the given references (full or short names).
    pub fn with_refs(mut self, refs: Vec<String>) -> Self {
        self.refs = (!refs.is_empty()).then_some(refs);
        self
    }

    /// Keeps the previous target of every moved reference under `refs/original/`.
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    /// Runs the session, calling `callback` once per commit with a non-empty UTF-8 message.
    pub fn run<F>(&self, mut callback: F) -> Result<RewriteSummary>
    where
        F: FnMut(&str, &CommitMetadata) -> String,
    {
        let refs = self.resolve_refs()?;
        if self.backup {
            self.ensure_no_previous_backup(&refs)?;
        }
        let mut summary = RewriteSummary::default();

        let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
        walker.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;

        let mut tips = 0;
        for name in &refs {
            let reference = self.repo.find_reference(name)?;
            match reference.peel_to_commit() {
                Ok(commit) => {
                    walker.push(commit.id())?;
                    tips += 1;
                }
                Err(e) => warn!("Skipping {name}: does not point to a commit ({e})"),
            }
        }

        if tips == 0 {
            info!("No commits to rewrite");
            return Ok(summary);
        }

        let mut rewritten: HashMap<Oid, Oid> = HashMap::new();

        for oid in walker {
            let oid = oid.context("Failed to get commit OID from walker")?;
            let commit = self
                .repo
                .find_commit(oid)
                .with_context(|| format!("Failed to find commit {oid}"))?;
            summary.commits_visited += 1;

            let parents: Vec<Oid> = commit
                .parent_ids()
                .map(|parent| rewritten.get(&parent).copied().unwrap_or(parent))
                .collect();
            let parents_changed = commit
                .parent_ids()
                .zip(&parents)
                .any(|(old, new)| old != *new);

            let raw_message = commit.message_raw_bytes();
            let new_message = match std::str::from_utf8(raw_message) {
                Ok(message) if !message.is_empty() => {
                    let metadata = CommitMetadata::from_git_commit(&commit)?;
                    let fixed = callback(message, &metadata);
                    (fixed != message).then_some(fixed)
                }
                Ok(_) => None,
                Err(_) => {
                    debug!("Commit {oid} has a non UTF-8 message, keeping it");
                    None
                }
            };

            if new_message.is_none() && !parents_changed {
                continue;
            }

            if new_message.is_some() {
                summary.messages_changed += 1;
            }
            let message = new_message.as_deref().map_or(raw_message, str::as_bytes);
            let new_oid = self.write_commit(&commit, &parents, message)?;
            debug!("Rewrote {oid} -> {new_oid}");

            rewritten.insert(oid, new_oid);
            summary.commits_rewritten += 1;
        }

        for name in &refs {
            if self.update_reference(name, &rewritten)? {
                summary.refs_updated.push(name.clone());
            }
        }

        self.update_detached_head(&rewritten)?;

        info!(
            "Visited {} commits, rewrote {}, changed {} messages",
            summary.commits_visited, summary.commits_rewritten, summary.messages_changed
        );

        Ok(summary)
    }

    /// Full names of the references to rewrite, sorted and deduplicated.
    fn resolve_refs(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        match &self.refs {
            Some(requested) => {
                for name in requested {
                    let reference = self
                        .repo
                        .resolve_reference_from_short_name(name)
                        .and_then(|r| r.resolve())
                        .with_context(|| format!("Failed to resolve reference: {name}"))?;
                    names.extend(reference_name(&reference));
                }
            }
            None => {
                for glob in ["refs/heads/*", "refs/tags/*"] {
                    for reference in self.repo.references_glob(glob)? {
                        let reference = reference?;
                        if reference.target().is_some() {
                            names.extend(reference_name(&reference));
                        }
                    }
                }
            }
        }

        names.sort();
        names.dedup();
        debug!("References to rewrite: {names:?}");
        Ok(names)
    }

    /// Writes `commit` again with new parents and message; every other header is kept.
    fn write_commit(&self, commit: &Commit<'_>, parents: &[Oid], message: &[u8]) -> Result<Oid> {
        let header = commit.raw_header_bytes();
        let mut buffer = Vec::with_capacity(header.len() + message.len() + 1);
        let mut parents_written = false;
        let mut in_signature = false;

        for line in header.split(|&b| b == b'\n').filter(|line| !line.is_empty()) {
            if in_signature && line.starts_with(b" ") {
                continue;
            }
            in_signature = false;

            // The signature covers the old content and would no longer verify.
            if line.starts_with(b"gpgsig ") || line.starts_with(b"gpgsig-sha256 ") {
                in_signature = true;
                continue;
            }

            if line.starts_with(b"parent ") {
                if !parents_written {
                    for parent in parents {
                        buffer.extend_from_slice(format!("parent {parent}\n").as_bytes());
                    }
                    parents_written = true;
                }
                continue;
            }

            buffer.extend_from_slice(line);
            buffer.push(b'\n');
        }

        buffer.push(b'\n');
        buffer.extend_from_slice(message);

        let odb = self.repo.odb().context("Failed to open object database")?;
        odb.write(ObjectType::Commit, &buffer)
            .with_context(|| format!("Failed to write rewritten commit for {}", commit.id()))
    }

    /// Moves `name` to the rewritten commit, returning whether it changed.
    fn update_reference(&self, name: &str, rewritten: &HashMap<Oid, Oid>) -> Result<bool> {
        let reference = self.repo.find_reference(name)?;
        let Some(target) = reference.target() else {
            return Ok(false);
        };
        let object = self.repo.find_object(target, None)?;

        match object.kind() {
            Some(ObjectType::Commit) => {
                let Some(&new_oid) = rewritten.get(&target) else {
                    return Ok(false);
                };
                self.backup_reference(name, target)?;
                self.repo
                    .reference(name, new_oid, true, REFLOG_MESSAGE)
                    .with_context(|| format!("Failed to update {name}"))?;
                debug!("Moved {name} to {new_oid}");
                Ok(true)
            }
            Some(ObjectType::Tag) => {
                let Some(tag) = object.as_tag() else {
                    return Ok(false);
                };
                if tag.target_type() != Some(ObjectType::Commit) {
                    return Ok(false);
                }
                let Some(&new_oid) = rewritten.get(&tag.target_id()) else {
                    return Ok(false);
                };
                let Some(tagger) = tag.tagger() else {
                    warn!("Skipping annotated tag {name}: it has no tagger");
                    return Ok(false);
                };

                let new_target = self.repo.find_object(new_oid, Some(ObjectType::Commit))?;
                let tag_name = tag
                    .name()
                    .or_else(|| name.strip_prefix("refs/tags/"))
                    .unwrap_or(name);
                let message = String::from_utf8_lossy(tag.message_bytes().unwrap_or_default());
                let new_tag = self
                    .repo
                    .tag_annotation_create(tag_name, &new_target, &tagger, &message)
                    .with_context(|| format!("Failed to recreate annotated tag {name}"))?;

                self.backup_reference(name, target)?;
                self.repo
                    .reference(name, new_tag, true, REFLOG_MESSAGE)
                    .with_context(|| format!("Failed to update {name}"))?;
                debug!("Recreated annotated tag {name} as {new_tag}");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Fails when a selected reference already has a backup from an earlier run.
    fn ensure_no_previous_backup(&self, refs: &[String]) -> Result<()> {
        let existing: Vec<String> = refs
            .iter()
            .map(|name| format!("{BACKUP_PREFIX}{name}"))
            .filter(|backup_name| self.repo.find_reference(backup_name).is_ok())
            .collect();

        if !existing.is_empty() {
            anyhow::bail!(
                "A previous backup already exists: {}. Delete it (git update-ref -d <ref>) or run without --backup.",
                existing.join(", ")
            );
        }
        Ok(())
    }

    fn backup_reference(&self, name: &str, old_target: Oid) -> Result<()> {
        if !self.backup {
            return Ok(());
        }
        let backup_name = format!("{BACKUP_PREFIX}{name}");
        self.repo
            .reference(&backup_name, old_target, false, REFLOG_MESSAGE)
            .with_context(|| format!("Failed to write backup reference {backup_name}"))?;
        Ok(())
    }

    fn update_detached_head(&self, rewritten: &HashMap<Oid, Oid>) -> Result<()> {
        if !self.repo.head_detached().unwrap_or(false) {
            return Ok(());
        }
        let Some(head) = self.repo.head()?.target() else {
            return Ok(());
        };
        if let Some(&new_head) = rewritten.get(&head) {
            self.repo
                .set_head_detached(new_head)
                .context("Failed to move detached HEAD")?;
            debug!("Moved detached HEAD to {new_head}");
        }
        Ok(())
    }
}

fn reference_name(reference: &Reference<'_>) -> Option<String> {
    let name = reference.name().map(str::to_string);
    if name.is_none() {
        warn!("Skipping reference with a non UTF-8 name");
    }
    name
}
