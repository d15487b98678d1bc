//! Git operations and repository management.

pub mod commit;
pub mod repository;
pub mod rewrite;

pub use commit::CommitMetadata;
pub use repository::GitRepository;
pub use rewrite::{HistoryRewriter, RewriteSummary};

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;
