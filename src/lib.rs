//! # fix-commit-encoding
//!
//! Repairs commit messages whose Spanish accents were garbled by a UTF-8 text
//! being read as Latin-1 (`Ã³` instead of `ó`).
//!
//! The correction engine lives in [`correction`]; the command line exposes it
//! as a stdin/stdout filter and as an in-process history rewrite.
//!
//! ```rust
//! use fix_commit_encoding::fix_commit_message;
//!
//! assert_eq!(fix_commit_message("cachÃ© y pÃ¡gina"), "caché y página");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod correction;
pub mod data;
pub mod git;
pub mod utils;

pub use crate::cli::Cli;
pub use crate::correction::{fix_commit_message, fix_optional_message, CorrectionTable};

/// The current version of fix-commit-encoding.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
