//! Utility functions and helpers.

pub mod diagnostics;
pub mod preflight;
pub mod settings;

pub use diagnostics::{enable_error_backtraces, write_error_report};
pub use preflight::{
    check_git_repository, check_rewrite_prerequisites, check_working_directory_clean,
};
pub use settings::{resolve_table_path, Settings};
