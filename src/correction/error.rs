//! Correction table validation errors.

use thiserror::Error;

/// Reasons a set of corrections cannot form a table.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    /// A correction with an empty search string would match everywhere.
    #[error("Correction at index {0} has an empty search string")]
    EmptyKey(usize),

    /// The same garbled text appears twice.
    #[error("Duplicate correction for '{0}'")]
    DuplicateKey(String),

    /// A replacement contains garbled text, or can form it together with the
    /// surrounding text, so a second pass would change the message again.
    #[error("Replacement '{value}' can produce the garbled text '{key}'")]
    NotIdempotent {
        /// Search string the replacement can produce.
        key: String,
        /// Offending replacement.
        value: String,
    },
}
