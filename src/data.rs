//! Correction files, reports and YAML serialization.

pub mod corrections;
pub mod report;
pub mod yaml;

pub use corrections::*;
pub use report::*;
pub use yaml::*;
