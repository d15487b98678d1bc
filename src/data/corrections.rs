//! Correction file structures and validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::correction::{Correction, CorrectionTable};

/// Correction file structure.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CorrectionFile {
    /// Extra corrections, applied together with the built-in table.
    #[serde(default)]
    pub corrections: Vec<Correction>,
}

impl CorrectionFile {
    /// Loads corrections from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).with_context(|| {
            format!(
                "Failed to read correction file: {}",
                path.as_ref().display()
            )
        })?;

        let file: CorrectionFile =
            crate::data::from_yaml(&content).context("Failed to parse YAML correction file")?;

        file.validate()?;

        Ok(file)
    }

    /// Creates a correction file listing every entry of `table`.
    pub fn from_table(table: &CorrectionTable) -> Self {
        Self {
            corrections: table.entries().to_vec(),
        }
    }

    /// Validates each entry on its own; cross-entry checks happen when the table is built.
    pub fn validate(&self) -> Result<()> {
        for (i, correction) in self.corrections.iter().enumerate() {
            if correction.from.is_empty() {
                anyhow::bail!("Invalid correction at index {}: 'from' is empty", i);
            }
            if correction.from == correction.to {
                anyhow::bail!(
                    "Invalid correction at index {}: '{}' maps to itself",
                    i,
                    correction.from
                );
            }
        }

        Ok(())
    }

    /// Builds the built-in table extended with this file's entries.
    pub fn into_table(self) -> Result<CorrectionTable> {
        CorrectionTable::builtin()
            .extend(self.corrections)
            .context("Correction file conflicts with the correction table")
    }

    /// Saves corrections to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml_content = crate::data::to_yaml(self)?;

        fs::write(&path, yaml_content).with_context(|| {
            format!(
                "Failed to write correction file: {}",
                path.as_ref().display()
            )
        })?;

        Ok(())
    }
}

/// Resolves the table to use: built-in, or built-in plus the given file.
pub fn load_table(path: Option<&Path>) -> Result<CorrectionTable> {
    match path {
        Some(path) => CorrectionFile::load_from_file(path)?.into_table(),
        None => Ok(CorrectionTable::builtin().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::CORRECTIONS;

    #[test]
    fn loads_and_extends_builtin_table() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("corrections.yaml");
        fs::write(
            &path,
            "corrections:\n  - from: \"VersiÃ³n\"\n    to: \"Versión\"\n",
        )
        .unwrap();

        let table = load_table(Some(path.as_path())).unwrap();
        assert_eq!(table.len(), CORRECTIONS.len() + 1);
        assert_eq!(table.apply("VersiÃ³n de diseÃ±o"), "Versión de diseño");
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = CorrectionFile::load_from_file(temp_dir.path().join("nope.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_self_mapping() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("corrections.yaml");
        fs::write(&path, "corrections:\n  - from: abc\n    to: abc\n").unwrap();

        assert!(CorrectionFile::load_from_file(&path).is_err());
    }

    #[test]
    fn rejects_empty_from() {
        let file = CorrectionFile {
            corrections: vec![Correction::new("", "x")],
        };
        assert!(file.validate().is_err());
    }

    #[test]
    fn empty_file_means_builtin_table() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("corrections.yaml");
        fs::write(&path, "corrections: []\n").unwrap();

        let table = load_table(Some(path.as_path())).unwrap();
        assert_eq!(table.len(), CORRECTIONS.len());
    }

    #[test]
    fn saved_builtin_table_loads_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("builtin.yaml");

        CorrectionFile::from_table(CorrectionTable::builtin())
            .save_to_file(&path)
            .unwrap();
        let loaded = CorrectionFile::load_from_file(&path).unwrap();

        assert_eq!(loaded.corrections, CorrectionTable::builtin().entries());
    }
}
