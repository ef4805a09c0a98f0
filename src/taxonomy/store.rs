// src/taxonomy/store.rs
// Persisted taxonomy file at a well-known location. Uploads are
// validated in full before the stored file is touched, so a rejected
// upload never clobbers a working taxonomy.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::Taxonomy;
use crate::error::{Result, TriageError};

#[derive(Debug, Clone)]
pub struct TaxonomyStore {
    path: PathBuf,
}

impl TaxonomyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the persisted taxonomy wholesale.
    pub fn load(&self) -> Result<Taxonomy> {
        if !self.path.exists() {
            return Err(TriageError::ConfigurationMissing {
                path: self.path.display().to_string(),
            });
        }
        let file = fs::File::open(&self.path).map_err(|e| {
            TriageError::SourceUnreadable(anyhow::Error::new(e).context(format!(
                "failed to open taxonomy file '{}'",
                self.path.display()
            )))
        })?;
        Taxonomy::from_csv_reader(file)
    }

    /// Validate a candidate taxonomy and, only if it parses with the
    /// required columns, overwrite the stored file. Row-level content
    /// is persisted as-is.
    pub fn replace(&self, bytes: &[u8]) -> Result<Taxonomy> {
        let taxonomy = Taxonomy::from_csv_reader(bytes)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    TriageError::SourceUnreadable(
                        anyhow::Error::new(e).context("failed to create taxonomy directory"),
                    )
                })?;
            }
        }
        fs::write(&self.path, bytes).map_err(|e| {
            TriageError::SourceUnreadable(anyhow::Error::new(e).context(format!(
                "failed to write taxonomy file '{}'",
                self.path.display()
            )))
        })?;

        info!(
            path = %self.path.display(),
            rows = taxonomy.len(),
            "taxonomy replaced"
        );
        Ok(taxonomy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "category,subcategory\nHardware,Mice\nSoftware,Email\n";

    #[test]
    fn load_missing_file_is_configuration_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaxonomyStore::new(dir.path().join("categories.csv"));
        let err = store.load().unwrap_err();
        assert!(matches!(err, TriageError::ConfigurationMissing { .. }));
    }

    #[test]
    fn replace_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaxonomyStore::new(dir.path().join("categories.csv"));
        let replaced = store.replace(VALID.as_bytes()).unwrap();
        assert_eq!(replaced.len(), 2);
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.entries[1].subcategory, "Email");
    }

    #[test]
    fn rejected_upload_leaves_stored_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaxonomyStore::new(dir.path().join("categories.csv"));
        store.replace(VALID.as_bytes()).unwrap();

        let err = store
            .replace(b"category,notes\nHardware,misc\n")
            .unwrap_err();
        assert!(matches!(err, TriageError::SchemaInvalid { .. }));

        // The previous upload is still what loads.
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.entries[0].subcategory, "Mice");
    }

    #[test]
    fn rejected_upload_on_fresh_store_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaxonomyStore::new(dir.path().join("categories.csv"));
        let _ = store.replace(b"notes\nwhatever\n").unwrap_err();
        assert!(!store.exists());
    }
}
