//! Backup → clear → ingest → reindex.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::observability::metrics;
use crate::store::{DocumentStore, Filter, TextSearchable};
use crate::updater::source::{list_sources, read_items, to_config_item};
use crate::updater::{FileOutcome, IngestError, UpdateError, UpdateReport};

/// Reloads the production store from JSON source files, keeping the previous
/// contents in a backup store.
pub struct Updater<S> {
    production: Arc<S>,
    backup: Arc<S>,
    source_dir: PathBuf,
}

impl<S> Updater<S>
where
    S: DocumentStore + TextSearchable,
{
    pub fn new(production: Arc<S>, backup: Arc<S>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            production,
            backup,
            source_dir: source_dir.into(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Run every stage once.
    ///
    /// Per-file failures are recorded in the report and clear its `success`
    /// flag; they never stop the run. Only an unreadable source directory or
    /// a store failure outside ingest returns `Err`.
    pub fn run(&self) -> Result<UpdateReport, UpdateError> {
        let mut report = UpdateReport {
            success: true,
            ..UpdateReport::default()
        };

        report.backed_up = self.backup_collections()?;
        self.index_backup()?;
        self.ingest(&mut report)?;
        self.index_production()?;

        self.backup.flush()?;
        self.production.flush()?;

        metrics::record_reload(&report);
        tracing::info!(
            success = report.success,
            inserted = report.inserted(),
            files = report.files.len(),
            "Updater finished"
        );
        Ok(report)
    }

    /// Stage 1: copy each production collection into the backup store, then
    /// clear it.
    fn backup_collections(&self) -> Result<Vec<String>, UpdateError> {
        let mut backed_up = Vec::new();
        for name in self.production.list_collection_names() {
            tracing::info!(collection = %name, "Backing up and resetting collection");

            if self.backup.estimated_document_count(&name) > 0 {
                self.backup.delete_many(&name, &Filter::All)?;
            }

            let contents = self.production.find(&name, &Filter::All)?;
            let copied = contents.len();
            if !contents.is_empty() {
                self.backup.insert_many(&name, contents)?;
            }

            self.production.delete_many(&name, &Filter::All)?;
            self.production.drop_indexes(&name)?;

            tracing::debug!(collection = %name, documents = copied, "Collection backed up");
            backed_up.push(name);
        }
        Ok(backed_up)
    }

    /// Stage 2: rebuild the text index of every backup collection.
    fn index_backup(&self) -> Result<(), UpdateError> {
        for name in self.backup.list_collection_names() {
            self.backup.drop_indexes(&name)?;
            self.backup.create_text_index(&name)?;
        }
        Ok(())
    }

    /// Stage 3: load every JSON source file into production.
    fn ingest(&self, report: &mut UpdateReport) -> Result<(), UpdateError> {
        let listing = list_sources(&self.source_dir).map_err(|source| UpdateError::SourceDir {
            path: self.source_dir.clone(),
            source,
        })?;

        for path in &listing.skipped {
            tracing::info!(path = ?path, "Skipping non json file in data directory");
        }
        report.skipped = listing.skipped;

        for path in listing.json {
            tracing::info!(path = ?path, "Parsing source file");
            let outcome = self.ingest_file(&path);
            if outcome.is_success() {
                tracing::info!(path = ?path, inserted = outcome.inserted, "Source file parsed and added");
            } else {
                tracing::error!(
                    path = ?path,
                    inserted = outcome.inserted,
                    errors = outcome.errors.len(),
                    "Failed to parse source file, see messages above"
                );
                report.success = false;
            }
            report.files.insert(path, outcome);
        }
        Ok(())
    }

    fn ingest_file(&self, path: &Path) -> FileOutcome {
        let mut outcome = FileOutcome::default();
        let items = match read_items(path) {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(path = ?path, error = %e, "Could not read source file");
                outcome.errors.push(e);
                return outcome;
            }
        };

        for (index, value) in items.into_iter().enumerate() {
            let (collection, item) = match to_config_item(index, value) {
                Ok(converted) => converted,
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "Could not create document from config object");
                    outcome.errors.push(e);
                    continue;
                }
            };

            tracing::debug!(
                path = ?path,
                collection = %collection,
                classname = item.classname().unwrap_or_default(),
                "Adding new object to database"
            );
            match self.production.insert_one(&collection, item.into_document()) {
                Ok(()) => outcome.inserted += 1,
                Err(source) => {
                    let e = IngestError::Store { index, source };
                    tracing::warn!(path = ?path, error = %e, "Could not insert config object");
                    outcome.errors.push(e);
                }
            }
        }
        outcome
    }

    /// Stage 4: rebuild the text index of every production collection.
    fn index_production(&self) -> Result<(), UpdateError> {
        for name in self.production.list_collection_names() {
            tracing::info!(collection = %name, "Updating index for collection");
            self.production.create_text_index(&name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, MemoryStore};
    use serde_json::json;
    use std::fs;

    fn doc(v: serde_json::Value) -> Document {
        Document::try_from(v).unwrap()
    }

    fn stores() -> (Arc<MemoryStore>, Arc<MemoryStore>) {
        (
            Arc::new(MemoryStore::in_memory("arma-api")),
            Arc::new(MemoryStore::in_memory("arma-api-backup")),
        )
    }

    #[test]
    fn test_valid_and_placeholder_items() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("vanilla.json"),
            r#"[{"type":"Primaries","mod":"vanilla","classname":"rifle1"},{"type":"","mod":"vanilla","classname":"bad"}]"#,
        )
        .unwrap();

        let (prod, backup) = stores();
        let report = Updater::new(prod.clone(), backup, dir.path()).run().unwrap();

        assert!(!report.success);
        assert_eq!(report.inserted(), 1);
        let docs = prod.find("data.vanilla", &Filter::All).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get_str("classname"), Some("rifle1"));
    }

    #[test]
    fn test_backup_holds_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("ace.json"),
            r#"[{"type":"Tools","mod":"ace","class":"ACE_CableTie"}]"#,
        )
        .unwrap();

        let (prod, backup) = stores();
        prod.insert_one("data.ace", doc(json!({"type": "Tools", "mod": "ace", "class": "old"})))
            .unwrap();
        prod.insert_one("data.rhs", doc(json!({"type": "Maps", "mod": "rhs", "class": "gone"})))
            .unwrap();
        backup
            .insert_one("data.ace", doc(json!({"type": "Tools", "mod": "ace", "class": "stale"})))
            .unwrap();

        let report = Updater::new(prod.clone(), backup.clone(), dir.path()).run().unwrap();
        assert!(report.success);
        assert_eq!(report.backed_up, vec!["data.ace", "data.rhs"]);

        let backed_up = backup.find("data.ace", &Filter::All).unwrap();
        assert_eq!(backed_up.len(), 1);
        assert_eq!(backed_up[0].get_str("class"), Some("old"));
        assert_eq!(backup.find("data.rhs", &Filter::All).unwrap().len(), 1);
        assert!(backup.has_text_index("data.ace"));

        let current = prod.find("data.ace", &Filter::All).unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].get_str("class"), Some("ACE_CableTie"));
        assert_eq!(prod.estimated_document_count("data.rhs"), 0);
        assert!(prod.has_text_index("data.ace"));
        assert!(prod.has_text_index("data.rhs"));
    }

    #[test]
    fn test_unparsable_file_does_not_stop_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_broken.json"), "[{").unwrap();
        fs::write(dir.path().join("b_good.json"), r#"[{"type":"Maps","mod":"vanilla","class":"ItemMap"}]"#)
            .unwrap();
        fs::write(dir.path().join("readme.md"), "not data").unwrap();

        let (prod, backup) = stores();
        let report = Updater::new(prod.clone(), backup, dir.path()).run().unwrap();

        assert!(!report.success);
        assert_eq!(report.skipped.len(), 1);
        let failed: Vec<_> = report.failed_files().collect();
        assert_eq!(failed, vec![dir.path().join("a_broken.json").as_path()]);
        assert_eq!(prod.estimated_document_count("data.vanilla"), 1);
    }

    #[test]
    fn test_missing_source_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (prod, backup) = stores();
        let result = Updater::new(prod, backup, dir.path().join("absent")).run();
        assert!(matches!(result, Err(UpdateError::SourceDir { .. })));
    }
}
