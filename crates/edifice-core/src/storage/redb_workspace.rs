//! # redb-backed Workspace Database
//!
//! A disk-backed workspace store using the redb embedded database,
//! providing:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - Zero configuration
//!
//! The database holds the binary-encoded workspace document (header +
//! payload, the same bytes `model_to_bytes` produces) under a single
//! key, plus a metadata table recording the format version.

use crate::formats::{model_from_bytes, model_to_bytes};
use crate::{Model, ModelError, primitives};
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;

/// Table for the workspace document: key string -> encoded bytes.
const WORKSPACE: TableDefinition<&str, &[u8]> = TableDefinition::new("workspace");

/// Table for metadata: key string -> value u64.
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

/// Key the workspace document is stored under.
const WORKSPACE_KEY: &str = "current";

/// A disk-backed workspace database.
pub struct WorkspaceDb {
    /// The redb database handle.
    db: Database,
}

impl std::fmt::Debug for WorkspaceDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceDb").finish_non_exhaustive()
    }
}

impl WorkspaceDb {
    /// Open or create a workspace database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let db = Database::create(path.as_ref()).map_err(|e| ModelError::Io(e.to_string()))?;

        // Initialize tables if they don't exist
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| ModelError::Io(e.to_string()))?;
            let _ = write_txn
                .open_table(WORKSPACE)
                .map_err(|e| ModelError::Io(e.to_string()))?;
            let _ = write_txn
                .open_table(METADATA)
                .map_err(|e| ModelError::Io(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| ModelError::Io(e.to_string()))?;
        }

        Ok(Self { db })
    }

    /// Save the model, replacing any previously stored workspace, in a
    /// single ACID transaction.
    pub fn save(&mut self, model: &Model) -> Result<(), ModelError> {
        let bytes = model_to_bytes(model)?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| ModelError::Io(e.to_string()))?;
        {
            let mut workspace_table = write_txn
                .open_table(WORKSPACE)
                .map_err(|e| ModelError::Io(e.to_string()))?;
            workspace_table
                .insert(WORKSPACE_KEY, bytes.as_slice())
                .map_err(|e| ModelError::Io(e.to_string()))?;

            let mut meta_table = write_txn
                .open_table(METADATA)
                .map_err(|e| ModelError::Io(e.to_string()))?;
            meta_table
                .insert("format_version", u64::from(primitives::FORMAT_VERSION))
                .map_err(|e| ModelError::Io(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| ModelError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load and hydrate the stored workspace, or `None` if the database
    /// holds no workspace yet.
    pub fn load(&self) -> Result<Option<Model>, ModelError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| ModelError::Io(e.to_string()))?;
        let workspace_table = read_txn
            .open_table(WORKSPACE)
            .map_err(|e| ModelError::Io(e.to_string()))?;

        match workspace_table
            .get(WORKSPACE_KEY)
            .map_err(|e| ModelError::Io(e.to_string()))?
        {
            Some(data) => Ok(Some(model_from_bytes(data.value())?)),
            None => Ok(None),
        }
    }

    /// The format version recorded at the last save, if any.
    pub fn format_version(&self) -> Result<Option<u64>, ModelError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| ModelError::Io(e.to_string()))?;
        let meta_table = read_txn
            .open_table(METADATA)
            .map_err(|e| ModelError::Io(e.to_string()))?;
        let version = meta_table
            .get("format_version")
            .map_err(|e| ModelError::Io(e.to_string()))?
            .map(|v| v.value());
        Ok(version)
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), ModelError> {
        self.db
            .compact()
            .map_err(|e| ModelError::Io(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::InteractionStyle;
    use tempfile::tempdir;

    fn sample_model() -> Model {
        let mut model = Model::new();
        let alice = model.add_person("Alice", "admin").expect("create");
        let shop = model.add_software_system("Shop", "").expect("create");
        model
            .add_container(&shop, "Web", "", "Rust")
            .expect("create");
        model
            .add_relationship(&alice, &shop, "uses", "web", InteractionStyle::Synchronous)
            .expect("add");
        model
    }

    #[test]
    fn empty_database_loads_nothing() {
        let temp = tempdir().expect("temp dir");
        let db = WorkspaceDb::open(temp.path().join("test.redb")).expect("open db");

        assert!(db.load().expect("load").is_none());
        assert_eq!(db.format_version().expect("version"), None);
    }

    #[test]
    fn save_load_roundtrip() {
        let temp = tempdir().expect("temp dir");
        let mut db = WorkspaceDb::open(temp.path().join("test.redb")).expect("open db");

        let model = sample_model();
        db.save(&model).expect("save");

        let loaded = db.load().expect("load").expect("workspace present");
        assert_eq!(loaded, model);
        assert_eq!(
            db.format_version().expect("version"),
            Some(u64::from(primitives::FORMAT_VERSION))
        );
    }

    #[test]
    fn persistence_across_reopen() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("test.redb");

        {
            let mut db = WorkspaceDb::open(&db_path).expect("open db");
            db.save(&sample_model()).expect("save");
        }
        // Database dropped, simulating process exit.
        {
            let db = WorkspaceDb::open(&db_path).expect("reopen db");
            let loaded = db.load().expect("load").expect("workspace present");
            assert_eq!(loaded.element_count(), 3);
            assert_eq!(loaded.relationship_count(), 1);
        }
    }

    #[test]
    fn save_replaces_previous_workspace() {
        let temp = tempdir().expect("temp dir");
        let mut db = WorkspaceDb::open(temp.path().join("test.redb")).expect("open db");

        db.save(&sample_model()).expect("save");

        let mut bigger = sample_model();
        bigger.add_person("Bob", "").expect("create");
        db.save(&bigger).expect("save again");

        let loaded = db.load().expect("load").expect("workspace present");
        assert_eq!(loaded, bigger);
    }

    #[test]
    fn compact_preserves_the_workspace() {
        let temp = tempdir().expect("temp dir");
        let mut db = WorkspaceDb::open(temp.path().join("test.redb")).expect("open db");

        let model = sample_model();
        db.save(&model).expect("save");
        db.compact().expect("compact");

        let loaded = db.load().expect("load").expect("workspace present");
        assert_eq!(loaded, model);
    }

    #[test]
    fn id_generation_continues_after_reload() {
        let temp = tempdir().expect("temp dir");
        let mut db = WorkspaceDb::open(temp.path().join("test.redb")).expect("open db");

        let model = sample_model();
        db.save(&model).expect("save");

        let mut loaded = db.load().expect("load").expect("workspace present");
        let fresh = loaded.add_person("Bob", "").expect("create");
        let highest = model
            .elements()
            .map(|e| e.id.numeric().unwrap_or(0))
            .chain(model.relationships().map(|r| r.id.numeric().unwrap_or(0)))
            .max()
            .unwrap_or(0);
        assert!(fresh.numeric().expect("numeric") > highest);
    }
}
