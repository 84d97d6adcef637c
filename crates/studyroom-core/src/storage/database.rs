//! SQLite-backed storage.
//!
//! Provides a key-value table holding application state, including the
//! progress record as a single JSON document.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, ProgressStore};
use crate::error::{is_corrupt, CoreError, DatabaseError, Result};
use crate::progress::ProgressRecord;

const PROGRESS_KEY: &str = "progress_record";

/// SQLite database for application state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/studyroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_or_recover(&data_dir()?.join("studyroom.db"))
    }

    /// Open the database at `path`, moving a corrupt file aside to
    /// `<path>.corrupt` and starting a fresh one in its place.
    pub fn open_or_recover(path: &Path) -> Result<Self> {
        match Self::open_at(path) {
            Err(CoreError::Database(DatabaseError::Corrupt(reason))) => {
                let mut backup = path.as_os_str().to_owned();
                backup.push(".corrupt");
                let backup = PathBuf::from(backup);
                tracing::warn!(
                    "database at {} is unreadable ({reason}), moving it to {}",
                    path.display(),
                    backup.display()
                );
                std::fs::rename(path, &backup)?;
                Self::open_at(path)
            }
            other => other,
        }
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| {
            if is_corrupt(&source) {
                DatabaseError::Corrupt(source.to_string())
            } else {
                DatabaseError::OpenFailed {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl ProgressStore for Database {
    fn load(&mut self) -> Result<Option<ProgressRecord>> {
        match self.kv_get(PROGRESS_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, record: &ProgressRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.kv_set(PROGRESS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn kv_roundtrip_and_overwrite() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("missing").unwrap(), None);
        db.kv_set("k", "1").unwrap();
        db.kv_set("k", "2").unwrap();
        assert_eq!(db.kv_get("k").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn empty_database_has_no_record() {
        let mut db = Database::open_memory().unwrap();
        assert!(db.load().unwrap().is_none());
    }

    #[test]
    fn saved_record_loads_back() {
        let mut db = Database::open_memory().unwrap();
        let mut record = ProgressRecord::default();
        record.add_session_time(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(), 1200, 600);
        db.save(&record).unwrap();
        assert_eq!(db.load().unwrap(), Some(record));
    }

    #[test]
    fn undecodable_record_is_an_error() {
        let mut db = Database::open_memory().unwrap();
        db.kv_set(PROGRESS_KEY, "{\"daily_seconds\": 7").unwrap();
        assert!(matches!(db.load(), Err(CoreError::Json(_))));
    }

    #[test]
    fn junk_file_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studyroom.db");
        std::fs::write(&path, vec![0xAB; 4096]).unwrap();
        assert!(matches!(
            Database::open_at(&path),
            Err(CoreError::Database(DatabaseError::Corrupt(_)))
        ));
    }

    #[test]
    fn recover_replaces_junk_file_and_keeps_a_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studyroom.db");
        std::fs::write(&path, vec![0xAB; 4096]).unwrap();

        let db = Database::open_or_recover(&path).unwrap();
        db.kv_set("k", "v").unwrap();
        assert_eq!(db.kv_get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(
            std::fs::read(dir.path().join("studyroom.db.corrupt")).unwrap(),
            vec![0xAB; 4096]
        );
    }

    #[test]
    fn recover_leaves_healthy_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studyroom.db");
        Database::open_at(&path).unwrap().kv_set("a", "b").unwrap();
        let db = Database::open_or_recover(&path).unwrap();
        assert_eq!(db.kv_get("a").unwrap().as_deref(), Some("b"));
        assert!(!dir.path().join("studyroom.db.corrupt").exists());
    }

    #[test]
    fn file_database_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studyroom.db");
        Database::open_at(&path).unwrap().kv_set("a", "b").unwrap();
        let reopened = Database::open_at(&path).unwrap();
        assert_eq!(reopened.kv_get("a").unwrap().as_deref(), Some("b"));
    }
}
