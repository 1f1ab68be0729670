//! JSON-file tables with file locking.
//!
//! Each logical table (exercises, workouts) lives in one JSON document.
//! Reads take a shared lock; writes go through a locked temp file that is
//! synced and renamed over the original, so a crash mid-write never leaves a
//! half-written table behind.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// A record stored in a table, addressed by its primary key
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Table name used in logs and errors
    const TABLE: &'static str;

    fn key(&self) -> &str;
}

/// A table of records persisted as a JSON array, in insertion order
pub struct JsonTable<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T: Record> JsonTable<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Load every record with shared locking
    ///
    /// A missing file is an empty table. A file that can't be parsed is a
    /// storage fault and is returned as an error rather than replaced.
    pub fn load(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            tracing::debug!("No {} table at {:?}, treating as empty", T::TABLE, self.path);
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<T> = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded {} records from {} table", records.len(), T::TABLE);
        Ok(records)
    }

    /// Replace the whole table atomically
    ///
    /// The serialized table must parse back as `Vec<T>`; otherwise nothing is
    /// written. serde_json turns non-finite floats into `null`, which would
    /// leave a file every later `load` rejects.
    pub fn save(&self, records: &[T]) -> Result<()> {
        let bytes = serde_json::to_vec(records)?;
        if let Err(source) = serde_json::from_slice::<Vec<T>>(&bytes) {
            tracing::error!("Not saving {} table: {}", T::TABLE, source);
            return Err(Error::Unreadable {
                table: T::TABLE,
                source,
            });
        }

        let parent = self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "table path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        let mut file = temp.as_file();
        file.write_all(&bytes)?;

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} records to {} table", records.len(), T::TABLE);
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    pub fn get(&self, key: &str) -> Result<Option<T>> {
        Ok(self.load()?.into_iter().find(|r| r.key() == key))
    }

    /// Insert new records, failing if any key is already present
    pub fn insert_all(&self, new: Vec<T>) -> Result<()> {
        let mut records = self.load()?;
        for record in new {
            if records.iter().any(|r| r.key() == record.key()) {
                return Err(Error::DuplicateKey {
                    table: T::TABLE,
                    key: record.key().to_string(),
                });
            }
            records.push(record);
        }
        self.save(&records)
    }

    pub fn insert(&self, record: T) -> Result<()> {
        self.insert_all(vec![record])
    }

    /// Load one record, let `f` modify it, and save it back
    ///
    /// Returns `Ok(None)` without writing when the key doesn't exist.
    pub fn update<F>(&self, key: &str, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut records = self.load()?;
        let Some(record) = records.iter_mut().find(|r| r.key() == key) else {
            return Ok(None);
        };
        f(record);
        let updated = record.clone();
        self.save(&records)?;
        Ok(Some(updated))
    }

    /// Remove a record; returns whether anything was removed
    pub fn delete(&self, key: &str) -> Result<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.key() != key);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        value: i32,
    }

    impl Record for Row {
        const TABLE: &'static str = "rows";

        fn key(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, value: i32) -> Row {
        Row {
            id: id.into(),
            value,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let table: JsonTable<Row> = JsonTable::new(temp_dir.path().join("rows.json"));
        assert!(table.load().unwrap().is_empty());
        assert_eq!(table.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_keeps_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let table = JsonTable::new(temp_dir.path().join("rows.json"));
        table.insert(row("b", 1)).unwrap();
        table.insert(row("a", 2)).unwrap();

        let ids: Vec<_> = table.load().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let table = JsonTable::new(temp_dir.path().join("rows.json"));
        table.insert(row("a", 1)).unwrap();

        let err = table.insert(row("a", 2)).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { table: "rows", .. }));
        assert_eq!(table.get("a").unwrap().unwrap().value, 1);
    }

    #[test]
    fn test_update_and_delete() {
        let temp_dir = tempfile::tempdir().unwrap();
        let table = JsonTable::new(temp_dir.path().join("rows.json"));
        table.insert(row("a", 1)).unwrap();

        let updated = table.update("a", |r| r.value = 10).unwrap();
        assert_eq!(updated, Some(row("a", 10)));
        assert_eq!(table.update("missing", |r| r.value = 0).unwrap(), None);

        assert!(table.delete("a").unwrap());
        assert!(!table.delete("a").unwrap());
        assert!(table.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupted_table_returns_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("rows.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let table: JsonTable<Row> = JsonTable::new(&path);
        assert!(matches!(table.load(), Err(Error::Json(_))));
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Reading {
        id: String,
        value: f64,
    }

    impl Record for Reading {
        const TABLE: &'static str = "readings";

        fn key(&self) -> &str {
            &self.id
        }
    }

    #[test]
    fn test_non_finite_value_is_not_written() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("readings.json");
        let table = JsonTable::new(&path);
        table
            .insert(Reading {
                id: "a".into(),
                value: 1.5,
            })
            .unwrap();
        let before = std::fs::read(&path).unwrap();

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = table
                .insert(Reading {
                    id: "b".into(),
                    value,
                })
                .unwrap_err();
            assert!(matches!(err, Error::Unreadable { table: "readings", .. }));
        }

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(table.load().unwrap().len(), 1);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let table: JsonTable<Row> = JsonTable::new(temp_dir.path().join("rows.json"));
        table.save(&[row("a", 1)]).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "rows.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only rows.json, found extras: {:?}",
            extras
        );
    }
}
