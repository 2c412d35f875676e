//! Durable key-value layer on top of redb.
//!
//! One redb file holds two tables ("partitions"): vectors and documents,
//! both keyed by entity ID with encoded records as values. Every operation
//! runs in its own transaction. redb admits a single write transaction at a
//! time, so read-check-write sequences such as [`DurableStore::put_new`] and
//! [`DurableStore::replace`] are atomic with respect to other writers.

use crate::config;
use crate::error::Result;
use redb::{DatabaseError, ReadableTable, TableDefinition};
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const VECTORS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new(config::VECTORS_PARTITION);
const DOCUMENTS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new(config::DOCUMENTS_PARTITION);

/// A named, independent key space inside the store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Vectors,
    Documents,
}

impl Partition {
    fn table(self) -> TableDefinition<'static, &'static str, &'static [u8]> {
        match self {
            Partition::Vectors => VECTORS_TABLE,
            Partition::Documents => DOCUMENTS_TABLE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Partition::Vectors => config::VECTORS_PARTITION,
            Partition::Documents => config::DOCUMENTS_PARTITION,
        }
    }
}

/// Handle to the store file. Dropping it releases the file lock.
pub struct DurableStore {
    db: redb::Database,
    path: PathBuf,
    #[cfg(test)]
    fail_commits: std::sync::atomic::AtomicBool,
}

impl std::fmt::Debug for DurableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl DurableStore {
    /// Opens or creates the store at `path` and ensures both partitions exist.
    ///
    /// While another handle holds the file, retries until `timeout` has elapsed.
    pub fn open(path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let deadline = Instant::now() + timeout;
        let db = loop {
            match redb::Database::create(path) {
                Ok(db) => break db,
                Err(DatabaseError::DatabaseAlreadyOpen) if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(config::OPEN_RETRY_INTERVAL_MS));
                }
                Err(e) => return Err(e.into()),
            }
        };

        let txn = db.begin_write()?;
        txn.open_table(VECTORS_TABLE)?;
        txn.open_table(DOCUMENTS_TABLE)?;
        txn.commit()?;

        tracing::info!("Opened durable store at {:?}", path);
        Ok(Self {
            db,
            path: path.to_path_buf(),
            #[cfg(test)]
            fail_commits: std::sync::atomic::AtomicBool::new(false),
        })
    }

    fn commit(&self, txn: redb::WriteTransaction) -> Result<()> {
        #[cfg(test)]
        if self.fail_commits.load(std::sync::atomic::Ordering::SeqCst) {
            txn.abort()?;
            return Err(std::io::Error::other("injected commit failure").into());
        }
        txn.commit()?;
        Ok(())
    }

    /// Makes every subsequent write abort instead of committing.
    #[cfg(test)]
    pub(crate) fn set_fail_commits(&self, on: bool) {
        self.fail_commits
            .store(on, std::sync::atomic::Ordering::SeqCst);
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the value stored under `key`.
    pub fn get(&self, partition: Partition, key: &str) -> Result<Option<Vec<u8>>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(partition.table())?;
        let value = table.get(key)?.map(|guard| guard.value().to_vec());
        Ok(value)
    }

    /// Writes `value` under `key`, overwriting any previous value.
    pub fn put(&self, partition: Partition, key: &str, value: &[u8]) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(partition.table())?;
            table.insert(key, value)?;
        }
        self.commit(txn)?;
        Ok(())
    }

    /// Writes `value` under `key` only if the key is absent.
    ///
    /// Returns `false` (and writes nothing) if the key already exists.
    pub fn put_new(&self, partition: Partition, key: &str, value: &[u8]) -> Result<bool> {
        let txn = self.db.begin_write()?;
        let inserted = {
            let mut table = txn.open_table(partition.table())?;
            let exists = table.get(key)?.is_some();
            if !exists {
                table.insert(key, value)?;
            }
            !exists
        };
        if inserted {
            self.commit(txn)?;
        } else {
            txn.abort()?;
        }
        Ok(inserted)
    }

    /// Read-modify-write of an existing key in one transaction.
    ///
    /// `f` receives the current value and returns the replacement plus a value
    /// handed back to the caller. Returns `None` if the key is absent. An error
    /// from `f` aborts the transaction.
    pub fn replace<T, F>(&self, partition: Partition, key: &str, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&[u8]) -> Result<(Vec<u8>, T)>,
    {
        let txn = self.db.begin_write()?;
        let outcome = {
            let mut table = txn.open_table(partition.table())?;
            let current = table.get(key)?.map(|guard| guard.value().to_vec());
            match current {
                Some(bytes) => {
                    let (next, out) = f(&bytes)?;
                    table.insert(key, next.as_slice())?;
                    Some(out)
                }
                None => None,
            }
        };
        if outcome.is_some() {
            self.commit(txn)?;
        } else {
            txn.abort()?;
        }
        Ok(outcome)
    }

    /// Removes `key`. Returns `false` if it was absent.
    pub fn delete(&self, partition: Partition, key: &str) -> Result<bool> {
        let txn = self.db.begin_write()?;
        let mut table = txn.open_table(partition.table())?;
        let removed = table.remove(key)?.is_some();
        drop(table);
        if removed {
            self.commit(txn)?;
        } else {
            txn.abort()?;
        }
        Ok(removed)
    }

    /// Visits every entry in ascending key order within one read snapshot.
    ///
    /// The scan stops early when `visit` returns `ControlFlow::Break`.
    pub fn for_each<F>(&self, partition: Partition, mut visit: F) -> Result<()>
    where
        F: FnMut(&str, &[u8]) -> Result<ControlFlow<()>>,
    {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(partition.table())?;
        for entry in table.iter()? {
            let (key, value) = entry?;
            if visit(key.value(), value.value())?.is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Verifies that `partition` can be opened for reading.
    pub fn check(&self, partition: Partition) -> Result<()> {
        let txn = self.db.begin_read()?;
        txn.open_table(partition.table())?;
        Ok(())
    }
}
