// src/core/database/core.rs

//! Defines the `Db` struct: the registry of list structures, the command log,
//! and the single-writer lock that serializes writable transactions.

use super::transaction::Tx;
use crate::config::Config;
use crate::core::SpinelKvError;
use crate::core::persistence::{CommandLogLoader, CommandLogWriter, CommandRecord};
use crate::core::storage::{Index, ListStore};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info};

pub struct Db {
    config: Config,
    /// Committed in-memory state. Mutated only by replay and by commit.
    index: RwLock<Index>,
    /// Held by a writable transaction for its entire lifetime.
    writer_lock: Mutex<()>,
    /// `None` when persistence is disabled.
    log: Mutex<Option<CommandLogWriter>>,
    next_tx_id: AtomicU64,
}

impl Db {
    /// Opens the engine, replaying the command log into memory first.
    pub fn open(config: Config) -> Result<Self, SpinelKvError> {
        let mut index = Index::new();
        let mut last_tx_id = 0;

        let log = if config.persistence.enabled {
            let stats = CommandLogLoader::new(config.persistence.clone()).load_into(&mut index)?;
            last_tx_id = stats.last_tx_id;
            Some(CommandLogWriter::open(&config.persistence)?)
        } else {
            info!("Persistence disabled; running with an in-memory list index only.");
            None
        };

        info!(
            "Database opened with {} list buckets.",
            index.bucket_count()
        );
        Ok(Self {
            config,
            index: RwLock::new(index),
            writer_lock: Mutex::new(()),
            log: Mutex::new(log),
            next_tx_id: AtomicU64::new(last_tx_id + 1),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts a transaction. A writable transaction blocks until every other
    /// writable transaction has finished.
    pub fn begin(&self, writable: bool) -> Result<Tx<'_>, SpinelKvError> {
        if writable {
            let guard = self.writer_lock.lock();
            Ok(Tx::new(self, Some(guard)))
        } else {
            Ok(Tx::new(self, None))
        }
    }

    /// Runs `f` in a writable transaction, committing on `Ok` and rolling back on `Err`.
    pub fn update<T, F>(&self, f: F) -> Result<T, SpinelKvError>
    where
        F: FnOnce(&mut Tx<'_>) -> Result<T, SpinelKvError>,
    {
        let mut tx = self.begin(true)?;
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                let _ = tx.rollback();
                Err(e)
            }
        }
    }

    /// Runs `f` in a read-only transaction.
    pub fn view<T, F>(&self, f: F) -> Result<T, SpinelKvError>
    where
        F: FnOnce(&mut Tx<'_>) -> Result<T, SpinelKvError>,
    {
        let mut tx = self.begin(false)?;
        let result = f(&mut tx);
        let _ = tx.rollback();
        result
    }

    /// Forces buffered log data to stable storage.
    pub fn sync(&self) -> Result<(), SpinelKvError> {
        match self.log.lock().as_mut() {
            Some(writer) => writer.sync_to_disk(),
            None => Ok(()),
        }
    }

    /// Runs `f` against the committed structure of `bucket`.
    pub(crate) fn with_committed_list<R>(
        &self,
        bucket: &str,
        f: impl FnOnce(&ListStore) -> R,
    ) -> Option<R> {
        self.index.read().get_list(bucket).map(f)
    }

    /// Clones the committed structure of `bucket` for copy-on-write.
    pub(crate) fn snapshot_list(&self, bucket: &str) -> Option<ListStore> {
        self.index.read().get_list(bucket).cloned()
    }

    /// Makes a transaction durable and visible: the batch is appended to the log
    /// first, and the working copies are installed only once that succeeded.
    ///
    /// An error after the bytes reached the OS (a failed flush or fsync) leaves
    /// the outcome indeterminate: the batch is not visible now but may be replayed
    /// on the next open. The writer refuses every later append, so the log and
    /// the in-memory index cannot drift further apart before a reopen.
    pub(crate) fn commit_batch(
        &self,
        mut records: Vec<CommandRecord>,
        working: Vec<(String, ListStore)>,
    ) -> Result<u64, SpinelKvError> {
        let tx_id = self.next_tx_id.fetch_add(1, Ordering::SeqCst);
        super::transaction::seal_batch(&mut records, tx_id);

        let mut log = self.log.lock();
        if let Some(writer) = log.as_mut()
            && let Err(e) = writer.append(&records)
        {
            error!("Failed to append transaction {} to the command log: {}", tx_id, e);
            return Err(e);
        }
        drop(log);

        let mut index = self.index.write();
        for (bucket, store) in working {
            index.install(bucket, store);
        }
        Ok(tx_id)
    }
}
