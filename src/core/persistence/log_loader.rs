// src/core/persistence/log_loader.rs

//! Implements the logic for replaying the command log into memory when the
//! engine opens.

use super::record::{CommandRecord, RecordCodec};
use crate::config::PersistenceConfig;
use crate::core::SpinelKvError;
use crate::core::storage::Index;
use bytes::BytesMut;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, info, warn};

const READ_CHUNK_SIZE: usize = 8192;

/// The committed content of a command log, in commit order.
#[derive(Debug, Default)]
pub struct LoadedLog {
    /// Committed records, grouped per transaction, in commit order.
    pub transactions: Vec<Vec<CommandRecord>>,
    /// The highest transaction id seen, committed or not.
    pub last_tx_id: u64,
    /// Byte length of the log up to and including the last committed record.
    pub committed_len: u64,
    /// Total size of the file as read.
    pub file_len: u64,
}

impl LoadedLog {
    pub fn record_count(&self) -> usize {
        self.transactions.iter().map(Vec::len).sum()
    }

    /// Iterates over every committed record in replay order.
    pub fn records(&self) -> impl Iterator<Item = &CommandRecord> {
        self.transactions.iter().flatten()
    }
}

/// Summary returned by [`CommandLogLoader::load_into`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub transactions: usize,
    pub records: usize,
    pub last_tx_id: u64,
}

/// `CommandLogLoader` reads the command log and replays committed transactions
/// to reconstruct the in-memory index.
pub struct CommandLogLoader {
    config: PersistenceConfig,
}

impl CommandLogLoader {
    pub fn new(config: PersistenceConfig) -> Self {
        Self { config }
    }

    /// Reads the log file and returns its committed transactions.
    ///
    /// The file is decoded in chunks. Records are buffered per transaction id and a
    /// transaction is released only when its `Committed` record is read, so a batch
    /// torn by a crash is never partially applied.
    pub fn read(&self) -> Result<LoadedLog, SpinelKvError> {
        let path = Path::new(&self.config.log_path);
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "Command log not found at '{}', starting with an empty state.",
                    self.config.log_path
                );
                return Ok(LoadedLog::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut codec = RecordCodec;
        let mut buffer = BytesMut::with_capacity(READ_CHUNK_SIZE);
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let mut pending: BTreeMap<u64, Vec<CommandRecord>> = BTreeMap::new();
        let mut loaded = LoadedLog::default();
        let mut consumed: u64 = 0;

        loop {
            let n = file.read(&mut chunk)?;
            if n == 0 {
                if !buffer.is_empty() {
                    warn!(
                        "Command log has {} bytes of trailing, incomplete data. Ignoring.",
                        buffer.len()
                    );
                }
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);
            loaded.file_len += n as u64;

            loop {
                let before = buffer.len();
                let Some(record) = codec.decode(&mut buffer)? else {
                    break;
                };
                consumed += (before - buffer.len()) as u64;
                loaded.last_tx_id = loaded.last_tx_id.max(record.tx_id);

                let committed = record.is_committed();
                let tx_id = record.tx_id;
                pending.entry(tx_id).or_default().push(record);
                if committed && let Some(batch) = pending.remove(&tx_id) {
                    debug!("Loaded committed transaction {} ({} records).", tx_id, batch.len());
                    loaded.transactions.push(batch);
                    loaded.committed_len = consumed;
                }
            }
        }

        for (tx_id, batch) in &pending {
            warn!(
                "Dropping {} records of transaction {} that never committed.",
                batch.len(),
                tx_id
            );
        }
        Ok(loaded)
    }

    /// Replays every committed record into `index` and cuts any uncommitted or
    /// torn tail off the file so that later appends start on a frame boundary.
    pub fn load_into(&self, index: &mut Index) -> Result<ReplayStats, SpinelKvError> {
        info!("Loading data from command log: {}", self.config.log_path);
        let loaded = self.read()?;

        for record in loaded.records() {
            index.apply_record(record)?;
        }

        if loaded.committed_len < loaded.file_len {
            warn!(
                "Truncating command log from {} to {} bytes to drop an uncommitted tail.",
                loaded.file_len, loaded.committed_len
            );
            let file = OpenOptions::new().write(true).open(&self.config.log_path)?;
            file.set_len(loaded.committed_len)?;
            file.sync_all()?;
        }

        let stats = ReplayStats {
            transactions: loaded.transactions.len(),
            records: loaded.record_count(),
            last_tx_id: loaded.last_tx_id,
        };
        info!(
            "Command log loaded: {} transactions, {} records.",
            stats.transactions, stats.records
        );
        Ok(stats)
    }
}
