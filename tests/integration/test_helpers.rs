// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

use bytes::Bytes;
use spinelkv::config::{AppendFsync, Config};
use spinelkv::core::persistence::{
    CommandLogWriter, CommandRecord, MutationKind, RecordStatus,
};
use spinelkv::logging::init_test_logging;
use spinelkv::{Db, SpinelKvError};
use std::path::PathBuf;
use tempfile::TempDir;

/// TestContext owns a temporary directory holding the command log and a database
/// opened on it. The directory is removed when the context is dropped.
pub struct TestContext {
    pub db: Option<Db>,
    pub config: Config,
    /// Holds the log directory until the context is dropped.
    #[allow(dead_code)]
    pub dir: TempDir,
}

impl TestContext {
    /// Creates a new test context with a persistent database in a fresh directory.
    pub fn new() -> Self {
        Self::with_persistence(true)
    }

    /// Creates a context whose database never touches the disk.
    #[allow(dead_code)]
    pub fn in_memory() -> Self {
        Self::with_persistence(false)
    }

    fn with_persistence(enabled: bool) -> Self {
        init_test_logging("warn");
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut config = Config::default();
        config.persistence.enabled = enabled;
        config.persistence.log_path = dir
            .path()
            .join("commands.log")
            .to_string_lossy()
            .into_owned();
        config.persistence.appendfsync = AppendFsync::Always;
        let mut ctx = Self {
            db: None,
            config,
            dir,
        };
        ctx.reopen();
        ctx
    }

    pub fn db(&self) -> &Db {
        self.db.as_ref().expect("database is open")
    }

    /// Closes the database and opens it again, replaying the command log.
    pub fn reopen(&mut self) {
        self.db = None;
        self.db = Some(Db::open(self.config.clone()).expect("failed to open database"));
    }

    /// Closes the database so the log file can be manipulated directly.
    #[allow(dead_code)]
    pub fn close(&mut self) {
        self.db = None;
    }

    #[allow(dead_code)]
    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(&self.config.persistence.log_path)
    }

    /// Appends one committed transaction straight to the log, bypassing the
    /// transaction layer. Used to plant records with arbitrary timestamps.
    #[allow(dead_code)]
    pub fn write_raw_batch(&self, tx_id: u64, mut records: Vec<CommandRecord>) {
        let last = records.len() - 1;
        for (i, record) in records.iter_mut().enumerate() {
            record.tx_id = tx_id;
            record.status = if i == last {
                RecordStatus::Committed
            } else {
                RecordStatus::Uncommitted
            };
        }
        let mut writer =
            CommandLogWriter::open(&self.config.persistence).expect("failed to open log");
        writer.append(&records).expect("failed to append batch");
        writer.sync_to_disk().expect("failed to sync log");
    }

    /// RPUSHes `values` onto `key` in its own committed transaction.
    pub fn rpush(&self, bucket: &str, key: &str, values: &[&str]) -> Result<(), SpinelKvError> {
        let values = to_bytes(values);
        self.db().update(|tx| tx.rpush(bucket, key.as_bytes(), &values))
    }

    /// LPUSHes `values` onto `key` in its own committed transaction.
    #[allow(dead_code)]
    pub fn lpush(&self, bucket: &str, key: &str, values: &[&str]) -> Result<(), SpinelKvError> {
        let values = to_bytes(values);
        self.db().update(|tx| tx.lpush(bucket, key.as_bytes(), &values))
    }

    /// Reads the whole list in a read-only transaction.
    #[allow(dead_code)]
    pub fn lrange_all(&self, bucket: &str, key: &str) -> Result<Vec<Bytes>, SpinelKvError> {
        self.db().view(|tx| tx.lrange(bucket, key.as_bytes(), 0, -1))
    }
}

/// Builds an uncommitted list record for [`TestContext::write_raw_batch`].
#[allow(dead_code)]
pub fn raw_record(
    bucket: &str,
    key: &str,
    value: &[u8],
    kind: MutationKind,
    timestamp: u64,
) -> CommandRecord {
    CommandRecord::new(
        bucket,
        Bytes::copy_from_slice(key.as_bytes()),
        Bytes::copy_from_slice(value),
        kind,
        timestamp,
    )
}

#[allow(dead_code)]
pub fn to_bytes(values: &[&str]) -> Vec<Bytes> {
    values
        .iter()
        .map(|v| Bytes::copy_from_slice(v.as_bytes()))
        .collect()
}

/// Asserts that a range result holds exactly `expected`, in order.
#[allow(dead_code)]
pub fn assert_lrange_equals(actual: &[Bytes], expected: &[&str], context: &str) {
    let actual: Vec<String> = actual
        .iter()
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .collect();
    assert_eq!(actual, expected, "{context}: list contents differ");
}
