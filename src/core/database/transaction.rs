// src/core/database/transaction.rs

//! The transaction handle through which every list operation runs.
//!
//! A writable transaction holds the database writer lock for its whole life and
//! works on private copies of the buckets it touches. Changes reach those copies
//! through two write paths:
//!
//! - **logged** ([`Tx::stage_logged`]): the command is encoded into a record, appended
//!   to the pending batch, and applied to the working copy with the same function
//!   replay uses. This is how every list mutation takes effect.
//! - **immediate** ([`Tx::apply_immediate`]): a direct edit of the working copy with no
//!   record of its own. Used for the TTL table, whose durable counterpart is an
//!   `Expire` record staged right after.
//!
//! Nothing leaves the transaction before commit. Commit appends the batch to the log
//! and only then installs the working copies, so the shared index never runs ahead
//! of the log. Rollback discards both.

use super::core::Db;
use crate::core::SpinelKvError;
use crate::core::commands::list::ListCommand;
use crate::core::persistence::{CommandRecord, RecordStatus};
use crate::core::storage::{ListStore, now_unix};
use parking_lot::MutexGuard;
use std::collections::HashMap;
use tracing::{debug, info};

pub struct Tx<'db> {
    db: &'db Db,
    /// `Some` for writable transactions.
    writer: Option<MutexGuard<'db, ()>>,
    closed: bool,
    pending: Vec<CommandRecord>,
    working: HashMap<String, ListStore>,
}

impl<'db> Tx<'db> {
    pub(crate) fn new(db: &'db Db, writer: Option<MutexGuard<'db, ()>>) -> Self {
        Self {
            db,
            writer,
            closed: false,
            pending: Vec::new(),
            working: HashMap::new(),
        }
    }

    pub fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Records staged so far, in program order.
    pub fn pending_records(&self) -> &[CommandRecord] {
        &self.pending
    }

    pub(crate) fn check_tx_is_closed(&self) -> Result<(), SpinelKvError> {
        if self.closed {
            return Err(SpinelKvError::TransactionClosed);
        }
        Ok(())
    }

    pub(crate) fn check_writable(&self) -> Result<(), SpinelKvError> {
        self.check_tx_is_closed()?;
        if !self.is_writable() {
            return Err(SpinelKvError::TransactionNotWritable);
        }
        Ok(())
    }

    /// Runs `f` against the structure of `bucket` as this transaction sees it: its own
    /// working copy if it has written to the bucket, the committed one otherwise.
    pub(crate) fn with_list<R>(&self, bucket: &str, f: impl FnOnce(&ListStore) -> R) -> Option<R> {
        match self.working.get(bucket) {
            Some(store) => Some(f(store)),
            None => self.db.with_committed_list(bucket, f),
        }
    }

    pub(crate) fn has_bucket(&self, bucket: &str) -> bool {
        self.with_list(bucket, |_| ()).is_some()
    }

    fn working_list(&mut self, bucket: &str) -> &mut ListStore {
        let db = self.db;
        self.working
            .entry(bucket.to_string())
            .or_insert_with(|| db.snapshot_list(bucket).unwrap_or_default())
    }

    /// The immediate write path: edits the working copy directly, logging nothing.
    pub(crate) fn apply_immediate<R>(
        &mut self,
        bucket: &str,
        f: impl FnOnce(&mut ListStore) -> R,
    ) -> Result<R, SpinelKvError> {
        self.check_writable()?;
        Ok(f(self.working_list(bucket)))
    }

    /// The logged write path, stamped with the current time.
    pub(crate) fn stage_logged(
        &mut self,
        bucket: &str,
        command: ListCommand,
    ) -> Result<usize, SpinelKvError> {
        self.stage_logged_at(bucket, command, now_unix())
    }

    /// Encodes `command`, applies it to the working copy and appends its record to the
    /// pending batch. Encoding and applying both happen before the record is kept, so
    /// a failure leaves the batch untouched.
    ///
    /// Returns the count reported by [`ListStore::apply`].
    pub(crate) fn stage_logged_at(
        &mut self,
        bucket: &str,
        command: ListCommand,
        timestamp: u64,
    ) -> Result<usize, SpinelKvError> {
        self.check_writable()?;
        let record = command.to_record(bucket, timestamp)?;
        let affected = self.working_list(bucket).apply(&command, timestamp)?;
        debug!(
            "Staged {} on bucket '{}' ({} affected).",
            record.kind.name(),
            bucket,
            affected
        );
        self.pending.push(record);
        Ok(affected)
    }

    /// Makes every staged record durable, then publishes the working copies.
    ///
    /// The transaction is closed afterwards whether or not the commit succeeded.
    pub fn commit(&mut self) -> Result<(), SpinelKvError> {
        self.check_tx_is_closed()?;
        self.closed = true;

        let records = std::mem::take(&mut self.pending);
        let working = std::mem::take(&mut self.working);
        let result = if records.is_empty() {
            Ok(())
        } else {
            let count = records.len();
            match self.db.commit_batch(records, working.into_iter().collect()) {
                Ok(tx_id) => {
                    info!("Committed transaction {} with {} records.", tx_id, count);
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };
        self.writer = None;
        result
    }

    /// Discards staged records and working copies.
    pub fn rollback(&mut self) -> Result<(), SpinelKvError> {
        self.check_tx_is_closed()?;
        self.closed = true;
        if !self.pending.is_empty() {
            debug!("Rolled back {} staged records.", self.pending.len());
        }
        self.pending.clear();
        self.working.clear();
        self.writer = None;
        Ok(())
    }
}

impl Drop for Tx<'_> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.rollback();
        }
    }
}

/// Stamps a commit batch with its transaction id and marks its last record as the
/// commit point.
pub(crate) fn seal_batch(records: &mut [CommandRecord], tx_id: u64) {
    let last = records.len().saturating_sub(1);
    for (i, record) in records.iter_mut().enumerate() {
        record.tx_id = tx_id;
        record.status = if i == last {
            RecordStatus::Committed
        } else {
            RecordStatus::Uncommitted
        };
    }
}
