// src/core/commands/list/expire.rs

//! TTL commands and the lazy expiration gate.

use crate::core::SpinelKvError;
use crate::core::commands::list::ListCommand;
use crate::core::database::Tx;
use crate::core::storage::{TtlEntry, now_unix};
use bytes::Bytes;
use tracing::{debug, warn};

impl Tx<'_> {
    /// Sets a TTL of `ttl` seconds on `key`; `0` makes it persistent.
    ///
    /// The TTL table is updated through the immediate write path, and an `Expire`
    /// record stamped with the same time is staged so replay rebuilds the identical
    /// entry.
    pub fn expire_list(&mut self, bucket: &str, key: &[u8], ttl: u32) -> Result<(), SpinelKvError> {
        self.check_writable()?;
        self.validate_bucket(bucket)?;

        let now = now_unix();
        let key = Bytes::copy_from_slice(key);
        self.apply_immediate(bucket, |list| {
            list.set_ttl(key.clone(), TtlEntry::new(ttl, now))
        })?;
        self.stage_logged_at(bucket, ListCommand::Expire { key, ttl }, now)?;
        Ok(())
    }

    /// The expiration gate. Returns whether `key` has expired.
    ///
    /// In a writable transaction an expired key is evicted by staging a `Delete`
    /// tombstone, so the eviction survives a restart. A read-only transaction only
    /// reports it. An already evicted key has no TTL entry and reports `false`.
    pub fn check_expire(&mut self, bucket: &str, key: &[u8]) -> Result<bool, SpinelKvError> {
        self.check_tx_is_closed()?;
        let now = now_unix();
        let expired = self
            .with_list(bucket, |list| list.is_expired(key, now))
            .unwrap_or(false);
        if !expired {
            return Ok(false);
        }

        if self.is_writable() {
            let tombstone = ListCommand::Delete {
                key: Bytes::copy_from_slice(key),
            };
            match self.stage_logged_at(bucket, tombstone, now) {
                Ok(_) => debug!("Staged tombstone for expired key in bucket '{}'.", bucket),
                Err(e) => warn!("Failed to stage tombstone in bucket '{}': {}", bucket, e),
            }
        }
        Ok(true)
    }

    /// Returns the remaining TTL of `key` in seconds, or `0` if it is persistent.
    pub fn get_list_ttl(&mut self, bucket: &str, key: &[u8]) -> Result<u32, SpinelKvError> {
        self.validate_bucket(bucket)?;
        let now = now_unix();
        self.with_list(bucket, |list| list.get_list_ttl(key, now))
            .unwrap_or(Err(SpinelKvError::BucketNotFound))
    }

    /// Returns the raw TTL entry of `key`, if one is set.
    pub fn list_ttl_entry(&mut self, bucket: &str, key: &[u8]) -> Result<Option<TtlEntry>, SpinelKvError> {
        self.validate_bucket(bucket)?;
        Ok(self
            .with_list(bucket, |list| list.ttl_entry(key))
            .flatten())
    }
}
