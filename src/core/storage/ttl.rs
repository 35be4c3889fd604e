// src/core/storage/ttl.rs

//! Per-key time-to-live bookkeeping for lazily expired lists.

use std::time::{SystemTime, UNIX_EPOCH};

/// The TTL value meaning "never expires".
pub const PERSISTENT: u32 = 0;

/// A TTL entry as stored in a bucket's TTL table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlEntry {
    pub ttl_secs: u32,
    /// Unix seconds at which the TTL was set.
    pub set_at: u64,
}

impl TtlEntry {
    pub fn new(ttl_secs: u32, set_at: u64) -> Self {
        Self { ttl_secs, set_at }
    }

    pub fn is_persistent(&self) -> bool {
        self.ttl_secs == PERSISTENT
    }

    /// A key is expired once strictly more than `ttl_secs` seconds have passed since `set_at`.
    pub fn is_expired(&self, now: u64) -> bool {
        !self.is_persistent() && now.saturating_sub(self.set_at) > self.ttl_secs as u64
    }

    /// Seconds left before expiry, or `0` for persistent entries.
    pub fn remaining(&self, now: u64) -> u32 {
        if self.is_persistent() {
            return 0;
        }
        let deadline = self.set_at.saturating_add(self.ttl_secs as u64);
        deadline.saturating_sub(now).min(u32::MAX as u64) as u32
    }
}

/// Returns the current wall-clock time in Unix seconds.
pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
