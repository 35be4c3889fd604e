// src/core/commands/list/lkeys.rs

use crate::core::SpinelKvError;
use crate::core::commands::helpers::match_for_range;
use crate::core::database::Tx;
use crate::core::storage::now_unix;
use bytes::Bytes;
use tracing::debug;
use wildmatch::WildMatch;

impl Tx<'_> {
    /// Calls `f` with every key of `bucket` matching the glob `pattern` (`*` and `?`).
    /// Enumeration stops as soon as `f` returns `false`. Order is unspecified.
    ///
    /// Expired keys are skipped but not evicted.
    pub fn lkeys<F>(&mut self, bucket: &str, pattern: &str, mut f: F) -> Result<(), SpinelKvError>
    where
        F: FnMut(&Bytes) -> bool,
    {
        self.validate_bucket(bucket)?;
        let now = now_unix();
        // Collected first so `f` runs without the registry lock held.
        let keys: Vec<Bytes> = self
            .with_list(bucket, |list| {
                list.keys()
                    .filter(|key| {
                        let expired = list.is_expired(key, now);
                        if expired {
                            debug!("lkeys: skipping expired key in bucket '{}'.", bucket);
                        }
                        !expired
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let matcher = WildMatch::new(pattern);
        for key in &keys {
            if match_for_range(&matcher, key, &mut f) {
                break;
            }
        }
        Ok(())
    }
}
