// src/core/commands/list/lrem.rs

use crate::core::SpinelKvError;
use crate::core::commands::list::ListCommand;
use crate::core::database::Tx;
use bytes::Bytes;

impl Tx<'_> {
    /// Removes occurrences of `value` and returns how many were removed.
    ///
    /// - `count > 0`: the first `count` matches, head to tail.
    /// - `count < 0`: the first `|count|` matches, tail to head.
    /// - `count = 0`: every match.
    ///
    /// # Errors
    ///
    /// `CountOutOfRange` when `|count|` exceeds the list length.
    pub fn lrem(
        &mut self,
        bucket: &str,
        key: &[u8],
        count: i64,
        value: &[u8],
    ) -> Result<usize, SpinelKvError> {
        self.validate_mutation(bucket, key)?;
        let size = self
            .with_list(bucket, |list| list.size(key))
            .unwrap_or(Err(SpinelKvError::BucketNotFound))?;
        if count.unsigned_abs() > size as u64 {
            return Err(SpinelKvError::CountOutOfRange);
        }

        self.stage_logged(
            bucket,
            ListCommand::LRem {
                key: Bytes::copy_from_slice(key),
                count,
                value: Bytes::copy_from_slice(value),
            },
        )
    }
}
