// src/core/commands/list/lrange.rs

use crate::core::SpinelKvError;
use crate::core::database::Tx;
use bytes::Bytes;

impl Tx<'_> {
    /// Returns the elements between `start` and `end`, both inclusive. Negative
    /// offsets count from the tail, so `lrange(b, k, 0, -1)` returns the whole list.
    ///
    /// # Errors
    ///
    /// `InvalidRange` when the offsets select nothing from a non-empty list.
    pub fn lrange(
        &mut self,
        bucket: &str,
        key: &[u8],
        start: i64,
        end: i64,
    ) -> Result<Vec<Bytes>, SpinelKvError> {
        self.validate_key(bucket, key)?;
        self.with_list(bucket, |list| list.range(key, start, end))
            .unwrap_or(Err(SpinelKvError::BucketNotFound))
    }
}
