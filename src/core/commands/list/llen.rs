// src/core/commands/list/llen.rs

use crate::core::SpinelKvError;
use crate::core::database::Tx;

impl Tx<'_> {
    /// Returns the number of elements in the list. A list emptied by pops still
    /// exists and reports `0`.
    pub fn lsize(&mut self, bucket: &str, key: &[u8]) -> Result<usize, SpinelKvError> {
        self.validate_key(bucket, key)?;
        self.with_list(bucket, |list| list.size(key))
            .unwrap_or(Err(SpinelKvError::BucketNotFound))
    }
}
