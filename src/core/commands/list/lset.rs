// src/core/commands/list/lset.rs

use crate::core::SpinelKvError;
use crate::core::commands::list::ListCommand;
use crate::core::database::Tx;
use bytes::Bytes;

impl Tx<'_> {
    /// Replaces the element at `index`. Only non-negative indexes are accepted.
    pub fn lset(
        &mut self,
        bucket: &str,
        key: &[u8],
        index: i64,
        value: Bytes,
    ) -> Result<(), SpinelKvError> {
        self.validate_mutation(bucket, key)?;
        self.require_key(bucket, key)?;
        let size = self
            .with_list(bucket, |list| list.size(key))
            .unwrap_or(Err(SpinelKvError::BucketNotFound))?;
        if index < 0 || index as u64 >= size as u64 {
            return Err(SpinelKvError::IndexOutOfRange);
        }

        self.stage_logged(
            bucket,
            ListCommand::LSet {
                key: Bytes::copy_from_slice(key),
                index,
                value,
            },
        )?;
        Ok(())
    }
}
