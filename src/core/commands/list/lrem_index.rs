// src/core/commands/list/lrem_index.rs

//! Removal of elements by position.
//!
//! The index set is normalized (sorted, deduplicated) before anything else so the
//! logged payload is canonical. A precheck counts the positions that currently
//! address an element; only when that count is non-zero is a record staged. Both the
//! precheck and the apply run against the same working copy under the writer lock,
//! so the count returned to the caller is exactly what the record removes.

use crate::core::SpinelKvError;
use crate::core::commands::list::ListCommand;
use crate::core::database::Tx;
use bytes::Bytes;
use tracing::debug;

impl Tx<'_> {
    /// Removes the elements at `indexes`, which refer to positions before the call.
    /// Out-of-range and duplicate positions are ignored. Returns the number of
    /// elements removed.
    pub fn lrem_by_index(
        &mut self,
        bucket: &str,
        key: &[u8],
        indexes: &[i64],
    ) -> Result<usize, SpinelKvError> {
        self.validate_mutation(bucket, key)?;

        let mut indexes = indexes.to_vec();
        indexes.sort_unstable();
        indexes.dedup();

        let removable = self
            .with_list(bucket, |list| list.lrem_by_index_precheck(key, &indexes))
            .unwrap_or(Err(SpinelKvError::BucketNotFound))?;
        if removable == 0 {
            debug!("lrem_by_index on '{}': no index addresses an element.", bucket);
            return Ok(0);
        }

        let removed = self.stage_logged(
            bucket,
            ListCommand::LRemByIndex {
                key: Bytes::copy_from_slice(key),
                indexes,
            },
        )?;
        debug_assert_eq!(removed, removable);
        Ok(removable)
    }
}
