// src/core/commands/list/ltrim.rs

use crate::core::SpinelKvError;
use crate::core::commands::list::ListCommand;
use crate::core::database::Tx;
use bytes::Bytes;

impl Tx<'_> {
    /// Keeps only the elements between `start` and `end` inclusive.
    ///
    /// The offsets must describe a valid range for [`Tx::lrange`]; otherwise the call
    /// fails with the same error and nothing is staged.
    pub fn ltrim(&mut self, bucket: &str, key: &[u8], start: i64, end: i64) -> Result<(), SpinelKvError> {
        self.validate_mutation(bucket, key)?;
        self.require_key(bucket, key)?;
        self.lrange(bucket, key, start, end)?;

        self.stage_logged(
            bucket,
            ListCommand::LTrim {
                key: Bytes::copy_from_slice(key),
                start,
                end,
            },
        )?;
        Ok(())
    }
}
