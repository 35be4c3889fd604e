// src/core/commands/list/rpop.rs

use crate::core::SpinelKvError;
use crate::core::commands::list::logic::{PopDirection, list_peek_logic, list_pop_logic};
use crate::core::database::Tx;
use bytes::Bytes;

impl Tx<'_> {
    /// Removes and returns the tail element.
    pub fn rpop(&mut self, bucket: &str, key: &[u8]) -> Result<Bytes, SpinelKvError> {
        list_pop_logic(self, bucket, key, PopDirection::Right)
    }

    pub fn rpeek(&mut self, bucket: &str, key: &[u8]) -> Result<Bytes, SpinelKvError> {
        list_peek_logic(self, bucket, key, PopDirection::Right)
    }
}
