// src/core/commands/list/lpop.rs

use crate::core::SpinelKvError;
use crate::core::commands::list::logic::{PopDirection, list_peek_logic, list_pop_logic};
use crate::core::database::Tx;
use bytes::Bytes;

impl Tx<'_> {
    /// Removes and returns the head element.
    pub fn lpop(&mut self, bucket: &str, key: &[u8]) -> Result<Bytes, SpinelKvError> {
        list_pop_logic(self, bucket, key, PopDirection::Left)
    }

    /// Returns the head element without removing it.
    pub fn lpeek(&mut self, bucket: &str, key: &[u8]) -> Result<Bytes, SpinelKvError> {
        list_peek_logic(self, bucket, key, PopDirection::Left)
    }
}
