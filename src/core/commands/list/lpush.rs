// src/core/commands/list/lpush.rs

use crate::core::SpinelKvError;
use crate::core::commands::list::logic::{PushDirection, list_push_logic};
use crate::core::database::Tx;
use bytes::Bytes;

impl Tx<'_> {
    /// Inserts each of `values` at the head of the list, in order, so the last value
    /// ends up first. Creates the bucket and the list when they do not exist yet.
    ///
    /// Values are staged one at a time; if one fails, the ones before it stay staged.
    pub fn lpush(&mut self, bucket: &str, key: &[u8], values: &[Bytes]) -> Result<(), SpinelKvError> {
        list_push_logic(self, bucket, key, values, PushDirection::Left)
    }
}
