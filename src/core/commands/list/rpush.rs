// src/core/commands/list/rpush.rs

use crate::core::SpinelKvError;
use crate::core::commands::list::logic::{PushDirection, list_push_logic};
use crate::core::database::Tx;
use bytes::Bytes;

impl Tx<'_> {
    /// Appends each of `values` to the tail of the list, in order.
    ///
    /// See [`Tx::lpush`] for the bucket creation and partial-failure rules.
    pub fn rpush(&mut self, bucket: &str, key: &[u8], values: &[Bytes]) -> Result<(), SpinelKvError> {
        list_push_logic(self, bucket, key, values, PushDirection::Right)
    }
}
