// src/core/commands/list/validate.rs

//! Precondition checks shared by every list command. All of them run before
//! anything is staged, so a failed check leaves the transaction untouched.

use super::SEPARATOR_FOR_LIST_KEY;
use crate::core::SpinelKvError;
use crate::core::database::Tx;

/// Reports whether `key` contains the reserved separator.
pub fn contains_separator(key: &[u8]) -> bool {
    key.contains(&SEPARATOR_FOR_LIST_KEY)
}

impl Tx<'_> {
    /// The transaction is open and `bucket` holds a list structure.
    pub(crate) fn validate_bucket(&self, bucket: &str) -> Result<(), SpinelKvError> {
        self.check_tx_is_closed()?;
        if !self.has_bucket(bucket) {
            return Err(SpinelKvError::BucketNotFound);
        }
        Ok(())
    }

    /// [`Tx::validate_bucket`] plus the expiration gate for `key`.
    pub(crate) fn validate_key(&mut self, bucket: &str, key: &[u8]) -> Result<(), SpinelKvError> {
        self.validate_bucket(bucket)?;
        if self.check_expire(bucket, key)? {
            return Err(SpinelKvError::KeyNotFound);
        }
        Ok(())
    }

    /// [`Tx::validate_key`] for commands that stage records.
    pub(crate) fn validate_mutation(
        &mut self,
        bucket: &str,
        key: &[u8],
    ) -> Result<(), SpinelKvError> {
        self.check_writable()?;
        self.validate_key(bucket, key)
    }

    /// Request-level checks for pushes, run once before any value is looked at. The
    /// bucket is not required to exist yet; the first push creates it.
    pub(crate) fn validate_push(&self, key: &[u8]) -> Result<(), SpinelKvError> {
        self.check_writable()?;
        if contains_separator(key) {
            return Err(SpinelKvError::SeparatorViolation);
        }
        Ok(())
    }

    /// Per-value check for pushes: the key must not have expired since the
    /// previous value was staged.
    pub(crate) fn validate_push_value(
        &mut self,
        bucket: &str,
        key: &[u8],
    ) -> Result<(), SpinelKvError> {
        if self.check_expire(bucket, key)? {
            return Err(SpinelKvError::KeyNotFound);
        }
        Ok(())
    }

    /// `key` is currently registered in `bucket`.
    pub(crate) fn require_key(&self, bucket: &str, key: &[u8]) -> Result<(), SpinelKvError> {
        match self.with_list(bucket, |list| list.contains_key(key)) {
            Some(true) => Ok(()),
            Some(false) => Err(SpinelKvError::KeyNotFound),
            None => Err(SpinelKvError::BucketNotFound),
        }
    }
}
