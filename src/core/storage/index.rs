// src/core/storage/index.rs

//! The per-bucket structure registry. It owns every bucket's `ListStore`; the
//! transaction layer only reaches a store through the accessors below.

use super::list::ListStore;
use crate::core::SpinelKvError;
use crate::core::commands::list::ListCommand;
use crate::core::persistence::CommandRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Index {
    lists: HashMap<String, ListStore>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the list structure of `bucket`, if any list record was ever applied to it.
    pub fn get_list(&self, bucket: &str) -> Option<&ListStore> {
        self.lists.get(bucket)
    }

    pub fn get_list_mut(&mut self, bucket: &str) -> Option<&mut ListStore> {
        self.lists.get_mut(bucket)
    }

    pub fn get_or_create_list(&mut self, bucket: &str) -> &mut ListStore {
        self.lists.entry(bucket.to_string()).or_default()
    }

    /// Replaces a bucket's structure wholesale with a transaction's working copy.
    pub fn install(&mut self, bucket: String, store: ListStore) {
        self.lists.insert(bucket, store);
    }

    pub fn bucket_count(&self) -> usize {
        self.lists.len()
    }

    /// Decodes a committed record and applies it to its bucket, creating the bucket
    /// on first use.
    pub fn apply_record(&mut self, record: &CommandRecord) -> Result<usize, SpinelKvError> {
        let command = ListCommand::from_record(record)?;
        self.get_or_create_list(&record.bucket)
            .apply(&command, record.timestamp)
    }
}
