// src/core/storage/list.rs

//! The per-bucket list container: element storage, the list algorithms and the
//! TTL table. Every durable mutation reaches a `ListStore` through [`ListStore::apply`],
//! both inside a live transaction and when the command log is replayed.

use super::range::resolve_range;
use super::ttl::TtlEntry;
use crate::core::SpinelKvError;
use crate::core::commands::list::ListCommand;
use bytes::Bytes;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// All lists of a single bucket, together with their TTL entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListStore {
    items: HashMap<Bytes, VecDeque<Bytes>>,
    ttl: HashMap<Bytes, TtlEntry>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of keys registered in this store, expired or not.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.items.contains_key(key)
    }

    /// Iterates over every registered key, including keys not yet lazily evicted.
    pub fn keys(&self) -> impl Iterator<Item = &Bytes> {
        self.items.keys()
    }

    fn list(&self, key: &[u8]) -> Result<&VecDeque<Bytes>, SpinelKvError> {
        self.items.get(key).ok_or(SpinelKvError::KeyNotFound)
    }

    fn list_mut(&mut self, key: &[u8]) -> Result<&mut VecDeque<Bytes>, SpinelKvError> {
        self.items.get_mut(key).ok_or(SpinelKvError::KeyNotFound)
    }

    /// Inserts `value` at the head and returns the new length.
    pub fn lpush(&mut self, key: Bytes, value: Bytes) -> usize {
        let list = self.items.entry(key).or_default();
        list.push_front(value);
        list.len()
    }

    /// Inserts `value` at the tail and returns the new length.
    pub fn rpush(&mut self, key: Bytes, value: Bytes) -> usize {
        let list = self.items.entry(key).or_default();
        list.push_back(value);
        list.len()
    }

    pub fn lpeek(&self, key: &[u8]) -> Result<Bytes, SpinelKvError> {
        self.list(key)?
            .front()
            .cloned()
            .ok_or(SpinelKvError::EmptyList)
    }

    pub fn rpeek(&self, key: &[u8]) -> Result<Bytes, SpinelKvError> {
        self.list(key)?
            .back()
            .cloned()
            .ok_or(SpinelKvError::EmptyList)
    }

    pub fn lpop(&mut self, key: &[u8]) -> Result<Bytes, SpinelKvError> {
        self.list_mut(key)?
            .pop_front()
            .ok_or(SpinelKvError::EmptyList)
    }

    pub fn rpop(&mut self, key: &[u8]) -> Result<Bytes, SpinelKvError> {
        self.list_mut(key)?
            .pop_back()
            .ok_or(SpinelKvError::EmptyList)
    }

    pub fn size(&self, key: &[u8]) -> Result<usize, SpinelKvError> {
        Ok(self.list(key)?.len())
    }

    /// Returns the elements between `start` and `end` inclusive. Both offsets may be
    /// negative to count from the tail. An empty list yields an empty range.
    pub fn range(&self, key: &[u8], start: i64, end: i64) -> Result<Vec<Bytes>, SpinelKvError> {
        let list = self.list(key)?;
        if list.is_empty() {
            return Ok(Vec::new());
        }
        let (start, end) = resolve_range(start, end, list.len())?;
        Ok(list
            .iter()
            .skip(start)
            .take(end - start + 1)
            .cloned()
            .collect())
    }

    /// Counts how many elements `lrem` would remove, without mutating the list.
    pub fn lrem_num(&self, key: &[u8], count: i64, value: &[u8]) -> Result<usize, SpinelKvError> {
        let matches = self.list(key)?.iter().filter(|v| v.as_ref() == value).count();
        if count == 0 {
            Ok(matches)
        } else {
            Ok(matches.min(count.unsigned_abs() as usize))
        }
    }

    /// Removes occurrences of `value`.
    /// - `count > 0`: remove up to `count` matches moving from head to tail.
    /// - `count < 0`: remove up to `|count|` matches moving from tail to head.
    /// - `count = 0`: remove all matches.
    pub fn lrem(&mut self, key: &[u8], count: i64, value: &[u8]) -> Result<usize, SpinelKvError> {
        let list = self.list_mut(key)?;
        let original_len = list.len();

        if count >= 0 {
            let limit = if count == 0 { usize::MAX } else { count as usize };
            let mut removed = 0;
            list.retain(|v| {
                if removed < limit && v.as_ref() == value {
                    removed += 1;
                    false
                } else {
                    true
                }
            });
        } else {
            let limit = count.unsigned_abs() as usize;
            let mut removed = 0;
            let mut kept = VecDeque::with_capacity(list.len());
            for item in list.iter().rev() {
                if removed < limit && item.as_ref() == value {
                    removed += 1;
                } else {
                    kept.push_front(item.clone());
                }
            }
            *list = kept;
        }

        Ok(original_len - list.len())
    }

    pub fn lset(&mut self, key: &[u8], index: i64, value: Bytes) -> Result<(), SpinelKvError> {
        let list = self.list_mut(key)?;
        if index < 0 || index as usize >= list.len() {
            return Err(SpinelKvError::IndexOutOfRange);
        }
        list[index as usize] = value;
        Ok(())
    }

    /// Keeps only the elements in `[start, end]`. A range that selects nothing empties the list.
    pub fn ltrim(&mut self, key: &[u8], start: i64, end: i64) -> Result<(), SpinelKvError> {
        let list = self.list_mut(key)?;
        match resolve_range(start, end, list.len()) {
            Ok((start, end)) => {
                list.truncate(end + 1);
                list.drain(..start);
            }
            Err(_) => list.clear(),
        }
        Ok(())
    }

    /// Counts the distinct positions in `indexes` that currently address an element.
    pub fn lrem_by_index_precheck(
        &self,
        key: &[u8],
        indexes: &[i64],
    ) -> Result<usize, SpinelKvError> {
        let len = self.list(key)?.len() as i64;
        Ok(indexes
            .iter()
            .filter(|&&i| (0..len).contains(&i))
            .collect::<BTreeSet<_>>()
            .len())
    }

    /// Removes the elements at the given positions. Positions refer to the list as it
    /// was before the call; invalid positions are ignored.
    pub fn lrem_by_index(&mut self, key: &[u8], indexes: &[i64]) -> Result<usize, SpinelKvError> {
        let doomed: BTreeSet<i64> = indexes.iter().copied().collect();
        let list = self.list_mut(key)?;
        let original_len = list.len();
        let mut position = 0i64;
        list.retain(|_| {
            let keep = !doomed.contains(&position);
            position += 1;
            keep
        });
        Ok(original_len - list.len())
    }

    /// Reports whether `key` carries a TTL that has run out at `now`. Does not evict.
    pub fn is_expired(&self, key: &[u8], now: u64) -> bool {
        self.ttl.get(key).is_some_and(|entry| entry.is_expired(now))
    }

    /// Drops a key together with its TTL entry. Returns whether anything was removed.
    pub fn evict(&mut self, key: &[u8]) -> bool {
        let had_items = self.items.remove(key).is_some();
        let had_ttl = self.ttl.remove(key).is_some();
        had_items || had_ttl
    }

    pub fn set_ttl(&mut self, key: Bytes, entry: TtlEntry) {
        self.ttl.insert(key, entry);
    }

    pub fn ttl_entry(&self, key: &[u8]) -> Option<TtlEntry> {
        self.ttl.get(key).copied()
    }

    /// Returns the remaining TTL in seconds, or `0` for a persistent key.
    pub fn get_list_ttl(&self, key: &[u8], now: u64) -> Result<u32, SpinelKvError> {
        match self.ttl.get(key) {
            Some(entry) if entry.is_expired(now) => Err(SpinelKvError::KeyNotFound),
            Some(entry) => Ok(entry.remaining(now)),
            None if self.items.contains_key(key) => Ok(0),
            None => Err(SpinelKvError::KeyNotFound),
        }
    }

    /// Applies a decoded command record. This is the single code path through which
    /// logged list mutations take effect, whether live or during replay.
    ///
    /// Returns the number of elements (or keys, for `Delete`) affected.
    pub fn apply(&mut self, command: &ListCommand, timestamp: u64) -> Result<usize, SpinelKvError> {
        match command {
            ListCommand::LPush { key, value } => {
                self.lpush(key.clone(), value.clone());
                Ok(1)
            }
            ListCommand::RPush { key, value } => {
                self.rpush(key.clone(), value.clone());
                Ok(1)
            }
            ListCommand::LPop { key, .. } => self.lpop(key).map(|_| 1),
            ListCommand::RPop { key, .. } => self.rpop(key).map(|_| 1),
            ListCommand::LRem { key, count, value } => self.lrem(key, *count, value),
            ListCommand::LSet { key, index, value } => {
                self.lset(key, *index, value.clone()).map(|_| 1)
            }
            ListCommand::LTrim { key, start, end } => self.ltrim(key, *start, *end).map(|_| 1),
            ListCommand::LRemByIndex { key, indexes } => self.lrem_by_index(key, indexes),
            ListCommand::Expire { key, ttl } => {
                self.set_ttl(key.clone(), TtlEntry::new(*ttl, timestamp));
                Ok(1)
            }
            // Tombstones for keys that are already gone are expected and harmless.
            ListCommand::Delete { key } => Ok(usize::from(self.evict(key))),
        }
    }
}
