// src/core/commands/list/command.rs

//! The typed list command and its mapping onto the generic command record.
//!
//! The log only knows `(bucket, key, value, flag)` records, so parameters that do not
//! fit that shape are folded into composite keys or values around
//! [`SEPARATOR_FOR_LIST_KEY`]:
//!
//! | kind          | key              | value                 |
//! |---------------|------------------|-----------------------|
//! | `LRem`        | key              | `<count>\|<element>`  |
//! | `LSet`        | `<key>\|<index>` | element               |
//! | `LTrim`       | `<key>\|<start>` | `<end>`               |
//! | `LRemByIndex` | key              | bincode `Vec<i64>`    |
//! | `Expire`      | key              | `<ttl>`               |
//! | `Delete`      | key              | empty                 |
//!
//! Every other kind carries the key and a single element unchanged. Composite keys
//! are split on the last separator, composite values on the first one.

use super::SEPARATOR_FOR_LIST_KEY;
use crate::core::SpinelKvError;
use crate::core::commands::helpers::{
    int_to_bytes, join_with_int, marshal_ints, parse_int, unmarshal_ints,
};
use crate::core::persistence::{CommandRecord, MutationKind};
use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    LPush { key: Bytes, value: Bytes },
    RPush { key: Bytes, value: Bytes },
    /// `value` is the element that was at the head when the pop was issued.
    LPop { key: Bytes, value: Bytes },
    RPop { key: Bytes, value: Bytes },
    LRem { key: Bytes, count: i64, value: Bytes },
    LSet { key: Bytes, index: i64, value: Bytes },
    LTrim { key: Bytes, start: i64, end: i64 },
    /// `indexes` is sorted ascending and free of duplicates.
    LRemByIndex { key: Bytes, indexes: Vec<i64> },
    Expire { key: Bytes, ttl: u32 },
    Delete { key: Bytes },
}

impl ListCommand {
    pub fn key(&self) -> &Bytes {
        match self {
            ListCommand::LPush { key, .. }
            | ListCommand::RPush { key, .. }
            | ListCommand::LPop { key, .. }
            | ListCommand::RPop { key, .. }
            | ListCommand::LRem { key, .. }
            | ListCommand::LSet { key, .. }
            | ListCommand::LTrim { key, .. }
            | ListCommand::LRemByIndex { key, .. }
            | ListCommand::Expire { key, .. }
            | ListCommand::Delete { key } => key,
        }
    }

    pub fn kind(&self) -> MutationKind {
        match self {
            ListCommand::LPush { .. } => MutationKind::LPush,
            ListCommand::RPush { .. } => MutationKind::RPush,
            ListCommand::LPop { .. } => MutationKind::LPop,
            ListCommand::RPop { .. } => MutationKind::RPop,
            ListCommand::LRem { .. } => MutationKind::LRem,
            ListCommand::LSet { .. } => MutationKind::LSet,
            ListCommand::LTrim { .. } => MutationKind::LTrim,
            ListCommand::LRemByIndex { .. } => MutationKind::LRemByIndex,
            ListCommand::Expire { .. } => MutationKind::Expire,
            ListCommand::Delete { .. } => MutationKind::Delete,
        }
    }

    /// Builds the record key and value for this command.
    ///
    /// # Errors
    ///
    /// Returns `MarshalFailure` if an index set cannot be serialized.
    pub fn encode(&self) -> Result<(Bytes, Bytes), SpinelKvError> {
        Ok(match self {
            ListCommand::LPush { key, value }
            | ListCommand::RPush { key, value }
            | ListCommand::LPop { key, value }
            | ListCommand::RPop { key, value } => (key.clone(), value.clone()),
            ListCommand::LRem { key, count, value } => {
                let mut itoa_buf = itoa::Buffer::new();
                let digits = itoa_buf.format(*count).as_bytes();
                let mut payload = BytesMut::with_capacity(digits.len() + 1 + value.len());
                payload.put_slice(digits);
                payload.put_u8(SEPARATOR_FOR_LIST_KEY);
                payload.put_slice(value);
                (key.clone(), payload.freeze())
            }
            // The index rides in the key because the value carries the new element.
            ListCommand::LSet { key, index, value } => (
                join_with_int(key, SEPARATOR_FOR_LIST_KEY, *index),
                value.clone(),
            ),
            ListCommand::LTrim { key, start, end } => (
                join_with_int(key, SEPARATOR_FOR_LIST_KEY, *start),
                int_to_bytes(*end),
            ),
            ListCommand::LRemByIndex { key, indexes } => {
                (key.clone(), Bytes::from(marshal_ints(indexes)?))
            }
            ListCommand::Expire { key, ttl } => (key.clone(), int_to_bytes(*ttl as i64)),
            ListCommand::Delete { key } => (key.clone(), Bytes::new()),
        })
    }

    /// Encodes this command into a record stamped with `timestamp`.
    pub fn to_record(&self, bucket: &str, timestamp: u64) -> Result<CommandRecord, SpinelKvError> {
        let (key, value) = self.encode()?;
        Ok(CommandRecord::new(bucket, key, value, self.kind(), timestamp))
    }

    /// Reverses [`ListCommand::encode`]. The mutation kind alone decides how `key`
    /// and `value` are parsed.
    pub fn decode(kind: MutationKind, key: &Bytes, value: &Bytes) -> Result<Self, SpinelKvError> {
        Ok(match kind {
            MutationKind::LPush => ListCommand::LPush {
                key: key.clone(),
                value: value.clone(),
            },
            MutationKind::RPush => ListCommand::RPush {
                key: key.clone(),
                value: value.clone(),
            },
            MutationKind::LPop => ListCommand::LPop {
                key: key.clone(),
                value: value.clone(),
            },
            MutationKind::RPop => ListCommand::RPop {
                key: key.clone(),
                value: value.clone(),
            },
            MutationKind::LRem => {
                let pos = value
                    .iter()
                    .position(|&b| b == SEPARATOR_FOR_LIST_KEY)
                    .ok_or_else(|| {
                        SpinelKvError::MalformedRecord("lrem payload has no separator".into())
                    })?;
                ListCommand::LRem {
                    key: key.clone(),
                    count: parse_int(&value[..pos])?,
                    value: value.slice(pos + 1..),
                }
            }
            MutationKind::LSet => {
                let (key, index) = split_composite_key(key)?;
                ListCommand::LSet {
                    key,
                    index,
                    value: value.clone(),
                }
            }
            MutationKind::LTrim => {
                let (key, start) = split_composite_key(key)?;
                ListCommand::LTrim {
                    key,
                    start,
                    end: parse_int(value)?,
                }
            }
            MutationKind::LRemByIndex => ListCommand::LRemByIndex {
                key: key.clone(),
                indexes: unmarshal_ints(value)?,
            },
            MutationKind::Expire => ListCommand::Expire {
                key: key.clone(),
                ttl: parse_int(value)?,
            },
            MutationKind::Delete => ListCommand::Delete { key: key.clone() },
        })
    }

    pub fn from_record(record: &CommandRecord) -> Result<Self, SpinelKvError> {
        Self::decode(record.kind, &record.key, &record.value)
    }
}

/// Splits `<key>|<n>` on the last separator.
fn split_composite_key(composite: &Bytes) -> Result<(Bytes, i64), SpinelKvError> {
    let pos = composite
        .iter()
        .rposition(|&b| b == SEPARATOR_FOR_LIST_KEY)
        .ok_or_else(|| SpinelKvError::MalformedRecord("composite key has no separator".into()))?;
    Ok((composite.slice(..pos), parse_int(&composite[pos + 1..])?))
}
