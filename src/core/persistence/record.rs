// src/core/persistence/record.rs

//! The generic command record written to the log, and its framed binary codec.
//!
//! Frame layout (all integers little-endian):
//!
//! ```text
//! crc32 (u32) | body_len (u32) | body
//! body = tx_id (u64) | timestamp (u64) | persistence (u32) | flag (u16) | ds (u16)
//!        | status (u8) | bucket_len (u32) | key_len (u32) | value_len (u32)
//!        | bucket | key | value
//! ```

use crate::core::SpinelKvError;
use crate::core::storage::PERSISTENT;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use crc::{CRC_32_ISCSI, Crc};

const CHECKSUM_ALGO: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

const FRAME_HEADER_LEN: usize = 8;
const BODY_FIXED_LEN: usize = 8 + 8 + 4 + 2 + 2 + 1 + 4 + 4 + 4;

/// Identifies how the replay path must interpret a record's key and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MutationKind {
    LPush = 1,
    RPush = 2,
    LPop = 3,
    RPop = 4,
    LRem = 5,
    LSet = 6,
    LTrim = 7,
    LRemByIndex = 8,
    Expire = 9,
    /// A tombstone: the key is removed on replay.
    Delete = 10,
}

impl MutationKind {
    pub fn as_flag(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            MutationKind::LPush => "lpush",
            MutationKind::RPush => "rpush",
            MutationKind::LPop => "lpop",
            MutationKind::RPop => "rpop",
            MutationKind::LRem => "lrem",
            MutationKind::LSet => "lset",
            MutationKind::LTrim => "ltrim",
            MutationKind::LRemByIndex => "lrembyindex",
            MutationKind::Expire => "expire",
            MutationKind::Delete => "delete",
        }
    }
}

impl TryFrom<u16> for MutationKind {
    type Error = SpinelKvError;

    fn try_from(flag: u16) -> Result<Self, Self::Error> {
        Ok(match flag {
            1 => MutationKind::LPush,
            2 => MutationKind::RPush,
            3 => MutationKind::LPop,
            4 => MutationKind::RPop,
            5 => MutationKind::LRem,
            6 => MutationKind::LSet,
            7 => MutationKind::LTrim,
            8 => MutationKind::LRemByIndex,
            9 => MutationKind::Expire,
            10 => MutationKind::Delete,
            other => {
                return Err(SpinelKvError::LogCorrupted(format!(
                    "unknown mutation flag {other}"
                )));
            }
        })
    }
}

/// The data-structure tag carried by every record. Only lists are logged here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum DataStructure {
    List = 3,
}

/// Whether a record closes its transaction. Replay only applies a transaction once
/// its `Committed` record has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordStatus {
    Uncommitted = 0,
    Committed = 1,
}

/// A single durable, replayable mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub bucket: String,
    pub key: Bytes,
    pub value: Bytes,
    pub kind: MutationKind,
    /// Unix seconds at which the command was issued.
    pub timestamp: u64,
    pub persistence: u32,
    pub data_structure: DataStructure,
    /// Assigned at commit time.
    pub tx_id: u64,
    pub status: RecordStatus,
}

impl CommandRecord {
    /// Creates a persistent list record that has not been assigned to a commit batch yet.
    pub fn new(
        bucket: &str,
        key: Bytes,
        value: Bytes,
        kind: MutationKind,
        timestamp: u64,
    ) -> Self {
        Self {
            bucket: bucket.to_string(),
            key,
            value,
            kind,
            timestamp,
            persistence: PERSISTENT,
            data_structure: DataStructure::List,
            tx_id: 0,
            status: RecordStatus::Uncommitted,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.status == RecordStatus::Committed
    }
}

/// Encodes and decodes framed `CommandRecord`s.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordCodec;

impl RecordCodec {
    pub fn encode(&mut self, record: &CommandRecord, dst: &mut BytesMut) {
        let bucket = record.bucket.as_bytes();
        let body_len = BODY_FIXED_LEN + bucket.len() + record.key.len() + record.value.len();

        let mut body = BytesMut::with_capacity(body_len);
        body.put_u64_le(record.tx_id);
        body.put_u64_le(record.timestamp);
        body.put_u32_le(record.persistence);
        body.put_u16_le(record.kind.as_flag());
        body.put_u16_le(record.data_structure as u16);
        body.put_u8(record.status as u8);
        body.put_u32_le(bucket.len() as u32);
        body.put_u32_le(record.key.len() as u32);
        body.put_u32_le(record.value.len() as u32);
        body.put_slice(bucket);
        body.put_slice(&record.key);
        body.put_slice(&record.value);

        dst.reserve(FRAME_HEADER_LEN + body_len);
        dst.put_u32_le(CHECKSUM_ALGO.checksum(&body));
        dst.put_u32_le(body_len as u32);
        dst.extend_from_slice(&body);
    }

    /// Decodes one record from the front of `src`.
    ///
    /// Returns `Ok(None)` when `src` does not yet hold a complete frame; nothing is
    /// consumed in that case.
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<CommandRecord>, SpinelKvError> {
        if src.len() < FRAME_HEADER_LEN {
            return Ok(None);
        }
        let expected_crc = u32::from_le_bytes([src[0], src[1], src[2], src[3]]);
        let body_len = u32::from_le_bytes([src[4], src[5], src[6], src[7]]) as usize;
        if body_len < BODY_FIXED_LEN {
            return Err(SpinelKvError::LogCorrupted(format!(
                "frame body of {body_len} bytes is shorter than the fixed header"
            )));
        }
        if src.len() < FRAME_HEADER_LEN + body_len {
            return Ok(None);
        }

        src.advance(FRAME_HEADER_LEN);
        let mut body = src.split_to(body_len).freeze();
        if CHECKSUM_ALGO.checksum(&body) != expected_crc {
            return Err(SpinelKvError::LogCorrupted("checksum mismatch".into()));
        }

        let tx_id = body.get_u64_le();
        let timestamp = body.get_u64_le();
        let persistence = body.get_u32_le();
        let kind = MutationKind::try_from(body.get_u16_le())?;
        let data_structure = match body.get_u16_le() {
            ds if ds == DataStructure::List as u16 => DataStructure::List,
            other => {
                return Err(SpinelKvError::LogCorrupted(format!(
                    "unknown data structure tag {other}"
                )));
            }
        };
        let status = match body.get_u8() {
            0 => RecordStatus::Uncommitted,
            1 => RecordStatus::Committed,
            other => {
                return Err(SpinelKvError::LogCorrupted(format!(
                    "unknown record status {other}"
                )));
            }
        };
        let bucket_len = body.get_u32_le() as usize;
        let key_len = body.get_u32_le() as usize;
        let value_len = body.get_u32_le() as usize;
        if body.remaining() != bucket_len + key_len + value_len {
            return Err(SpinelKvError::LogCorrupted(
                "field lengths do not match frame length".into(),
            ));
        }

        let bucket = std::str::from_utf8(&body.split_to(bucket_len))
            .map_err(|e| SpinelKvError::LogCorrupted(format!("bucket is not utf-8: {e}")))?
            .to_string();
        let key = body.split_to(key_len);
        let value = body.split_to(value_len);

        Ok(Some(CommandRecord {
            bucket,
            key,
            value,
            kind,
            timestamp,
            persistence,
            data_structure,
            tx_id,
            status,
        }))
    }
}
