// src/core/commands/helpers.rs

//! Provides helper functions shared by the list commands: integer and byte
//! marshaling for composite record payloads, and glob matching for key scans.

use crate::core::SpinelKvError;
use bincode::config;
use bytes::{BufMut, Bytes, BytesMut};
use std::num::ParseIntError;
use std::str::FromStr;
use wildmatch::WildMatch;

/// Serializes an index set into the canonical payload of an `LRemByIndex` record.
pub fn marshal_ints(ints: &[i64]) -> Result<Vec<u8>, SpinelKvError> {
    Ok(bincode::encode_to_vec(ints, config::standard())?)
}

/// Inverse of [`marshal_ints`]. Trailing bytes are rejected.
pub fn unmarshal_ints(data: &[u8]) -> Result<Vec<i64>, SpinelKvError> {
    let (ints, read): (Vec<i64>, usize) = bincode::decode_from_slice(data, config::standard())?;
    if read != data.len() {
        return Err(SpinelKvError::MalformedRecord(format!(
            "{} trailing bytes after index set",
            data.len() - read
        )));
    }
    Ok(ints)
}

/// Formats an integer as decimal ASCII.
pub fn int_to_bytes(value: i64) -> Bytes {
    let mut buf = itoa::Buffer::new();
    Bytes::copy_from_slice(buf.format(value).as_bytes())
}

/// Parses a decimal ASCII integer field of a record payload.
pub fn parse_int<T>(data: &[u8]) -> Result<T, SpinelKvError>
where
    T: FromStr<Err = ParseIntError>,
{
    Ok(std::str::from_utf8(data)?.parse::<T>()?)
}

/// Builds `<head><sep><decimal value>`.
pub fn join_with_int(head: &[u8], separator: u8, value: i64) -> Bytes {
    let mut itoa_buf = itoa::Buffer::new();
    let digits = itoa_buf.format(value).as_bytes();
    let mut out = BytesMut::with_capacity(head.len() + 1 + digits.len());
    out.put_slice(head);
    out.put_u8(separator);
    out.put_slice(digits);
    out.freeze()
}

/// Matches `key` against `matcher` and hands matching keys to `f`.
///
/// Returns `true` when the enumeration should end, i.e. when `f` asked to stop.
pub fn match_for_range<F>(matcher: &WildMatch, key: &Bytes, f: &mut F) -> bool
where
    F: FnMut(&Bytes) -> bool,
{
    let key_str = String::from_utf8_lossy(key);
    matcher.matches(&key_str) && !f(key)
}
