// src/core/commands/list/logic.rs

use super::ListCommand;
use crate::core::SpinelKvError;
use crate::core::database::Tx;
use bytes::Bytes;

/// Which end of the list a push inserts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushDirection {
    Left,
    Right,
}

/// Which end of the list a pop or peek reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopDirection {
    Left,
    Right,
}

/// Shared logic for `lpush` and `rpush`.
///
/// The transaction and key are validated once up front, so an empty `values`
/// still fails on a closed or read-only transaction or a reserved key. Each value
/// then passes the expiration gate and is staged on its own, in input order. A
/// failure on value `i` returns early and leaves values `0..i` staged.
pub(crate) fn list_push_logic(
    tx: &mut Tx<'_>,
    bucket: &str,
    key: &[u8],
    values: &[Bytes],
    direction: PushDirection,
) -> Result<(), SpinelKvError> {
    tx.validate_push(key)?;
    let key = Bytes::copy_from_slice(key);
    for value in values {
        tx.validate_push_value(bucket, &key)?;
        let command = match direction {
            PushDirection::Left => ListCommand::LPush {
                key: key.clone(),
                value: value.clone(),
            },
            PushDirection::Right => ListCommand::RPush {
                key: key.clone(),
                value: value.clone(),
            },
        };
        tx.stage_logged(bucket, command)?;
    }
    Ok(())
}

/// Shared logic for `lpeek` and `rpeek`.
pub(crate) fn list_peek_logic(
    tx: &mut Tx<'_>,
    bucket: &str,
    key: &[u8],
    direction: PopDirection,
) -> Result<Bytes, SpinelKvError> {
    tx.validate_key(bucket, key)?;
    tx.with_list(bucket, |list| match direction {
        PopDirection::Left => list.lpeek(key),
        PopDirection::Right => list.rpeek(key),
    })
    .unwrap_or(Err(SpinelKvError::BucketNotFound))
}

/// Shared logic for `lpop` and `rpop`: read the element at the chosen end, then
/// stage one record carrying it.
pub(crate) fn list_pop_logic(
    tx: &mut Tx<'_>,
    bucket: &str,
    key: &[u8],
    direction: PopDirection,
) -> Result<Bytes, SpinelKvError> {
    tx.check_writable()?;
    let value = list_peek_logic(tx, bucket, key, direction)?;
    let key = Bytes::copy_from_slice(key);
    let command = match direction {
        PopDirection::Left => ListCommand::LPop {
            key,
            value: value.clone(),
        },
        PopDirection::Right => ListCommand::RPop {
            key,
            value: value.clone(),
        },
    };
    tx.stage_logged(bucket, command)?;
    Ok(value)
}
