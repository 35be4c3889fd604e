// src/core/storage/range.rs

//! Index arithmetic shared by `LRANGE` and `LTRIM`.

use crate::core::SpinelKvError;

/// Resolves a Redis-style `[start, end]` pair against a list of `size` elements.
///
/// Negative offsets count from the tail (`-1` is the last element). A start that is
/// still negative after resolution is clamped to the head, and an end past the tail
/// is clamped to the last element. The returned bounds are inclusive.
///
/// # Errors
///
/// Returns `InvalidRange` when the resolved range selects nothing: the start lies
/// beyond the tail, the end lies before the head, or `start > end`.
pub fn resolve_range(start: i64, end: i64, size: usize) -> Result<(usize, usize), SpinelKvError> {
    let len = size as i64;
    let start = if start < 0 { len + start } else { start }.max(0);
    let end = if end < 0 { len + end } else { end }.min(len - 1);

    if end < 0 || start >= len || start > end {
        return Err(SpinelKvError::InvalidRange);
    }
    Ok((start as usize, end as usize))
}
