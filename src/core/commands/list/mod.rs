// src/core/commands/list/mod.rs

//! Transactional list commands. Each file adds the methods of one command family
//! to [`Tx`](crate::core::database::Tx); `command` holds the typed command and its
//! record encoding.

/// Delimits the auxiliary integer fields of composite record keys and values.
/// Keys passed to a push operation must not contain it.
pub const SEPARATOR_FOR_LIST_KEY: u8 = b'|';

// Internal helper modules for list command logic.
pub(crate) mod logic;
mod validate;

pub mod command;
pub mod expire;
pub mod lkeys;
pub mod llen;
pub mod lpop;
pub mod lpush;
pub mod lrange;
pub mod lrem;
pub mod lrem_index;
pub mod lset;
pub mod ltrim;
pub mod rpop;
pub mod rpush;

pub use self::command::ListCommand;
pub use self::logic::{PopDirection, PushDirection};
pub use self::validate::contains_separator;
