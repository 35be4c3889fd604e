// src/core/storage/mod.rs

//! In-memory list storage: the per-bucket `ListStore`, its registry, and the
//! range and TTL arithmetic they share.

pub mod index;
pub mod list;
pub mod range;
pub mod ttl;

pub use index::Index;
pub use list::ListStore;
pub use range::resolve_range;
pub use ttl::{PERSISTENT, TtlEntry, now_unix};
