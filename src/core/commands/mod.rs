// src/core/commands/mod.rs

//! The command layer: shared helpers and the transactional list commands.

pub mod helpers;
pub mod list;
