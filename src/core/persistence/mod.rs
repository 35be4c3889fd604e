// src/core/persistence/mod.rs

//! This module contains all logic related to durability: the framed command
//! record, the append-only command log writer, and the loader that replays the
//! log on startup.

mod log_loader;
mod log_writer;
pub mod record;

// Re-export the primary public types from the sub-modules.
pub use log_loader::{CommandLogLoader, LoadedLog, ReplayStats};
pub use log_writer::CommandLogWriter;
pub use record::{CommandRecord, DataStructure, MutationKind, RecordCodec, RecordStatus};
