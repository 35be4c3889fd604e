// src/core/mod.rs

//! The central module containing the core logic and data structures of SpinelKV.

pub mod commands;
pub mod database;
pub mod errors;
pub mod persistence;
pub mod storage;

pub use commands::list::ListCommand;
pub use database::{Db, Tx};
pub use errors::SpinelKvError;
