// src/core/database/mod.rs

//! The database handle and its transactions.

pub mod core;
pub mod transaction;

pub use self::core::Db;
pub use self::transaction::Tx;
