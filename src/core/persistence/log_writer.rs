// src/core/persistence/log_writer.rs

//! Implements the append-only command log writer.
//!
//! The writer appends whole commit batches to the log file and applies the
//! configured `fsync` policy after each batch.

use super::record::{CommandRecord, RecordCodec};
use crate::config::{AppendFsync, PersistenceConfig};
use crate::core::SpinelKvError;
use bytes::BytesMut;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub struct CommandLogWriter {
    path: PathBuf,
    /// A buffered writer to the log file; flushed after every batch.
    writer: BufWriter<File>,
    appendfsync: AppendFsync,
    fsync_interval: Duration,
    last_fsync: Instant,
    codec: RecordCodec,
    /// Set after a failed write or fsync. The file may end in a partial or
    /// unsynced batch, so nothing further is appended until the database is
    /// reopened and the tail truncated.
    read_only: bool,
}

impl CommandLogWriter {
    /// Opens (creating if needed) the log file for appending.
    pub fn open(config: &PersistenceConfig) -> Result<Self, SpinelKvError> {
        let path = PathBuf::from(&config.log_path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!(
            "Command log opened at {}. Fsync policy: {:?}",
            path.display(),
            config.appendfsync
        );

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            appendfsync: config.appendfsync,
            fsync_interval: config.fsync_interval,
            last_fsync: Instant::now(),
            codec: RecordCodec,
            read_only: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a commit batch. Records are written in the order given, which is the
    /// order replay will re-apply them.
    pub fn append(&mut self, records: &[CommandRecord]) -> Result<(), SpinelKvError> {
        if self.read_only {
            return Err(SpinelKvError::ReadOnly(
                "command log rejected writes after a failed append".into(),
            ));
        }
        if records.is_empty() {
            return Ok(());
        }
        let mut buf = BytesMut::new();
        for record in records {
            self.codec.encode(record, &mut buf);
        }
        if let Err(e) = self.write_and_flush(&buf) {
            error!("Command log write failed: {}. Entering read-only mode.", e);
            self.read_only = true;
            return Err(e);
        }
        debug!(
            "Appended {} records ({} bytes) to the command log.",
            records.len(),
            buf.len()
        );

        match self.appendfsync {
            AppendFsync::Always => self.sync_to_disk(),
            AppendFsync::EverySec if self.last_fsync.elapsed() >= self.fsync_interval => {
                self.sync_to_disk()
            }
            _ => Ok(()),
        }
    }

    fn write_and_flush(&mut self, buf: &[u8]) -> Result<(), SpinelKvError> {
        self.writer.write_all(buf)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Flushes buffered bytes and forces them to stable storage.
    ///
    /// A failure puts the writer into read-only mode: the bytes already handed to
    /// the OS may or may not survive a crash.
    pub fn sync_to_disk(&mut self) -> Result<(), SpinelKvError> {
        let result = self
            .writer
            .flush()
            .and_then(|()| self.writer.get_ref().sync_data());
        if let Err(e) = result {
            error!("Failed to fsync command log: {}. Entering read-only mode.", e);
            self.read_only = true;
            return Err(e.into());
        }
        self.last_fsync = Instant::now();
        Ok(())
    }
}
