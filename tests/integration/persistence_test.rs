// tests/integration/persistence_test.rs

//! Integration tests for the command log
//! Tests: replay on reopen, transaction ids, torn tails, uncommitted batches,
//! checksum corruption, and the in-memory mode

use super::test_helpers::{TestContext, assert_lrange_equals, raw_record, to_bytes};
use bytes::{Bytes, BytesMut};
use spinelkv::core::persistence::{
    CommandLogLoader, CommandLogWriter, MutationKind, RecordCodec, RecordStatus,
};
use spinelkv::core::storage::now_unix;
use spinelkv::{Db, SpinelKvError};
use std::fs::{self, OpenOptions};
use std::io::Write;

#[test]
fn test_reopen_replays_every_list_mutation() {
    let mut ctx = TestContext::new();
    ctx.rpush("b", "k", &["a", "b", "c", "d", "e", "f"]).unwrap();
    ctx.lpush("b", "k", &["z"]).unwrap();
    ctx.db()
        .update(|tx| {
            tx.lpop("b", b"k")?;
            tx.rpop("b", b"k")?;
            tx.lset("b", b"k", 0, Bytes::from_static(b"A"))?;
            tx.rpush("b", b"k", &to_bytes(&["b"]))?;
            tx.lrem("b", b"k", -1, b"b")?;
            tx.lrem_by_index("b", b"k", &[1, 3])?;
            Ok(())
        })
        .unwrap();
    ctx.db().update(|tx| tx.ltrim("b", b"k", 0, 1)).unwrap();

    let before = ctx.lrange_all("b", "k").unwrap();
    assert_lrange_equals(&before, &["A", "c"], "before reopen");

    ctx.reopen();
    let after = ctx.lrange_all("b", "k").unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_commits_are_batched_with_increasing_tx_ids() {
    let mut ctx = TestContext::new();
    ctx.rpush("b", "k", &["a", "b"]).unwrap();
    ctx.rpush("b", "k", &["c"]).unwrap();
    ctx.reopen();
    ctx.rpush("b", "k", &["d"]).unwrap();

    let loaded = CommandLogLoader::new(ctx.config.persistence.clone())
        .read()
        .unwrap();
    assert_eq!(loaded.transactions.len(), 3);
    assert_eq!(loaded.record_count(), 4);
    assert_eq!(loaded.committed_len, loaded.file_len);

    let mut last_tx_id = 0;
    for batch in &loaded.transactions {
        let tx_id = batch[0].tx_id;
        assert!(tx_id > last_tx_id);
        last_tx_id = tx_id;
        assert!(batch.iter().all(|r| r.tx_id == tx_id));
        let (last, rest) = batch.split_last().unwrap();
        assert_eq!(last.status, RecordStatus::Committed);
        assert!(rest.iter().all(|r| r.status == RecordStatus::Uncommitted));
    }
    assert_eq!(loaded.last_tx_id, last_tx_id);
}

#[test]
fn test_torn_tail_is_ignored_and_truncated() {
    let mut ctx = TestContext::new();
    ctx.rpush("b", "k", &["a", "b"]).unwrap();
    ctx.close();
    let committed_len = fs::metadata(ctx.log_path()).unwrap().len();

    let mut record = raw_record("b", "k", b"torn", MutationKind::RPush, now_unix());
    record.tx_id = 99;
    record.status = RecordStatus::Committed;
    let mut frame = BytesMut::new();
    RecordCodec.encode(&record, &mut frame);
    let mut file = OpenOptions::new().append(true).open(ctx.log_path()).unwrap();
    file.write_all(&frame[..frame.len() / 2]).unwrap();
    drop(file);

    ctx.reopen();
    let items = ctx.lrange_all("b", "k").unwrap();
    assert_lrange_equals(&items, &["a", "b"], "torn tail ignored");
    assert_eq!(fs::metadata(ctx.log_path()).unwrap().len(), committed_len);

    // New commits land on a clean frame boundary.
    ctx.rpush("b", "k", &["c"]).unwrap();
    ctx.reopen();
    let items = ctx.lrange_all("b", "k").unwrap();
    assert_lrange_equals(&items, &["a", "b", "c"], "after append");
}

#[test]
fn test_uncommitted_batch_is_dropped() {
    let mut ctx = TestContext::new();
    ctx.rpush("b", "k", &["a"]).unwrap();
    ctx.close();
    let committed_len = fs::metadata(ctx.log_path()).unwrap().len();

    let mut record = raw_record("b", "k", b"ghost", MutationKind::RPush, now_unix());
    record.tx_id = 42;
    let mut writer = CommandLogWriter::open(&ctx.config.persistence).unwrap();
    writer.append(&[record]).unwrap();
    writer.sync_to_disk().unwrap();
    drop(writer);

    ctx.reopen();
    let items = ctx.lrange_all("b", "k").unwrap();
    assert_lrange_equals(&items, &["a"], "uncommitted batch dropped");
    assert_eq!(fs::metadata(ctx.log_path()).unwrap().len(), committed_len);
}

#[test]
fn test_checksum_mismatch_is_reported() {
    let mut ctx = TestContext::new();
    ctx.rpush("b", "k", &["a"]).unwrap();
    ctx.rpush("b", "k", &["b"]).unwrap();
    ctx.close();

    let mut bytes = fs::read(ctx.log_path()).unwrap();
    // Inside the tx id of the first record's body.
    bytes[12] ^= 0xFF;
    fs::write(ctx.log_path(), &bytes).unwrap();

    let err = Db::open(ctx.config.clone())
        .err()
        .expect("corrupted log must not open");
    assert!(matches!(err, SpinelKvError::LogCorrupted(_)), "got {err:?}");
}

#[test]
fn test_in_memory_mode_writes_nothing() {
    let ctx = TestContext::in_memory();
    ctx.rpush("b", "k", &["a", "b"]).unwrap();
    let items = ctx.lrange_all("b", "k").unwrap();
    assert_lrange_equals(&items, &["a", "b"], "in-memory push");
    assert!(!ctx.log_path().exists());
}

#[test]
fn test_sync_flushes_without_error() {
    let ctx = TestContext::new();
    ctx.rpush("b", "k", &["a"]).unwrap();
    ctx.db().sync().unwrap();
    assert!(fs::metadata(ctx.log_path()).unwrap().len() > 0);
}
