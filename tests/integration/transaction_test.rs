// tests/integration/transaction_test.rs

//! Integration tests for transaction lifecycle
//! Tests: commit, rollback, drop, closed transactions, isolation of uncommitted writes

use super::test_helpers::{TestContext, assert_lrange_equals, to_bytes};
use bytes::Bytes;
use spinelkv::SpinelKvError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

#[test]
fn test_closed_transaction_rejects_every_call() {
    let ctx = TestContext::new();
    ctx.rpush("b", "k", &["a"]).unwrap();

    let mut tx = ctx.db().begin(true).unwrap();
    tx.commit().unwrap();
    assert!(tx.is_closed());

    assert_eq!(tx.lsize("b", b"k").unwrap_err(), SpinelKvError::TransactionClosed);
    assert_eq!(
        tx.rpush("b", b"k", &to_bytes(&["x"])).unwrap_err(),
        SpinelKvError::TransactionClosed
    );
    assert_eq!(
        tx.rpush("b", b"k", &[]).unwrap_err(),
        SpinelKvError::TransactionClosed
    );
    assert_eq!(
        tx.lpush("b", b"k|1", &[]).unwrap_err(),
        SpinelKvError::TransactionClosed
    );
    assert_eq!(
        tx.expire_list("b", b"k", 10).unwrap_err(),
        SpinelKvError::TransactionClosed
    );
    assert_eq!(
        tx.check_expire("b", b"k").unwrap_err(),
        SpinelKvError::TransactionClosed
    );
    assert_eq!(tx.commit().unwrap_err(), SpinelKvError::TransactionClosed);
    assert_eq!(tx.rollback().unwrap_err(), SpinelKvError::TransactionClosed);
}

#[test]
fn test_read_only_transaction_rejects_mutations() {
    let ctx = TestContext::new();
    ctx.rpush("b", "k", &["a"]).unwrap();

    let mut tx = ctx.db().begin(false).unwrap();
    assert!(!tx.is_writable());
    assert_eq!(
        tx.rpush("b", b"k", &to_bytes(&["x"])).unwrap_err(),
        SpinelKvError::TransactionNotWritable
    );
    assert_eq!(
        tx.lrem("b", b"k", 0, b"a").unwrap_err(),
        SpinelKvError::TransactionNotWritable
    );
    assert_eq!(
        tx.lset("b", b"k", 0, Bytes::from_static(b"x")).unwrap_err(),
        SpinelKvError::TransactionNotWritable
    );
    assert_eq!(tx.lsize("b", b"k").unwrap(), 1);
}

#[test]
fn test_uncommitted_writes_are_private() {
    let ctx = TestContext::new();
    ctx.rpush("b", "k", &["a"]).unwrap();

    let mut tx = ctx.db().begin(true).unwrap();
    tx.rpush("b", b"k", &to_bytes(&["b"])).unwrap();
    assert_eq!(tx.lsize("b", b"k").unwrap(), 2);

    // A concurrent reader still sees the committed state.
    assert_eq!(ctx.db().view(|r| r.lsize("b", b"k")).unwrap(), 1);

    tx.commit().unwrap();
    assert_eq!(ctx.db().view(|r| r.lsize("b", b"k")).unwrap(), 2);
}

#[test]
fn test_rollback_discards_everything() {
    let mut ctx = TestContext::new();
    ctx.rpush("b", "k", &["a"]).unwrap();

    let mut tx = ctx.db().begin(true).unwrap();
    tx.rpush("b", b"k", &to_bytes(&["b", "c"])).unwrap();
    tx.rpush("new-bucket", b"k", &to_bytes(&["x"])).unwrap();
    tx.lpop("b", b"k").unwrap();
    tx.rollback().unwrap();
    drop(tx);

    let items = ctx.lrange_all("b", "k").unwrap();
    assert_lrange_equals(&items, &["a"], "after rollback");
    assert_eq!(
        ctx.db().view(|r| r.lsize("new-bucket", b"k")).unwrap_err(),
        SpinelKvError::BucketNotFound
    );

    let log_len = std::fs::metadata(ctx.log_path()).unwrap().len();
    ctx.reopen();
    assert_eq!(std::fs::metadata(ctx.log_path()).unwrap().len(), log_len);
    let items = ctx.lrange_all("b", "k").unwrap();
    assert_lrange_equals(&items, &["a"], "after reopen");
}

#[test]
fn test_dropped_transaction_rolls_back() {
    let ctx = TestContext::new();
    {
        let mut tx = ctx.db().begin(true).unwrap();
        tx.rpush("b", b"k", &to_bytes(&["a"])).unwrap();
    }
    assert_eq!(
        ctx.db().view(|r| r.lsize("b", b"k")).unwrap_err(),
        SpinelKvError::BucketNotFound
    );

    // The writer lock was released by the drop.
    ctx.rpush("b", "k", &["z"]).unwrap();
    assert_eq!(ctx.db().view(|r| r.lsize("b", b"k")).unwrap(), 1);
}

#[test]
fn test_update_rolls_back_on_error() {
    let ctx = TestContext::new();
    let result = ctx.db().update(|tx| {
        tx.rpush("b", b"k", &to_bytes(&["a"]))?;
        tx.lset("b", b"k", 5, Bytes::from_static(b"x"))
    });
    assert_eq!(result.unwrap_err(), SpinelKvError::IndexOutOfRange);
    assert_eq!(
        ctx.db().view(|r| r.lsize("b", b"k")).unwrap_err(),
        SpinelKvError::BucketNotFound
    );
}

#[test]
fn test_multi_value_push_is_not_atomic_within_the_transaction() {
    let ctx = TestContext::new();
    ctx.rpush("b", "k", &["a"]).unwrap();

    let mut tx = ctx.db().begin(true).unwrap();
    tx.rpush("b", b"k", &to_bytes(&["b", "c"])).unwrap();
    // A failing push in the middle of a transaction leaves earlier pushes staged.
    let err = tx.rpush("b", b"bad|key", &to_bytes(&["x"])).unwrap_err();
    assert_eq!(err, SpinelKvError::SeparatorViolation);
    assert_eq!(tx.pending_records().len(), 2);
    tx.commit().unwrap();

    let items = ctx.lrange_all("b", "k").unwrap();
    assert_lrange_equals(&items, &["a", "b", "c"], "partial push kept");
}

#[test]
fn test_writers_are_serialized() {
    let ctx = TestContext::new();
    ctx.rpush("b", "counter", &["seed"]).unwrap();
    let db = ctx.db();
    let committed = Arc::new(AtomicUsize::new(0));

    thread::scope(|scope| {
        for worker in 0..4 {
            let committed = Arc::clone(&committed);
            scope.spawn(move || {
                for i in 0..25 {
                    let value = Bytes::from(format!("{worker}-{i}"));
                    db.update(|tx| {
                        let before = tx.lsize("b", b"counter")?;
                        tx.rpush("b", b"counter", &[value])?;
                        assert_eq!(tx.lsize("b", b"counter")?, before + 1);
                        Ok(())
                    })
                    .unwrap();
                    committed.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert_eq!(committed.load(Ordering::SeqCst), 100);
    assert_eq!(db.view(|r| r.lsize("b", b"counter")).unwrap(), 101);
}
