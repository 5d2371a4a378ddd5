// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tests for the CancellationToken that stops upstream forwarding tasks.

use futures::future::{select, Either};
use futures::{stream, StreamExt};
use ripple_core::CancellationToken;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_new_token_not_cancelled() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
}

#[test]
fn test_cancel_is_idempotent_and_shared_by_clones() {
    let token = CancellationToken::new();
    let clone = token.clone();

    clone.cancel();
    clone.cancel();

    assert!(token.is_cancelled());
    assert!(clone.is_cancelled());
}

#[tokio::test]
async fn test_cancelled_resolves_immediately_if_already_cancelled() {
    let token = CancellationToken::new();
    token.cancel();

    tokio::time::timeout(Duration::from_millis(50), token.cancelled())
        .await
        .expect("already cancelled token should resolve at once");
}

#[tokio::test]
async fn test_all_waiters_are_notified() {
    let token = CancellationToken::new();
    let woken = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let token = token.clone();
            let woken = woken.clone();
            tokio::spawn(async move {
                token.cancelled().await;
                woken.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(10)).await;
    token.cancel();

    for handle in handles {
        tokio::time::timeout(Duration::from_millis(200), handle)
            .await
            .expect("waiter should complete")
            .expect("waiter should not panic");
    }
    assert_eq!(woken.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn test_cancel_racing_listener_registration() {
    for _ in 0..100 {
        let token = CancellationToken::new();
        let canceller = token.clone();

        let handle = tokio::spawn(async move {
            token.cancelled().await;
        });
        canceller.cancel();

        let result = tokio::time::timeout(Duration::from_millis(200), handle).await;
        assert!(result.is_ok(), "waiter didn't complete after cancel");
    }
}

#[tokio::test]
async fn test_cancellation_stops_forwarding_loop() {
    // Same select shape the connectable stream uses to pull from upstream
    let token = CancellationToken::new();
    let forwarded = Arc::new(AtomicUsize::new(0));

    let worker = {
        let token = token.clone();
        let forwarded = forwarded.clone();
        tokio::spawn(async move {
            let mut upstream = stream::pending::<i32>().boxed();
            while let Either::Left((Some(_), _)) =
                select(upstream.next(), token.cancelled()).await
            {
                forwarded.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    token.cancel();

    tokio::time::timeout(Duration::from_millis(200), worker)
        .await
        .expect("forwarding loop should exit")
        .expect("forwarding loop should not panic");
    assert_eq!(forwarded.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_drop_token_without_cancel_does_not_wake_waiters() {
    let token = CancellationToken::new();
    let waiter = token.clone();

    let handle = tokio::spawn(async move {
        tokio::time::timeout(Duration::from_millis(50), waiter.cancelled()).await
    });
    drop(token);

    let result = handle.await.expect("waiter should not panic");
    assert!(result.is_err());
}
