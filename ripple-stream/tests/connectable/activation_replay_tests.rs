// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{stream, StreamExt};
use ripple_core::StreamItem;
use ripple_stream::DistinctValueConnectableStream;
use ripple_test_utils::{test_channel, unwrap_stream, unwrap_value};

fn seeded() -> DistinctValueConnectableStream<i32> {
    let source = stream::iter([1, 2, 3].map(StreamItem::Value));
    DistinctValueConnectableStream::create(source, Some(0), None)
}

#[tokio::test]
async fn early_listener_gets_seed_on_connect() -> anyhow::Result<()> {
    // Arrange
    let connectable = seeded();
    let listener = connectable.subscribe();

    // Act
    let _handle = connectable.connect()?;
    let values: Vec<i32> = listener.map(StreamItem::unwrap).collect().await;

    // Assert
    assert_eq!(values, vec![0, 1, 2, 3]);

    Ok(())
}

#[tokio::test]
async fn early_listener_gets_seed_on_ref_count() -> anyhow::Result<()> {
    // Arrange
    let connectable = seeded();
    let listener = connectable.subscribe();

    // Act
    let _shared = connectable.ref_count()?;
    let values: Vec<i32> = listener.map(StreamItem::unwrap).collect().await;

    // Assert
    assert_eq!(values, vec![0, 1, 2, 3]);

    Ok(())
}

#[tokio::test]
async fn early_listener_gets_seed_on_auto_connect() -> anyhow::Result<()> {
    // Arrange
    let connectable = seeded();
    let listener = connectable.subscribe();

    // Act
    let _shared = connectable.auto_connect()?;
    let values: Vec<i32> = listener.map(StreamItem::unwrap).collect().await;

    // Assert
    assert_eq!(values, vec![0, 1, 2, 3]);

    Ok(())
}

#[tokio::test]
async fn listener_after_ref_count_gets_seed_first() -> anyhow::Result<()> {
    // Arrange
    let shared = seeded().ref_count()?;

    // Act
    let values: Vec<i32> = shared.subscribe().map(StreamItem::unwrap).collect().await;

    // Assert
    assert_eq!(values, vec![0, 1, 2, 3]);

    Ok(())
}

#[tokio::test]
async fn every_early_listener_gets_seed_exactly_once() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let connectable = DistinctValueConnectableStream::create(stream, Some(0), None);
    let mut first = connectable.subscribe();
    let mut second = connectable.subscribe();

    // Act
    let _handle = connectable.connect()?;
    tx.send(1)?;

    // Assert
    for listener in [&mut first, &mut second] {
        assert_eq!(unwrap_value(Some(unwrap_stream(&mut *listener, 500).await)), 0);
        assert_eq!(unwrap_value(Some(unwrap_stream(&mut *listener, 500).await)), 1);
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn listeners_racing_connect_get_seed_exactly_once() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let connectable = DistinctValueConnectableStream::create(stream, Some(0), None);
    let attaching: Vec<_> = (0..16)
        .map(|_| {
            let connectable = connectable.clone();
            tokio::spawn(async move { connectable.subscribe() })
        })
        .collect();

    // Act
    let _handle = connectable.connect()?;
    let mut listeners = Vec::new();
    for task in attaching {
        listeners.push(task.await?);
    }
    tx.send(1)?;

    // Assert
    for listener in &mut listeners {
        assert_eq!(unwrap_value(Some(unwrap_stream(&mut *listener, 500).await)), 0);
        assert_eq!(unwrap_value(Some(unwrap_stream(&mut *listener, 500).await)), 1);
    }

    Ok(())
}
