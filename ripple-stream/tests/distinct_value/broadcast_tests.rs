// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{stream, StreamExt};
use ripple_core::StreamItem;
use ripple_stream::{DistinctValueExt, DistinctValueStream};
use ripple_test_utils::test_data::{person_alice, person_bob, same_name};
use ripple_test_utils::{assert_stream_ended, test_channel, unwrap_stream, unwrap_value};

#[tokio::test]
async fn broadcast_fans_out_distinct_values() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let broadcast = stream.distinct_value(None).into_broadcast();
    let mut first = broadcast.subscribe();
    let mut second = broadcast.subscribe();

    // Act
    tx.send(1)?;
    tx.send(1)?;
    tx.send(2)?;

    // Assert
    for listener in [&mut first, &mut second] {
        assert_eq!(unwrap_value(Some(unwrap_stream(&mut *listener, 500).await)), 1);
        assert_eq!(unwrap_value(Some(unwrap_stream(&mut *listener, 500).await)), 2);
    }
    assert_eq!(broadcast.listener_count(), 2);

    Ok(())
}

#[tokio::test]
async fn broadcast_reads_wrapped_value() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let broadcast = stream.distinct_value(Some(3)).into_broadcast();
    assert_eq!(broadcast.value()?, 3);
    let mut listener = broadcast.subscribe();

    // Act
    tx.send(4)?;

    // Assert - the seed is replayed to listeners of the shared stream
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut listener, 500).await)), 3);
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut listener, 500).await)), 4);
    assert_eq!(broadcast.value()?, 4);

    Ok(())
}

#[tokio::test]
async fn broadcast_forwards_equality_policy() -> anyhow::Result<()> {
    // Arrange
    let source = stream::iter([person_alice(), person_bob()].map(StreamItem::Value));
    let broadcast = source.distinct_value_by(None, same_name()).into_broadcast();

    // Act
    let policy = broadcast.equality();

    // Assert
    assert!(policy.equals(&person_alice(), &person_alice().aged(5))?);
    assert!(!policy.equals(&person_alice(), &person_bob())?);

    Ok(())
}

#[tokio::test]
async fn broadcast_ends_with_wrapped_stream() -> anyhow::Result<()> {
    // Arrange
    let source = stream::iter([1, 2, 2].map(StreamItem::Value));
    let broadcast = source.distinct_value(None).into_broadcast();

    // Act
    let values: Vec<i32> = broadcast.subscribe().map(StreamItem::unwrap).collect().await;

    // Assert
    assert_eq!(values, vec![1, 2]);
    assert!(broadcast.is_closed());
    let mut late = broadcast.subscribe();
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut late, 500).await)), 2);
    assert_stream_ended(&mut late, 500).await;

    Ok(())
}
