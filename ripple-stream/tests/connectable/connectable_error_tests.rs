// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{stream, StreamExt};
use ripple_core::{EqualityPolicy, RippleError, StreamItem};
use ripple_stream::{DistinctValueConnectableStream, DistinctValueStream};
use ripple_test_utils::{
    test_channel_with_errors, unwrap_stream, unwrap_value, ErrorInjectingStream,
};

fn rejects_negative() -> EqualityPolicy<i32> {
    EqualityPolicy::fallible(|previous: &i32, next: &i32| {
        if *next < 0 {
            Err("negative values cannot be compared")
        } else {
            Ok(previous == next)
        }
    })
}

#[tokio::test]
async fn upstream_error_reaches_every_listener() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel_with_errors::<i32>();
    let connectable = DistinctValueConnectableStream::create(stream, None, None);
    let mut first = connectable.subscribe();
    let mut second = connectable.subscribe();
    let _handle = connectable.connect()?;

    // Act
    tx.send(StreamItem::Value(1))?;
    tx.send(StreamItem::Error(RippleError::stream_error("upstream failed")))?;

    // Assert
    for listener in [&mut first, &mut second] {
        assert_eq!(unwrap_value(Some(unwrap_stream(&mut *listener, 500).await)), 1);
        assert!(matches!(
            unwrap_stream(&mut *listener, 500).await,
            StreamItem::Error(RippleError::StreamProcessingError { .. })
        ));
    }
    assert_eq!(connectable.value()?, 1);

    Ok(())
}

#[tokio::test]
async fn upstream_error_does_not_end_the_stream() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel_with_errors::<i32>();
    let connectable = DistinctValueConnectableStream::create(stream, None, None);
    let mut listener = connectable.subscribe();
    let _handle = connectable.connect()?;

    // Act
    tx.send(StreamItem::Error(RippleError::stream_error("transient")))?;
    tx.send(StreamItem::Value(2))?;

    // Assert
    assert!(unwrap_stream(&mut listener, 500).await.is_error());
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut listener, 500).await)), 2);
    assert!(!connectable.is_closed());

    Ok(())
}

#[tokio::test]
async fn injected_error_is_forwarded_in_order() -> anyhow::Result<()> {
    // Arrange
    let source = ErrorInjectingStream::new(stream::iter(vec![1, 2, 3]), 1);
    let connectable = DistinctValueConnectableStream::create(source, None, None);
    let listener = connectable.subscribe();

    // Act
    let _handle = connectable.connect()?;
    let items: Vec<StreamItem<i32>> = listener.collect().await;

    // Assert
    assert_eq!(items.len(), 4);
    assert_eq!(items[0], StreamItem::Value(1));
    assert!(items[1].is_error());
    assert_eq!(items[2], StreamItem::Value(2));
    assert_eq!(items[3], StreamItem::Value(3));

    Ok(())
}

#[tokio::test]
async fn failing_policy_is_broadcast_and_value_dropped() -> anyhow::Result<()> {
    // Arrange
    let source = stream::iter([1, -5, 2].map(StreamItem::Value));
    let connectable =
        DistinctValueConnectableStream::with_policy(source, Some(0), rejects_negative());
    let listener = connectable.subscribe();

    // Act
    let _handle = connectable.connect()?;
    let items: Vec<StreamItem<i32>> = listener.collect().await;

    // Assert - seed replayed on activation, then the upstream items
    assert_eq!(items.len(), 4);
    assert_eq!(items[0], StreamItem::Value(0));
    assert_eq!(items[1], StreamItem::Value(1));
    assert!(matches!(
        items[2],
        StreamItem::Error(RippleError::PolicyEvaluation { .. })
    ));
    assert_eq!(items[3], StreamItem::Value(2));
    assert_eq!(connectable.value()?, 2);

    Ok(())
}

#[tokio::test]
async fn empty_stream_reports_empty_value() -> anyhow::Result<()> {
    // Arrange
    let connectable =
        DistinctValueConnectableStream::create(stream::empty::<StreamItem<i32>>(), None, None);

    // Act
    let result = connectable.value();

    // Assert
    assert!(matches!(result, Err(RippleError::EmptyValue)));
    assert!(!connectable.has_value());
    assert_eq!(connectable.try_value(), None);

    Ok(())
}
