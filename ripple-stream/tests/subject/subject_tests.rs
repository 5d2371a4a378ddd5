// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use ripple_core::{Acceptance, EqualityPolicy, StreamItem};
use ripple_stream::{DistinctValueStream, DistinctValueSubject, ListenerTransition};
use ripple_test_utils::test_data::{person_alice, person_bob, same_name};
use ripple_test_utils::{
    assert_no_element_emitted, assert_stream_ended, unwrap_stream, unwrap_value,
};
use std::sync::Arc;

#[tokio::test]
async fn subject_broadcasts_to_all_listeners_in_order() -> anyhow::Result<()> {
    // Arrange
    let subject = DistinctValueSubject::<i32>::default();
    let mut first = subject.subscribe();
    let mut second = subject.subscribe();

    // Act
    subject.add(1)?;
    subject.add(2)?;
    subject.add(3)?;

    // Assert
    for listener in [&mut first, &mut second] {
        assert_eq!(unwrap_value(Some(unwrap_stream(&mut *listener, 500).await)), 1);
        assert_eq!(unwrap_value(Some(unwrap_stream(&mut *listener, 500).await)), 2);
        assert_eq!(unwrap_value(Some(unwrap_stream(&mut *listener, 500).await)), 3);
    }

    Ok(())
}

#[tokio::test]
async fn subject_suppresses_consecutive_duplicates() -> anyhow::Result<()> {
    // Arrange
    let subject = DistinctValueSubject::<i32>::default();
    let mut listener = subject.subscribe();

    // Act
    let outcomes = [1, 2, 2, 3, 3, 3]
        .into_iter()
        .map(|v| subject.add(v))
        .collect::<Result<Vec<_>, _>>()?;
    subject.close();

    // Assert
    assert_eq!(
        outcomes,
        vec![
            Acceptance::Accepted,
            Acceptance::Accepted,
            Acceptance::Suppressed,
            Acceptance::Accepted,
            Acceptance::Suppressed,
            Acceptance::Suppressed,
        ]
    );
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut listener, 500).await)), 1);
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut listener, 500).await)), 2);
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut listener, 500).await)), 3);
    assert_stream_ended(&mut listener, 500).await;
    assert_eq!(subject.value()?, 3);

    Ok(())
}

#[tokio::test]
async fn subject_replays_latest_value_to_new_listener() -> anyhow::Result<()> {
    // Arrange
    let subject = DistinctValueSubject::<i32>::default();
    subject.add(1)?;
    subject.add(2)?;

    // Act
    let mut late = subject.subscribe();

    // Assert - only the latest value, never history
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut late, 500).await)), 2);
    assert_no_element_emitted(&mut late, 100).await;

    Ok(())
}

#[tokio::test]
async fn seed_is_replayed_and_filters_first_value() -> anyhow::Result<()> {
    // Arrange
    let subject = DistinctValueSubject::new(Some(0), EqualityPolicy::structural());
    let mut listener = subject.subscribe();

    // Act
    assert_eq!(subject.add(0)?, Acceptance::Suppressed);
    subject.add(1)?;

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut listener, 500).await)), 0);
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut listener, 500).await)), 1);
    assert_no_element_emitted(&mut listener, 100).await;

    Ok(())
}

#[tokio::test]
async fn custom_policy_compares_by_name() -> anyhow::Result<()> {
    // Arrange
    let subject = DistinctValueSubject::new(None, same_name());
    let mut listener = subject.subscribe();
    let alice = person_alice();

    // Act
    subject.add(alice.clone())?;
    subject.add(alice.aged(1))?;
    subject.add(person_bob())?;

    // Assert - the birthday is not a change
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut listener, 500).await)), alice);
    assert_eq!(
        unwrap_value(Some(unwrap_stream(&mut listener, 500).await)),
        person_bob()
    );
    assert_eq!(subject.value()?, person_bob());

    Ok(())
}

#[tokio::test]
async fn listener_count_is_exact_after_drop() -> anyhow::Result<()> {
    // Arrange
    let subject = DistinctValueSubject::<i32>::default();
    let first = subject.subscribe();
    let second = subject.subscribe();
    assert_eq!(subject.listener_count(), 2);

    // Act
    drop(first);

    // Assert - no emission needed to notice the drop
    assert_eq!(subject.listener_count(), 1);
    drop(second);
    assert_eq!(subject.listener_count(), 0);

    Ok(())
}

#[tokio::test]
async fn listener_hooks_fire_on_count_transitions() -> anyhow::Result<()> {
    // Arrange
    let subject = DistinctValueSubject::<i32>::default();
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&transitions);
    subject.on_listener_change(move |t| recorded.lock().push(t));

    // Act
    let first = subject.subscribe();
    let second = subject.subscribe();
    drop(first);
    drop(second);
    let third = subject.subscribe();
    drop(third);

    // Assert
    assert_eq!(
        *transitions.lock(),
        vec![
            ListenerTransition::FirstAttached,
            ListenerTransition::LastDetached,
            ListenerTransition::FirstAttached,
            ListenerTransition::LastDetached,
        ]
    );

    Ok(())
}

#[tokio::test]
async fn close_ends_listeners_and_keeps_value() -> anyhow::Result<()> {
    // Arrange
    let subject = DistinctValueSubject::<i32>::default();
    let mut listener = subject.subscribe();
    subject.add(5)?;

    // Act
    subject.close();
    subject.close();

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut listener, 500).await)), 5);
    assert_stream_ended(&mut listener, 500).await;
    assert!(subject.is_closed());
    assert_eq!(subject.listener_count(), 0);
    assert_eq!(subject.value()?, 5);

    Ok(())
}

#[tokio::test]
async fn subscribe_after_close_replays_then_ends() -> anyhow::Result<()> {
    // Arrange
    let subject = DistinctValueSubject::<i32>::default();
    subject.add(9)?;
    subject.close();

    // Act
    let mut late = subject.subscribe();

    // Assert
    assert_eq!(unwrap_stream(&mut late, 500).await, StreamItem::Value(9));
    assert_stream_ended(&mut late, 500).await;
    assert_eq!(subject.listener_count(), 0);

    Ok(())
}

#[tokio::test]
async fn clones_share_state() -> anyhow::Result<()> {
    // Arrange
    let subject = DistinctValueSubject::<i32>::default();
    let clone = subject.clone();
    let mut listener = subject.subscribe();

    // Act
    clone.add(4)?;

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut listener, 500).await)), 4);
    assert_eq!(subject.try_value(), Some(4));
    assert_eq!(clone.listener_count(), 1);

    Ok(())
}
