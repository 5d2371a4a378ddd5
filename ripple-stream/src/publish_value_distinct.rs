// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::connectable::{DistinctValueConnectableStream, MulticastValueStream};
use futures::Stream;
use ripple_core::{EqualityPolicy, StreamItem};

/// Extension trait turning any stream of [`StreamItem`]s into a distinct-value
/// connectable stream.
///
/// The `publish_*` methods return an unconnected stream; pick a mode with
/// [`connect`](DistinctValueConnectableStream::connect),
/// [`ref_count`](DistinctValueConnectableStream::ref_count) or
/// [`auto_connect`](DistinctValueConnectableStream::auto_connect).
/// The `share_*` methods return an already ref-counted view.
///
/// # Example
///
/// ```
/// use ripple_core::StreamItem;
/// use ripple_stream::{DistinctValueStream, PublishValueDistinctExt};
/// use futures::{stream, StreamExt};
///
/// # #[tokio::main]
/// # async fn main() {
/// let source = stream::iter(vec![1, 2, 3].into_iter().map(StreamItem::Value));
/// let shared = source.share_value_distinct(Some(0));
/// assert_eq!(shared.value().unwrap(), 0);
///
/// let seen: Vec<_> = shared.subscribe().map(StreamItem::unwrap).collect().await;
/// assert_eq!(seen, vec![0, 1, 2, 3]);
/// # }
/// ```
pub trait PublishValueDistinctExt<T>: Stream<Item = StreamItem<T>> + Sized
where
    T: Clone + Send + Sync + 'static,
{
    /// Unconnected stream comparing values with `==`.
    fn publish_value_distinct(self, seed: Option<T>) -> DistinctValueConnectableStream<T>
    where
        T: PartialEq;

    /// Unconnected stream comparing values with `equality`.
    fn publish_value_distinct_by(
        self,
        seed: Option<T>,
        equality: EqualityPolicy<T>,
    ) -> DistinctValueConnectableStream<T>;

    /// Ref-counted stream comparing values with `==`.
    fn share_value_distinct(self, seed: Option<T>) -> MulticastValueStream<T>
    where
        T: PartialEq;

    /// Ref-counted stream comparing values with `equality`.
    fn share_value_distinct_by(
        self,
        seed: Option<T>,
        equality: EqualityPolicy<T>,
    ) -> MulticastValueStream<T>;
}

impl<S, T> PublishValueDistinctExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn publish_value_distinct(self, seed: Option<T>) -> DistinctValueConnectableStream<T>
    where
        T: PartialEq,
    {
        DistinctValueConnectableStream::create(self, seed, None)
    }

    fn publish_value_distinct_by(
        self,
        seed: Option<T>,
        equality: EqualityPolicy<T>,
    ) -> DistinctValueConnectableStream<T> {
        DistinctValueConnectableStream::with_policy(self, seed, equality)
    }

    fn share_value_distinct(self, seed: Option<T>) -> MulticastValueStream<T>
    where
        T: PartialEq,
    {
        self.publish_value_distinct(seed).into_ref_counted()
    }

    fn share_value_distinct_by(
        self,
        seed: Option<T>,
        equality: EqualityPolicy<T>,
    ) -> MulticastValueStream<T> {
        self.publish_value_distinct_by(seed, equality).into_ref_counted()
    }
}
