// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension methods for tokio `UnboundedReceiver` to feed distinct-value streams.

use futures::stream::Map;
use futures::StreamExt;
use ripple_core::StreamItem;
use ripple_stream::{DistinctValueConnectableStream, MulticastValueStream, PublishValueDistinctExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Stream returned by [`UnboundedReceiverExt::into_item_stream`].
pub type ReceiverItemStream<T> = Map<UnboundedReceiverStream<T>, fn(T) -> StreamItem<T>>;

/// Extension trait for `UnboundedReceiver` to build distinct-value streams.
pub trait UnboundedReceiverExt<T> {
    /// Converts the receiver into a stream of [`StreamItem::Value`]s.
    ///
    /// The stream ends once every sender has been dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ripple_rx::prelude::*;
    /// use tokio::sync::mpsc;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let (tx, rx) = mpsc::unbounded_channel::<u32>();
    /// let connectable = rx.into_item_stream().publish_value_distinct(Some(20));
    ///
    /// tx.send(21).unwrap();
    /// assert_eq!(connectable.value().unwrap(), 20);
    /// # }
    /// ```
    fn into_item_stream(self) -> ReceiverItemStream<T>;

    /// Shorthand for `into_item_stream().publish_value_distinct(seed)`.
    fn publish_value_distinct(self, seed: Option<T>) -> DistinctValueConnectableStream<T>
    where
        T: Clone + PartialEq + Send + Sync + 'static;

    /// Shorthand for `into_item_stream().share_value_distinct(seed)`.
    fn share_value_distinct(self, seed: Option<T>) -> MulticastValueStream<T>
    where
        T: Clone + PartialEq + Send + Sync + 'static;
}

impl<T: Send + 'static> UnboundedReceiverExt<T> for UnboundedReceiver<T> {
    fn into_item_stream(self) -> ReceiverItemStream<T> {
        UnboundedReceiverStream::new(self).map(StreamItem::Value as fn(T) -> StreamItem<T>)
    }

    fn publish_value_distinct(self, seed: Option<T>) -> DistinctValueConnectableStream<T>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        PublishValueDistinctExt::publish_value_distinct(self.into_item_stream(), seed)
    }

    fn share_value_distinct(self, seed: Option<T>) -> MulticastValueStream<T>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        PublishValueDistinctExt::share_value_distinct(self.into_item_stream(), seed)
    }
}
