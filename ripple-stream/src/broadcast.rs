// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::connectable::{DistinctValueConnectableStream, MulticastValueStream};
use crate::distinct_value::DistinctValue;
use crate::distinct_value_subject::ValueSubscription;
use crate::upstream::SingleSubscription;
use crate::value_stream::DistinctValueStream;
use futures::Stream;
use ripple_core::{EqualityPolicy, StreamItem, ValueCell};

impl<S, T> DistinctValue<S, T>
where
    S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Shares this stream between any number of listeners.
    ///
    /// The result is ref-counted: the first listener starts pulling from this
    /// stream and the last one to detach stops it. Value reads go to this
    /// stream's own cache.
    pub fn into_broadcast(self) -> BroadcastDistinctValueStream<T> {
        let cell = self.cell.clone();
        let shared = DistinctValueConnectableStream::from_upstream(
            SingleSubscription::distinct(self),
            cell.try_value(),
            cell.equality().clone(),
        )
        .into_ref_counted();

        BroadcastDistinctValueStream { cell, shared }
    }
}

/// Multicast wrapper around a [`DistinctValue`] stream.
///
/// Returned by [`DistinctValue::into_broadcast`]. Listeners attach through
/// [`subscribe`](Self::subscribe); value and equality reads are forwarded to the
/// wrapped stream.
pub struct BroadcastDistinctValueStream<T: Clone + Send + Sync + 'static> {
    cell: ValueCell<T>,
    shared: MulticastValueStream<T>,
}

impl<T: Clone + Send + Sync + 'static> BroadcastDistinctValueStream<T> {
    /// Attaches a listener, replaying the latest value first.
    pub fn subscribe(&self) -> ValueSubscription<T> {
        self.shared.subscribe()
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.shared.listener_count()
    }

    /// Returns `true` once the wrapped stream has ended.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }
}

impl<T: Clone + Send + Sync + 'static> DistinctValueStream<T> for BroadcastDistinctValueStream<T> {
    fn try_value(&self) -> Option<T> {
        self.cell.try_value()
    }

    fn has_value(&self) -> bool {
        self.cell.has_value()
    }

    fn equality(&self) -> EqualityPolicy<T> {
        self.cell.equality().clone()
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for BroadcastDistinctValueStream<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            shared: self.shared.clone(),
        }
    }
}
