// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-listener distinct operator with latest-value access.
//!
//! [`distinct_value`](DistinctValueExt::distinct_value) filters consecutive
//! duplicates out of a stream and remembers the last value it let through. Unlike
//! the connectable stream it does not multicast: it is an ordinary stream that is
//! polled by one consumer. Call [`into_broadcast`](DistinctValue::into_broadcast)
//! to share it.
//!
//! The seed is never emitted; it only takes part in filtering and is readable
//! through [`DistinctValueStream::value`].

use crate::value_stream::DistinctValueStream;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{ready, Stream};
use pin_project::pin_project;
use ripple_core::{Acceptance, EqualityPolicy, StreamItem, ValueCell};

/// Extension trait providing the `distinct_value` operator.
pub trait DistinctValueExt<T>: Stream<Item = StreamItem<T>> + Sized
where
    T: Clone + Send + Sync + 'static,
{
    /// Suppresses consecutive duplicates compared with `==`.
    ///
    /// # Example
    ///
    /// ```
    /// use ripple_core::StreamItem;
    /// use ripple_stream::{DistinctValueExt, DistinctValueStream};
    /// use futures::{stream, StreamExt};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let source = stream::iter(vec![1, 1, 2, 2, 1].into_iter().map(StreamItem::Value));
    /// let mut distinct = source.distinct_value(Some(1));
    ///
    /// assert_eq!(distinct.next().await, Some(StreamItem::Value(2)));
    /// assert_eq!(distinct.next().await, Some(StreamItem::Value(1)));
    /// assert_eq!(distinct.next().await, None);
    /// assert_eq!(distinct.value().unwrap(), 1);
    /// # }
    /// ```
    fn distinct_value(self, seed: Option<T>) -> DistinctValue<Self, T>
    where
        T: PartialEq;

    /// Suppresses consecutive duplicates according to `equality`.
    ///
    /// A failing policy yields a [`StreamItem::Error`] in place of the value.
    fn distinct_value_by(
        self,
        seed: Option<T>,
        equality: EqualityPolicy<T>,
    ) -> DistinctValue<Self, T>;
}

impl<S, T> DistinctValueExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
    T: Clone + Send + Sync + 'static,
{
    fn distinct_value(self, seed: Option<T>) -> DistinctValue<Self, T>
    where
        T: PartialEq,
    {
        self.distinct_value_by(seed, EqualityPolicy::structural())
    }

    fn distinct_value_by(
        self,
        seed: Option<T>,
        equality: EqualityPolicy<T>,
    ) -> DistinctValue<Self, T> {
        DistinctValue {
            source: self,
            cell: ValueCell::new(seed, equality),
        }
    }
}

/// Stream returned by [`DistinctValueExt::distinct_value`].
#[pin_project]
pub struct DistinctValue<S, T> {
    #[pin]
    source: S,
    pub(crate) cell: ValueCell<T>,
}

impl<S, T> Stream for DistinctValue<S, T>
where
    S: Stream<Item = StreamItem<T>>,
    T: Clone,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            match ready!(this.source.as_mut().poll_next(cx)) {
                Some(StreamItem::Value(value)) => match this.cell.accept(value.clone()) {
                    Ok(Acceptance::Accepted) => return Poll::Ready(Some(StreamItem::Value(value))),
                    Ok(Acceptance::Suppressed) => continue,
                    Err(error) => return Poll::Ready(Some(StreamItem::Error(error))),
                },
                other => return Poll::Ready(other),
            }
        }
    }
}

impl<S, T: Clone> DistinctValueStream<T> for DistinctValue<S, T> {
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
