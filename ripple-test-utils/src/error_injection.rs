// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for error injection in streams.
//!
//! [`ErrorInjectingStream`] wraps a plain stream, emitting its items as
//! `StreamItem::Value` and inserting one `StreamItem::Error` at a chosen position.

use futures::Stream;
use ripple_core::{RippleError, StreamItem};
use std::pin::Pin;
use std::task::{Context, Poll};

/// A stream wrapper that injects an error at a specified position.
///
/// # Examples
///
/// ```rust
/// use ripple_test_utils::ErrorInjectingStream;
/// use ripple_core::StreamItem;
/// use futures::{stream, StreamExt};
///
/// # async fn example() {
/// let mut error_stream = ErrorInjectingStream::new(stream::iter(vec![1, 2]), 1);
///
/// assert_eq!(error_stream.next().await, Some(StreamItem::Value(1)));
/// assert!(error_stream.next().await.unwrap().is_error());
/// assert_eq!(error_stream.next().await, Some(StreamItem::Value(2)));
/// # }
/// ```
pub struct ErrorInjectingStream<S> {
    inner: S,
    inject_error_at: Option<usize>,
    count: usize,
}

impl<S> ErrorInjectingStream<S> {
    /// Wraps `inner`, injecting an error at position `inject_error_at` (0-indexed).
    pub fn new(inner: S, inject_error_at: usize) -> Self {
        Self {
            inner,
            inject_error_at: Some(inject_error_at),
            count: 0,
        }
    }
}

impl<S> Stream for ErrorInjectingStream<S>
where
    S: Stream + Unpin,
{
    type Item = StreamItem<S::Item>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.inject_error_at == Some(self.count) {
            self.inject_error_at = None;
            self.count += 1;
            return Poll::Ready(Some(StreamItem::Error(RippleError::stream_error(
                "Injected test error",
            ))));
        }

        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(item)) => {
                self.count += 1;
                Poll::Ready(Some(StreamItem::Value(item)))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
