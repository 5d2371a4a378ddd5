// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A stream wrapper that records how often it is polled.

use futures::Stream;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// Shared view of a [`PollCountingStream`]'s poll count.
#[derive(Clone, Debug, Default)]
pub struct PollCounter(Arc<AtomicUsize>);

impl PollCounter {
    /// Number of `poll_next` calls so far.
    #[must_use]
    pub fn polls(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Forwards `inner` unchanged, counting every `poll_next`.
///
/// # Examples
///
/// ```rust
/// use ripple_test_utils::PollCountingStream;
/// use futures::{stream, StreamExt};
///
/// # async fn example() {
/// let (mut counted, counter) = PollCountingStream::new(stream::iter(vec![1]));
/// assert_eq!(counter.polls(), 0);
///
/// assert_eq!(counted.next().await, Some(1));
/// assert_eq!(counter.polls(), 1);
/// # }
/// ```
pub struct PollCountingStream<S> {
    inner: S,
    counter: PollCounter,
}

impl<S> PollCountingStream<S> {
    /// Wraps `inner`, returning the stream and a handle to its poll count.
    pub fn new(inner: S) -> (Self, PollCounter) {
        let counter = PollCounter::default();
        let stream = Self {
            inner,
            counter: counter.clone(),
        };
        (stream, counter)
    }
}

impl<S> Stream for PollCountingStream<S>
where
    S: Stream + Unpin,
{
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.counter.0.fetch_add(1, Ordering::SeqCst);
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
