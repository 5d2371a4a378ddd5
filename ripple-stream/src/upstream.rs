// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sources a connectable stream can pull from.
//!
//! An [`Upstream`] hands out a fresh stream every time the connectable stream
//! (re)connects. Broadcast sources such as [`DistinctValueSubject`] simply attach a
//! new listener. Plain single-subscription streams are wrapped in a
//! [`SingleSubscription`], which leases the one underlying stream to at most one
//! consumer at a time and takes it back when the lease is dropped.

use crate::distinct_value_subject::DistinctValueSubject;
use alloc::boxed::Box;
use alloc::sync::Arc;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use event_listener::{Event, EventListener};
use futures::stream::{Fuse, Stream, StreamExt};
use parking_lot::Mutex;
use ripple_core::StreamItem;

/// Boxed stream handed out by [`Upstream::listen`].
pub type UpstreamStream<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send + 'static>>;

/// A producer of values that a connectable stream subscribes to.
pub trait Upstream<T>: Send + Sync + 'static {
    /// Starts listening. Dropping the returned stream stops listening.
    fn listen(&self) -> UpstreamStream<T>;

    /// Returns `true` if the source supports any number of concurrent listeners.
    fn is_broadcast(&self) -> bool;

    /// Returns `true` if the source never emits two consecutive equal values.
    ///
    /// Values from a distinct source skip the equality check.
    fn is_distinct(&self) -> bool {
        false
    }
}

struct LeaseSlot<S> {
    stream: Mutex<Option<S>>,
    returned: Event,
}

/// Adapts a single-subscription stream into an [`Upstream`].
///
/// Each [`listen`](Upstream::listen) returns a lease on the underlying stream.
/// Dropping the lease hands the stream back, so a later `listen` resumes where the
/// previous one stopped. While a lease is live, a new lease waits for it to be
/// returned rather than failing.
pub struct SingleSubscription<S> {
    slot: Arc<LeaseSlot<Fuse<S>>>,
    distinct: bool,
}

impl<S: Stream> SingleSubscription<S> {
    /// Wraps `source`.
    pub fn new(source: S) -> Self {
        Self::build(source, false)
    }

    /// Wraps a `source` that is known to never repeat a value.
    pub fn distinct(source: S) -> Self {
        Self::build(source, true)
    }

    fn build(source: S, distinct: bool) -> Self {
        Self {
            slot: Arc::new(LeaseSlot {
                stream: Mutex::new(Some(source.fuse())),
                returned: Event::new(),
            }),
            distinct,
        }
    }
}

impl<S, T> Upstream<T> for SingleSubscription<S>
where
    S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    T: Send + 'static,
{
    fn listen(&self) -> UpstreamStream<T> {
        Box::pin(Lease {
            slot: Arc::clone(&self.slot),
            held: None,
            listener: None,
        })
    }

    fn is_broadcast(&self) -> bool {
        false
    }

    fn is_distinct(&self) -> bool {
        self.distinct
    }
}

struct Lease<S> {
    slot: Arc<LeaseSlot<S>>,
    held: Option<S>,
    listener: Option<EventListener>,
}

impl<S: Stream + Unpin> Stream for Lease<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(stream) = this.held.as_mut() {
                return stream.poll_next_unpin(cx);
            }

            if let Some(stream) = this.slot.stream.lock().take() {
                this.held = Some(stream);
                this.listener = None;
                continue;
            }

            match this.listener.as_mut() {
                // Re-check the slot after registering; the previous lease may have just returned it
                None => this.listener = Some(this.slot.returned.listen()),
                Some(listener) => {
                    if Pin::new(listener).poll(cx).is_pending() {
                        return Poll::Pending;
                    }
                    this.listener = None;
                }
            }
        }
    }
}

impl<S> Drop for Lease<S> {
    fn drop(&mut self) {
        if let Some(stream) = self.held.take() {
            *self.slot.stream.lock() = Some(stream);
            self.slot.returned.notify(usize::MAX);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Upstream<T> for DistinctValueSubject<T> {
    fn listen(&self) -> UpstreamStream<T> {
        Box::pin(self.subscribe())
    }

    fn is_broadcast(&self) -> bool {
        true
    }

    fn is_distinct(&self) -> bool {
        true
    }
}
