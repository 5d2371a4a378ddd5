// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::{Inner, Lifecycle};
use crate::distinct_value_subject::ValueSubscription;
use crate::upstream::{Upstream, UpstreamStream};
use crate::value_stream::DistinctValueStream;
use alloc::boxed::Box;
use alloc::sync::Arc;
use ripple_core::{ConnectMode, EqualityPolicy};

/// Activated view of a connectable stream, returned by
/// [`ref_count`](super::DistinctValueConnectableStream::ref_count) and
/// [`auto_connect`](super::DistinctValueConnectableStream::auto_connect).
///
/// Attaching and detaching listeners drives the upstream connection according to
/// the activated mode. The latest value is readable at any time through
/// [`DistinctValueStream`].
pub struct MulticastValueStream<T: Clone + Send + Sync + 'static> {
    inner: Arc<Inner<T>>,
}

impl<T: Clone + Send + Sync + 'static> MulticastValueStream<T> {
    pub(super) fn new(inner: Arc<Inner<T>>) -> Self {
        Self { inner }
    }

    /// Attaches a listener, replaying the cached value first.
    pub fn subscribe(&self) -> ValueSubscription<T> {
        Inner::subscribe(&self.inner)
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.subject.listener_count()
    }

    /// Returns `true` once the upstream has completed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.subject.is_closed()
    }

    /// The mode this view was activated with.
    #[must_use]
    pub fn mode(&self) -> Option<ConnectMode> {
        self.lifecycle().mode()
    }

    /// Current activation state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.control.lock().lifecycle
    }
}

impl<T: Clone + Send + Sync + 'static> DistinctValueStream<T> for MulticastValueStream<T> {
    fn try_value(&self) -> Option<T> {
        self.inner.subject.try_value()
    }

    fn has_value(&self) -> bool {
        self.inner.subject.has_value()
    }

    fn equality(&self) -> EqualityPolicy<T> {
        self.inner.subject.equality()
    }
}

impl<T: Clone + Send + Sync + 'static> Upstream<T> for MulticastValueStream<T> {
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

impl<T: Clone + Send + Sync + 'static> Clone for MulticastValueStream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
