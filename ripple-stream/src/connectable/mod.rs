// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Connectable multicast stream with latest-value access and duplicate suppression.
//!
//! A [`DistinctValueConnectableStream`] owns one upstream subscription and fans the
//! distinct values it receives out to any number of listeners. Nothing is pulled
//! from the upstream until the stream is activated through exactly one of:
//!
//! | Mode | Upstream subscribed | Upstream cancelled |
//! |------|---------------------|--------------------|
//! | [`connect`](DistinctValueConnectableStream::connect) | immediately | via the returned [`ConnectionHandle`] |
//! | [`ref_count`](DistinctValueConnectableStream::ref_count) | 0→1 listeners | 1→0 listeners |
//! | [`auto_connect`](DistinctValueConnectableStream::auto_connect) | 0→1 listeners | via the handle passed to the callback |
//!
//! A second activation fails with [`RippleError::Reuse`].
//!
//! ## Example
//!
//! ```
//! use ripple_core::StreamItem;
//! use ripple_stream::{DistinctValueConnectableStream, DistinctValueStream};
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = stream::iter(vec![1, 2, 2, 3].into_iter().map(StreamItem::Value));
//! let connectable = DistinctValueConnectableStream::create(source, None, None);
//!
//! let shared = connectable.ref_count().unwrap();
//! let values: Vec<_> = shared.subscribe().collect().await;
//!
//! assert_eq!(values, vec![StreamItem::Value(1), StreamItem::Value(2), StreamItem::Value(3)]);
//! assert_eq!(shared.value().unwrap(), 3);
//! # }
//! ```

mod forwarder;
mod lifecycle;
mod multicast;

pub use lifecycle::{ConnectionHandle, Lifecycle};
pub use multicast::MulticastValueStream;

use crate::distinct_value_subject::{
    DistinctValueSubject, ListenerTransition, Owner, Replay, ValueSubscription,
};
use crate::upstream::{SingleSubscription, Upstream, UpstreamStream};
use crate::value_stream::DistinctValueStream;
use alloc::boxed::Box;
use alloc::sync::Arc;
use futures::Stream;
use parking_lot::Mutex;
use ripple_core::{ConnectMode, EqualityPolicy, Result, RippleTask, StreamItem};

type OnConnect = Box<dyn FnOnce(ConnectionHandle) + Send>;

struct Control {
    lifecycle: Lifecycle,
    connection: Option<RippleTask>,
    on_connect: Option<OnConnect>,
}

impl Control {
    fn is_forwarding(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|task| !task.is_cancelled())
    }

    fn activate(&mut self, mode: ConnectMode) -> Result<()> {
        self.lifecycle.activate(mode).inspect_err(|error| {
            warn!("activation rejected: {}", error);
        })?;
        debug!("activated via {}", mode);
        Ok(())
    }
}

struct Inner<T: Clone + Send + Sync + 'static> {
    subject: DistinctValueSubject<T>,
    upstream: Box<dyn Upstream<T>>,
    control: Mutex<Control>,
}

impl<T: Clone + Send + Sync + 'static> Inner<T> {
    fn subscribe(this: &Arc<Self>) -> ValueSubscription<T> {
        let owner: Owner = this.clone();
        this.subject.attach(Some(owner))
    }

    fn on_listener_change(this: &Arc<Self>, transition: ListenerTransition) {
        let mut control = this.control.lock();
        let lifecycle = control.lifecycle;
        match lifecycle {
            Lifecycle::Active(ConnectMode::RefCount) => {
                Self::reconcile_ref_count(this, &mut control);
            }
            Lifecycle::Active(ConnectMode::AutoConnect)
                if transition == ListenerTransition::FirstAttached =>
            {
                let pending = Self::start_auto_connect(this, &mut control);
                drop(control);
                if let Some((on_connect, handle)) = pending {
                    on_connect(handle);
                }
            }
            _ => {}
        }
    }

    // Compare against the exact listener count so racing transitions converge
    fn reconcile_ref_count(this: &Arc<Self>, control: &mut Control) {
        let listeners = this.subject.listener_count();
        let forwarding = control.is_forwarding();

        if listeners > 0 && !forwarding && !this.subject.is_closed() {
            debug!("ref_count: connecting upstream for {} listeners", listeners);
            control.connection = Some(forwarder::spawn(this));
        } else if listeners == 0 && forwarding {
            debug!("ref_count: last listener detached, disconnecting upstream");
            if let Some(task) = control.connection.take() {
                task.cancel();
            }
        }
    }

    fn start_auto_connect(
        this: &Arc<Self>,
        control: &mut Control,
    ) -> Option<(OnConnect, ConnectionHandle)> {
        if control.connection.is_some()
            || this.subject.listener_count() == 0
            || this.subject.is_closed()
        {
            return None;
        }

        debug!("auto_connect: first listener attached, connecting upstream");
        let task = forwarder::spawn(this);
        this.subject.set_replay(Replay::WhileLive(task.token()));
        let handle = ConnectionHandle::new(task.token());
        control.connection = Some(task);
        control.on_connect.take().map(|on_connect| (on_connect, handle))
    }
}

impl<T: Clone + Send + Sync + 'static> Drop for Inner<T> {
    fn drop(&mut self) {
        self.subject.close();
    }
}

/// Multicast stream over a single upstream subscription, with a latest-value
/// cache and a distinct-until-changed filter.
///
/// Cheap to clone; clones share the same upstream, cache and lifecycle. The
/// stream stays alive while any clone, view or listener is alive; when the last
/// one is dropped the upstream is cancelled and remaining listeners end.
///
/// See the [module documentation](self) for the activation modes.
pub struct DistinctValueConnectableStream<T: Clone + Send + Sync + 'static> {
    inner: Arc<Inner<T>>,
}

impl<T: Clone + Send + Sync + PartialEq + 'static> DistinctValueConnectableStream<T> {
    /// Wraps `source`, optionally seeded.
    ///
    /// Without an explicit policy, values are compared with `==`.
    pub fn create<S>(source: S, seed: Option<T>, equality: Option<EqualityPolicy<T>>) -> Self
    where
        S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    {
        Self::with_policy(source, seed, equality.unwrap_or_default())
    }
}

impl<T: Clone + Send + Sync + 'static> DistinctValueConnectableStream<T> {
    /// Wraps `source`, filtering consecutive duplicates with `equality`.
    pub fn with_policy<S>(source: S, seed: Option<T>, equality: EqualityPolicy<T>) -> Self
    where
        S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    {
        Self::from_upstream(SingleSubscription::new(source), seed, equality)
    }

    /// Builds a connectable stream over any [`Upstream`].
    ///
    /// When the upstream reports itself as distinct, its values skip the
    /// equality check.
    pub fn from_upstream<U>(upstream: U, seed: Option<T>, equality: EqualityPolicy<T>) -> Self
    where
        U: Upstream<T>,
    {
        let inner = Arc::new(Inner {
            subject: DistinctValueSubject::with_replay(seed, equality, Replay::Off),
            upstream: Box::new(upstream),
            control: Mutex::new(Control {
                lifecycle: Lifecycle::Unconnected,
                connection: None,
                on_connect: None,
            }),
        });

        let owner = Arc::downgrade(&inner);
        inner.subject.on_listener_change(move |transition| {
            if let Some(inner) = owner.upgrade() {
                Inner::on_listener_change(&inner, transition);
            }
        });

        Self { inner }
    }

    /// Subscribes to the upstream now.
    ///
    /// Forwarding continues until the upstream completes or the returned handle is
    /// cancelled. A cancelled connection is never restarted.
    ///
    /// # Errors
    ///
    /// Returns [`RippleError::Reuse`](ripple_core::RippleError::Reuse) if the stream
    /// was already activated.
    pub fn connect(&self) -> Result<ConnectionHandle> {
        let mut control = self.inner.control.lock();
        control.activate(ConnectMode::Manual)?;

        // Listeners attached so far get the cached value ahead of the first forwarded one
        self.inner.subject.set_replay(Replay::Always);
        let task = forwarder::spawn(&self.inner);
        self.inner.subject.set_replay(Replay::WhileLive(task.token()));
        let handle = ConnectionHandle::new(task.token());
        control.connection = Some(task);
        Ok(handle)
    }

    /// Connects while at least one listener is attached.
    ///
    /// The first listener subscribes to the upstream; the last one to detach
    /// cancels it. A later listener reconnects, resuming with the cached value
    /// intact. Listeners attached before this call count immediately.
    ///
    /// # Errors
    ///
    /// Returns [`RippleError::Reuse`](ripple_core::RippleError::Reuse) if the stream
    /// was already activated.
    pub fn ref_count(&self) -> Result<MulticastValueStream<T>> {
        let mut control = self.inner.control.lock();
        control.activate(ConnectMode::RefCount)?;
        self.inner.subject.set_replay(Replay::Always);
        Inner::reconcile_ref_count(&self.inner, &mut control);
        drop(control);

        Ok(MulticastValueStream::new(Arc::clone(&self.inner)))
    }

    /// Connects when the first listener attaches and never disconnects on its own.
    ///
    /// # Errors
    ///
    /// Returns [`RippleError::Reuse`](ripple_core::RippleError::Reuse) if the stream
    /// was already activated.
    pub fn auto_connect(&self) -> Result<MulticastValueStream<T>> {
        self.auto_connect_with(|_| {})
    }

    /// Like [`auto_connect`](Self::auto_connect), handing the connection handle
    /// to `on_connect` once the upstream is subscribed.
    ///
    /// `on_connect` runs at most once, on the thread that attached the first listener.
    ///
    /// # Errors
    ///
    /// Returns [`RippleError::Reuse`](ripple_core::RippleError::Reuse) if the stream
    /// was already activated.
    pub fn auto_connect_with<F>(&self, on_connect: F) -> Result<MulticastValueStream<T>>
    where
        F: FnOnce(ConnectionHandle) + Send + 'static,
    {
        let mut control = self.inner.control.lock();
        control.activate(ConnectMode::AutoConnect)?;
        self.inner.subject.set_replay(Replay::Always);
        control.on_connect = Some(Box::new(on_connect));

        let pending = Inner::start_auto_connect(&self.inner, &mut control);
        drop(control);
        if let Some((on_connect, handle)) = pending {
            on_connect(handle);
        }

        Ok(MulticastValueStream::new(Arc::clone(&self.inner)))
    }

    /// Activates reference counting on a stream nobody else has seen yet.
    pub(crate) fn into_ref_counted(self) -> MulticastValueStream<T> {
        self.inner.control.lock().lifecycle = Lifecycle::Active(ConnectMode::RefCount);
        self.inner.subject.set_replay(Replay::Always);
        MulticastValueStream::new(self.inner)
    }

    /// Attaches a listener.
    ///
    /// Nothing is delivered before activation. Once the stream is activated the
    /// listener first receives the cached value, if any, then every forwarded one.
    /// After a manual or auto connection is cancelled, new listeners get no replay.
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

    /// The activated mode, if any.
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

impl<T> DistinctValueStream<T> for DistinctValueConnectableStream<T>
where
    T: Clone + Send + Sync + 'static,
{
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

impl<T: Clone + Send + Sync + 'static> Upstream<T> for DistinctValueConnectableStream<T> {
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

impl<T: Clone + Send + Sync + 'static> Clone for DistinctValueConnectableStream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
