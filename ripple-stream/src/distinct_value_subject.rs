// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-listener subject that remembers its latest distinct value.
//!
//! A [`DistinctValueSubject`] pushes each accepted value to all attached listeners.
//! Values pass through a [`ValueCell`] first, so consecutive duplicates (per the
//! subject's [`EqualityPolicy`]) never reach anybody.
//!
//! ## Characteristics
//!
//! - **Replaying**: a new listener immediately receives the latest cached value, if any.
//! - **Unbounded**: one unbounded mpsc queue per listener (no backpressure).
//! - **Eager bookkeeping**: dropping a [`ValueSubscription`] detaches it at once, so
//!   [`listener_count`](DistinctValueSubject::listener_count) is always exact.
//! - **Listener hooks**: handlers registered with
//!   [`on_listener_change`](DistinctValueSubject::on_listener_change) observe the
//!   0→1 and 1→0 transitions of the listener count.
//! - **Value-only push API**: [`add_error`](DistinctValueSubject::add_error) is rejected;
//!   only the connectable stream forwards upstream errors.
//!
//! ## Example
//!
//! ```
//! use ripple_core::{EqualityPolicy, StreamItem};
//! use ripple_stream::DistinctValueSubject;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = DistinctValueSubject::new(Some(0), EqualityPolicy::structural());
//! let mut listener = subject.subscribe();
//!
//! subject.add(0).unwrap(); // equal to the seed, dropped
//! subject.add(1).unwrap();
//! subject.close();
//!
//! assert_eq!(listener.next().await, Some(StreamItem::Value(0))); // replayed seed
//! assert_eq!(listener.next().await, Some(StreamItem::Value(1)));
//! assert_eq!(listener.next().await, None);
//! # }
//! ```

use crate::value_stream::DistinctValueStream;
use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::any::Any;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use ripple_core::{
    Acceptance, CancellationToken, EqualityPolicy, Result, RippleError, StreamItem, ValueCell,
};

/// A change in the number of attached listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerTransition {
    /// The listener count went from zero to one.
    FirstAttached,
    /// The listener count went from one to zero.
    LastDetached,
}

type ListenerHook = Arc<dyn Fn(ListenerTransition) + Send + Sync>;

/// Keeps the owner of a subject alive for as long as one of its listeners is.
pub(crate) type Owner = Arc<dyn Any + Send + Sync>;

/// Whether a newly attached listener receives the cached value.
#[derive(Debug, Clone)]
pub(crate) enum Replay {
    Off,
    Always,
    /// Until the connection behind the token is cancelled
    WhileLive(CancellationToken),
}

impl Replay {
    fn is_on(&self) -> bool {
        match self {
            Self::Off => false,
            Self::Always => true,
            Self::WhileLive(token) => !token.is_cancelled(),
        }
    }
}

struct SubjectState<T> {
    closed: bool,
    next_id: u64,
    senders: Vec<(u64, UnboundedSender<StreamItem<T>>)>,
    hooks: Vec<ListenerHook>,
    replay: Replay,
}

impl<T: Clone> SubjectState<T> {
    fn broadcast(&mut self, item: &StreamItem<T>) {
        self.senders.retain(|(_, tx)| tx.unbounded_send(item.clone()).is_ok());
    }
}

/// Multicast subject with a latest-value cell and a distinct filter.
///
/// See the [module documentation](self) for details.
pub struct DistinctValueSubject<T: Clone + Send + Sync + 'static> {
    state: Arc<Mutex<SubjectState<T>>>,
    cell: ValueCell<T>,
}

impl<T: Clone + Send + Sync + 'static> DistinctValueSubject<T> {
    /// Creates an open subject, optionally seeded, filtering with `equality`.
    #[must_use]
    pub fn new(seed: Option<T>, equality: EqualityPolicy<T>) -> Self {
        Self::with_replay(seed, equality, Replay::Always)
    }

    pub(crate) fn with_replay(
        seed: Option<T>,
        equality: EqualityPolicy<T>,
        replay: Replay,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                closed: false,
                next_id: 0,
                senders: Vec::new(),
                hooks: Vec::new(),
                replay,
            })),
            cell: ValueCell::new(seed, equality),
        }
    }

    /// Attaches a new listener.
    ///
    /// The listener first receives the cached value (if any), then every value
    /// accepted afterwards. Subscribing to a closed subject yields the cached value
    /// and then ends.
    pub fn subscribe(&self) -> ValueSubscription<T> {
        self.attach(None)
    }

    // The replay decision and the registration happen under one lock, so a
    // concurrent `set_replay` either sees this listener or is seen by it
    pub(crate) fn attach(&self, owner: Option<Owner>) -> ValueSubscription<T> {
        let (tx, rx) = mpsc::unbounded();

        let (id, hooks) = {
            let mut state = self.state.lock();
            if let Some(latest) = self.cell.try_value().filter(|_| state.replay.is_on()) {
                let _ = tx.unbounded_send(StreamItem::Value(latest));
            }
            if state.closed {
                return ValueSubscription::detached(rx, owner);
            }

            let id = state.next_id;
            state.next_id += 1;
            state.senders.push((id, tx));

            let hooks = if state.senders.len() == 1 {
                state.hooks.clone()
            } else {
                Vec::new()
            };
            (id, hooks)
        };

        trace!("listener {} attached", id);
        for hook in hooks {
            hook(ListenerTransition::FirstAttached);
        }

        ValueSubscription {
            receiver: Mutex::new(rx),
            registration: Some(Registration {
                id,
                state: Arc::downgrade(&self.state),
            }),
            _owner: owner,
        }
    }

    /// Offers `value` to the distinct filter and broadcasts it if accepted.
    ///
    /// # Errors
    ///
    /// - [`RippleError::Closed`] if the subject has been closed.
    /// - [`RippleError::PolicyEvaluation`] if the equality policy failed. The error
    ///   is also broadcast to all listeners; the value is neither cached nor sent.
    pub fn add(&self, value: T) -> Result<Acceptance> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(RippleError::Closed);
        }

        match self.cell.accept(value.clone()) {
            Ok(Acceptance::Accepted) => {
                state.broadcast(&StreamItem::Value(value));
                Ok(Acceptance::Accepted)
            }
            Ok(Acceptance::Suppressed) => Ok(Acceptance::Suppressed),
            Err(error) => {
                error!("equality policy failed, value dropped: {}", error);
                state.broadcast(&StreamItem::Error(error.clone()));
                Err(error)
            }
        }
    }

    /// Caches and broadcasts `value` without consulting the equality policy.
    ///
    /// Used when the producer is itself distinct.
    pub(crate) fn add_unfiltered(&self, value: T) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(RippleError::Closed);
        }

        self.cell.accept_unfiltered(value.clone());
        state.broadcast(&StreamItem::Value(value));
        Ok(())
    }

    /// Changes the replay rule for listeners attached from now on.
    ///
    /// When replay turns on, listeners that are already attached receive the
    /// cached value immediately, ahead of anything added afterwards.
    pub(crate) fn set_replay(&self, replay: Replay) {
        let mut state = self.state.lock();
        let was_on = state.replay.is_on();
        state.replay = replay;
        if was_on || !state.replay.is_on() || state.closed {
            return;
        }

        if let Some(latest) = self.cell.try_value() {
            trace!("replaying cached value to {} listeners", state.senders.len());
            state.broadcast(&StreamItem::Value(latest));
        }
    }

    /// Errors cannot be pushed into a distinct value subject.
    ///
    /// Nothing is cached or broadcast.
    ///
    /// # Errors
    ///
    /// Always returns [`RippleError::InvalidState`].
    pub fn add_error(&self, error: RippleError) -> Result<()> {
        warn!("rejected error pushed into distinct value subject: {}", error);
        self.cell.reject_error(&error)
    }

    /// Broadcasts an upstream error to every listener without closing the subject.
    pub(crate) fn forward_error(&self, error: RippleError) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(RippleError::Closed);
        }

        state.broadcast(&StreamItem::Error(error));
        Ok(())
    }

    /// Closes the subject, ending every listener stream.
    ///
    /// After closing:
    /// - `add()` returns [`RippleError::Closed`].
    /// - `subscribe()` replays the cached value and ends.
    /// - The cached value stays readable.
    ///
    /// Closing is idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if !state.closed {
            debug!("distinct value subject closed with {} listeners", state.senders.len());
        }
        state.closed = true;
        state.senders.clear();
    }

    /// Returns `true` if the subject has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of currently attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.lock().senders.len()
    }

    /// Registers a handler for listener-count transitions.
    ///
    /// Handlers run on the thread that attached or detached the listener,
    /// after the subject's internal lock has been released.
    pub fn on_listener_change<F>(&self, hook: F)
    where
        F: Fn(ListenerTransition) + Send + Sync + 'static,
    {
        self.state.lock().hooks.push(Arc::new(hook));
    }
}

impl<T: Clone + Send + Sync + 'static> DistinctValueStream<T> for DistinctValueSubject<T> {
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

impl<T: Clone + Send + Sync + PartialEq + 'static> Default for DistinctValueSubject<T> {
    fn default() -> Self {
        Self::new(None, EqualityPolicy::structural())
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for DistinctValueSubject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            cell: self.cell.clone(),
        }
    }
}

struct Registration<T> {
    id: u64,
    state: Weak<Mutex<SubjectState<T>>>,
}

/// A listener attached to a [`DistinctValueSubject`].
///
/// Dropping it detaches the listener immediately.
pub struct ValueSubscription<T> {
    receiver: Mutex<UnboundedReceiver<StreamItem<T>>>,
    registration: Option<Registration<T>>,
    _owner: Option<Owner>,
}

impl<T> ValueSubscription<T> {
    fn detached(receiver: UnboundedReceiver<StreamItem<T>>, owner: Option<Owner>) -> Self {
        Self {
            receiver: Mutex::new(receiver),
            registration: None,
            _owner: owner,
        }
    }
}

impl<T> Stream for ValueSubscription<T> {
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.get_mut().poll_next_unpin(cx)
    }
}

impl<T> Drop for ValueSubscription<T> {
    fn drop(&mut self) {
        let Some(registration) = self.registration.take() else {
            return;
        };
        let Some(state) = registration.state.upgrade() else {
            return;
        };

        let hooks = {
            let mut state = state.lock();
            let before = state.senders.len();
            state.senders.retain(|(id, _)| *id != registration.id);
            if before == 1 && state.senders.is_empty() && !state.closed {
                state.hooks.clone()
            } else {
                Vec::new()
            }
        };

        trace!("listener {} detached", registration.id);
        for hook in hooks {
            hook(ListenerTransition::LastDetached);
        }
    }
}
