// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Ripple
//!
//! Multicast streams that remember their latest value and never repeat it.
//!
//! ## Overview
//!
//! Ripple wraps a single upstream subscription and shares it between any number of
//! listeners. Along the way it drops consecutive duplicates (according to an
//! [`EqualityPolicy`]) and keeps the last value it let through, readable at any
//! time with [`DistinctValueStream::value`].
//!
//! When the upstream is actually subscribed is up to you:
//!
//! - [`connect`](DistinctValueConnectableStream::connect): right away, until cancelled.
//! - [`ref_count`](DistinctValueConnectableStream::ref_count): while anybody listens.
//! - [`auto_connect`](DistinctValueConnectableStream::auto_connect): from the first listener on.
//!
//! ## Design Philosophy
//!
//! - **Production code**: build a [`DistinctValueConnectableStream`] with
//!   [`publish_value_distinct`](PublishValueDistinctExt::publish_value_distinct), or a
//!   ref-counted [`MulticastValueStream`] with
//!   [`share_value_distinct`](PublishValueDistinctExt::share_value_distinct).
//! - **Test code**: use `test_channel` (from `ripple-test-utils`) to push values imperatively.
//!
//! ## Quick Start
//!
//! ```rust
//! use ripple_rx::prelude::*;
//! use futures::StreamExt;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, rx) = mpsc::unbounded_channel::<&str>();
//!     let status = rx.share_value_distinct(Some("idle"));
//!
//!     let mut listener = status.subscribe();
//!     tx.send("idle").unwrap();
//!     tx.send("busy").unwrap();
//!
//!     assert_eq!(listener.next().await, Some(StreamItem::Value("idle")));
//!     assert_eq!(listener.next().await, Some(StreamItem::Value("busy")));
//!     assert_eq!(status.value().unwrap(), "busy");
//! }
//! ```

pub mod receiver_ext;

// Re-export core types
pub use ripple_core::{
    Acceptance, ConnectMode, EqualityPolicy, Result, RippleError, StreamItem, ValueCell,
};

// Re-export the stream types
pub use ripple_stream::{
    BroadcastDistinctValueStream, ConnectionHandle, DistinctValue, DistinctValueConnectableStream,
    DistinctValueExt, DistinctValueStream, DistinctValueSubject, Lifecycle, ListenerTransition,
    MulticastValueStream, PublishValueDistinctExt, SingleSubscription, Upstream,
    ValueSubscription,
};

pub use receiver_ext::UnboundedReceiverExt;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::receiver_ext::UnboundedReceiverExt;
    pub use ripple_core::{ConnectMode, EqualityPolicy, StreamItem};
    pub use ripple_stream::prelude::*;
    pub use ripple_stream::{DistinctValueConnectableStream, MulticastValueStream};
}
