// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Distinct-value connectable streams.
//!
//! This crate turns a single-subscription stream into a multicast one that
//! remembers its latest value and suppresses consecutive duplicates.
//!
//! # Architecture
//!
//! ```text
//! upstream ──► connectable stream ──► distinct filter ──► value cell ──► subject ──► N listeners
//! ```
//!
//! - **[`DistinctValueSubject`]**: the multicast primitive. Replays the latest value to new
//!   listeners and reports listener-count transitions.
//! - **[`DistinctValueConnectableStream`]**: owns the single upstream subscription and
//!   decides when it is live, through one of three activation modes.
//! - **[`Upstream`]**: what a connectable stream pulls from. Plain streams are wrapped in a
//!   [`SingleSubscription`]; subjects and other connectable streams are broadcast sources.
//! - **[`DistinctValueStream`]**: synchronous `value()` access, implemented by every type
//!   that caches a value.
//!
//! # Activation modes
//!
//! | Method | Starts | Stops |
//! |--------|--------|-------|
//! | [`connect`](DistinctValueConnectableStream::connect) | immediately | [`ConnectionHandle::cancel`] |
//! | [`ref_count`](DistinctValueConnectableStream::ref_count) | first listener | last listener leaves |
//! | [`auto_connect`](DistinctValueConnectableStream::auto_connect) | first listener | [`ConnectionHandle::cancel`] |
//!
//! Only one activation is allowed per stream; a second one fails with
//! [`RippleError::Reuse`](ripple_core::RippleError::Reuse).
//!
//! # Quick start
//!
//! ```
//! use ripple_core::StreamItem;
//! use ripple_stream::prelude::*;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx, rx) = futures::channel::mpsc::unbounded();
//! let temperature = rx.share_value_distinct(Some(20));
//!
//! let mut display = temperature.subscribe();
//! assert_eq!(display.next().await, Some(StreamItem::Value(20)));
//!
//! tx.unbounded_send(StreamItem::Value(20)).unwrap(); // unchanged, suppressed
//! tx.unbounded_send(StreamItem::Value(21)).unwrap();
//!
//! assert_eq!(display.next().await, Some(StreamItem::Value(21)));
//! assert_eq!(temperature.value().unwrap(), 21);
//! # }
//! ```
//!
//! # Errors
//!
//! Errors from the upstream travel to listeners as [`StreamItem::Error`](ripple_core::StreamItem)
//! and do not close the stream. Misuse (reading an empty value, activating twice, pushing an
//! error into a subject) is reported synchronously through
//! [`Result`](ripple_core::Result).

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

extern crate alloc;

#[macro_use]
mod logging;

#[cfg(feature = "runtime-tokio")]
pub mod broadcast;
#[cfg(feature = "runtime-tokio")]
pub mod connectable;
pub mod distinct_value;
pub mod distinct_value_subject;
pub mod prelude;
#[cfg(feature = "runtime-tokio")]
pub mod publish_value_distinct;
pub mod upstream;
pub mod value_stream;

#[cfg(feature = "runtime-tokio")]
pub use broadcast::BroadcastDistinctValueStream;
#[cfg(feature = "runtime-tokio")]
pub use connectable::{
    ConnectionHandle, DistinctValueConnectableStream, Lifecycle, MulticastValueStream,
};
pub use distinct_value::{DistinctValue, DistinctValueExt};
pub use distinct_value_subject::{DistinctValueSubject, ListenerTransition, ValueSubscription};
#[cfg(feature = "runtime-tokio")]
pub use publish_value_distinct::PublishValueDistinctExt;
pub use upstream::{SingleSubscription, Upstream, UpstreamStream};
pub use value_stream::DistinctValueStream;
