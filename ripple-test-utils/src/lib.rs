// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the ripple workspace.
//!
//! This crate provides channels, stream assertions and fixture types for testing
//! distinct-value streams. It is meant for development and testing only.
//!
//! # Architecture
//!
//! Production code consumes streams; tests need to push values imperatively.
//! The helpers here bridge the two:
//!
//! - [`test_channel`] / [`test_channel_with_errors`] give a sender plus a
//!   `Stream<Item = StreamItem<T>>` to feed into the code under test.
//! - [`helpers`] awaits items with a timeout so a broken test fails instead of hanging.
//!
//! # Example
//!
//! ```rust
//! use ripple_test_utils::helpers::{assert_stream_ended, unwrap_stream, unwrap_value};
//! use ripple_test_utils::test_channel;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx, mut stream) = test_channel::<i32>();
//!
//! tx.send(7).unwrap();
//! drop(tx);
//!
//! assert_eq!(unwrap_value(Some(unwrap_stream(&mut stream, 500).await)), 7);
//! assert_stream_ended(&mut stream, 500).await;
//! # }
//! ```
//!
//! # Module Organization
//!
//! - `helpers` - Assertion and await helpers
//! - `person` - The `Person` fixture type
//! - `test_data` - Pre-built fixture values
//! - `error_injection` - A stream wrapper that injects an error
//! - `poll_counting` - A stream wrapper that counts polls

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error_injection;
pub mod helpers;
pub mod person;
pub mod poll_counting;
pub mod test_data;

use futures::{Stream, StreamExt};
use ripple_core::StreamItem;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

// Re-export commonly used test utilities
pub use error_injection::ErrorInjectingStream;
pub use helpers::{assert_no_element_emitted, assert_stream_ended, unwrap_stream, unwrap_value};
pub use person::Person;
pub use poll_counting::{PollCounter, PollCountingStream};

/// Creates a test channel that automatically wraps values in `StreamItem::Value`.
///
/// The returned stream is `Unpin` and `Send`, so it can be handed straight to
/// the connectable stream constructors.
///
/// # Example
///
/// ```rust
/// use ripple_test_utils::test_channel;
/// use ripple_test_utils::test_data::person_alice;
/// use futures::StreamExt;
///
/// # async fn example() {
/// let (tx, mut stream) = test_channel();
///
/// tx.send(person_alice()).unwrap();
///
/// let person = stream.next().await.unwrap().unwrap();
/// assert_eq!(person.name, "Alice");
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts `StreamItem<T>` for testing error propagation.
///
/// # Example
///
/// ```rust
/// use ripple_test_utils::test_channel_with_errors;
/// use ripple_core::{RippleError, StreamItem};
/// use futures::StreamExt;
///
/// # async fn example() {
/// let (tx, mut stream) = test_channel_with_errors();
///
/// tx.send(StreamItem::Value(42)).unwrap();
/// tx.send(StreamItem::Error(RippleError::stream_error("test error"))).unwrap();
///
/// assert!(stream.next().await.unwrap().is_value());
/// assert!(stream.next().await.unwrap().is_error());
/// # }
/// ```
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}
