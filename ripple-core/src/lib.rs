// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types for Ripple distinct-value streams.
//!
//! - [`RippleError`] / [`Result`]: the root error type
//! - [`StreamItem`]: value-or-error items flowing through every stream
//! - [`EqualityPolicy`]: the pluggable "are these two values the same" predicate
//! - [`ValueCell`]: latest-value cache guarded by the distinct filter
//! - [`ConnectMode`]: the lifecycle activation modes of a connectable stream
//! - [`CancellationToken`] / [`RippleTask`]: cooperative cancellation for forwarding tasks

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

extern crate alloc;

pub mod cancellation_token;
pub mod connect_mode;
pub mod equality;
pub mod error;
pub mod ripple_task;
pub mod stream_item;
pub mod value_cell;

pub use self::cancellation_token::CancellationToken;
pub use self::connect_mode::ConnectMode;
pub use self::equality::{default_equals, EqualityPolicy};
pub use self::error::{IntoRippleError, Result, ResultExt, RippleError};
pub use self::ripple_task::RippleTask;
pub use self::stream_item::StreamItem;
pub use self::value_cell::{Acceptance, ValueCell};
