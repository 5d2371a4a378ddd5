// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use ripple_core::{EqualityPolicy, Result, RippleError};

/// Synchronous access to the latest distinct value of a stream.
///
/// Implemented by every type in this crate that caches its most recent value:
/// the subject, the connectable stream, its multicast views, the `distinct_value`
/// operator and its broadcast decorator.
pub trait DistinctValueStream<T: Clone> {
    /// The latest cached value, or `None` if nothing has been cached yet.
    fn try_value(&self) -> Option<T>;

    /// The latest cached value.
    ///
    /// # Errors
    ///
    /// Returns [`RippleError::EmptyValue`] if nothing has been cached yet.
    fn value(&self) -> Result<T> {
        self.try_value().ok_or(RippleError::EmptyValue)
    }

    /// Returns `true` once a value has been cached (seeded or emitted).
    fn has_value(&self) -> bool;

    /// The equality policy used to suppress consecutive duplicates.
    fn equality(&self) -> EqualityPolicy<T>;
}
