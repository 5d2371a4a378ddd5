// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Latest-value cell guarded by a distinct filter.
//!
//! A [`ValueCell`] remembers the most recently accepted value and only lets a new
//! value in when its [`EqualityPolicy`] reports it as different from the cached one
//! ("distinct until changed").
//!
//! ## Characteristics
//!
//! - **Sticky**: once a value has been cached, [`has_value`](ValueCell::has_value) never reverts to `false`.
//! - **Shared**: cheap to clone; all clones read and write the same cell.
//! - **Value-only**: errors cannot be written into the cell, see [`ValueCell::reject_error`].
//!
//! ## Example
//!
//! ```
//! use ripple_core::{Acceptance, EqualityPolicy, ValueCell};
//!
//! let cell = ValueCell::empty(EqualityPolicy::structural());
//! assert!(!cell.has_value());
//!
//! assert_eq!(cell.accept(1).unwrap(), Acceptance::Accepted);
//! assert_eq!(cell.accept(1).unwrap(), Acceptance::Suppressed);
//! assert_eq!(cell.accept(2).unwrap(), Acceptance::Accepted);
//! assert_eq!(cell.value().unwrap(), 2);
//! ```

use crate::{EqualityPolicy, Result, RippleError};
use alloc::sync::Arc;
use core::fmt;
use parking_lot::Mutex;

/// Outcome of offering a value to the distinct filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// The value differed from the cached one (or the cell was empty) and is now cached.
    Accepted,
    /// The value was equal to the cached one and was dropped.
    Suppressed,
}

impl Acceptance {
    /// Returns `true` if the value was cached.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Shared holder of the latest accepted value.
pub struct ValueCell<T> {
    latest: Arc<Mutex<Option<T>>>,
    equality: EqualityPolicy<T>,
}

impl<T> ValueCell<T> {
    /// Creates a cell with no value.
    #[must_use]
    pub fn empty(equality: EqualityPolicy<T>) -> Self {
        Self {
            latest: Arc::new(Mutex::new(None)),
            equality,
        }
    }

    /// Creates a cell pre-seeded with `seed`.
    ///
    /// The seed takes part in filtering: the first upstream value is compared
    /// against it like any other.
    #[must_use]
    pub fn seeded(seed: T, equality: EqualityPolicy<T>) -> Self {
        Self {
            latest: Arc::new(Mutex::new(Some(seed))),
            equality,
        }
    }

    /// Creates a cell seeded with `seed` when one is given, empty otherwise.
    #[must_use]
    pub fn new(seed: Option<T>, equality: EqualityPolicy<T>) -> Self {
        Self {
            latest: Arc::new(Mutex::new(seed)),
            equality,
        }
    }

    /// Offers `incoming` to the distinct filter.
    ///
    /// An empty cell always accepts. Otherwise the value is cached only if the
    /// policy reports it as different from the cached one.
    ///
    /// # Errors
    ///
    /// Returns [`RippleError::PolicyEvaluation`] if the policy fails; the cell is left untouched.
    pub fn accept(&self, incoming: T) -> Result<Acceptance> {
        let mut latest = self.latest.lock();
        if let Some(previous) = latest.as_ref() {
            if self.equality.equals(previous, &incoming)? {
                return Ok(Acceptance::Suppressed);
            }
        }
        *latest = Some(incoming);
        Ok(Acceptance::Accepted)
    }

    /// Caches `incoming` without consulting the policy.
    ///
    /// Used when the producer already guarantees distinct values.
    pub fn accept_unfiltered(&self, incoming: T) {
        *self.latest.lock() = Some(incoming);
    }

    /// Returns `true` once a value has been cached.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.latest.lock().is_some()
    }

    /// The policy this cell filters with.
    #[must_use]
    pub fn equality(&self) -> &EqualityPolicy<T> {
        &self.equality
    }

    /// Errors never enter the cell.
    ///
    /// # Errors
    ///
    /// Always returns [`RippleError::InvalidState`].
    pub fn reject_error(&self, error: &RippleError) -> Result<()> {
        Err(RippleError::invalid_state(format!(
            "cannot add an error to a distinct value cell ({error})"
        )))
    }
}

impl<T: Clone> ValueCell<T> {
    /// Returns the cached value.
    ///
    /// # Errors
    ///
    /// Returns [`RippleError::EmptyValue`] if nothing has been cached yet.
    pub fn value(&self) -> Result<T> {
        self.try_value().ok_or(RippleError::EmptyValue)
    }

    /// Returns the cached value, or `None` if nothing has been cached yet.
    #[must_use]
    pub fn try_value(&self) -> Option<T> {
        self.latest.lock().clone()
    }
}

impl<T> Clone for ValueCell<T> {
    fn clone(&self) -> Self {
        Self {
            latest: Arc::clone(&self.latest),
            equality: self.equality.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCell")
            .field("latest", &*self.latest.lock())
            .finish_non_exhaustive()
    }
}
