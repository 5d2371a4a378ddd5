// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pluggable equality used by the distinct filter.
//!
//! An [`EqualityPolicy`] decides whether an incoming value is a duplicate of the
//! currently cached one. It is fixed when a cell or stream is built and never
//! reassigned afterwards.
//!
//! ## Example
//!
//! ```
//! use ripple_core::EqualityPolicy;
//!
//! // Two vectors are "equal" when their sums match
//! let by_sum = EqualityPolicy::new(|a: &Vec<i32>, b: &Vec<i32>| {
//!     a.iter().sum::<i32>() == b.iter().sum::<i32>()
//! });
//!
//! assert!(by_sum.equals(&vec![1, 1, 4], &vec![1, 2, 3]).unwrap());
//! assert!(!by_sum.equals(&vec![1], &vec![2]).unwrap());
//! ```

use crate::{Result, RippleError};
use alloc::sync::Arc;
use core::fmt;

type Predicate<T> = dyn Fn(&T, &T) -> Result<bool> + Send + Sync;

/// Structural equality, the policy used when none is supplied.
pub fn default_equals<T: PartialEq>(previous: &T, next: &T) -> bool {
    previous == next
}

/// A shareable predicate reporting whether two values are equal.
pub struct EqualityPolicy<T> {
    predicate: Arc<Predicate<T>>,
}

impl<T: 'static> EqualityPolicy<T> {
    /// Builds a policy from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(move |previous: &T, next: &T| Ok(predicate(previous, next))),
        }
    }

    /// Builds a policy from a predicate that may fail.
    ///
    /// A failure surfaces as [`RippleError::PolicyEvaluation`] carrying the
    /// error's message.
    pub fn fallible<F, E>(predicate: F) -> Self
    where
        F: Fn(&T, &T) -> core::result::Result<bool, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self {
            predicate: Arc::new(move |previous: &T, next: &T| {
                predicate(previous, next).map_err(|e| RippleError::policy_error(e.to_string()))
            }),
        }
    }

    /// A policy under which no two values are ever equal.
    ///
    /// Use it for element types without a meaningful notion of equality:
    /// every emission is then treated as a change.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|_, _| false)
    }
}

impl<T> EqualityPolicy<T> {
    /// Evaluates the policy.
    ///
    /// # Errors
    ///
    /// Returns [`RippleError::PolicyEvaluation`] if the predicate fails.
    pub fn equals(&self, previous: &T, next: &T) -> Result<bool> {
        (self.predicate)(previous, next)
    }
}

impl<T: PartialEq + 'static> EqualityPolicy<T> {
    /// Structural equality via [`default_equals`].
    #[must_use]
    pub fn structural() -> Self {
        Self::new(default_equals::<T>)
    }
}

impl<T: PartialEq + 'static> Default for EqualityPolicy<T> {
    fn default() -> Self {
        Self::structural()
    }
}

impl<T> Clone for EqualityPolicy<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for EqualityPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EqualityPolicy").finish_non_exhaustive()
    }
}
