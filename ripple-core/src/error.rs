// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for Ripple distinct-value streams
//!
//! A single root [`RippleError`] covers every failure the workspace can surface:
//! reading an empty value cell, activating a connectable stream twice, an equality
//! policy that fails, illegal error injection into the cache layer, and errors
//! emitted by an upstream producer.
//!
//! # Examples
//!
//! ```
//! use ripple_core::{RippleError, Result};
//!
//! fn read_latest() -> Result<i32> {
//!     Err(RippleError::EmptyValue)
//! }
//!
//! assert!(matches!(read_latest(), Err(RippleError::EmptyValue)));
//! ```

use crate::ConnectMode;

/// Root error type for all Ripple operations
#[derive(Debug, thiserror::Error)]
pub enum RippleError {
    /// Stream processing encountered an error
    ///
    /// Upstream producers use this for errors that don't fit a more specific variant.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// Custom error from user code
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The latest value was read before any value was cached
    #[error("Value is not available: no value has been emitted yet")]
    EmptyValue,

    /// A lifecycle activation was attempted on an already activated stream
    #[error("Connectable stream already activated via {active}; cannot activate via {attempted}")]
    Reuse {
        /// The activation that was rejected
        attempted: ConnectMode,
        /// The activation that is already in place
        active: ConnectMode,
    },

    /// The equality policy failed while comparing two values
    #[error("Equality policy failed: {context}")]
    PolicyEvaluation {
        /// Message produced by the failing policy
        context: String,
    },

    /// The operation is not valid in the current state
    #[error("Invalid state: {context}")]
    InvalidState {
        /// What was attempted
        context: String,
    },

    /// The subject has been closed and cannot accept new items
    #[error("Subject is closed")]
    Closed,
}

impl RippleError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Create a policy evaluation error with the given context
    pub fn policy_error(context: impl Into<String>) -> Self {
        Self::PolicyEvaluation {
            context: context.into(),
        }
    }

    /// Create an invalid state error with the given context
    pub fn invalid_state(context: impl Into<String>) -> Self {
        Self::InvalidState {
            context: context.into(),
        }
    }

    /// Returns `true` for errors raised by misuse of the API rather than by data.
    ///
    /// These are surfaced to the caller synchronously and never travel through a stream.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyValue | Self::Reuse { .. } | Self::InvalidState { .. } | Self::Closed
        )
    }

    /// Returns `true` for errors that travel to listeners as `StreamItem::Error`.
    #[must_use]
    pub const fn is_stream_error(&self) -> bool {
        !self.is_usage_error()
    }
}

/// Specialized Result type for Ripple operations
///
/// # Examples
///
/// ```
/// use ripple_core::Result;
///
/// fn process() -> Result<String> {
///     Ok("processed".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, RippleError>;

/// Extension trait for converting errors into `RippleError`
pub trait IntoRippleError {
    /// Convert this error into a `RippleError` with additional context
    fn into_ripple_error(self, context: &str) -> RippleError;

    /// Convert this error into a `RippleError` without additional context
    fn into_ripple(self) -> RippleError
    where
        Self: Sized,
    {
        self.into_ripple_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoRippleError for E {
    fn into_ripple_error(self, context: &str) -> RippleError {
        if context.is_empty() {
            RippleError::user_error(self)
        } else {
            RippleError::stream_error(format!("{context}: {self}"))
        }
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(RippleError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(RippleError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<RippleError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.with_context(|| context.into())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            RippleError::UserError(inner) => RippleError::StreamProcessingError {
                context: format!("{}: {inner}", f()),
            },
            other => other,
        })
    }
}

impl Clone for RippleError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            // The boxed source can't be cloned, keep its message
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {e}"),
            },
            Self::EmptyValue => Self::EmptyValue,
            Self::Reuse { attempted, active } => Self::Reuse {
                attempted: *attempted,
                active: *active,
            },
            Self::PolicyEvaluation { context } => Self::PolicyEvaluation {
                context: context.clone(),
            },
            Self::InvalidState { context } => Self::InvalidState {
                context: context.clone(),
            },
            Self::Closed => Self::Closed,
        }
    }
}
