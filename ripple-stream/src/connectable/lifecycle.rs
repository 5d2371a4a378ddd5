// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use ripple_core::{CancellationToken, ConnectMode, Result, RippleError};

/// Activation state of a connectable stream.
///
/// A stream leaves `Unconnected` exactly once, through whichever [`ConnectMode`]
/// is activated first. It becomes `Closed` when the upstream completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No mode has been activated; the upstream has never been subscribed.
    Unconnected,
    /// Activated through the given mode.
    Active(ConnectMode),
    /// The upstream completed after activation through the given mode.
    Closed(ConnectMode),
}

impl Lifecycle {
    /// The mode this stream was activated with, if any.
    #[must_use]
    pub const fn mode(self) -> Option<ConnectMode> {
        match self {
            Self::Unconnected => None,
            Self::Active(mode) | Self::Closed(mode) => Some(mode),
        }
    }

    /// Moves from `Unconnected` to `Active(attempted)`.
    pub(crate) fn activate(&mut self, attempted: ConnectMode) -> Result<()> {
        match *self {
            Self::Unconnected => {
                *self = Self::Active(attempted);
                Ok(())
            }
            Self::Active(active) | Self::Closed(active) => {
                Err(RippleError::Reuse { attempted, active })
            }
        }
    }

    pub(crate) fn complete(&mut self) {
        if let Self::Active(mode) = *self {
            *self = Self::Closed(mode);
        }
    }
}

/// Handle to the upstream connection of a connectable stream.
///
/// Cancelling stops forwarding for good: the cached value stays readable and
/// attached listeners stay attached, but nothing more is delivered. Dropping the
/// handle does not cancel anything.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    token: CancellationToken,
}

impl ConnectionHandle {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Detaches from the upstream.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
