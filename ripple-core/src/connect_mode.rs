// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;

/// The activation mode chosen for a connectable stream.
///
/// A connectable stream is activated at most once; the mode recorded here
/// is reported back in [`RippleError::Reuse`](crate::RippleError::Reuse) when a
/// second activation is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectMode {
    /// Upstream subscribed immediately; cancelled only through the returned handle.
    Manual,
    /// Upstream subscribed on the first listener and cancelled when the last one leaves.
    RefCount,
    /// Upstream subscribed on the first listener and never cancelled automatically.
    AutoConnect,
}

impl fmt::Display for ConnectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "connect()"),
            Self::RefCount => write!(f, "ref_count()"),
            Self::AutoConnect => write!(f, "auto_connect()"),
        }
    }
}
