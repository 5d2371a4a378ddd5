// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prelude re-exporting the extension traits and the value-read trait.
//!
//! ```
//! use ripple_stream::prelude::*;
//! ```

pub use crate::distinct_value::DistinctValueExt;
#[cfg(feature = "runtime-tokio")]
pub use crate::publish_value_distinct::PublishValueDistinctExt;
pub use crate::upstream::Upstream;
pub use crate::value_stream::DistinctValueStream;
