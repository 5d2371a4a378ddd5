// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::Inner;
use alloc::sync::Arc;
use futures::future::{select, Either};
use futures::StreamExt;
use ripple_core::{RippleError, RippleTask, StreamItem};

/// Subscribes to the upstream and spawns the loop that feeds the subject.
///
/// The upstream is listened to before this returns, so a listener attached
/// right after activation cannot miss the first emission.
pub(super) fn spawn<T>(inner: &Arc<Inner<T>>) -> RippleTask
where
    T: Clone + Send + Sync + 'static,
{
    let mut stream = inner.upstream.listen();
    let distinct = inner.upstream.is_distinct();
    let subject = inner.subject.clone();
    let owner = Arc::downgrade(inner);

    RippleTask::spawn(move |cancel| async move {
        // A broadcast upstream replays its latest value on attach; that one is always filtered
        let mut filter_next = true;

        let completed = loop {
            // Cancellation is polled first so a disconnect never consumes an upstream item
            let item = match select(cancel.cancelled(), stream.next()).await {
                Either::Left(_) => break false,
                Either::Right((item, _)) => item,
            };
            if cancel.is_cancelled() {
                break false;
            }

            let forwarded = match item {
                Some(StreamItem::Value(value)) => {
                    let result = if filter_next {
                        subject.add(value).map(|_| ())
                    } else {
                        subject.add_unfiltered(value)
                    };
                    filter_next = !distinct;
                    result
                }
                Some(StreamItem::Error(error)) => {
                    warn!("upstream error forwarded to listeners: {}", error);
                    subject.forward_error(error)
                }
                None => break true,
            };

            // Policy failures were already broadcast; only a closed subject stops us
            if let Err(RippleError::Closed) = forwarded {
                break false;
            }
        };

        if completed {
            debug!("upstream completed, closing listeners");
            // Lifecycle first, so anyone who saw a listener end also sees it closed
            if let Some(inner) = owner.upgrade() {
                inner.control.lock().lifecycle.complete();
            }
            subject.close();
        } else {
            trace!("upstream forwarding stopped");
        }
    })
}
