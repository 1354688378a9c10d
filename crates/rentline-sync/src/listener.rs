//! Realtime change subscription.
//!
//! The store's change feed is table-level and unfiltered: any insert,
//! update or delete anywhere in the messages table produces one event.
//! The listener never inspects a payload (there is none) — it invalidates
//! by calling back into its owner, which re-runs the thread fetch.  That
//! makes notification ordering irrelevant: whatever order events arrive
//! in, the re-fetch returns the store's current authoritative order.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use rentline_store::{ChangeEvent, Table};

/// A scoped subscription to the message change feed.
///
/// Lifecycle: `unsubscribed → subscribed → unsubscribed`.  The transition
/// out is guaranteed: [`ChangeListener::stop`] aborts the listening task,
/// and `Drop` calls it, so a session cannot leak a subscription per screen
/// visit.  Stopping a listener that never subscribed is a no-op.
pub struct ChangeListener {
    handle: Option<JoinHandle<()>>,
}

impl ChangeListener {
    /// A listener that was never subscribed.  Tearing it down does nothing.
    pub fn unsubscribed() -> Self {
        Self { handle: None }
    }

    /// Spawn the listening task.  `on_invalidate` runs once per message
    /// event (and once per lag gap, since a full re-fetch also covers
    /// missed events); returning `false` stops the subscription because the
    /// owner is gone.
    pub fn subscribe<F>(mut rx: broadcast::Receiver<ChangeEvent>, on_invalidate: F) -> Self
    where
        F: Fn() -> bool + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) if event.table == Table::Messages => {
                        debug!(?event, "message change, invalidating thread");
                        if !on_invalidate() {
                            break;
                        }
                    }
                    Ok(_) => {
                        // Changes to other tables do not affect the thread.
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "change feed lagged, re-fetching");
                        if !on_invalidate() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.handle.is_some()
    }

    /// Tear the subscription down.  Safe to call repeatedly and on a
    /// listener that never subscribed.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentline_store::ChangeOp;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn stopping_a_never_subscribed_listener_is_a_noop() {
        let mut listener = ChangeListener::unsubscribed();
        assert!(!listener.is_subscribed());
        listener.stop();
        listener.stop();
        assert!(!listener.is_subscribed());
    }

    #[tokio::test]
    async fn message_events_invalidate_and_other_tables_do_not() {
        let (tx, rx) = broadcast::channel(16);
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();

        let _listener = ChangeListener::subscribe(rx, move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            true
        });

        tx.send(ChangeEvent {
            table: Table::Properties,
            op: ChangeOp::Insert,
        })
        .unwrap();
        tx.send(ChangeEvent {
            table: Table::Messages,
            op: ChangeOp::Insert,
        })
        .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stop_ends_the_subscription() {
        let (tx, rx) = broadcast::channel(16);
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();

        let mut listener = ChangeListener::subscribe(rx, move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            true
        });
        listener.stop();
        assert!(!listener.is_subscribed());

        tx.send(ChangeEvent {
            table: Table::Messages,
            op: ChangeOp::Insert,
        })
        .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
