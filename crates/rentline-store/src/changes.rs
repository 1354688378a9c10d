//! Table-level change notifications.
//!
//! Every mutation on [`Database`](crate::Database) publishes a
//! [`ChangeEvent`] on a broadcast channel.  Events carry no row data:
//! subscribers treat them as cache-invalidation signals and re-query the
//! store for the authoritative state (push-to-invalidate).  Events are not
//! filtered by thread; relevance filtering happens on the subscriber side
//! by re-running its own query.

use tokio::sync::broadcast;

/// Capacity of the broadcast channel.  A lagging subscriber that misses
/// events will still converge on its next received event, since every
/// event triggers a full re-fetch.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Which table a change touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Parties,
    Messages,
    Properties,
    Maintenance,
}

/// What kind of mutation occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// A payload-free change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: Table,
    pub op: ChangeOp,
}

pub(crate) fn change_channel() -> broadcast::Sender<ChangeEvent> {
    let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
    tx
}
