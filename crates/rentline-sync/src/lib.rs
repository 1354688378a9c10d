//! # rentline-sync
//!
//! The chat session sync core: keeps a two-party message thread visually
//! consistent across local sends, remote inserts from the other party, and
//! change-driven refetches.
//!
//! One [`ChatSession`] is opened per screen visit.  It performs the initial
//! thread load, subscribes a [`ChangeListener`] to the store's change feed
//! for the session's lifetime, and owns the pending [`Draft`].  Every
//! change notification triggers a full re-fetch of the thread rather than
//! incremental patching: the store's returned order is always
//! authoritative, so the session tolerates notifications arriving in any
//! order relative to its own submissions.

pub mod composer;
pub mod fetcher;
pub mod listener;
pub mod session;

mod error;

pub use composer::{Draft, SubmitOutcome};
pub use error::SyncError;
pub use fetcher::ThreadFetcher;
pub use listener::ChangeListener;
pub use session::ChatSession;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SyncError>;
