use thiserror::Error;

/// Errors surfaced by the sync core.
///
/// Store and storage failures are transient from the caller's point of
/// view: the session never clears already-fetched state on error, and the
/// draft is left intact so the user can retry.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Relational store failure (fetch or insert).
    #[error("Store error: {0}")]
    Store(#[from] rentline_store::StoreError),

    /// Object storage failure (attachment upload).
    #[error("Storage error: {0}")]
    Storage(#[from] rentline_storage::StorageError),

    /// The local attachment could not be read before upload.
    #[error("Attachment error: {0}")]
    Attachment(String),

    /// A shared lock was poisoned by a panicking holder.
    #[error("Lock poisoned")]
    LockPoisoned,
}
