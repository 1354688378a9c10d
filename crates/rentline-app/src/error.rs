use thiserror::Error;

/// Errors surfaced by the application shell.
#[derive(Error, Debug)]
pub enum AppError {
    /// No identity has been loaded for this session.
    #[error("Not signed in")]
    NotSignedIn,

    /// The database or object store has not been connected yet.
    #[error("Backend not connected")]
    NotConnected,

    #[error("Sync error: {0}")]
    Sync(#[from] rentline_sync::SyncError),

    #[error("Store error: {0}")]
    Store(#[from] rentline_store::StoreError),
}
