//! Application state owned by the navigation shell.
//!
//! The shell constructs one [`AppState`] at startup and hands screens the
//! pieces they need — most importantly a clone of the
//! [`SidebarController`] and freshly opened chat sessions.  The identity
//! provider's answer (who is signed in) is read once per screen mount
//! from here.

use std::sync::{Arc, Mutex};

use rentline_shared::PartyId;
use rentline_storage::ObjectStore;
use rentline_store::{Database, Party};
use rentline_sync::ChatSession;

use crate::error::AppError;
use crate::panel::SidebarController;

/// Central application state.
///
/// Holds the signed-in party, the database and object store handles, and
/// the shared sidebar controller.
pub struct AppState {
    /// The authenticated party.  `None` until sign-in completes.
    pub identity: Option<Party>,

    /// Handle to the relational store.
    /// `None` until the backend connection is established.
    pub database: Option<Arc<Mutex<Database>>>,

    /// Handle to the object store used for attachment uploads.
    /// `None` until the backend connection is established.
    pub storage: Option<Arc<ObjectStore>>,

    /// The one sidebar panel, shared by every screen via cloned handles.
    pub sidebar: SidebarController,
}

impl AppState {
    /// Create a new, uninitialised application state.
    pub fn new() -> Self {
        Self {
            identity: None,
            database: None,
            storage: None,
            sidebar: SidebarController::new(),
        }
    }

    /// The signed-in party's identifier.
    pub fn current_party(&self) -> Result<PartyId, AppError> {
        self.identity
            .as_ref()
            .map(|p| p.id)
            .ok_or(AppError::NotSignedIn)
    }

    /// Open a chat session between the signed-in party and `peer`.
    /// One session per screen visit; dropping it tears down its
    /// subscription.
    pub async fn open_chat(&self, peer: PartyId) -> Result<ChatSession, AppError> {
        let me = self.current_party()?;
        let db = self.database.clone().ok_or(AppError::NotConnected)?;
        let storage = self.storage.clone().ok_or(AppError::NotConnected)?;

        tracing::debug!(me = %me.short(), peer = %peer.short(), "opening chat screen");
        Ok(ChatSession::open(db, storage, me, peer).await?)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
