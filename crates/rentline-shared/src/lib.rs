//! # rentline-shared
//!
//! Types shared by every Rentline crate: party identities, roles, and the
//! thread key that scopes a two-party conversation.

pub mod types;

mod error;

pub use error::SharedError;
pub use types::{PartyId, Role, ThreadKey};
