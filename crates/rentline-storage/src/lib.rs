//! # rentline-storage
//!
//! Object storage for chat attachments and profile pictures: a
//! filesystem-backed binary store addressed by relative path, with durable
//! public URL derivation and an HTTP surface that serves the stored
//! objects.  Uploads happen in-process through [`ObjectStore::put`]; the
//! HTTP routes exist so that derived public URLs actually resolve.

pub mod config;
pub mod http;
pub mod store;

mod error;

pub use config::StorageConfig;
pub use error::StorageError;
pub use store::ObjectStore;
