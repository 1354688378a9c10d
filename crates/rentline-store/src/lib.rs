//! # rentline-store
//!
//! The authoritative relational store behind the Rentline messaging core,
//! backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for every domain
//! model, plus a table-level change feed: every mutation publishes a
//! payload-free [`ChangeEvent`] on a broadcast channel, and subscribers are
//! expected to re-query rather than trust the notification
//! (push-to-invalidate).

pub mod changes;
pub mod database;
pub mod maintenance;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod parties;
pub mod properties;

mod error;

pub use changes::{ChangeEvent, ChangeOp, Table};
pub use database::Database;
pub use error::StoreError;
pub use models::*;
