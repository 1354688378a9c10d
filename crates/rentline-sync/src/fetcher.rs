//! Point-in-time thread queries against the relational store.

use std::sync::{Arc, Mutex};

use rentline_shared::ThreadKey;
use rentline_store::{Database, Message};

use crate::{Result, SyncError};

/// Read-only fetcher for one thread's full ordered message sequence.
///
/// Fetching is direction-symmetric (the [`ThreadKey`] canonicalizes the
/// party pair) and an unresolvable party simply yields an empty sequence.
/// Errors are transient backend failures; the caller keeps its prior state.
#[derive(Clone)]
pub struct ThreadFetcher {
    db: Arc<Mutex<Database>>,
    thread: ThreadKey,
}

impl ThreadFetcher {
    pub fn new(db: Arc<Mutex<Database>>, thread: ThreadKey) -> Self {
        Self { db, thread }
    }

    pub fn thread(&self) -> ThreadKey {
        self.thread
    }

    /// Query the store for the thread's current authoritative order.
    pub fn fetch(&self) -> Result<Vec<Message>> {
        let db = self.db.lock().map_err(|_| SyncError::LockPoisoned)?;
        Ok(db.get_messages_for_thread(self.thread)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rentline_shared::{PartyId, Role};
    use rentline_store::{NewMessage, Party};

    fn seed_party(db: &Database, role: Role) -> PartyId {
        let party = Party {
            id: PartyId::new(),
            role,
            first_name: "T".into(),
            last_name: "P".into(),
            profile_pic_url: None,
            created_at: Utc::now(),
        };
        db.insert_party(&party).unwrap();
        party.id
    }

    #[test]
    fn fetch_is_symmetric_for_either_perspective() {
        let db = Database::open_in_memory().unwrap();
        let landlord = seed_party(&db, Role::Landlord);
        let tenant = seed_party(&db, Role::Tenant);
        db.insert_message(&NewMessage {
            author_id: tenant,
            recipient_id: landlord,
            content: "hi".into(),
            attachment_url: None,
        })
        .unwrap();

        let db = Arc::new(Mutex::new(db));
        let as_tenant = ThreadFetcher::new(db.clone(), ThreadKey::new(tenant, landlord));
        let as_landlord = ThreadFetcher::new(db, ThreadKey::new(landlord, tenant));

        assert_eq!(as_tenant.fetch().unwrap(), as_landlord.fetch().unwrap());
    }
}
