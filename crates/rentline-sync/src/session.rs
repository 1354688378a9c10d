//! The per-screen-visit chat session.
//!
//! A [`ChatSession`] is the single logical owner of one thread's
//! client-local message store.  Opening it performs the initial load and
//! subscribes the change listener; dropping it (or calling
//! [`ChatSession::close`]) tears the subscription down.  An in-flight
//! submission is not cancelled by teardown — it completes against the
//! store and its result is simply never rendered.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;
use tracing::{info, warn};

use rentline_shared::{PartyId, ThreadKey};
use rentline_storage::ObjectStore;
use rentline_store::{Database, Message, NewMessage, Party};

use crate::composer::{self, Draft, SubmitOutcome};
use crate::fetcher::ThreadFetcher;
use crate::listener::ChangeListener;
use crate::{Result, SyncError};

pub(crate) struct SessionInner {
    db: Arc<Mutex<Database>>,
    storage: Arc<ObjectStore>,
    me: PartyId,
    peer: PartyId,
    fetcher: ThreadFetcher,
    /// Client-local message store: the thread as of the last successful
    /// fetch, in the store's authoritative order.
    messages: Mutex<Vec<Message>>,
    draft: Mutex<Draft>,
    /// Bumped after every successful refresh; the view drives scrolling
    /// and re-rendering off this.
    revision: watch::Sender<u64>,
}

impl SessionInner {
    /// Re-read the full thread from the store.  On failure the prior
    /// contents stay in place, so a transient error never blanks an
    /// already-rendered thread.
    fn refresh(&self) -> Result<()> {
        let fetched = self.fetcher.fetch()?;
        {
            let mut messages = self.messages.lock().map_err(|_| SyncError::LockPoisoned)?;
            *messages = fetched;
        }
        self.revision.send_modify(|r| *r += 1);
        Ok(())
    }
}

/// One open conversation between the current party and a peer.
pub struct ChatSession {
    inner: Arc<SessionInner>,
    listener: ChangeListener,
}

impl ChatSession {
    /// Mount a session: initial thread load, then change-feed
    /// subscription.  A failed initial load is a retryable error — the
    /// caller reopens the screen.
    pub async fn open(
        db: Arc<Mutex<Database>>,
        storage: Arc<ObjectStore>,
        me: PartyId,
        peer: PartyId,
    ) -> Result<Self> {
        let thread = ThreadKey::new(me, peer);
        let fetcher = ThreadFetcher::new(db.clone(), thread);
        let (revision, _) = watch::channel(0u64);

        let inner = Arc::new(SessionInner {
            db: db.clone(),
            storage,
            me,
            peer,
            fetcher,
            messages: Mutex::new(Vec::new()),
            draft: Mutex::new(Draft::default()),
            revision,
        });

        inner.refresh()?;

        let rx = {
            let db = db.lock().map_err(|_| SyncError::LockPoisoned)?;
            db.subscribe_changes()
        };
        let weak: Weak<SessionInner> = Arc::downgrade(&inner);
        let listener = ChangeListener::subscribe(rx, move || match weak.upgrade() {
            Some(inner) => {
                if let Err(e) = inner.refresh() {
                    warn!(error = %e, "thread refresh failed, keeping prior state");
                }
                true
            }
            None => false,
        });

        info!(me = %me.short(), peer = %peer.short(), "chat session opened");

        Ok(Self { inner, listener })
    }

    pub fn me(&self) -> PartyId {
        self.inner.me
    }

    pub fn peer_id(&self) -> PartyId {
        self.inner.peer
    }

    pub fn thread(&self) -> ThreadKey {
        self.inner.fetcher.thread()
    }

    /// Resolve the peer's directory record, e.g. for the thread header.
    pub fn peer(&self) -> Result<Party> {
        let db = self.inner.db.lock().map_err(|_| SyncError::LockPoisoned)?;
        Ok(db.get_party(self.inner.peer)?)
    }

    /// Snapshot of the client-local message store.
    pub fn messages(&self) -> Result<Vec<Message>> {
        let messages = self
            .inner
            .messages
            .lock()
            .map_err(|_| SyncError::LockPoisoned)?;
        Ok(messages.clone())
    }

    /// Watch channel bumped after every successful refresh.
    pub fn revision(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Manually re-fetch the thread (e.g. pull-to-refresh).
    pub fn refresh(&self) -> Result<()> {
        self.inner.refresh()
    }

    // ------------------------------------------------------------------
    // Draft handling
    // ------------------------------------------------------------------

    pub fn draft(&self) -> Result<Draft> {
        let draft = self.inner.draft.lock().map_err(|_| SyncError::LockPoisoned)?;
        Ok(draft.clone())
    }

    pub fn set_draft_text(&self, text: &str) -> Result<()> {
        let mut draft = self.inner.draft.lock().map_err(|_| SyncError::LockPoisoned)?;
        draft.text = text.to_string();
        Ok(())
    }

    /// Record a picked image by its device-local path.
    pub fn attach_image(&self, path: PathBuf) -> Result<()> {
        let mut draft = self.inner.draft.lock().map_err(|_| SyncError::LockPoisoned)?;
        draft.attachment = Some(path);
        Ok(())
    }

    pub fn clear_attachment(&self) -> Result<()> {
        let mut draft = self.inner.draft.lock().map_err(|_| SyncError::LockPoisoned)?;
        draft.attachment = None;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Submit the current draft.
    ///
    /// An empty draft is rejected locally with zero backend calls.  If an
    /// attachment is present it is uploaded first; only after a durable
    /// URL exists is the message inserted.  Any failure before the insert
    /// leaves the draft untouched for retry.  (A successful upload
    /// followed by a failed insert orphans the object — accepted, not
    /// compensated.)
    ///
    /// There is no local optimistic insertion: the message becomes visible
    /// through the refresh, keeping server-confirmed data the single
    /// source of truth.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let draft = self.draft()?;
        let text = draft.text.trim().to_string();
        if text.is_empty() && draft.attachment.is_none() {
            return Ok(SubmitOutcome::EmptyDraft);
        }

        let attachment_url = match &draft.attachment {
            Some(path) => Some(
                composer::upload_attachment(&self.inner.storage, self.inner.me, path).await?,
            ),
            None => None,
        };

        let stored = {
            let db = self.inner.db.lock().map_err(|_| SyncError::LockPoisoned)?;
            db.insert_message(&NewMessage {
                author_id: self.inner.me,
                recipient_id: self.inner.peer,
                content: text,
                attachment_url,
            })?
        };

        {
            let mut draft = self.inner.draft.lock().map_err(|_| SyncError::LockPoisoned)?;
            draft.clear();
        }

        // The change listener will refresh as well; this immediate fetch
        // just shortens the submit-to-render gap.  The message is already
        // durable, so a refresh failure here is only logged.
        if let Err(e) = self.inner.refresh() {
            warn!(error = %e, "post-submit refresh failed");
        }

        info!(id = %stored.id, thread = %self.thread(), "message sent");
        Ok(SubmitOutcome::Sent(stored))
    }

    /// Tear down the change subscription.  Idempotent; also runs on drop.
    pub fn close(&mut self) {
        self.listener.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rentline_shared::Role;
    use std::time::Duration;
    use tokio::time::timeout;

    struct Fixture {
        db: Arc<Mutex<Database>>,
        storage: Arc<ObjectStore>,
        landlord: PartyId,
        tenant: PartyId,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();

        let mut ids = Vec::new();
        for (role, first, last) in [
            (Role::Landlord, "Lena", "Owner"),
            (Role::Tenant, "Tom", "Renter"),
        ] {
            let party = Party {
                id: PartyId::new(),
                role,
                first_name: first.into(),
                last_name: last.into(),
                profile_pic_url: None,
                created_at: Utc::now(),
            };
            db.insert_party(&party).unwrap();
            ids.push(party.id);
        }

        let storage = ObjectStore::new(
            dir.path().join("objects"),
            "http://localhost:8080".into(),
            1024 * 1024,
        )
        .await
        .unwrap();

        Fixture {
            db: Arc::new(Mutex::new(db)),
            storage: Arc::new(storage),
            landlord: ids[0],
            tenant: ids[1],
            _dir: dir,
        }
    }

    async fn open(f: &Fixture, me: PartyId, peer: PartyId) -> ChatSession {
        ChatSession::open(f.db.clone(), f.storage.clone(), me, peer)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn two_party_exchange_renders_identically_from_both_sides() {
        let f = fixture().await;
        let tenant_session = open(&f, f.tenant, f.landlord).await;
        let landlord_session = open(&f, f.landlord, f.tenant).await;

        tenant_session.set_draft_text("hi").unwrap();
        tenant_session.submit().await.unwrap();

        landlord_session.set_draft_text("hello").unwrap();
        landlord_session.submit().await.unwrap();

        // Attachment-only message from the tenant.
        let picked = f._dir.path().join("pic.png");
        tokio::fs::write(&picked, b"png").await.unwrap();
        tenant_session.attach_image(picked).unwrap();
        tenant_session.submit().await.unwrap();

        let from_tenant = tenant_session.messages().unwrap();
        landlord_session.refresh().unwrap();
        let from_landlord = landlord_session.messages().unwrap();

        assert_eq!(from_tenant, from_landlord);
        assert_eq!(from_tenant.len(), 3);
        assert_eq!(from_tenant[0].content, "hi");
        assert_eq!(from_tenant[1].content, "hello");
        assert!(from_tenant[2].content.is_empty());
        assert!(from_tenant[2].attachment_url.is_some());
    }

    #[tokio::test]
    async fn empty_submission_is_a_local_noop() {
        let f = fixture().await;
        let session = open(&f, f.tenant, f.landlord).await;

        session.set_draft_text("   ").unwrap();
        let outcome = session.submit().await.unwrap();

        assert_eq!(outcome, SubmitOutcome::EmptyDraft);
        assert_eq!(session.draft().unwrap().text, "   ");
        let db = f.db.lock().unwrap();
        assert_eq!(db.count_messages().unwrap(), 0);
    }

    #[tokio::test]
    async fn successful_submit_clears_the_draft() {
        let f = fixture().await;
        let session = open(&f, f.tenant, f.landlord).await;

        session.set_draft_text("  rent question  ").unwrap();
        let outcome = session.submit().await.unwrap();

        match outcome {
            SubmitOutcome::Sent(message) => {
                // Text is trimmed before insert.
                assert_eq!(message.content, "rent question");
            }
            other => panic!("expected Sent, got {other:?}"),
        }
        assert!(session.draft().unwrap().is_empty());
        assert_eq!(session.messages().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_upload_keeps_draft_for_retry() {
        let f = fixture().await;
        let session = open(&f, f.tenant, f.landlord).await;

        session.set_draft_text("see photo").unwrap();
        session
            .attach_image(PathBuf::from("/no/such/pic.png"))
            .unwrap();

        let err = session.submit().await.unwrap_err();
        assert!(matches!(err, SyncError::Attachment(_)));

        let draft = session.draft().unwrap();
        assert_eq!(draft.text, "see photo");
        assert_eq!(draft.attachment, Some(PathBuf::from("/no/such/pic.png")));
        let db = f.db.lock().unwrap();
        assert_eq!(db.count_messages().unwrap(), 0);
    }

    #[tokio::test]
    async fn peer_insert_is_picked_up_via_change_feed() {
        let f = fixture().await;
        let session = open(&f, f.landlord, f.tenant).await;
        let mut revision = session.revision();

        {
            let db = f.db.lock().unwrap();
            db.insert_message(&NewMessage {
                author_id: f.tenant,
                recipient_id: f.landlord,
                content: "the sink is leaking".into(),
                attachment_url: None,
            })
            .unwrap();
        }

        timeout(Duration::from_secs(1), revision.changed())
            .await
            .expect("listener should refresh within a second")
            .unwrap();

        let messages = session.messages().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "the sink is leaking");
    }

    #[tokio::test]
    async fn refresh_failure_keeps_prior_messages() {
        let f = fixture().await;
        let session = open(&f, f.tenant, f.landlord).await;
        session.set_draft_text("hi").unwrap();
        session.submit().await.unwrap();
        assert_eq!(session.messages().unwrap().len(), 1);

        {
            let db = f.db.lock().unwrap();
            db.conn().execute_batch("DROP TABLE messages").unwrap();
        }

        assert!(session.refresh().is_err());
        // The previously fetched thread is still rendered.
        assert_eq!(session.messages().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn close_stops_the_listener() {
        let f = fixture().await;
        let mut session = open(&f, f.landlord, f.tenant).await;
        let mut revision = session.revision();
        session.close();
        session.close(); // idempotent

        {
            let db = f.db.lock().unwrap();
            db.insert_message(&NewMessage {
                author_id: f.tenant,
                recipient_id: f.landlord,
                content: "anyone there?".into(),
                attachment_url: None,
            })
            .unwrap();
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!revision.has_changed().unwrap());
        assert!(session.messages().unwrap().is_empty());
    }

    #[tokio::test]
    async fn peer_lookup_resolves_directory_record() {
        let f = fixture().await;
        let session = open(&f, f.tenant, f.landlord).await;
        let peer = session.peer().unwrap();
        assert_eq!(peer.display_name(), "Lena Owner");
        assert_eq!(peer.role, Role::Landlord);
    }
}
