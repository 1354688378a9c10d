//! Pending composition and attachment upload.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rentline_shared::PartyId;
use rentline_storage::ObjectStore;
use rentline_store::Message;

use crate::{Result, SyncError};

/// The transient, unpersisted draft of an outbound message.
///
/// Created as the user types or picks an image; cleared only on successful
/// submission, so a failed send leaves everything in place for retry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub text: String,
    /// Device-local path of a picked image, before upload.
    pub attachment: Option<PathBuf>,
}

impl Draft {
    /// Whether the draft carries anything worth sending.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.attachment.is_none()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.attachment = None;
    }
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The message was stored; the returned row carries the store-assigned
    /// id and timestamp.
    Sent(Message),
    /// Nothing to send: empty text and no attachment.  No backend call was
    /// made and the draft was left untouched.
    EmptyDraft,
}

/// Upload a local attachment and return its durable public URL.
///
/// The object is named by author and millisecond timestamp so concurrent
/// uploads from different parties cannot collide.  A read or upload
/// failure aborts the submission; the caller keeps the draft for retry.
pub(crate) async fn upload_attachment(
    storage: &ObjectStore,
    author: PartyId,
    local: &Path,
) -> Result<String> {
    let data = tokio::fs::read(local).await.map_err(|e| {
        SyncError::Attachment(format!("Failed to read {}: {e}", local.display()))
    })?;

    let ext = local
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpg");
    let name = format!(
        "chat-images/{}/{}.{}",
        author,
        Utc::now().timestamp_millis(),
        ext
    );
    let content_type = format!("image/{ext}");

    let url = storage.put(&name, &data, &content_type).await?;
    Ok(url)
}
