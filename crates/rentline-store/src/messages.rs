use chrono::{DateTime, Utc};
use rentline_shared::{PartyId, ThreadKey};
use rusqlite::params;
use uuid::Uuid;

use crate::changes::{ChangeEvent, ChangeOp, Table};
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Message, NewMessage};

impl Database {
    /// Insert a message, assigning its id, creation timestamp and sequence
    /// number.  The store is the single ordering authority: clients never
    /// pick timestamps.
    ///
    /// Returns the stored row and publishes an insert event on the change
    /// feed.
    pub fn insert_message(&self, new: &NewMessage) -> Result<Message> {
        if new.is_empty() {
            return Err(StoreError::EmptyMessage);
        }

        let id = Uuid::new_v4();
        let created_at = Utc::now();

        self.conn().execute(
            "INSERT INTO messages (id, author_id, recipient_id, content, attachment_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.to_string(),
                new.author_id.to_string(),
                new.recipient_id.to_string(),
                new.content,
                new.attachment_url,
                created_at.to_rfc3339(),
            ],
        )?;
        let seq = self.conn().last_insert_rowid();

        self.notify(ChangeEvent {
            table: Table::Messages,
            op: ChangeOp::Insert,
        });

        Ok(Message {
            id,
            author_id: new.author_id,
            recipient_id: new.recipient_id,
            content: new.content.clone(),
            attachment_url: new.attachment_url.clone(),
            created_at,
            seq,
        })
    }

    /// Fetch the full ordered message sequence for a two-party thread.
    ///
    /// The query matches (author, recipient) in either direction, so the
    /// result is identical no matter which party is passed first.  A party
    /// id with no messages simply yields an empty sequence.
    pub fn get_messages_for_thread(&self, thread: ThreadKey) -> Result<Vec<Message>> {
        let (a, b) = thread.parties();
        let mut stmt = self.conn().prepare(
            "SELECT id, author_id, recipient_id, content, attachment_url, created_at, seq
             FROM messages
             WHERE (author_id = ?1 AND recipient_id = ?2)
                OR (author_id = ?2 AND recipient_id = ?1)
             ORDER BY created_at ASC, seq ASC",
        )?;

        let rows = stmt.query_map(params![a.to_string(), b.to_string()], row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    pub fn get_message_by_id(&self, id: Uuid) -> Result<Message> {
        self.conn()
            .query_row(
                "SELECT id, author_id, recipient_id, content, attachment_url, created_at, seq
                 FROM messages WHERE id = ?1",
                params![id.to_string()],
                row_to_message,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Count every stored message, regardless of thread.  Used by tests to
    /// assert that no-op submissions perform zero writes.
    pub fn count_messages(&self) -> Result<i64> {
        let count =
            self.conn()
                .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let id_str: String = row.get(0)?;
    let author_str: String = row.get(1)?;
    let recipient_str: String = row.get(2)?;
    let content: String = row.get(3)?;
    let attachment_url: Option<String> = row.get(4)?;
    let ts_str: String = row.get(5)?;
    let seq: i64 = row.get(6)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let author_id = PartyId::parse(&author_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let recipient_id = PartyId::parse(&recipient_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Message {
        id,
        author_id,
        recipient_id,
        content,
        attachment_url,
        created_at,
        seq,
    })
}
