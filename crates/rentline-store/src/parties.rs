//! CRUD operations for [`Party`] records.

use chrono::{DateTime, Utc};
use rentline_shared::{PartyId, Role};
use rusqlite::params;

use crate::changes::{ChangeEvent, ChangeOp, Table};
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Party;

impl Database {
    /// Insert a new party record.
    pub fn insert_party(&self, party: &Party) -> Result<()> {
        self.conn().execute(
            "INSERT INTO parties (id, role, first_name, last_name, profile_pic_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                party.id.to_string(),
                party.role.as_str(),
                party.first_name,
                party.last_name,
                party.profile_pic_url,
                party.created_at.to_rfc3339(),
            ],
        )?;

        self.notify(ChangeEvent {
            table: Table::Parties,
            op: ChangeOp::Insert,
        });
        Ok(())
    }

    /// Fetch a single party by id, e.g. to render the peer header of a
    /// thread.
    pub fn get_party(&self, id: PartyId) -> Result<Party> {
        self.conn()
            .query_row(
                "SELECT id, role, first_name, last_name, profile_pic_url, created_at
                 FROM parties
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_party,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List all parties with a given role, newest first.
    pub fn list_parties(&self, role: Role) -> Result<Vec<Party>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, role, first_name, last_name, profile_pic_url, created_at
             FROM parties
             WHERE role = ?1
             ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map(params![role.as_str()], row_to_party)?;

        let mut parties = Vec::new();
        for row in rows {
            parties.push(row?);
        }
        Ok(parties)
    }
}

fn row_to_party(row: &rusqlite::Row<'_>) -> rusqlite::Result<Party> {
    let id_str: String = row.get(0)?;
    let role_str: String = row.get(1)?;
    let first_name: String = row.get(2)?;
    let last_name: String = row.get(3)?;
    let profile_pic_url: Option<String> = row.get(4)?;
    let created_str: String = row.get(5)?;

    let id = PartyId::parse(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let role = Role::from_str(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown role: {role_str}").into(),
        )
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Party {
        id,
        role,
        first_name,
        last_name,
        profile_pic_url,
        created_at,
    })
}
