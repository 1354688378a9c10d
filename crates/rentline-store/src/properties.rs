//! CRUD operations for [`Property`] records.

use chrono::{DateTime, Utc};
use rentline_shared::PartyId;
use rusqlite::params;
use uuid::Uuid;

use crate::changes::{ChangeEvent, ChangeOp, Table};
use crate::database::Database;
use crate::error::Result;
use crate::models::Property;

impl Database {
    /// Insert a property.  Unlike messages, the caller supplies the
    /// creation date: properties are backfilled from existing tenancies.
    pub fn insert_property(&self, property: &Property) -> Result<()> {
        self.conn().execute(
            "INSERT INTO properties (id, landlord_id, address, rent, tenant_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                property.id.to_string(),
                property.landlord_id.to_string(),
                property.address,
                property.rent,
                property.tenant_id.map(|t| t.to_string()),
                property.created_at.to_rfc3339(),
            ],
        )?;

        self.notify(ChangeEvent {
            table: Table::Properties,
            op: ChangeOp::Insert,
        });
        Ok(())
    }

    /// List every property of a landlord, newest first.
    pub fn list_properties(&self, landlord_id: PartyId) -> Result<Vec<Property>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, landlord_id, address, rent, tenant_id, created_at
             FROM properties
             WHERE landlord_id = ?1
             ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map(params![landlord_id.to_string()], row_to_property)?;

        let mut properties = Vec::new();
        for row in rows {
            properties.push(row?);
        }
        Ok(properties)
    }
}

fn row_to_property(row: &rusqlite::Row<'_>) -> rusqlite::Result<Property> {
    let id_str: String = row.get(0)?;
    let landlord_str: String = row.get(1)?;
    let address: String = row.get(2)?;
    let rent: f64 = row.get(3)?;
    let tenant_str: Option<String> = row.get(4)?;
    let created_str: String = row.get(5)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let landlord_id = PartyId::parse(&landlord_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let tenant_id = match tenant_str {
        Some(ref s) => Some(PartyId::parse(s).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?),
        None => None,
    };

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Property {
        id,
        landlord_id,
        address,
        rent,
        tenant_id,
        created_at,
    })
}
