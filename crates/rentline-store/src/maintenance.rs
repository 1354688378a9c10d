//! CRUD operations for [`MaintenanceRecord`] expenses.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::changes::{ChangeEvent, ChangeOp, Table};
use crate::database::Database;
use crate::error::Result;
use crate::models::MaintenanceRecord;

impl Database {
    /// Insert a maintenance expense.  The caller supplies the creation
    /// date so historical expenses can be recorded.
    pub fn insert_maintenance(&self, record: &MaintenanceRecord) -> Result<()> {
        self.conn().execute(
            "INSERT INTO maintenance (id, property_id, description, cost, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id.to_string(),
                record.property_id.to_string(),
                record.description,
                record.cost,
                record.created_at.to_rfc3339(),
            ],
        )?;

        self.notify(ChangeEvent {
            table: Table::Maintenance,
            op: ChangeOp::Insert,
        });
        Ok(())
    }

    /// List every maintenance record, oldest first.
    pub fn list_maintenance(&self) -> Result<Vec<MaintenanceRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, property_id, description, cost, created_at
             FROM maintenance
             ORDER BY created_at ASC",
        )?;

        let rows = stmt.query_map([], row_to_maintenance)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

fn row_to_maintenance(row: &rusqlite::Row<'_>) -> rusqlite::Result<MaintenanceRecord> {
    let id_str: String = row.get(0)?;
    let property_str: String = row.get(1)?;
    let description: String = row.get(2)?;
    let cost: f64 = row.get(3)?;
    let created_str: String = row.get(4)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let property_id = Uuid::parse_str(&property_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(MaintenanceRecord {
        id,
        property_id,
        description,
        cost,
        created_at,
    })
}
