//! v001 -- Initial schema creation.
//!
//! Creates the four core tables: `parties`, `messages`, `properties`, and
//! `maintenance`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Parties (landlords and tenants)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS parties (
    id              TEXT PRIMARY KEY NOT NULL,  -- UUID from the identity provider
    role            TEXT NOT NULL,              -- 'landlord' | 'tenant'
    first_name      TEXT NOT NULL,
    last_name       TEXT NOT NULL,
    profile_pic_url TEXT,
    created_at      TEXT NOT NULL               -- ISO-8601 / RFC-3339
);

-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
-- `seq` is the insertion-order tie-break for identical created_at values;
-- the store, not the client, assigns id, created_at and seq.
CREATE TABLE IF NOT EXISTS messages (
    seq            INTEGER PRIMARY KEY AUTOINCREMENT,
    id             TEXT NOT NULL UNIQUE,        -- UUID v4
    author_id      TEXT NOT NULL,               -- FK -> parties(id)
    recipient_id   TEXT NOT NULL,               -- FK -> parties(id)
    content        TEXT NOT NULL,               -- may be '' when attachment set
    attachment_url TEXT,
    created_at     TEXT NOT NULL,               -- ISO-8601

    FOREIGN KEY (author_id)    REFERENCES parties(id),
    FOREIGN KEY (recipient_id) REFERENCES parties(id)
);

CREATE INDEX IF NOT EXISTS idx_messages_thread
    ON messages(author_id, recipient_id, created_at);

-- ----------------------------------------------------------------
-- Properties
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS properties (
    id          TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    landlord_id TEXT NOT NULL,                  -- FK -> parties(id)
    address     TEXT NOT NULL,
    rent        REAL NOT NULL,
    tenant_id   TEXT,                           -- nullable FK -> parties(id)
    created_at  TEXT NOT NULL,

    FOREIGN KEY (landlord_id) REFERENCES parties(id),
    FOREIGN KEY (tenant_id)   REFERENCES parties(id)
);

-- ----------------------------------------------------------------
-- Maintenance expenses
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS maintenance (
    id          TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    property_id TEXT NOT NULL,                  -- FK -> properties(id)
    description TEXT NOT NULL,
    cost        REAL NOT NULL,
    created_at  TEXT NOT NULL,

    FOREIGN KEY (property_id) REFERENCES properties(id) ON DELETE CASCADE
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
