//! Domain model structs persisted in the SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to view models across crate seams.

use chrono::{DateTime, Utc};
use rentline_shared::{PartyId, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Party
// ---------------------------------------------------------------------------

/// A landlord or tenant identity known to the system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Party {
    /// Stable identifier from the identity provider.
    pub id: PartyId,
    /// Which side of the tenancy this party sits on.
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    /// Optional URL of an uploaded profile picture.
    pub profile_pic_url: Option<String>,
    /// When this party was first recorded.
    pub created_at: DateTime<Utc>,
}

impl Party {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message between two parties.
///
/// `id`, `created_at` and `seq` are assigned by the store at insert time;
/// the store is the single ordering authority. Messages are never mutated
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique message identifier, assigned at insert.
    pub id: Uuid,
    /// Party that sent the message.
    pub author_id: PartyId,
    /// Party the message is addressed to.
    pub recipient_id: PartyId,
    /// Text content. May be empty when an attachment is present.
    pub content: String,
    /// Durable URL of an uploaded image attachment, if any.
    pub attachment_url: Option<String>,
    /// Creation timestamp, assigned by the store.
    pub created_at: DateTime<Utc>,
    /// Store insertion order, used to break creation-timestamp ties.
    pub seq: i64,
}

/// The client-supplied part of a message, before the store assigns
/// identity and ordering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMessage {
    pub author_id: PartyId,
    pub recipient_id: PartyId,
    pub content: String,
    pub attachment_url: Option<String>,
}

impl NewMessage {
    /// Whether the draft carries anything worth sending.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty() && self.attachment_url.is_none()
    }
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

/// A rental property owned by a landlord.  Feeds the financial summary:
/// the property contributes its monthly rent from its creation month on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: Uuid,
    pub landlord_id: PartyId,
    /// Street address, display only.
    pub address: String,
    /// Monthly rent in whole currency units.
    pub rent: f64,
    /// Tenant currently occupying the property, if any.
    pub tenant_id: Option<PartyId>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

/// A maintenance expense attached to a property.  Counts against the
/// financial summary at its creation date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub property_id: Uuid,
    pub description: String,
    pub cost: f64,
    pub created_at: DateTime<Utc>,
}
