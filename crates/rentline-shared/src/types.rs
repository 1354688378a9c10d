use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Party identity = UUID assigned by the identity provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartyId(pub Uuid);

impl PartyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for PartyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of a tenancy a party sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Landlord,
    Tenant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Landlord => "landlord",
            Role::Tenant => "tenant",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "landlord" => Some(Role::Landlord),
            "tenant" => Some(Role::Tenant),
            _ => None,
        }
    }
}

/// The unordered pair of party identifiers that scopes a conversation.
///
/// Construction canonicalizes the pair so `ThreadKey::new(a, b)` and
/// `ThreadKey::new(b, a)` compare equal and produce identical queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ThreadKey {
    low: PartyId,
    high: PartyId,
}

impl ThreadKey {
    pub fn new(a: PartyId, b: PartyId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn parties(&self) -> (PartyId, PartyId) {
        (self.low, self.high)
    }

    pub fn contains(&self, party: PartyId) -> bool {
        self.low == party || self.high == party
    }

    /// The other party of the pair, if `party` is a member.
    pub fn peer_of(&self, party: PartyId) -> Option<PartyId> {
        if party == self.low {
            Some(self.high)
        } else if party == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_key_is_order_insensitive() {
        let a = PartyId::new();
        let b = PartyId::new();
        assert_eq!(ThreadKey::new(a, b), ThreadKey::new(b, a));
    }

    #[test]
    fn peer_of_resolves_both_directions() {
        let a = PartyId::new();
        let b = PartyId::new();
        let key = ThreadKey::new(a, b);
        assert_eq!(key.peer_of(a), Some(b));
        assert_eq!(key.peer_of(b), Some(a));
        assert_eq!(key.peer_of(PartyId::new()), None);
    }

    #[test]
    fn party_id_serializes_as_plain_uuid() {
        let id = PartyId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
        let back: PartyId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn role_round_trip() {
        assert_eq!(Role::from_str("landlord"), Some(Role::Landlord));
        assert_eq!(Role::from_str(Role::Tenant.as_str()), Some(Role::Tenant));
        assert_eq!(Role::from_str("manager"), None);
    }
}
