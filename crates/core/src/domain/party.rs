use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyId(pub String);

impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer record, owned by the backend. The session only ever holds a
/// copy of one selected party and never mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: PartyId,
    pub display_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Fields the client supplies when creating or updating a party; `id` and
/// `displayId` are assigned by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyDraft {
    pub name: String,
    pub phone: String,
    pub address: String,
}
