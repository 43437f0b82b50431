// Scanning session context
// Resolved once when scanning starts and passed explicitly to every resolution.

use serde::{Deserialize, Serialize};

use crate::value_objects::{EntranceId, EventId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    pub id: EventId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntranceRef {
    pub id: EntranceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanContext {
    pub event: EventRef,
    pub entrance: EntranceRef,
}

impl ScanContext {
    /// A context is usable once an event and a named entrance are selected.
    pub fn is_complete(&self) -> bool {
        self.event.id.0 > 0 && !self.entrance.name.trim().is_empty()
    }
}
