// Attendance record entity
// One attendee's check-in at one event, as kept in the local audit trail

use serde::{Deserialize, Serialize};

use crate::value_objects::{BadgeId, EntranceId, EventId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordOrigin {
    /// Confirmed by the check-in service.
    #[default]
    Remote,
    /// Written while the service was unreachable; never confirmed.
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub badge_id: BadgeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_email: Option<String>,
    pub event_id: EventId,
    pub entrance_id: EntranceId,
    pub entrance_name: String,
    pub check_in_time: String,
    #[serde(default)]
    pub origin: RecordOrigin,
}
