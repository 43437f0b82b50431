use serde::{Deserialize, Serialize};

use crate::value_objects::{BadgeId, EventId};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_base_url: String,
    pub station_token: Option<String>,
    pub cache_path: String,
    pub cooldown_ms: u64,
    pub request_timeout_seconds: u64,
    pub offline_fallback: bool,
}

/// Body of `POST /attendees/check-in`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub badge_id: BadgeId,
    pub entrance: String,
    pub event_id: EventId,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInConfirmation {
    #[serde(default, alias = "attendeeName")]
    pub name: Option<String>,
    #[serde(default, alias = "attendeeEmail")]
    pub email: Option<String>,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default, alias = "entrance")]
    pub entrance_name: Option<String>,
}

/// Error payload the service may attach to a rejected check-in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionBody {
    #[serde(default, alias = "error")]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub attendee_name: Option<String>,
    #[serde(default)]
    pub attendee_email: Option<String>,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub previous_entrance: Option<String>,
}

/// Why the service call produced no confirmation.
#[derive(Debug, Clone)]
pub enum CheckInError {
    /// No HTTP response was received.
    Transport { message: String, timed_out: bool },
    /// The service answered with a non-success status.
    Rejected { status: u16, body: RejectionBody },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentCheckInsQuery {
    pub limit: Option<usize>,
}
