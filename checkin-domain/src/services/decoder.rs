use serde_json::Value;

use crate::errors::DecodeError;
use crate::value_objects::BadgeId;

// `badgeId` and `id` are the documented badge fields; printed badges from
// the registration desk carry `attendeeId` or `ticketId` instead.
const BADGE_FIELDS: [&str; 4] = ["badgeId", "id", "attendeeId", "ticketId"];

/// Extracts the badge identifier from a raw scan payload.
///
/// JSON objects are searched for a badge field; anything else, including
/// JSON that carries none of those fields, is taken verbatim.
pub fn decode(raw: &str) -> Result<BadgeId, DecodeError> {
    let trimmed = raw.trim();
    if let Some(value) = badge_field(trimmed) {
        return BadgeId::parse(&value);
    }
    BadgeId::parse(trimmed)
}

fn badge_field(payload: &str) -> Option<String> {
    if !payload.starts_with('{') {
        return None;
    }
    let value: Value = serde_json::from_str(payload).ok()?;
    let object = value.as_object()?;
    BADGE_FIELDS
        .iter()
        .filter_map(|field| object.get(*field))
        .find_map(field_text)
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
