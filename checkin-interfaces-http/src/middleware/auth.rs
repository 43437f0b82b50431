use axum::http::{header, HeaderMap};

use checkin_domain::RuntimeConfig;

/// Every non-health route requires the station token once one is configured.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    match &config.station_token {
        Some(expected) => extract_bearer(headers).is_some_and(|token| token == expected),
        None => true,
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
