use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use checkin_application::commands::scan_commands;
use checkin_application::{AppState, ScanDisposition};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(Debug, Deserialize)]
pub struct ScanPayload {
    pub raw: String,
}

/// Disposition of one scan plus the line the presenter shows for it.
#[derive(Debug, Serialize)]
pub struct ScanReply {
    #[serde(flatten)]
    pub disposition: ScanDisposition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<ScanDisposition> for ScanReply {
    fn from(disposition: ScanDisposition) -> Self {
        let message = disposition.outcome().map(|outcome| outcome.user_message());
        Self {
            disposition,
            message,
        }
    }
}

pub async fn submit_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ScanPayload>,
) -> Result<Json<ScanReply>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let disposition = scan_commands::submit_scan(&state, payload.raw).await?;
    Ok(Json(disposition.into()))
}

pub async fn acknowledge_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    match scan_commands::acknowledge_scan(&state).await {
        Some(disposition) => Ok(Json(ScanReply::from(disposition)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
