use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use checkin_application::queries::check_in_queries::{self, SessionOverview};
use checkin_application::AppState;
use checkin_domain::{AttendanceRecord, RecentCheckInsQuery};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_recent_check_ins(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecentCheckInsQuery>,
) -> Result<Json<Vec<AttendanceRecord>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let records = check_in_queries::list_recent_check_ins(&state, query).await?;
    Ok(Json(records))
}

pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionOverview>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(check_in_queries::session_overview(&state)))
}
