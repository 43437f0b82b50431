use serde::Serialize;
use tracing::error;

use checkin_domain::{AttendanceRecord, EntranceRef, EventRef, GatePhase, RecentCheckInsQuery};

use crate::{AppError, AppState};

pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const MAX_RECENT_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
pub struct SessionOverview {
    pub event: EventRef,
    pub entrance: EntranceRef,
    pub phase: GatePhase,
    pub checked_in_this_session: u64,
}

pub async fn list_recent_check_ins(
    state: &AppState,
    query: RecentCheckInsQuery,
) -> Result<Vec<AttendanceRecord>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);
    state.attendance.recent(limit).await.map_err(|err| {
        error!("failed to list recent check-ins: {:#}", err);
        AppError::Storage(err)
    })
}

pub fn session_overview(state: &AppState) -> SessionOverview {
    let context = state.session.context();
    SessionOverview {
        event: context.event.clone(),
        entrance: context.entrance.clone(),
        phase: state.session.phase(),
        checked_in_this_session: state.metrics.checkins_new(),
    }
}
