use std::sync::Arc;

use checkin_domain::RuntimeConfig;

use crate::{AttendanceLog, Metrics, ScanSession};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub session: Arc<ScanSession>,
    pub attendance: Arc<AttendanceLog>,
    pub metrics: Arc<Metrics>,
}
