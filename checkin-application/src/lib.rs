// Check-in Application Layer

pub mod attendance_log;
pub mod commands;
pub mod error;
pub mod metrics;
pub mod queries;
pub mod resolver;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use attendance_log::AttendanceLog;
pub use error::AppError;
pub use metrics::Metrics;
pub use resolver::CheckInResolver;
pub use session::{ScanDisposition, ScanSession};
pub use state::AppState;
