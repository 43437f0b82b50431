// Scan event value object
// One camera callback; never persisted

use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub raw: String,
    pub received_at: Instant,
}

impl ScanEvent {
    pub fn new(raw: impl Into<String>) -> Self {
        Self::received(raw, Instant::now())
    }

    pub fn received(raw: impl Into<String>, received_at: Instant) -> Self {
        Self {
            raw: raw.into(),
            received_at,
        }
    }
}
