use crate::{AppError, AppState, ScanDisposition};

// Comfortably above the largest QR code payload.
pub const MAX_PAYLOAD_BYTES: usize = 4096;

pub async fn submit_scan(state: &AppState, raw: String) -> Result<ScanDisposition, AppError> {
    if raw.len() > MAX_PAYLOAD_BYTES {
        return Err(AppError::BadRequest(format!(
            "scan payload exceeds {} bytes",
            MAX_PAYLOAD_BYTES
        )));
    }
    Ok(state.session.on_scan(raw).await)
}

pub async fn acknowledge_scan(state: &AppState) -> Option<ScanDisposition> {
    state.session.acknowledge().await
}
