use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("attendance store unavailable: {0}")]
    Storage(#[source] anyhow::Error),
}
