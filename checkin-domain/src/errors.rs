// Failure taxonomy for a single scan
// A duplicate check-in is an outcome, not an error, and has no variant here.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty badge identifier")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error("credentials rejected by check-in service")]
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteFailure {
    #[error("network error: {0}")]
    Transport(String),
    #[error("check-in service timed out")]
    Timeout,
    #[error("check-in service responded {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Remote(#[from] RemoteFailure),
}

impl InvalidReason {
    pub fn kind(&self) -> &'static str {
        match self {
            InvalidReason::Decode(_) => "decode",
            InvalidReason::Auth(_) => "auth",
            InvalidReason::Remote(_) => "remote",
        }
    }

    /// Text shown to the operator. Only auth failures ask for something
    /// other than a rescan.
    pub fn user_message(&self) -> &'static str {
        match self {
            InvalidReason::Decode(_) => "Invalid QR code",
            InvalidReason::Auth(_) => "Session expired, please sign in again",
            InvalidReason::Remote(_) => "Check-in failed, try again",
        }
    }
}

impl Serialize for InvalidReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("InvalidReason", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("reason", &self.to_string())?;
        state.end()
    }
}
