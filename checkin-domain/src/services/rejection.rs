use crate::entities::{CheckInError, RejectionBody};
use crate::errors::RemoteFailure;

const DUPLICATE_CODES: [&str; 3] = ["ALREADY_CHECKED_IN", "DUPLICATE", "DUPLICATE_CHECK_IN"];
const DUPLICATE_PHRASES: [&str; 2] = ["already checked in", "duplicate"];

/// A failed check-in call, sorted by what the resolver does with it.
#[derive(Debug, Clone)]
pub enum Rejection {
    Duplicate(RejectionBody),
    Unauthorized,
    /// No response at all; the only case the offline fallback may handle.
    Unreachable(RemoteFailure),
    Failed(RemoteFailure),
}

pub fn classify(error: CheckInError) -> Rejection {
    match error {
        CheckInError::Transport { message, timed_out } => {
            if timed_out {
                Rejection::Unreachable(RemoteFailure::Timeout)
            } else {
                Rejection::Unreachable(RemoteFailure::Transport(message))
            }
        }
        CheckInError::Rejected { status, body } => {
            if is_duplicate(&body) {
                return Rejection::Duplicate(body);
            }
            if status == 401 {
                return Rejection::Unauthorized;
            }
            let message = body
                .message
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| format!("HTTP {}", status));
            Rejection::Failed(RemoteFailure::Status { status, message })
        }
    }
}

fn is_duplicate(body: &RejectionBody) -> bool {
    if let Some(code) = body.code.as_deref() {
        let code = code.trim();
        if DUPLICATE_CODES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(code))
        {
            return true;
        }
    }
    let Some(message) = body.message.as_deref() else {
        return false;
    };
    let message = message.to_lowercase();
    DUPLICATE_PHRASES
        .iter()
        .any(|phrase| message.contains(phrase))
}
