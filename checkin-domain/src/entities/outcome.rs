// Resolution outcome
// The unit handed to the presenter; carries everything needed to render it.

use serde::Serialize;

use crate::entities::AttendanceRecord;
use crate::errors::InvalidReason;

pub const UNKNOWN_ENTRANCE: &str = "Unknown entrance";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ResolutionOutcome {
    New {
        record: AttendanceRecord,
    },
    Duplicate {
        record: AttendanceRecord,
        prior_entrance: String,
    },
    Invalid {
        reason: InvalidReason,
    },
}

impl ResolutionOutcome {
    pub fn new_check_in(record: AttendanceRecord) -> Self {
        ResolutionOutcome::New { record }
    }

    pub fn duplicate(record: AttendanceRecord, prior_entrance: Option<String>) -> Self {
        let prior_entrance = prior_entrance
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN_ENTRANCE.to_string());
        ResolutionOutcome::Duplicate {
            record,
            prior_entrance,
        }
    }

    pub fn invalid(reason: impl Into<InvalidReason>) -> Self {
        ResolutionOutcome::Invalid {
            reason: reason.into(),
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, ResolutionOutcome::New { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, ResolutionOutcome::Duplicate { .. })
    }

    pub fn record(&self) -> Option<&AttendanceRecord> {
        match self {
            ResolutionOutcome::New { record } | ResolutionOutcome::Duplicate { record, .. } => {
                Some(record)
            }
            ResolutionOutcome::Invalid { .. } => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ResolutionOutcome::New { record } => format!(
                "Checked in at {}",
                record.entrance_name
            ),
            ResolutionOutcome::Duplicate { prior_entrance, .. } => {
                format!("Already checked in at {}", prior_entrance)
            }
            ResolutionOutcome::Invalid { reason } => reason.user_message().to_string(),
        }
    }
}
