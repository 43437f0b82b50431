use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use checkin_domain::{
    classify, AttendanceRecord, AuthError, BadgeId, CheckInConfirmation, CheckInRequest,
    CheckInService, CredentialProvider, RecordOrigin, Rejection, RejectionBody, RemoteFailure,
    ResolutionOutcome, ScanContext,
};

use crate::{AttendanceLog, Metrics};

/// Decides the outcome of one admitted scan. The check-in service is the
/// authority on duplicates; the attendance log is written as an audit trail.
///
/// Callers guarantee at most one resolution in flight per badge.
pub struct CheckInResolver {
    service: Arc<dyn CheckInService>,
    credentials: Arc<dyn CredentialProvider>,
    attendance: Arc<AttendanceLog>,
    metrics: Arc<Metrics>,
    offline_fallback: bool,
}

impl CheckInResolver {
    pub fn new(
        service: Arc<dyn CheckInService>,
        credentials: Arc<dyn CredentialProvider>,
        attendance: Arc<AttendanceLog>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            service,
            credentials,
            attendance,
            metrics,
            offline_fallback: false,
        }
    }

    pub fn with_offline_fallback(mut self, enabled: bool) -> Self {
        self.offline_fallback = enabled;
        self
    }

    pub async fn resolve(&self, badge: &BadgeId, context: &ScanContext) -> ResolutionOutcome {
        let token = self
            .credentials
            .access_token()
            .filter(|token| !token.trim().is_empty());
        let Some(token) = token else {
            warn!("check-in for {} refused: no access token", badge);
            return ResolutionOutcome::invalid(AuthError::MissingCredentials);
        };
        if !context.is_complete() {
            warn!("check-in for {} refused: no event or entrance selected", badge);
            return ResolutionOutcome::invalid(AuthError::MissingCredentials);
        }

        let request = CheckInRequest {
            badge_id: badge.clone(),
            entrance: context.entrance.name.clone(),
            event_id: context.event.id,
        };
        match self.service.check_in(&request, &token).await {
            Ok(confirmation) => {
                let record = confirmed_record(badge, context, confirmation);
                info!(
                    "checked in {} at {} (event {})",
                    badge, record.entrance_name, record.event_id
                );
                self.persist(&record).await;
                ResolutionOutcome::new_check_in(record)
            }
            Err(error) => self.reconcile(badge, context, classify(error)).await,
        }
    }

    async fn reconcile(
        &self,
        badge: &BadgeId,
        context: &ScanContext,
        rejection: Rejection,
    ) -> ResolutionOutcome {
        match rejection {
            Rejection::Duplicate(body) => {
                let prior_entrance = body.previous_entrance.clone();
                info!(
                    "duplicate check-in for {} (previously at {})",
                    badge,
                    prior_entrance.as_deref().unwrap_or("unknown entrance")
                );
                ResolutionOutcome::duplicate(duplicate_record(badge, context, body), prior_entrance)
            }
            Rejection::Unauthorized => {
                warn!("check-in service rejected the access token");
                ResolutionOutcome::invalid(AuthError::Expired)
            }
            Rejection::Unreachable(failure) if self.offline_fallback => {
                self.resolve_offline(badge, context, failure).await
            }
            Rejection::Unreachable(failure) | Rejection::Failed(failure) => {
                warn!("check-in for {} failed: {}", badge, failure);
                ResolutionOutcome::invalid(failure)
            }
        }
    }

    /// Local-only decision for when the service cannot be reached at all.
    async fn resolve_offline(
        &self,
        badge: &BadgeId,
        context: &ScanContext,
        failure: RemoteFailure,
    ) -> ResolutionOutcome {
        warn!("check-in service unreachable ({}), using local attendance log", failure);
        match self.attendance.find(badge).await {
            Ok(Some(existing)) => {
                let prior_entrance = Some(existing.entrance_name.clone());
                ResolutionOutcome::duplicate(existing, prior_entrance)
            }
            Ok(None) => {
                let record = AttendanceRecord {
                    origin: RecordOrigin::Offline,
                    ..confirmed_record(badge, context, CheckInConfirmation::default())
                };
                self.persist(&record).await;
                ResolutionOutcome::new_check_in(record)
            }
            Err(err) => {
                warn!("local attendance lookup failed for {}: {:#}", badge, err);
                ResolutionOutcome::invalid(failure)
            }
        }
    }

    async fn persist(&self, record: &AttendanceRecord) {
        if let Err(err) = self.attendance.record(record).await {
            self.metrics.record_cache_write_error();
            warn!("{:#}", err);
        }
    }
}

fn confirmed_record(
    badge: &BadgeId,
    context: &ScanContext,
    confirmation: CheckInConfirmation,
) -> AttendanceRecord {
    AttendanceRecord {
        badge_id: badge.clone(),
        attendee_name: non_blank(confirmation.name),
        attendee_email: non_blank(confirmation.email),
        event_id: context.event.id,
        entrance_id: context.entrance.id,
        entrance_name: non_blank(confirmation.entrance_name)
            .unwrap_or_else(|| context.entrance.name.clone()),
        check_in_time: non_blank(confirmation.check_in_time).unwrap_or_else(now_rfc3339),
        origin: RecordOrigin::Remote,
    }
}

fn duplicate_record(badge: &BadgeId, context: &ScanContext, body: RejectionBody) -> AttendanceRecord {
    AttendanceRecord {
        badge_id: badge.clone(),
        attendee_name: non_blank(body.attendee_name),
        attendee_email: non_blank(body.attendee_email),
        event_id: context.event.id,
        entrance_id: context.entrance.id,
        entrance_name: context.entrance.name.clone(),
        check_in_time: non_blank(body.check_in_time).unwrap_or_else(now_rfc3339),
        origin: RecordOrigin::Remote,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
