use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, error, info};

use checkin_domain::{
    decode, Admission, GatePhase, RemoteFailure, ResolutionOutcome, ScanContext, ScanEvent,
    ScanGate,
};

use crate::{CheckInResolver, Metrics};

/// What happened to one camera callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "disposition", rename_all = "lowercase")]
pub enum ScanDisposition {
    Resolved { outcome: ResolutionOutcome },
    Suppressed,
    Deferred,
}

impl ScanDisposition {
    pub fn outcome(&self) -> Option<&ResolutionOutcome> {
        match self {
            ScanDisposition::Resolved { outcome } => Some(outcome),
            _ => None,
        }
    }
}

/// One scanning session at one entrance. Owns the gate, so every camera
/// callback for the session must go through `on_scan`.
pub struct ScanSession {
    context: ScanContext,
    resolver: Arc<CheckInResolver>,
    gate: Arc<Mutex<ScanGate>>,
    metrics: Arc<Metrics>,
}

impl ScanSession {
    pub fn new(
        context: ScanContext,
        resolver: Arc<CheckInResolver>,
        cooldown: Duration,
        metrics: Arc<Metrics>,
    ) -> Self {
        info!(
            "scan session opened: event {} ({}), entrance {} ({})",
            context.event.id, context.event.name, context.entrance.id, context.entrance.name
        );
        Self {
            context,
            resolver,
            gate: Arc::new(Mutex::new(ScanGate::new(cooldown))),
            metrics,
        }
    }

    pub fn context(&self) -> &ScanContext {
        &self.context
    }

    pub fn phase(&self) -> GatePhase {
        let mut gate = lock(&self.gate);
        gate.expire(Instant::now());
        gate.state().phase()
    }

    pub async fn on_scan(&self, raw: impl Into<String>) -> ScanDisposition {
        self.metrics.record_scan();
        self.dispatch(ScanEvent::new(raw)).await
    }

    /// Presenter dismissed the current result. A scan deferred while the
    /// gate was busy is dispatched now.
    pub async fn acknowledge(&self) -> Option<ScanDisposition> {
        let pending = lock(&self.gate).acknowledge(Instant::now());
        debug!("scan result acknowledged");
        match pending {
            Some(event) => Some(self.dispatch(event).await),
            None => None,
        }
    }

    async fn dispatch(&self, event: ScanEvent) -> ScanDisposition {
        let decoded = decode(&event.raw);
        let key = ScanGate::key_for(&event.raw, &decoded);

        // The whole admit decision happens under the lock with no await, so
        // racing callbacks observe a single winner.
        let admission = lock(&self.gate).admit(&event, &key);
        match admission {
            Admission::Admitted => {}
            Admission::Suppressed => {
                self.metrics.record_suppressed();
                return ScanDisposition::Suppressed;
            }
            Admission::Deferred => {
                self.metrics.record_deferred();
                debug!("scan deferred while another badge is being handled");
                return ScanDisposition::Deferred;
            }
        }

        let release = GateRelease {
            gate: self.gate.clone(),
            key,
        };
        let badge = match decoded {
            Ok(badge) => badge,
            Err(err) => {
                info!("rejected scan: {}", err);
                let outcome = ResolutionOutcome::invalid(err);
                self.metrics.record_outcome(&outcome);
                drop(release);
                return ScanDisposition::Resolved { outcome };
            }
        };

        // Resolution runs detached so it finishes, and releases the gate,
        // even if this caller goes away.
        let resolver = self.resolver.clone();
        let context = self.context.clone();
        let metrics = self.metrics.clone();
        let task = tokio::spawn(async move {
            let _release = release;
            let outcome = resolver.resolve(&badge, &context).await;
            metrics.record_outcome(&outcome);
            outcome
        });

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("check-in resolution aborted: {}", err);
                let outcome = ResolutionOutcome::invalid(RemoteFailure::Transport(
                    "check-in resolution aborted".to_string(),
                ));
                self.metrics.record_outcome(&outcome);
                outcome
            }
        };
        ScanDisposition::Resolved { outcome }
    }
}

/// Moves the gate into cooldown when the holder of the lock is done,
/// whether it finished, failed, or unwound.
struct GateRelease {
    gate: Arc<Mutex<ScanGate>>,
    key: String,
}

impl Drop for GateRelease {
    fn drop(&mut self) {
        lock(&self.gate).complete(&self.key, Instant::now());
    }
}

fn lock(gate: &Mutex<ScanGate>) -> MutexGuard<'_, ScanGate> {
    gate.lock().unwrap_or_else(PoisonError::into_inner)
}
