use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use crate::errors::DecodeError;
use crate::value_objects::{BadgeId, ScanEvent};

pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Locked { key: String, locked_at: Instant },
    Cooldown { key: String, until: Instant },
}

impl GateState {
    pub fn phase(&self) -> GatePhase {
        match self {
            GateState::Idle => GatePhase::Idle,
            GateState::Locked { .. } => GatePhase::Locked,
            GateState::Cooldown { .. } => GatePhase::Cooldown,
        }
    }

    fn key(&self) -> Option<&str> {
        match self {
            GateState::Idle => None,
            GateState::Locked { key, .. } | GateState::Cooldown { key, .. } => Some(key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GatePhase {
    Idle,
    Locked,
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The caller owns the lock and must call `complete` with the same key.
    Admitted,
    /// Same code while locked or cooling down; dropped.
    Suppressed,
    /// Another code while busy; held until the presenter acknowledges.
    Deferred,
}

/// Per-session guard that lets exactly one resolution through per badge
/// presentation. All transitions are synchronous.
#[derive(Debug)]
pub struct ScanGate {
    state: GateState,
    pending: Option<ScanEvent>,
    cooldown: Duration,
}

impl Default for ScanGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl ScanGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: GateState::Idle,
            pending: None,
            cooldown,
        }
    }

    /// Identity used to compare scans: the badge when it decodes, otherwise
    /// the trimmed payload so a bad code is suppressed like a good one.
    pub fn key_for(raw: &str, decoded: &Result<BadgeId, DecodeError>) -> String {
        match decoded {
            Ok(badge) => badge.as_str().to_string(),
            Err(_) => raw.trim().to_string(),
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Falls back to idle once the suppression window has elapsed.
    pub fn expire(&mut self, now: Instant) {
        if let GateState::Cooldown { until, .. } = &self.state {
            if now >= *until {
                debug!("scan gate cooldown elapsed");
                self.state = GateState::Idle;
                self.pending = None;
            }
        }
    }

    pub fn admit(&mut self, event: &ScanEvent, key: &str) -> Admission {
        self.expire(event.received_at);
        let admission = match self.state.key() {
            None => Admission::Admitted,
            Some(current) if current == key => Admission::Suppressed,
            Some(_) => Admission::Deferred,
        };
        match admission {
            Admission::Admitted => {
                debug!(key, "scan gate locked");
                self.state = GateState::Locked {
                    key: key.to_string(),
                    locked_at: event.received_at,
                };
            }
            Admission::Deferred => self.pending = Some(event.clone()),
            Admission::Suppressed => {}
        }
        admission
    }

    /// Moves a held lock into cooldown. Returns false when `key` does not
    /// hold the lock.
    pub fn complete(&mut self, key: &str, now: Instant) -> bool {
        match &self.state {
            GateState::Locked { key: current, .. } if current == key => {
                debug!(key, "scan gate cooling down");
                self.state = GateState::Cooldown {
                    key: key.to_string(),
                    until: now + self.cooldown,
                };
                true
            }
            _ => false,
        }
    }

    /// Presenter dismissal: back to idle, releasing any deferred scan.
    /// There is no result to dismiss while a resolution is in flight, so a
    /// locked gate is left alone.
    /// A cooldown that has already elapsed discards the pending scan first.
    pub fn acknowledge(&mut self, now: Instant) -> Option<ScanEvent> {
        if matches!(self.state, GateState::Locked { .. }) {
            return None;
        }
        self.expire(now);
        self.state = GateState::Idle;
        self.pending.take()
    }
}
