// In-memory stand-ins for the ports, shared by the unit tests in this crate.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use checkin_domain::{
    AttendanceRecord, BadgeId, CheckInConfirmation, CheckInError, CheckInRequest,
    CheckInService, CredentialProvider, EntranceId, EntranceRef, EventId, EventRef,
    KeyValueStore, RecordOrigin, RejectionBody, ScanContext,
};

use crate::{AttendanceLog, CheckInResolver, Metrics};

#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<BTreeMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryKv {
    pub fn failing_writes() -> Self {
        let store = Self::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        self.insert(key, value);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

pub enum Reply {
    Confirm(CheckInConfirmation),
    Fail(CheckInError),
    Panic,
}

#[derive(Default)]
pub struct ScriptedService {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<(CheckInRequest, String)>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedService {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(CheckInRequest, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckInService for ScriptedService {
    async fn check_in(
        &self,
        request: &CheckInRequest,
        token: &str,
    ) -> Result<CheckInConfirmation, CheckInError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), token.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Confirm(confirmation)) => Ok(confirmation),
            Some(Reply::Fail(error)) => Err(error),
            Some(Reply::Panic) => panic!("scripted service panic"),
            None => Err(CheckInError::Transport {
                message: "no scripted reply".to_string(),
                timed_out: false,
            }),
        }
    }
}

pub struct FixedToken(pub Option<&'static str>);

impl CredentialProvider for FixedToken {
    fn access_token(&self) -> Option<String> {
        self.0.map(ToString::to_string)
    }
}

pub fn confirm(name: &str, time: &str) -> Reply {
    Reply::Confirm(CheckInConfirmation {
        name: Some(name.to_string()),
        check_in_time: Some(time.to_string()),
        ..CheckInConfirmation::default()
    })
}

pub fn rejected(status: u16, body: RejectionBody) -> Reply {
    Reply::Fail(CheckInError::Rejected { status, body })
}

pub fn already_checked_in(previous_entrance: Option<&str>) -> Reply {
    rejected(
        409,
        RejectionBody {
            message: Some("already checked in".to_string()),
            previous_entrance: previous_entrance.map(ToString::to_string),
            ..RejectionBody::default()
        },
    )
}

pub fn unreachable(timed_out: bool) -> Reply {
    Reply::Fail(CheckInError::Transport {
        message: "connection refused".to_string(),
        timed_out,
    })
}

pub fn context() -> ScanContext {
    ScanContext {
        event: EventRef {
            id: EventId(7),
            name: "Kigali Summit".to_string(),
        },
        entrance: EntranceRef {
            id: EntranceId(3),
            name: "South Gate".to_string(),
            max_capacity: Some(500),
        },
    }
}

pub fn record_at(badge: &str, time: &str) -> AttendanceRecord {
    AttendanceRecord {
        badge_id: BadgeId::parse(badge).unwrap(),
        attendee_name: None,
        attendee_email: None,
        event_id: EventId(7),
        entrance_id: EntranceId(3),
        entrance_name: "South Gate".to_string(),
        check_in_time: time.to_string(),
        origin: RecordOrigin::Remote,
    }
}

pub struct Harness {
    pub service: Arc<ScriptedService>,
    pub store: Arc<MemoryKv>,
    pub metrics: Arc<Metrics>,
    pub resolver: Arc<CheckInResolver>,
}

pub fn harness(service: ScriptedService, store: MemoryKv, offline_fallback: bool) -> Harness {
    let service = Arc::new(service);
    let store = Arc::new(store);
    let metrics = Arc::new(Metrics::default());
    let resolver = CheckInResolver::new(
        service.clone(),
        Arc::new(FixedToken(Some("tok-123"))),
        Arc::new(AttendanceLog::new(store.clone())),
        metrics.clone(),
    )
    .with_offline_fallback(offline_fallback);
    Harness {
        service,
        store,
        metrics,
        resolver: Arc::new(resolver),
    }
}

pub fn app_state(h: &Harness) -> crate::AppState {
    let config = checkin_domain::RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_base_url: "http://127.0.0.1:9".to_string(),
        station_token: None,
        cache_path: String::new(),
        cooldown_ms: 1000,
        request_timeout_seconds: 5,
        offline_fallback: false,
    };
    crate::AppState {
        session: Arc::new(crate::ScanSession::new(
            context(),
            h.resolver.clone(),
            Duration::from_millis(config.cooldown_ms),
            h.metrics.clone(),
        )),
        attendance: Arc::new(AttendanceLog::new(h.store.clone())),
        metrics: h.metrics.clone(),
        config,
    }
}
