use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use checkin_application::{AppState, AttendanceLog, CheckInResolver, Metrics, ScanSession};
use checkin_domain::KeyValueStore;
use checkin_infrastructure::{
    AppConfig, HttpCheckInService, JsonFileStore, MemoryStore, StaticCredentialProvider,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let scan_context = config.to_scan_context()?;

        let store: Arc<dyn KeyValueStore> = if config.uses_memory_cache() {
            info!("attendance cache kept in memory only");
            Arc::new(MemoryStore::new())
        } else {
            info!("attendance cache at {}", runtime_config.cache_path);
            Arc::new(JsonFileStore::new(&runtime_config.cache_path))
        };

        let service = Arc::new(HttpCheckInService::new(
            &runtime_config.api_base_url,
            Duration::from_secs(runtime_config.request_timeout_seconds),
        )?);
        let credentials = Arc::new(StaticCredentialProvider::new(config.access_token.clone()));
        let metrics = Arc::new(Metrics::default());
        let attendance = Arc::new(AttendanceLog::new(store));

        let resolver = CheckInResolver::new(service, credentials, attendance.clone(), metrics.clone())
            .with_offline_fallback(runtime_config.offline_fallback);
        let session = ScanSession::new(
            scan_context,
            Arc::new(resolver),
            Duration::from_millis(runtime_config.cooldown_ms),
            metrics.clone(),
        );

        let state = AppState {
            config: runtime_config,
            session: Arc::new(session),
            attendance,
            metrics,
        };

        Ok(Self { state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(cache_path: &str) -> AppConfig {
        let mut config = AppConfig::parse(&format!(
            "event_id = 7\nevent_name = \"Kigali Summit\"\nentrance_id = 3\n\
             entrance_name = \"South Gate\"\ncache_path = \"{}\"\n",
            cache_path
        ))
        .expect("parse");
        config.finalize(None).expect("finalize");
        config
    }

    #[tokio::test]
    async fn wires_session_for_configured_entrance() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = dir.path().join("attendance.json");
        let context =
            AppContext::new(&config(&cache.to_string_lossy())).expect("context");

        let session = context.state.session.context();
        assert_eq!(session.event.name, "Kigali Summit");
        assert_eq!(session.entrance.name, "South Gate");
        assert!(context.state.attendance.recent(10).await.expect("recent").is_empty());
    }

    #[test]
    fn refuses_to_start_without_an_entrance() {
        let mut config = AppConfig::default();
        config.finalize(None).expect("finalize");
        assert!(AppContext::new(&config).is_err());
    }
}
