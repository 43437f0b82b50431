use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use checkin_domain::{EntranceId, EntranceRef, EventId, EventRef, RuntimeConfig, ScanContext};

use crate::config::validation::{validate_base_url, validate_context};

pub const CONFIG_ENV: &str = "CHECKIN_CONFIG";

/// `cache_path` value that keeps the attendance trail in memory only.
pub const MEMORY_CACHE: &str = ":memory:";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_base_url: String,
    pub access_token: Option<String>,
    pub station_token: Option<String>,
    pub event_id: i64,
    pub event_name: String,
    pub entrance_id: i64,
    pub entrance_name: String,
    pub entrance_max_capacity: Option<u32>,
    pub cache_path: String,
    pub cooldown_ms: u64,
    pub request_timeout_seconds: u64,
    pub offline_fallback: bool,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_base_url: "https://api.kcc.eventsfactory.rw".to_string(),
            access_token: None,
            station_token: None,
            event_id: 0,
            event_name: String::new(),
            entrance_id: 0,
            entrance_name: String::new(),
            entrance_max_capacity: None,
            cache_path: "./attendance.json".to_string(),
            cooldown_ms: 1000,
            request_timeout_seconds: 15,
            offline_fallback: false,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &str) -> Result<Self> {
        let file_path = Path::new(path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::parse(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.finalize(file_path.parent())?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config: {}", err))
    }

    /// Resolves relative paths against `base_dir`, normalizes, and validates.
    pub fn finalize(&mut self, base_dir: Option<&Path>) -> Result<()> {
        self.resolve_paths(base_dir);
        self.normalize();
        self.validate()
    }

    pub fn normalize(&mut self) {
        self.access_token = non_blank(self.access_token.take());
        self.station_token = non_blank(self.station_token.take());
        self.log_dir = non_blank(self.log_dir.take());
        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();
        self.event_name = self.event_name.trim().to_string();
        self.entrance_name = self.entrance_name.trim().to_string();
        if self.entrance_max_capacity == Some(0) {
            self.entrance_max_capacity = None;
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        if !self.uses_memory_cache() {
            self.cache_path = resolve_path(base, &self.cache_path);
        }
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        validate_base_url(&self.api_base_url)?;
        if self.cache_path.trim().is_empty() {
            return Err(anyhow!("cache_path must not be empty"));
        }
        if self.cooldown_ms == 0 {
            return Err(anyhow!("cooldown_ms must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn uses_memory_cache(&self) -> bool {
        self.cache_path.trim() == MEMORY_CACHE
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_base_url: self.api_base_url.clone(),
            station_token: self.station_token.clone(),
            cache_path: self.cache_path.clone(),
            cooldown_ms: self.cooldown_ms,
            request_timeout_seconds: self.request_timeout_seconds,
            offline_fallback: self.offline_fallback,
        }
    }

    /// The event and entrance this station scans for. Required before a
    /// session can start.
    pub fn to_scan_context(&self) -> Result<ScanContext> {
        let context = ScanContext {
            event: EventRef {
                id: EventId(self.event_id),
                name: self.event_name.clone(),
            },
            entrance: EntranceRef {
                id: EntranceId(self.entrance_id),
                name: self.entrance_name.clone(),
                max_capacity: self.entrance_max_capacity,
            },
        };
        validate_context(&context)?;
        Ok(context)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("CHECKIN_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("CHECKIN_API_BASE_URL") {
            self.api_base_url = value;
        }
        if let Ok(value) = env::var("CHECKIN_ACCESS_TOKEN") {
            self.access_token = Some(value);
        }
        if let Ok(value) = env::var("CHECKIN_STATION_TOKEN") {
            self.station_token = Some(value);
        }
        if let Ok(value) = env::var("CHECKIN_EVENT_ID") {
            self.event_id = value.parse().unwrap_or(self.event_id);
        }
        if let Ok(value) = env::var("CHECKIN_EVENT_NAME") {
            self.event_name = value;
        }
        if let Ok(value) = env::var("CHECKIN_ENTRANCE_ID") {
            self.entrance_id = value.parse().unwrap_or(self.entrance_id);
        }
        if let Ok(value) = env::var("CHECKIN_ENTRANCE_NAME") {
            self.entrance_name = value;
        }
        if let Ok(value) = env::var("CHECKIN_ENTRANCE_MAX_CAPACITY") {
            self.entrance_max_capacity = value.parse().ok();
        }
        if let Ok(value) = env::var("CHECKIN_CACHE_PATH") {
            self.cache_path = value;
        }
        if let Ok(value) = env::var("CHECKIN_COOLDOWN_MS") {
            self.cooldown_ms = value.parse().unwrap_or(self.cooldown_ms);
        }
        if let Ok(value) = env::var("CHECKIN_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("CHECKIN_OFFLINE_FALLBACK") {
            self.offline_fallback = value.parse().unwrap_or(self.offline_fallback);
        }
        if let Ok(value) = env::var("CHECKIN_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}
