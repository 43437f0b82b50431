use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use tracing::warn;

use checkin_domain::{AttendanceRecord, BadgeId, KeyValueStore};

pub const RECORD_KEY_PREFIX: &str = "checkin_";

/// Audit trail of check-ins seen by this station, one entry per badge.
pub struct AttendanceLog {
    store: Arc<dyn KeyValueStore>,
}

impl AttendanceLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn key_for(badge: &BadgeId) -> String {
        format!("{}{}", RECORD_KEY_PREFIX, badge)
    }

    pub async fn record(&self, record: &AttendanceRecord) -> anyhow::Result<()> {
        let value = serde_json::to_string(record)?;
        self.store
            .set(&Self::key_for(&record.badge_id), &value)
            .await
            .with_context(|| format!("failed to store check-in for {}", record.badge_id))
    }

    pub async fn find(&self, badge: &BadgeId) -> anyhow::Result<Option<AttendanceRecord>> {
        let Some(value) = self.store.get(&Self::key_for(badge)).await? else {
            return Ok(None);
        };
        let record = serde_json::from_str(&value)
            .with_context(|| format!("stored check-in for {} is malformed", badge))?;
        Ok(Some(record))
    }

    /// Newest first. Entries that fail to parse are skipped.
    pub async fn recent(&self, limit: usize) -> anyhow::Result<Vec<AttendanceRecord>> {
        let keys = self.store.keys_with_prefix(RECORD_KEY_PREFIX).await?;
        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(value) = self.store.get(&key).await? else {
                continue;
            };
            match serde_json::from_str::<AttendanceRecord>(&value) {
                Ok(record) => records.push(record),
                Err(err) => warn!("skipping malformed check-in entry {}: {}", key, err),
            }
        }
        records.sort_by(|a, b| parse_time(&b.check_in_time).cmp(&parse_time(&a.check_in_time)));
        records.truncate(limit);
        Ok(records)
    }
}

fn parse_time(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim()).ok()
}
