use async_trait::async_trait;

/// Persistent string key-value store backing the local attendance trail.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn keys_with_prefix(&self, prefix: &str) -> anyhow::Result<Vec<String>>;
}
