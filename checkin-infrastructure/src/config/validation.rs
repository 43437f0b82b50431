use checkin_domain::ScanContext;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api_base_url must start with http:// or https://, got '{0}'")]
    BaseUrl(String),
    #[error("event_id must be configured before scanning")]
    MissingEvent,
    #[error("entrance_name must be configured before scanning")]
    MissingEntrance,
}

pub fn validate_base_url(value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(());
    }
    Err(ConfigError::BaseUrl(trimmed.to_string()))
}

pub fn validate_context(context: &ScanContext) -> Result<(), ConfigError> {
    if context.event.id.0 <= 0 {
        return Err(ConfigError::MissingEvent);
    }
    if context.entrance.name.trim().is_empty() {
        return Err(ConfigError::MissingEntrance);
    }
    Ok(())
}
