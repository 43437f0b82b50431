use async_trait::async_trait;

use crate::entities::{CheckInConfirmation, CheckInError, CheckInRequest};

#[async_trait]
pub trait CheckInService: Send + Sync {
    async fn check_in(
        &self,
        request: &CheckInRequest,
        token: &str,
    ) -> Result<CheckInConfirmation, CheckInError>;
}

/// Source of the bearer token for the check-in service.
pub trait CredentialProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}
