use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use tracing::{debug, warn};

use checkin_domain::{
    CheckInConfirmation, CheckInError, CheckInRequest, CheckInService, RejectionBody,
};

pub const CHECK_IN_PATH: &str = "/attendees/check-in";

/// Remote attendance service reached over HTTPS.
pub struct HttpCheckInService {
    client: Client,
    endpoint: String,
}

impl HttpCheckInService {
    pub fn new(api_base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", api_base_url.trim_end_matches('/'), CHECK_IN_PATH),
        })
    }

}

#[async_trait]
impl CheckInService for HttpCheckInService {
    async fn check_in(
        &self,
        request: &CheckInRequest,
        token: &str,
    ) -> Result<CheckInConfirmation, CheckInError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        // Once a status line arrived the service has answered; a broken body
        // only loses detail and must not read as an unreachable service.
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                warn!("check-in response body for {} unreadable: {}", request.badge_id, err);
                String::new()
            }
        };
        debug!("check-in for {} answered {}", request.badge_id, status);

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(CheckInConfirmation::default());
            }
            return match serde_json::from_str::<CheckInConfirmation>(&text) {
                Ok(confirmation) => Ok(confirmation),
                Err(err) => {
                    warn!("unreadable check-in confirmation: {}", err);
                    Ok(CheckInConfirmation::default())
                }
            };
        }

        Err(CheckInError::Rejected {
            status: status.as_u16(),
            body: parse_rejection(&text),
        })
    }
}

fn transport_error(err: reqwest::Error) -> CheckInError {
    CheckInError::Transport {
        message: err.to_string(),
        timed_out: err.is_timeout(),
    }
}

// A body that is missing or not a JSON error object carries no usable detail.
fn parse_rejection(text: &str) -> RejectionBody {
    serde_json::from_str::<RejectionBody>(text).unwrap_or_default()
}
