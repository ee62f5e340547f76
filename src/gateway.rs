use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;

use crate::form::IncidentRecord;

/// A submission either reaches the webhook or it doesn't; there is no retry.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook rejected submission: HTTP {0}")]
    Status(u16),
}

/// Wire shape posted to the workflow webhook: the record's fields plus a
/// submission timestamp.
#[derive(Debug, Serialize)]
pub struct SubmissionPayload<'a> {
    #[serde(flatten)]
    pub incident: &'a IncidentRecord,
    pub submitted_at: DateTime<Utc>,
}

/// HTTP boundary to the workflow-automation webhook. One POST per submit,
/// bounded by the configured timeout; a timed-out call surfaces as a
/// transport error.
#[derive(Debug, Clone)]
pub struct WebhookGateway {
    client: Client,
    endpoint: String,
}

impl WebhookGateway {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, SubmitError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the finished record. Single attempt; the caller owns state
    /// transitions and user notifications.
    pub async fn submit(&self, incident: &IncidentRecord) -> Result<(), SubmitError> {
        let payload = SubmissionPayload {
            incident,
            submitted_at: Utc::now(),
        };
        log::info!("Submitting incident to webhook at {}", self.endpoint);

        let response = self.client.post(&self.endpoint).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status(status.as_u16()));
        }
        Ok(())
    }
}
