//! HTTP client posting quiz submissions to the automation webhook.

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::payload::WebhookPayload;

/// Endpoint that receives quiz submissions.
pub const DEFAULT_WEBHOOK_URL: &str = "https://hook.us1.make.com/sf31vpldv8wqle5k25w2aupr2gqx2rqt";

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("falha ao enviar dados: server returned {status}: {body}")]
    Server { status: u16, body: String },
}

/// Posts submissions to a single webhook endpoint. Cheap to clone.
#[derive(Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    endpoint: String,
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new(DEFAULT_WEBHOOK_URL)
    }
}

impl WebhookClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the payload as JSON, stamped with the time of sending. Any non-2xx
    /// status is an error; the response body is only read to report failures.
    pub async fn send(&self, payload: &WebhookPayload) -> Result<(), WebhookError> {
        let body = payload.stamped_now();
        info!(endpoint = %self.endpoint, timestamp = %body.timestamp, "sending quiz submission");
        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WebhookError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Send in the background. Failures are logged and dropped; nothing is retried.
    ///
    /// The returned handle may be ignored; awaiting it only waits for the log line.
    pub fn dispatch(&self, payload: WebhookPayload) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            match client.send(&payload).await {
                Ok(()) => info!(endpoint = %client.endpoint, "dados enviados com sucesso"),
                Err(e) => error!(endpoint = %client.endpoint, error = %e, "erro ao enviar dados"),
            }
        })
    }
}
