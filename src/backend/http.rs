// ABOUTME: HTTP backend — POSTs chat requests as JSON with reqwest.
// ABOUTME: Maps status, transport, and body failures onto BackendError without retrying.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::backend::{BackendError, ChatBackend, ChatRequest, ReplyResult, parse_reply_body};
use crate::config::BackendConfig;

/// Backend reached over plain HTTP(S).
pub struct HttpBackend {
    client: Client,
    url: String,
}

impl HttpBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> anyhow::Result<Self> {
        Self::new(
            config.url.clone(),
            Duration::from_secs(config.timeout_seconds.max(1)),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, request: &ChatRequest) -> ReplyResult {
        tracing::debug!(url = %self.url, session_id = %request.session_id, "posting message");

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        parse_reply_body(&body)
    }
}
