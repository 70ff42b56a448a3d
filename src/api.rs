use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{fmt, time::Duration};

use crate::{error::PanelError, stats::ServerStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    Start,
    Stop,
}

impl RecordAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordAction::Start => "start",
            RecordAction::Stop => "stop",
        }
    }
}

impl fmt::Display for RecordAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recording device's HTTP surface. Successful commands return the
/// server's plain-text reply.
#[async_trait]
pub trait ControlApi: Send + Sync {
    /// `POST /record` with `action=start|stop`.
    async fn record(&self, action: RecordAction) -> Result<String, PanelError>;

    /// `POST /delete` with `days=<n>`.
    async fn delete_older_than(&self, days: u64) -> Result<String, PanelError>;

    /// `GET /statistics`.
    async fn statistics(&self) -> Result<ServerStats, PanelError>;
}

#[derive(Clone)]
pub struct HttpControlApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpControlApi {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<String, PanelError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "sending command");
        let response = self.client.post(&url).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(PanelError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl ControlApi for HttpControlApi {
    async fn record(&self, action: RecordAction) -> Result<String, PanelError> {
        self.post_form("/record", &[("action", action.to_string())])
            .await
    }

    async fn delete_older_than(&self, days: u64) -> Result<String, PanelError> {
        self.post_form("/delete", &[("days", days.to_string())]).await
    }

    async fn statistics(&self) -> Result<ServerStats, PanelError> {
        let response = self.client.get(self.url("/statistics")).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PanelError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}
