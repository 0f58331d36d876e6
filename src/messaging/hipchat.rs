//! HipChat v1 `rooms/message` client

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{Notification, Notifier};
use crate::error::{RelayError, Result};

const USER_AGENT: &str = concat!("hub_relay/", env!("CARGO_PKG_VERSION"));

/// Error object HipChat returns in the response body on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct HipChatClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl HipChatClient {
    /// Build a client for `base_url` (e.g. `https://api.hipchat.com/v1`).
    /// Every request is bounded by `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        auth_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RelayError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token: auth_token.into(),
        })
    }

    fn message_url(&self) -> String {
        format!("{}/rooms/message", self.base_url)
    }

    /// Post a message to a room.
    pub async fn post_message(&self, notification: &Notification) -> Result<()> {
        let notify = if notification.notify { "1" } else { "0" };
        let form = [
            ("room_id", notification.room_id.as_str()),
            ("from", notification.from.as_str()),
            ("message", notification.message.as_str()),
            ("message_format", notification.message_format.as_str()),
            ("notify", notify),
            ("color", notification.color.as_str()),
            ("format", "json"),
        ];

        let response = self
            .client
            .post(self.message_url())
            .query(&[("auth_token", self.auth_token.as_str())])
            .form(&form)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        // the URL carries the API key, keep it out of errors and logs
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)?;
        debug!("HipChat responded {} for room '{}'", status, notification.room_id);

        // HipChat reports some failures as an `error` object with a 200 status.
        if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(&body) {
            let detail = api_error.error;
            let message = match detail.kind {
                Some(kind) => format!("{}: {}", kind, detail.message),
                None => detail.message,
            };
            return Err(RelayError::ApiError {
                status: detail.code.unwrap_or(status.as_u16()),
                message,
            });
        }

        if !status.is_success() {
            return Err(RelayError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for HipChatClient {
    async fn send(&self, notification: &Notification) -> Result<()> {
        self.post_message(notification).await
    }
}
