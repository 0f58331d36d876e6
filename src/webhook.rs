//! Docker Hub webhook payload structures

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Body Docker Hub POSTs when an automated build completes.
/// Every field is optional on the wire; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DockerHubPayload {
    pub push_data: PushData,
    pub repository: Repository,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PushData {
    pub pushed_at: i64,
    pub images: Vec<String>,
    pub pusher: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub status: String,
    pub description: String,
    // also accept the misspelled key
    #[serde(alias = "is_truested")]
    pub is_trusted: bool,
    pub full_description: String,
    pub repo_url: String,
    pub owner: String,
    pub is_official: bool,
    pub is_private: bool,
    pub name: String,
    pub namespace: String,
    pub star_count: i64,
    pub comment_count: i64,
    pub date_created: i64,
    pub dockerfile: String,
    pub repo_name: String,
}

impl DockerHubPayload {
    /// Decode a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Chat text announcing the finished build.
    pub fn notification_text(&self) -> String {
        format!(
            "Build of {} completed {}",
            self.repository.repo_name, self.repository.repo_url
        )
    }
}

impl PushData {
    /// `pushed_at` as a UTC timestamp, if it was supplied.
    pub fn pushed_at_utc(&self) -> Option<DateTime<Utc>> {
        if self.pushed_at <= 0 {
            return None;
        }
        DateTime::from_timestamp(self.pushed_at, 0)
    }
}
