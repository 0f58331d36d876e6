//! Outbound chat notifications.
//!
//! The webhook handler only knows about [`Notifier`]; the HipChat backend is
//! one implementation of it.

pub mod hipchat;

use async_trait::async_trait;

use crate::error::Result;

pub use hipchat::HipChatClient;

/// Sender label shown next to relayed build messages.
pub const SENDER_LABEL: &str = "Docker Build";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Yellow,
    Red,
    Green,
    Purple,
    Gray,
    Random,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::Green => "green",
            Color::Purple => "purple",
            Color::Gray => "gray",
            Color::Random => "random",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    Text,
    Html,
}

impl MessageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageFormat::Text => "text",
            MessageFormat::Html => "html",
        }
    }
}

/// A single message destined for a chat room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub room_id: String,
    pub from: String,
    pub color: Color,
    pub message_format: MessageFormat,
    pub message: String,
    pub notify: bool,
}

impl Notification {
    /// Plain-text purple notice from the build sender.
    pub fn build_notice(room_id: impl Into<String>, message: String, notify: bool) -> Self {
        Self {
            room_id: room_id.into(),
            from: SENDER_LABEL.to_string(),
            color: Color::Purple,
            message_format: MessageFormat::Text,
            message,
            notify,
        }
    }
}

/// Something that can deliver a [`Notification`] to a chat service.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}
