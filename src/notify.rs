//! Out-of-band messages to users who did not send the current message
//! (listing owners and saved-search subscribers).

use async_trait::async_trait;
use serenity::builder::CreateMessage;
use serenity::http::Http;
use serenity::model::id::UserId;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("platform id {0} is not a valid recipient")]
    InvalidRecipient(i64),
    #[error("discord error: {0}")]
    Discord(#[from] serenity::Error),
    #[error("notification rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, platform_id: i64, text: &str) -> Result<(), NotifyError>;
}

/// Delivers notifications as Discord direct messages.
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, platform_id: i64, text: &str) -> Result<(), NotifyError> {
        let raw = u64::try_from(platform_id)
            .ok()
            .filter(|id| *id != 0)
            .ok_or(NotifyError::InvalidRecipient(platform_id))?;
        UserId::new(raw)
            .direct_message(&self.http, CreateMessage::new().content(text))
            .await?;
        Ok(())
    }
}
