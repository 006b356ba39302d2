use async_trait::async_trait;

use super::ChannelSender;
use crate::error::DeliveryError;

/// Mock email sender. Logs the delivery and always succeeds.
#[derive(Debug, Default, Clone)]
pub struct EmailSender;

impl EmailSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChannelSender for EmailSender {
    async fn send(&self, user_id: i64, item_id: i64) -> Result<(), DeliveryError> {
        tracing::info!(user_id, item_id, channel = "email", "[mock] Email notification sent");
        Ok(())
    }
}
