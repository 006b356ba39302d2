use async_trait::async_trait;

use super::ChannelSender;
use crate::error::DeliveryError;

/// Mock SMS sender.
#[derive(Debug, Default, Clone)]
pub struct SmsSender;

impl SmsSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChannelSender for SmsSender {
    async fn send(&self, user_id: i64, item_id: i64) -> Result<(), DeliveryError> {
        tracing::info!(user_id, item_id, channel = "sms", "[mock] SMS notification sent");
        Ok(())
    }
}
