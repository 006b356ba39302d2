use async_trait::async_trait;

use super::ChannelSender;
use crate::error::DeliveryError;

/// Mock push sender.
#[derive(Debug, Default, Clone)]
pub struct PushSender;

impl PushSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChannelSender for PushSender {
    async fn send(&self, user_id: i64, item_id: i64) -> Result<(), DeliveryError> {
        tracing::info!(user_id, item_id, channel = "push", "[mock] Push notification sent");
        Ok(())
    }
}
