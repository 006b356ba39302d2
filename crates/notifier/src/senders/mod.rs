pub mod email;
pub mod push;
pub mod sms;

use async_trait::async_trait;

use crate::error::DeliveryError;

/// Delivers a restock notification to one user over one channel.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Attempt delivery. `Ok(())` means the provider accepted the message.
    async fn send(&self, user_id: i64, item_id: i64) -> Result<(), DeliveryError>;
}

pub use email::EmailSender;
pub use push::PushSender;
pub use sms::SmsSender;
