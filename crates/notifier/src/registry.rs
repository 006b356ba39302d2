//! Channel name → capability lookup table.
//!
//! Names are matched exactly. Anything not registered resolves to
//! [`ChannelCapability::NotConfigured`], which callers skip without
//! recording an attempt.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::DeliveryError;
use crate::senders::{ChannelSender, EmailSender, PushSender, SmsSender};

/// Default upper bound on one send.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// What a channel name resolves to at dispatch time.
#[derive(Clone)]
pub enum ChannelCapability {
    /// A sender is registered for this channel.
    Deliver(Arc<dyn ChannelSender>),
    /// Unknown or disabled channel. Never fails, never counts.
    NotConfigured,
}

impl std::fmt::Debug for ChannelCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelCapability::Deliver(_) => f.write_str("Deliver"),
            ChannelCapability::NotConfigured => f.write_str("NotConfigured"),
        }
    }
}

/// Static table of channel senders plus the per-send timeout.
#[derive(Clone)]
pub struct ChannelRegistry {
    senders: HashMap<String, Arc<dyn ChannelSender>>,
    send_timeout: Duration,
}

impl ChannelRegistry {
    /// A registry with no channels; every name resolves to `NotConfigured`.
    pub fn empty(send_timeout: Duration) -> Self {
        Self {
            senders: HashMap::new(),
            send_timeout,
        }
    }

    /// The built-in `email`, `sms` and `push` senders.
    pub fn with_defaults(send_timeout: Duration) -> Self {
        Self::empty(send_timeout)
            .register("email", Arc::new(EmailSender::new()))
            .register("sms", Arc::new(SmsSender::new()))
            .register("push", Arc::new(PushSender::new()))
    }

    /// Register (or replace) the sender for `channel`.
    pub fn register(mut self, channel: impl Into<String>, sender: Arc<dyn ChannelSender>) -> Self {
        self.senders.insert(channel.into(), sender);
        self
    }

    pub fn resolve(&self, channel: &str) -> ChannelCapability {
        match self.senders.get(channel) {
            Some(sender) => ChannelCapability::Deliver(Arc::clone(sender)),
            None => ChannelCapability::NotConfigured,
        }
    }

    pub fn send_timeout(&self) -> Duration {
        self.send_timeout
    }

    /// Names of all configured channels, sorted.
    pub fn channels(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.senders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run `sender` bounded by the registry's send timeout.
    ///
    /// An elapsed timeout is reported as [`DeliveryError::Timeout`].
    pub async fn deliver(
        &self,
        sender: &dyn ChannelSender,
        user_id: i64,
        item_id: i64,
    ) -> Result<(), DeliveryError> {
        match tokio::time::timeout(self.send_timeout, sender.send(user_id, item_id)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout(self.send_timeout)),
        }
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_SEND_TIMEOUT)
    }
}
