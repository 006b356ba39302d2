//! Channel delivery for restock notifications.
//!
//! A channel name resolves through [`ChannelRegistry`] to either a
//! [`ChannelSender`] or the inert [`ChannelCapability::NotConfigured`].
//! Senders report success or a [`DeliveryError`]; there is no partial success.

pub mod error;
pub mod registry;
pub mod senders;

pub use error::DeliveryError;
pub use registry::{ChannelCapability, ChannelRegistry};
pub use senders::{ChannelSender, EmailSender, PushSender, SmsSender};
