use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a status column holds a value outside its enum.
#[derive(Debug, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Fulfillment state of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionStatus {
    /// Awaiting a successful delivery.
    Pending,
    /// At least one channel succeeded at least once.
    Notified,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "PENDING",
            SubscriptionStatus::Notified => "NOTIFIED",
        }
    }
}

impl TryFrom<String> for SubscriptionStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PENDING" => Ok(SubscriptionStatus::Pending),
            "NOTIFIED" => Ok(SubscriptionStatus::Notified),
            _ => Err(UnknownVariant {
                kind: "subscription status",
                value,
            }),
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one delivery attempt on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryOutcome {
    Success,
    Failed,
}

impl DeliveryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryOutcome::Success => "SUCCESS",
            DeliveryOutcome::Failed => "FAILED",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Success)
    }
}

impl TryFrom<String> for DeliveryOutcome {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "SUCCESS" => Ok(DeliveryOutcome::Success),
            "FAILED" => Ok(DeliveryOutcome::Failed),
            _ => Err(UnknownVariant {
                kind: "delivery outcome",
                value,
            }),
        }
    }
}

impl std::fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's standing interest in one item's restock.
///
/// At most one subscription exists per `(user_id, item_id)`. `channels`
/// keeps the order the subscriber gave; dispatch walks it in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub item_id: i64,
    #[sqlx(json)]
    pub channels: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: SubscriptionStatus,
}

/// One immutable ledger entry describing a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct NotificationRecord {
    pub id: i64,
    pub user_id: i64,
    pub item_id: i64,
    pub channel: String,
    #[sqlx(try_from = "String")]
    pub status: DeliveryOutcome,
    pub created_at: DateTime<Utc>,
}

/// A delivery attempt about to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: i64,
    pub item_id: i64,
    pub channel: String,
    pub status: DeliveryOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_stored_values() {
        assert_eq!(
            SubscriptionStatus::try_from("NOTIFIED".to_string()).unwrap(),
            SubscriptionStatus::Notified
        );
        assert!(SubscriptionStatus::try_from("notified".to_string()).is_err());
        assert_eq!(
            DeliveryOutcome::try_from("FAILED".to_string()).unwrap(),
            DeliveryOutcome::Failed
        );
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&SubscriptionStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        let json = serde_json::to_string(&DeliveryOutcome::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");
    }
}
