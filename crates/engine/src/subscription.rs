//! Subscription service — the subscribe path in front of the store.
//!
//! A subscription links a user to one item and an ordered list of channel
//! names. Subscribing again replaces the channel list and puts the
//! subscription back to PENDING, so the next restock notifies again.

use restock_common::error::AppError;
use restock_common::types::Subscription;

use crate::store::DispatchStore;

/// Service layer for subscription writes and lookups.
pub struct SubscriptionService;

/// Parameters for creating or replacing a subscription.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SubscribeParams {
    pub user_id: i64,
    pub item_id: i64,
    pub channels: Vec<String>,
}

impl SubscriptionService {
    /// Create the subscription, or overwrite the existing one for the same
    /// user and item.
    ///
    /// Channel names are not checked against the configured channels;
    /// unknown names are skipped at dispatch time.
    pub async fn create_or_replace(
        store: &dyn DispatchStore,
        params: &SubscribeParams,
    ) -> Result<Subscription, AppError> {
        Self::validate(params)?;

        let sub = store
            .upsert_subscription(params.user_id, params.item_id, &params.channels)
            .await?;

        tracing::info!(
            subscription_id = sub.id,
            user_id = sub.user_id,
            item_id = sub.item_id,
            channels = ?sub.channels,
            "Subscription saved"
        );

        Ok(sub)
    }

    /// Get the subscription for one user and item.
    pub async fn get(
        store: &dyn DispatchStore,
        user_id: i64,
        item_id: i64,
    ) -> Result<Subscription, AppError> {
        store
            .get_subscription(user_id, item_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No subscription for user {} on item {}",
                    user_id, item_id
                ))
            })
    }

    fn validate(params: &SubscribeParams) -> Result<(), AppError> {
        if params.user_id <= 0 || params.item_id <= 0 {
            return Err(AppError::Validation(
                "user_id and item_id must be positive integers".to_string(),
            ));
        }
        if params.channels.is_empty() {
            return Err(AppError::Validation(
                "channels cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDispatchStore;
    use restock_common::types::SubscriptionStatus;

    fn params(user_id: i64, item_id: i64, channels: &[&str]) -> SubscribeParams {
        SubscribeParams {
            user_id,
            item_id,
            channels: channels.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_subscription() {
        let store = MemoryDispatchStore::new();
        let sub = SubscriptionService::create_or_replace(&store, &params(1, 42, &["email", "sms"]))
            .await
            .unwrap();

        assert_eq!(sub.user_id, 1);
        assert_eq!(sub.item_id, 42);
        assert_eq!(sub.channels, vec!["email", "sms"]);
        assert_eq!(sub.status, SubscriptionStatus::Pending);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_ids() {
        let store = MemoryDispatchStore::new();
        for (user_id, item_id) in [(0, 42), (1, 0), (-5, 42), (1, -1)] {
            let result =
                SubscriptionService::create_or_replace(&store, &params(user_id, item_id, &["email"]))
                    .await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
        assert!(store.get_subscription(1, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_empty_channels() {
        let store = MemoryDispatchStore::new();
        let result = SubscriptionService::create_or_replace(&store, &params(1, 42, &[])).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_channel_names_are_accepted() {
        let store = MemoryDispatchStore::new();
        let sub = SubscriptionService::create_or_replace(&store, &params(1, 42, &["fax"]))
            .await
            .unwrap();
        assert_eq!(sub.channels, vec!["fax"]);
    }

    #[tokio::test]
    async fn test_get_missing_subscription() {
        let store = MemoryDispatchStore::new();
        let result = SubscriptionService::get(&store, 1, 42).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
