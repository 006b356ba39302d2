//! In-memory [`DispatchStore`] with the same unit-of-work contract as the
//! Postgres store. Writes made through a unit are staged and applied under
//! the state lock on commit; a dropped unit leaves no trace.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use restock_common::error::AppError;
use restock_common::types::{
    NewNotification, NotificationRecord, Subscription, SubscriptionStatus,
};

use crate::store::{DispatchStore, UnitOfWork};

#[derive(Debug, Default)]
struct MemoryState {
    /// Keyed by surrogate id so iteration is oldest-first.
    subscriptions: BTreeMap<i64, Subscription>,
    notifications: Vec<NotificationRecord>,
    last_subscription_id: i64,
    last_notification_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDispatchStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDispatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every committed ledger record, in insertion order.
    pub async fn all_notifications(&self) -> Vec<NotificationRecord> {
        self.state.lock().await.notifications.clone()
    }
}

#[async_trait]
impl DispatchStore for MemoryDispatchStore {
    async fn upsert_subscription(
        &self,
        user_id: i64,
        item_id: i64,
        channels: &[String],
    ) -> Result<Subscription, AppError> {
        let mut state = self.state.lock().await;

        if let Some(existing) = state
            .subscriptions
            .values_mut()
            .find(|s| s.user_id == user_id && s.item_id == item_id)
        {
            existing.channels = channels.to_vec();
            existing.status = SubscriptionStatus::Pending;
            return Ok(existing.clone());
        }

        state.last_subscription_id += 1;
        let sub = Subscription {
            id: state.last_subscription_id,
            user_id,
            item_id,
            channels: channels.to_vec(),
            status: SubscriptionStatus::Pending,
        };
        state.subscriptions.insert(sub.id, sub.clone());
        Ok(sub)
    }

    async fn pending_subscriptions(&self, item_id: i64) -> Result<Vec<Subscription>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .subscriptions
            .values()
            .filter(|s| s.item_id == item_id && s.status == SubscriptionStatus::Pending)
            .cloned()
            .collect())
    }

    async fn get_subscription(
        &self,
        user_id: i64,
        item_id: i64,
    ) -> Result<Option<Subscription>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .subscriptions
            .values()
            .find(|s| s.user_id == user_id && s.item_id == item_id)
            .cloned())
    }

    async fn notifications_for(
        &self,
        user_id: i64,
        item_id: i64,
    ) -> Result<Vec<NotificationRecord>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && n.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        Ok(Box::new(MemoryUnitOfWork {
            state: Arc::clone(&self.state),
            staged: Vec::new(),
            notified: Vec::new(),
        }))
    }
}

/// Staged writes for one subscription.
pub struct MemoryUnitOfWork {
    state: Arc<Mutex<MemoryState>>,
    staged: Vec<NotificationRecord>,
    notified: Vec<i64>,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn append_notification(
        &mut self,
        notification: &NewNotification,
    ) -> Result<NotificationRecord, AppError> {
        // Ids are taken eagerly, like a sequence; a rollback leaves a gap.
        let id = {
            let mut state = self.state.lock().await;
            state.last_notification_id += 1;
            state.last_notification_id
        };

        let record = NotificationRecord {
            id,
            user_id: notification.user_id,
            item_id: notification.item_id,
            channel: notification.channel.clone(),
            status: notification.status,
            created_at: Utc::now(),
        };
        self.staged.push(record.clone());
        Ok(record)
    }

    async fn mark_notified(&mut self, subscription_id: i64) -> Result<(), AppError> {
        let state = self.state.lock().await;
        if !state.subscriptions.contains_key(&subscription_id) {
            return Err(AppError::NotFound(format!(
                "Subscription {} not found",
                subscription_id
            )));
        }
        drop(state);

        self.notified.push(subscription_id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let this = *self;
        let mut state = this.state.lock().await;

        state.notifications.extend(this.staged);
        for id in this.notified {
            if let Some(sub) = state.subscriptions.get_mut(&id) {
                sub.status = SubscriptionStatus::Notified;
            }
        }

        Ok(())
    }
}
