//! Storage seams for subscriptions and the notification ledger.

use async_trait::async_trait;

use restock_common::error::AppError;
use restock_common::types::{NewNotification, NotificationRecord, Subscription};

/// Subscription store plus primary notification ledger.
#[async_trait]
pub trait DispatchStore: Send + Sync {
    /// Insert or overwrite the subscription for `(user_id, item_id)`.
    /// The stored status is always reset to PENDING.
    async fn upsert_subscription(
        &self,
        user_id: i64,
        item_id: i64,
        channels: &[String],
    ) -> Result<Subscription, AppError>;

    /// All PENDING subscriptions on `item_id`, oldest first.
    async fn pending_subscriptions(&self, item_id: i64) -> Result<Vec<Subscription>, AppError>;

    async fn get_subscription(
        &self,
        user_id: i64,
        item_id: i64,
    ) -> Result<Option<Subscription>, AppError>;

    /// Committed ledger records for one subscriber and item, in insertion order.
    async fn notifications_for(
        &self,
        user_id: i64,
        item_id: i64,
    ) -> Result<Vec<NotificationRecord>, AppError>;

    /// Open a unit of work for one subscription's dispatch.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError>;
}

/// Writes that become visible together on [`UnitOfWork::commit`].
///
/// Dropping a unit without committing discards every write made through it.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn append_notification(
        &mut self,
        notification: &NewNotification,
    ) -> Result<NotificationRecord, AppError>;

    async fn mark_notified(&mut self, subscription_id: i64) -> Result<(), AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}
