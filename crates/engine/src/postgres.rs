//! PostgreSQL-backed [`DispatchStore`].
//!
//! Each [`UnitOfWork`] wraps one `sqlx` transaction; dropping it without a
//! commit rolls the transaction back.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use restock_common::error::AppError;
use restock_common::types::{
    NewNotification, NotificationRecord, Subscription, SubscriptionStatus,
};

use crate::store::{DispatchStore, UnitOfWork};

#[derive(Clone)]
pub struct PgDispatchStore {
    pool: PgPool,
}

impl PgDispatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DispatchStore for PgDispatchStore {
    async fn upsert_subscription(
        &self,
        user_id: i64,
        item_id: i64,
        channels: &[String],
    ) -> Result<Subscription, AppError> {
        let sub: Subscription = sqlx::query_as(
            r#"
            INSERT INTO subscriptions (user_id, item_id, channels, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, item_id)
            DO UPDATE SET channels = EXCLUDED.channels, status = EXCLUDED.status
            RETURNING id, user_id, item_id, channels, status
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(Json(channels.to_vec()))
        .bind(SubscriptionStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(sub)
    }

    async fn pending_subscriptions(&self, item_id: i64) -> Result<Vec<Subscription>, AppError> {
        let subs: Vec<Subscription> = sqlx::query_as(
            r#"
            SELECT id, user_id, item_id, channels, status
            FROM subscriptions
            WHERE item_id = $1 AND status = $2
            ORDER BY id
            "#,
        )
        .bind(item_id)
        .bind(SubscriptionStatus::Pending.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }

    async fn get_subscription(
        &self,
        user_id: i64,
        item_id: i64,
    ) -> Result<Option<Subscription>, AppError> {
        let sub: Option<Subscription> = sqlx::query_as(
            r#"
            SELECT id, user_id, item_id, channels, status
            FROM subscriptions
            WHERE user_id = $1 AND item_id = $2
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sub)
    }

    async fn notifications_for(
        &self,
        user_id: i64,
        item_id: i64,
    ) -> Result<Vec<NotificationRecord>, AppError> {
        let records: Vec<NotificationRecord> = sqlx::query_as(
            r#"
            SELECT id, user_id, item_id, channel, status, created_at
            FROM notifications
            WHERE user_id = $1 AND item_id = $2
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// One open transaction.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn append_notification(
        &mut self,
        notification: &NewNotification,
    ) -> Result<NotificationRecord, AppError> {
        let record: NotificationRecord = sqlx::query_as(
            r#"
            INSERT INTO notifications (user_id, item_id, channel, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, item_id, channel, status, created_at
            "#,
        )
        .bind(notification.user_id)
        .bind(notification.item_id)
        .bind(&notification.channel)
        .bind(notification.status.as_str())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(record)
    }

    async fn mark_notified(&mut self, subscription_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE subscriptions SET status = $1 WHERE id = $2")
            .bind(SubscriptionStatus::Notified.as_str())
            .bind(subscription_id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Subscription {} not found",
                subscription_id
            )));
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
