//! Restock dispatch pipeline.
//!
//! For a restocked item:
//! 1. Load every PENDING subscription on the item
//! 2. Per subscription, open a unit of work and walk its channels in order
//! 3. Append one ledger record per attempted channel inside the unit
//! 4. Mark the subscription NOTIFIED in the same unit if any channel succeeded
//! 5. Commit, then mirror the committed records
//!
//! A storage fault aborts only the subscription it happened in. Delivery
//! failures are recorded as FAILED and leave the subscription PENDING so the
//! next restock retries it.
//!
//! Concurrent restocks of the same item are not coordinated: two calls can
//! both read a subscription as PENDING and both deliver to it.

use std::sync::Arc;

use serde::Serialize;

use restock_common::error::AppError;
use restock_common::types::{DeliveryOutcome, NewNotification, NotificationRecord, Subscription};
use restock_notifier::{ChannelCapability, ChannelRegistry};

use crate::mirror::MirrorDocument;
use crate::store::DispatchStore;

/// State a subscription was left in by one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchOutcome {
    /// At least one channel succeeded; the subscription is fulfilled.
    Notified,
    /// No channel succeeded; the subscription will be retried.
    Pending,
}

/// Per-restock tally, for logs and the HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestockSummary {
    pub item_id: i64,
    /// Pending subscriptions found for the item.
    pub attempted: u32,
    pub notified: u32,
    /// Committed with no successful channel.
    pub pending: u32,
    /// Rolled back on a storage fault.
    pub failed: u32,
}

/// Orchestrates channel fan-out and ledger writes for restock events.
pub struct NotificationDispatcher {
    store: Arc<dyn DispatchStore>,
    channels: Arc<ChannelRegistry>,
    mirror: Arc<MirrorDocument>,
}

impl NotificationDispatcher {
    pub fn new(
        store: Arc<dyn DispatchStore>,
        channels: Arc<ChannelRegistry>,
        mirror: Arc<MirrorDocument>,
    ) -> Self {
        Self {
            store,
            channels,
            mirror,
        }
    }

    /// Notify every pending subscriber of `item_id`.
    ///
    /// Only a failure to list the pending subscriptions is returned as an
    /// error. Per-subscription failures are logged and counted in
    /// [`RestockSummary::failed`].
    pub async fn process_restock(&self, item_id: i64) -> Result<RestockSummary, AppError> {
        let subscriptions = self.store.pending_subscriptions(item_id).await.map_err(|e| {
            tracing::error!(item_id, error = %e, "Failed to load pending subscriptions");
            e
        })?;

        let mut summary = RestockSummary {
            item_id,
            ..Default::default()
        };

        if subscriptions.is_empty() {
            tracing::debug!(item_id, "No pending subscriptions for restocked item");
            return Ok(summary);
        }

        tracing::info!(
            item_id,
            pending = subscriptions.len(),
            "Processing restock"
        );

        for sub in &subscriptions {
            summary.attempted += 1;

            match self.dispatch_subscription(sub).await {
                Ok(DispatchOutcome::Notified) => summary.notified += 1,
                Ok(DispatchOutcome::Pending) => summary.pending += 1,
                Err(e) => {
                    tracing::error!(
                        subscription_id = sub.id,
                        user_id = sub.user_id,
                        item_id = sub.item_id,
                        error = %e,
                        "Subscription dispatch failed, left pending"
                    );
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            item_id,
            attempted = summary.attempted,
            notified = summary.notified,
            pending = summary.pending,
            failed = summary.failed,
            "Restock processed"
        );

        Ok(summary)
    }

    /// Attempt every channel of one subscription as a single unit of work.
    ///
    /// Returns an error only for storage faults, in which case nothing from
    /// this attempt was written.
    pub async fn dispatch_subscription(
        &self,
        sub: &Subscription,
    ) -> Result<DispatchOutcome, AppError> {
        let mut unit = self.store.begin().await?;
        let mut records: Vec<NotificationRecord> = Vec::with_capacity(sub.channels.len());

        for channel in &sub.channels {
            let sender = match self.channels.resolve(channel) {
                ChannelCapability::Deliver(sender) => sender,
                ChannelCapability::NotConfigured => {
                    tracing::debug!(
                        subscription_id = sub.id,
                        channel = %channel,
                        "Channel not configured, skipping"
                    );
                    continue;
                }
            };

            let status = match self
                .channels
                .deliver(sender.as_ref(), sub.user_id, sub.item_id)
                .await
            {
                Ok(()) => DeliveryOutcome::Success,
                Err(e) => {
                    tracing::warn!(
                        subscription_id = sub.id,
                        user_id = sub.user_id,
                        item_id = sub.item_id,
                        channel = %channel,
                        error = %e,
                        "Channel delivery failed"
                    );
                    DeliveryOutcome::Failed
                }
            };

            let record = unit
                .append_notification(&NewNotification {
                    user_id: sub.user_id,
                    item_id: sub.item_id,
                    channel: channel.clone(),
                    status,
                })
                .await?;
            records.push(record);
        }

        let outcome = if records.iter().any(|r| r.status.is_success()) {
            unit.mark_notified(sub.id).await?;
            DispatchOutcome::Notified
        } else {
            DispatchOutcome::Pending
        };

        unit.commit().await?;

        tracing::debug!(
            subscription_id = sub.id,
            attempts = records.len(),
            outcome = ?outcome,
            "Subscription dispatched"
        );

        for record in &records {
            self.mirror.append(record).await;
        }

        Ok(outcome)
    }
}
