//! Restock notification dispatch engine.
//!
//! On a restock event the [`NotificationDispatcher`] loads every PENDING
//! subscription for the item and, per subscription, attempts each channel,
//! appends one ledger record per attempted channel and flips the
//! subscription to NOTIFIED when any channel succeeded. All writes for one
//! subscription go through a single [`UnitOfWork`].

pub mod dispatcher;
pub mod memory;
pub mod mirror;
pub mod postgres;
pub mod store;
pub mod subscription;

pub use dispatcher::{DispatchOutcome, NotificationDispatcher, RestockSummary};
pub use memory::MemoryDispatchStore;
pub use mirror::{MirrorDocument, MirrorEntry, MirrorError};
pub use postgres::PgDispatchStore;
pub use store::{DispatchStore, UnitOfWork};
pub use subscription::SubscriptionService;
