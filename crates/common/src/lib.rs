//! Shared configuration, errors and domain types for the restock notifier.

pub mod config;
pub mod db;
pub mod error;
pub mod types;
