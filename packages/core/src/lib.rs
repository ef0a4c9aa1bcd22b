//! Core domain types for the order dispatch system.
//!
//! This crate contains shared types used across all packages:
//! - Order, OrderClass and OrderStatus for work items
//! - BotId and BotStatus for the bot pool
//! - Events for state-change notifications
//! - Timing configuration and aggregate stats

mod bot;
mod config;
mod events;
mod order;
mod stats;

pub use bot::{BotId, BotStatus};
pub use config::{DispatchConfig, IDLE_BACKOFF_ENV, PROCESSING_TIME_ENV};
pub use events::DispatchEvent;
pub use order::{Order, OrderClass, OrderId, OrderStatus};
pub use stats::DispatchStats;
