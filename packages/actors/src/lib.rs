//! Actor system for order dispatch.
//!
//! This crate provides the controller and the Ractor-based bots that pull
//! orders from it.
//!
//! # Architecture
//!
//! - `Controller` - Owns the VIP and normal queues plus the bot registry
//! - `Bot` - Processes one order at a time and can be cancelled mid-order
//! - `BotActor` - Runs one bot's pull-loop against the controller
//!
//! # Usage
//!
//! ```ignore
//! use actors::Controller;
//!
//! let controller = Controller::new(|line: &str| println!("{line}"));
//! controller.add_bot().await?;
//! controller.create_vip().await;
//! controller.shutdown().await;
//! ```

mod bot;
mod bot_actor;
mod controller;
mod messages;
mod sink;

pub use bot::{Bot, BotSnapshot};
pub use bot_actor::{BotActor, BotActorState, BotArgs};
pub use controller::{Controller, Snapshot, WeakController};
pub use messages::{Assignment, BotMessage, DispatchError, ProcessOutcome};
pub use sink::{EventSink, NoopSink};
