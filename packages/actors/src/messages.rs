//! Message and result types shared by the controller and bot actors.

use dispatch_core::OrderId;

/// Messages for the BotActor.
#[derive(Debug)]
pub enum BotMessage {
    /// Run one iteration of the pull-loop.
    Poll,
}

/// Answer to a bot asking the controller for work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// The next pending order, moved from its queue into the bot's slot.
    Order(OrderId),
    /// Nothing pending; poll again later.
    Idle,
    /// The bot is no longer registered and must stop polling.
    Withdrawn,
}

/// How a processing attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The processing time elapsed; the order is released as `Complete`.
    Elapsed,
    /// The attempt was cancelled; the order is released as `Pending`.
    Cancelled,
}

/// Error type for controller operations.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to spawn bot actor: {0}")]
    Spawn(#[from] ractor::SpawnErr),
}
