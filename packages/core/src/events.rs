//! Event types emitted on every state change.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::{BotId, OrderClass, OrderId, OrderStatus};

/// Events emitted by the controller and the bot pull-loops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DispatchEvent {
    // Order events
    /// A new order was created and queued.
    OrderCreated {
        order_id: OrderId,
        class: OrderClass,
        timestamp: DateTime<Utc>,
    },
    /// A bot took an order off the queue.
    OrderStarted {
        order_id: OrderId,
        bot_id: BotId,
        timestamp: DateTime<Utc>,
    },
    /// A bot finished an order.
    OrderCompleted {
        order_id: OrderId,
        bot_id: BotId,
        timestamp: DateTime<Utc>,
    },
    /// A cancelled order was handed back to its queue by its own bot.
    OrderReturned {
        order_id: OrderId,
        bot_id: BotId,
        timestamp: DateTime<Utc>,
    },

    // Bot events
    /// A bot joined the pool.
    BotAdded {
        bot_id: BotId,
        timestamp: DateTime<Utc>,
    },
    /// A bot left the pool, possibly requeueing the order it held.
    BotRemoved {
        bot_id: BotId,
        requeued: Option<OrderId>,
        timestamp: DateTime<Utc>,
    },
}

impl DispatchEvent {
    pub fn order_created(order_id: OrderId, class: OrderClass) -> Self {
        Self::OrderCreated {
            order_id,
            class,
            timestamp: Utc::now(),
        }
    }

    pub fn order_started(order_id: OrderId, bot_id: BotId) -> Self {
        Self::OrderStarted {
            order_id,
            bot_id,
            timestamp: Utc::now(),
        }
    }

    pub fn order_completed(order_id: OrderId, bot_id: BotId) -> Self {
        Self::OrderCompleted {
            order_id,
            bot_id,
            timestamp: Utc::now(),
        }
    }

    pub fn order_returned(order_id: OrderId, bot_id: BotId) -> Self {
        Self::OrderReturned {
            order_id,
            bot_id,
            timestamp: Utc::now(),
        }
    }

    pub fn bot_added(bot_id: BotId) -> Self {
        Self::BotAdded {
            bot_id,
            timestamp: Utc::now(),
        }
    }

    pub fn bot_removed(bot_id: BotId, requeued: Option<OrderId>) -> Self {
        Self::BotRemoved {
            bot_id,
            requeued,
            timestamp: Utc::now(),
        }
    }

    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            DispatchEvent::OrderCreated { timestamp, .. } => *timestamp,
            DispatchEvent::OrderStarted { timestamp, .. } => *timestamp,
            DispatchEvent::OrderCompleted { timestamp, .. } => *timestamp,
            DispatchEvent::OrderReturned { timestamp, .. } => *timestamp,
            DispatchEvent::BotAdded { timestamp, .. } => *timestamp,
            DispatchEvent::BotRemoved { timestamp, .. } => *timestamp,
        }
    }

    /// Get the order ID associated with this event, if any.
    pub fn order_id(&self) -> Option<OrderId> {
        match self {
            DispatchEvent::OrderCreated { order_id, .. } => Some(*order_id),
            DispatchEvent::OrderStarted { order_id, .. } => Some(*order_id),
            DispatchEvent::OrderCompleted { order_id, .. } => Some(*order_id),
            DispatchEvent::OrderReturned { order_id, .. } => Some(*order_id),
            DispatchEvent::BotRemoved { requeued, .. } => *requeued,
            DispatchEvent::BotAdded { .. } => None,
        }
    }

    /// Get the bot ID associated with this event, if any.
    pub fn bot_id(&self) -> Option<BotId> {
        match self {
            DispatchEvent::OrderCreated { .. } => None,
            DispatchEvent::OrderStarted { bot_id, .. } => Some(*bot_id),
            DispatchEvent::OrderCompleted { bot_id, .. } => Some(*bot_id),
            DispatchEvent::OrderReturned { bot_id, .. } => Some(*bot_id),
            DispatchEvent::BotAdded { bot_id, .. } => Some(*bot_id),
            DispatchEvent::BotRemoved { bot_id, .. } => Some(*bot_id),
        }
    }

    /// Short description of this event, without the timestamp.
    pub fn description(&self) -> String {
        match self {
            DispatchEvent::OrderCreated {
                order_id, class, ..
            } => format!(
                "{} Order #{} created - Status: {}",
                class,
                order_id,
                OrderStatus::Pending
            ),
            DispatchEvent::OrderStarted {
                order_id, bot_id, ..
            } => format!("Bot #{} started processing Order #{}", bot_id, order_id),
            DispatchEvent::OrderCompleted {
                order_id, bot_id, ..
            } => format!(
                "Order #{} completed by Bot #{} - Status: {}",
                order_id,
                bot_id,
                OrderStatus::Complete
            ),
            DispatchEvent::OrderReturned {
                order_id, bot_id, ..
            } => format!("Order #{} returned to PENDING by Bot #{}", order_id, bot_id),
            DispatchEvent::BotAdded { bot_id, .. } => format!("Bot #{} added", bot_id),
            DispatchEvent::BotRemoved {
                bot_id,
                requeued: Some(order_id),
                ..
            } => format!(
                "Bot #{} removed - Order #{} returned to PENDING",
                bot_id, order_id
            ),
            DispatchEvent::BotRemoved {
                bot_id,
                requeued: None,
                ..
            } => format!("Bot #{} removed", bot_id),
        }
    }
}

/// Renders as `[HH:MM:SS] <description>` in local time, the line handed to event sinks.
impl std::fmt::Display for DispatchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let local = self.timestamp().with_timezone(&Local);
        write!(f, "[{}] {}", local.format("%H:%M:%S"), self.description())
    }
}
