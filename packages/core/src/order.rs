//! Order domain types for work items awaiting a bot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for an order, assigned sequentially by the controller starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority class of an order.
///
/// VIP orders are always dispatched before any pending normal order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderClass {
    #[default]
    Normal,
    Vip,
}

impl OrderClass {
    /// Label used in operator-facing messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderClass::Normal => "Normal",
            OrderClass::Vip => "VIP",
        }
    }
}

impl std::fmt::Display for OrderClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current status of an order in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Waiting in its class queue.
    #[default]
    Pending,
    /// Held by a bot.
    Processing,
    /// Finished. Terminal.
    Complete,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Complete => "COMPLETE",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer order.
///
/// This is a plain state holder: transitions are not validated here, the
/// controller and bots only ever call them in lifecycle order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub class: OrderClass,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Set when the order enters `Complete`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a new pending order.
    pub fn new(id: OrderId, class: OrderClass) -> Self {
        Self {
            id,
            class,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn mark_processing(&mut self) {
        self.status = OrderStatus::Processing;
    }

    /// Mark the order complete and stamp the completion time.
    pub fn mark_complete(&mut self) {
        self.status = OrderStatus::Complete;
        self.completed_at = Some(Utc::now());
    }

    /// Return the order to `Pending` after a cancelled attempt.
    pub fn mark_pending(&mut self) {
        self.status = OrderStatus::Pending;
    }

    pub fn is_vip(&self) -> bool {
        self.class == OrderClass::Vip
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn is_complete(&self) -> bool {
        self.status == OrderStatus::Complete
    }
}
