//! Aggregate counters over orders and bots.

use serde::{Deserialize, Serialize};

use crate::{BotStatus, Order, OrderClass, OrderStatus};

/// Point-in-time statistics for the whole dispatch system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchStats {
    /// Orders waiting in a queue.
    pub pending: u64,
    /// Orders currently held by a bot.
    pub processing: u64,
    /// Finished orders.
    pub complete: u64,
    pub vip: u64,
    pub normal: u64,
    pub idle_bots: u64,
    pub busy_bots: u64,
}

impl DispatchStats {
    /// Tally stats from a set of orders and bot statuses.
    pub fn tally<'a>(
        orders: impl IntoIterator<Item = &'a Order>,
        bots: impl IntoIterator<Item = BotStatus>,
    ) -> Self {
        let mut stats = Self::default();
        for order in orders {
            match order.status {
                OrderStatus::Pending => stats.pending += 1,
                OrderStatus::Processing => stats.processing += 1,
                OrderStatus::Complete => stats.complete += 1,
            }
            match order.class {
                OrderClass::Vip => stats.vip += 1,
                OrderClass::Normal => stats.normal += 1,
            }
        }
        for status in bots {
            match status {
                BotStatus::Idle => stats.idle_bots += 1,
                BotStatus::Processing => stats.busy_bots += 1,
            }
        }
        stats
    }

    /// Every order the system knows about.
    pub fn total_orders(&self) -> u64 {
        self.pending + self.processing + self.complete
    }

    pub fn total_bots(&self) -> u64 {
        self.idle_bots + self.busy_bots
    }
}
