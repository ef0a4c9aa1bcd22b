//! Bot handle: status, current order and cancellation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dispatch_core::{BotId, BotStatus, Order, OrderId};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::messages::ProcessOutcome;

/// Mutable part of a bot, guarded by a short-lived lock.
struct BotSlot {
    status: BotStatus,
    /// The order being processed. Taken exactly once, under the controller
    /// lock: when the attempt is released, or when the bot is withdrawn.
    current: Option<Order>,
    /// Cancellation for the current attempt. Replaced for every order.
    cancel: CancellationToken,
}

struct BotInner {
    id: BotId,
    created_at: DateTime<Utc>,
    slot: Mutex<BotSlot>,
    /// One-shot stop flag observed by the pull-loop.
    shutdown: CancellationToken,
}

/// A bot that processes one order at a time.
///
/// Cloning is cheap and every clone refers to the same bot.
#[derive(Clone)]
pub struct Bot {
    inner: Arc<BotInner>,
}

/// Copy of a bot's state for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotSnapshot {
    pub id: BotId,
    pub status: BotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_order: Option<Order>,
    pub created_at: DateTime<Utc>,
}

impl Bot {
    /// Create a new idle bot.
    pub fn new(id: BotId) -> Self {
        Self {
            inner: Arc::new(BotInner {
                id,
                created_at: Utc::now(),
                slot: Mutex::new(BotSlot {
                    status: BotStatus::Idle,
                    current: None,
                    cancel: CancellationToken::new(),
                }),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn id(&self) -> BotId {
        self.inner.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    pub fn status(&self) -> BotStatus {
        self.slot().status
    }

    pub fn is_idle(&self) -> bool {
        self.status() == BotStatus::Idle
    }

    pub fn is_processing(&self) -> bool {
        self.status() == BotStatus::Processing
    }

    /// Copy of the order currently being processed, if any.
    pub fn current_order(&self) -> Option<Order> {
        self.slot().current.clone()
    }

    pub fn snapshot(&self) -> BotSnapshot {
        let slot = self.slot();
        BotSnapshot {
            id: self.inner.id,
            status: slot.status,
            current_order: slot.current.clone(),
            created_at: self.inner.created_at,
        }
    }

    /// Take `order` as the current order and mark both it and the bot
    /// `Processing`.
    ///
    /// The controller calls this under its lock, so the order moves from a
    /// queue into the slot in one step. Refused, handing the order back, when
    /// a stop was requested or the bot already holds an order.
    pub fn claim(&self, mut order: Order) -> Result<OrderId, Order> {
        let mut slot = self.slot();
        if self.inner.shutdown.is_cancelled() || slot.current.is_some() {
            return Err(order);
        }
        order.mark_processing();
        let order_id = order.id;
        slot.status = BotStatus::Processing;
        slot.current = Some(order);
        slot.cancel = CancellationToken::new();
        Ok(order_id)
    }

    /// Wait out `duration` on the claimed order, unless cancelled first.
    ///
    /// The order stays in the slot either way; [`Bot::release`] settles it.
    /// Returns `Cancelled` at once if the order was already withdrawn.
    pub async fn process(&self, duration: Duration) -> ProcessOutcome {
        let cancel = {
            let slot = self.slot();
            if slot.current.is_none() {
                return ProcessOutcome::Cancelled;
            }
            slot.cancel.clone()
        };

        tokio::select! {
            _ = tokio::time::sleep(duration) => ProcessOutcome::Elapsed,
            _ = cancel.cancelled() => ProcessOutcome::Cancelled,
        }
    }

    /// Clear the slot and hand back the order, settled by `outcome`.
    ///
    /// `None` if the controller already took the order while withdrawing
    /// the bot.
    pub fn release(&self, outcome: ProcessOutcome) -> Option<Order> {
        let mut slot = self.slot();
        slot.status = BotStatus::Idle;
        let mut order = slot.current.take()?;
        match outcome {
            ProcessOutcome::Elapsed => order.mark_complete(),
            ProcessOutcome::Cancelled => order.mark_pending(),
        }
        Some(order)
    }

    /// Cancel the in-flight attempt, if any, and tell the pull-loop to exit.
    ///
    /// Non-blocking and safe to call on an idle bot.
    pub fn request_stop(&self) {
        let slot = self.slot();
        if slot.status == BotStatus::Processing {
            slot.cancel.cancel();
        }
        self.inner.shutdown.cancel();
    }

    /// Stop the bot and take back the order it was holding.
    ///
    /// Both happen under the slot lock, so the order comes back either here
    /// or from [`Bot::release`], never both.
    pub fn withdraw(&self) -> Option<Order> {
        let mut slot = self.slot();
        let order = slot.current.take();
        if slot.status == BotStatus::Processing {
            slot.cancel.cancel();
        }
        slot.status = BotStatus::Idle;
        self.inner.shutdown.cancel();
        order
    }

    pub fn stop_requested(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Resolves once a stop has been requested.
    pub async fn stopped(&self) {
        self.inner.shutdown.cancelled().await
    }

    fn slot(&self) -> MutexGuard<'_, BotSlot> {
        self.inner
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("id", &self.inner.id)
            .field("status", &self.status())
            .field("stop_requested", &self.stop_requested())
            .finish()
    }
}
