//! Controller owning the order queues and the bot registry.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use dispatch_core::{
    BotId, DispatchConfig, DispatchEvent, DispatchStats, Order, OrderClass, OrderId,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::bot::{Bot, BotSnapshot};
use crate::bot_actor::spawn_bot_actor;
use crate::messages::{Assignment, DispatchError, ProcessOutcome};
use crate::sink::EventSink;

/// Everything guarded by the controller lock.
#[derive(Default)]
struct ControllerState {
    /// VIP orders, FIFO.
    vip: VecDeque<Order>,
    /// Normal orders, FIFO.
    normal: VecDeque<Order>,
    /// Registered bots, oldest first.
    bots: Vec<Bot>,
    order_counter: u64,
    bot_counter: u64,
}

impl ControllerState {
    fn queue_mut(&mut self, class: OrderClass) -> &mut VecDeque<Order> {
        match class {
            OrderClass::Vip => &mut self.vip,
            OrderClass::Normal => &mut self.normal,
        }
    }

    /// Append an order to the tail of its class queue.
    fn push_back(&mut self, order: Order) {
        self.queue_mut(order.class).push_back(order);
    }

    /// Remove the first pending order, VIP queue first.
    fn pop_next(&mut self) -> Option<Order> {
        for queue in [&mut self.vip, &mut self.normal] {
            if let Some(pos) = queue.iter().position(Order::is_pending) {
                return queue.remove(pos);
            }
        }
        None
    }

    fn bot(&self, bot_id: BotId) -> Option<&Bot> {
        self.bots.iter().find(|b| b.id() == bot_id)
    }

    /// All queued orders, VIP first.
    fn orders(&self) -> impl Iterator<Item = &Order> {
        self.vip.iter().chain(self.normal.iter())
    }
}

struct Shared {
    state: Mutex<ControllerState>,
    config: DispatchConfig,
    sink: Arc<dyn EventSink>,
    /// Wakes idle bots early when an order becomes pending.
    work_available: Notify,
}

impl Shared {
    /// Log an event and hand its rendered line to the sink.
    fn broadcast(&self, event: DispatchEvent) {
        tracing::info!("{}", event.description());
        self.sink.emit(&event.to_string());
    }
}

/// Snapshot of every queued order and every registered bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Queued orders, VIP first, each class in queue order.
    /// Orders being processed are listed on their bot instead.
    pub orders: Vec<Order>,
    pub bots: Vec<BotSnapshot>,
}

/// Dispatches prioritized orders to a resizable pool of bots.
///
/// Both queues and the bot registry sit behind one lock. Processing happens
/// outside it, on each bot's own actor.
///
/// Bot actors only hold a [`WeakController`]. Once the last `Controller`
/// clone is dropped they exit at their next poll; call [`Controller::shutdown`]
/// first to requeue in-flight orders and stop them right away.
#[derive(Clone)]
pub struct Controller {
    shared: Arc<Shared>,
}

/// Non-owning handle to a [`Controller`], held by bot actors.
#[derive(Clone)]
pub struct WeakController {
    shared: Weak<Shared>,
}

impl WeakController {
    /// The controller, if any owning handle is still alive.
    pub fn upgrade(&self) -> Option<Controller> {
        self.shared.upgrade().map(|shared| Controller { shared })
    }
}

impl Controller {
    /// Create a controller with timing taken from the environment.
    pub fn new(sink: impl EventSink) -> Self {
        Self::with_config(DispatchConfig::from_env(), sink)
    }

    pub fn with_config(config: DispatchConfig, sink: impl EventSink) -> Self {
        tracing::info!(
            "Starting controller (processing {}ms, idle backoff {}ms)",
            config.processing_time_ms,
            config.idle_backoff_ms
        );
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(ControllerState::default()),
                config,
                sink: Arc::new(sink),
                work_available: Notify::new(),
            }),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.shared.config
    }

    pub fn downgrade(&self) -> WeakController {
        WeakController {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Create a pending order at the tail of its class queue.
    pub async fn create_order(&self, class: OrderClass) -> Order {
        let mut state = self.shared.state.lock().await;
        state.order_counter += 1;
        let order = Order::new(OrderId(state.order_counter), class);
        state.push_back(order.clone());

        self.shared
            .broadcast(DispatchEvent::order_created(order.id, order.class));
        self.notify_pending();

        order
    }

    pub async fn create_normal(&self) -> Order {
        self.create_order(OrderClass::Normal).await
    }

    pub async fn create_vip(&self) -> Order {
        self.create_order(OrderClass::Vip).await
    }

    /// Register a new idle bot and start its pull-loop.
    pub async fn add_bot(&self) -> Result<Bot, DispatchError> {
        let mut state = self.shared.state.lock().await;
        state.bot_counter += 1;
        let bot = Bot::new(BotId(state.bot_counter));

        // The loop's first poll waits on this lock, so it sees the bot registered.
        if let Err(e) = spawn_bot_actor(self.downgrade(), bot.clone()).await {
            tracing::warn!("Failed to start bot {}: {}", bot.id(), e);
            return Err(e.into());
        }

        state.bots.push(bot.clone());
        self.shared.broadcast(DispatchEvent::bot_added(bot.id()));

        Ok(bot)
    }

    /// Remove the most recently added bot.
    ///
    /// An order the bot was processing goes back to the tail of its queue as
    /// `Pending`. Returns false if there are no bots.
    pub async fn remove_bot(&self) -> bool {
        let mut state = self.shared.state.lock().await;
        let Some(bot) = state.bots.pop() else {
            return false;
        };

        // Deregistered before stopping, so a racing poll sees Withdrawn.
        let requeued = bot.withdraw().map(|mut order| {
            order.mark_pending();
            let order_id = order.id;
            state.push_back(order);
            order_id
        });

        self.shared
            .broadcast(DispatchEvent::bot_removed(bot.id(), requeued));
        if requeued.is_some() {
            self.notify_pending();
        }

        true
    }

    /// Remove every bot, newest first. Returns how many were removed.
    pub async fn shutdown(&self) -> usize {
        tracing::info!("Shutting down controller");
        let mut removed = 0;
        while self.remove_bot().await {
            removed += 1;
        }
        removed
    }

    /// Move the next pending order into `bot_id`'s slot.
    ///
    /// The order leaves its queue and becomes the bot's current order under
    /// the same lock, so snapshots always see it in exactly one place.
    pub async fn take_next(&self, bot_id: BotId) -> Assignment {
        let mut state = self.shared.state.lock().await;
        let Some(bot) = state.bot(bot_id).cloned() else {
            return Assignment::Withdrawn;
        };
        if bot.stop_requested() {
            return Assignment::Withdrawn;
        }
        let Some(order) = state.pop_next() else {
            return Assignment::Idle;
        };

        match bot.claim(order) {
            Ok(order_id) => {
                self.shared
                    .broadcast(DispatchEvent::order_started(order_id, bot_id));
                Assignment::Order(order_id)
            }
            Err(order) => {
                // Still the oldest pending order of its class.
                state.queue_mut(order.class).push_front(order);
                if bot.stop_requested() {
                    Assignment::Withdrawn
                } else {
                    Assignment::Idle
                }
            }
        }
    }

    /// Release `bot`'s current order and put it at the tail of its class
    /// queue, `Complete` or `Pending` according to `outcome`.
    ///
    /// Returns a copy of the requeued order, or `None` if the bot was
    /// withdrawn and its order already requeued.
    pub async fn return_to_queue(&self, bot: &Bot, outcome: ProcessOutcome) -> Option<Order> {
        let mut state = self.shared.state.lock().await;
        let order = bot.release(outcome)?;
        let pending = order.is_pending();
        state.push_back(order.clone());
        drop(state);

        if pending {
            self.notify_pending();
        }
        Some(order)
    }

    /// Process the order `bot` claimed and hand it back to the queues.
    pub(crate) async fn run_order(&self, bot: &Bot, order_id: OrderId) {
        let outcome = bot.process(self.shared.config.processing_time()).await;

        match self.return_to_queue(bot, outcome).await {
            Some(order) if order.is_complete() => self
                .shared
                .broadcast(DispatchEvent::order_completed(order.id, bot.id())),
            Some(order) => self
                .shared
                .broadcast(DispatchEvent::order_returned(order.id, bot.id())),
            None => {
                tracing::debug!("Order {} was reclaimed from bot {}", order_id, bot.id());
            }
        }
    }

    /// Wait until an order may be pending, at most one idle backoff interval.
    pub async fn wait_for_work(&self) {
        let backoff = self.shared.config.idle_backoff();
        let _ = tokio::time::timeout(backoff, self.shared.work_available.notified()).await;
    }

    fn notify_pending(&self) {
        self.shared.work_available.notify_waiters();
    }

    pub async fn get_state(&self) -> Snapshot {
        let state = self.shared.state.lock().await;
        Snapshot {
            orders: state.orders().cloned().collect(),
            bots: state.bots.iter().map(Bot::snapshot).collect(),
        }
    }

    /// Pending orders in dispatch order: VIP first, then normal.
    pub async fn get_pending_orders(&self) -> Vec<Order> {
        self.filtered(Order::is_pending).await
    }

    pub async fn get_complete_orders(&self) -> Vec<Order> {
        self.filtered(Order::is_complete).await
    }

    pub async fn get_vip_orders(&self) -> Vec<Order> {
        self.shared.state.lock().await.vip.iter().cloned().collect()
    }

    pub async fn get_normal_orders(&self) -> Vec<Order> {
        self.shared.state.lock().await.normal.iter().cloned().collect()
    }

    /// Registered bots, oldest first.
    pub async fn get_bots(&self) -> Vec<Bot> {
        self.shared.state.lock().await.bots.clone()
    }

    pub async fn bot_count(&self) -> usize {
        self.shared.state.lock().await.bots.len()
    }

    /// Counts over queued orders, in-flight orders and bots.
    pub async fn stats(&self) -> DispatchStats {
        let state = self.shared.state.lock().await;
        let in_flight: Vec<Order> = state
            .bots
            .iter()
            .filter_map(Bot::current_order)
            .collect();
        DispatchStats::tally(
            state.orders().chain(in_flight.iter()),
            state.bots.iter().map(Bot::status),
        )
    }

    async fn filtered(&self, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
        let state = self.shared.state.lock().await;
        state.orders().filter(|o| keep(*o)).cloned().collect()
    }
}
