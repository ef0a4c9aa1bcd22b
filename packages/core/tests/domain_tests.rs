use std::time::Duration;

use dispatch_core::{
    BotId, BotStatus, DispatchConfig, DispatchEvent, DispatchStats, Order, OrderClass, OrderId,
    OrderStatus,
};

#[test]
fn test_order_lifecycle() {
    let mut order = Order::new(OrderId(1), OrderClass::Normal);
    assert_eq!(order.id, OrderId(1));
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.completed_at.is_none());
    assert!(!order.is_vip());

    order.mark_processing();
    assert_eq!(order.status, OrderStatus::Processing);
    assert!(order.completed_at.is_none());

    order.mark_complete();
    assert!(order.is_complete());
    let completed_at = order.completed_at.expect("completion time set");
    assert!(completed_at >= order.created_at);
}

#[test]
fn test_cancelled_order_has_no_completion_time() {
    let mut order = Order::new(OrderId(7), OrderClass::Vip);
    assert!(order.is_vip());

    order.mark_processing();
    order.mark_pending();
    assert!(order.is_pending());
    assert!(order.completed_at.is_none());
}

#[test]
fn test_status_labels() {
    assert_eq!(OrderStatus::Pending.to_string(), "PENDING");
    assert_eq!(OrderStatus::Processing.to_string(), "PROCESSING");
    assert_eq!(OrderStatus::Complete.to_string(), "COMPLETE");
    assert_eq!(OrderClass::Vip.to_string(), "VIP");
    assert_eq!(OrderClass::Normal.to_string(), "Normal");
    assert_eq!(BotStatus::Idle.to_string(), "IDLE");
    assert_eq!(BotStatus::Processing.to_string(), "PROCESSING");
}

#[test]
fn test_event_text() {
    let created = DispatchEvent::order_created(OrderId(3), OrderClass::Vip);
    assert_eq!(created.description(), "VIP Order #3 created - Status: PENDING");

    let rendered = created.to_string();
    assert!(rendered.starts_with('['));
    assert!(rendered.ends_with("] VIP Order #3 created - Status: PENDING"));

    let removed = DispatchEvent::bot_removed(BotId(2), Some(OrderId(3)));
    assert_eq!(
        removed.description(),
        "Bot #2 removed - Order #3 returned to PENDING"
    );
    assert_eq!(removed.order_id(), Some(OrderId(3)));

    let removed_idle = DispatchEvent::bot_removed(BotId(2), None);
    assert_eq!(removed_idle.description(), "Bot #2 removed");
    assert_eq!(removed_idle.order_id(), None);

    let completed = DispatchEvent::order_completed(OrderId(4), BotId(1));
    assert_eq!(
        completed.description(),
        "Order #4 completed by Bot #1 - Status: COMPLETE"
    );
    assert_eq!(completed.bot_id(), Some(BotId(1)));
}

#[test]
fn test_event_serializes_with_tag() -> Result<(), serde_json::Error> {
    let event = DispatchEvent::bot_added(BotId(5));
    let json = serde_json::to_value(&event)?;
    assert_eq!(json["event"], "bot_added");
    assert_eq!(json["bot_id"], 5);
    Ok(())
}

#[test]
fn test_config_defaults_and_builders() {
    let config = DispatchConfig::default();
    assert_eq!(config.processing_time(), Duration::from_secs(10));
    assert_eq!(config.idle_backoff(), Duration::from_millis(100));

    let config = config
        .with_processing_time(Duration::from_millis(250))
        .with_idle_backoff(Duration::from_millis(5));
    assert_eq!(config.processing_time_ms, 250);
    assert_eq!(config.idle_backoff_ms, 5);
}

#[test]
fn test_config_builders_saturate_huge_durations() {
    let config = DispatchConfig::default()
        .with_processing_time(Duration::MAX)
        .with_idle_backoff(Duration::from_secs(u64::MAX));
    assert_eq!(config.processing_time_ms, u64::MAX);
    assert_eq!(config.idle_backoff_ms, u64::MAX);
}

#[test]
fn test_config_partial_deserialize() -> Result<(), serde_json::Error> {
    let config: DispatchConfig = serde_json::from_str(r#"{"processing_time_ms": 42}"#)?;
    assert_eq!(config.processing_time_ms, 42);
    assert_eq!(config.idle_backoff_ms, 100);
    Ok(())
}

#[test]
fn test_stats_tally() {
    let mut done = Order::new(OrderId(1), OrderClass::Normal);
    done.mark_complete();
    let waiting = Order::new(OrderId(2), OrderClass::Vip);
    let waiting_too = Order::new(OrderId(3), OrderClass::Normal);

    let stats = DispatchStats::tally(
        [&done, &waiting, &waiting_too],
        [BotStatus::Idle, BotStatus::Processing, BotStatus::Processing],
    );
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.complete, 1);
    assert_eq!(stats.vip, 1);
    assert_eq!(stats.normal, 2);
    assert_eq!(stats.idle_bots, 1);
    assert_eq!(stats.busy_bots, 2);
    assert_eq!(stats.total_orders(), 3);
    assert_eq!(stats.total_bots(), 3);
}
