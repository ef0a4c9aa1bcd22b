mod common;

use std::error::Error;
use std::time::{Duration, Instant};

use actors::{Bot, ProcessOutcome};
use dispatch_core::{BotId, BotStatus, Order, OrderClass, OrderId, OrderStatus};

use common::{PROCESSING_TIME, eventually};

async fn wait_until_processing(bot: &Bot) -> bool {
    let busy = bot.clone();
    eventually(Duration::from_secs(2), || {
        let busy = busy.clone();
        async move { busy.is_processing() }
    })
    .await
}

#[test]
fn test_new_bot_is_idle() {
    let bot = Bot::new(BotId(1));
    assert_eq!(bot.id(), BotId(1));
    assert!(bot.is_idle());
    assert!(!bot.is_processing());
    assert!(bot.current_order().is_none());
    assert!(!bot.stop_requested());

    let snapshot = bot.snapshot();
    assert_eq!(snapshot.status, BotStatus::Idle);
    assert_eq!(snapshot.created_at, bot.created_at());
}

#[test]
fn test_claim_holds_order_as_processing() {
    let bot = Bot::new(BotId(1));
    let claimed = bot.claim(Order::new(OrderId(5), OrderClass::Vip));
    assert_eq!(claimed, Ok(OrderId(5)));

    assert!(bot.is_processing());
    let current = bot.current_order().expect("claimed order is current");
    assert_eq!(current.id, OrderId(5));
    assert_eq!(current.status, OrderStatus::Processing);

    // One order at a time.
    let second = Order::new(OrderId(6), OrderClass::Normal);
    let refused = bot.claim(second).expect_err("bot is busy");
    assert_eq!(refused.id, OrderId(6));
    assert_eq!(refused.status, OrderStatus::Pending);
    assert_eq!(bot.current_order().map(|o| o.id), Some(OrderId(5)));
}

#[tokio::test]
async fn test_process_completes_after_duration() {
    let bot = Bot::new(BotId(1));
    assert!(bot.claim(Order::new(OrderId(1), OrderClass::Normal)).is_ok());

    let started = Instant::now();
    let outcome = bot.process(PROCESSING_TIME).await;
    assert!(started.elapsed() >= PROCESSING_TIME);
    assert_eq!(outcome, ProcessOutcome::Elapsed);

    // The order stays visible on the bot until it is released.
    assert!(bot.current_order().is_some());

    let order = bot.release(outcome).expect("bot still holds the order");
    assert_eq!(order.status, OrderStatus::Complete);
    assert!(order.completed_at.is_some());
    assert!(bot.is_idle());
    assert!(bot.current_order().is_none());
}

#[tokio::test]
async fn test_request_stop_cancels_in_flight_order() -> Result<(), Box<dyn Error>> {
    let bot = Bot::new(BotId(1));
    assert!(bot.claim(Order::new(OrderId(9), OrderClass::Vip)).is_ok());

    let worker = bot.clone();
    let attempt = tokio::spawn(async move { worker.process(Duration::from_secs(30)).await });
    assert!(wait_until_processing(&bot).await);

    let started = Instant::now();
    bot.request_stop();
    let outcome = attempt.await?;
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(outcome, ProcessOutcome::Cancelled);

    let order = bot.release(outcome).expect("order handed back");
    assert_eq!(order.id, OrderId(9));
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.completed_at.is_none());
    assert!(bot.is_idle());
    assert!(bot.stop_requested());
    Ok(())
}

#[tokio::test]
async fn test_withdraw_takes_order_exactly_once() -> Result<(), Box<dyn Error>> {
    let bot = Bot::new(BotId(2));
    assert!(bot.claim(Order::new(OrderId(4), OrderClass::Normal)).is_ok());

    let worker = bot.clone();
    let attempt = tokio::spawn(async move { worker.process(Duration::from_secs(30)).await });
    assert!(wait_until_processing(&bot).await);

    let reclaimed = bot.withdraw().expect("bot was holding an order");
    assert_eq!(reclaimed.id, OrderId(4));
    assert!(bot.withdraw().is_none());

    let outcome = attempt.await?;
    assert_eq!(outcome, ProcessOutcome::Cancelled);
    assert!(bot.release(outcome).is_none());
    assert!(bot.is_idle());
    Ok(())
}

#[tokio::test]
async fn test_withdraw_before_processing_skips_the_wait() -> Result<(), Box<dyn Error>> {
    let bot = Bot::new(BotId(3));
    assert!(bot.claim(Order::new(OrderId(2), OrderClass::Vip)).is_ok());
    assert!(bot.withdraw().is_some());

    let outcome = tokio::time::timeout(Duration::from_secs(2), bot.process(Duration::from_secs(30))).await?;
    assert_eq!(outcome, ProcessOutcome::Cancelled);
    assert!(bot.release(outcome).is_none());
    Ok(())
}

#[test]
fn test_claim_after_stop_hands_order_back() {
    let bot = Bot::new(BotId(3));
    bot.request_stop();
    assert!(bot.stop_requested());
    assert!(bot.is_idle());

    let order = bot
        .claim(Order::new(OrderId(1), OrderClass::Normal))
        .expect_err("stopped bot refuses work");
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(bot.is_idle());
    assert!(bot.current_order().is_none());
}
